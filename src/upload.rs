use futures_util::{Stream, StreamExt};
use std::sync::Arc;

/// Where the upload control currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadPhase {
    #[default]
    Idle,
    Selected,
    Uploading,
    Done,
}

/// Bytes handed to the transport so far, out of `total` when known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferProgress {
    pub sent: u64,
    pub total: Option<u64>,
}

impl TransferProgress {
    /// Integer percentage, or `None` when the length is not computable.
    pub fn percent(&self) -> Option<u8> {
        match self.total {
            Some(total) if total > 0 => {
                let ratio = self.sent.min(total) as f64 / total as f64;
                Some((ratio * 100.0).round() as u8)
            }
            _ => None,
        }
    }
}

/// Progress capability handed to the API client. Called from the task that
/// drives the request body.
pub type ProgressFn = Arc<dyn Fn(TransferProgress) + Send + Sync>;

pub fn progress_fn<F>(f: F) -> ProgressFn
where
    F: Fn(TransferProgress) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps a byte stream so every chunk pulled by the transport is reported to
/// `progress` as a running total.
pub fn counted<S, B, E>(
    stream: S,
    total: Option<u64>,
    progress: ProgressFn,
) -> impl Stream<Item = Result<B, E>>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
{
    let mut sent = 0u64;
    stream.map(move |chunk| {
        if let Ok(bytes) = &chunk {
            sent += bytes.as_ref().len() as u64;
            progress(TransferProgress { sent, total });
        }
        chunk
    })
}
