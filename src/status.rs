use crate::controller::{AppState, Operation};

pub const EMPTY_LIBRARY: &str = "No PDFs uploaded yet. Upload a PDF to get started!";
pub const NO_SUMMARY: &str = "No summary yet. Click Summarize to generate one.";

/// What the status bar shows. Errors win over work in progress, which wins
/// over plain notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status<'a> {
    Error(&'a str),
    Busy(&'static str),
    Info(&'a str),
}

pub fn resolve<'a>(
    error: Option<&'a str>,
    in_flight: Option<Operation>,
    notice: Option<&'a str>,
) -> Option<Status<'a>> {
    if let Some(error) = error {
        return Some(Status::Error(error));
    }
    if let Some(operation) = in_flight {
        return Some(Status::Busy(operation.label()));
    }
    notice.map(Status::Info)
}

pub fn for_state(state: &AppState) -> Option<Status<'_>> {
    resolve(state.error.as_deref(), state.in_flight, state.notice.as_deref())
}

pub fn library_placeholder(state: &AppState) -> Option<&'static str> {
    state.documents.is_empty().then_some(EMPTY_LIBRARY)
}

pub fn summary_placeholder(state: &AppState) -> Option<&'static str> {
    (state.active.is_some() && state.summary.is_empty()).then_some(NO_SUMMARY)
}
