use crate::api::ApiClient;
use crate::controller::{Effect, Event};
use crate::upload::ProgressFn;

/// Carries out one controller effect and reports its outcome as the event the
/// controller expects back. Upload progress goes to `progress` while the
/// request body is being sent; other effects ignore it.
pub async fn perform(client: ApiClient, effect: Effect, progress: ProgressFn) -> Event {
    match effect {
        Effect::ListDocuments(origin) => Event::DocumentsLoaded {
            origin,
            result: client.list_documents().await,
        },
        Effect::Upload(file) => Event::Uploaded(client.upload_document(&file, progress).await),
        Effect::ResetProgressAfter { generation, delay } => {
            tokio::time::sleep(delay).await;
            Event::ProgressResetElapsed { generation }
        }
        Effect::Summarize(document) => Event::SummaryReceived {
            document,
            result: client.request_summary(document).await,
        },
        Effect::Ask { document, question } => Event::AnswerReceived {
            document,
            result: client.ask_question(document, &question).await,
        },
    }
}
