//! Application state and the transitions that drive it.
//!
//! Every user action and every backend response is an [`Event`]. Feeding one
//! to [`AppState::apply`] yields the next state plus the [`Effect`]s the
//! runtime should perform. Nothing here touches the network.

use std::path::PathBuf;
use std::time::Duration;

use crate::api::{ApiError, UploadReceipt};
use crate::document::{self, Document, DocumentId, PendingFile};
use crate::upload::{TransferProgress, UploadPhase};

/// The one backend operation allowed in flight at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Upload,
    Summarize,
    Ask,
}

impl Operation {
    pub fn label(self) -> &'static str {
        match self {
            Operation::Upload => "Uploading...",
            Operation::Summarize => "Summarizing...",
            Operation::Ask => "Thinking about your question...",
        }
    }
}

/// Why the document list is being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrigin {
    Startup,
    AfterUpload,
}

#[derive(Debug, Clone)]
pub enum Event {
    DocumentsLoaded {
        origin: ListOrigin,
        result: Result<Vec<Document>, ApiError>,
    },
    SelectDocument(Option<DocumentId>),
    DragEntered,
    DragLeft,
    FileDropped(PathBuf),
    PickerPathChanged(String),
    PickerSubmitted,
    RemoveFile,
    ConfirmUpload,
    UploadProgressed(TransferProgress),
    Uploaded(Result<UploadReceipt, ApiError>),
    ProgressResetElapsed {
        generation: u64,
    },
    Summarize,
    SummaryReceived {
        document: DocumentId,
        result: Result<String, ApiError>,
    },
    QuestionChanged(String),
    Ask,
    AnswerReceived {
        document: DocumentId,
        result: Result<String, ApiError>,
    },
}

/// Work the runtime performs on behalf of a transition.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    ListDocuments(ListOrigin),
    Upload(PendingFile),
    ResetProgressAfter { generation: u64, delay: Duration },
    Summarize(DocumentId),
    Ask { document: DocumentId, question: String },
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub accepted_extensions: Vec<String>,
    pub progress_reset: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            accepted_extensions: vec!["pdf".to_string()],
            progress_reset: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    settings: Settings,
    pub documents: Vec<Document>,
    pub active: Option<Document>,
    pub summary: String,
    pub answer: String,
    pub question: String,
    pub in_flight: Option<Operation>,
    pub error: Option<String>,
    pub notice: Option<String>,
    pub upload_phase: UploadPhase,
    pub upload_progress: u8,
    pub pending_file: Option<PendingFile>,
    pub picker_input: String,
    pub drag_active: bool,
    // Set once a file from the current drop burst has been taken. Any other
    // event ends the burst.
    drop_landed: bool,
    upload_generation: u64,
}

impl AppState {
    /// Fresh state plus the startup fetch of the document list.
    pub fn init(settings: Settings) -> (Self, Vec<Effect>) {
        let state = AppState {
            settings,
            ..AppState::default()
        };
        (state, vec![Effect::ListDocuments(ListOrigin::Startup)])
    }

    pub fn apply(mut self, event: Event) -> (Self, Vec<Effect>) {
        let effects = self.handle(event);
        (self, effects)
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active.as_ref().map(|d| d.id)
    }

    pub fn can_summarize(&self) -> bool {
        self.active.is_some() && !self.is_loading()
    }

    pub fn can_ask(&self) -> bool {
        self.active.is_some() && !self.question.trim().is_empty() && !self.is_loading()
    }

    pub fn can_upload(&self) -> bool {
        self.pending_file.is_some() && !self.is_loading()
    }

    pub fn can_choose_file(&self) -> bool {
        self.upload_phase != UploadPhase::Uploading
    }

    fn handle(&mut self, event: Event) -> Vec<Effect> {
        if !matches!(event, Event::FileDropped(_)) {
            self.drop_landed = false;
        }
        match event {
            Event::DocumentsLoaded { origin, result } => {
                self.documents_loaded(origin, result);
                vec![]
            }
            Event::SelectDocument(id) => {
                self.select(id);
                vec![]
            }
            Event::DragEntered => {
                self.drag_active = true;
                vec![]
            }
            Event::DragLeft => {
                self.drag_active = false;
                vec![]
            }
            Event::FileDropped(path) => {
                self.drag_active = false;
                // Multi-file drops arrive one path at a time; keep the first.
                if !self.drop_landed {
                    self.drop_landed = true;
                    self.choose_file(PendingFile::from_path(path));
                }
                vec![]
            }
            Event::PickerPathChanged(value) => {
                self.picker_input = value;
                vec![]
            }
            Event::PickerSubmitted => {
                self.picker_submitted();
                vec![]
            }
            Event::RemoveFile => {
                if !self.is_loading() && self.pending_file.take().is_some() {
                    self.upload_phase = UploadPhase::Idle;
                }
                vec![]
            }
            Event::ConfirmUpload => self.confirm_upload(),
            Event::UploadProgressed(progress) => {
                if self.upload_phase == UploadPhase::Uploading {
                    if let Some(percent) = progress.percent() {
                        self.upload_progress = percent;
                    }
                }
                vec![]
            }
            Event::Uploaded(result) => self.uploaded(result),
            Event::ProgressResetElapsed { generation } => {
                if generation == self.upload_generation && self.upload_phase != UploadPhase::Uploading {
                    self.upload_progress = 0;
                    if self.upload_phase == UploadPhase::Done {
                        self.upload_phase = UploadPhase::Idle;
                    }
                }
                vec![]
            }
            Event::Summarize => self.summarize(),
            Event::SummaryReceived { document, result } => {
                self.finish(Operation::Summarize);
                if self.is_stale(document, "summary") {
                    return vec![];
                }
                match result {
                    Ok(text) => self.summary = text,
                    Err(e) => {
                        self.summary.clear();
                        self.error = Some(e.to_string());
                    }
                }
                vec![]
            }
            Event::QuestionChanged(value) => {
                self.question = value;
                vec![]
            }
            Event::Ask => self.ask(),
            Event::AnswerReceived { document, result } => {
                self.finish(Operation::Ask);
                if self.is_stale(document, "answer") {
                    return vec![];
                }
                match result {
                    Ok(text) => self.answer = text,
                    Err(e) => {
                        self.answer.clear();
                        self.error = Some(e.to_string());
                    }
                }
                vec![]
            }
        }
    }

    /// The only place the active selection changes. Summary and answer belong
    /// to the previous document, so they go with it.
    fn select(&mut self, id: Option<DocumentId>) {
        let next = id.and_then(|id| self.documents.iter().find(|d| d.id == id).cloned());
        if next.as_ref().map(|d| d.id) == self.active_id() {
            return;
        }
        tracing::debug!(from = ?self.active_id(), to = ?next.as_ref().map(|d| d.id), "selection changed");
        self.active = next;
        self.summary.clear();
        self.answer.clear();
    }

    fn documents_loaded(&mut self, origin: ListOrigin, result: Result<Vec<Document>, ApiError>) {
        if origin == ListOrigin::AfterUpload {
            self.finish(Operation::Upload);
        }

        match result {
            Ok(documents) => {
                self.documents = documents;
                if let Some(id) = self.active_id() {
                    match self.documents.iter().find(|d| d.id == id) {
                        Some(doc) => self.active = Some(doc.clone()),
                        None => self.select(None),
                    }
                }
            }
            Err(e) => match origin {
                ListOrigin::Startup => {
                    tracing::warn!(error = %e, "could not load document list at startup");
                }
                ListOrigin::AfterUpload => self.error = Some(e.to_string()),
            },
        }
    }

    fn choose_file(&mut self, file: PendingFile) {
        if !self.can_choose_file() {
            tracing::debug!(file = %file.name, "ignoring file while an upload is running");
            return;
        }
        tracing::debug!(file = %file.name, "file selected");
        self.pending_file = Some(file);
        self.upload_phase = UploadPhase::Selected;
        self.error = None;
        self.notice = None;
    }

    fn picker_submitted(&mut self) {
        let raw = self.picker_input.trim();
        if raw.is_empty() {
            return;
        }
        let path = PathBuf::from(raw);
        if !document::accepts(&path, &self.settings.accepted_extensions) {
            let name = PendingFile::from_path(&path).name;
            self.notice = Some(format!("{} is not a PDF", name));
            return;
        }
        if self.can_choose_file() {
            self.picker_input.clear();
            self.choose_file(PendingFile::from_path(path));
        }
    }

    fn confirm_upload(&mut self) -> Vec<Effect> {
        if !self.can_upload() {
            return vec![];
        }
        let Some(file) = self.pending_file.clone() else {
            return vec![];
        };
        self.error = None;
        self.notice = None;
        self.in_flight = Some(Operation::Upload);
        self.upload_phase = UploadPhase::Uploading;
        self.upload_progress = 0;
        self.upload_generation += 1;
        vec![Effect::Upload(file)]
    }

    fn uploaded(&mut self, result: Result<UploadReceipt, ApiError>) -> Vec<Effect> {
        if self.upload_phase != UploadPhase::Uploading {
            return vec![];
        }
        match result {
            Ok(receipt) => {
                let name = self
                    .pending_file
                    .take()
                    .map(|f| f.name)
                    .unwrap_or_else(|| receipt.pdf_id.to_string());
                self.upload_progress = 100;
                self.upload_phase = UploadPhase::Done;
                self.notice = Some(format!("Uploaded {}", name));
                // Upload stays in flight until the refreshed list lands.
                vec![
                    Effect::ListDocuments(ListOrigin::AfterUpload),
                    Effect::ResetProgressAfter {
                        generation: self.upload_generation,
                        delay: self.settings.progress_reset,
                    },
                ]
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.finish(Operation::Upload);
                self.upload_phase = UploadPhase::Selected;
                vec![]
            }
        }
    }

    fn summarize(&mut self) -> Vec<Effect> {
        if !self.can_summarize() {
            return vec![];
        }
        let Some(id) = self.active_id() else {
            return vec![];
        };
        self.error = None;
        self.notice = None;
        self.summary.clear();
        self.in_flight = Some(Operation::Summarize);
        vec![Effect::Summarize(id)]
    }

    fn ask(&mut self) -> Vec<Effect> {
        if !self.can_ask() {
            return vec![];
        }
        let Some(id) = self.active_id() else {
            return vec![];
        };
        self.error = None;
        self.notice = None;
        self.answer.clear();
        self.in_flight = Some(Operation::Ask);
        vec![Effect::Ask {
            document: id,
            question: self.question.clone(),
        }]
    }

    fn finish(&mut self, operation: Operation) {
        if self.in_flight == Some(operation) {
            self.in_flight = None;
        }
    }

    fn is_stale(&self, document: DocumentId, what: &str) -> bool {
        let stale = self.active_id() != Some(document);
        if stale {
            tracing::debug!(%document, active = ?self.active_id(), "discarding late {}", what);
        }
        stale
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs() -> Vec<Document> {
        vec![Document::new(1, "a.pdf"), Document::new(2, "b.pdf")]
    }

    fn loaded() -> AppState {
        let (state, _) = AppState::init(Settings::default());
        step(state, Event::DocumentsLoaded {
            origin: ListOrigin::Startup,
            result: Ok(docs()),
        })
        .0
    }

    fn step(state: AppState, event: Event) -> (AppState, Vec<Effect>) {
        state.apply(event)
    }

    fn with_selection(id: u64) -> AppState {
        step(loaded(), Event::SelectDocument(Some(DocumentId(id)))).0
    }

    fn with_pending_file() -> AppState {
        step(loaded(), Event::FileDropped(PathBuf::from("/tmp/report.pdf"))).0
    }

    #[test]
    fn init_requests_document_list() {
        let (state, effects) = AppState::init(Settings::default());
        assert!(state.documents.is_empty());
        assert_eq!(effects, vec![Effect::ListDocuments(ListOrigin::Startup)]);
    }

    #[test]
    fn startup_list_failure_is_silent() {
        let (state, _) = AppState::init(Settings::default());
        let (state, _) = step(state, Event::DocumentsLoaded {
            origin: ListOrigin::Startup,
            result: Err(ApiError::Fetch("server returned 500".into())),
        });
        assert!(state.documents.is_empty());
        assert_eq!(state.error, None);
    }

    // ── selection ──────────────────────────────────────────────

    #[test]
    fn switching_documents_clears_summary_and_answer() {
        let mut state = with_selection(1);
        state.summary = "summary of a".into();
        state.answer = "answer about a".into();

        let (state, effects) = step(state, Event::SelectDocument(Some(DocumentId(2))));

        assert!(effects.is_empty());
        assert_eq!(state.active_id(), Some(DocumentId(2)));
        assert!(state.summary.is_empty());
        assert!(state.answer.is_empty());
    }

    #[test]
    fn clearing_selection_clears_results() {
        let mut state = with_selection(1);
        state.summary = "s".into();
        state.answer = "a".into();

        let (state, _) = step(state, Event::SelectDocument(None));

        assert_eq!(state.active, None);
        assert!(state.summary.is_empty());
        assert!(state.answer.is_empty());
    }

    #[test]
    fn unknown_identifier_selects_nothing() {
        let (state, _) = step(with_selection(1), Event::SelectDocument(Some(DocumentId(99))));
        assert_eq!(state.active, None);
    }

    #[test]
    fn reselecting_same_document_keeps_results() {
        let mut state = with_selection(1);
        state.summary = "kept".into();
        let (state, _) = step(state, Event::SelectDocument(Some(DocumentId(1))));
        assert_eq!(state.summary, "kept");
    }

    #[test]
    fn refresh_drops_selection_that_vanished() {
        let mut state = with_selection(2);
        state.summary = "s".into();
        let (state, _) = step(state, Event::DocumentsLoaded {
            origin: ListOrigin::Startup,
            result: Ok(vec![Document::new(1, "a.pdf")]),
        });
        assert_eq!(state.active, None);
        assert!(state.summary.is_empty());
    }

    // ── drag and drop / picker ─────────────────────────────────

    #[test]
    fn drag_flag_follows_gesture() {
        let (state, _) = step(loaded(), Event::DragEntered);
        assert!(state.drag_active);
        let (state, _) = step(state, Event::DragLeft);
        assert!(!state.drag_active);
        let (state, _) = step(state, Event::DragEntered);
        let (state, _) = step(state, Event::FileDropped(PathBuf::from("/tmp/x.pdf")));
        assert!(!state.drag_active);
    }

    #[test]
    fn multi_file_drop_keeps_first_file() {
        let (state, _) = step(loaded(), Event::DragEntered);
        let (state, _) = step(state, Event::FileDropped(PathBuf::from("/tmp/first.pdf")));
        let (state, _) = step(state, Event::FileDropped(PathBuf::from("/tmp/second.pdf")));
        assert_eq!(state.pending_file.unwrap().name, "first.pdf");
    }

    #[test]
    fn next_drag_gesture_can_replace_file() {
        let (state, _) = step(with_pending_file(), Event::DragEntered);
        let (state, _) = step(state, Event::FileDropped(PathBuf::from("/tmp/other.pdf")));
        assert_eq!(state.pending_file.unwrap().name, "other.pdf");
    }

    #[test]
    fn choosing_file_clears_error() {
        let mut state = loaded();
        state.error = Some("Upload failed: boom".into());
        let (state, _) = step(state, Event::FileDropped(PathBuf::from("/tmp/report.pdf")));
        assert_eq!(state.error, None);
        assert_eq!(state.upload_phase, UploadPhase::Selected);
    }

    #[test]
    fn picker_applies_accept_filter() {
        let (state, _) = step(loaded(), Event::PickerPathChanged("/tmp/notes.docx".into()));
        let (state, _) = step(state, Event::PickerSubmitted);
        assert_eq!(state.pending_file, None);
        assert_eq!(state.notice.as_deref(), Some("notes.docx is not a PDF"));

        let (state, _) = step(state, Event::PickerPathChanged("  /tmp/Report.PDF ".into()));
        let (state, _) = step(state, Event::PickerSubmitted);
        assert_eq!(state.pending_file.unwrap().name, "Report.PDF");
        assert!(state.picker_input.is_empty());
    }

    #[test]
    fn remove_file_returns_to_idle() {
        let (state, _) = step(with_pending_file(), Event::RemoveFile);
        assert_eq!(state.pending_file, None);
        assert_eq!(state.upload_phase, UploadPhase::Idle);
    }

    // ── upload ─────────────────────────────────────────────────

    #[test]
    fn confirm_without_file_is_noop() {
        let (state, effects) = step(loaded(), Event::ConfirmUpload);
        assert!(effects.is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn confirm_starts_upload_once() {
        let (state, effects) = step(with_pending_file(), Event::ConfirmUpload);
        assert_eq!(effects, vec![Effect::Upload(PendingFile::from_path("/tmp/report.pdf"))]);
        assert_eq!(state.in_flight, Some(Operation::Upload));
        assert_eq!(state.upload_phase, UploadPhase::Uploading);

        let (state, effects) = step(state, Event::ConfirmUpload);
        assert!(effects.is_empty());
        assert_eq!(state.upload_phase, UploadPhase::Uploading);
    }

    #[test]
    fn files_are_ignored_while_uploading() {
        let (state, _) = step(with_pending_file(), Event::ConfirmUpload);
        let (state, _) = step(state, Event::DragEntered);
        let (state, _) = step(state, Event::FileDropped(PathBuf::from("/tmp/late.pdf")));
        assert_eq!(state.pending_file.unwrap().name, "report.pdf");
    }

    #[test]
    fn progress_tracks_transfer() {
        let (state, _) = step(with_pending_file(), Event::ConfirmUpload);
        let (state, _) = step(state, Event::UploadProgressed(TransferProgress {
            sent: 50,
            total: Some(200),
        }));
        assert_eq!(state.upload_progress, 25);

        // Unknown length leaves the last reported value alone.
        let (state, _) = step(state, Event::UploadProgressed(TransferProgress {
            sent: 150,
            total: None,
        }));
        assert_eq!(state.upload_progress, 25);
    }

    #[test]
    fn successful_upload_clears_file_and_refreshes() {
        let (state, _) = step(with_pending_file(), Event::ConfirmUpload);
        let (state, effects) = step(state, Event::Uploaded(Ok(UploadReceipt {
            pdf_id: DocumentId(3),
            chunks: None,
        })));

        assert_eq!(state.upload_progress, 100);
        assert_eq!(state.pending_file, None);
        assert_eq!(state.upload_phase, UploadPhase::Done);
        assert_eq!(state.in_flight, Some(Operation::Upload));
        assert_eq!(effects, vec![
            Effect::ListDocuments(ListOrigin::AfterUpload),
            Effect::ResetProgressAfter {
                generation: 1,
                delay: Duration::from_millis(1000),
            },
        ]);

        let mut refreshed = docs();
        refreshed.push(Document::new(3, "report.pdf"));
        let (state, _) = step(state, Event::DocumentsLoaded {
            origin: ListOrigin::AfterUpload,
            result: Ok(refreshed),
        });
        assert!(!state.is_loading());
        assert!(state.documents.iter().any(|d| d.filename == "report.pdf"));
        assert_eq!(state.notice.as_deref(), Some("Uploaded report.pdf"));

        let (state, _) = step(state, Event::ProgressResetElapsed { generation: 1 });
        assert_eq!(state.upload_progress, 0);
        assert_eq!(state.upload_phase, UploadPhase::Idle);
    }

    #[test]
    fn failed_upload_keeps_file_and_collection() {
        let before = with_pending_file();
        let documents = before.documents.clone();
        let (state, _) = step(before, Event::ConfirmUpload);
        let (state, _) = step(state, Event::UploadProgressed(TransferProgress {
            sent: 10,
            total: Some(100),
        }));
        let (state, effects) = step(state, Event::Uploaded(Err(ApiError::Upload(
            "server returned 500 Internal Server Error".into(),
        ))));

        assert!(effects.is_empty());
        assert_eq!(state.documents, documents);
        assert_eq!(state.pending_file.as_ref().unwrap().name, "report.pdf");
        assert_eq!(state.upload_phase, UploadPhase::Selected);
        assert_eq!(state.upload_progress, 10);
        assert!(!state.is_loading());
        assert_eq!(
            state.error.as_deref(),
            Some("Upload failed: server returned 500 Internal Server Error")
        );
    }

    #[test]
    fn refresh_failure_after_upload_is_reported() {
        let (state, _) = step(with_pending_file(), Event::ConfirmUpload);
        let (state, _) = step(state, Event::Uploaded(Ok(UploadReceipt {
            pdf_id: DocumentId(3),
            chunks: None,
        })));
        let (state, _) = step(state, Event::DocumentsLoaded {
            origin: ListOrigin::AfterUpload,
            result: Err(ApiError::Fetch("server returned 502 Bad Gateway".into())),
        });
        assert!(!state.is_loading());
        assert_eq!(state.documents, docs());
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to fetch PDFs: server returned 502 Bad Gateway")
        );
    }

    #[test]
    fn stale_reset_timer_leaves_newer_upload_alone() {
        let (state, _) = step(with_pending_file(), Event::ConfirmUpload);
        let (state, _) = step(state, Event::Uploaded(Ok(UploadReceipt {
            pdf_id: DocumentId(3),
            chunks: None,
        })));
        let (state, _) = step(state, Event::DocumentsLoaded {
            origin: ListOrigin::AfterUpload,
            result: Ok(docs()),
        });
        let (state, _) = step(state, Event::FileDropped(PathBuf::from("/tmp/next.pdf")));
        let (state, _) = step(state, Event::ConfirmUpload);
        let (state, _) = step(state, Event::UploadProgressed(TransferProgress {
            sent: 3,
            total: Some(4),
        }));

        let (state, _) = step(state, Event::ProgressResetElapsed { generation: 1 });
        assert_eq!(state.upload_progress, 75);
        assert_eq!(state.upload_phase, UploadPhase::Uploading);
    }

    // ── summarize ──────────────────────────────────────────────

    #[test]
    fn summarize_without_selection_is_noop() {
        let (state, effects) = step(loaded(), Event::Summarize);
        assert!(effects.is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn summarize_twice_emits_one_request() {
        let (state, first) = step(with_selection(1), Event::Summarize);
        let (state, second) = step(state, Event::Summarize);
        assert_eq!(first, vec![Effect::Summarize(DocumentId(1))]);
        assert!(second.is_empty());
        assert_eq!(state.in_flight, Some(Operation::Summarize));
    }

    #[test]
    fn summary_success_is_stored() {
        let (state, _) = step(with_selection(1), Event::Summarize);
        let (state, _) = step(state, Event::SummaryReceived {
            document: DocumentId(1),
            result: Ok("X".into()),
        });
        assert_eq!(state.summary, "X");
        assert!(!state.is_loading());
        assert_eq!(state.error, None);
    }

    #[test]
    fn summary_failure_sets_error_and_clears_text() {
        let mut state = with_selection(1);
        state.summary = "old".into();
        let (state, _) = step(state, Event::Summarize);
        assert!(state.summary.is_empty());
        let (state, _) = step(state, Event::SummaryReceived {
            document: DocumentId(1),
            result: Err(ApiError::Summarize("server returned 500 Internal Server Error".into())),
        });
        assert!(state.summary.is_empty());
        assert!(!state.is_loading());
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to summarize: server returned 500 Internal Server Error")
        );
    }

    #[test]
    fn late_summary_for_previous_document_is_discarded() {
        let (state, _) = step(with_selection(1), Event::Summarize);
        let (state, _) = step(state, Event::SelectDocument(Some(DocumentId(2))));
        let (state, _) = step(state, Event::SummaryReceived {
            document: DocumentId(1),
            result: Ok("about a.pdf".into()),
        });
        assert!(state.summary.is_empty());
        assert!(!state.is_loading());
        assert_eq!(state.active_id(), Some(DocumentId(2)));
    }

    #[test]
    fn late_failure_for_previous_document_is_discarded() {
        let (state, _) = step(with_selection(1), Event::Summarize);
        let (state, _) = step(state, Event::SelectDocument(None));
        let (state, _) = step(state, Event::SummaryReceived {
            document: DocumentId(1),
            result: Err(ApiError::Summarize("boom".into())),
        });
        assert_eq!(state.error, None);
        assert!(!state.is_loading());
    }

    #[test]
    fn new_operation_clears_previous_error() {
        let mut state = with_selection(1);
        state.error = Some("Failed to get answer: boom".into());
        let (state, _) = step(state, Event::Summarize);
        assert_eq!(state.error, None);
    }

    // ── ask ────────────────────────────────────────────────────

    #[test]
    fn ask_without_selection_makes_no_request() {
        let (state, _) = step(loaded(), Event::QuestionChanged("Why?".into()));
        let (state, effects) = step(state, Event::Ask);
        assert!(effects.is_empty());
        assert!(!state.is_loading());
    }

    #[test]
    fn ask_with_blank_question_makes_no_request() {
        let (state, _) = step(with_selection(1), Event::QuestionChanged("   ".into()));
        let (_, effects) = step(state, Event::Ask);
        assert!(effects.is_empty());
    }

    #[test]
    fn ask_is_not_reentrant() {
        let (state, _) = step(with_selection(1), Event::QuestionChanged("Why?".into()));
        let (state, first) = step(state, Event::Ask);
        let (_, second) = step(state, Event::Ask);
        assert_eq!(first, vec![Effect::Ask {
            document: DocumentId(1),
            question: "Why?".into(),
        }]);
        assert!(second.is_empty());
    }

    #[test]
    fn one_operation_at_a_time() {
        let (state, _) = step(with_selection(1), Event::QuestionChanged("Why?".into()));
        let (state, _) = step(state, Event::Summarize);
        let (state, effects) = step(state, Event::Ask);
        assert!(effects.is_empty());
        assert_eq!(state.in_flight, Some(Operation::Summarize));
    }

    #[test]
    fn answer_lifecycle_mirrors_summary() {
        let (state, _) = step(with_selection(2), Event::QuestionChanged("Who wrote it?".into()));
        let (state, _) = step(state, Event::Ask);
        let (state, _) = step(state, Event::AnswerReceived {
            document: DocumentId(2),
            result: Ok("Someone.".into()),
        });
        assert_eq!(state.answer, "Someone.");
        assert!(!state.is_loading());

        let (state, _) = step(state, Event::Ask);
        let (state, _) = step(state, Event::AnswerReceived {
            document: DocumentId(2),
            result: Err(ApiError::Qa("server returned 500 Internal Server Error".into())),
        });
        assert!(state.answer.is_empty());
        assert!(state.error.unwrap().starts_with("Failed to get answer"));
    }

    #[test]
    fn late_answer_for_previous_document_is_discarded() {
        let (state, _) = step(with_selection(1), Event::QuestionChanged("Why?".into()));
        let (state, _) = step(state, Event::Ask);
        let (state, _) = step(state, Event::SelectDocument(Some(DocumentId(2))));
        let (state, _) = step(state, Event::AnswerReceived {
            document: DocumentId(1),
            result: Ok("about a.pdf".into()),
        });
        assert!(state.answer.is_empty());
        assert!(!state.is_loading());
    }
}
