//! Observable progress of a batch run.

use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BatchState {
    #[default]
    Idle,
    Processing,
    Complete,
    Error,
}

/// Snapshot published after every change. `processed` never exceeds `total`
/// and never decreases within a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessingStatus {
    pub processed: usize,
    pub total: usize,
    pub current_item: Option<String>,
    pub state: BatchState,
    pub message: Option<String>,
}

/// Write side of the status channel. Receivers see the latest snapshot.
pub struct StatusReporter {
    tx: watch::Sender<ProcessingStatus>,
}

impl StatusReporter {
    #[must_use]
    pub fn new() -> (Self, watch::Receiver<ProcessingStatus>) {
        let (tx, rx) = watch::channel(ProcessingStatus::default());
        (Self { tx }, rx)
    }

    #[must_use]
    pub fn snapshot(&self) -> ProcessingStatus {
        self.tx.borrow().clone()
    }

    pub fn start(&self, total: usize) {
        self.tx.send_replace(ProcessingStatus {
            processed: 0,
            total,
            current_item: None,
            state: BatchState::Processing,
            message: None,
        });
    }

    pub fn begin_row(&self, identifier: &str) {
        self.tx.send_modify(|s| s.current_item = Some(identifier.to_string()));
    }

    pub fn finish_row(&self) {
        self.tx.send_modify(|s| s.processed = (s.processed + 1).min(s.total));
    }

    pub fn complete(&self, message: impl Into<String>) {
        self.tx.send_modify(|s| {
            s.state = BatchState::Complete;
            s.current_item = None;
            s.message = Some(message.into());
        });
    }

    pub fn fail(&self, message: impl Into<String>) {
        self.tx.send_modify(|s| {
            s.state = BatchState::Error;
            s.current_item = None;
            s.message = Some(message.into());
        });
    }
}
