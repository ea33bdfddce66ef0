//! Structured results of poll cycles and sessions
//!
//! These are what the display layer consumes; nothing here prints.

use crate::archive::AttachmentOutcome;
use crate::session::state::TerminationReason;

/// Outcome of one Fetch → Diff → Persist cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleReport {
    /// 1-based cycle number within the session
    pub cycle: u64,

    /// Posts in the fetched snapshot
    pub fetched: usize,

    /// Posts appended to the archive this cycle
    pub new_posts: usize,

    /// One entry per attachment referenced by a new post
    pub attachments: Vec<AttachmentOutcome>,

    /// Whether the snapshot's first post was flagged closed
    pub closed: bool,
}

impl CycleReport {
    pub fn downloaded(&self) -> usize {
        self.attachments
            .iter()
            .filter(|a| matches!(a, AttachmentOutcome::Downloaded { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.attachments
            .iter()
            .filter(|a| matches!(a, AttachmentOutcome::AlreadyPresent { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.attachments.iter().filter(|a| a.is_failure()).count()
    }
}

/// Totals for a whole session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReport {
    pub board: String,
    pub thread: u64,
    pub cycles: u64,
    pub posts_archived: usize,
    pub attachments_downloaded: usize,
    pub attachments_skipped: usize,
    pub attachments_failed: usize,

    /// Filenames of attachments that could not be saved
    pub failed_attachments: Vec<String>,

    /// Set once the session has terminated
    pub termination: Option<TerminationReason>,
}

impl SessionReport {
    pub fn new(board: &str, thread: u64) -> Self {
        Self {
            board: board.to_string(),
            thread,
            cycles: 0,
            posts_archived: 0,
            attachments_downloaded: 0,
            attachments_skipped: 0,
            attachments_failed: 0,
            failed_attachments: Vec::new(),
            termination: None,
        }
    }

    /// Folds one cycle into the totals
    pub fn record(&mut self, cycle: &CycleReport) {
        self.cycles += 1;
        self.posts_archived += cycle.new_posts;
        self.attachments_downloaded += cycle.downloaded();
        self.attachments_skipped += cycle.skipped();
        self.attachments_failed += cycle.failed();
        self.failed_attachments.extend(
            cycle
                .attachments
                .iter()
                .filter(|a| a.is_failure())
                .map(|a| a.filename().to_string()),
        );
    }
}
