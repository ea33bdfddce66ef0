//! Poll loop controller - thread archiving orchestration
//!
//! A [`PollSession`] repeats Fetch → Diff → Persist cycles for one thread:
//! - Fetch the thread snapshot
//! - Select the posts the archive has not seen
//! - Download the attachments those posts reference
//! - Append the posts to the record table
//!
//! It stops after one cycle unless monitoring is on, and always stops once
//! the thread is closed. Fetches, attachment downloads and the inter-cycle
//! sleep race a cancellation token; the append never does.

use crate::api::{is_valid_board, FetchError, Fetcher};
use crate::archive::{resolve, thread_dir, ArchiveStore, AttachmentDir, DiffStrategy};
use crate::config::ArchiveConfig;
use crate::session::report::{CycleReport, SessionReport};
use crate::session::state::{SessionState, TerminationReason};
use crate::{ArchiverError, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Tunables for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Time between the end of one cycle and the next fetch
    pub poll_interval: Duration,

    /// Attachment downloads in flight per cycle
    pub max_concurrent_downloads: usize,

    pub diff_strategy: DiffStrategy,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            max_concurrent_downloads: 4,
            diff_strategy: DiffStrategy::default(),
        }
    }
}

impl From<&ArchiveConfig> for SessionConfig {
    fn from(config: &ArchiveConfig) -> Self {
        Self {
            poll_interval: Duration::from_secs(config.poll_interval),
            max_concurrent_downloads: config.max_concurrent_downloads as usize,
            diff_strategy: config.diff_strategy,
        }
    }
}

/// Archiving session for a single thread
pub struct PollSession {
    fetcher: Arc<dyn Fetcher>,
    board: String,
    thread: u64,
    monitor: bool,
    config: SessionConfig,
    store: ArchiveStore,
    attachments: AttachmentDir,
    state: SessionState,
    report: SessionReport,
    cancel: CancellationToken,
}

impl PollSession {
    /// Opens a session and the thread's archive under `output_dir`
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Source of thread snapshots and attachment bytes
    /// * `board` - Board code
    /// * `thread` - Thread number
    /// * `output_dir` - Root under which `{board}_{thread}/` is created
    /// * `monitor` - Keep polling until the thread closes
    /// * `config` - Interval, download concurrency and diff strategy
    ///
    /// # Returns
    ///
    /// * `Ok(PollSession)` - Session in the `Init` state
    /// * `Err(ArchiverError)` - Invalid board code or unreadable archive
    pub fn open(
        fetcher: Arc<dyn Fetcher>,
        board: &str,
        thread: u64,
        output_dir: &Path,
        monitor: bool,
        config: SessionConfig,
    ) -> Result<Self> {
        if !is_valid_board(board) {
            return Err(ArchiverError::InvalidBoard(board.to_string()));
        }

        let store = ArchiveStore::open(&thread_dir(output_dir, board, thread))?;
        let attachments = AttachmentDir::new(store.attachments_dir());

        Ok(Self {
            fetcher,
            board: board.to_string(),
            thread,
            monitor,
            config,
            store,
            attachments,
            state: SessionState::Init,
            report: SessionReport::new(board, thread),
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the session's stop signal
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the session when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn store(&self) -> &ArchiveStore {
        &self.store
    }

    pub fn report(&self) -> &SessionReport {
        &self.report
    }

    /// Performs one Fetch → Diff → Persist cycle and applies the transition
    ///
    /// Returns `Ok(None)` without doing anything once the session has
    /// terminated, and `Ok(None)` when this call terminated it without
    /// completing a cycle (cancellation, or a fetch failure after the initial
    /// cycle). A fetch failure on the initial cycle is returned as an error.
    pub async fn step(&mut self) -> Result<Option<CycleReport>> {
        if self.state.is_terminated() {
            return Ok(None);
        }

        let fetched = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            result = self.fetcher.fetch_thread(&self.board, self.thread) => Some(result),
        };

        let snapshot = match fetched {
            None => {
                tracing::info!(
                    board = %self.board,
                    thread = self.thread,
                    "Stop requested during fetch"
                );
                self.terminate(TerminationReason::Cancelled);
                return Ok(None);
            }
            Some(Ok(snapshot)) => snapshot,
            Some(Err(e)) => return self.fetch_failed(e),
        };

        let new_posts = self.config.diff_strategy.new_posts(
            self.store.current_count(),
            self.store.known_ids(),
            &snapshot.posts,
        );

        // Attachments land before the append; a crash in between re-diffs
        // these posts on the next run.
        let references = new_posts
            .iter()
            .filter_map(|post| resolve(post, &self.board))
            .collect();
        let downloads = self.attachments.materialize_all(
            self.fetcher.as_ref(),
            references,
            self.config.max_concurrent_downloads,
        );
        let attachments = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => None,
            outcomes = downloads => Some(outcomes),
        };

        // Nothing has been appended yet; completed attachments stay on disk
        let Some(attachments) = attachments else {
            tracing::info!(
                board = %self.board,
                thread = self.thread,
                "Stop requested during attachment downloads"
            );
            self.terminate(TerminationReason::Cancelled);
            return Ok(None);
        };

        if !new_posts.is_empty() {
            if let Err(e) = self.store.append(&new_posts) {
                tracing::error!(
                    board = %self.board,
                    thread = self.thread,
                    "Failed to persist posts: {}",
                    e
                );
                self.terminate(TerminationReason::StoreFailed(e.to_string()));
                return Err(e.into());
            }
        }

        let cycle = CycleReport {
            cycle: self.report.cycles + 1,
            fetched: snapshot.len(),
            new_posts: new_posts.len(),
            attachments,
            closed: snapshot.is_closed(),
        };
        self.report.record(&cycle);

        tracing::info!(
            board = %self.board,
            thread = self.thread,
            cycle = cycle.cycle,
            fetched = cycle.fetched,
            new_posts = cycle.new_posts,
            downloaded = cycle.downloaded(),
            failed = cycle.failed(),
            archived = self.store.current_count(),
            "Cycle complete"
        );

        if cycle.closed {
            tracing::info!(board = %self.board, thread = self.thread, "Thread is closed");
            self.terminate(TerminationReason::ThreadClosed);
        } else if !self.monitor {
            self.terminate(TerminationReason::SingleShot);
        } else {
            self.state = SessionState::Polling;
        }

        Ok(Some(cycle))
    }

    /// Runs cycles until the session terminates
    ///
    /// Sleeps `poll_interval` between cycles. Cancelling the token while
    /// fetching or sleeping ends the session with
    /// [`TerminationReason::Cancelled`].
    pub async fn run(mut self) -> Result<SessionReport> {
        tracing::info!(
            board = %self.board,
            thread = self.thread,
            monitor = self.monitor,
            archived = self.store.current_count(),
            "Starting archive session"
        );

        loop {
            self.step().await?;
            if self.state.is_terminated() {
                break;
            }

            let cancelled = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => true,
                _ = tokio::time::sleep(self.config.poll_interval) => false,
            };
            if cancelled {
                tracing::info!(
                    board = %self.board,
                    thread = self.thread,
                    "Stop requested while waiting"
                );
                self.terminate(TerminationReason::Cancelled);
                break;
            }
        }

        tracing::info!(
            board = %self.board,
            thread = self.thread,
            cycles = self.report.cycles,
            posts = self.report.posts_archived,
            "Session finished: {}",
            self.state
        );

        Ok(self.report)
    }

    fn fetch_failed(&mut self, error: FetchError) -> Result<Option<CycleReport>> {
        let initial = self.state == SessionState::Init;
        self.terminate(TerminationReason::FetchFailed(error.to_string()));

        if !initial {
            tracing::warn!(board = %self.board, thread = self.thread, "Ending session: {}", error);
            return Ok(None);
        }

        tracing::error!(
            board = %self.board,
            thread = self.thread,
            "Initial fetch failed: {}",
            error
        );
        if error.is_not_found() {
            return Err(ArchiverError::ThreadNotFound {
                board: self.board.clone(),
                thread: self.thread,
            });
        }
        Err(error.into())
    }

    fn terminate(&mut self, reason: TerminationReason) {
        self.report.termination = Some(reason.clone());
        self.state = SessionState::Terminated(reason);
    }
}
