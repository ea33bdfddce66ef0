//! Caller-facing entry points
//!
//! [`Archiver`] is what a front end (the CLI in this crate) talks to: board
//! lookups, catalog reads and archive sessions. All console formatting happens
//! outside of it.

use crate::api::{
    build_http_client, is_valid_board, Board, CatalogPage, Endpoints, FetchError, Fetcher,
    HttpFetcher, ThreadSnapshot,
};
use crate::config::Config;
use crate::session::{PollSession, SessionConfig, SessionReport};
use crate::{ArchiverError, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Front door to the remote API and the thread archiver
#[derive(Clone)]
pub struct Archiver {
    fetcher: Arc<dyn Fetcher>,
    session_config: SessionConfig,
}

impl Archiver {
    pub fn new(fetcher: Arc<dyn Fetcher>, session_config: SessionConfig) -> Self {
        Self {
            fetcher,
            session_config,
        }
    }

    /// Builds an archiver backed by the HTTP fetcher described by `config`
    ///
    /// # Example
    ///
    /// ```no_run
    /// use chan_archiver::{Archiver, Config};
    ///
    /// # async fn example() -> chan_archiver::Result<()> {
    /// let archiver = Archiver::from_config(&Config::default())?;
    /// let board = archiver.get_board_info("g").await?;
    /// println!("{}", board.title);
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(
            &config.user_agent,
            Duration::from_secs(config.archive.request_timeout),
        )?;
        let endpoints = Endpoints::from_config(&config.api)?;
        let fetcher = HttpFetcher::new(client, endpoints);

        Ok(Self::new(
            Arc::new(fetcher),
            SessionConfig::from(&config.archive),
        ))
    }

    pub fn session_config(&self) -> &SessionConfig {
        &self.session_config
    }

    /// Looks up a board's metadata in the board list
    pub async fn get_board_info(&self, board: &str) -> Result<Board> {
        check_board(board)?;

        let boards = self.fetcher.fetch_boards().await?;
        boards
            .find(board)
            .cloned()
            .ok_or_else(|| ArchiverError::BoardNotFound(board.to_string()))
    }

    /// Reads every catalog page of a board
    pub async fn get_catalog(&self, board: &str) -> Result<Vec<CatalogPage>> {
        check_board(board)?;

        self.fetcher
            .fetch_catalog(board)
            .await
            .map_err(|e| board_not_found(e, board))
    }

    /// Reads the thread numbers in a board's archive
    pub async fn get_archived_threads(&self, board: &str) -> Result<Vec<u64>> {
        check_board(board)?;

        self.fetcher
            .fetch_archive(board)
            .await
            .map_err(|e| board_not_found(e, board))
    }

    /// Reads the current snapshot of a thread without archiving it
    pub async fn get_thread(&self, board: &str, thread: u64) -> Result<ThreadSnapshot> {
        check_board(board)?;

        self.fetcher
            .fetch_thread(board, thread)
            .await
            .map_err(|e| match e {
                e if e.is_not_found() => ArchiverError::ThreadNotFound {
                    board: board.to_string(),
                    thread,
                },
                e => e.into(),
            })
    }

    /// Opens a session without running it
    pub fn open_session(
        &self,
        board: &str,
        thread: u64,
        output_dir: &Path,
        monitor: bool,
    ) -> Result<PollSession> {
        PollSession::open(
            self.fetcher.clone(),
            board,
            thread,
            output_dir,
            monitor,
            self.session_config.clone(),
        )
    }

    /// Archives a thread into `output_dir`
    ///
    /// Performs one cycle, or keeps polling until the thread closes when
    /// `monitor` is set.
    pub async fn start_session(
        &self,
        board: &str,
        thread: u64,
        output_dir: &Path,
        monitor: bool,
    ) -> Result<SessionReport> {
        self.open_session(board, thread, output_dir, monitor)?
            .run()
            .await
    }

    /// Same as [`Archiver::start_session`], stopping early when `stop` is cancelled
    pub async fn start_session_with_cancellation(
        &self,
        board: &str,
        thread: u64,
        output_dir: &Path,
        monitor: bool,
        stop: CancellationToken,
    ) -> Result<SessionReport> {
        self.open_session(board, thread, output_dir, monitor)?
            .with_cancellation(stop)
            .run()
            .await
    }
}

fn check_board(board: &str) -> Result<()> {
    if is_valid_board(board) {
        Ok(())
    } else {
        Err(ArchiverError::InvalidBoard(board.to_string()))
    }
}

fn board_not_found(error: FetchError, board: &str) -> ArchiverError {
    if error.is_not_found() {
        ArchiverError::BoardNotFound(board.to_string())
    } else {
        error.into()
    }
}
