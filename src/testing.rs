//! In-memory fetcher for unit tests

use crate::api::{BoardList, CatalogPage, FetchError, FetchResult, Fetcher, Post, ThreadSnapshot};
use crate::archive::AttachmentRef;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// One scripted answer to a thread fetch
#[derive(Debug, Clone)]
pub enum ThreadStep {
    Snapshot(ThreadSnapshot),
    NotFound,
    ServerError,
}

/// Serves scripted thread snapshots and synthetic attachment bytes
///
/// Thread fetches pop the script front to back; once only one step is left it
/// is repeated. Attachment bodies are the filename's bytes.
#[derive(Default)]
pub struct ScriptedFetcher {
    boards: BoardList,
    catalog: Vec<CatalogPage>,
    archive: Vec<u64>,
    script: Mutex<VecDeque<ThreadStep>>,
    failing_attachments: Vec<String>,
    stall_attachments: bool,
    thread_calls: AtomicUsize,
    attachment_calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new(script: Vec<ThreadStep>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            ..Default::default()
        }
    }

    pub fn with_boards(mut self, boards: BoardList) -> Self {
        self.boards = boards;
        self
    }

    pub fn with_catalog(mut self, catalog: Vec<CatalogPage>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_archive(mut self, archive: Vec<u64>) -> Self {
        self.archive = archive;
        self
    }

    pub fn failing(mut self, filenames: &[&str]) -> Self {
        self.failing_attachments = filenames.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Attachment fetches never complete
    pub fn stalling(mut self) -> Self {
        self.stall_attachments = true;
        self
    }

    pub fn thread_calls(&self) -> usize {
        self.thread_calls.load(Ordering::SeqCst)
    }

    pub fn attachment_calls(&self) -> usize {
        self.attachment_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetcher for ScriptedFetcher {
    async fn fetch_boards(&self) -> FetchResult<BoardList> {
        Ok(self.boards.clone())
    }

    async fn fetch_catalog(&self, board: &str) -> FetchResult<Vec<CatalogPage>> {
        if self.catalog.is_empty() {
            return Err(FetchError::NotFound {
                url: format!("/{}/catalog.json", board),
            });
        }
        Ok(self.catalog.clone())
    }

    async fn fetch_archive(&self, _board: &str) -> FetchResult<Vec<u64>> {
        Ok(self.archive.clone())
    }

    async fn fetch_thread(&self, board: &str, thread: u64) -> FetchResult<ThreadSnapshot> {
        self.thread_calls.fetch_add(1, Ordering::SeqCst);
        let step = {
            let mut script = self.script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        let url = format!("/{}/thread/{}.json", board, thread);
        match step {
            Some(ThreadStep::Snapshot(snapshot)) => Ok(snapshot),
            Some(ThreadStep::NotFound) | None => Err(FetchError::NotFound { url }),
            Some(ThreadStep::ServerError) => Err(FetchError::Status { url, status: 500 }),
        }
    }

    async fn fetch_attachment(&self, attachment: &AttachmentRef) -> FetchResult<Vec<u8>> {
        self.attachment_calls.fetch_add(1, Ordering::SeqCst);
        if self.stall_attachments {
            std::future::pending::<()>().await;
        }

        let filename = attachment.filename();

        if self.failing_attachments.contains(&filename) {
            return Err(FetchError::Status {
                url: filename,
                status: 503,
            });
        }
        Ok(filename.into_bytes())
    }
}

/// Builds a thread of `len` posts numbered from 100; every third post has an image
pub fn thread(len: usize, closed: bool) -> ThreadSnapshot {
    let posts = (0..len as u64)
        .map(|i| {
            let no = 100 + i;
            let has_file = i % 3 == 0;
            Post {
                no,
                resto: if i == 0 { 0 } else { 100 },
                time: 1_700_000_000 + i as i64,
                name: Some("Anonymous".to_string()),
                com: Some(format!("comment {}", no)),
                closed: u8::from(closed && i == 0),
                tim: has_file.then_some(1_700_000_000_000 + no),
                ext: has_file.then(|| ".jpg".to_string()),
                ..Default::default()
            }
        })
        .collect();
    ThreadSnapshot::new(posts)
}

/// Shorthand for a snapshot step
pub fn snapshot(len: usize, closed: bool) -> ThreadStep {
    ThreadStep::Snapshot(thread(len, closed))
}
