//! Attachment resolver
//!
//! Maps posts to the binary files they reference and materializes those files
//! in the thread's attachment directory. A file that already exists under its
//! canonical name is never fetched again.

use crate::api::{FetchError, Fetcher, Post};
use futures::stream::{self, StreamExt};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while materializing one attachment
#[derive(Debug, Error)]
pub enum AttachmentError {
    #[error("Failed to download {filename}: {source}")]
    Fetch {
        filename: String,
        source: FetchError,
    },

    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Identifies a remote attachment and its canonical local filename `{tim}{ext}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttachmentRef {
    pub board: String,
    pub tim: u64,
    pub ext: String,
}

impl AttachmentRef {
    pub fn filename(&self) -> String {
        format!("{}{}", self.tim, self.ext)
    }
}

/// Derives the attachment a post references, if any
///
/// Posts without both `tim` and `ext`, posts whose file was deleted, and
/// extensions that are not a dot followed by ASCII alphanumerics yield `None`.
pub fn resolve(post: &Post, board: &str) -> Option<AttachmentRef> {
    let tim = post.tim?;
    let ext = post.ext.as_deref()?;

    if post.filedeleted != 0 {
        return None;
    }

    if !is_valid_extension(ext) {
        tracing::warn!(post = post.no, ext, "Ignoring attachment with unexpected extension");
        return None;
    }

    Some(AttachmentRef {
        board: board.to_string(),
        tim,
        ext: ext.to_string(),
    })
}

fn is_valid_extension(ext: &str) -> bool {
    match ext.strip_prefix('.') {
        Some(rest) => !rest.is_empty() && rest.chars().all(|c| c.is_ascii_alphanumeric()),
        None => false,
    }
}

/// Result of materializing one attachment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachmentOutcome {
    /// Downloaded and written during this cycle
    Downloaded {
        filename: String,
        bytes: usize,
        /// Hex SHA-256 of the written file
        sha256: String,
    },

    /// Already present locally, nothing fetched
    AlreadyPresent { filename: String },

    /// Download or write failed; the cycle carried on
    Failed { filename: String, error: String },
}

impl AttachmentOutcome {
    pub fn filename(&self) -> &str {
        match self {
            Self::Downloaded { filename, .. }
            | Self::AlreadyPresent { filename }
            | Self::Failed { filename, .. } => filename,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// A thread's attachment directory
#[derive(Debug, Clone)]
pub struct AttachmentDir {
    root: PathBuf,
}

impl AttachmentDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical local path of an attachment
    pub fn path_for(&self, attachment: &AttachmentRef) -> PathBuf {
        self.root.join(attachment.filename())
    }

    /// Returns true if the attachment has already been materialized
    pub async fn contains(&self, attachment: &AttachmentRef) -> bool {
        tokio::fs::try_exists(self.path_for(attachment))
            .await
            .unwrap_or(false)
    }

    /// Downloads the attachment unless it already exists locally
    ///
    /// The bytes are written to a temporary file in the same directory and
    /// renamed into place, so a canonical file is always complete.
    pub async fn materialize<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        attachment: &AttachmentRef,
    ) -> Result<AttachmentOutcome, AttachmentError> {
        let filename = attachment.filename();

        if self.contains(attachment).await {
            tracing::debug!(file = %filename, "Attachment already present");
            return Ok(AttachmentOutcome::AlreadyPresent { filename });
        }

        let bytes = fetcher
            .fetch_attachment(attachment)
            .await
            .map_err(|source| AttachmentError::Fetch {
                filename: filename.clone(),
                source,
            })?;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| AttachmentError::Io {
                path: self.root.clone(),
                source,
            })?;

        let final_path = self.path_for(attachment);
        let partial_path = self.root.join(format!(".{}.part", filename));

        tokio::fs::write(&partial_path, &bytes)
            .await
            .map_err(|source| AttachmentError::Io {
                path: partial_path.clone(),
                source,
            })?;

        if let Err(source) = tokio::fs::rename(&partial_path, &final_path).await {
            let _ = tokio::fs::remove_file(&partial_path).await;
            return Err(AttachmentError::Io {
                path: final_path,
                source,
            });
        }

        let sha256 = hex::encode(Sha256::digest(&bytes));
        tracing::debug!(file = %filename, bytes = bytes.len(), "Attachment saved");

        Ok(AttachmentOutcome::Downloaded {
            filename,
            bytes: bytes.len(),
            sha256,
        })
    }

    /// Materializes a batch of attachments with at most `concurrency` in flight
    ///
    /// Returns once every attachment has either been written or reported as
    /// failed. Failures are logged and turned into [`AttachmentOutcome::Failed`].
    pub async fn materialize_all<F: Fetcher + ?Sized>(
        &self,
        fetcher: &F,
        attachments: Vec<AttachmentRef>,
        concurrency: usize,
    ) -> Vec<AttachmentOutcome> {
        let mut seen = HashSet::new();
        let unique: Vec<AttachmentRef> = attachments
            .into_iter()
            .filter(|a| seen.insert(a.clone()))
            .collect();

        stream::iter(unique)
            .map(|attachment| async move {
                match self.materialize(fetcher, &attachment).await {
                    Ok(outcome) => outcome,
                    Err(e) => {
                        tracing::warn!("Attachment {} skipped: {}", attachment.filename(), e);
                        AttachmentOutcome::Failed {
                            filename: attachment.filename(),
                            error: e.to_string(),
                        }
                    }
                }
            })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    }
}
