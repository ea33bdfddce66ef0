//! CSV archive store
//!
//! One append-only `comments.csv` per thread. The record count and the
//! post-number index are rebuilt from the table on open and never stored
//! separately, so they always agree with the rows on disk.

use crate::api::Post;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Record table filename inside a thread directory
pub const COMMENTS_FILE: &str = "comments.csv";

/// Attachment directory name inside a thread directory
pub const ATTACHMENTS_DIR: &str = "attachments";

/// Errors that can occur during archive store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Corrupt record table {}: {message}", path.display())]
    Corrupt { path: PathBuf, message: String },
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Directory holding one thread's archive: `{output_dir}/{board}_{thread}`
pub fn thread_dir(output_dir: &Path, board: &str, thread: u64) -> PathBuf {
    output_dir.join(format!("{}_{}", board, thread))
}

/// One archived post as stored in the record table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentRow {
    pub no: u64,
    pub resto: u64,
    pub time: i64,
    pub now: Option<String>,
    pub name: Option<String>,
    pub trip: Option<String>,
    pub poster_id: Option<String>,
    pub capcode: Option<String>,
    pub country: Option<String>,
    pub country_name: Option<String>,
    pub sub: Option<String>,
    /// Raw comment markup
    pub com: Option<String>,
    /// Comment rendered as plain text
    pub text: Option<String>,
    pub filename: Option<String>,
    pub tim: Option<u64>,
    pub ext: Option<String>,
    pub fsize: Option<u64>,
    pub md5: Option<String>,
    pub w: Option<u32>,
    pub h: Option<u32>,
    /// When the row was written (RFC 3339)
    pub archived_at: String,
}

impl CommentRow {
    pub fn from_post(post: &Post, archived_at: &DateTime<Utc>) -> Self {
        Self {
            no: post.no,
            resto: post.resto,
            time: post.time,
            now: post.now.clone(),
            name: post.name.clone(),
            trip: post.trip.clone(),
            poster_id: post.poster_id.clone(),
            capcode: post.capcode.clone(),
            country: post.country.clone(),
            country_name: post.country_name.clone(),
            sub: post.sub.clone(),
            com: post.com.clone(),
            text: post.com.as_ref().map(|_| post.plain_comment()),
            filename: post.filename.clone(),
            tim: post.tim,
            ext: post.ext.clone(),
            fsize: post.fsize,
            md5: post.md5.clone(),
            w: post.w,
            h: post.h,
            archived_at: archived_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}

/// Append-only record table for one thread
#[derive(Debug)]
pub struct ArchiveStore {
    dir: PathBuf,
    table: PathBuf,
    has_header: bool,
    count: usize,
    ids: HashSet<u64>,
}

impl ArchiveStore {
    /// Opens (or creates) the archive in `dir`
    ///
    /// An existing table is scanned to rebuild the record count and id index.
    /// A torn trailing row left by an interrupted append is cut off. An
    /// unreadable row anywhere else is reported as [`StoreError::Corrupt`]
    /// and the file is left untouched.
    pub fn open(dir: &Path) -> StoreResult<Self> {
        std::fs::create_dir_all(dir).map_err(|source| StoreError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let table = dir.join(COMMENTS_FILE);
        let scan = scan_table(&table)?;

        if scan.valid_len < scan.file_len {
            tracing::warn!(
                table = %table.display(),
                discarded_bytes = scan.file_len - scan.valid_len,
                "Discarding torn trailing row"
            );
            let file = OpenOptions::new()
                .write(true)
                .open(&table)
                .map_err(|source| StoreError::Io {
                    path: table.clone(),
                    source,
                })?;
            file.set_len(scan.valid_len)
                .and_then(|_| file.sync_all())
                .map_err(|source| StoreError::Io {
                    path: table.clone(),
                    source,
                })?;
        }

        tracing::debug!(table = %table.display(), records = scan.count, "Opened archive");

        Ok(Self {
            dir: dir.to_path_buf(),
            table,
            has_header: scan.has_header,
            count: scan.count,
            ids: scan.ids,
        })
    }

    /// Thread directory this store lives in
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record table
    pub fn table_path(&self) -> &Path {
        &self.table
    }

    /// Path of the attachment directory next to the table
    pub fn attachments_dir(&self) -> PathBuf {
        self.dir.join(ATTACHMENTS_DIR)
    }

    /// Number of records persisted so far (0 for a new archive)
    pub fn current_count(&self) -> usize {
        self.count
    }

    /// Post numbers persisted so far
    pub fn known_ids(&self) -> &HashSet<u64> {
        &self.ids
    }

    pub fn contains(&self, no: u64) -> bool {
        self.ids.contains(&no)
    }

    /// Appends posts to the table in the given order
    ///
    /// The rows are encoded in memory and written with a single write followed
    /// by a sync. Returns the number of rows written.
    pub fn append(&mut self, posts: &[Post]) -> StoreResult<usize> {
        if posts.is_empty() {
            return Ok(0);
        }

        let archived_at = Utc::now();
        let mut writer = csv::WriterBuilder::new()
            .has_headers(!self.has_header)
            .from_writer(Vec::new());
        for post in posts {
            writer.serialize(CommentRow::from_post(post, &archived_at))?;
        }
        let buffer = writer.into_inner().map_err(|e| StoreError::Io {
            path: self.table.clone(),
            source: e.into_error(),
        })?;

        let io_err = |source| StoreError::Io {
            path: self.table.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.table)
            .map_err(io_err)?;
        file.write_all(&buffer).map_err(io_err)?;
        file.sync_data().map_err(io_err)?;

        self.has_header = true;
        self.count += posts.len();
        self.ids.extend(posts.iter().map(|p| p.no));

        tracing::debug!(rows = posts.len(), total = self.count, "Appended rows");
        Ok(posts.len())
    }

    /// Reads every archived row back
    pub fn read_rows(&self) -> StoreResult<Vec<CommentRow>> {
        if !self.table.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.table)?;
        let rows = reader.deserialize().collect::<Result<Vec<CommentRow>, _>>()?;
        Ok(rows)
    }
}

/// What a scan of the record table found
struct TableScan {
    has_header: bool,
    count: usize,
    ids: HashSet<u64>,
    /// Length of the well-formed prefix
    valid_len: u64,
    file_len: u64,
}

fn scan_table(table: &Path) -> StoreResult<TableScan> {
    let io_err = |source| StoreError::Io {
        path: table.to_path_buf(),
        source,
    };

    let file_len = match std::fs::metadata(table) {
        Ok(meta) => meta.len(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => 0,
        Err(e) => return Err(io_err(e)),
    };

    let mut scan = TableScan {
        has_header: false,
        count: 0,
        ids: HashSet::new(),
        valid_len: 0,
        file_len,
    };
    if file_len == 0 {
        return Ok(scan);
    }

    let ends_with_newline = last_byte(table).map_err(io_err)? == Some(b'\n');
    let file = File::open(table).map_err(io_err)?;
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(file);

    let no_column = match reader.byte_headers() {
        Ok(headers) => headers.iter().position(|h| h == b"no"),
        Err(_) => None,
    };
    let header_end = reader.position().byte();

    let Some(no_column) = no_column else {
        if !ends_with_newline && !contains_newline(table).map_err(io_err)? {
            // Torn while writing the header of a fresh table
            return Ok(scan);
        }
        return Err(StoreError::Corrupt {
            path: table.to_path_buf(),
            message: "missing 'no' column in header".to_string(),
        });
    };

    scan.has_header = true;
    scan.valid_len = header_end;

    let mut record = csv::ByteRecord::new();
    let mut last: Option<(u64, u64)> = None; // (post number, offset before the row)
    loop {
        let start = reader.position().byte();
        let no = match reader.read_byte_record(&mut record) {
            Ok(true) => post_number(&record, no_column),
            Ok(false) => break,
            Err(e) => {
                tracing::debug!("Unreadable row at byte {}: {}", start, e);
                None
            }
        };

        let Some(no) = no else {
            // Only an unterminated final row may be cut off
            if !ends_with_newline && matches!(reader.read_byte_record(&mut record), Ok(false)) {
                scan.valid_len = start;
                return Ok(scan);
            }
            return Err(StoreError::Corrupt {
                path: table.to_path_buf(),
                message: format!("unreadable row at byte {}", start),
            });
        };

        scan.ids.insert(no);
        scan.count += 1;
        scan.valid_len = reader.position().byte();
        last = Some((no, start));
    }

    // A final row without its line terminator is incomplete
    if scan.valid_len == file_len && !ends_with_newline {
        if let Some((no, start)) = last {
            scan.ids.remove(&no);
            scan.count -= 1;
            scan.valid_len = start;
        } else {
            scan.has_header = false;
            scan.valid_len = 0;
        }
    }

    Ok(scan)
}

fn post_number(record: &csv::ByteRecord, column: usize) -> Option<u64> {
    record
        .get(column)
        .and_then(|raw| std::str::from_utf8(raw).ok())
        .and_then(|raw| raw.parse::<u64>().ok())
}

fn last_byte(path: &Path) -> std::io::Result<Option<u8>> {
    use std::io::{Read, Seek, SeekFrom};

    let mut file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(None);
    }
    file.seek(SeekFrom::End(-1))?;
    let mut byte = [0u8; 1];
    file.read_exact(&mut byte)?;
    Ok(Some(byte[0]))
}

fn contains_newline(path: &Path) -> std::io::Result<bool> {
    Ok(std::fs::read(path)?.contains(&b'\n'))
}
