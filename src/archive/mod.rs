//! Archive persistence
//!
//! This module owns everything written to disk for a thread:
//! - Deciding which posts of a snapshot are new (the differ)
//! - The append-only CSV record table
//! - Attachment resolution and idempotent downloads
//!
//! Layout under the output directory:
//!
//! ```text
//! {output_dir}/{board}_{thread}/comments.csv
//! {output_dir}/{board}_{thread}/attachments/{tim}{ext}
//! ```

mod attachment;
mod differ;
mod store;

pub use attachment::{resolve, AttachmentDir, AttachmentError, AttachmentOutcome, AttachmentRef};
pub use differ::{diff, diff_by_id, DiffStrategy};
pub use store::{
    thread_dir, ArchiveStore, CommentRow, StoreError, StoreResult, ATTACHMENTS_DIR, COMMENTS_FILE,
};
