//! Decoded API records
//!
//! Field names follow the upstream JSON. Integer flags (`closed`, `sticky`,
//! ...) are `0`/`1` on the wire and absent when unset.

use crate::api::markup::comment_to_text;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

fn is_zero(value: &u8) -> bool {
    *value == 0
}

/// One message within a thread
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Post {
    /// Unique post number
    pub no: u64,

    /// Thread this post replies to (0 for the original post)
    #[serde(default)]
    pub resto: u64,

    /// Creation time (UNIX seconds)
    #[serde(default)]
    pub time: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub now: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip: Option<String>,

    /// Per-thread poster ID tag
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub poster_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub capcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,

    /// Subject line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Raw comment markup (HTML)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub com: Option<String>,

    // ===== Attachment metadata =====
    /// Upload time (UNIX milliseconds); names the remote file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tim: Option<u64>,

    /// Original filename on the poster's device, without extension
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// File extension including the leading dot
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fsize: Option<u64>,

    /// Base64 MD5 of the file as reported by the server
    #[serde(skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub h: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tn_w: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tn_h: Option<u32>,

    #[serde(default, skip_serializing_if = "is_zero")]
    pub filedeleted: u8,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub spoiler: u8,

    // ===== Thread status (original post only) =====
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sticky: u8,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub closed: u8,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub archived: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived_on: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replies: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_ips: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_url: Option<String>,
}

impl Post {
    /// Returns true if this post marks its thread as closed to new replies
    ///
    /// Archived threads are closed as well, even if the server omits `closed`.
    pub fn is_closed(&self) -> bool {
        self.closed != 0 || self.archived != 0
    }

    /// Returns true if the post carries attachment metadata
    pub fn has_attachment(&self) -> bool {
        self.tim.is_some() && self.ext.is_some()
    }

    /// Comment rendered as plain text (empty when the post has no comment)
    pub fn plain_comment(&self) -> String {
        self.com.as_deref().map(comment_to_text).unwrap_or_default()
    }
}

/// Full ordered post list of a thread as of one fetch
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct ThreadSnapshot {
    pub posts: Vec<Post>,
}

impl ThreadSnapshot {
    pub fn new(posts: Vec<Post>) -> Self {
        Self { posts }
    }

    /// The original post, if the snapshot is non-empty
    pub fn op(&self) -> Option<&Post> {
        self.posts.first()
    }

    /// Returns true if the first record carries a closed flag
    pub fn is_closed(&self) -> bool {
        self.op().map(Post::is_closed).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Response of `boards.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BoardList {
    pub boards: Vec<Board>,
}

impl BoardList {
    /// Looks up a board by its code
    pub fn find(&self, code: &str) -> Option<&Board> {
        self.boards.iter().find(|b| b.board == code)
    }
}

/// Board metadata and settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Board {
    /// Board code, e.g. `g`
    pub board: String,
    pub title: String,
    #[serde(default)]
    pub ws_board: u8,
    #[serde(default)]
    pub per_page: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub max_filesize: u64,
    #[serde(default)]
    pub max_webm_filesize: u64,
    #[serde(default)]
    pub max_comment_chars: u32,
    #[serde(default)]
    pub bump_limit: u32,
    #[serde(default)]
    pub image_limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub is_archived: u8,

    /// Remaining board attributes, kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// One page of a board catalog
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CatalogPage {
    pub page: u32,
    #[serde(default)]
    pub threads: Vec<CatalogThread>,
}

/// Thread summary as listed in the catalog
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct CatalogThread {
    #[serde(flatten)]
    pub op: Post,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub omitted_posts: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub omitted_images: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<i64>,

    /// Most recent replies previewed in the catalog
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub last_replies: Vec<Post>,
}
