//! Snapshot differ
//!
//! Decides which posts of a fresh snapshot have not been archived yet. Both
//! strategies are pure functions over the snapshot and what the store knows.

use crate::api::Post;
use serde::Deserialize;
use std::collections::HashSet;

/// How new posts are told apart from archived ones
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiffStrategy {
    /// Everything past the archived record count is new
    ///
    /// Assumes the remote thread only ever appends. A deleted reply shifts the
    /// suffix and the next new post is missed.
    Count,

    /// Every post whose number is not in the archive is new
    #[default]
    PostId,
}

impl DiffStrategy {
    /// Selects the new posts of `snapshot` given the archive's count and id index
    pub fn new_posts(
        &self,
        previous_count: usize,
        known_ids: &HashSet<u64>,
        snapshot: &[Post],
    ) -> Vec<Post> {
        match self {
            Self::Count => diff(previous_count, snapshot).to_vec(),
            Self::PostId => diff_by_id(known_ids, snapshot),
        }
    }
}

/// Returns the suffix of `snapshot` beyond `previous_count` records
///
/// A snapshot that is not longer than `previous_count` yields an empty slice.
pub fn diff(previous_count: usize, snapshot: &[Post]) -> &[Post] {
    snapshot.get(previous_count..).unwrap_or(&[])
}

/// Returns the posts whose numbers are not in `known_ids`, in snapshot order
///
/// A post number repeated within the snapshot is only returned once.
pub fn diff_by_id(known_ids: &HashSet<u64>, snapshot: &[Post]) -> Vec<Post> {
    let mut seen = HashSet::new();
    snapshot
        .iter()
        .filter(|post| !known_ids.contains(&post.no) && seen.insert(post.no))
        .cloned()
        .collect()
}
