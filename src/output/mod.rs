//! Console output for the command-line front end
//!
//! This module handles:
//! - Rendering board metadata, catalogs and threads with attribute descriptions
//! - Rendering thread comments as plain text
//! - Summarizing finished archive sessions
//!
//! Every `write_*` function targets any [`std::io::Write`]; the `print_*`
//! variants write to stdout.

mod console;
mod labels;
mod summary;

pub use console::{
    print_archive, print_board, print_catalog, print_thread, print_thread_comments,
    write_archive, write_board, write_catalog, write_comments, write_thread,
};
pub use labels::{label, BOARD_LABELS, POST_LABELS};
pub use summary::{print_session_report, write_session_report};
