//! End-of-session summary
//!
//! Shown after an archive command finishes, in the same layout the
//! statistics views use.

use crate::archive::thread_dir;
use crate::session::SessionReport;
use std::io::{self, Write};
use std::path::Path;

/// Writes the totals of a finished session
///
/// # Arguments
///
/// * `out` - Destination for the summary
/// * `report` - The session's totals
/// * `output_dir` - Archive root the session wrote under
pub fn write_session_report<W: Write>(
    out: &mut W,
    report: &SessionReport,
    output_dir: &Path,
) -> io::Result<()> {
    writeln!(out, "=== Archive Summary ===\n")?;

    writeln!(out, "Thread: /{}/thread/{}", report.board, report.thread)?;
    writeln!(
        out,
        "Directory: {}",
        thread_dir(output_dir, &report.board, report.thread).display()
    )?;
    writeln!(out)?;

    writeln!(out, "Totals:")?;
    writeln!(out, "  Poll cycles: {}", report.cycles)?;
    writeln!(out, "  Posts archived: {}", report.posts_archived)?;
    writeln!(out, "  Attachments downloaded: {}", report.attachments_downloaded)?;
    writeln!(out, "  Attachments already present: {}", report.attachments_skipped)?;
    writeln!(out, "  Attachments failed: {}", report.attachments_failed)?;
    writeln!(out)?;

    if !report.failed_attachments.is_empty() {
        writeln!(out, "Failed Attachments ({}):", report.failed_attachments.len())?;
        for filename in &report.failed_attachments {
            writeln!(out, "  - {}", filename)?;
        }
        writeln!(out)?;
    }

    match &report.termination {
        Some(reason) => writeln!(out, "Stopped: {}", reason),
        None => writeln!(out, "Stopped: still running"),
    }
}

pub fn print_session_report(report: &SessionReport, output_dir: &Path) -> io::Result<()> {
    write_session_report(&mut io::stdout().lock(), report, output_dir)
}
