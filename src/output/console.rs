//! Console rendering of boards, catalogs and threads
//!
//! Records are rendered attribute by attribute. Known attributes get their
//! description, strings are entity-decoded and comments are shown as plain
//! text indented under their label.

use crate::api::{comment_to_text, Board, CatalogPage, Post, ThreadSnapshot};
use crate::output::labels::{label, BOARD_LABELS, POST_LABELS};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::{self, Write};

/// Writes every attribute of a board
pub fn write_board<W: Write>(out: &mut W, board: &Board) -> io::Result<()> {
    writeln!(out, "--- {} Details ---", comment_to_text(&board.title))?;
    write_fields(out, BOARD_LABELS, fields(board), &[])
}

/// Writes every thread summary of every catalog page
pub fn write_catalog<W: Write>(out: &mut W, board: &str, pages: &[CatalogPage]) -> io::Result<()> {
    writeln!(out, "--- /{}/ Catalog ---", board)?;

    for page in pages {
        writeln!(out, "-- Page {} --", page.page)?;
        for thread in &page.threads {
            write_fields(out, POST_LABELS, fields(thread), &["last_replies"])?;

            if !thread.last_replies.is_empty() {
                writeln!(out, "Most recent replies:")?;
                for reply in &thread.last_replies {
                    writeln!(out, "\t{}", comment_header(reply))?;
                    writeln!(out, "\t{}", indent(&reply.plain_comment()))?;
                }
            }
            writeln!(out)?;
        }
    }

    Ok(())
}

/// Writes the thread numbers of a board's archive, one per line
pub fn write_archive<W: Write>(out: &mut W, board: &str, threads: &[u64]) -> io::Result<()> {
    writeln!(out, "--- /{}/ Archive ({} threads) ---", board, threads.len())?;
    for thread in threads {
        writeln!(out, "{}", thread)?;
    }
    Ok(())
}

/// Writes every attribute of every post in a thread
pub fn write_thread<W: Write>(
    out: &mut W,
    thread: u64,
    snapshot: &ThreadSnapshot,
) -> io::Result<()> {
    writeln!(out, "--- Thread {} ---", thread)?;

    for (idx, post) in snapshot.posts.iter().enumerate() {
        writeln!(out, "-- Post {} --", idx + 1)?;
        write_fields(out, POST_LABELS, fields(post), &[])?;
    }

    Ok(())
}

/// Writes each post as a `-- no name --` header followed by its comment text
pub fn write_comments<W: Write>(out: &mut W, snapshot: &ThreadSnapshot) -> io::Result<()> {
    for post in &snapshot.posts {
        writeln!(out, "{}", comment_header(post))?;
        writeln!(out, "{}", post.plain_comment())?;
    }
    Ok(())
}

pub fn print_board(board: &Board) -> io::Result<()> {
    write_board(&mut io::stdout().lock(), board)
}

pub fn print_catalog(board: &str, pages: &[CatalogPage]) -> io::Result<()> {
    write_catalog(&mut io::stdout().lock(), board, pages)
}

pub fn print_archive(board: &str, threads: &[u64]) -> io::Result<()> {
    write_archive(&mut io::stdout().lock(), board, threads)
}

pub fn print_thread(thread: u64, snapshot: &ThreadSnapshot) -> io::Result<()> {
    write_thread(&mut io::stdout().lock(), thread, snapshot)
}

pub fn print_thread_comments(snapshot: &ThreadSnapshot) -> io::Result<()> {
    write_comments(&mut io::stdout().lock(), snapshot)
}

fn comment_header(post: &Post) -> String {
    let name = post
        .name
        .as_deref()
        .map(comment_to_text)
        .unwrap_or_else(|| "Anonymous".to_string());
    format!("-- {} {} --", post.no, name)
}

fn fields<T: Serialize>(record: &T) -> Map<String, Value> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Writes labelled attributes first in table order, then the rest by key
fn write_fields<W: Write>(
    out: &mut W,
    table: &[(&str, &str)],
    mut fields: Map<String, Value>,
    skip: &[&str],
) -> io::Result<()> {
    for (key, description) in table {
        if skip.contains(key) {
            continue;
        }
        if let Some(value) = fields.remove(*key) {
            writeln!(out, "{}: {}", description, render_value(key, &value))?;
        }
    }

    for (key, value) in &fields {
        if skip.contains(&key.as_str()) {
            continue;
        }
        writeln!(out, "{}: {}", label(table, key), render_value(key, value))?;
    }

    Ok(())
}

fn render_value(key: &str, value: &Value) -> String {
    match value {
        Value::String(s) if key == "com" => format!("\n\t{}", indent(&comment_to_text(s))),
        Value::String(s) => comment_to_text(s),
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("\t{}: {}", k, render_value(k, v)))
                .collect();
            format!("\n{}", entries.join("\n"))
        }
        Value::Array(items) => items
            .iter()
            .map(|item| render_value(key, item))
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

fn indent(text: &str) -> String {
    text.lines().collect::<Vec<_>>().join("\n\t")
}
