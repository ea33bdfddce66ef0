//! Chan-Archiver main entry point
//!
//! This is the command-line interface for browsing boards and archiving threads.

use anyhow::{bail, Context};
use chan_archiver::api::ThreadLocator;
use chan_archiver::config::{load_config_with_hash, validate, Config};
use chan_archiver::output;
use chan_archiver::Archiver;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Chan-Archiver: an incremental imageboard thread archiver
///
/// Reads boards, catalogs and threads through the read-only JSON API and
/// archives threads to disk, appending only new posts on each poll.
#[derive(Parser, Debug)]
#[command(name = "chan-archiver")]
#[command(version)]
#[command(about = "An incremental imageboard thread archiver", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults are used when omitted)
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show a board's metadata
    Board(BoardArgs),

    /// Show every thread in a board's catalog
    Catalog(BoardArgs),

    /// List the thread numbers in a board's archive
    Archived(BoardArgs),

    /// Show every attribute of every post in a thread
    Thread(ThreadArgs),

    /// Show a thread's comments as plain text
    Comments(ThreadArgs),

    /// Archive a thread's posts and attachments to disk
    Archive {
        #[command(flatten)]
        target: ThreadArgs,

        /// Keep polling until the thread is closed
        #[arg(short, long)]
        monitor: bool,

        /// Archive root directory (overrides the config)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct BoardArgs {
    /// Board code, e.g. `g`
    #[arg(short, long, required_unless_present = "url")]
    board: Option<String>,

    /// Board or thread URL to take the board code from
    #[arg(short, long, conflicts_with = "board")]
    url: Option<String>,
}

#[derive(Args, Debug)]
struct ThreadArgs {
    /// Board code, e.g. `g`
    #[arg(short, long, requires = "thread", conflicts_with = "url")]
    board: Option<String>,

    /// Thread number
    #[arg(short, long, requires = "board", conflicts_with = "url")]
    thread: Option<u64>,

    /// Thread URL, e.g. https://boards.4chan.org/g/thread/123456
    #[arg(short, long, required_unless_present_all = ["board", "thread"])]
    url: Option<String>,
}

impl BoardArgs {
    fn resolve(&self) -> anyhow::Result<String> {
        if let Some(board) = &self.board {
            return Ok(board.clone());
        }

        let url = self.url.as_deref().unwrap_or_default();
        let locator =
            ThreadLocator::from_url(url).with_context(|| format!("Invalid URL: {}", url))?;
        match locator.board {
            Some(board) => Ok(board),
            None => bail!("No board code found in URL: {}", url),
        }
    }
}

impl ThreadArgs {
    fn resolve(&self) -> anyhow::Result<(String, u64)> {
        if let (Some(board), Some(thread)) = (&self.board, self.thread) {
            return Ok((board.clone(), thread));
        }

        let url = self.url.as_deref().unwrap_or_default();
        let locator =
            ThreadLocator::from_url(url).with_context(|| format!("Invalid URL: {}", url))?;
        tracing::debug!(board = ?locator.board, thread = ?locator.thread, "Parsed URL");

        match (locator.board, locator.thread) {
            (Some(board), Some(thread)) => Ok((board, thread)),
            _ => bail!("URL does not name a board and thread: {}", url),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_deref())?;
    let archiver = Archiver::from_config(&config)?;

    match cli.command {
        Command::Board(args) => handle_board(&archiver, &args.resolve()?).await,
        Command::Catalog(args) => handle_catalog(&archiver, &args.resolve()?).await,
        Command::Archived(args) => handle_archived(&archiver, &args.resolve()?).await,
        Command::Thread(args) => {
            let (board, thread) = args.resolve()?;
            handle_thread(&archiver, &board, thread).await
        }
        Command::Comments(args) => {
            let (board, thread) = args.resolve()?;
            handle_comments(&archiver, &board, thread).await
        }
        Command::Archive {
            target,
            monitor,
            output,
        } => {
            let (board, thread) = target.resolve()?;
            let output_dir = output.unwrap_or_else(|| PathBuf::from(&config.archive.output_dir));
            handle_archive(&archiver, &board, thread, output_dir, monitor).await
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("chan_archiver=info,warn"),
            1 => EnvFilter::new("chan_archiver=debug,info"),
            2 => EnvFilter::new("chan_archiver=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file when one is given, otherwise validated defaults
fn load_configuration(path: Option<&std::path::Path>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        let config = Config::default();
        validate(&config)?;
        return Ok(config);
    };

    tracing::info!("Loading configuration from: {}", path.display());
    match load_config_with_hash(path) {
        Ok((config, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            Ok(config)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            Err(e.into())
        }
    }
}

/// Handles `board`: prints a board's metadata
async fn handle_board(archiver: &Archiver, board: &str) -> anyhow::Result<()> {
    let info = archiver.get_board_info(board).await?;
    output::print_board(&info)?;
    Ok(())
}

/// Handles `catalog`: prints every thread summary in the catalog
async fn handle_catalog(archiver: &Archiver, board: &str) -> anyhow::Result<()> {
    let pages = archiver.get_catalog(board).await?;
    output::print_catalog(board, &pages)?;
    Ok(())
}

/// Handles `archived`: lists the thread numbers in the board archive
async fn handle_archived(archiver: &Archiver, board: &str) -> anyhow::Result<()> {
    let threads = archiver.get_archived_threads(board).await?;
    output::print_archive(board, &threads)?;
    Ok(())
}

/// Handles `thread`: prints every post attribute
async fn handle_thread(archiver: &Archiver, board: &str, thread: u64) -> anyhow::Result<()> {
    let snapshot = archiver.get_thread(board, thread).await?;
    output::print_thread(thread, &snapshot)?;
    Ok(())
}

/// Handles `comments`: prints each post's comment as plain text
async fn handle_comments(archiver: &Archiver, board: &str, thread: u64) -> anyhow::Result<()> {
    let snapshot = archiver.get_thread(board, thread).await?;
    output::print_thread_comments(&snapshot)?;
    Ok(())
}

/// Handles `archive`: runs a session until it terminates or Ctrl-C is pressed
async fn handle_archive(
    archiver: &Archiver,
    board: &str,
    thread: u64,
    output_dir: PathBuf,
    monitor: bool,
) -> anyhow::Result<()> {
    let stop = CancellationToken::new();
    let signal_token = stop.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        tracing::info!("Interrupt received, stopping (press Ctrl-C again to abort)");
        signal_token.cancel();

        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Second interrupt, exiting without waiting for the session");
            std::process::exit(130);
        }
    });

    if monitor {
        tracing::info!(
            "Monitoring /{}/thread/{} every {}s",
            board,
            thread,
            archiver.session_config().poll_interval.as_secs()
        );
    } else {
        tracing::info!("Archiving /{}/thread/{}", board, thread);
    }

    match archiver
        .start_session_with_cancellation(board, thread, &output_dir, monitor, stop)
        .await
    {
        Ok(report) => {
            output::print_session_report(&report, &output_dir)?;
            Ok(())
        }
        Err(e) => {
            tracing::error!("Archive failed: {}", e);
            Err(e.into())
        }
    }
}
