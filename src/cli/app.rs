//! Main CLI application structure

use anyhow::{Context as _, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use super::output::{Output, OutputFormat};
use super::task::{self, Context};
use crate::domain::{parse_due_date, Filter, Priority, SortMode, TaskId};
use crate::storage::Project;

#[derive(Parser)]
#[command(name = "tally")]
#[command(author, version, about = "Local-first task list with one-step undo")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format (defaults to the global config, then text)
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a task list in a directory
    Init {
        /// Path to initialize (defaults to current directory)
        #[arg(default_value = ".")]
        path: String,
    },

    /// Add a task to the top of the list
    ///
    /// Examples:
    ///   tally add Buy milk
    ///   tally add "Call the bank" --priority high --due 2026-10-20
    Add {
        /// Task text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Priority (low, medium, high)
        #[arg(long, short, default_value = "medium")]
        priority: Priority,

        /// Due date (YYYY-MM-DD)
        #[arg(long, short, value_parser = parse_due_date)]
        due: Option<NaiveDate>,
    },

    /// Show tasks; --filter and --sort are remembered for next time
    List {
        /// Which tasks to show (all, active, completed)
        #[arg(long)]
        filter: Option<Filter>,

        /// Display order (date, priority, due, status)
        #[arg(long)]
        sort: Option<SortMode>,
    },

    /// Toggle a task between done and not done
    Toggle {
        /// Task ID
        id: TaskId,
    },

    /// Replace a task's text
    Edit {
        /// Task ID
        id: TaskId,

        /// New text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Delete a task (undoable for a few seconds)
    Delete {
        /// Task ID
        id: TaskId,
    },

    /// Remove all completed tasks (undoable for a few seconds)
    ClearCompleted,

    /// Restore the most recently deleted or cleared tasks
    Undo,

    /// Mark every task complete
    CompleteAll,

    /// Move a task to another task's position
    Move {
        /// Task to move
        dragged: TaskId,

        /// Task whose position it takes
        target: TaskId,
    },

    /// Show completion progress
    Progress,
}

/// Sets up stderr logging. `RUST_LOG` wins unless --verbose is given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("tally=debug,tally_cli=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    tracing::debug!(target: "tally", "Tally starting");
    let format = cli.format;

    match cli.command {
        Commands::Init { path } => init(format, &path)?,
        Commands::Add { text, priority, due } => in_project(format, |output, ctx| {
            task::add(output, ctx, &text.join(" "), priority, due)
        })?,
        Commands::List { filter, sort } => {
            in_project(format, |output, ctx| task::list(output, ctx, filter, sort))?
        }
        Commands::Toggle { id } => in_project(format, |output, ctx| task::toggle(output, ctx, id))?,
        Commands::Edit { id, text } => in_project(format, |output, ctx| {
            task::edit(output, ctx, id, &text.join(" "))
        })?,
        Commands::Delete { id } => in_project(format, |output, ctx| task::delete(output, ctx, id))?,
        Commands::ClearCompleted => in_project(format, task::clear_completed)?,
        Commands::Undo => in_project(format, task::undo)?,
        Commands::CompleteAll => in_project(format, task::complete_all)?,
        Commands::Move { dragged, target } => in_project(format, |output, ctx| {
            task::reorder(output, ctx, dragged, target)
        })?,
        Commands::Progress => in_project(format, |output, ctx| task::progress(output, ctx))?,
    }

    tracing::debug!(target: "tally", "Command completed successfully");
    Ok(())
}

fn init(format: Option<OutputFormat>, path: &str) -> Result<()> {
    let output = Output::new(format.unwrap_or_default());
    tracing::debug!(target: "tally", %path, "Initializing");
    let project = Project::init(path)?;
    output.success(&format!("Initialized tally at {}", project.root().display()));
    Ok(())
}

/// Locates the project, resumes the session, runs `command`, and saves the
/// session state afterwards
fn in_project<F>(format: Option<OutputFormat>, command: F) -> Result<()>
where
    F: FnOnce(&Output, &mut Context) -> Result<()>,
{
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    let project = Project::locate(&cwd)?;
    tracing::debug!(target: "tally", root = %project.root().display(), "Opened project");

    let format = format.unwrap_or_else(|| project.config().global.default_format.into());
    let output = Output::new(format);

    let mut ctx = Context::open(&project);
    command(&output, &mut ctx)?;
    ctx.finish()
}
