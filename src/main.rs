//! AI-SDLC - markdown-driven SDLC with AI prompt chaining.
//!
//! Steps one workstream at a time through the lifecycle configured in
//! `.aisdlc`, staging a prompt for each step from the previous step's output.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use aisdlc::core::{find_project_root, Config, LockStore, WorkflowError, CONFIG_FILE};
use aisdlc::init::init_project;
use aisdlc::workflow::{NextOutcome, Progress, Workflow};

/// Markdown-driven SDLC with AI prompt chaining
#[derive(Parser)]
#[command(name = "aisdlc")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true, arg_required_else_help = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Project root (defaults to the nearest directory containing .aisdlc)
    #[arg(long, global = true, env = "AISDLC_ROOT", value_name = "DIR")]
    root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold config, prompt templates and workstream directories
    Init,

    /// Start a workstream from an idea title
    New {
        /// Idea title (words are joined with spaces)
        #[arg(required = true, num_args = 1.., trailing_var_arg = true, allow_hyphen_values = true)]
        title: Vec<String>,
    },

    /// Stage the next step's prompt, advancing once its output exists
    Next,

    /// Show progress of the active workstream
    Status,

    /// Archive the finished workstream
    Done,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

impl Commands {
    /// Whether the compact status footer follows this command.
    fn shows_footer(&self) -> bool {
        matches!(self, Self::New { .. } | Self::Next | Self::Done)
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                ErrorKind::DisplayHelp | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                    ExitCode::FAILURE
                }
                _ => ExitCode::from(2),
            };
        }
    };

    // Setup logging; RUST_LOG wins over --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "warn" }));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(io::stderr))
        .with(filter)
        .init();

    let root = match resolve_root(cli.root) {
        Ok(root) => root,
        Err(err) => return report(&err),
    };
    let footer = cli.command.shows_footer();

    // Handle commands
    let result = match cli.command {
        Commands::Init => cmd_init(&root),
        Commands::New { title } => cmd_new(&root, &title),
        Commands::Next => cmd_next(&root),
        Commands::Status => cmd_status(&root),
        Commands::Done => cmd_done(&root),
        Commands::Completions { shell } => {
            cmd_completions(shell);
            Ok(())
        }
    };

    // State errors leave the workstream in place, so they get the footer too
    let (code, footer) = match &result {
        Ok(()) => (ExitCode::SUCCESS, footer),
        Err(err) => (report(err), footer && is_recoverable(err)),
    };
    if footer {
        print_compact_status(&root);
    }
    code
}

/// Use the explicit root, or search upwards from the working directory.
fn resolve_root(explicit: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root);
    }
    let cwd = std::env::current_dir().context("Could not determine the current directory")?;
    Ok(find_project_root(&cwd))
}

/// Print an error and pick the exit code.
///
/// Workflow misuse is reported without failing the process.
fn report(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<WorkflowError>() {
        Some(wf) if wf.is_recoverable() => {
            println!("❌  {wf}");
            ExitCode::SUCCESS
        }
        _ => {
            eprintln!("❌ Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn is_recoverable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<WorkflowError>().is_some_and(WorkflowError::is_recoverable)
}

/// Scaffold a new project.
fn cmd_init(root: &Path) -> Result<()> {
    println!("Initializing AI-SDLC in: {}", root.display());

    for item in init_project(root)? {
        let state = if item.created { "created:" } else { "exists: " };
        println!("  {state} {}", item.path.display());
    }

    println!("\n✨ Project initialized successfully!");
    println!("Next: aisdlc new \"Idea title\"");
    Ok(())
}

/// Start a new workstream.
fn cmd_new(root: &Path, title: &[String]) -> Result<()> {
    let workflow = Workflow::load(root)?;
    let created = workflow.start(&title.join(" "))?;

    println!("✅  Created {}.  Fill it out, then run `aisdlc next`.", created.file.display());
    Ok(())
}

/// Stage the next step or advance to it.
fn cmd_next(root: &Path) -> Result<()> {
    let workflow = Workflow::load(root)?;

    match workflow.next()? {
        NextOutcome::Complete => {
            println!("🎉  All steps complete. Run `aisdlc done` to archive.");
        }
        NextOutcome::Waiting { step, staging, expected } => {
            println!("📝  Generated AI prompt file: {}", staging.display());
            println!(
                "🤖  Please use this prompt with your preferred AI tool \
                 to generate content for step '{step}'"
            );
            println!("    Then save the AI's response to: {}", expected.display());
            println!();
            println!("💡  Options:");
            println!("    • Copy the prompt content and paste into any AI chat");
            println!("    • Use with Cursor: cursor agent --file {}", staging.display());
            println!("    • Use with any other AI-powered editor or CLI tool");
            println!();
            println!("⏸️   Waiting for you to create: {}", expected.display());
            println!("    Once ready, run 'aisdlc next' again to continue to the next step.");
        }
        NextOutcome::Advanced { step, output, staging } => {
            println!("✅  Found existing file: {}", output.display());
            println!("✅  Advanced to step: {step}");
            println!("🧹  Cleaned up prompt file: {}", staging.display());
        }
    }

    Ok(())
}

/// Show the active workstream.
fn cmd_status(root: &Path) -> Result<()> {
    let workflow = Workflow::load(root)?;

    println!("Active workstreams\n------------------");
    match workflow.status()? {
        Some(progress) => println!("{progress}"),
        None => println!("none – create one with `aisdlc new`"),
    }

    Ok(())
}

/// Archive the finished workstream.
fn cmd_done(root: &Path) -> Result<()> {
    let workflow = Workflow::load(root)?;
    let archived = workflow.done()?;

    println!("🎉  Archived to {}", archived.display());
    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "aisdlc", &mut io::stdout());
}

/// Print a one-line reminder of where the active workstream stands.
///
/// Never fails: problems are summarized in the footer itself.
fn print_compact_status(root: &Path) {
    let Some(lock) = LockStore::new(root).read() else {
        return;
    };

    match Config::load(root) {
        Ok(config) => match config.position(&lock.current) {
            Some(index) => {
                let progress = Progress {
                    slug: lock.slug,
                    current: lock.current,
                    index,
                    steps: config.steps,
                };
                println!(
                    "\n---\n📌 Current: {} @ {}\n   {}\n---",
                    progress.slug,
                    progress.current,
                    progress.bar()
                );
            }
            None => println!(
                "\n---\n📌 Current: {} @ {} (Step not in config)\n---",
                lock.slug, lock.current
            ),
        },
        Err(_) => println!(
            "\n---\n📌 AI-SDLC config ({CONFIG_FILE}) not found or invalid. \
             Cannot display status.\n---"
        ),
    }
}
