//! Skillport CLI
//!
//! Command-line interface for syncing a Claude Code home into other tools.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::level_filters::LevelFilter;

use skillport::config::{self, AgentConfig};
use skillport::projector::SettingsOutcome;
use skillport::{Detection, Orchestrator, RunOutcome, SyncReport, TargetSelector};

#[derive(Parser)]
#[command(name = "skillport")]
#[command(
    author,
    version,
    about = "Sync Claude Code skills and MCP servers to OpenCode, Codex, Pi, Droid, Cursor, or Gemini"
)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show detailed output
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Process roots used to resolve output and marker paths
#[derive(Args, Debug)]
struct RootArgs {
    /// User home directory (default: the current user's home)
    #[arg(long, env = "SKILLPORT_HOME")]
    home: Option<PathBuf>,

    /// Project directory for cwd-relative targets (default: current directory)
    #[arg(long)]
    project_root: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sync skills and MCP servers to a target
    Sync {
        /// Target: opencode | codex | pi | droid | cursor | gemini | all
        target: TargetSelector,

        /// Path to Claude home (default: ~/.claude)
        #[arg(long, env = "CLAUDE_HOME")]
        claude_home: Option<PathBuf>,

        #[command(flatten)]
        roots: RootArgs,
    },

    /// Show which AI coding tools are installed
    Detect {
        #[command(flatten)]
        roots: RootArgs,

        /// Output machine-readable JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli.command) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {:#}", "✘".red(), e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_orchestrator(roots: RootArgs) -> Result<Orchestrator> {
    let home = match roots.home {
        Some(home) => home,
        None => dirs::home_dir().context("Could not determine home directory")?,
    };
    let cwd = match roots.project_root {
        Some(cwd) => cwd,
        None => env::current_dir().context("Could not determine current directory")?,
    };
    Ok(Orchestrator::new(home, cwd))
}

/// Returns whether every requested target succeeded
fn run(command: Commands) -> Result<bool> {
    match command {
        Commands::Sync {
            target,
            claude_home,
            roots,
        } => {
            let orchestrator = resolve_orchestrator(roots)?;
            let claude_home = match claude_home {
                Some(path) => config::expand_home(&path, orchestrator.home()),
                None => orchestrator.home().join(config::DEFAULT_AGENT_HOME),
            };

            let agent_config = AgentConfig::load(&claude_home)
                .with_context(|| format!("Failed to load {}", claude_home.display()))?;

            if let TargetSelector::One(_) = target {
                println!(
                    "Syncing {} skills, {} MCP servers...",
                    agent_config.skills.len(),
                    agent_config.mcp_servers.len()
                );
            }

            let report = orchestrator.run(target, &agent_config);
            print_report(&report);
            Ok(report.is_success())
        }

        Commands::Detect { roots, json } => {
            let orchestrator = resolve_orchestrator(roots)?;
            let detections = orchestrator.detect();

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&detections)
                        .context("Failed to serialize detection results")?
                );
            } else {
                print_detections(&detections);
            }
            Ok(true)
        }
    }
}

fn print_detections(detections: &[Detection]) {
    for tool in detections {
        let mark = if tool.detected {
            "✔".green()
        } else {
            "✘".dimmed()
        };
        println!("  {} {:<10} {}", mark, tool.name, tool.reason.dimmed());
    }
}

fn print_report(report: &SyncReport) {
    if !report.secrets.is_empty() {
        eprintln!(
            "{}",
            "⚠️  Warning: MCP servers contain env vars that may include secrets (API keys, tokens)."
                .yellow()
        );
        eprintln!(
            "   These will be copied to the target config. Review before sharing the config file."
        );
        for hint in &report.secrets {
            eprintln!("   {} {}: {}", "•".yellow(), hint.server, hint.key);
        }
    }

    if let Some(detections) = &report.detections {
        println!("{}", "Detected tools:".bold());
        print_detections(detections);
    }

    let outcomes = match &report.outcome {
        RunOutcome::NothingDetected => {
            println!("No AI coding tools detected.");
            return;
        }
        RunOutcome::Targets(outcomes) => outcomes,
    };

    for outcome in outcomes {
        match &outcome.result {
            Ok(summary) => {
                println!(
                    "{} Synced to {}: {}",
                    "✔".green(),
                    outcome.target.id(),
                    outcome.output_root.display()
                );
                let links = summary.links;
                if links.created + links.updated + links.unchanged > 0 {
                    println!(
                        "    Skills linked: {}, Updated: {}, Unchanged: {}",
                        links.created.to_string().green(),
                        links.updated.to_string().yellow(),
                        links.unchanged.to_string().dimmed()
                    );
                }
                match &summary.settings {
                    SettingsOutcome::Skipped => {}
                    SettingsOutcome::Created(path) => {
                        println!("    Created MCP config: {}", path.display())
                    }
                    SettingsOutcome::Updated(path) => {
                        println!("    Updated MCP config: {}", path.display())
                    }
                    SettingsOutcome::Unchanged(path) => println!(
                        "    MCP config up to date: {}",
                        path.display().to_string().dimmed()
                    ),
                }
            }
            Err(e) => {
                eprintln!("{} {}: {}", "✘".red(), outcome.target.id().bold(), e);
            }
        }
    }
}
