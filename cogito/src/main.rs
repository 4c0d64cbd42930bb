//! Headless cogito CLI.
//!
//! Plans a roadmap for a goal and, with `run`, drives it to the end without the
//! interactive interface. Feed lines go to stdout, diagnostics to stderr.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use cogito::autorun::{LoopStop, run_auto};
use cogito::core::roadmap::Roadmap;
use cogito::core::types::Mode;
use cogito::exit_codes;
use cogito::io::config::{CogitoConfig, config_path, load_config, write_config};
use cogito::io::shell::SystemShell;
use cogito::io::workdir::WorkingDirectory;
use cogito::logging::{self, LogTarget};
use cogito::planner::{Planner, TemplatePlanner};
use cogito::session::Session;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "cogito",
    version,
    about = "Turn a goal into shell steps and run them"
)]
struct Cli {
    /// Config file (defaults to $COGITO_CONFIG or the platform config dir).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the roadmap planned for a goal as JSON.
    Plan {
        /// Free-text goal.
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
    },
    /// Plan a goal and auto-run every step until done or a step fails.
    Run {
        /// Free-text goal.
        #[arg(required = true, num_args = 1..)]
        goal: Vec<String>,
        /// Starting working directory (defaults to the current directory).
        #[arg(long)]
        cwd: Option<PathBuf>,
        /// Print the final session snapshot as JSON after the feed.
        #[arg(long)]
        json: bool,
    },
    /// Write the default config file.
    InitConfig {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() {
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("{:#}", err);
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init(LogTarget::Stderr)?;
    let path = config_path(cli.config.as_deref())?;

    match cli.command {
        Command::Plan { goal } => cmd_plan(&path, &goal.join(" ")),
        Command::Run { goal, cwd, json } => cmd_run(&path, &goal.join(" "), cwd.as_deref(), json),
        Command::InitConfig { force } => cmd_init_config(&path, force),
    }
}

fn cmd_plan(config_path: &Path, goal: &str) -> Result<i32> {
    let cfg = load_config(config_path)?;
    if goal.trim().is_empty() {
        bail!("goal is empty");
    }
    let steps = TemplatePlanner::new(&cfg.plan).plan(goal)?;
    let roadmap = Roadmap::from_drafts(steps);
    let payload = serde_json::to_string_pretty(roadmap.steps()).context("serialize roadmap")?;
    println!("{payload}");
    Ok(exit_codes::OK)
}

fn cmd_run(config_path: &Path, goal: &str, cwd: Option<&Path>, json: bool) -> Result<i32> {
    let cfg = load_config(config_path)?;
    let workdir = match cwd {
        Some(dir) => WorkingDirectory::new(
            dir.canonicalize()
                .with_context(|| format!("resolve --cwd {}", dir.display()))?,
        ),
        None => WorkingDirectory::from_process()?,
    };
    info!(workdir = %workdir.current().display(), "starting unattended run");

    let mut session = Session::new(workdir);
    let Some(goal) = session.submit_goal(goal) else {
        bail!("goal is empty");
    };
    match TemplatePlanner::new(&cfg.plan).plan(&goal) {
        Ok(steps) => session.apply_plan(steps),
        Err(err) => {
            session.abort_plan(&err);
            return Err(err);
        }
    }
    for line in session.feed().lines() {
        println!("{line}");
    }

    session.set_mode(Mode::Build);
    session.set_auto_run(true);
    let runner = shell_from_config(&cfg);
    let outcome = run_auto(&mut session, &runner, |line| println!("{line}"));

    if json {
        let payload =
            serde_json::to_string_pretty(&session.snapshot()).context("serialize snapshot")?;
        println!("{payload}");
    }

    match outcome.stop {
        LoopStop::Exhausted if session.roadmap().is_complete() => Ok(exit_codes::OK),
        _ => Ok(exit_codes::HALTED),
    }
}

fn cmd_init_config(config_path: &Path, force: bool) -> Result<i32> {
    if config_path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        );
    }
    write_config(config_path, &CogitoConfig::default())?;
    println!("{}", config_path.display());
    Ok(exit_codes::OK)
}

fn shell_from_config(cfg: &CogitoConfig) -> SystemShell {
    SystemShell::new(&cfg.shell, cfg.command_timeout(), cfg.output_limit_bytes)
}
