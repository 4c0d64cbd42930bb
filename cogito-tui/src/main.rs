//! Full-screen cogito interface.

mod app;
mod keys;
mod render;
mod state;
mod worker;

use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use cogito::io::config::{config_path, load_config};
use cogito::io::shell::{CommandRunner, SystemShell};
use cogito::io::workdir::WorkingDirectory;
use cogito::logging::{self, LogTarget};
use cogito::planner::{Planner, TemplatePlanner};
use cogito::session::Session;
use crossterm::event::{Event, EventStream};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use futures::StreamExt;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc;
use tracing::info;

use crate::app::{App, Effect};
use crate::state::AppEvent;

const TICK: Duration = Duration::from_millis(80);

#[derive(Parser)]
#[command(name = "cogito-tui")]
#[command(about = "Plan a goal into shell steps and run them interactively")]
struct Args {
    /// Config file (defaults to $COGITO_CONFIG or the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Starting working directory
    #[arg(long)]
    cwd: Option<PathBuf>,

    /// Append tracing output to this file (discarded otherwise)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Long-lived collaborators shared with background tasks.
struct Workers {
    planner: Arc<dyn Planner>,
    runner: Arc<dyn CommandRunner>,
    plan_delay: Duration,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl Workers {
    fn dispatch(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Plan(goal) => {
                    worker::spawn_plan(self.planner.clone(), goal, self.plan_delay, self.tx.clone());
                }
                Effect::Run(job) => worker::spawn_job(self.runner.clone(), job, self.tx.clone()),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    match args.log_file.as_deref() {
        Some(path) => logging::init(LogTarget::File(path))?,
        None => logging::init(LogTarget::Discard)?,
    }

    let cfg = load_config(&config_path(args.config.as_deref())?)?;
    let workdir = match args.cwd {
        Some(dir) => WorkingDirectory::new(
            dir.canonicalize()
                .with_context(|| format!("resolve --cwd {}", dir.display()))?,
        ),
        None => WorkingDirectory::from_process()?,
    };
    info!(workdir = %workdir.current().display(), "starting cogito-tui");

    let (tx, rx) = mpsc::unbounded_channel();
    let workers = Workers {
        planner: Arc::new(TemplatePlanner::new(&cfg.plan)),
        runner: Arc::new(SystemShell::new(
            &cfg.shell,
            cfg.command_timeout(),
            cfg.output_limit_bytes,
        )),
        plan_delay: cfg.plan_delay(),
        tx,
    };
    let mut app = App::new(Session::new(workdir));

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, &mut app, &workers, rx).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    workers: &Workers,
    mut rx: mpsc::UnboundedReceiver<AppEvent>,
) -> Result<()> {
    let mut events = EventStream::new();
    let mut ticker = tokio::time::interval(TICK);

    while !app.should_quit {
        terminal.draw(|frame| render::render(frame, app))?;
        tokio::select! {
            _ = ticker.tick() => app.tick(),
            Some(event) = rx.recv() => {
                let effects = app.handle_event(event);
                workers.dispatch(effects);
            }
            maybe_event = events.next() => match maybe_event {
                Some(Ok(Event::Key(key))) => {
                    if let Some(action) = keys::map_key(app.session.mode(), key) {
                        let effects = app.handle_action(action);
                        workers.dispatch(effects);
                    }
                }
                Some(Ok(_)) => {}
                Some(Err(err)) => return Err(err).context("read terminal event"),
                None => break,
            },
        }
    }
    Ok(())
}
