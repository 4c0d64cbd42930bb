//! Background tasks for planning and shell steps.
//!
//! Shell commands block, so they run on tokio's blocking pool. Results come
//! back to the event loop over an unbounded channel.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use cogito::io::shell::CommandRunner;
use cogito::planner::Planner;
use cogito::session::ShellJob;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::state::AppEvent;

/// Plan `goal` after `delay`, then report back.
pub fn spawn_plan(
    planner: Arc<dyn Planner>,
    goal: String,
    delay: Duration,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        let drafts = planner.plan(&goal);
        if tx.send(AppEvent::Planned { drafts }).is_err() {
            debug!("event loop closed before plan arrived");
        }
    });
}

/// Run a shell job on the blocking pool and report its single completion.
pub fn spawn_job(
    runner: Arc<dyn CommandRunner>,
    job: ShellJob,
    tx: mpsc::UnboundedSender<AppEvent>,
) {
    tokio::spawn(async move {
        let ShellJob { step_id, request } = job;
        info!(step_id, command = %request.command, "shell job started");
        let result = tokio::task::spawn_blocking(move || runner.run(&request))
            .await
            .unwrap_or_else(|err| Err(anyhow!("command task failed: {err}")));
        if tx.send(AppEvent::Completed { step_id, result }).is_err() {
            debug!(step_id, "event loop closed before job finished");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use cogito::io::shell::{CommandReport, ShellRequest};
    use cogito::planner::TemplatePlanner;
    use cogito::test_support::{ScriptedRun, ScriptedRunner};

    #[tokio::test]
    async fn job_completion_arrives_once() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let runner = Arc::new(ScriptedRunner::new(vec![ScriptedRun::Report(
            CommandReport::succeeded("hi"),
        )]));
        let job = ShellJob {
            step_id: 3,
            request: ShellRequest {
                command: "echo hi".to_string(),
                workdir: std::env::temp_dir(),
            },
        };

        spawn_job(runner.clone(), job, tx);

        match rx.recv().await {
            Some(AppEvent::Completed { step_id, result }) => {
                assert_eq!(step_id, 3);
                assert_eq!(result.expect("report").stdout, "hi");
            }
            other => panic!("unexpected event {other:?}"),
        }
        assert!(rx.recv().await.is_none());
        assert_eq!(runner.requests().len(), 1);
    }

    #[tokio::test]
    async fn plan_arrives_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        spawn_plan(
            Arc::new(TemplatePlanner::default()),
            "new site".to_string(),
            Duration::from_millis(5),
            tx,
        );

        match rx.recv().await {
            Some(AppEvent::Planned { drafts }) => {
                let drafts = drafts.expect("drafts");
                assert_eq!(drafts[0].cmd, "mkdir site-project");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
