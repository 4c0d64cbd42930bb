//! Auto-run controller.
//!
//! Level-triggered: whenever auto-run is on, the engine is `ready` and the
//! session is in build mode, the next `pending` step is focused and started.
//! Callers re-check after every state change (toggle, step completion, mode
//! switch). Failed steps are left behind; see [`Roadmap::next_pending`].
//!
//! [`Roadmap::next_pending`]: crate::core::roadmap::Roadmap::next_pending

use tracing::{debug, info, warn};

use crate::core::types::{EngineStatus, Mode, StepId, StepStatus};
use crate::io::shell::CommandRunner;
use crate::session::{Execution, Session, ShellJob};

/// Reason why [`run_auto`] stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopStop {
    /// No `pending` steps remain.
    Exhausted,
    /// A step failed, which switched auto-run off.
    Halted { step_id: StepId },
    /// Auto-run was off or the session was not in build mode.
    Inactive,
}

/// Summary of an unattended run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoRunOutcome {
    pub steps_executed: u32,
    pub stop: LoopStop,
}

/// True when the controller should act on `session`.
pub fn is_armed(session: &Session) -> bool {
    session.auto_run()
        && session.status() == EngineStatus::Ready
        && session.mode() == Mode::Build
}

/// Focus the next pending step and return its id, if the controller is armed.
fn focus_next(session: &mut Session) -> Option<StepId> {
    if !is_armed(session) {
        return None;
    }
    let index = session.roadmap().next_pending()?;
    session.set_focus(index);
    session.roadmap().get(index).map(|step| step.id)
}

/// Advance the roadmap until a shell job is produced or nothing is left to do.
///
/// Directory changes settle synchronously, so several may run in one call.
pub fn poll(session: &mut Session) -> Option<ShellJob> {
    while let Some(step_id) = focus_next(session) {
        match session.execute_step(step_id) {
            Ok(Execution::Running(job)) => return Some(job),
            Ok(Execution::Settled(status)) => {
                debug!(step_id, status = %status, "auto-run settled step");
            }
            Err(err) => {
                warn!(err = %err, "auto-run dispatch refused");
                return None;
            }
        }
    }
    None
}

/// Drive `session` to exhaustion or the first failure, running shell jobs
/// inline with `runner`. `on_line` sees every feed line appended meanwhile.
pub fn run_auto<R, F>(session: &mut Session, runner: &R, mut on_line: F) -> AutoRunOutcome
where
    R: CommandRunner + ?Sized,
    F: FnMut(&str),
{
    let mut steps_executed = 0u32;
    let mut seen = session.feed().len();

    let stop = loop {
        let Some(step_id) = focus_next(session) else {
            break if session.roadmap().next_pending().is_none() {
                LoopStop::Exhausted
            } else {
                LoopStop::Inactive
            };
        };

        match session.execute_step(step_id) {
            Ok(Execution::Settled(_)) => {}
            Ok(Execution::Running(job)) => {
                let result = runner.run(&job.request);
                session.complete(job.step_id, result);
            }
            Err(err) => {
                warn!(err = %err, "auto-run dispatch refused");
                break LoopStop::Inactive;
            }
        }
        steps_executed += 1;

        for line in &session.feed().lines()[seen..] {
            on_line(line);
        }
        seen = session.feed().len();

        if session.roadmap().find(step_id).map(|step| step.status) == Some(StepStatus::Failed) {
            break LoopStop::Halted { step_id };
        }
    };

    info!(steps_executed, stop = ?stop, "auto-run stopped");
    AutoRunOutcome {
        steps_executed,
        stop,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::shell::CommandReport;
    use crate::test_support::{ScriptedRun, ScriptedRunner, session_with_plan};

    fn armed(cmds: &[&str]) -> Session {
        let mut session = session_with_plan("/home/user", cmds);
        session.set_mode(Mode::Build);
        session.set_auto_run(true);
        session
    }

    #[test]
    fn poll_requires_build_mode() {
        let mut session = session_with_plan("/home/user", &["echo a"]);
        session.set_auto_run(true);
        assert!(poll(&mut session).is_none());

        session.set_mode(Mode::Build);
        let job = poll(&mut session).expect("job");
        assert_eq!(job.step_id, 1);
    }

    #[test]
    fn poll_is_idle_while_executing() {
        let mut session = armed(&["echo a", "echo b"]);
        let first = poll(&mut session).expect("job");
        assert!(poll(&mut session).is_none());

        session.complete(first.step_id, Ok(CommandReport::succeeded("a")));
        let second = poll(&mut session).expect("job");
        assert_eq!(second.step_id, 2);
        assert_eq!(session.focus(), 1);
    }

    #[test]
    fn poll_does_nothing_when_disabled() {
        let mut session = armed(&["echo a"]);
        session.set_auto_run(false);
        assert!(poll(&mut session).is_none());
        assert_eq!(session.status(), EngineStatus::Ready);
    }

    #[test]
    fn poll_skips_failed_steps() {
        let mut session = armed(&["bad", "echo ok"]);
        let job = poll(&mut session).expect("job");
        session.complete(job.step_id, Ok(CommandReport::failed("exit status 1", "bad")));
        assert!(!session.auto_run());
        assert!(poll(&mut session).is_none());

        session.set_auto_run(true);
        let job = poll(&mut session).expect("job");
        assert_eq!(job.step_id, 2);
    }

    #[test]
    fn run_auto_exhausts_roadmap() {
        let mut session = armed(&["echo a", "echo b"]);
        let runner = ScriptedRunner::always_ok(2, "done");
        let mut lines = Vec::new();

        let outcome = run_auto(&mut session, &runner, |line| lines.push(line.to_string()));

        assert_eq!(
            outcome,
            AutoRunOutcome {
                steps_executed: 2,
                stop: LoopStop::Exhausted
            }
        );
        assert_eq!(lines, vec!["[Success] done", "[Success] done"]);
        assert!(session.roadmap().is_complete());
        assert_eq!(runner.requests().len(), 2);
    }

    #[test]
    fn run_auto_halts_on_failure() {
        let mut session = armed(&["echo a", "false", "echo c"]);
        let runner = ScriptedRunner::new(vec![
            ScriptedRun::Report(CommandReport::succeeded("a")),
            ScriptedRun::LaunchError("boom".to_string()),
        ]);

        let outcome = run_auto(&mut session, &runner, |_| {});

        assert_eq!(outcome.stop, LoopStop::Halted { step_id: 2 });
        assert_eq!(outcome.steps_executed, 2);
        assert!(!session.auto_run());
        assert_eq!(
            session.roadmap().find(3).map(|s| s.status),
            Some(StepStatus::Pending)
        );
    }

    #[test]
    fn run_auto_inactive_when_disabled() {
        let mut session = armed(&["echo a"]);
        session.set_auto_run(false);
        let runner = ScriptedRunner::default();
        let outcome = run_auto(&mut session, &runner, |_| {});
        assert_eq!(outcome.stop, LoopStop::Inactive);
        assert_eq!(outcome.steps_executed, 0);
    }
}
