//! Execution handoff: runs the chosen command after the menu is gone.
//!
//! [`execute`] accepts only a [`TerminatedSession`], which the session
//! controller hands out after every window has been destroyed.  The command
//! runs through a [`CommandRunner`] (the system shell in production) and
//! its exit status is logged but never propagated: the menu itself always
//! exits successfully once the user has made a choice.

use thiserror::Error;
use tracing::{info, warn};

use super::display_session::TerminatedSession;

/// Exit status of a finished command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandExit {
    /// Exit code; `None` if the command was killed by a signal.
    pub code: Option<i32>,
}

impl CommandExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs a shell command line synchronously.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Runs `command` and waits for it to finish.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the command could not be started.
    fn run(&self, command: &str) -> std::io::Result<CommandExit>;
}

/// Why a handed-off command did not succeed.
#[derive(Debug, Error)]
pub enum HandoffError {
    #[error("failed to start {command:?}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command:?} exited with status {code:?}")]
    Failed { command: String, code: Option<i32> },
}

/// Result of a handoff.
#[derive(Debug)]
pub enum HandoffOutcome {
    /// The session was cancelled; nothing ran.
    NothingToRun,
    /// The command ran and exited with status 0.
    Succeeded,
    /// The command could not be started or exited non-zero.
    Failed(HandoffError),
}

/// Runs the session's pending command, if any, exactly once.
pub fn execute(session: TerminatedSession, runner: &dyn CommandRunner) -> HandoffOutcome {
    let Some(command) = session.into_command() else {
        info!("menu cancelled; no command to run");
        return HandoffOutcome::NothingToRun;
    };

    info!(command = %command, "running selected command");
    let error = match runner.run(&command) {
        Ok(exit) if exit.success() => return HandoffOutcome::Succeeded,
        Ok(exit) => HandoffError::Failed {
            command,
            code: exit.code,
        },
        Err(source) => HandoffError::Spawn { command, source },
    };
    warn!("{error}");
    HandoffOutcome::Failed(error)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::display_session::DisplaySessionController;
    use crate::application::placement::OverlayPlacement;
    use crate::infrastructure::display::mock::{MockPlatform, ScriptedEvent};
    use powermenu_core::{Button, ButtonRegistry, Key, DEFAULT_BUTTON_CAPACITY};

    /// Drives a real session on the mock platform so the handoff receives a
    /// genuine `TerminatedSession`.
    fn terminated(key: Key) -> TerminatedSession {
        let registry = ButtonRegistry::new(
            vec![Button::new("systemctl suspend").with_keybind('u')],
            DEFAULT_BUTTON_CAPACITY,
        )
        .expect("registry");
        let mut platform = MockPlatform::new();
        platform.push_events([ScriptedEvent::KeyOnPrimary(key)]);
        DisplaySessionController::new(
            &mut platform,
            Box::new(OverlayPlacement),
            &registry,
            Default::default(),
        )
        .run()
        .expect("run")
    }

    #[test]
    fn test_execute_runs_selected_command_once() {
        // Arrange
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|command| {
                assert_eq!(command, "systemctl suspend");
                Ok(CommandExit { code: Some(0) })
            });

        // Act
        let outcome = execute(terminated(Key::Char('u')), &runner);

        // Assert
        assert!(matches!(outcome, HandoffOutcome::Succeeded));
    }

    #[test]
    fn test_execute_after_cancel_runs_nothing() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(0);

        let outcome = execute(terminated(Key::Escape), &runner);

        assert!(matches!(outcome, HandoffOutcome::NothingToRun));
    }

    #[test]
    fn test_execute_reports_non_zero_exit() {
        let mut runner = MockCommandRunner::new();
        runner
            .expect_run()
            .times(1)
            .returning(|_| Ok(CommandExit { code: Some(3) }));

        let outcome = execute(terminated(Key::Char('u')), &runner);

        assert!(matches!(
            outcome,
            HandoffOutcome::Failed(HandoffError::Failed { code: Some(3), .. })
        ));
    }

    #[test]
    fn test_execute_reports_spawn_failure() {
        let mut runner = MockCommandRunner::new();
        runner.expect_run().times(1).returning(|_| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no shell"))
        });

        let outcome = execute(terminated(Key::Char('u')), &runner);

        assert!(matches!(
            outcome,
            HandoffOutcome::Failed(HandoffError::Spawn { .. })
        ));
    }

    #[test]
    fn test_command_exit_success_requires_zero() {
        assert!(CommandExit { code: Some(0) }.success());
        assert!(!CommandExit { code: Some(1) }.success());
        assert!(!CommandExit { code: None }.success());
    }
}
