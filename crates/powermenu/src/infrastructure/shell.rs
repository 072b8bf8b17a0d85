//! Shell-backed [`CommandRunner`].

use std::path::PathBuf;
use std::process::Command;

use crate::application::handoff::{CommandExit, CommandRunner};

/// Shell used to run actions.
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Runs each command line as `<shell> -c <command>`, inheriting stdio, and
/// waits for it.
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl ShellRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self::new(DEFAULT_SHELL)
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> std::io::Result<CommandExit> {
        let status = Command::new(&self.shell).arg("-c").arg(command).status()?;
        Ok(CommandExit {
            code: status.code(),
        })
    }
}
