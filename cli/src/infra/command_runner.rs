//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `SystemCommandRunner` spawns processes with `std::process::Command`,
//! inherits stdio so tool output reaches the terminal, and waits for exit
//! with no timeout.

use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::CommandRunner;

/// Production `CommandRunner`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus> {
        tracing::info!(program, ?args, "running");
        let status = std::process::Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("failed to spawn {program}"))?;
        tracing::debug!(program, %status, "exited");
        Ok(status)
    }
}
