//! Application services: use-case orchestration.
//!
//! Each service module implements a single pipeline step by composing domain
//! logic with port trait calls. Services import only from `crate::domain` and
//! `crate::application::ports`, never from `crate::infra`, `crate::commands`,
//! or `crate::output`.

pub mod project;
pub mod sanity;
pub mod start_webapp;
pub mod virtualenv;
pub mod webapp;
pub mod wsgi;

use anyhow::Result;

use crate::application::ports::CommandRunner;
use crate::domain::error::CommandError;

/// Run a program and turn a non-zero exit into `CommandError::Failed`.
fn run_checked(runner: &impl CommandRunner, program: &str, args: &[&str]) -> Result<()> {
    let status = runner.run_status(program, args)?;
    if !status.success() {
        let command = std::iter::once(program)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" ");
        return Err(CommandError::Failed { command, status }.into());
    }
    Ok(())
}
