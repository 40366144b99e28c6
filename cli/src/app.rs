//! Application context: unified state passed to every command handler.
//!
//! `AppContext` bundles the terminal `OutputContext`, the startup `Config`
//! and the prompt policy so command signatures stay stable as cross-cutting
//! concerns are added.

use anyhow::Result;

use crate::domain::Config;
use crate::infra::config::load_config;
use crate::output::{OutputContext, TerminalReporter};

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `PA_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Settings read from the environment at startup.
    pub config: Config,
    /// When `true`, skip interactive prompts and use defaults.
    ///
    /// Set when `--yes` / `-y` is passed, when the `CI` or `PA_YES`
    /// environment variables are present, or when stdout is not a terminal.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be loaded from the
    /// environment (no home directory, no current user).
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let config = load_config()?;
        Ok(Self::with_config(flags, config))
    }

    /// Construct an `AppContext` around an already-built `Config`.
    #[must_use]
    pub fn with_config(flags: &AppFlags, config: Config) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("PA_YES").is_ok();
        let output = OutputContext::new(flags.output.no_color, flags.output.quiet);
        let non_interactive = flags.behaviour.yes || ci_env || !output.is_tty;

        Self {
            output,
            config,
            non_interactive,
        }
    }

    /// Progress reporter writing to this context's terminal.
    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (CI, `--yes` flag, `PA_YES` env, or
    /// no terminal), returns `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails.
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
