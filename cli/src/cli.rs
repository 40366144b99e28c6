//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Bootstrap Django webapps on PythonAnywhere
#[derive(Parser)]
#[command(
    name = "pa",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a new Django webapp with a virtualenv
    StartDjango(commands::start_django::StartDjangoArgs),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub fn run(self) -> Result<()> {
        let Cli {
            quiet,
            no_color,
            verbose: _,
            command,
        } = self;
        match command {
            Command::Version => {
                commands::version::run();
                Ok(())
            }
            Command::StartDjango(args) => {
                let app = AppContext::new(&AppFlags {
                    output: OutputFlags { no_color, quiet },
                    behaviour: BehaviourFlags { yes: args.yes },
                })?;
                commands::start_django::run(&app, &args)
            }
        }
    }
}
