//! `pa start-django`: create a Django webapp with its own virtualenv.

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::start_webapp::{self as service, StartOptions, StartOutcome};
use crate::domain::webapp::DEFAULT_DOMAIN_PLACEHOLDER;
use crate::domain::{DjangoVersion, PythonVersion};
use crate::infra::api::ApiClient;
use crate::infra::assets::EmbeddedAssets;
use crate::infra::command_runner::SystemCommandRunner;
use crate::infra::fs::LocalFs;
use crate::output::OutputContext;

const NUKE_PROMPT: &str =
    "This will delete any existing web app, virtualenv and project on this domain. Continue?";

/// Arguments for the start-django command.
#[derive(Args)]
pub struct StartDjangoArgs {
    /// Domain name, eg www.mydomain.com [default: your-username.pythonanywhere.com]
    #[arg(long, default_value = DEFAULT_DOMAIN_PLACEHOLDER, hide_default_value = true)]
    pub domain: String,

    /// Django version, eg "1.8.4"
    #[arg(long, default_value = "latest")]
    pub django: DjangoVersion,

    /// Python version, eg "2.7"
    #[arg(long, default_value = "3.8")]
    pub python: PythonVersion,

    /// *Irrevocably* delete any existing web app config on this domain
    #[arg(long)]
    pub nuke: bool,

    /// Do not ask for confirmation before nuking
    #[arg(short, long)]
    pub yes: bool,
}

/// Run `pa start-django`.
///
/// # Errors
///
/// Returns an error if the user declines the nuke confirmation, or if any
/// pipeline step fails.
pub fn run(app: &AppContext, args: &StartDjangoArgs) -> Result<()> {
    if args.nuke && !nuke_confirmed(app)? {
        anyhow::bail!("aborted: --nuke was not confirmed");
    }

    let api = ApiClient::new(&app.config)?;
    let reporter = app.reporter();

    let outcome = service::start_webapp(
        &SystemCommandRunner,
        &LocalFs,
        &api,
        &EmbeddedAssets,
        &app.config,
        StartOptions {
            reporter: &reporter,
            domain: &args.domain,
            django: &args.django,
            python: args.python,
            nuke: args.nuke,
        },
    )?;

    print_success_message(&outcome, &app.output);
    Ok(())
}

/// Unattended runs go ahead; an interactive user has to opt in explicitly.
fn nuke_confirmed(app: &AppContext) -> Result<bool> {
    if app.non_interactive {
        return Ok(true);
    }
    app.confirm(NUKE_PROMPT, false)
}

fn print_success_message(outcome: &StartOutcome, ctx: &OutputContext) {
    if ctx.quiet {
        return;
    }
    ctx.kv("Virtualenv", &outcome.virtualenv_path.display().to_string());
    ctx.kv("Project", &outcome.project_path.display().to_string());
    ctx.kv("WSGI file", &outcome.wsgi_file_path.display().to_string());
    ctx.success(&format!(
        "All done! Your site is now live at https://{}",
        outcome.domain
    ));
}
