//! Tests for the full `start_webapp` pipeline against in-memory fakes.

#![allow(clippy::expect_used)]

use std::path::PathBuf;

use pa_cli::application::services::start_webapp::{StartOptions, StartOutcome, start_webapp};
use pa_cli::domain::webapp::DEFAULT_DOMAIN_PLACEHOLDER;
use pa_cli::domain::{
    ApiError, CommandError, Config, DjangoVersion, DomainError, PythonVersion, SanityError,
    SettingsError, WebappError,
};
use pa_cli::infra::assets::EmbeddedAssets;

use crate::mocks::{FakeApi, FakeHost, RecordingReporter, test_config};

const DOMAIN: &str = "alice.example.com";
const VENV: &str = "/home/alice/.virtualenvs/alice.example.com";
const PROJECT: &str = "/home/alice/alice.example.com";

struct Run<'a> {
    domain: &'a str,
    django: DjangoVersion,
    python: &'a str,
    nuke: bool,
}

impl Default for Run<'_> {
    fn default() -> Self {
        Self {
            domain: DOMAIN,
            django: DjangoVersion::Latest,
            python: "3.8",
            nuke: false,
        }
    }
}

fn run_with(
    host: &FakeHost,
    api: &FakeApi,
    config: &Config,
    reporter: &RecordingReporter,
    run: &Run<'_>,
) -> anyhow::Result<StartOutcome> {
    start_webapp(
        host,
        host,
        api,
        &EmbeddedAssets,
        config,
        StartOptions {
            reporter,
            domain: run.domain,
            django: &run.django,
            python: run.python.parse::<PythonVersion>().expect("python version"),
            nuke: run.nuke,
        },
    )
}

fn run(host: &FakeHost, api: &FakeApi, run: &Run<'_>) -> anyhow::Result<StartOutcome> {
    run_with(host, api, &test_config(), &RecordingReporter::default(), run)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

// ── Happy path ────────────────────────────────────────────────────────────────

#[test]
fn fresh_domain_runs_every_step_in_order() {
    let host = FakeHost::new();
    let api = FakeApi::new();

    let outcome = run(&host, &api, &Run::default()).expect("pipeline succeeds");

    assert_eq!(
        outcome,
        StartOutcome {
            domain: DOMAIN.to_string(),
            virtualenv_path: PathBuf::from(VENV),
            project_path: PathBuf::from(PROJECT),
            wsgi_file_path: PathBuf::from("/var/www/alice_example_com_wsgi.py"),
        }
    );
    assert_eq!(
        host.commands(),
        vec![
            strings(&[
                "bash",
                "-c",
                "source virtualenvwrapper.sh && mkvirtualenv --python=/usr/bin/python3.8 \
                 alice.example.com && pip install django",
            ]),
            strings(&[
                "/home/alice/.virtualenvs/alice.example.com/bin/django-admin",
                "startproject",
                "mysite",
                PROJECT,
            ]),
            strings(&[
                "/home/alice/.virtualenvs/alice.example.com/bin/python",
                "/home/alice/alice.example.com/manage.py",
                "collectstatic",
                "--noinput",
            ]),
        ]
    );
    assert_eq!(
        api.calls(),
        strings(&[
            "GET alice.example.com",
            "CREATE alice.example.com python38",
            "PATCH alice.example.com virtualenv_path=/home/alice/.virtualenvs/alice.example.com",
            "STATIC alice.example.com /static/ /home/alice/alice.example.com/static",
            "STATIC alice.example.com /media/ /home/alice/alice.example.com/media",
            "RELOAD alice.example.com",
        ])
    );
    assert_eq!(
        host.fs_ops(),
        strings(&[
            "mkdir /home/alice/alice.example.com",
            "write /home/alice/alice.example.com/mysite/settings.py",
            "write /var/www/alice_example_com_wsgi.py",
        ])
    );
}

#[test]
fn settings_file_allows_domain_and_sets_static_roots() {
    let host = FakeHost::new();
    run(&host, &FakeApi::new(), &Run::default()).expect("pipeline succeeds");

    let settings = host
        .file("/home/alice/alice.example.com/mysite/settings.py")
        .expect("settings written");
    assert!(settings.contains("ALLOWED_HOSTS = ['alice.example.com']"));
    assert!(!settings.contains("ALLOWED_HOSTS = []"));
    assert!(settings.contains("MEDIA_URL = '/media/'"));
    assert!(settings.contains("STATIC_ROOT = os.path.join(BASE_DIR, 'static')"));
    assert!(settings.ends_with("MEDIA_ROOT = os.path.join(BASE_DIR, 'media')\n"));
}

#[test]
fn wsgi_file_points_at_project() {
    let host = FakeHost::new();
    run(&host, &FakeApi::new(), &Run::default()).expect("pipeline succeeds");

    let wsgi = host
        .file("/var/www/alice_example_com_wsgi.py")
        .expect("wsgi written");
    assert!(wsgi.contains("settings_path = '/home/alice/alice.example.com'"));
    assert!(wsgi.contains("DJANGO_SETTINGS_MODULE"));
    assert!(!wsgi.contains("{project_path}"));
}

#[test]
fn pinned_django_and_older_python_flow_through() {
    let host = FakeHost::new();
    let api = FakeApi::new();
    let opts = Run {
        django: "1.8.4".parse().expect("django version"),
        python: "2.7",
        ..Run::default()
    };

    run(&host, &api, &opts).expect("pipeline succeeds");

    let script = &host.commands()[0][2];
    assert!(
        script.ends_with("mkvirtualenv --python=/usr/bin/python2.7 alice.example.com && pip install django==1.8.4"),
        "{script}"
    );
    assert!(api.calls().contains(&"CREATE alice.example.com python27".to_string()));
}

#[test]
fn placeholder_domain_resolves_to_user_subdomain() {
    let host = FakeHost::new();
    let api = FakeApi::new();
    let opts = Run {
        domain: DEFAULT_DOMAIN_PLACEHOLDER,
        ..Run::default()
    };

    let outcome = run(&host, &api, &opts).expect("pipeline succeeds");

    assert_eq!(outcome.domain, "alice.pythonanywhere.com");
    assert_eq!(
        outcome.wsgi_file_path,
        PathBuf::from("/var/www/alice_pythonanywhere_com_wsgi.py")
    );
    assert_eq!(api.calls()[0], "GET alice.pythonanywhere.com");
}

#[test]
fn reporter_announces_steps() {
    let reporter = RecordingReporter::default();
    run_with(
        &FakeHost::new(),
        &FakeApi::new(),
        &test_config(),
        &reporter,
        &Run::default(),
    )
    .expect("pipeline succeeds");

    let steps: Vec<_> = reporter
        .events()
        .into_iter()
        .filter(|e| e.starts_with("step: "))
        .collect();
    assert_eq!(steps.len(), 9, "{steps:?}");
    assert!(steps[0].contains("sanity checks"));
    assert!(steps[8].contains("reloading alice.example.com"));
    assert!(reporter.warnings().is_empty());
}

// ── Sanity failures: nothing is mutated ───────────────────────────────────────

#[test]
fn existing_webapp_aborts_before_any_mutation() {
    let host = FakeHost::new();
    let api = FakeApi::new().respond("get", 200, r#"{"domain_name": "alice.example.com"}"#);

    let err = run(&host, &api, &Run::default()).expect_err("conflict");

    assert!(matches!(
        err.downcast_ref::<SanityError>(),
        Some(SanityError::WebappExists { domain }) if domain == DOMAIN
    ));
    assert!(err.to_string().contains("--nuke"));
    assert_eq!(api.calls(), strings(&["GET alice.example.com"]));
    assert!(host.commands().is_empty());
    assert!(host.fs_ops().is_empty());
}

#[test]
fn existing_virtualenv_aborts_before_any_mutation() {
    let host = FakeHost::new().with_dir(VENV);
    let api = FakeApi::new();

    let err = run(&host, &api, &Run::default()).expect_err("conflict");

    assert!(matches!(
        err.downcast_ref::<SanityError>(),
        Some(SanityError::VirtualenvExists { .. })
    ));
    assert!(host.commands().is_empty());
    assert!(host.fs_ops().is_empty());
    assert_eq!(api.calls().len(), 1);
}

#[test]
fn existing_project_folder_aborts_before_any_mutation() {
    let host = FakeHost::new().with_dir(PROJECT);

    let err = run(&host, &FakeApi::new(), &Run::default()).expect_err("conflict");

    assert!(matches!(
        err.downcast_ref::<SanityError>(),
        Some(SanityError::ProjectFolderExists { path }) if path == &PathBuf::from(PROJECT)
    ));
    assert!(host.commands().is_empty());
}

#[test]
fn missing_token_fails_without_calling_api() {
    let host = FakeHost::new();
    let api = FakeApi::new();
    let config = Config {
        api_token: None,
        ..test_config()
    };

    let err = run_with(
        &host,
        &api,
        &config,
        &RecordingReporter::default(),
        &Run::default(),
    )
    .expect_err("no token");

    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NoToken)));
    assert!(api.calls().is_empty());
    assert!(host.commands().is_empty());
}

#[test]
fn missing_token_fails_even_with_nuke() {
    let config = Config {
        api_token: None,
        ..test_config()
    };
    let opts = Run {
        nuke: true,
        ..Run::default()
    };

    let err = run_with(
        &FakeHost::new(),
        &FakeApi::new(),
        &config,
        &RecordingReporter::default(),
        &opts,
    )
    .expect_err("no token");

    assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::NoToken)));
}

#[test]
fn invalid_domain_is_rejected_up_front() {
    let host = FakeHost::new();
    let api = FakeApi::new();
    let opts = Run {
        domain: "../etc",
        ..Run::default()
    };

    let err = run(&host, &api, &opts).expect_err("invalid domain");

    assert!(matches!(
        err.downcast_ref::<DomainError>(),
        Some(DomainError::InvalidDomain(_))
    ));
    assert!(api.calls().is_empty());
    assert!(host.commands().is_empty());
}

#[test]
fn unknown_webapp_presence_warns_and_continues() {
    let api = FakeApi::new().respond("get", 503, "unavailable");
    let reporter = RecordingReporter::default();

    run_with(
        &FakeHost::new(),
        &api,
        &test_config(),
        &reporter,
        &Run::default(),
    )
    .expect("pipeline succeeds");

    let warnings = reporter.warnings();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].contains("HTTP 503"), "{warnings:?}");
}

// ── Nuke mode ─────────────────────────────────────────────────────────────────

#[test]
fn nuke_replaces_everything_without_querying() {
    let host = FakeHost::new()
        .with_dir(VENV)
        .with_dir(PROJECT)
        .with_file("/home/alice/alice.example.com/stale.txt", "old");
    let api = FakeApi::new().respond("get", 200, "{}");
    let opts = Run {
        nuke: true,
        ..Run::default()
    };

    run(&host, &api, &opts).expect("pipeline succeeds");

    let calls = api.calls();
    assert!(!calls.iter().any(|c| c.starts_with("GET")), "{calls:?}");
    assert_eq!(calls[0], "DELETE alice.example.com");
    assert_eq!(calls[1], "CREATE alice.example.com python38");

    let script = &host.commands()[0][2];
    assert!(
        script.starts_with(
            "source virtualenvwrapper.sh && rmvirtualenv alice.example.com && mkvirtualenv"
        ),
        "{script}"
    );

    let ops = host.fs_ops();
    assert_eq!(ops[0], "rm -r /home/alice/alice.example.com");
    assert_eq!(ops[1], "mkdir /home/alice/alice.example.com");
    assert!(host.file("/home/alice/alice.example.com/stale.txt").is_none());
}

#[test]
fn nuke_ignores_failed_delete() {
    let api = FakeApi::new().respond("delete", 404, r#"{"detail": "Not found."}"#);
    let opts = Run {
        nuke: true,
        ..Run::default()
    };

    run(&FakeHost::new(), &api, &opts).expect("pipeline succeeds");
}

#[test]
fn nuke_on_missing_project_folder_just_creates_it() {
    let host = FakeHost::new();
    let opts = Run {
        nuke: true,
        ..Run::default()
    };

    run(&host, &FakeApi::new(), &opts).expect("pipeline succeeds");

    assert_eq!(host.fs_ops()[0], "mkdir /home/alice/alice.example.com");
}

// ── Mid-pipeline failures halt immediately ────────────────────────────────────

#[test]
fn failed_virtualenv_stops_pipeline() {
    let host = FakeHost::new().failing("bash");
    let api = FakeApi::new();

    let err = run(&host, &api, &Run::default()).expect_err("mkvirtualenv fails");

    assert!(err.downcast_ref::<CommandError>().is_some(), "{err:#}");
    assert_eq!(host.commands().len(), 1);
    assert!(host.fs_ops().is_empty());
    assert_eq!(api.calls(), strings(&["GET alice.example.com"]));
}

#[test]
fn failed_collectstatic_stops_before_webapp_creation() {
    let host = FakeHost::new().failing("bin/python");
    let api = FakeApi::new();

    let err = run(&host, &api, &Run::default()).expect_err("collectstatic fails");

    let Some(CommandError::Failed { command, .. }) = err.downcast_ref::<CommandError>() else {
        panic!("expected CommandError, got {err:#}");
    };
    assert!(command.ends_with("manage.py collectstatic --noinput"), "{command}");
    assert!(!api.calls().iter().any(|c| c.starts_with("CREATE")));
}

#[test]
fn unrecognised_settings_stops_before_collectstatic() {
    let host = FakeHost::new().with_settings_template("DEBUG = True\nALLOWED_HOSTS = ['*']\n");

    let err = run(&host, &FakeApi::new(), &Run::default()).expect_err("settings unpatchable");

    assert!(matches!(
        err.downcast_ref::<SettingsError>(),
        Some(SettingsError::AllowedHostsNotFound { .. })
    ));
    assert_eq!(host.commands().len(), 2, "collectstatic must not run");
}

#[test]
fn create_http_error_is_fatal() {
    let api = FakeApi::new().respond("create", 400, r#"{"error": "bad domain"}"#);

    let err = run(&FakeHost::new(), &api, &Run::default()).expect_err("create fails");

    assert!(matches!(
        err.downcast_ref::<WebappError>(),
        Some(WebappError::CreateFailed { status: 400, .. })
    ));
    assert!(err.to_string().contains("bad domain"));
    assert!(!api.calls().iter().any(|c| c.starts_with("PATCH")));
}

#[test]
fn create_error_body_under_success_status_is_fatal() {
    let api = FakeApi::new().respond(
        "create",
        201,
        r#"{"status": "ERROR", "error_type": "bad_domain"}"#,
    );

    let err = run(&FakeHost::new(), &api, &Run::default()).expect_err("create fails");

    assert!(matches!(
        err.downcast_ref::<WebappError>(),
        Some(WebappError::CreateFailed { status: 201, .. })
    ));
}

#[test]
fn patch_failure_is_fatal() {
    let api = FakeApi::new().respond("patch", 500, "boom");

    let err = run(&FakeHost::new(), &api, &Run::default()).expect_err("patch fails");

    assert!(matches!(
        err.downcast_ref::<WebappError>(),
        Some(WebappError::PatchFailed { status: 500, .. })
    ));
}

#[test]
fn static_mapping_failure_stops_before_reload() {
    let host = FakeHost::new();
    let api = FakeApi::new().respond("static", 400, "duplicate");

    let err = run(&host, &api, &Run::default()).expect_err("mapping fails");

    assert!(matches!(
        err.downcast_ref::<WebappError>(),
        Some(WebappError::StaticMappingFailed { url, .. }) if url == "/static/"
    ));
    assert!(!api.calls().iter().any(|c| c.starts_with("RELOAD")));
    assert!(host.file("/var/www/alice_example_com_wsgi.py").is_none());
}

#[test]
fn reload_failure_is_reported() {
    let api = FakeApi::new().respond("reload", 502, "bad gateway");

    let err = run(&FakeHost::new(), &api, &Run::default()).expect_err("reload fails");

    assert!(matches!(
        err.downcast_ref::<WebappError>(),
        Some(WebappError::ReloadFailed { status: 502, .. })
    ));
}
