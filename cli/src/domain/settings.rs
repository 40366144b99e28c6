//! Django `settings.py` patching.
//!
//! Text in, text out. The caller reads and writes the file.

use std::sync::LazyLock;

use regex::Regex;

/// Declaration generated by `startproject` that gets the domain.
pub const EMPTY_ALLOWED_HOSTS: &str = "ALLOWED_HOSTS = []";

/// Static and media settings appended to the generated file.
///
/// `import os` is repeated because newer templates build `BASE_DIR` with
/// pathlib and no longer import `os`.
pub const STATIC_MEDIA_SETTINGS: &str = "
import os
MEDIA_URL = '/media/'
STATIC_ROOT = os.path.join(BASE_DIR, 'static')
MEDIA_ROOT = os.path.join(BASE_DIR, 'media')
";

#[allow(clippy::expect_used)] // Compile-time constant pattern
static ALLOWED_HOSTS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^ALLOWED_HOSTS\s*=\s*\[(?P<hosts>[^\]]*)\]").expect("valid regex")
});

/// Result of patching a settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsPatch {
    /// New file content to write back.
    Patched(String),
    /// The file already allows the domain and serves static/media files.
    AlreadyPatched,
    /// Neither the empty declaration nor a previous patch was found.
    Unrecognised,
}

/// Patch `settings` so Django serves `domain` with static and media roots.
#[must_use]
pub fn patch_settings(settings: &str, domain: &str) -> SettingsPatch {
    if settings.contains(EMPTY_ALLOWED_HOSTS) {
        let mut patched =
            settings.replace(EMPTY_ALLOWED_HOSTS, &format!("ALLOWED_HOSTS = ['{domain}']"));
        patched.push_str(STATIC_MEDIA_SETTINGS);
        return SettingsPatch::Patched(patched);
    }
    if allows_host(settings, domain) && settings.contains(STATIC_MEDIA_SETTINGS.trim()) {
        return SettingsPatch::AlreadyPatched;
    }
    SettingsPatch::Unrecognised
}

fn allows_host(settings: &str, domain: &str) -> bool {
    ALLOWED_HOSTS_RE.captures(settings).is_some_and(|caps| {
        caps["hosts"]
            .split(',')
            .map(|h| h.trim().trim_matches(|c: char| c == '\'' || c == '"'))
            .any(|h| h == domain)
    })
}
