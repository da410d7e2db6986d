//! # Clean theme
//!
//! `clean-theme` bundles the default views, English translations and a password
//! provider for an authentication service. [`theme::new`] takes an optional
//! [`auth::Config`] and returns a configured [`auth::Auth`] handle that can be
//! mounted into an `axum` application with [`auth::Auth::router`].
//!
//! ## Best-effort startup
//!
//! Missing translation files, a missing database and a failed identity
//! migration never stop the theme from starting. Each step is recorded in a
//! [`theme::StartupReport`]; callers that prefer to fail fast use
//! [`theme::new_strict`].
//!
//! ## Translations
//!
//! Translations live in an explicitly constructed [`i18n::I18n`] registry that
//! is shared with the renderer. Nothing is stored in process-wide state, so
//! several themes (or tests) can run side by side with isolated registries.

pub mod api;
pub mod auth;
pub mod cli;
pub mod i18n;
pub mod render;
pub mod theme;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }
}
