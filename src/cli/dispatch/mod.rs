//! Map validated CLI arguments to the action the binary runs.

use crate::cli::{
    actions::{server::Args, Action},
    commands::{ARG_APP_ROOT, ARG_DSN, ARG_LOGIN_URL, ARG_PORT, ARG_STRICT, ARG_THEME_PATH},
};
use crate::theme::SearchPaths;
use anyhow::Result;
use std::{env, path::PathBuf};

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if the DSN is not a valid URL.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);

    let dsn = matches.get_one::<String>(ARG_DSN).cloned();
    if let Some(dsn) = &dsn {
        url::Url::parse(dsn).map_err(|e| anyhow::anyhow!("invalid --dsn: {e}"))?;
    }

    Ok(Action::Server(Args {
        port,
        dsn,
        strict: matches.get_flag(ARG_STRICT),
        login_url: matches.get_one::<String>(ARG_LOGIN_URL).cloned(),
        search_paths: search_paths(matches),
    }))
}

fn search_paths(matches: &clap::ArgMatches) -> SearchPaths {
    let defaults = SearchPaths::from_env();

    let app_root = matches
        .get_one::<String>(ARG_APP_ROOT)
        .map_or(defaults.app_root, PathBuf::from);

    let theme_path = matches
        .get_one::<String>(ARG_THEME_PATH)
        .map(|paths| env::split_paths(paths).collect::<Vec<_>>())
        .filter(|paths| !paths.is_empty())
        .unwrap_or(defaults.theme_path);

    SearchPaths::new(app_root, theme_path)
}
