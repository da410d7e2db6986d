use crate::{
    api,
    auth::Config,
    theme::{SearchPaths, Theme},
    GIT_COMMIT_HASH,
};
use anyhow::{Context, Result};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub strict: bool,
    pub login_url: Option<String>,
    pub search_paths: SearchPaths,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the database is unreachable, strict startup finds a
/// missing step, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        "starting {} {} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        GIT_COMMIT_HASH
    );
    debug!("search paths: {:?}", args.search_paths);

    let mut config = Config::new();
    if let Some(url) = &args.login_url {
        config = config.with_login_url(url);
    }

    if let Some(dsn) = &args.dsn {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;
        config = config.with_db(Arc::new(pool));
    }

    let installed = Theme::new(args.search_paths).install(Some(config)).await;
    debug!("startup report: {:?}", installed.report);

    if args.strict {
        installed
            .report
            .ensure_complete()
            .context("Strict startup failed")?;
    }

    api::serve(args.port, api::app(Arc::new(installed.auth))).await
}
