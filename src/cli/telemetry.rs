use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

fn filter(verbosity_level: Option<Level>) -> Result<EnvFilter> {
    let verbosity_level = verbosity_level.unwrap_or(Level::ERROR);

    // RUST_LOG overrides the default directive
    Ok(EnvFilter::builder()
        .with_default_directive(verbosity_level.into())
        .from_env_lossy()
        .add_directive("hyper=error".parse()?)
        .add_directive("tokio=error".parse()?)
        .add_directive("sqlx=error".parse()?))
}

/// Initialize logging.
///
/// # Errors
///
/// Returns an error if the filter directives are invalid or a global
/// subscriber is already set
pub fn init(verbosity_level: Option<Level>, json: bool) -> Result<()> {
    let filter = filter(verbosity_level)?;

    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_current_span(true)
            .with_target(false);
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let fmt_layer = fmt::layer()
            .with_file(false)
            .with_line_number(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_target(false)
            .pretty();
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_to_error() {
        temp_env::with_vars([("RUST_LOG", None::<&str>)], || {
            let filter = filter(None);
            assert!(filter.is_ok());
            if let Ok(filter) = filter {
                assert_eq!(filter.max_level_hint(), Some(Level::ERROR.into()));
            }
        });
    }

    #[test]
    fn test_filter_uses_verbosity() {
        temp_env::with_vars([("RUST_LOG", None::<&str>)], || {
            let filter = filter(Some(Level::DEBUG));
            assert!(filter.is_ok());
            if let Ok(filter) = filter {
                assert_eq!(filter.max_level_hint(), Some(Level::DEBUG.into()));
            }
        });
    }
}
