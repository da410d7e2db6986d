//! The clean theme.
//!
//! [`new`] layers the theme's views, translations and password provider onto
//! an [`Auth`] service. Every step is best effort; [`Theme::install`] reports
//! what happened and [`new_strict`] fails on the first shortfall.

mod locales;
mod register;
mod report;

pub use locales::{
    load_translations, SearchPaths, TranslationLoad, APP_ROOT_ENV, THEME_PATH_ENV,
};
pub use register::ConfirmedRegister;
pub use report::{MigrationOutcome, StartupReport, ThemeError};

use crate::{
    auth::{
        password::{PasswordConfig, PasswordProvider},
        Auth, Config,
    },
    i18n::{I18n, YamlBackend, DEFAULT_LOCALE},
    render::Render,
};
use minijinja::{value::ValueKind, ErrorKind, HtmlEscape, State, Value};
use std::{path::Path, sync::Arc};
use tracing::{info, instrument, warn};

/// View directory shipped with the theme, relative to the search roots.
pub const VIEW_PATH: &str = "auth_themes/clean/views";

/// Translation file shipped with the theme, relative to the locale directories.
pub const LOCALE_FILE: &str = "auth_themes/clean/locales/en-US.yml";

/// Build an [`Auth`] service configured with the clean theme.
///
/// Never fails: missing translations, a missing database or a failed
/// migration are logged and the service is returned anyway.
pub async fn new(config: Option<Config>) -> Auth {
    Theme::default().install(config).await.auth
}

/// Like [`new`], but any best-effort shortfall is returned as an error.
///
/// # Errors
/// See [`StartupReport::ensure_complete`].
pub async fn new_strict(config: Option<Config>) -> Result<Auth, ThemeError> {
    let installed = Theme::default().install(config).await;
    installed.report.ensure_complete()?;
    Ok(installed.auth)
}

#[derive(Debug)]
pub struct Installed {
    pub auth: Auth,
    pub report: StartupReport,
}

#[derive(Debug, Clone, Default)]
pub struct Theme {
    search_paths: SearchPaths,
}

impl Theme {
    #[must_use]
    pub const fn new(search_paths: SearchPaths) -> Self {
        Self { search_paths }
    }

    #[must_use]
    pub const fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    #[instrument(skip_all)]
    pub async fn install(&self, config: Option<Config>) -> Installed {
        let mut config = config.unwrap_or_default();
        config.view_paths.push(VIEW_PATH.to_string());

        let database_configured = config.db.is_some();
        if !database_configured {
            warn!("Please configure a database for Auth theme clean");
        }

        let translations = if config.render.is_none() {
            let (render, load) = self.build_render();
            config.render = Some(Arc::new(render));
            load
        } else {
            TranslationLoad::Skipped
        };

        let mut auth = Auth::new(config);

        auth.register_provider(PasswordProvider::new(PasswordConfig {
            confirmable: true,
            register_handler: Some(Arc::new(ConfirmedRegister::new())),
        }));

        let migration = match auth.config().db.clone() {
            Some(db) => {
                let model = &auth.config().auth_identity_model;
                match db.auto_migrate(model).await {
                    Ok(()) => {
                        info!("migrated identity table {}", model.table());
                        MigrationOutcome::Applied
                    }
                    Err(e) => {
                        warn!("Failed to migrate identity table {}: {:#}", model.table(), e);
                        MigrationOutcome::Failed(format!("{e:#}"))
                    }
                }
            }
            None => MigrationOutcome::Skipped,
        };

        Installed {
            auth,
            report: StartupReport {
                database_configured,
                translations,
                migration,
            },
        }
    }

    fn build_render(&self) -> (Render, TranslationLoad) {
        let backend = YamlBackend::new();
        let i18n = Arc::new(I18n::default());

        let load = load_translations(
            &i18n,
            &backend,
            &self.search_paths.locale_dirs(),
            Path::new(LOCALE_FILE),
        );

        let render = Render::with_roots(self.search_paths.view_roots());
        render.add_function("t", move |state, args| translate(&i18n, state, args));

        (render, load)
    }
}

/// Template helper `t(key, args?)`.
///
/// The locale comes from the `locale` variable of the render. Map arguments
/// supply named placeholders; their values are HTML-escaped and the result is
/// marked safe. Any other argument is an error.
fn translate(i18n: &I18n, state: &State, args: &[Value]) -> Result<Value, minijinja::Error> {
    let key = args.first().and_then(Value::as_str).ok_or_else(|| {
        minijinja::Error::new(ErrorKind::MissingArgument, "t expects a translation key")
    })?;

    let locale = state
        .lookup("locale")
        .and_then(|value| value.as_str().map(str::to_string))
        .unwrap_or_else(|| DEFAULT_LOCALE.to_string());

    let mut named = Vec::new();
    for arg in args.iter().skip(1) {
        if arg.kind() != ValueKind::Map {
            return Err(minijinja::Error::new(
                ErrorKind::InvalidOperation,
                format!("t({key:?}) expects named arguments as a map, got {:?}", arg.kind()),
            ));
        }
        for name in arg.try_iter()? {
            let value = arg.get_item(&name)?;
            named.push((name.to_string(), HtmlEscape(&value.to_string()).to_string()));
        }
    }

    Ok(Value::from_safe_string(i18n.t(&locale, key, &named)))
}
