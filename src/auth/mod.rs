//! Authentication service.
//!
//! [`Auth`] owns the [`Config`] and the registered [`Provider`]s. Themes
//! configure it; hosts mount [`Auth::router`] into their application.

mod claims;
mod config;
mod context;
mod database;
mod error;
mod handlers;
mod identity;
pub mod password;
mod provider;

pub use claims::Claims;
pub use config::Config;
pub use context::{Context, Form, MAX_FORM_BYTES};
pub use database::Database;
pub use error::Error;
pub use identity::{IdentityModel, DEFAULT_IDENTITY_TABLE};
pub use provider::Provider;

use crate::render::Render;
use axum::Router;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct Auth {
    config: Config,
    render: Arc<Render>,
    providers: Vec<Arc<dyn Provider>>,
}

impl std::fmt::Debug for Auth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Auth")
            .field("config", &self.config)
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl Auth {
    /// Build the service, creating a renderer when the config has none and
    /// registering every configured view path with it.
    #[must_use]
    pub fn new(mut config: Config) -> Self {
        let render = Arc::clone(
            config
                .render
                .get_or_insert_with(|| Arc::new(Render::new())),
        );

        for path in &config.view_paths {
            render.register_view_path(path);
        }

        Self {
            config,
            render,
            providers: Vec::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn render(&self) -> &Render {
        &self.render
    }

    /// Register a provider, replacing any provider with the same name.
    pub fn register_provider<P: Provider + 'static>(&mut self, provider: P) {
        let provider: Arc<dyn Provider> = Arc::new(provider);
        if let Some(existing) = self
            .providers
            .iter_mut()
            .find(|p| p.name() == provider.name())
        {
            warn!("replacing auth provider {}", provider.name());
            *existing = provider;
            return;
        }
        debug!("registered auth provider {}", provider.name());
        self.providers.push(provider);
    }

    #[must_use]
    pub fn provider(&self, name: &str) -> Option<Arc<dyn Provider>> {
        self.providers.iter().find(|p| p.name() == name).cloned()
    }

    #[must_use]
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    /// Routes under `/auth`: login and register pages, and
    /// `POST /auth/:provider/register`.
    #[must_use]
    pub fn router(self: Arc<Self>) -> Router {
        handlers::router(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Named(&'static str, &'static str);

    #[async_trait]
    impl Provider for Named {
        fn name(&self) -> &str {
            self.0
        }

        async fn register(&self, _ctx: &mut Context) -> Result<Claims, Error> {
            Ok(Claims {
                provider: self.0.to_string(),
                user_id: self.1.to_string(),
                confirmed: true,
            })
        }
    }

    #[test]
    fn new_fills_render_and_registers_view_paths() {
        let auth = Auth::new(Config::new().with_view_path("/srv/views"));
        assert!(auth.config().render.is_some());
        assert_eq!(
            auth.render().view_paths(),
            vec![std::path::PathBuf::from("/srv/views")]
        );
    }

    #[test]
    fn new_keeps_supplied_render() {
        let render = Arc::new(Render::new());
        let auth = Auth::new(Config::new().with_render(Arc::clone(&render)));
        let kept = auth.config().render.as_ref().map(Arc::as_ptr);
        assert_eq!(kept, Some(Arc::as_ptr(&render)));
    }

    #[tokio::test]
    async fn providers_are_replaced_by_name() {
        let mut auth = Auth::new(Config::new());
        auth.register_provider(Named("password", "first"));
        auth.register_provider(Named("github", "gh"));
        auth.register_provider(Named("password", "second"));

        assert_eq!(auth.provider_names(), vec!["password", "github"]);
        assert!(auth.provider("google").is_none());

        let provider = auth.provider("password").unwrap();
        let mut ctx = Context::new(axum::http::Request::new(axum::body::Body::empty()));
        let claims = provider.register(&mut ctx).await.unwrap();
        assert_eq!(claims.user_id, "second");
    }
}
