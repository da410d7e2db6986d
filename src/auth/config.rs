use super::{Database, IdentityModel};
use crate::render::Render;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Template directories, searched in order.
    pub view_paths: Vec<String>,
    pub db: Option<Arc<dyn Database>>,
    pub render: Option<Arc<Render>>,
    pub auth_identity_model: IdentityModel,
    /// Where the login page posts credentials. The form is hidden without it.
    pub login_url: Option<String>,
}

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_view_path(mut self, path: impl Into<String>) -> Self {
        self.view_paths.push(path.into());
        self
    }

    #[must_use]
    pub fn with_db(mut self, db: Arc<dyn Database>) -> Self {
        self.db = Some(db);
        self
    }

    #[must_use]
    pub fn with_render(mut self, render: Arc<Render>) -> Self {
        self.render = Some(render);
        self
    }

    #[must_use]
    pub fn with_login_url(mut self, url: impl Into<String>) -> Self {
        self.login_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_identity_model(mut self, model: IdentityModel) -> Self {
        self.auth_identity_model = model;
        self
    }
}
