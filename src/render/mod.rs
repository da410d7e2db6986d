//! View-path aware template renderer.
//!
//! Templates are looked up in registered view paths in registration order, so
//! paths registered first override later ones. Relative view paths resolve
//! against the renderer's root directories.

mod locale;

pub use locale::{locale_from_request, LOCALE_COOKIE, LOCALE_HEADER, LOCALE_QUERY};

use minijinja::{context, value::Rest, Environment, State, Value};
use serde::Serialize;
use std::{
    fs,
    io::ErrorKind,
    path::{Component, Path, PathBuf},
    sync::{Arc, PoisonError, RwLock},
};
use thiserror::Error;
use tracing::{debug, instrument};

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Template(#[from] minijinja::Error),
}

pub struct Render {
    env: RwLock<Environment<'static>>,
    view_paths: Arc<RwLock<Vec<PathBuf>>>,
    roots: Vec<PathBuf>,
}

impl std::fmt::Debug for Render {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Render")
            .field("view_paths", &self.view_paths())
            .field("roots", &self.roots)
            .finish_non_exhaustive()
    }
}

impl Default for Render {
    fn default() -> Self {
        Self::new()
    }
}

impl Render {
    /// Renderer resolving relative view paths against the current directory.
    #[must_use]
    pub fn new() -> Self {
        Self::with_roots(Vec::new())
    }

    /// Renderer resolving relative view paths against each of `roots`.
    #[must_use]
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        let view_paths: Arc<RwLock<Vec<PathBuf>>> = Arc::default();

        let mut env = Environment::new();
        let loader_paths = Arc::clone(&view_paths);
        env.set_loader(move |name| {
            let paths = loader_paths
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .clone();
            load_template(&paths, name)
        });

        Self {
            env: RwLock::new(env),
            view_paths,
            roots,
        }
    }

    /// Add a view path. Relative paths expand to one entry per root.
    pub fn register_view_path(&self, path: &str) {
        let path = Path::new(path);
        let resolved: Vec<PathBuf> = if path.is_absolute() || self.roots.is_empty() {
            vec![path.to_path_buf()]
        } else {
            self.roots.iter().map(|root| root.join(path)).collect()
        };

        let mut view_paths = self
            .view_paths
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for candidate in resolved {
            if !view_paths.contains(&candidate) {
                debug!("registering view path {}", candidate.display());
                view_paths.push(candidate);
            }
        }
    }

    #[must_use]
    pub fn view_paths(&self) -> Vec<PathBuf> {
        self.view_paths
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Register a helper callable from templates as `name(...)`.
    pub fn add_function<F>(&self, name: &'static str, f: F)
    where
        F: Fn(&State, &[Value]) -> Result<Value, minijinja::Error> + Send + Sync + 'static,
    {
        let mut env = self.env.write().unwrap_or_else(PoisonError::into_inner);
        env.add_function(name, move |state: &State, args: Rest<Value>| f(state, &args));
    }

    /// Render `template` for `locale`. The locale is exposed to templates and
    /// helpers as the `locale` variable.
    ///
    /// # Errors
    /// Returns an error if the template is missing or fails to render.
    #[instrument(skip(self, ctx))]
    pub fn render<S: Serialize>(
        &self,
        template: &str,
        locale: &str,
        ctx: S,
    ) -> Result<String, RenderError> {
        let env = self.env.read().unwrap_or_else(PoisonError::into_inner);
        let tmpl = env.get_template(template)?;
        let ctx = Value::from_serialize(&ctx);
        let vars = if ctx.is_none() || ctx.is_undefined() {
            context! { locale => locale }
        } else {
            context! { locale => locale, ..ctx }
        };
        Ok(tmpl.render(vars)?)
    }
}

fn load_template(view_paths: &[PathBuf], name: &str) -> Result<Option<String>, minijinja::Error> {
    let relative = Path::new(name);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return Ok(None);
    }

    for dir in view_paths {
        match fs::read_to_string(dir.join(relative)) {
            Ok(source) => return Ok(Some(source)),
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => {
                return Err(minijinja::Error::new(
                    minijinja::ErrorKind::InvalidOperation,
                    format!("could not read template {name}"),
                )
                .with_source(e))
            }
        }
    }

    Ok(None)
}
