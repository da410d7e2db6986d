//! Password provider.
//!
//! Registration is delegated to a [`RegisterHandler`]. Without an explicit
//! handler the provider uses [`DefaultRegisterHandler`].

use super::{Claims, Context, Error, Provider};
use async_trait::async_trait;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, instrument};

pub const PROVIDER_NAME: &str = "password";

pub const LOGIN_FIELD: &str = "login";
pub const PASSWORD_FIELD: &str = "password";
pub const CONFIRM_PASSWORD_FIELD: &str = "confirm_password";

#[async_trait]
pub trait RegisterHandler: Send + Sync {
    async fn handle(&self, ctx: &mut Context, provider: &PasswordProvider)
        -> Result<Claims, Error>;
}

#[derive(Default)]
pub struct PasswordConfig {
    /// Accounts must be confirmed before full use.
    pub confirmable: bool,
    pub register_handler: Option<Arc<dyn RegisterHandler>>,
}

pub struct PasswordProvider {
    confirmable: bool,
    register_handler: Arc<dyn RegisterHandler>,
}

impl std::fmt::Debug for PasswordProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordProvider")
            .field("confirmable", &self.confirmable)
            .finish_non_exhaustive()
    }
}

impl PasswordProvider {
    #[must_use]
    pub fn new(config: PasswordConfig) -> Self {
        Self {
            confirmable: config.confirmable,
            register_handler: config
                .register_handler
                .unwrap_or_else(|| Arc::new(DefaultRegisterHandler)),
        }
    }

    #[must_use]
    pub const fn is_confirmable(&self) -> bool {
        self.confirmable
    }
}

#[async_trait]
impl Provider for PasswordProvider {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    async fn register(&self, ctx: &mut Context) -> Result<Claims, Error> {
        self.register_handler.handle(ctx, self).await
    }
}

/// Accepts an email-shaped `login` and a non-empty `password`.
///
/// Password hashing and identity persistence happen outside this crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultRegisterHandler;

#[async_trait]
impl RegisterHandler for DefaultRegisterHandler {
    #[instrument(skip_all)]
    async fn handle(
        &self,
        ctx: &mut Context,
        provider: &PasswordProvider,
    ) -> Result<Claims, Error> {
        let form = ctx.parse_form().await?;
        let login = normalize_email(form.get(LOGIN_FIELD));

        if !valid_email(&login) || form.get(PASSWORD_FIELD).is_empty() {
            debug!("rejecting registration with invalid login or empty password");
            return Err(Error::InvalidAccount);
        }

        Ok(Claims {
            provider: PROVIDER_NAME.to_string(),
            user_id: login,
            confirmed: !provider.is_confirmable(),
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}
