use crate::auth::{
    password::{
        DefaultRegisterHandler, PasswordProvider, RegisterHandler, CONFIRM_PASSWORD_FIELD,
        PASSWORD_FIELD,
    },
    Claims, Context, Error,
};
use async_trait::async_trait;
use tracing::debug;

/// Register handler that rejects forms whose `confirm_password` differs from
/// `password` before delegating to the inner handler.
///
/// Absent fields read as empty strings, so a form with neither field passes
/// the check.
#[derive(Debug, Default, Clone)]
pub struct ConfirmedRegister<H = DefaultRegisterHandler> {
    inner: H,
}

impl ConfirmedRegister {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: DefaultRegisterHandler,
        }
    }
}

impl<H> ConfirmedRegister<H> {
    #[must_use]
    pub const fn wrap(inner: H) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<H: RegisterHandler> RegisterHandler for ConfirmedRegister<H> {
    async fn handle(
        &self,
        ctx: &mut Context,
        provider: &PasswordProvider,
    ) -> Result<Claims, Error> {
        let form = ctx.parse_form().await?;
        if form.get(CONFIRM_PASSWORD_FIELD) != form.get(PASSWORD_FIELD) {
            debug!("password confirmation mismatch");
            return Err(Error::PasswordConfirmationMismatch);
        }

        self.inner.handle(ctx, provider).await
    }
}
