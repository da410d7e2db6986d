use super::{Claims, Context, Error};
use async_trait::async_trait;

/// A pluggable authentication method.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Name used in routes, e.g. `/auth/{name}/register`.
    fn name(&self) -> &str;

    async fn register(&self, ctx: &mut Context) -> Result<Claims, Error>;
}
