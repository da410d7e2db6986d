use super::IdentityModel;
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{Connection, PgPool};
use tracing::{info_span, Instrument};

/// Storage the auth service migrates and health-checks.
#[async_trait]
pub trait Database: std::fmt::Debug + Send + Sync {
    /// Create the identity table if it does not exist.
    async fn auto_migrate(&self, model: &IdentityModel) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}

#[async_trait]
impl Database for PgPool {
    async fn auto_migrate(&self, model: &IdentityModel) -> Result<()> {
        for statement in model.migration_statements() {
            let span = info_span!(
                "db.query",
                db.system = "postgresql",
                db.operation = "CREATE",
                db.statement = statement.as_str()
            );
            sqlx::query(&statement)
                .execute(self)
                .instrument(span)
                .await
                .with_context(|| format!("Failed to migrate {}", model.table()))?;
        }

        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .acquire()
            .instrument(acquire_span)
            .await
            .context("Failed to acquire database connection")?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("Failed to ping database")
    }
}
