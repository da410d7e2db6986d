//! Persisted identity record and its schema.

use super::Error;
use regex::Regex;

pub const DEFAULT_IDENTITY_TABLE: &str = "auth_identities";

/// The table backing registered identities.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityModel {
    table: String,
}

impl Default for IdentityModel {
    fn default() -> Self {
        Self {
            table: DEFAULT_IDENTITY_TABLE.to_string(),
        }
    }
}

impl IdentityModel {
    /// # Errors
    /// Returns [`Error::InvalidIdentityModel`] unless `table` is a plain
    /// lowercase SQL identifier.
    pub fn new(table: &str) -> Result<Self, Error> {
        if !valid_identifier(table) {
            return Err(Error::InvalidIdentityModel(table.to_string()));
        }
        Ok(Self {
            table: table.to_string(),
        })
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Idempotent statements creating the identity table and its lookup index.
    #[must_use]
    pub fn migration_statements(&self) -> Vec<String> {
        let table = &self.table;
        vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {table} (
    id BIGSERIAL PRIMARY KEY,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    deleted_at TIMESTAMPTZ,
    provider VARCHAR(255) NOT NULL,
    uid VARCHAR(255) NOT NULL,
    encrypted_password TEXT,
    auth_info TEXT,
    user_id VARCHAR(255),
    confirmed_at TIMESTAMPTZ,
    sign_logs TEXT
)"
            ),
            format!("CREATE INDEX IF NOT EXISTS {table}_provider_uid_idx ON {table} (provider, uid)"),
        ]
    }
}

fn valid_identifier(name: &str) -> bool {
    Regex::new(r"^[a-z_][a-z0-9_]{0,62}$").is_ok_and(|re| re.is_match(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table() {
        assert_eq!(IdentityModel::default().table(), "auth_identities");
    }

    #[test]
    fn rejects_unsafe_table_names() {
        assert!(IdentityModel::new("identities").is_ok());
        assert!(IdentityModel::new("users; DROP TABLE x").is_err());
        assert!(IdentityModel::new("Identities").is_err());
        assert!(IdentityModel::new("").is_err());
    }

    #[test]
    fn statements_target_the_table() {
        let model = IdentityModel::new("identities").unwrap_or_default();
        let statements = model.migration_statements();
        assert_eq!(statements.len(), 2);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS identities ("));
        assert!(statements[1].contains("identities_provider_uid_idx ON identities"));
    }
}
