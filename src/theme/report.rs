use super::locales::TranslationLoad;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No database configured.
    Skipped,
    Applied,
    Failed(String),
}

/// Result of each best-effort startup step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupReport {
    pub database_configured: bool,
    pub translations: TranslationLoad,
    pub migration: MigrationOutcome,
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("no database configured for Auth theme clean")]
    MissingDatabase,
    #[error("translation file not found, searched: {searched:?}")]
    TranslationsNotFound { searched: Vec<PathBuf> },
    #[error("failed to parse translation file {}: {error}", .path.display())]
    TranslationParse { path: PathBuf, error: String },
    #[error("identity migration failed: {0}")]
    Migration(String),
}

impl StartupReport {
    /// Turn the first shortfall into an error, for callers that want startup
    /// to fail instead of running with defaults.
    ///
    /// # Errors
    /// Returns the first missing or failed step.
    pub fn ensure_complete(&self) -> Result<(), ThemeError> {
        if !self.database_configured {
            return Err(ThemeError::MissingDatabase);
        }

        match &self.translations {
            TranslationLoad::NotFound { searched } => {
                return Err(ThemeError::TranslationsNotFound {
                    searched: searched.clone(),
                })
            }
            TranslationLoad::ParseFailed { path, error } => {
                return Err(ThemeError::TranslationParse {
                    path: path.clone(),
                    error: error.clone(),
                })
            }
            TranslationLoad::Skipped | TranslationLoad::Loaded { .. } => {}
        }

        if let MigrationOutcome::Failed(error) = &self.migration {
            return Err(ThemeError::Migration(error.clone()));
        }

        Ok(())
    }
}
