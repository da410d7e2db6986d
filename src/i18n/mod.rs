//! Translation registry.
//!
//! An [`I18n`] registry holds translations keyed by locale and key. It is
//! constructed explicitly and shared via `Arc`, never stored globally.

pub mod yaml;

pub use yaml::YamlBackend;

use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};
use thiserror::Error;
use tracing::debug;

/// Locale used when a key is missing in the requested locale.
pub const DEFAULT_LOCALE: &str = "en-US";

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("translation document root must be a mapping of locales")]
    NotAMapping,
    #[error("invalid locale key: {0}")]
    InvalidLocale(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub locale: String,
    pub key: String,
    pub value: String,
}

impl Translation {
    #[must_use]
    pub fn new(locale: impl Into<String>, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Source of translations for an [`I18n`] registry.
pub trait Backend: Send + Sync {
    fn load_translations(&self) -> Vec<Translation>;
}

#[derive(Debug, Default)]
pub struct I18n {
    // locale -> key -> value
    translations: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl I18n {
    /// Build a registry preloaded with every translation the backends return.
    #[must_use]
    pub fn new(backends: &[&dyn Backend]) -> Self {
        let i18n = Self::default();
        for backend in backends {
            for translation in backend.load_translations() {
                i18n.add_translation(translation);
            }
        }
        i18n
    }

    /// Insert or replace a translation.
    pub fn add_translation(&self, translation: Translation) {
        let mut translations = self
            .translations
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        translations
            .entry(translation.locale)
            .or_default()
            .insert(translation.key, translation.value);
    }

    /// Translate `key` for `locale`.
    ///
    /// Falls back to [`DEFAULT_LOCALE`] and then to the key itself. Named
    /// arguments replace `{{name}}` or `{{.name}}` placeholders.
    #[must_use]
    pub fn t(&self, locale: &str, key: &str, args: &[(String, String)]) -> String {
        let translations = self
            .translations
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let value = translations
            .get(locale)
            .and_then(|keys| keys.get(key))
            .or_else(|| {
                translations
                    .get(DEFAULT_LOCALE)
                    .and_then(|keys| keys.get(key))
            });

        match value {
            Some(value) => interpolate(value, args),
            None => {
                debug!(locale, key, "missing translation");
                key.to_string()
            }
        }
    }

    /// Number of translations across all locales.
    #[must_use]
    pub fn len(&self) -> usize {
        self.translations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(HashMap::len)
            .sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn interpolate(value: &str, args: &[(String, String)]) -> String {
    if args.is_empty() || !value.contains("{{") {
        return value.to_string();
    }

    // Single pass: substituted values are never scanned again.
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let Some(end) = tail.find("}}") else {
            out.push_str(tail);
            return out;
        };

        let placeholder = &tail[..end + 2];
        let name = tail[2..end].trim();
        let name = name.strip_prefix('.').unwrap_or(name);
        match args.iter().find(|(arg, _)| arg == name) {
            Some((_, arg)) => out.push_str(arg),
            None => out.push_str(placeholder),
        }
        rest = &tail[end + 2..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Vec<Translation>);

    impl Backend for Fixed {
        fn load_translations(&self) -> Vec<Translation> {
            self.0.clone()
        }
    }

    #[test]
    fn missing_key_echoes_key() {
        let i18n = I18n::default();
        assert!(i18n.is_empty());
        assert_eq!(i18n.t("en-US", "auth.sign_in", &[]), "auth.sign_in");
    }

    #[test]
    fn backends_are_loaded_on_construction() {
        let backend = Fixed(vec![
            Translation::new("en-US", "auth.sign_in", "Sign In"),
            Translation::new("de-DE", "auth.sign_in", "Anmelden"),
        ]);
        let i18n = I18n::new(&[&backend]);
        assert_eq!(i18n.len(), 2);
        assert_eq!(i18n.t("de-DE", "auth.sign_in", &[]), "Anmelden");
    }

    #[test]
    fn unknown_locale_falls_back_to_default() {
        let i18n = I18n::default();
        i18n.add_translation(Translation::new("en-US", "auth.sign_up", "Sign Up"));
        assert_eq!(i18n.t("fr-FR", "auth.sign_up", &[]), "Sign Up");
    }

    #[test]
    fn later_translation_replaces_earlier() {
        let i18n = I18n::default();
        i18n.add_translation(Translation::new("en-US", "k", "one"));
        i18n.add_translation(Translation::new("en-US", "k", "two"));
        assert_eq!(i18n.len(), 1);
        assert_eq!(i18n.t("en-US", "k", &[]), "two");
    }

    #[test]
    fn named_arguments_are_interpolated() {
        let i18n = I18n::default();
        i18n.add_translation(Translation::new(
            "en-US",
            "auth.welcome",
            "Welcome {{name}}, you have {{ .count }} messages",
        ));
        let args = vec![
            ("name".to_string(), "alice".to_string()),
            ("count".to_string(), "3".to_string()),
        ];
        assert_eq!(
            i18n.t("en-US", "auth.welcome", &args),
            "Welcome alice, you have 3 messages"
        );
    }

    #[test]
    fn argument_values_are_not_substituted_again() {
        let i18n = I18n::default();
        i18n.add_translation(Translation::new("en-US", "k", "Hi {{name}}, {{missing}} {{count"));
        let args = vec![
            ("name".to_string(), "{{count}}".to_string()),
            ("count".to_string(), "3".to_string()),
        ];
        assert_eq!(i18n.t("en-US", "k", &args), "Hi {{count}}, {{missing}} {{count");
    }
}
