//! YAML translation backend.
//!
//! Files map locales to nested key trees:
//!
//! ```yaml
//! en-US:
//!   auth:
//!     sign_in: Sign In
//! ```
//!
//! which flattens to the key `auth.sign_in` in locale `en-US`.

use super::{Backend, Error, Translation};
use serde_yaml::Value;
use std::{fs, path::PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Default, Clone)]
pub struct YamlBackend {
    files: Vec<PathBuf>,
}

impl YamlBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that reads `files` when translations are loaded.
    #[must_use]
    pub fn with_files(files: Vec<PathBuf>) -> Self {
        Self { files }
    }

    /// Parse YAML content into translations.
    ///
    /// # Errors
    /// Returns an error if the content is not valid YAML, the root is not a
    /// mapping, or a locale key is not a string.
    pub fn load_yaml_content(&self, content: &[u8]) -> Result<Vec<Translation>, Error> {
        let document: Value = serde_yaml::from_slice(content)?;

        let locales = match document {
            Value::Null => return Ok(Vec::new()),
            Value::Mapping(locales) => locales,
            _ => return Err(Error::NotAMapping),
        };

        let mut translations = Vec::new();
        for (locale, tree) in &locales {
            let Value::String(locale) = locale else {
                return Err(Error::InvalidLocale(format!("{locale:?}")));
            };
            flatten(locale, "", tree, &mut translations);
        }

        Ok(translations)
    }
}

impl Backend for YamlBackend {
    fn load_translations(&self) -> Vec<Translation> {
        let mut translations = Vec::new();
        for file in &self.files {
            let content = match fs::read(file) {
                Ok(content) => content,
                Err(e) => {
                    warn!("Failed to read translation file {}: {}", file.display(), e);
                    continue;
                }
            };
            match self.load_yaml_content(&content) {
                Ok(loaded) => translations.extend(loaded),
                Err(e) => warn!("Failed to parse translation file {}: {}", file.display(), e),
            }
        }
        translations
    }
}

fn flatten(locale: &str, prefix: &str, value: &Value, out: &mut Vec<Translation>) {
    match value {
        Value::Mapping(entries) => {
            for (key, child) in entries {
                let Some(key) = scalar(key) else {
                    debug!("skipping non-scalar translation key under {prefix:?}");
                    continue;
                };
                let path = if prefix.is_empty() {
                    key
                } else {
                    format!("{prefix}.{key}")
                };
                flatten(locale, &path, child, out);
            }
        }
        Value::Tagged(tagged) => flatten(locale, prefix, &tagged.value, out),
        Value::Sequence(_) => debug!("skipping sequence value for {prefix:?}"),
        scalar_value => {
            if prefix.is_empty() {
                return;
            }
            if let Some(text) = scalar(scalar_value) {
                out.push(Translation::new(locale, prefix, text));
            }
        }
    }
}

fn scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some(String::new()),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::i18n::I18n;
    use std::io::Write;

    const CONTENT: &str = r"
en-US:
  auth:
    sign_in: Sign In
    form:
      password: Password
      retries: 3
";

    #[test]
    fn nested_keys_are_flattened() {
        let backend = YamlBackend::new();
        let mut translations = backend.load_yaml_content(CONTENT.as_bytes()).unwrap();
        translations.sort_by(|a, b| a.key.cmp(&b.key));

        assert_eq!(
            translations,
            vec![
                Translation::new("en-US", "auth.form.password", "Password"),
                Translation::new("en-US", "auth.form.retries", "3"),
                Translation::new("en-US", "auth.sign_in", "Sign In"),
            ]
        );
    }

    #[test]
    fn empty_document_has_no_translations() {
        let backend = YamlBackend::new();
        assert!(backend.load_yaml_content(b"").unwrap().is_empty());
    }

    #[test]
    fn root_sequence_is_rejected() {
        let backend = YamlBackend::new();
        let result = backend.load_yaml_content(b"- a\n- b\n");
        assert!(matches!(result, Err(Error::NotAMapping)));
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let backend = YamlBackend::new();
        let result = backend.load_yaml_content(b"en-US: [unterminated");
        assert!(matches!(result, Err(Error::Yaml(_))));
    }

    #[test]
    fn files_are_read_and_missing_files_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CONTENT.as_bytes()).unwrap();

        let backend = YamlBackend::with_files(vec![
            PathBuf::from("/nonexistent/en-US.yml"),
            file.path().to_path_buf(),
        ]);
        let i18n = I18n::new(&[&backend]);

        assert_eq!(i18n.len(), 3);
        assert_eq!(i18n.t("en-US", "auth.sign_in", &[]), "Sign In");
    }
}
