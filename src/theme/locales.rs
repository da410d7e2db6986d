//! Locating and loading the theme's translation file.

use crate::i18n::{I18n, YamlBackend};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

pub const APP_ROOT_ENV: &str = "CLEAN_THEME_APP_ROOT";
pub const THEME_PATH_ENV: &str = "CLEAN_THEME_PATH";

/// Directories probed for theme assets.
///
/// Translation files are searched in `<app_root>/vendor` and then in each
/// theme path entry. Views additionally resolve against the app root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    pub app_root: PathBuf,
    pub theme_path: Vec<PathBuf>,
}

impl Default for SearchPaths {
    fn default() -> Self {
        Self::from_env()
    }
}

impl SearchPaths {
    #[must_use]
    pub const fn new(app_root: PathBuf, theme_path: Vec<PathBuf>) -> Self {
        Self {
            app_root,
            theme_path,
        }
    }

    /// `CLEAN_THEME_APP_ROOT` (default: current directory) and the
    /// `CLEAN_THEME_PATH` path list (default: this crate's source directory,
    /// where the bundled assets live).
    #[must_use]
    pub fn from_env() -> Self {
        let app_root = env::var_os(APP_ROOT_ENV)
            .map(PathBuf::from)
            .or_else(|| env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));

        let theme_path = env::var_os(THEME_PATH_ENV)
            .map(|paths| env::split_paths(&paths).collect::<Vec<_>>())
            .filter(|paths| !paths.is_empty())
            .unwrap_or_else(|| vec![PathBuf::from(env!("CARGO_MANIFEST_DIR"))]);

        Self::new(app_root, theme_path)
    }

    #[must_use]
    pub fn vendor_dir(&self) -> PathBuf {
        self.app_root.join("vendor")
    }

    /// Base directories for translation files, in probe order.
    #[must_use]
    pub fn locale_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.vendor_dir()];
        dirs.extend(self.theme_path.iter().cloned());
        dirs
    }

    /// Roots that relative view paths resolve against.
    #[must_use]
    pub fn view_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.app_root.clone(), self.vendor_dir()];
        roots.extend(self.theme_path.iter().cloned());
        roots
    }
}

/// What happened when the theme looked for its translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranslationLoad {
    /// The caller supplied a renderer, so no translations were loaded.
    Skipped,
    Loaded { path: PathBuf, count: usize },
    /// The first readable file failed to parse; later candidates were not tried.
    ParseFailed { path: PathBuf, error: String },
    NotFound { searched: Vec<PathBuf> },
}

/// Load `relative` from the first directory in `dirs` where it is readable.
pub fn load_translations(
    i18n: &I18n,
    backend: &YamlBackend,
    dirs: &[PathBuf],
    relative: &Path,
) -> TranslationLoad {
    let mut searched = Vec::with_capacity(dirs.len());

    for dir in dirs {
        let path = dir.join(relative);
        let content = match fs::read(&path) {
            Ok(content) => content,
            Err(e) => {
                debug!("translation file {} not readable: {}", path.display(), e);
                searched.push(path);
                continue;
            }
        };

        return match backend.load_yaml_content(&content) {
            Ok(translations) => {
                let count = translations.len();
                for translation in translations {
                    i18n.add_translation(translation);
                }
                info!("loaded {} translations from {}", count, path.display());
                TranslationLoad::Loaded { path, count }
            }
            Err(e) => {
                warn!("Failed to parse translation file {}: {}", path.display(), e);
                TranslationLoad::ParseFailed {
                    path,
                    error: e.to_string(),
                }
            }
        };
    }

    TranslationLoad::NotFound { searched }
}
