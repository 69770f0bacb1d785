//! Extension points invoked while switching locales.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;

/// Failure of a message load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("locale \"{0}\" has no message source")]
    Missing(String),

    #[error("failed to read messages: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Loads locale messages before a locale counts as set.
#[async_trait]
pub trait MessageLoader: Send + Sync {
    async fn load(&self, locale: &str) -> Result<(), LoadError>;
}

/// Callbacks around a locale switch.
pub trait LanguageSwitchHook: Send + Sync {
    fn before_language_switch(&self, _old: Option<&str>, _new: &str) {}

    fn on_language_switched(&self, _old: Option<&str>, _new: &str) {}
}

/// Loads `<dir>/<file>` for locales that declare a message file.
///
/// Only checks the file is readable; message contents belong to the host.
#[derive(Debug)]
pub struct FileMessageLoader {
    dir: PathBuf,
    files: Vec<(String, String)>,
    loaded: Mutex<HashSet<String>>,
}

impl FileMessageLoader {
    pub fn new(dir: impl Into<PathBuf>, files: Vec<(String, String)>) -> Self {
        Self {
            dir: dir.into(),
            files,
            loaded: Mutex::new(HashSet::new()),
        }
    }

    pub fn is_loaded(&self, locale: &str) -> bool {
        self.loaded
            .lock()
            .map(|loaded| loaded.contains(locale))
            .unwrap_or(false)
    }
}

#[async_trait]
impl MessageLoader for FileMessageLoader {
    async fn load(&self, locale: &str) -> Result<(), LoadError> {
        if self.is_loaded(locale) {
            return Ok(());
        }
        let file = self
            .files
            .iter()
            .find(|(code, _)| code == locale)
            .map(|(_, file)| self.dir.join(file))
            .ok_or_else(|| LoadError::Missing(locale.to_string()))?;

        tokio::fs::metadata(&file).await?;
        tracing::debug!(locale, file = %file.display(), "Locale messages loaded");

        if let Ok(mut loaded) = self.loaded.lock() {
            loaded.insert(locale.to_string());
        }
        Ok(())
    }
}
