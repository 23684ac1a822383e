//! Implements PreferencesPort using a JSON file.
//!
//! Holds directory view state and the per-day lunar insight cache between sessions.

use crate::domain::{DomainError, ViewPreferences};
use crate::ports::PreferencesPort;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};

/// JSON file-based preferences storage with an in-memory cache.
pub struct StateJson {
    path: PathBuf,
    cache: tokio::sync::RwLock<Option<ViewPreferences>>,
}

impl StateJson {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            cache: tokio::sync::RwLock::new(None),
        }
    }

    async fn read_from_disk(&self) -> ViewPreferences {
        match fs::read_to_string(&self.path).await {
            Ok(s) => serde_json::from_str(&s).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "preferences file unreadable, using defaults");
                ViewPreferences::default()
            }),
            Err(_) => ViewPreferences::default(),
        }
    }

    /// Atomic save: write temp file, sync_all, rename over the target.
    async fn write_atomic(&self, prefs: &ViewPreferences) -> Result<(), DomainError> {
        let json =
            serde_json::to_string_pretty(prefs).map_err(|e| DomainError::State(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| DomainError::State(format!("create state dir: {}", e)))?;
        }

        let temp_path = self.path.with_extension("json.tmp");
        let mut f = fs::File::create(&temp_path)
            .await
            .map_err(|e| DomainError::State(format!("create temp file: {}", e)))?;
        f.write_all(json.as_bytes())
            .await
            .map_err(|e| DomainError::State(format!("write temp file: {}", e)))?;
        f.sync_all()
            .await
            .map_err(|e| DomainError::State(format!("sync temp file: {}", e)))?;
        drop(f);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| DomainError::State(format!("atomic rename failed: {}", e)))?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl PreferencesPort for StateJson {
    async fn load(&self) -> Result<ViewPreferences, DomainError> {
        if let Some(prefs) = self.cache.read().await.as_ref() {
            return Ok(prefs.clone());
        }
        let prefs = self.read_from_disk().await;
        *self.cache.write().await = Some(prefs.clone());
        Ok(prefs)
    }

    async fn save(&self, prefs: &ViewPreferences) -> Result<(), DomainError> {
        self.write_atomic(prefs).await?;
        *self.cache.write().await = Some(prefs.clone());
        debug!(path = %self.path.display(), "saved preferences");
        Ok(())
    }
}
