//! JSON persistence of profile containers
//!
//! Containers live as individual `.json` files in one profiles directory.
//! Writes go to a `.tmp` sibling first and are renamed into place.

use crate::container::{container_file_name, ProfileContainer};
use cronostar_core::PresetType;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info};

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid container JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("container {file} holds preset '{found}', expected '{expected}'")]
    PresetMismatch {
        file: String,
        expected: PresetType,
        found: PresetType,
    },
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Reads and writes profile containers in a directory
#[derive(Debug, Clone)]
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    async fn ensure_dir(&self) -> StorageResult<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| io_error(&self.dir, e))?;
            debug!("Created profiles directory: {:?}", self.dir);
        }
        Ok(())
    }

    /// Load a container, `None` if the file does not exist
    pub async fn load(&self, file_name: &str) -> StorageResult<Option<ProfileContainer>> {
        let path = self.file_path(file_name);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Container not found: {}", file_name);
                return Ok(None);
            }
            Err(e) => return Err(io_error(&path, e)),
        };

        let container: ProfileContainer =
            serde_json::from_str(&content).map_err(|source| StorageError::Json {
                path: path.clone(),
                source,
            })?;

        debug!(
            "Loaded container {} ({} profiles)",
            file_name,
            container.profiles.len()
        );

        Ok(Some(container))
    }

    /// Save a container atomically
    pub async fn save(&self, file_name: &str, container: &ProfileContainer) -> StorageResult<()> {
        self.ensure_dir().await?;

        let path = self.file_path(file_name);
        let temp_path = self.file_path(&format!("{}.tmp", file_name));

        let content = serde_json::to_string_pretty(container).map_err(|source| {
            StorageError::Json {
                path: path.clone(),
                source,
            }
        })?;

        fs::write(&temp_path, &content)
            .await
            .map_err(|e| io_error(&temp_path, e))?;
        fs::rename(&temp_path, &path)
            .await
            .map_err(|e| io_error(&path, e))?;

        debug!("Saved container {}", file_name);
        Ok(())
    }

    /// Delete a container file; missing files are not an error
    pub async fn delete(&self, file_name: &str) -> StorageResult<()> {
        let path = self.file_path(file_name);
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!("Deleted container {}", file_name);
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(&path, e)),
        }
    }

    /// File names of all containers, sorted
    pub async fn list_containers(&self) -> StorageResult<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.dir)
            .await
            .map_err(|e| io_error(&self.dir, e))?;

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| io_error(&self.dir, e))?
        {
            let is_file = entry
                .file_type()
                .await
                .map(|t| t.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if name.ends_with(".json") {
                    names.push(name.to_string());
                }
            }
        }

        names.sort();
        Ok(names)
    }

    /// Insert or replace a profile, creating the container if needed
    ///
    /// Returns the container file name.
    pub async fn save_profile(
        &self,
        preset: PresetType,
        global_prefix: &str,
        profile_name: &str,
        schedule: Vec<serde_json::Value>,
    ) -> StorageResult<String> {
        let file_name = container_file_name(preset, global_prefix);

        let mut container = match self.load(&file_name).await? {
            Some(existing) => {
                if existing.meta.preset_type != preset {
                    return Err(StorageError::PresetMismatch {
                        file: file_name,
                        expected: preset,
                        found: existing.meta.preset_type,
                    });
                }
                existing
            }
            None => ProfileContainer::new(preset, global_prefix),
        };

        container.upsert_profile(profile_name, schedule);
        self.save(&file_name, &container).await?;

        info!(
            container = %file_name,
            profile = %profile_name,
            "Saved profile"
        );
        Ok(file_name)
    }

    /// Remove a profile; returns whether it existed
    pub async fn delete_profile(
        &self,
        preset: PresetType,
        global_prefix: &str,
        profile_name: &str,
    ) -> StorageResult<bool> {
        let file_name = container_file_name(preset, global_prefix);

        let Some(mut container) = self.load(&file_name).await? else {
            return Ok(false);
        };

        if !container.remove_profile(profile_name) {
            return Ok(false);
        }

        self.save(&file_name, &container).await?;
        info!(
            container = %file_name,
            profile = %profile_name,
            "Deleted profile"
        );
        Ok(true)
    }
}

fn io_error(path: &Path, source: std::io::Error) -> StorageError {
    StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}
