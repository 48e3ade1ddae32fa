//! Flat-file JSON cache of fetched matches, one document per match ID

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument, warn};

use super::types::CacheStats;
use crate::constants::cache::{FILE_EXTENSION, MIN_CACHE_FILE_BYTES};
use crate::data_fetcher::models::{MatchId, MatchRecord};
use crate::error::AppError;

/// Durable cache of match payloads keyed by match ID.
///
/// Entries are never expired or evicted; a file that exists with meaningful
/// content is trusted across runs.
#[derive(Debug, Clone)]
pub struct MatchCache {
    dir: PathBuf,
}

impl MatchCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Creates the cache directory if it doesn't exist
    pub async fn ensure_dir(&self) -> Result<(), AppError> {
        if !fs::try_exists(&self.dir).await.unwrap_or(false) {
            debug!("Creating match cache directory: {}", self.dir.display());
            fs::create_dir_all(&self.dir).await?;
        }
        Ok(())
    }

    /// Path of the cache file for a match, or `None` if the ID cannot be used as a file name
    pub fn path_for(&self, id: &MatchId) -> Option<PathBuf> {
        let raw = id.as_str();
        let usable = !raw.is_empty()
            && raw != "."
            && raw != ".."
            && !raw.contains(['/', '\\', '\0']);
        usable.then(|| self.dir.join(format!("{raw}.{FILE_EXTENSION}")))
    }

    /// True iff a cache file for the ID exists and holds more than a few bytes.
    ///
    /// Anything at or below `MIN_CACHE_FILE_BYTES` is treated as a partial write.
    pub async fn exists(&self, id: &MatchId) -> bool {
        let Some(path) = self.path_for(id) else {
            return false;
        };
        match fs::metadata(&path).await {
            Ok(meta) => meta.is_file() && meta.len() > MIN_CACHE_FILE_BYTES,
            Err(_) => false,
        }
    }

    /// Loads and deserializes a cached match
    #[instrument(skip(self, id), fields(match_id = %id))]
    pub async fn load(&self, id: &MatchId) -> Result<MatchRecord, AppError> {
        let path = self
            .path_for(id)
            .ok_or_else(|| AppError::cache_corrupt(id.as_str(), "Match ID is not a usable file name"))?;

        let content = fs::read_to_string(&path).await?;
        serde_json::from_str::<MatchRecord>(&content).map_err(|e| {
            warn!("Failed to parse cached match {}: {}", path.display(), e);
            AppError::cache_corrupt(path.display().to_string(), e.to_string())
        })
    }

    /// Serializes and stores a match.
    ///
    /// The document is written to a temporary sibling and renamed into place,
    /// so readers see either the old state or the complete new file.
    #[instrument(skip(self, id, record), fields(match_id = %id))]
    pub async fn store(&self, id: &MatchId, record: &MatchRecord) -> Result<(), AppError> {
        let path = self.path_for(id).ok_or_else(|| {
            AppError::config_error(format!("Refusing to cache match with unusable ID '{id}'"))
        })?;
        self.ensure_dir().await?;

        let content = serde_json::to_vec(record)?;
        let tmp_path = path.with_extension(format!("{FILE_EXTENSION}.tmp"));

        let mut file = fs::File::create(&tmp_path).await?;
        file.write_all(&content).await?;
        file.flush().await?;
        file.sync_all().await?;
        drop(file);

        if let Err(e) = fs::rename(&tmp_path, &path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!("Cached match {} ({} bytes)", id, content.len());
        Ok(())
    }

    /// Lists the IDs of every complete entry in the cache, sorted
    pub async fn list_ids(&self) -> Result<Vec<MatchId>, AppError> {
        let mut ids = Vec::new();
        if !fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Ok(ids);
        }

        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let meta = entry.metadata().await?;
            if meta.is_file() && meta.len() > MIN_CACHE_FILE_BYTES {
                ids.push(MatchId::new(stem));
            }
        }

        ids.sort();
        Ok(ids)
    }

    /// Entry count and total size of the cache directory
    pub async fn stats(&self) -> Result<CacheStats, AppError> {
        let mut stats = CacheStats {
            dir: self.dir.display().to_string(),
            ..CacheStats::default()
        };
        if !fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Ok(stats);
        }

        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let meta = entry.metadata().await?;
            if !meta.is_file() {
                continue;
            }
            if meta.len() > MIN_CACHE_FILE_BYTES {
                stats.entries += 1;
            } else {
                stats.partial_entries += 1;
            }
            stats.total_bytes += meta.len();
        }

        Ok(stats)
    }

    /// Removes every cached match and leftover temporary file. Returns the number of files removed.
    pub async fn clear(&self) -> Result<usize, AppError> {
        if !fs::try_exists(&self.dir).await.unwrap_or(false) {
            return Ok(0);
        }

        let mut removed = 0;
        let mut entries = fs::read_dir(&self.dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
            let ours = name.ends_with(&format!(".{FILE_EXTENSION}"))
                || name.ends_with(&format!(".{FILE_EXTENSION}.tmp"));
            if ours && entry.metadata().await?.is_file() {
                fs::remove_file(&path).await?;
                removed += 1;
            }
        }

        info!("Cleared {} files from {}", removed, self.dir.display());
        Ok(removed)
    }
}
