//! Storage collaborator: the async key-value home of the prompt
//! collection and the per-site disable list.
//!
//! The engine only ever works on an in-memory snapshot and issues
//! save/lookup requests through [`PromptStore`]; it tolerates the store
//! lagging behind (a concurrent external write is only observed on the
//! next reload). Two implementations ship with the crate: a purely
//! in-memory store and a single-file JSON store.

use crate::prompt::{Prompt, PromptId, PromptSet};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Async persistence capability for prompts and disabled sites.
///
/// `save_prompt` upserts by case-insensitive title match; a write that
/// completes is a success. All operations are non-blocking.
#[async_trait]
pub trait PromptStore: Send + Sync {
    async fn get_prompts(&self) -> Result<Vec<Prompt>, StoreError>;
    async fn save_prompt(&self, title: &str, content: &str) -> Result<(), StoreError>;
    async fn delete_prompt(&self, id: &PromptId) -> Result<(), StoreError>;
    async fn get_disabled_sites(&self) -> Result<Vec<String>, StoreError>;
    async fn set_disabled_sites(&self, sites: Vec<String>) -> Result<(), StoreError>;
}

/// The prompts a fresh installation starts with.
pub fn default_prompts() -> Vec<Prompt> {
    let seed = [
        (
            "explain",
            "explain",
            "Explain the following concept in simple terms:",
        ),
        ("improve", "improve", "Please improve the following text:"),
        ("debug", "debug", "Help me debug this code:"),
    ];
    seed.into_iter()
        .map(|(id, title, content)| Prompt {
            id: PromptId::from_string(id.to_string()),
            title: title.to_string(),
            content: content.to_string(),
        })
        .collect()
}

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    prompts: PromptSet,
    #[serde(default)]
    disabled_sites: Vec<String>,
}

// ─── In-memory store ────────────────────────────────────────────────────

/// In-memory store, seeded with the default prompts. Useful for tests
/// and for hosts that bring their own persistence.
#[derive(Debug)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
}

impl MemoryStore {
    /// Create a store seeded with [`default_prompts`]
    pub fn new() -> Self {
        Self::with_prompts(default_prompts())
    }

    /// Create a store holding exactly `prompts`
    pub fn with_prompts(prompts: Vec<Prompt>) -> Self {
        Self {
            data: RwLock::new(StoreData {
                prompts: PromptSet::from_prompts(prompts),
                disabled_sites: Vec::new(),
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PromptStore for MemoryStore {
    async fn get_prompts(&self) -> Result<Vec<Prompt>, StoreError> {
        Ok(self.data.read().await.prompts.iter().cloned().collect())
    }

    async fn save_prompt(&self, title: &str, content: &str) -> Result<(), StoreError> {
        self.data.write().await.prompts.upsert(title, content);
        Ok(())
    }

    async fn delete_prompt(&self, id: &PromptId) -> Result<(), StoreError> {
        self.data.write().await.prompts.remove(id);
        Ok(())
    }

    async fn get_disabled_sites(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.data.read().await.disabled_sites.clone())
    }

    async fn set_disabled_sites(&self, sites: Vec<String>) -> Result<(), StoreError> {
        self.data.write().await.disabled_sites = sites;
        Ok(())
    }
}

// ─── JSON file store ────────────────────────────────────────────────────

/// Single-file JSON store.
///
/// The whole collection lives in one document that is rewritten on every
/// mutation; prompt collections are small enough that this stays cheap.
pub struct JsonFileStore {
    path: PathBuf,
    data: RwLock<StoreData>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating and seeding it with the
    /// default prompts when the file does not exist yet.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let data = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %path.display(), "seeding new prompt store");
                let data = StoreData {
                    prompts: PromptSet::from_prompts(default_prompts()),
                    disabled_sites: Vec::new(),
                };
                write_data(&path, &data).await?;
                data
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

async fn write_data(path: &Path, data: &StoreData) -> Result<(), StoreError> {
    let json = serde_json::to_vec_pretty(data)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

#[async_trait]
impl PromptStore for JsonFileStore {
    async fn get_prompts(&self) -> Result<Vec<Prompt>, StoreError> {
        Ok(self.data.read().await.prompts.iter().cloned().collect())
    }

    async fn save_prompt(&self, title: &str, content: &str) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        data.prompts.upsert(title, content);
        write_data(&self.path, &data).await
    }

    async fn delete_prompt(&self, id: &PromptId) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        data.prompts.remove(id);
        write_data(&self.path, &data).await
    }

    async fn get_disabled_sites(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.data.read().await.disabled_sites.clone())
    }

    async fn set_disabled_sites(&self, sites: Vec<String>) -> Result<(), StoreError> {
        let mut data = self.data.write().await;
        data.disabled_sites = sites;
        write_data(&self.path, &data).await
    }
}
