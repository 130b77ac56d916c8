//! Management-surface operations: the list/save/delete side of the
//! prompt collection plus the per-site toggle, for a settings UI to
//! build on.
//!
//! Unlike the inline engine these operations report persistence failures
//! to the caller, which is expected to surface them to the user.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::prompt::{validate_title, Prompt, PromptId};
use crate::store::PromptStore;
use std::sync::Arc;

/// Whether a save created a new prompt or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// Thin management layer over a [`PromptStore`].
pub struct PromptManager {
    store: Arc<dyn PromptStore>,
}

impl PromptManager {
    pub fn new(store: Arc<dyn PromptStore>) -> Self {
        Self { store }
    }

    pub async fn list_prompts(&self) -> Result<Vec<Prompt>, EngineError> {
        Ok(self.store.get_prompts().await?)
    }

    /// Validate and save a prompt.
    ///
    /// Title and content are trimmed and must be non-empty; the title
    /// must pass the allowed-character policy. Saving over an existing
    /// title requires `overwrite` (the UI's confirm step), otherwise
    /// [`EngineError::DuplicateTitle`] is returned.
    pub async fn save_prompt(
        &self,
        title: &str,
        content: &str,
        overwrite: bool,
    ) -> Result<SaveOutcome, EngineError> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(EngineError::EmptyPrompt);
        }
        validate_title(title)?;

        let exists = self
            .store
            .get_prompts()
            .await?
            .iter()
            .any(|p| p.title.eq_ignore_ascii_case(title));
        if exists && !overwrite {
            return Err(EngineError::DuplicateTitle(title.to_string()));
        }

        self.store.save_prompt(title, content).await?;
        Ok(if exists {
            SaveOutcome::Updated
        } else {
            SaveOutcome::Created
        })
    }

    pub async fn delete_prompt(&self, id: &PromptId) -> Result<(), EngineError> {
        Ok(self.store.delete_prompt(id).await?)
    }

    /// Whether the engine runs on `hostname`.
    pub async fn site_enabled(&self, hostname: &str) -> Result<bool, EngineError> {
        let disabled = self.store.get_disabled_sites().await?;
        Ok(!disabled.iter().any(|site| site == hostname))
    }

    /// Enable or disable the engine for `hostname`. The disabled-sites
    /// list stays free of duplicates.
    pub async fn set_site_enabled(
        &self,
        hostname: &str,
        enabled: bool,
    ) -> Result<(), EngineError> {
        let mut disabled = self.store.get_disabled_sites().await?;
        if enabled {
            disabled.retain(|site| site != hostname);
        } else if !disabled.iter().any(|site| site == hostname) {
            disabled.push(hostname.to_string());
        }
        Ok(self.store.set_disabled_sites(disabled).await?)
    }

    /// The inline command that inserts `prompt` (`#<title>`), shown next
    /// to each prompt in a management list.
    pub fn usage_hint(config: &EngineConfig, prompt: &Prompt) -> String {
        format!("{}{}", config.trigger, prompt.title)
    }
}
