//! Prompt data model and the in-memory snapshot the engine matches
//! against.

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Opaque unique token identifying a prompt.
///
/// Internally a string so that ids from external stores round-trip
/// unchanged; callers treat it as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PromptId(pub String);

impl PromptId {
    /// Generate a new unique id
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(format!("prompt_{}", NEXT_ID.fetch_add(1, Ordering::Relaxed)))
    }

    /// Create an id from a string (for stores with their own id scheme)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }

    /// Get the internal string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for PromptId {
    fn default() -> Self {
        Self::new()
    }
}

/// A named text snippet.
///
/// The title is both the display name and the match key; title lookup and
/// filtering are case-insensitive everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: PromptId,
    pub title: String,
    pub content: String,
}

impl Prompt {
    /// Create a prompt with a freshly generated id
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: PromptId::new(),
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Validate a prompt title against the allowed-character policy: letters,
/// numbers, underscores, hyphens, spaces, slashes, colons and periods.
///
/// The inline save command only ever produces word characters and
/// hyphens, so this is primarily the management-surface gate; it runs on
/// both paths so a title rejected in one place is rejected everywhere.
pub fn validate_title(title: &str) -> Result<(), EngineError> {
    if title.is_empty() {
        return Err(EngineError::InvalidTitle(title.to_string()));
    }
    let ok = title
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '/' | ':' | '.' | ' '));
    if ok {
        Ok(())
    } else {
        Err(EngineError::InvalidTitle(title.to_string()))
    }
}

/// Insertion-ordered collection of prompts.
///
/// This is the engine's local snapshot of the store: lookups and
/// filtering run against it synchronously, saves update it optimistically
/// before persistence is requested. Insertion order is preserved so that
/// filtering yields a stable candidate sequence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptSet {
    prompts: Vec<Prompt>,
}

impl PromptSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_prompts(prompts: Vec<Prompt>) -> Self {
        Self { prompts }
    }

    pub fn len(&self) -> usize {
        self.prompts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prompts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Prompt> {
        self.prompts.iter()
    }

    /// Find a prompt by title, case-insensitively
    pub fn find(&self, title: &str) -> Option<&Prompt> {
        self.prompts
            .iter()
            .find(|p| p.title.eq_ignore_ascii_case(title))
    }

    /// Insert or overwrite by case-insensitive title match.
    ///
    /// An existing prompt keeps its id and position; only the content is
    /// replaced. Returns the id of the affected prompt.
    pub fn upsert(&mut self, title: &str, content: &str) -> PromptId {
        if let Some(existing) = self
            .prompts
            .iter_mut()
            .find(|p| p.title.eq_ignore_ascii_case(title))
        {
            existing.content = content.to_string();
            existing.id.clone()
        } else {
            let prompt = Prompt::new(title, content);
            let id = prompt.id.clone();
            self.prompts.push(prompt);
            id
        }
    }

    /// Remove a prompt by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &PromptId) -> bool {
        let before = self.prompts.len();
        self.prompts.retain(|p| &p.id != id);
        self.prompts.len() != before
    }

    /// Case-insensitive substring filter over titles, preserving
    /// insertion order. An empty needle matches everything.
    pub fn filter(&self, needle: &str) -> Vec<&Prompt> {
        let needle = needle.to_lowercase();
        self.prompts
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .collect()
    }
}
