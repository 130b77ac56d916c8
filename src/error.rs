use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced by the engine and the management operations.
///
/// Inline interaction errors are deliberately absent: a use command that
/// names an unknown prompt, or a surface that detaches mid-interaction,
/// degrades to "nothing happens" rather than an error the host must
/// handle.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Prompt title fails the allowed-character policy. Rejected before
    /// anything reaches the store.
    #[error("invalid prompt title {0:?}: only letters, numbers, underscores, hyphens, spaces, slashes, colons and periods are allowed")]
    InvalidTitle(String),

    /// A prompt with this title already exists and overwrite was not
    /// requested.
    #[error("a prompt named {0:?} already exists")]
    DuplicateTitle(String),

    /// Title or content was empty after trimming.
    #[error("prompt title and content must not be empty")]
    EmptyPrompt,

    /// The configured command grammar does not compile into a matcher.
    #[error("invalid command grammar: {0}")]
    Grammar(#[from] regex::Error),

    /// Persistence failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
