use serde::{Deserialize, Serialize};

/// Engine configuration: the inline command grammar and overlay metrics.
///
/// Every field has a serde default so partial configs deserialize cleanly;
/// `EngineConfig::default()` matches the original command grammar
/// (`#prompt-save:` / `#use:`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Character that introduces both inline commands
    #[serde(default = "default_trigger")]
    pub trigger: char,

    /// Command prefix for saving a prompt (`#prompt-save:name body`)
    #[serde(default = "default_save_prefix")]
    pub save_prefix: String,

    /// Command prefix for inserting a prompt by exact name (`#use:name `)
    #[serde(default = "default_use_prefix")]
    pub use_prefix: String,

    /// Suggestion overlay metrics
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            trigger: default_trigger(),
            save_prefix: default_save_prefix(),
            use_prefix: default_use_prefix(),
            overlay: OverlayConfig::default(),
        }
    }
}

fn default_trigger() -> char {
    '#'
}

fn default_save_prefix() -> String {
    "prompt-save:".to_string()
}

fn default_use_prefix() -> String {
    "use:".to_string()
}

/// Metrics for positioning and sizing the suggestion overlay, in the
/// host's pixel space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Minimum overlay width; the overlay otherwise matches the input width
    #[serde(default = "default_min_width")]
    pub min_width: f64,

    /// Gap between the input edge and the overlay
    #[serde(default = "default_gap")]
    pub gap: f64,

    /// Vertical room below the input that is always enough to place the
    /// overlay underneath it
    #[serde(default = "default_min_space_below")]
    pub min_space_below: f64,

    /// Height of one suggestion row (title line + preview line)
    #[serde(default = "default_row_height")]
    pub row_height: f64,

    /// Content preview length in characters before truncation
    #[serde(default = "default_preview_chars")]
    pub preview_chars: usize,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            min_width: default_min_width(),
            gap: default_gap(),
            min_space_below: default_min_space_below(),
            row_height: default_row_height(),
            preview_chars: default_preview_chars(),
        }
    }
}

fn default_min_width() -> f64 {
    250.0
}

fn default_gap() -> f64 {
    5.0
}

fn default_min_space_below() -> f64 {
    200.0
}

fn default_row_height() -> f64 {
    40.0
}

fn default_preview_chars() -> usize {
    80
}
