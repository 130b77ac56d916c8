//! Inline prompt snippets for editable text surfaces.
//!
//! snipline watches the text a user types into an editable surface and
//! recognizes two inline commands introduced by a trigger symbol (`#` by
//! default):
//!
//! - `#prompt-save:<name> <body>` saves `<body>` as a named prompt when a
//!   confirm key is pressed, removing the command tokens but keeping the
//!   body in place.
//! - `#<filter>` opens a live suggestion list filtered against saved
//!   prompt titles; `#use:<name> ` inserts a named prompt directly.
//!
//! The crate is host-agnostic: surfaces are abstract ([`surface::EditableSurface`]),
//! keyboard and pointer input arrive as plain values ([`events`]), and the
//! suggestion overlay is a pure view model plus placement math
//! ([`overlay`]) that the embedding host renders however it likes.
//! Persistence goes through the async [`store::PromptStore`] capability.

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod manage;
pub mod matcher;
pub mod overlay;
pub mod prompt;
pub mod session;
pub mod splice;
pub mod store;
pub mod suggest;
pub mod surface;

pub use config::EngineConfig;
pub use engine::InlineEngine;
pub use error::EngineError;
pub use prompt::{Prompt, PromptId};
pub use session::{Attachment, Session};
pub use store::PromptStore;
