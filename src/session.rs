//! Attachment bootstrap: deciding whether the engine runs on a given
//! host, what the embedder must register, and clean teardown.
//!
//! The session does not touch a real document. The embedding host owns
//! event sources and surface discovery; the session tells it what to
//! register ([`Session::listener_specs`]) and hands back the engine the
//! handlers feed into.

use crate::config::EngineConfig;
use crate::engine::InlineEngine;
use crate::error::EngineError;
use crate::events::{EventKind, ListenerSpec, Phase};
use crate::store::PromptStore;
use crate::surface::{classify, SurfaceKind};
use std::sync::Arc;

/// Result of attaching to a document: either an active session or a
/// marker that this host is disabled and nothing should be registered.
pub enum Attachment {
    Enabled(Session),
    Disabled,
}

impl Attachment {
    pub fn session(self) -> Option<Session> {
        match self {
            Attachment::Enabled(session) => Some(session),
            Attachment::Disabled => None,
        }
    }
}

/// An engine attached to one document on one host.
pub struct Session {
    hostname: String,
    engine: InlineEngine,
}

impl Session {
    /// Attach to a document served from `hostname`.
    ///
    /// Checks the disabled-sites list first; a disabled host gets
    /// [`Attachment::Disabled`] and no listeners. Otherwise the prompt
    /// snapshot is loaded and the session is ready for events.
    pub async fn attach(
        store: Arc<dyn PromptStore>,
        hostname: &str,
        config: EngineConfig,
    ) -> Result<Attachment, EngineError> {
        let disabled = store.get_disabled_sites().await?;
        if disabled.iter().any(|site| site == hostname) {
            tracing::info!(hostname, "snipline is disabled for this site");
            return Ok(Attachment::Disabled);
        }

        let mut engine = InlineEngine::new(config, store)?;
        engine.reload().await?;
        tracing::info!(
            hostname,
            prompts = engine.prompts().len(),
            "snipline attached"
        );
        Ok(Attachment::Enabled(Session {
            hostname: hostname.to_string(),
            engine,
        }))
    }

    /// The registrations the host must perform. Keydown observes in the
    /// capture phase so navigation keys reach the engine before the
    /// page's own handlers; text-change and pointer events ride the
    /// normal phase.
    pub fn listener_specs() -> [ListenerSpec; 3] {
        [
            ListenerSpec {
                event: EventKind::KeyDown,
                phase: Phase::Capture,
            },
            ListenerSpec {
                event: EventKind::Input,
                phase: Phase::Bubble,
            },
            ListenerSpec {
                event: EventKind::PointerDown,
                phase: Phase::Bubble,
            },
        ]
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn engine(&mut self) -> &mut InlineEngine {
        &mut self.engine
    }

    /// Surface-discovery hook: the host reports elements appearing in
    /// the document (its mutation observation), the session notes the
    /// ones that are editable text.
    pub fn notice_surface(
        &self,
        tag: &str,
        input_type: Option<&str>,
        content_editable: bool,
    ) -> Option<SurfaceKind> {
        let kind = classify(tag, input_type, content_editable);
        if let Some(kind) = kind {
            tracing::debug!(tag, ?kind, "new text input detected");
        }
        kind
    }

    /// Tear the session down: transient state is discarded, nothing is
    /// written anywhere. The host unregisters the listeners it created
    /// from [`Session::listener_specs`].
    pub fn detach(mut self) {
        self.engine.reset();
        tracing::info!(hostname = %self.hostname, "snipline detached");
    }
}
