//! Host-agnostic input event types.
//!
//! The engine never talks to a real event system. The embedding host maps
//! its native keyboard/pointer events onto these values and feeds them to
//! [`crate::engine::InlineEngine`]; the [`Disposition`] returned from key
//! handling tells the host whether to swallow the event (prevent default
//! handling and stop propagation) or let it through.

/// A key press, reduced to the keys the engine cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    Enter,
    Tab,
    Escape,
    /// Any printable character
    Char(char),
    /// Anything else (modifiers, function keys, ...)
    Other,
}

impl Key {
    /// Keys that confirm a pending command (insert selection, commit save).
    pub fn is_confirm(self) -> bool {
        matches!(self, Key::Enter | Key::Tab)
    }
}

/// What the host should do with the event after the engine has seen it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The engine acted on the event: suppress the default behavior and
    /// stop further propagation.
    Consumed,
    /// The engine ignored the event: deliver it normally.
    PassThrough,
}

/// Event categories the engine needs delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    KeyDown,
    Input,
    PointerDown,
}

/// When in the host's dispatch pipeline the engine must observe an event.
///
/// `Capture` means the engine's handler runs before the target's own
/// handlers; key events must be registered this way so that navigation
/// keys can be intercepted ahead of the page. Hosts without a two-phase
/// dispatch model must supply an equivalent observe-before-target
/// ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Capture,
    Bubble,
}

/// One listener registration the host must perform on behalf of the
/// engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerSpec {
    pub event: EventKind,
    pub phase: Phase,
}
