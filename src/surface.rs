//! Editable-surface capability.
//!
//! All higher-level logic (command matching, the suggestion state
//! machine, splicing) is written against [`EditableSurface`] and never
//! branches on the concrete surface kind. Two implementations are
//! provided:
//!
//! - [`ValueSurface`]: a linear text buffer with an integer caret, the
//!   shape of a plain form field.
//! - [`TreeSurface`]: a hierarchical container of text nodes, the shape
//!   of a content-editable region. Text and caret offsets are derived by
//!   a document-order walk over the tree, and splices edit text nodes in
//!   place without restructuring the surrounding element nodes.
//!
//! Offsets are byte offsets into the surface's UTF-8 text and must fall
//! on character boundaries. Surfaces are transient, borrowed references:
//! the engine re-reads text and caret on every event instead of caching
//! them across events.

use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Identifies one editable surface for single-focus bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceId(u64);

impl SurfaceId {
    /// Generate a new unique id
    pub fn new() -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// Text or caret cannot be read, e.g. the surface detached
    /// mid-interaction. The current operation is aborted silently.
    #[error("surface unavailable")]
    Unavailable,

    /// A splice range does not fit the surface text. Ranges must come
    /// from a snapshot taken in the same event turn, so this indicates a
    /// stale span.
    #[error("range {start}..{end} out of bounds for text of length {len}")]
    OutOfBounds { start: usize, end: usize, len: usize },
}

/// Text and caret read together in one acquisition. The caret is a byte
/// offset into `text`, `0 <= caret <= text.len()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub text: String,
    pub caret: usize,
}

impl Snapshot {
    /// The text from the start of the surface up to the caret
    pub fn before_caret(&self) -> &str {
        &self.text[..self.caret]
    }
}

/// Callback invoked after every programmatic mutation, standing in for
/// the synthetic input event a host page would observe.
pub type ChangeListener = Box<dyn FnMut()>;

/// Polymorphic capability over one editable text region.
pub trait EditableSurface {
    fn id(&self) -> SurfaceId;

    /// Acquire text and caret. Fails with [`SurfaceError::Unavailable`]
    /// when the surface can no longer be read.
    fn read(&self) -> Result<Snapshot, SurfaceError>;

    /// Replace `[start, end)` with `new_text` and move the caret to
    /// `start + new_text.len()`. Emits the change notification exactly
    /// once on success.
    fn replace_range(&mut self, start: usize, end: usize, new_text: &str)
        -> Result<(), SurfaceError>;

    /// Number of change notifications emitted so far.
    fn change_count(&self) -> u64;
}

/// Which surface variant an element maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceKind {
    /// Linear buffer with native value/selection access
    Value,
    /// Content-editable tree of text nodes
    Tree,
}

/// Decide whether an element is an editable text surface.
///
/// An element qualifies if it is a multi-line text field, a single-line
/// field whose type is one of text/search/email/url/tel/password (a
/// missing type defaults to text), or is marked content-editable.
pub fn classify(tag: &str, input_type: Option<&str>, content_editable: bool) -> Option<SurfaceKind> {
    match tag.to_ascii_lowercase().as_str() {
        "textarea" => Some(SurfaceKind::Value),
        "input" => {
            let ty = input_type.unwrap_or("text").to_ascii_lowercase();
            match ty.as_str() {
                "text" | "search" | "email" | "url" | "tel" | "password" => {
                    Some(SurfaceKind::Value)
                }
                _ if content_editable => Some(SurfaceKind::Tree),
                _ => None,
            }
        }
        _ if content_editable => Some(SurfaceKind::Tree),
        _ => None,
    }
}

// ─── Value-based surface ────────────────────────────────────────────────

/// A value-based surface: one linear buffer plus a caret offset.
pub struct ValueSurface {
    id: SurfaceId,
    text: String,
    caret: usize,
    changes: u64,
    listener: Option<ChangeListener>,
    detached: bool,
}

impl std::fmt::Debug for ValueSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValueSurface")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("caret", &self.caret)
            .field("changes", &self.changes)
            .field("detached", &self.detached)
            .finish()
    }
}

impl ValueSurface {
    /// Create a surface with the caret at the end of `text`
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let caret = text.len();
        Self {
            id: SurfaceId::new(),
            text,
            caret,
            changes: 0,
            listener: None,
            detached: false,
        }
    }

    /// Attach a change listener invoked after every programmatic mutation
    pub fn with_change_listener(mut self, listener: ChangeListener) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Move the caret (host-side selection change)
    pub fn set_caret(&mut self, caret: usize) {
        self.caret = caret.min(self.text.len());
    }

    /// Simulate the user typing at the caret. This is host-side input,
    /// not a programmatic mutation, so no change notification fires.
    pub fn type_str(&mut self, s: &str) {
        self.text.insert_str(self.caret, s);
        self.caret += s.len();
    }

    /// Detach the surface: subsequent reads and writes fail
    pub fn detach(&mut self) {
        self.detached = true;
    }

    fn emit_change(&mut self) {
        self.changes += 1;
        if let Some(listener) = self.listener.as_mut() {
            listener();
        }
    }
}

impl EditableSurface for ValueSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn read(&self) -> Result<Snapshot, SurfaceError> {
        if self.detached {
            return Err(SurfaceError::Unavailable);
        }
        Ok(Snapshot {
            text: self.text.clone(),
            caret: self.caret,
        })
    }

    fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        new_text: &str,
    ) -> Result<(), SurfaceError> {
        if self.detached {
            return Err(SurfaceError::Unavailable);
        }
        check_span(&self.text, start, end)?;
        self.text.replace_range(start..end, new_text);
        self.caret = start + new_text.len();
        self.emit_change();
        Ok(())
    }

    fn change_count(&self) -> u64 {
        self.changes
    }
}

fn check_span(text: &str, start: usize, end: usize) -> Result<(), SurfaceError> {
    let valid = start <= end
        && end <= text.len()
        && text.is_char_boundary(start)
        && text.is_char_boundary(end);
    if valid {
        Ok(())
    } else {
        Err(SurfaceError::OutOfBounds {
            start,
            end,
            len: text.len(),
        })
    }
}

// ─── Tree-based surface ─────────────────────────────────────────────────

/// One node of a tree-based surface: either a run of text or an element
/// holding children (a style span, a paragraph, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element { children: Vec<Node> },
}

impl Node {
    pub fn text(s: impl Into<String>) -> Self {
        Node::Text(s.into())
    }

    pub fn element(children: Vec<Node>) -> Self {
        Node::Element { children }
    }
}

/// Caret inside a tree surface: the document-order ordinal of a text
/// node plus a byte offset within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeCaret {
    pub node: usize,
    pub offset: usize,
}

/// Where a linear text offset landed in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FoundPosition {
    ordinal: usize,
    offset: usize,
}

/// A tree-based surface: the text is the document-order concatenation of
/// all text nodes, and both caret linearization and splicing walk the
/// tree with the same traversal so offset math stays consistent.
pub struct TreeSurface {
    id: SurfaceId,
    root: Node,
    caret: TreeCaret,
    changes: u64,
    listener: Option<ChangeListener>,
    detached: bool,
}

impl std::fmt::Debug for TreeSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeSurface")
            .field("id", &self.id)
            .field("root", &self.root)
            .field("caret", &self.caret)
            .field("changes", &self.changes)
            .field("detached", &self.detached)
            .finish()
    }
}

impl TreeSurface {
    /// Create a surface over `root` with the caret at the end of the text
    pub fn new(root: Node) -> Self {
        let mut surface = Self {
            id: SurfaceId::new(),
            root,
            caret: TreeCaret { node: 0, offset: 0 },
            changes: 0,
            listener: None,
            detached: false,
        };
        let end = surface.total_len();
        surface.set_caret_linear(end);
        surface
    }

    /// Attach a change listener invoked after every programmatic mutation
    pub fn with_change_listener(mut self, listener: ChangeListener) -> Self {
        self.listener = Some(listener);
        self
    }

    /// The concatenated text of all text nodes in document order
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(&self.root, &mut out);
        out
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Position the caret at a linear byte offset (host-side selection
    /// change). Clamped to the text length.
    pub fn set_caret_linear(&mut self, pos: usize) {
        let total = self.total_len();
        let target = pos.min(total);
        let mut consumed = 0;
        let mut ordinal = 0;
        self.caret = match find_position(&self.root, target, &mut consumed, &mut ordinal) {
            Some(found) => TreeCaret {
                node: found.ordinal,
                offset: found.offset,
            },
            None => TreeCaret { node: 0, offset: 0 },
        };
    }

    /// The caret as a linear byte offset, derived by the same walk that
    /// produces [`TreeSurface::text`]
    pub fn caret_linear(&self) -> usize {
        let mut lens = Vec::new();
        segment_lens(&self.root, &mut lens);
        let prefix: usize = lens.iter().take(self.caret.node).sum();
        prefix + self.caret.offset
    }

    /// Detach the surface: subsequent reads and writes fail
    pub fn detach(&mut self) {
        self.detached = true;
    }

    fn total_len(&self) -> usize {
        let mut lens = Vec::new();
        segment_lens(&self.root, &mut lens);
        lens.iter().sum()
    }

    fn emit_change(&mut self) {
        self.changes += 1;
        if let Some(listener) = self.listener.as_mut() {
            listener();
        }
    }
}

fn collect_text(node: &Node, out: &mut String) {
    match node {
        Node::Text(s) => out.push_str(s),
        Node::Element { children } => {
            for child in children {
                collect_text(child, out);
            }
        }
    }
}

fn segment_lens(node: &Node, out: &mut Vec<usize>) {
    match node {
        Node::Text(s) => out.push(s.len()),
        Node::Element { children } => {
            for child in children {
                segment_lens(child, out);
            }
        }
    }
}

/// Locate the text node containing linear offset `target`.
///
/// `consumed` accumulates the text length walked so far and `ordinal`
/// counts text nodes, both threaded explicitly through the recursion.
/// A text node claims `target` when it ends at or after it, so an
/// offset on the boundary between two nodes resolves to the earlier
/// node's end.
fn find_position(
    node: &Node,
    target: usize,
    consumed: &mut usize,
    ordinal: &mut usize,
) -> Option<FoundPosition> {
    match node {
        Node::Text(s) => {
            if *consumed + s.len() >= target {
                return Some(FoundPosition {
                    ordinal: *ordinal,
                    offset: target - *consumed,
                });
            }
            *consumed += s.len();
            *ordinal += 1;
            None
        }
        Node::Element { children } => {
            for child in children {
                if let Some(found) = find_position(child, target, consumed, ordinal) {
                    return Some(found);
                }
            }
            None
        }
    }
}

/// Mutable access to the text node with the given document-order ordinal
fn text_node_mut<'a>(node: &'a mut Node, ordinal: usize, seen: &mut usize) -> Option<&'a mut String> {
    match node {
        Node::Text(s) => {
            if *seen == ordinal {
                return Some(s);
            }
            *seen += 1;
            None
        }
        Node::Element { children } => {
            for child in children {
                if let Some(s) = text_node_mut(child, ordinal, seen) {
                    return Some(s);
                }
            }
            None
        }
    }
}

impl EditableSurface for TreeSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn read(&self) -> Result<Snapshot, SurfaceError> {
        if self.detached {
            return Err(SurfaceError::Unavailable);
        }
        let text = self.text();
        let caret = self.caret_linear().min(text.len());
        Ok(Snapshot { text, caret })
    }

    /// Splice `[start, end)` across the text nodes it covers.
    ///
    /// The replacement lands in the node containing `start`; deleted text
    /// spanning further nodes is removed from each in turn. Element nodes
    /// are never added, removed, or reordered, and text nodes emptied by
    /// the deletion stay in place.
    fn replace_range(
        &mut self,
        start: usize,
        end: usize,
        new_text: &str,
    ) -> Result<(), SurfaceError> {
        if self.detached {
            return Err(SurfaceError::Unavailable);
        }
        let text = self.text();
        check_span(&text, start, end)?;

        if text.is_empty() {
            if !new_text.is_empty() {
                let mut seen = 0;
                match text_node_mut(&mut self.root, 0, &mut seen) {
                    // Reuse an existing (empty) text node when there is one
                    Some(segment) => segment.push_str(new_text),
                    // Otherwise grow one under the root
                    None => match &mut self.root {
                        Node::Element { children } => children.push(Node::text(new_text)),
                        Node::Text(s) => s.push_str(new_text),
                    },
                }
            }
            self.caret = TreeCaret {
                node: 0,
                offset: new_text.len(),
            };
            self.emit_change();
            return Ok(());
        }

        let mut consumed = 0;
        let mut ordinal = 0;
        let found = find_position(&self.root, start, &mut consumed, &mut ordinal)
            .ok_or(SurfaceError::Unavailable)?;

        let mut remaining = end - start;
        let mut cursor = found.offset;
        let mut node_ordinal = found.ordinal;
        let mut first = true;
        while first || remaining > 0 {
            let mut seen = 0;
            let segment = text_node_mut(&mut self.root, node_ordinal, &mut seen)
                .ok_or(SurfaceError::Unavailable)?;
            let take = remaining.min(segment.len() - cursor);
            if first {
                segment.replace_range(cursor..cursor + take, new_text);
                self.caret = TreeCaret {
                    node: node_ordinal,
                    offset: cursor + new_text.len(),
                };
                first = false;
            } else {
                segment.replace_range(cursor..cursor + take, "");
            }
            remaining -= take;
            node_ordinal += 1;
            cursor = 0;
        }

        self.emit_change();
        Ok(())
    }

    fn change_count(&self) -> u64 {
        self.changes
    }
}
