//! Splice engine: the single mutation primitive the engine performs
//! against a surface.

use crate::surface::{EditableSurface, SurfaceError};
use std::ops::Range;

/// Replace `span` with `replacement` on `surface`.
///
/// Delegates to the surface's own range replacement, which repositions
/// the caret to `span.start + replacement.len()` and emits the change
/// notification exactly once. The operation is atomic from an observer's
/// perspective: either the full replacement happened or nothing did.
pub fn apply(
    surface: &mut dyn EditableSurface,
    span: Range<usize>,
    replacement: &str,
) -> Result<(), SurfaceError> {
    tracing::debug!(
        start = span.start,
        end = span.end,
        len = replacement.len(),
        "splicing surface text"
    );
    surface.replace_range(span.start, span.end, replacement)
}
