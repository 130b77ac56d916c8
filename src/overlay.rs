//! Presentation adapter for the suggestion list.
//!
//! Everything here is a pure function of [`SuggestionState`] plus the
//! geometry the host supplies (the anchor surface's bounding box and the
//! viewport). The host renders [`OverlayModel`] however it likes and
//! feeds pointer events back through [`OverlayLayout`] hit testing; the
//! overlay itself never mutates engine state.

use crate::config::OverlayConfig;
use crate::suggest::SuggestionState;

/// A point in the host's pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in the host's pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// One suggestion row: the prompt title plus a truncated content preview.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayRow {
    pub title: String,
    pub preview: String,
}

/// View model of the suggestion list, derived from the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayModel {
    pub rows: Vec<OverlayRow>,
    pub selected: usize,
}

impl OverlayModel {
    /// Build the view model for the current state; `None` while closed.
    pub fn from_state(state: &SuggestionState, config: &OverlayConfig) -> Option<Self> {
        let open = state.open()?;
        let rows = open
            .candidates
            .iter()
            .map(|prompt| OverlayRow {
                title: prompt.title.clone(),
                preview: preview_of(&prompt.content, config.preview_chars),
            })
            .collect();
        Some(Self {
            rows,
            selected: open.selected,
        })
    }
}

fn preview_of(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        content.to_string()
    } else {
        let truncated: String = content.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}

/// Which side of the input the overlay hangs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Below,
    Above,
}

/// Computed overlay position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub rect: Rect,
    pub anchor: Anchor,
}

/// Position the overlay relative to the input's bounding box.
///
/// Hangs below the input when there is comfortable room underneath
/// (`min_space_below`) or at least more room than above; otherwise it
/// flips above. Width matches the input but never drops under
/// `min_width`.
pub fn place(
    input: Rect,
    viewport_height: f64,
    row_count: usize,
    config: &OverlayConfig,
) -> Placement {
    let height = row_count as f64 * config.row_height;
    let width = input.width.max(config.min_width);

    let space_below = viewport_height - input.bottom();
    let space_above = input.y;
    let anchor = if space_below >= config.min_space_below || space_below > space_above {
        Anchor::Below
    } else {
        Anchor::Above
    };

    let y = match anchor {
        Anchor::Below => input.bottom() + config.gap,
        Anchor::Above => input.y - config.gap - height,
    };

    Placement {
        rect: Rect::new(input.x, y, width, height),
        anchor,
    }
}

/// Row geometry for pointer hit testing.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayLayout {
    rect: Rect,
    row_rects: Vec<Rect>,
}

impl OverlayLayout {
    /// Lay rows out top to bottom inside the placement rect.
    pub fn new(placement: &Placement, row_count: usize, config: &OverlayConfig) -> Self {
        let rect = placement.rect;
        let row_rects = (0..row_count)
            .map(|i| {
                Rect::new(
                    rect.x,
                    rect.y + i as f64 * config.row_height,
                    rect.width,
                    config.row_height,
                )
            })
            .collect();
        Self { rect, row_rects }
    }

    /// An empty layout for when nothing is rendered; contains no points.
    pub fn empty() -> Self {
        Self {
            rect: Rect::new(0.0, 0.0, 0.0, 0.0),
            row_rects: Vec::new(),
        }
    }

    /// The row under `point`, if any.
    pub fn row_at(&self, point: Point) -> Option<usize> {
        self.row_rects.iter().position(|r| r.contains(point))
    }

    /// Whether `point` is inside the overlay at all. Pointer-downs
    /// outside close the suggestion list.
    pub fn contains(&self, point: Point) -> bool {
        self.rect.contains(point)
    }
}
