// EngineTestHarness - drives the inline engine against an in-memory
// surface and store, the way an embedding host would.

use snipline::engine::InlineEngine;
use snipline::events::{Disposition, Key};
use snipline::overlay::{place, OverlayLayout, OverlayModel, Point, Rect};
use snipline::store::{MemoryStore, PromptStore};
use snipline::surface::ValueSurface;
use snipline::{EngineConfig, Prompt};
use std::sync::Arc;

/// Geometry used for pointer tests: a text input near the top of a tall
/// viewport, so the overlay always hangs below it.
pub const INPUT_RECT: Rect = Rect {
    x: 20.0,
    y: 40.0,
    width: 400.0,
    height: 30.0,
};
pub const VIEWPORT_HEIGHT: f64 = 900.0;

pub struct EngineTestHarness {
    pub engine: InlineEngine,
    pub surface: ValueSurface,
    pub store: Arc<MemoryStore>,
}

/// Route engine tracing to the test output when RUST_LOG is set.
fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

impl EngineTestHarness {
    /// Build a harness over a store seeded with `prompts`, snapshot
    /// already loaded, with an empty surface focused.
    pub async fn new(prompts: Vec<Prompt>) -> Self {
        init_logging();
        let store = Arc::new(MemoryStore::with_prompts(prompts));
        let dyn_store: Arc<dyn PromptStore> = Arc::clone(&store) as Arc<dyn PromptStore>;
        let mut engine = InlineEngine::new(EngineConfig::default(), dyn_store)
            .expect("default config compiles");
        engine.reload().await.expect("memory store is infallible");
        Self {
            engine,
            surface: ValueSurface::new(""),
            store,
        }
    }

    /// Type text character by character, firing an input event after
    /// each one like a real host does.
    pub fn type_text(&mut self, text: &str) {
        for ch in text.chars() {
            self.surface.type_str(&ch.to_string());
            self.engine.handle_input(&mut self.surface);
        }
    }

    pub async fn send_key(&mut self, key: Key) -> Disposition {
        self.engine.handle_key(key, &mut self.surface).await
    }

    pub fn text(&self) -> String {
        self.surface.text().to_string()
    }

    pub fn caret(&self) -> usize {
        self.surface.caret()
    }

    pub fn suggestions_open(&self) -> bool {
        self.engine.suggestions().is_open()
    }

    pub fn candidate_titles(&self) -> Vec<String> {
        self.engine
            .suggestions()
            .open()
            .map(|open| open.candidates.iter().map(|p| p.title.clone()).collect())
            .unwrap_or_default()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.engine.suggestions().open().map(|open| open.selected)
    }

    /// Lay the overlay out the way the presentation collaborator would
    /// for the current state.
    pub fn overlay_layout(&self) -> OverlayLayout {
        let config = &self.engine.config().overlay;
        match OverlayModel::from_state(self.engine.suggestions(), config) {
            Some(model) => {
                let placement = place(INPUT_RECT, VIEWPORT_HEIGHT, model.rows.len(), config);
                OverlayLayout::new(&placement, model.rows.len(), config)
            }
            None => OverlayLayout::empty(),
        }
    }

    /// A point inside suggestion row `index` under the current layout.
    pub fn point_in_row(&self, index: usize) -> Point {
        let config = &self.engine.config().overlay;
        let placement = place(
            INPUT_RECT,
            VIEWPORT_HEIGHT,
            self.candidate_titles().len(),
            config,
        );
        Point::new(
            placement.rect.x + 10.0,
            placement.rect.y + (index as f64 + 0.5) * config.row_height,
        )
    }

    pub fn pointer_down(&mut self, point: Point) {
        let layout = self.overlay_layout();
        self.engine
            .handle_pointer(point, &layout, &mut self.surface);
    }
}

/// The stock prompt used by most scenarios.
pub fn explain_prompt() -> Prompt {
    Prompt::new("explain", "Explain X")
}
