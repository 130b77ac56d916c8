//! The inline command engine: wires the matcher, the suggestion state
//! machine and the splice engine into the host's event stream.
//!
//! One engine services one document. It owns the single suggestion focus
//! (opening a list on one surface closes any list on another) and an
//! optimistic in-memory snapshot of the prompt store. Surfaces are
//! borrowed per event and re-read every time; the engine never caches
//! text or caret offsets across events.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::events::{Disposition, Key};
use crate::matcher::{CommandMatcher, MatchResult};
use crate::overlay::{OverlayLayout, Point};
use crate::prompt::{validate_title, PromptSet};
use crate::splice;
use crate::store::PromptStore;
use crate::suggest::SuggestionState;
use crate::surface::EditableSurface;
use std::sync::Arc;

pub struct InlineEngine {
    config: EngineConfig,
    matcher: CommandMatcher,
    prompts: PromptSet,
    suggestions: SuggestionState,
    store: Arc<dyn PromptStore>,
    notice: Option<String>,
}

impl InlineEngine {
    pub fn new(config: EngineConfig, store: Arc<dyn PromptStore>) -> Result<Self, EngineError> {
        let matcher = CommandMatcher::new(&config)?;
        Ok(Self {
            config,
            matcher,
            prompts: PromptSet::new(),
            suggestions: SuggestionState::Closed,
            store,
            notice: None,
        })
    }

    /// Refresh the local snapshot from the store. External writes to the
    /// store are only guaranteed to be visible after this runs.
    pub async fn reload(&mut self) -> Result<(), EngineError> {
        let prompts = self.store.get_prompts().await?;
        tracing::debug!(count = prompts.len(), "loaded prompt snapshot");
        self.prompts = PromptSet::from_prompts(prompts);
        Ok(())
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn prompts(&self) -> &PromptSet {
        &self.prompts
    }

    pub fn suggestions(&self) -> &SuggestionState {
        &self.suggestions
    }

    /// Pending user feedback from the last save ("Prompt saved!"),
    /// consumed by the host's notification surface.
    pub fn take_notice(&mut self) -> Option<String> {
        self.notice.take()
    }

    /// Drop all transient interaction state (suggestion focus, pending
    /// notices). Called on teardown; has no side effects on surfaces or
    /// the store.
    pub fn reset(&mut self) {
        self.suggestions.close();
        self.notice = None;
    }

    /// Text-change handler: drive the use command and the suggestion
    /// list. Runs on every input event; repeated delivery for a single
    /// keystroke is harmless because the state sync is keyed on the
    /// anchor and filter.
    pub fn handle_input(&mut self, surface: &mut dyn EditableSurface) {
        let Ok(snapshot) = surface.read() else {
            self.suggestions.close();
            return;
        };

        match self.matcher.match_use(snapshot.before_caret()) {
            MatchResult::UseFilter { filter, anchor } => {
                let needle = self.matcher.effective_filter(&filter);
                let candidates: Vec<_> =
                    self.prompts.filter(needle).into_iter().cloned().collect();
                self.suggestions
                    .sync(surface.id(), anchor, &filter, candidates);
            }
            MatchResult::UseComplete { name, span } => {
                self.suggestions.close();
                match self.prompts.find(&name) {
                    Some(prompt) => {
                        let content = prompt.content.clone();
                        if let Err(err) = splice::apply(surface, span, &content) {
                            tracing::debug!(%err, "use command aborted");
                        }
                    }
                    None => {
                        tracing::debug!(name = %name, "use command names no saved prompt");
                    }
                }
            }
            MatchResult::NoMatch | MatchResult::Save { .. } => {
                self.suggestions.close();
            }
        }
    }

    /// Key handler. Must be registered ahead of the host's own handlers
    /// (capture phase): while the suggestion list is open, navigation
    /// and confirm keys belong to the engine and are consumed. With the
    /// list closed, confirm keys run save-command detection.
    pub async fn handle_key(&mut self, key: Key, surface: &mut dyn EditableSurface) -> Disposition {
        if self.suggestions.is_open() {
            return match key {
                Key::ArrowDown => {
                    self.suggestions.select_next();
                    Disposition::Consumed
                }
                Key::ArrowUp => {
                    self.suggestions.select_prev();
                    Disposition::Consumed
                }
                Key::Enter | Key::Tab => {
                    self.insert_selected(surface);
                    Disposition::Consumed
                }
                Key::Escape => {
                    self.suggestions.close();
                    Disposition::Consumed
                }
                _ => Disposition::PassThrough,
            };
        }

        if key.is_confirm() {
            return self.try_save_command(surface).await;
        }
        Disposition::PassThrough
    }

    /// Pointer-down handler: a hit on a suggestion row confirms it, a
    /// press anywhere outside the overlay closes the list.
    pub fn handle_pointer(
        &mut self,
        point: Point,
        layout: &OverlayLayout,
        surface: &mut dyn EditableSurface,
    ) {
        if !self.suggestions.is_open() {
            return;
        }
        if let Some(index) = layout.row_at(point) {
            self.confirm_at(index, surface);
        } else if !layout.contains(point) {
            self.suggestions.close();
        }
    }

    /// Confirm the candidate at `index`, as relayed by the presentation
    /// layer for a row click.
    pub fn confirm_at(&mut self, index: usize, surface: &mut dyn EditableSurface) {
        self.suggestions.select(index);
        self.insert_selected(surface);
    }

    /// Replace the tracked command span with the selected candidate's
    /// content, then close the list. The span is re-derived from a fresh
    /// read: `[anchor, caret)` on the anchored surface.
    fn insert_selected(&mut self, surface: &mut dyn EditableSurface) {
        let (owner, anchor) = match self.suggestions.open() {
            Some(open) => (open.surface, open.anchor),
            None => return,
        };
        if owner != surface.id() {
            // Key arrived from a surface other than the anchored one.
            self.suggestions.close();
            return;
        }
        let Some(prompt) = self.suggestions.selected_prompt().cloned() else {
            return;
        };

        let Ok(snapshot) = surface.read() else {
            self.suggestions.close();
            return;
        };
        let anchor_intact = snapshot.caret >= anchor
            && snapshot
                .text
                .get(anchor..)
                .is_some_and(|tail| tail.starts_with(self.config.trigger));
        if !anchor_intact {
            self.suggestions.close();
            return;
        }

        if let Err(err) = splice::apply(surface, anchor..snapshot.caret, &prompt.content) {
            tracing::debug!(%err, "suggestion insert aborted");
        }
        self.suggestions.close();
    }

    /// Save-command detection, run when a confirm key arrives with the
    /// list closed. On a match the snapshot is updated optimistically,
    /// persistence is requested, and the command tokens are spliced away
    /// leaving the body in place.
    async fn try_save_command(&mut self, surface: &mut dyn EditableSurface) -> Disposition {
        let Ok(snapshot) = surface.read() else {
            return Disposition::PassThrough;
        };
        let MatchResult::Save { name, body, span } =
            self.matcher.match_save(snapshot.before_caret())
        else {
            return Disposition::PassThrough;
        };
        if let Err(err) = validate_title(&name) {
            tracing::warn!(%err, "rejecting inline save");
            return Disposition::PassThrough;
        }

        self.prompts.upsert(&name, &body);
        if let Err(err) = self.store.save_prompt(&name, &body).await {
            // Optimistic snapshot stays; the store catches up next save.
            tracing::warn!(%err, title = %name, "prompt persistence failed");
        } else {
            tracing::info!(title = %name, "prompt saved");
        }

        if let Err(err) = splice::apply(surface, span, "") {
            tracing::debug!(%err, "save command splice aborted");
        }
        self.notice = Some("Prompt saved!".to_string());
        Disposition::Consumed
    }
}
