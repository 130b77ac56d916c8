//! Suggestion-list state machine.
//!
//! Owns the open/closed state, the active filter, the filtered candidate
//! list, the selected index, and the anchor offset of the trigger symbol.
//! At most one suggestion list is active per engine: syncing state for a
//! different surface implicitly replaces whatever was open before.

use crate::prompt::Prompt;
use crate::surface::SurfaceId;

/// The live data of an open suggestion list.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenSuggestions {
    /// Surface the list is anchored to
    pub surface: SurfaceId,
    /// Byte offset of the trigger symbol in that surface's text
    pub anchor: usize,
    /// Filter text the candidates were computed from
    pub filter: String,
    /// Filtered candidates, insertion order of the prompt set preserved.
    /// Never empty while the list is open.
    pub candidates: Vec<Prompt>,
    /// Selected row, always within `0..candidates.len()`
    pub selected: usize,
}

/// Suggestion-list state: `Closed`, or `Open` with live data.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum SuggestionState {
    #[default]
    Closed,
    Open(OpenSuggestions),
}

impl SuggestionState {
    pub fn is_open(&self) -> bool {
        matches!(self, SuggestionState::Open(_))
    }

    pub fn open(&self) -> Option<&OpenSuggestions> {
        match self {
            SuggestionState::Open(open) => Some(open),
            SuggestionState::Closed => None,
        }
    }

    /// Close the list, resetting filter, candidates and selection.
    pub fn close(&mut self) {
        *self = SuggestionState::Closed;
    }

    /// Bring the state in line with a freshly computed filter result.
    ///
    /// Empty candidates close the list. A changed filter (or a different
    /// surface or anchor) opens fresh with the selection on the first
    /// row. The same filter on the same anchor only swaps in the new
    /// candidates and clamps the selection, so repeated input events for
    /// one keystroke leave the selection alone.
    pub fn sync(
        &mut self,
        surface: SurfaceId,
        anchor: usize,
        filter: &str,
        candidates: Vec<Prompt>,
    ) {
        if candidates.is_empty() {
            self.close();
            return;
        }
        match self {
            SuggestionState::Open(open)
                if open.surface == surface && open.anchor == anchor && open.filter == filter =>
            {
                open.selected = open.selected.min(candidates.len() - 1);
                open.candidates = candidates;
            }
            _ => {
                *self = SuggestionState::Open(OpenSuggestions {
                    surface,
                    anchor,
                    filter: filter.to_string(),
                    candidates,
                    selected: 0,
                });
            }
        }
    }

    /// Move the selection down, wrapping past the end.
    pub fn select_next(&mut self) {
        if let SuggestionState::Open(open) = self {
            open.selected = (open.selected + 1) % open.candidates.len();
        }
    }

    /// Move the selection up, wrapping past the start.
    pub fn select_prev(&mut self) {
        if let SuggestionState::Open(open) = self {
            open.selected =
                (open.selected + open.candidates.len() - 1) % open.candidates.len();
        }
    }

    /// Point the selection at a specific row (pointer hover/click).
    pub fn select(&mut self, index: usize) {
        if let SuggestionState::Open(open) = self {
            if index < open.candidates.len() {
                open.selected = index;
            }
        }
    }

    /// The currently selected candidate, if the list is open.
    pub fn selected_prompt(&self) -> Option<&Prompt> {
        self.open().map(|open| &open.candidates[open.selected])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates(titles: &[&str]) -> Vec<Prompt> {
        titles.iter().map(|t| Prompt::new(*t, "body")).collect()
    }

    fn opened(titles: &[&str]) -> (SuggestionState, SurfaceId) {
        let id = SurfaceId::new();
        let mut state = SuggestionState::default();
        state.sync(id, 0, "x", candidates(titles));
        (state, id)
    }

    #[test]
    fn test_sync_with_no_candidates_stays_closed() {
        let mut state = SuggestionState::default();
        state.sync(SurfaceId::new(), 0, "zzz", vec![]);
        assert_eq!(state, SuggestionState::Closed);
    }

    #[test]
    fn test_sync_opens_with_first_row_selected() {
        let (state, _) = opened(&["a", "b"]);
        let open = state.open().unwrap();
        assert_eq!(open.selected, 0);
        assert_eq!(open.candidates.len(), 2);
    }

    #[test]
    fn test_changed_filter_resets_selection() {
        let (mut state, id) = opened(&["a", "b", "c"]);
        state.select_next();
        assert_eq!(state.open().unwrap().selected, 1);

        state.sync(id, 0, "y", candidates(&["a", "b"]));
        assert_eq!(state.open().unwrap().selected, 0);
        assert_eq!(state.open().unwrap().filter, "y");
    }

    #[test]
    fn test_same_filter_keeps_selection() {
        let (mut state, id) = opened(&["a", "b", "c"]);
        state.select_next();
        state.sync(id, 0, "x", candidates(&["a", "b", "c"]));
        assert_eq!(state.open().unwrap().selected, 1);
    }

    #[test]
    fn test_same_filter_clamps_selection_to_shrunk_list() {
        let (mut state, id) = opened(&["a", "b", "c"]);
        state.select_next();
        state.select_next();
        assert_eq!(state.open().unwrap().selected, 2);

        state.sync(id, 0, "x", candidates(&["a"]));
        assert_eq!(state.open().unwrap().selected, 0);
    }

    #[test]
    fn test_different_surface_replaces_open_list() {
        let (mut state, _) = opened(&["a", "b"]);
        let other = SurfaceId::new();
        state.select_next();

        state.sync(other, 3, "x", candidates(&["c"]));
        let open = state.open().unwrap();
        assert_eq!(open.surface, other);
        assert_eq!(open.anchor, 3);
        assert_eq!(open.selected, 0);
    }

    #[test]
    fn test_selection_wraps_both_ways() {
        let (mut state, _) = opened(&["a", "b", "c"]);
        state.select_next();
        state.select_next();
        assert_eq!(state.open().unwrap().selected, 2);
        state.select_next();
        assert_eq!(state.open().unwrap().selected, 0);

        state.select_prev();
        assert_eq!(state.open().unwrap().selected, 2);
    }

    #[test]
    fn test_close_resets_everything() {
        let (mut state, _) = opened(&["a"]);
        state.close();
        assert_eq!(state, SuggestionState::Closed);
        assert!(state.selected_prompt().is_none());
        // Navigation on a closed list is a no-op
        state.select_next();
        assert_eq!(state, SuggestionState::Closed);
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let (mut state, _) = opened(&["a", "b"]);
        state.select(5);
        assert_eq!(state.open().unwrap().selected, 0);
        state.select(1);
        assert_eq!(state.open().unwrap().selected, 1);
    }
}
