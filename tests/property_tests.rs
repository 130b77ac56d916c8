// Property-based tests using proptest: the algebraic guarantees of the
// matcher, the splice engine, filtering, and suggestion navigation.

use proptest::prelude::*;
use snipline::matcher::{CommandMatcher, MatchResult};
use snipline::prompt::{Prompt, PromptSet};
use snipline::suggest::SuggestionState;
use snipline::surface::{EditableSurface, Node, SurfaceId, TreeSurface, ValueSurface};
use snipline::EngineConfig;

fn matcher() -> CommandMatcher {
    CommandMatcher::new(&EngineConfig::default()).expect("default grammar compiles")
}

/// Text plus a valid splice span on char boundaries, derived by picking
/// char indices and converting to byte offsets.
fn text_with_span() -> impl Strategy<Value = (String, usize, usize)> {
    (prop::collection::vec(any::<char>(), 0..24), any::<u16>(), any::<u16>()).prop_map(
        |(chars, a, b)| {
            let text: String = chars.iter().collect();
            let mut boundaries: Vec<usize> = text.char_indices().map(|(i, _)| i).collect();
            boundaries.push(text.len());
            let i = a as usize % boundaries.len();
            let j = b as usize % boundaries.len();
            let (start, end) = if i <= j {
                (boundaries[i], boundaries[j])
            } else {
                (boundaries[j], boundaries[i])
            };
            (text, start, end)
        },
    )
}

/// Chop `text` into 1..=4 consecutive segments and wrap some of them in
/// element nodes, producing a tree whose concatenated text equals `text`.
fn tree_of(text: &str, cuts: &[u8], wrap_mask: u8) -> Node {
    let boundaries: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let mut cut_points: Vec<usize> = cuts
        .iter()
        .map(|c| boundaries[*c as usize % boundaries.len()])
        .collect();
    cut_points.push(0);
    cut_points.push(text.len());
    cut_points.sort_unstable();
    cut_points.dedup();

    let mut children = Vec::new();
    for (i, pair) in cut_points.windows(2).enumerate() {
        let segment = Node::text(&text[pair[0]..pair[1]]);
        if wrap_mask & (1 << (i % 8)) != 0 {
            children.push(Node::element(vec![segment]));
        } else {
            children.push(segment);
        }
    }
    Node::element(children)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    })]

    /// Text without the trigger symbol never matches anything.
    #[test]
    fn prop_no_trigger_no_match(text in "[a-zA-Z0-9 .,!\n]{0,40}") {
        let m = matcher();
        prop_assert_eq!(m.match_use(&text), MatchResult::NoMatch);
        prop_assert_eq!(m.match_save(&text), MatchResult::NoMatch);
    }

    /// Splicing a value surface behaves exactly like string splicing,
    /// and the caret lands after the replacement.
    #[test]
    fn prop_value_splice_round_trip(
        (text, start, end) in text_with_span(),
        replacement in prop::collection::vec(any::<char>(), 0..8),
    ) {
        let replacement: String = replacement.iter().collect();
        let mut surface = ValueSurface::new(text.clone());
        surface.replace_range(start, end, &replacement).unwrap();

        let expected = format!("{}{}{}", &text[..start], replacement, &text[end..]);
        let snapshot = surface.read().unwrap();
        prop_assert_eq!(snapshot.text, expected);
        prop_assert_eq!(snapshot.caret, start + replacement.len());
        prop_assert_eq!(surface.change_count(), 1);
    }

    /// The tree surface gives the same round-trip as the value surface
    /// regardless of how the text is chopped into nodes.
    #[test]
    fn prop_tree_splice_matches_string_model(
        (text, start, end) in text_with_span(),
        replacement in prop::collection::vec(any::<char>(), 0..8),
        cuts in prop::collection::vec(any::<u8>(), 0..3),
        wrap_mask in any::<u8>(),
    ) {
        let replacement: String = replacement.iter().collect();
        let mut surface = TreeSurface::new(tree_of(&text, &cuts, wrap_mask));
        prop_assert_eq!(surface.text(), text.clone());

        surface.replace_range(start, end, &replacement).unwrap();

        let expected = format!("{}{}{}", &text[..start], replacement, &text[end..]);
        let snapshot = surface.read().unwrap();
        prop_assert_eq!(snapshot.text, expected);
        prop_assert_eq!(snapshot.caret, start + replacement.len());
        prop_assert_eq!(surface.change_count(), 1);
    }

    /// Filtering is idempotent: the same needle over an unchanged set
    /// yields the same ordered candidates.
    #[test]
    fn prop_filter_idempotent(
        titles in prop::collection::vec("[a-zA-Z0-9-]{1,10}", 0..10),
        needle in "[a-zA-Z0-9]{0,5}",
    ) {
        let set = PromptSet::from_prompts(
            titles.iter().map(|t| Prompt::new(t.clone(), "body")).collect(),
        );
        let first: Vec<String> = set.filter(&needle).iter().map(|p| p.title.clone()).collect();
        let second: Vec<String> = set.filter(&needle).iter().map(|p| p.title.clone()).collect();
        prop_assert_eq!(first, second);
    }

    /// n consecutive ArrowDown presses return the selection to where it
    /// started, from any starting index.
    #[test]
    fn prop_selection_wrap_is_cyclic(n in 1usize..8, start_offset in 0usize..8) {
        let candidates: Vec<Prompt> =
            (0..n).map(|i| Prompt::new(format!("p{i}"), "body")).collect();
        let mut state = SuggestionState::default();
        state.sync(SurfaceId::new(), 0, "p", candidates);

        for _ in 0..start_offset % n {
            state.select_next();
        }
        let start = state.open().unwrap().selected;

        for _ in 0..n {
            state.select_next();
        }
        prop_assert_eq!(state.open().unwrap().selected, start);

        for _ in 0..n {
            state.select_prev();
        }
        prop_assert_eq!(state.open().unwrap().selected, start);
    }
}
