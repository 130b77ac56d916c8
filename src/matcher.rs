//! Command recognition over the text before the caret.
//!
//! Pure functions of the pre-caret text: nothing here touches surfaces
//! or suggestion state. Save commands are only checked on confirm keys;
//! use commands are checked on every text change.

use crate::config::EngineConfig;
use regex::Regex;
use std::ops::Range;

/// Outcome of matching the text before the caret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// No recognizable command
    NoMatch,
    /// `#prompt-save:<name> <body>` — save `body` under `name`. `span`
    /// covers the trigger, prefix, name and trailing spaces only; the
    /// body stays in place.
    Save {
        name: String,
        body: String,
        span: Range<usize>,
    },
    /// `#use:<name>` followed by a space — insert the named prompt
    /// immediately, no suggestion list. `span` covers the whole command
    /// up to the caret.
    UseComplete { name: String, span: Range<usize> },
    /// `#<filter>` with no space yet — live suggestion filtering.
    /// `anchor` is the byte offset of the trigger symbol.
    UseFilter { filter: String, anchor: usize },
}

/// Compiled matcher for the configured command grammar.
#[derive(Debug)]
pub struct CommandMatcher {
    trigger: char,
    use_prefix: String,
    save_re: Regex,
    use_re: Regex,
}

impl CommandMatcher {
    pub fn new(config: &EngineConfig) -> Result<Self, regex::Error> {
        let save_re = Regex::new(&format!(
            "{}{}([\\w-]+)(\\s+)(.+)$",
            regex::escape(&config.trigger.to_string()),
            regex::escape(&config.save_prefix),
        ))?;
        // Trailing whitespace is tolerated after the name so that typing
        // the space which ends the command is what resolves it; any other
        // content after the name kills the command instead.
        let use_re = Regex::new(&format!(
            "^{}([\\w-]+)\\s*$",
            regex::escape(&config.use_prefix),
        ))?;
        Ok(Self {
            trigger: config.trigger,
            use_prefix: config.use_prefix.clone(),
            save_re,
            use_re,
        })
    }

    /// Detect a save command in the text before the caret.
    ///
    /// The body is greedy to the end of the text, so the command must sit
    /// on the final line. The reported span stops where the body starts.
    pub fn match_save(&self, text_before_caret: &str) -> MatchResult {
        let Some(caps) = self.save_re.captures(text_before_caret) else {
            return MatchResult::NoMatch;
        };
        let whole = caps.get(0).expect("capture 0 always present");
        let name = caps.get(1).expect("name group");
        let spaces = caps.get(2).expect("spaces group");
        let body = caps.get(3).expect("body group");
        MatchResult::Save {
            name: name.as_str().to_string(),
            body: body.as_str().to_string(),
            span: whole.start()..spaces.end(),
        }
    }

    /// Detect a use command in the text before the caret.
    ///
    /// The last trigger symbol anchors the command, and only when it
    /// starts a line or follows whitespace — a trigger mid-word (a
    /// hashtag, a color code) never activates. Once the search term
    /// contains a space it is only still actionable as an exact
    /// `use:<name>`; otherwise it keeps filtering live.
    pub fn match_use(&self, text_before_caret: &str) -> MatchResult {
        let Some(anchor) = text_before_caret.rfind(self.trigger) else {
            return MatchResult::NoMatch;
        };
        if anchor > 0 {
            let before = text_before_caret[..anchor]
                .chars()
                .next_back()
                .expect("anchor > 0 implies a preceding char");
            if !before.is_whitespace() {
                return MatchResult::NoMatch;
            }
        }

        let term = &text_before_caret[anchor + self.trigger.len_utf8()..];
        if term.contains(' ') {
            if let Some(caps) = self.use_re.captures(term) {
                let name = caps.get(1).expect("name group").as_str().to_string();
                return MatchResult::UseComplete {
                    name,
                    span: anchor..text_before_caret.len(),
                };
            }
            return MatchResult::NoMatch;
        }

        MatchResult::UseFilter {
            filter: term.to_string(),
            anchor,
        }
    }

    /// The title filter a use-filter term implies: a `use:`-prefixed term
    /// filters by the remainder after the prefix, anything else filters
    /// by the term itself.
    pub fn effective_filter<'a>(&self, filter: &'a str) -> &'a str {
        filter.strip_prefix(self.use_prefix.as_str()).unwrap_or(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> CommandMatcher {
        CommandMatcher::new(&EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_no_trigger_means_no_match() {
        let m = matcher();
        assert_eq!(m.match_use("plain text"), MatchResult::NoMatch);
        assert_eq!(m.match_use(""), MatchResult::NoMatch);
        assert_eq!(m.match_save("plain text"), MatchResult::NoMatch);
    }

    #[test]
    fn test_use_filter_at_line_start() {
        let m = matcher();
        assert_eq!(
            m.match_use("#expl"),
            MatchResult::UseFilter {
                filter: "expl".to_string(),
                anchor: 0,
            }
        );
    }

    #[test]
    fn test_use_filter_after_whitespace() {
        let m = matcher();
        assert_eq!(
            m.match_use("write this #ex"),
            MatchResult::UseFilter {
                filter: "ex".to_string(),
                anchor: 11,
            }
        );
        assert_eq!(
            m.match_use("line one\n#ex"),
            MatchResult::UseFilter {
                filter: "ex".to_string(),
                anchor: 9,
            }
        );
    }

    #[test]
    fn test_trigger_inside_word_does_not_activate() {
        let m = matcher();
        assert_eq!(m.match_use("c#sharp"), MatchResult::NoMatch);
        assert_eq!(m.match_use("see issue#42"), MatchResult::NoMatch);
    }

    #[test]
    fn test_empty_filter_right_after_trigger() {
        let m = matcher();
        assert_eq!(
            m.match_use("#"),
            MatchResult::UseFilter {
                filter: String::new(),
                anchor: 0,
            }
        );
    }

    #[test]
    fn test_spaced_term_is_dead_unless_exact_use() {
        let m = matcher();
        assert_eq!(m.match_use("#nonexistent "), MatchResult::NoMatch);
        assert_eq!(m.match_use("#expl stuff"), MatchResult::NoMatch);
        assert_eq!(m.match_use("#use:explain more"), MatchResult::NoMatch);
    }

    #[test]
    fn test_use_complete_with_trailing_space() {
        let m = matcher();
        assert_eq!(
            m.match_use("#use:explain "),
            MatchResult::UseComplete {
                name: "explain".to_string(),
                span: 0..13,
            }
        );
        // Extra trailing whitespace still resolves
        assert_eq!(
            m.match_use("#use:explain  "),
            MatchResult::UseComplete {
                name: "explain".to_string(),
                span: 0..14,
            }
        );
    }

    #[test]
    fn test_use_prefix_still_filters_without_space() {
        let m = matcher();
        // "#use:expl" has no space yet, so it keeps filtering
        let result = m.match_use("#use:expl");
        assert_eq!(
            result,
            MatchResult::UseFilter {
                filter: "use:expl".to_string(),
                anchor: 0,
            }
        );
        // ... and the effective filter strips the prefix
        assert_eq!(m.effective_filter("use:expl"), "expl");
        assert_eq!(m.effective_filter("expl"), "expl");
    }

    #[test]
    fn test_last_trigger_wins() {
        let m = matcher();
        assert_eq!(
            m.match_use("#one #two"),
            MatchResult::UseFilter {
                filter: "two".to_string(),
                anchor: 5,
            }
        );
    }

    #[test]
    fn test_save_command_span_excludes_body() {
        let m = matcher();
        let text = "#prompt-save:foo bar baz";
        match m.match_save(text) {
            MatchResult::Save { name, body, span } => {
                assert_eq!(name, "foo");
                assert_eq!(body, "bar baz");
                assert_eq!(span, 0..17);
                assert_eq!(&text[span], "#prompt-save:foo ");
            }
            other => panic!("expected Save, got {other:?}"),
        }
    }

    #[test]
    fn test_save_command_mid_text() {
        let m = matcher();
        let text = "note to self #prompt-save:greet  hello there";
        match m.match_save(text) {
            MatchResult::Save { name, body, span } => {
                assert_eq!(name, "greet");
                assert_eq!(body, "hello there");
                assert_eq!(&text[span], "#prompt-save:greet  ");
            }
            other => panic!("expected Save, got {other:?}"),
        }
    }

    #[test]
    fn test_save_requires_name_and_body() {
        let m = matcher();
        assert_eq!(m.match_save("#prompt-save:"), MatchResult::NoMatch);
        assert_eq!(m.match_save("#prompt-save:foo"), MatchResult::NoMatch);
        assert_eq!(m.match_save("#prompt-save:foo "), MatchResult::NoMatch);
    }

    #[test]
    fn test_custom_trigger() {
        let config = EngineConfig {
            trigger: '!',
            ..EngineConfig::default()
        };
        let m = CommandMatcher::new(&config).unwrap();
        assert_eq!(
            m.match_use("!expl"),
            MatchResult::UseFilter {
                filter: "expl".to_string(),
                anchor: 0,
            }
        );
        assert_eq!(m.match_use("#expl"), MatchResult::NoMatch);
    }
}
