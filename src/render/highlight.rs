//! Search-term highlighting / 搜索词高亮

use serde::{Deserialize, Serialize};

use crate::search::tokenizer::{split_words, strip_punctuation};
use crate::search::MatchMode;

/// Highlighting behaviour / 高亮选项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightOptions {
    pub mode: MatchMode,
    /// Only consulted in exact mode; substring mode always ignores case
    pub case_sensitive: bool,
}

impl Default for HighlightOptions {
    fn default() -> Self {
        Self {
            mode: MatchMode::Exact,
            case_sensitive: true,
        }
    }
}

/// A piece of a literal span, marked when it matched the term
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightRun {
    pub text: String,
    pub highlighted: bool,
}

/// Compiled search term / 高亮器
///
/// A multi-word term highlights every word that matches any of its words.
#[derive(Debug, Clone)]
pub struct Highlighter {
    terms: Vec<String>,
    options: HighlightOptions,
}

impl Highlighter {
    /// Returns None when the term has nothing to compare against
    pub fn new(term: &str, options: HighlightOptions) -> Option<Self> {
        let terms: Vec<String> = term
            .split_whitespace()
            .map(strip_punctuation)
            .filter(|t| !t.is_empty())
            .map(|t| {
                if options.case_sensitive && options.mode == MatchMode::Exact {
                    t
                } else {
                    t.to_lowercase()
                }
            })
            .collect();

        if terms.is_empty() {
            None
        } else {
            Some(Self { terms, options })
        }
    }

    /// Whether one (unstripped) word matches / 判断单词是否匹配
    pub fn matches(&self, word: &str) -> bool {
        let stripped = strip_punctuation(word);
        if stripped.is_empty() {
            return false;
        }
        match self.options.mode {
            MatchMode::Exact if self.options.case_sensitive => {
                self.terms.iter().any(|t| *t == stripped)
            }
            MatchMode::Exact => {
                let lower = stripped.to_lowercase();
                self.terms.iter().any(|t| *t == lower)
            }
            MatchMode::Substring => {
                let lower = stripped.to_lowercase();
                self.terms.iter().any(|t| lower.contains(t.as_str()))
            }
        }
    }

    /// Split a span into runs, merging consecutive unmatched text
    pub fn highlight(&self, span: &str) -> Vec<HighlightRun> {
        let mut runs: Vec<HighlightRun> = Vec::new();

        for token in split_words(span) {
            let highlighted = !token.is_whitespace && self.matches(token.text);
            match runs.last_mut() {
                Some(last) if !last.highlighted && !highlighted => last.text.push_str(token.text),
                _ => runs.push(HighlightRun {
                    text: token.text.to_string(),
                    highlighted,
                }),
            }
        }

        runs
    }
}
