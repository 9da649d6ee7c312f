//! Dialog search / 对白搜索
//!
//! Architecture / 架构：
//! - `store`: candidate lookup behind the `DialogStore` trait (SQLite by default)
//! - `pipeline`: match verification, grouping by subtitle, ordering, pagination
//! - `tokenizer`: word splitting and normalization shared with the highlighter
//!
//! The store only narrows the candidate set. Every candidate is re-checked in
//! the pipeline, so any store that returns a superset of the true matches
//! produces the same page.

pub mod pipeline;
pub mod schema;
pub mod store;
pub mod tokenizer;

pub use pipeline::{dialog_matches, group_matches, search_dialogs};
pub use schema::{
    DialogHit, MatchGroup, MatchMode, ResultDialog, SearchPage, SearchParams, SearchResultGroup,
    SubtitleInfo,
};
pub use store::{CandidateFilter, DialogStore, SqliteDialogStore};

use crate::render::plain_text;
use tokenizer::normalized_words;

/// Column value for substring search: displayed text, lowercased / 子串搜索列
pub fn index_text(raw: &str) -> String {
    plain_text(raw).to_lowercase()
}

/// Column value for whole-word search: normalized words padded with spaces,
/// so `LIKE '% word %'` only hits complete words / 整词搜索列
pub fn index_words(raw: &str) -> String {
    let words = normalized_words(&plain_text(raw));
    if words.is_empty() {
        String::new()
    } else {
        format!(" {} ", words.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_columns() {
        assert_eq!(index_text("{i1}Hello{i0}\\NWorld!"), "hello\nworld!");
        assert_eq!(index_words("{i1}Hello{i0}\\NWorld! Don't"), " hello world dont ");
        assert_eq!(index_words("{b1}...{b0}"), "");
    }
}
