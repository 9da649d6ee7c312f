//! Word tokenizer shared by dialog search and highlighting / 分词工具
//!
//! Supports / 支持：
//! - Whitespace-preserving word splitting / 保留空白的分词
//! - Punctuation stripping before comparison / 比较前去除标点
//! - Lowercase normalization / 小写标准化

/// Punctuation removed from a token before it is compared / 比较前去除的标点
pub const STRIPPED_PUNCTUATION: &[char] = &[
    ',', '.', ':', ';', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}',
];

/// A run of either whitespace or non-whitespace characters / 分词片段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordToken<'a> {
    pub text: &'a str,
    pub is_whitespace: bool,
}

/// Split text into alternating word and whitespace runs / 分割为单词和空白
///
/// Concatenating every token's text reproduces the input exactly.
pub fn split_words(text: &str) -> Vec<WordToken<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (idx, c) in text.char_indices() {
        let ws = c.is_whitespace();
        match current {
            Some(prev) if prev == ws => {}
            Some(prev) => {
                tokens.push(WordToken { text: &text[start..idx], is_whitespace: prev });
                start = idx;
                current = Some(ws);
            }
            None => current = Some(ws),
        }
    }
    if let Some(prev) = current {
        tokens.push(WordToken { text: &text[start..], is_whitespace: prev });
    }

    tokens
}

/// Remove comparison punctuation from a token / 去除标点
pub fn strip_punctuation(token: &str) -> String {
    token.chars().filter(|c| !STRIPPED_PUNCTUATION.contains(c)).collect()
}

/// Stripped, lowercased words of a text, empty ones dropped / 标准化单词列表
pub fn normalized_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| strip_punctuation(w).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Normalize text for substring search / 标准化文本用于搜索
/// - Convert to lowercase / 转小写
/// - Trim surrounding whitespace / 去除首尾空白
pub fn normalize_for_search(text: &str) -> String {
    text.trim().to_lowercase()
}
