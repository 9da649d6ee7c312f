//! Subtitle markup tokenizer / 字幕样式标记分词
//!
//! Raw dialog text embeds brace directives (`{i1}`, `{i0}`, `{b1}`, `{b0}`)
//! and line-break markers (`\N` or a literal newline). This module splits the
//! text into literal spans, directives and breaks without interpreting them.

use once_cell::sync::Lazy;
use regex::Regex;

/// `{...}` directive, `\N` marker, or a literal (CR)LF / 指令、换行标记
static MARKUP_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[^}]+\}|\\N|\r?\n").expect("valid markup pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    ItalicOn,
    ItalicOff,
    BoldOn,
    BoldOff,
    /// Any other tag; removed from output, no effect / 未知标记
    Unknown,
}

impl Directive {
    /// Interpret the inside of a `{...}` tag, case-insensitively
    pub fn parse(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "i1" => Directive::ItalicOn,
            "i0" => Directive::ItalicOff,
            "b1" => Directive::BoldOn,
            "b0" => Directive::BoldOff,
            _ => Directive::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupToken<'a> {
    Text(&'a str),
    Directive(Directive),
    Break,
}

/// Split raw dialog text into markup tokens, in order / 分割字幕文本
///
/// Empty literal spans are not emitted. Text that does not match the
/// directive pattern (a lone `{`, `{}`) stays literal.
pub fn tokenize_markup(text: &str) -> Vec<MarkupToken<'_>> {
    let mut tokens = Vec::new();
    let mut last = 0;

    for m in MARKUP_PATTERN.find_iter(text) {
        if m.start() > last {
            tokens.push(MarkupToken::Text(&text[last..m.start()]));
        }
        let raw = m.as_str();
        if raw.starts_with('{') {
            tokens.push(MarkupToken::Directive(Directive::parse(&raw[1..raw.len() - 1])));
        } else {
            tokens.push(MarkupToken::Break);
        }
        last = m.end();
    }
    if last < text.len() {
        tokens.push(MarkupToken::Text(&text[last..]));
    }

    tokens
}

/// Dialog text as displayed: directives removed, breaks as newlines / 纯文本
pub fn plain_text(text: &str) -> String {
    tokenize_markup(text)
        .into_iter()
        .filter_map(|token| match token {
            MarkupToken::Text(span) => Some(span),
            MarkupToken::Break => Some("\n"),
            MarkupToken::Directive(_) => None,
        })
        .collect()
}
