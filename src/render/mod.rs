//! Subtitle text renderer / 字幕文本渲染
//!
//! Turns raw dialog text into styled segments:
//! - `{i1}`/`{i0}` and `{b1}`/`{b0}` toggle italic and bold; other tags vanish
//! - `\N` and literal newlines become break segments
//! - an optional search term marks matching words as highlighted
//!
//! Style state starts off for every dialog and is threaded through a fold over
//! the markup tokens. Rendering is total: any input yields segments.

pub mod highlight;
pub mod markup;

use serde::Serialize;

pub use highlight::{HighlightOptions, HighlightRun, Highlighter};
pub use markup::{plain_text, tokenize_markup, Directive, MarkupToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Text,
    Break,
}

/// Render segment / 渲染片段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub content: String,
    pub italic: bool,
    pub bold: bool,
    pub highlighted: bool,
}

impl Segment {
    fn text(content: String, style: StyleState, highlighted: bool) -> Self {
        Self {
            kind: SegmentKind::Text,
            content,
            italic: style.italic,
            bold: style.bold,
            highlighted,
        }
    }

    fn line_break() -> Self {
        Self {
            kind: SegmentKind::Break,
            content: "\n".to_string(),
            italic: false,
            bold: false,
            highlighted: false,
        }
    }
}

/// Running italic/bold state / 样式状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleState {
    pub italic: bool,
    pub bold: bool,
}

impl StyleState {
    pub fn apply(self, directive: Directive) -> Self {
        match directive {
            Directive::ItalicOn => Self { italic: true, ..self },
            Directive::ItalicOff => Self { italic: false, ..self },
            Directive::BoldOn => Self { bold: true, ..self },
            Directive::BoldOff => Self { bold: false, ..self },
            Directive::Unknown => self,
        }
    }
}

/// Render one dialog's raw text / 渲染单条对白
pub fn render_dialog(text: &str, highlighter: Option<&Highlighter>) -> Vec<Segment> {
    let (_, segments) = tokenize_markup(text).into_iter().fold(
        (StyleState::default(), Vec::new()),
        |(style, mut segments), token| {
            let style = match token {
                MarkupToken::Directive(directive) => style.apply(directive),
                MarkupToken::Break => {
                    segments.push(Segment::line_break());
                    style
                }
                MarkupToken::Text(span) => {
                    match highlighter {
                        Some(h) => segments.extend(
                            h.highlight(span)
                                .into_iter()
                                .map(|run| Segment::text(run.text, style, run.highlighted)),
                        ),
                        None => segments.push(Segment::text(span.to_string(), style, false)),
                    }
                    style
                }
            };
            (style, segments)
        },
    );
    segments
}

/// Render with a raw term; a blank term disables highlighting
pub fn render_with_term(text: &str, term: Option<&str>, options: HighlightOptions) -> Vec<Segment> {
    let highlighter = term.and_then(|t| Highlighter::new(t, options));
    render_dialog(text, highlighter.as_ref())
}
