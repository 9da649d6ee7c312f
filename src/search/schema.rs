//! Dialog search types / 对白搜索类型定义

use serde::{Deserialize, Serialize};

use crate::config::SearchConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::pagination::{PageMetadata, PageRequest};
use crate::render::Segment;

/// How a term is compared against dialog words / 匹配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Whole-word comparison after punctuation stripping / 整词匹配
    Exact,
    /// Containment comparison, case-insensitive / 包含匹配
    #[default]
    Substring,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Exact => "exact",
            MatchMode::Substring => "substring",
        }
    }

    /// Parse a request's `mode` value, case-insensitively
    pub fn parse(value: &str) -> CatalogResult<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(MatchMode::Exact),
            "substring" => Ok(MatchMode::Substring),
            other => Err(CatalogError::Validation(format!(
                "mode must be \"exact\" or \"substring\", got {:?}",
                other
            ))),
        }
    }
}

/// Validated search request / 搜索参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    /// Trimmed, non-empty search term / 搜索关键词
    pub query: String,
    pub page: PageRequest,
    pub match_mode: MatchMode,
}

impl SearchParams {
    /// Validate raw query-string values / 校验搜索参数
    ///
    /// The query is checked first, so a request with both a blank query and
    /// bad pagination reports `InvalidQuery`.
    pub fn from_query(
        query: Option<&str>,
        page: Option<&str>,
        limit: Option<&str>,
        mode: Option<&str>,
        config: &SearchConfig,
    ) -> CatalogResult<Self> {
        let query = query
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .ok_or(CatalogError::InvalidQuery)?;
        let page = PageRequest::from_query(page, limit, config.default_limit, config.max_limit)?;
        let match_mode = match mode.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => MatchMode::parse(m)?,
            None => config.match_mode,
        };

        Ok(Self {
            query: query.to_string(),
            page,
            match_mode,
        })
    }

    /// Parameters repeated in page links / 分页链接参数
    pub fn link_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("query", self.query.clone()),
            ("mode", self.match_mode.as_str().to_string()),
        ]
    }
}

/// Candidate dialog returned by the store / 存储返回的候选对白
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct DialogHit {
    pub id: String,
    pub subtitle_id: String,
    pub position: i64,
    pub text: String,
    pub start_time: String,
    pub end_time: String,
}

/// Identity fields of a subtitle, used to enrich a group / 字幕标识信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleInfo {
    pub id: String,
    pub show_name: String,
    pub season: i64,
    pub episode: i64,
    pub language: String,
    pub filler: bool,
    pub filename: String,
}

/// Matching dialogs of one subtitle, before enrichment / 未补充字幕信息的匹配组
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    pub subtitle_id: String,
    pub dialogs: Vec<DialogHit>,
}

impl MatchGroup {
    pub fn match_count(&self) -> usize {
        self.dialogs.len()
    }
}

/// Dialog as returned in a search result, with rendered segments
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultDialog {
    #[serde(rename = "_id")]
    pub id: String,
    pub text: String,
    pub start_time: String,
    pub end_time: String,
    pub segments: Vec<Segment>,
}

/// One search result: a subtitle and its matching dialogs / 搜索结果组
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultGroup {
    #[serde(rename = "_id")]
    pub id: String,
    pub show_name: String,
    pub season: i64,
    pub episode: i64,
    pub language: String,
    pub filler: bool,
    pub filename: String,
    pub dialogs: Vec<ResultDialog>,
    pub match_count: usize,
}

/// Search response / 搜索响应
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchPage {
    pub metadata: PageMetadata,
    pub results: Vec<SearchResultGroup>,
}
