//! Candidate lookup for dialog search / 搜索候选存储
//!
//! One query per search narrows dialogs by the indexed search columns; a
//! second fetches identity fields for the subtitles on the returned page.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

use super::schema::{DialogHit, SubtitleInfo};
use crate::error::CatalogResult;
use crate::utils::contains_pattern;

/// How the store narrows candidates / 候选过滤条件
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateFilter {
    /// Lowercased displayed text contains the needle / 包含子串
    Contains(String),
    /// Every normalized word appears as a whole word / 包含全部单词
    Words(Vec<String>),
}

/// Backing store for the search pipeline / 搜索存储接口
#[async_trait]
pub trait DialogStore: Send + Sync {
    /// Dialogs that may match, ordered by subtitle id then position.
    /// Returning extra rows is allowed; missing a true match is not.
    async fn find_candidates(&self, filter: &CandidateFilter) -> CatalogResult<Vec<DialogHit>>;

    /// Identity fields for the given subtitle ids; unknown ids are skipped
    async fn subtitles_by_ids(&self, ids: &[String]) -> CatalogResult<Vec<SubtitleInfo>>;
}

/// SQLite implementation over the `dialogs` and `subtitles` tables
#[derive(Clone)]
pub struct SqliteDialogStore {
    db: SqlitePool,
}

impl SqliteDialogStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl DialogStore for SqliteDialogStore {
    async fn find_candidates(&self, filter: &CandidateFilter) -> CatalogResult<Vec<DialogHit>> {
        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, subtitle_id, position, text, start_time, end_time FROM dialogs WHERE ",
        );

        match filter {
            CandidateFilter::Contains(needle) => {
                qb.push("search_text LIKE ")
                    .push_bind(contains_pattern(needle))
                    .push(" ESCAPE '\\'");
            }
            CandidateFilter::Words(words) if words.is_empty() => {
                qb.push("0");
            }
            CandidateFilter::Words(words) => {
                let mut separated = qb.separated(" AND ");
                for word in words {
                    separated
                        .push("search_words LIKE ")
                        .push_bind_unseparated(contains_pattern(&format!(" {} ", word)))
                        .push_unseparated(" ESCAPE '\\'");
                }
            }
        }
        qb.push(" ORDER BY subtitle_id, position");

        let hits = qb.build_query_as::<DialogHit>().fetch_all(&self.db).await?;
        tracing::debug!("Dialog search returned {} candidates", hits.len());
        Ok(hits)
    }

    async fn subtitles_by_ids(&self, ids: &[String]) -> CatalogResult<Vec<SubtitleInfo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT id, show_name, season, episode, language, filler, filename FROM subtitles WHERE id IN (",
        );
        let mut separated = qb.separated(", ");
        for id in ids {
            separated.push_bind(id.clone());
        }
        separated.push_unseparated(")");

        let rows = qb.build_query_as::<SubtitleInfo>().fetch_all(&self.db).await?;
        Ok(rows)
    }
}
