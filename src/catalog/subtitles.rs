//! Subtitle records / 字幕记录管理

use chrono::Utc;
use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::collections::HashMap;
use uuid::Uuid;

use super::dialogs::DIALOG_COLUMNS;
use super::episodes::get_episode;
use super::{ensure_exists, require_text, validate_dialog};
use crate::config::SearchConfig;
use crate::db::append_dialog;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateSubtitleRequest, Dialog, Subtitle, SubtitleSummary, UpdateSubtitleRequest};
use crate::pagination::{PageMetadata, PageRequest};
use crate::render::{render_dialog, HighlightOptions, Highlighter, Segment};
use crate::search::MatchMode;
use crate::timecode::{format_seconds, timecode_seconds, within_window};
use crate::utils::{contains_pattern, non_blank};

const SUBTITLE_COLUMNS: &str =
    "id, episode_id, show_name, season, episode, language, filler, filename, release_group, created_at, updated_at";

/// Listing sort key / 排序字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubtitleSort {
    #[default]
    Episode,
    Season,
    ShowName,
    Language,
    Filename,
}

impl SubtitleSort {
    pub fn parse(value: &str) -> CatalogResult<Self> {
        match value {
            "episode" => Ok(SubtitleSort::Episode),
            "season" => Ok(SubtitleSort::Season),
            "showName" => Ok(SubtitleSort::ShowName),
            "language" => Ok(SubtitleSort::Language),
            "filename" => Ok(SubtitleSort::Filename),
            other => Err(CatalogError::Validation(format!("unsupported sort field {:?}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleSort::Episode => "episode",
            SubtitleSort::Season => "season",
            SubtitleSort::ShowName => "showName",
            SubtitleSort::Language => "language",
            SubtitleSort::Filename => "filename",
        }
    }

    fn column(&self) -> &'static str {
        match self {
            SubtitleSort::Episode => "s.episode",
            SubtitleSort::Season => "s.season",
            SubtitleSort::ShowName => "s.show_name",
            SubtitleSort::Language => "s.language",
            SubtitleSort::Filename => "s.filename",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> CatalogResult<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(CatalogError::Validation(format!("order must be asc or desc, got {:?}", other))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

fn parse_int(field: &str, value: &str) -> CatalogResult<i64> {
    value
        .trim()
        .parse()
        .map_err(|_| CatalogError::Validation(format!("{} must be an integer, got {:?}", field, value)))
}

fn parse_bool(field: &str, value: &str) -> CatalogResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Ok(true),
        "false" | "0" => Ok(false),
        _ => Err(CatalogError::Validation(format!("{} must be true or false, got {:?}", field, value))),
    }
}

fn parse_seconds(field: &str, value: &str) -> CatalogResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| CatalogError::Validation(format!("{} must be a number of seconds, got {:?}", field, value)))
}

/// Filters, sort and page of a subtitle listing / 字幕列表查询
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleListQuery {
    pub episode: Option<i64>,
    pub season: Option<i64>,
    /// Case-insensitive containment match on the show name
    pub show_name: Option<String>,
    pub language: Option<String>,
    pub filler: Option<bool>,
    pub sort: SubtitleSort,
    pub order: SortOrder,
    pub page: PageRequest,
}

impl SubtitleListQuery {
    /// Validate raw query-string values. Blank filters are ignored.
    pub fn from_query(raw: &HashMap<String, String>, config: &SearchConfig) -> CatalogResult<Self> {
        let get = |key: &str| non_blank(raw.get(key).map(String::as_str));

        Ok(Self {
            episode: get("episode").map(|v| parse_int("episode", v)).transpose()?,
            season: get("season").map(|v| parse_int("season", v)).transpose()?,
            show_name: get("showName").map(str::to_string),
            language: get("language").map(str::to_string),
            filler: get("filler").map(|v| parse_bool("filler", v)).transpose()?,
            sort: get("sort").map(SubtitleSort::parse).transpose()?.unwrap_or_default(),
            order: get("order").map(SortOrder::parse).transpose()?.unwrap_or_default(),
            page: PageRequest::from_query(
                raw.get("page").map(String::as_str),
                raw.get("limit").map(String::as_str),
                config.default_limit,
                config.max_limit,
            )?,
        })
    }

    fn link_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(episode) = self.episode {
            params.push(("episode", episode.to_string()));
        }
        if let Some(season) = self.season {
            params.push(("season", season.to_string()));
        }
        if let Some(show_name) = &self.show_name {
            params.push(("showName", show_name.clone()));
        }
        if let Some(language) = &self.language {
            params.push(("language", language.clone()));
        }
        if let Some(filler) = self.filler {
            params.push(("filler", filler.to_string()));
        }
        params.push(("sort", self.sort.as_str().to_string()));
        params.push(("order", self.order.as_str().to_string()));
        params
    }

    fn push_filters(&self, qb: &mut QueryBuilder<'_, Sqlite>) {
        qb.push(" WHERE 1 = 1");
        if let Some(episode) = self.episode {
            qb.push(" AND s.episode = ").push_bind(episode);
        }
        if let Some(season) = self.season {
            qb.push(" AND s.season = ").push_bind(season);
        }
        if let Some(show_name) = &self.show_name {
            qb.push(" AND LOWER(s.show_name) LIKE ")
                .push_bind(contains_pattern(&show_name.to_lowercase()))
                .push(" ESCAPE '\\'");
        }
        if let Some(language) = &self.language {
            qb.push(" AND s.language = ").push_bind(language.clone());
        }
        if let Some(filler) = self.filler {
            qb.push(" AND s.filler = ").push_bind(filler);
        }
    }
}

/// Subtitle listing response / 字幕列表响应
#[derive(Debug, Clone, Serialize)]
pub struct SubtitlePage {
    pub metadata: PageMetadata,
    pub results: Vec<SubtitleSummary>,
}

/// Options of the subtitle detail view / 字幕详情选项
#[derive(Debug, Clone, Default)]
pub struct DetailOptions {
    /// Keep dialogs ending at or after this second
    pub from: Option<u64>,
    /// Keep dialogs starting at or before this second
    pub to: Option<u64>,
    /// When set, each dialog carries rendered segments with this term marked
    pub highlight: Option<String>,
    pub highlight_options: HighlightOptions,
}

impl DetailOptions {
    pub fn from_query(raw: &HashMap<String, String>, config: &SearchConfig) -> CatalogResult<Self> {
        let get = |key: &str| non_blank(raw.get(key).map(String::as_str));

        let from = get("from").map(|v| parse_seconds("from", v)).transpose()?;
        let to = get("to").map(|v| parse_seconds("to", v)).transpose()?;
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(CatalogError::Validation(format!(
                    "from ({}) must not be greater than to ({})",
                    from, to
                )));
            }
        }

        let mode = match get("mode") {
            Some(m) => MatchMode::parse(m)?,
            None => MatchMode::Exact,
        };

        Ok(Self {
            from,
            to,
            highlight: get("highlight").map(str::to_string),
            highlight_options: HighlightOptions {
                mode,
                case_sensitive: config.case_sensitive_highlight,
            },
        })
    }
}

/// Dialog in the detail view / 详情中的对白
#[derive(Debug, Clone, Serialize)]
pub struct DialogView {
    #[serde(flatten)]
    pub dialog: Dialog,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
}

/// Subtitle with its dialogs in display order / 字幕详情
#[derive(Debug, Clone, Serialize)]
pub struct SubtitleDetail {
    #[serde(flatten)]
    pub subtitle: Subtitle,
    /// Latest dialog end time, formatted for display
    pub runtime: Option<String>,
    pub dialogs: Vec<DialogView>,
}

/// Create a subtitle and its initial dialogs in one transaction / 创建字幕
pub async fn create_subtitle(db: &SqlitePool, req: CreateSubtitleRequest) -> CatalogResult<SubtitleDetail> {
    let filename = require_text("filename", &req.filename)?;
    let show_name = require_text("showName", &req.show_name)?;
    let language = require_text("language", &req.language)?;
    if req.season < 0 || req.episode < 0 {
        return Err(CatalogError::Validation("season and episode must not be negative".to_string()));
    }
    for dialog in &req.dialogs {
        validate_dialog(dialog)?;
    }
    let episode_id = non_blank(req.episode_id.as_deref());

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let mut tx = db.begin().await?;
    if let Some(episode_id) = episode_id {
        ensure_exists(&mut *tx, "episodes", "Episode", episode_id).await?;
    }
    sqlx::query(
        "INSERT INTO subtitles (id, episode_id, show_name, season, episode, language, filler, filename, release_group, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&id)
    .bind(episode_id)
    .bind(&show_name)
    .bind(req.season)
    .bind(req.episode)
    .bind(&language)
    .bind(req.filler)
    .bind(&filename)
    .bind(non_blank(req.release_group.as_deref()))
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;

    for dialog in &req.dialogs {
        append_dialog(&mut tx, &id, dialog).await?;
    }
    tx.commit().await?;

    tracing::info!("Created subtitle {} ({}) with {} dialogs", id, filename, req.dialogs.len());
    get_subtitle_detail(db, &id, &DetailOptions::default()).await
}

/// Paginated, filtered subtitle listing / 字幕列表
pub async fn list_subtitles(
    db: &SqlitePool,
    query: &SubtitleListQuery,
    base_path: &str,
) -> CatalogResult<SubtitlePage> {
    let mut count_qb: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT COUNT(*) FROM subtitles s");
    query.push_filters(&mut count_qb);
    let total: i64 = count_qb.build_query_scalar::<i64>().fetch_one(db).await?;

    let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
        "SELECT s.id, s.episode_id, s.show_name, s.season, s.episode, s.language, s.filler, s.filename,
                s.release_group, (SELECT COUNT(*) FROM dialogs d WHERE d.subtitle_id = s.id) AS dialog_count
         FROM subtitles s",
    );
    query.push_filters(&mut qb);
    qb.push(format!(
        " ORDER BY {} {}, s.id ASC",
        query.sort.column(),
        query.order.as_str().to_uppercase()
    ));
    qb.push(" LIMIT ")
        .push_bind(i64::from(query.page.limit))
        .push(" OFFSET ")
        .push_bind(query.page.offset() as i64);

    let results = qb.build_query_as::<SubtitleSummary>().fetch_all(db).await?;
    let metadata = PageMetadata::new(total.max(0) as u64, query.page, base_path, &query.link_params());

    Ok(SubtitlePage { metadata, results })
}

/// Subtitle tracks linked to one episode / 获取集的所有字幕
pub async fn list_subtitles_for_episode(db: &SqlitePool, episode_id: &str) -> CatalogResult<Vec<SubtitleSummary>> {
    get_episode(db, episode_id).await?;

    let subtitles = sqlx::query_as::<_, SubtitleSummary>(
        "SELECT s.id, s.episode_id, s.show_name, s.season, s.episode, s.language, s.filler, s.filename,
                s.release_group, (SELECT COUNT(*) FROM dialogs d WHERE d.subtitle_id = s.id) AS dialog_count
         FROM subtitles s
         WHERE s.episode_id = ?
         ORDER BY s.language, s.filename, s.id",
    )
    .bind(episode_id)
    .fetch_all(db)
    .await?;
    Ok(subtitles)
}

pub async fn get_subtitle(db: &SqlitePool, id: &str) -> CatalogResult<Subtitle> {
    sqlx::query_as::<_, Subtitle>(&format!("SELECT {} FROM subtitles WHERE id = ?", SUBTITLE_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Subtitle".to_string()))
}

/// Subtitle with its dialogs, optionally windowed and highlighted / 获取字幕详情
pub async fn get_subtitle_detail(
    db: &SqlitePool,
    id: &str,
    options: &DetailOptions,
) -> CatalogResult<SubtitleDetail> {
    let subtitle = get_subtitle(db, id).await?;

    let dialogs: Vec<Dialog> = sqlx::query_as(&format!(
        "SELECT {} FROM dialogs WHERE subtitle_id = ? ORDER BY position",
        DIALOG_COLUMNS
    ))
    .bind(id)
    .fetch_all(db)
    .await?;

    let runtime = dialogs
        .iter()
        .filter_map(|d| timecode_seconds(&d.end_time).ok())
        .max()
        .map(format_seconds);

    let highlighter = options
        .highlight
        .as_deref()
        .and_then(|term| Highlighter::new(term, options.highlight_options));

    let dialogs = dialogs
        .into_iter()
        .filter(|d| within_window(&d.start_time, &d.end_time, options.from, options.to))
        .map(|dialog| DialogView {
            segments: options
                .highlight
                .as_ref()
                .map(|_| render_dialog(&dialog.text, highlighter.as_ref())),
            dialog,
        })
        .collect();

    Ok(SubtitleDetail { subtitle, runtime, dialogs })
}

/// Update subtitle fields; absent fields keep their value / 更新字幕
pub async fn update_subtitle(db: &SqlitePool, id: &str, req: UpdateSubtitleRequest) -> CatalogResult<Subtitle> {
    let current = get_subtitle(db, id).await?;

    let filename = match req.filename {
        Some(v) => require_text("filename", &v)?,
        None => current.filename,
    };
    let show_name = match req.show_name {
        Some(v) => require_text("showName", &v)?,
        None => current.show_name,
    };
    let language = match req.language {
        Some(v) => require_text("language", &v)?,
        None => current.language,
    };
    let season = req.season.unwrap_or(current.season);
    let episode = req.episode.unwrap_or(current.episode);
    if season < 0 || episode < 0 {
        return Err(CatalogError::Validation("season and episode must not be negative".to_string()));
    }
    let filler = req.filler.unwrap_or(current.filler);
    let release_group = match req.release_group {
        Some(v) => non_blank(Some(&v)).map(str::to_string),
        None => current.release_group,
    };
    let episode_id = match req.episode_id {
        Some(v) => non_blank(Some(&v)).map(str::to_string),
        None => current.episode_id,
    };

    let mut tx = db.begin().await?;
    if let Some(episode_id) = &episode_id {
        ensure_exists(&mut *tx, "episodes", "Episode", episode_id).await?;
    }
    sqlx::query(
        "UPDATE subtitles SET episode_id = ?, show_name = ?, season = ?, episode = ?, language = ?,
         filler = ?, filename = ?, release_group = ?, updated_at = ? WHERE id = ?"
    )
    .bind(&episode_id)
    .bind(&show_name)
    .bind(season)
    .bind(episode)
    .bind(&language)
    .bind(filler)
    .bind(&filename)
    .bind(&release_group)
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    get_subtitle(db, id).await
}

/// Delete a subtitle and all of its dialogs / 删除字幕
pub async fn delete_subtitle(db: &SqlitePool, id: &str) -> CatalogResult<()> {
    let mut tx = db.begin().await?;

    let dialogs = sqlx::query("DELETE FROM dialogs WHERE subtitle_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    let result = sqlx::query("DELETE FROM subtitles WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound("Subtitle".to_string()));
    }
    tx.commit().await?;

    tracing::info!("Deleted subtitle {} and {} dialogs", id, dialogs.rows_affected());
    Ok(())
}
