//! Shows / 节目管理

use chrono::Utc;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::require_text;
use super::seasons::list_seasons_for_show;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateShowRequest, Season, Show, UpdateShowRequest};
use crate::utils::{non_blank, slugify};

const SHOW_COLUMNS: &str = "id, name, slug, description, episode_count, created_at, updated_at";

/// Show with its seasons in order / 节目详情（含季）
#[derive(Debug, Clone, Serialize)]
pub struct ShowDetail {
    #[serde(flatten)]
    pub show: Show,
    pub seasons: Vec<Season>,
}

fn check_episode_count(value: Option<i64>) -> CatalogResult<Option<i64>> {
    match value {
        Some(count) if count < 0 => Err(CatalogError::Validation(
            "episodeCount must not be negative".to_string(),
        )),
        other => Ok(other),
    }
}

/// Explicit slug if given, else derived from the name; falls back to the id
/// for names without any ASCII letters or digits.
fn pick_slug(slug: Option<&str>, name: &str, id: &str) -> String {
    let slug = slugify(non_blank(slug).unwrap_or(name));
    if slug.is_empty() {
        id.to_string()
    } else {
        slug
    }
}

async fn ensure_slug_free(conn: &mut SqliteConnection, slug: &str, id: &str) -> CatalogResult<()> {
    let taken: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM shows WHERE slug = ? AND id != ?")
        .bind(slug)
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if taken > 0 {
        return Err(CatalogError::Validation(format!("slug {:?} is already taken", slug)));
    }
    Ok(())
}

/// Create a show / 创建节目
pub async fn create_show(db: &SqlitePool, req: CreateShowRequest) -> CatalogResult<Show> {
    let name = require_text("name", &req.name)?;
    let episode_count = check_episode_count(req.episode_count)?;

    let id = Uuid::new_v4().to_string();
    let slug = pick_slug(req.slug.as_deref(), &name, &id);
    let now = Utc::now().to_rfc3339();

    let mut tx = db.begin().await?;
    ensure_slug_free(&mut *tx, &slug, &id).await?;
    sqlx::query(
        "INSERT INTO shows (id, name, slug, description, episode_count, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&id)
    .bind(&name)
    .bind(&slug)
    .bind(non_blank(req.description.as_deref()))
    .bind(episode_count)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    tracing::info!("Created show {} ({})", id, slug);
    get_show(db, &id).await
}

pub async fn list_shows(db: &SqlitePool) -> CatalogResult<Vec<Show>> {
    let shows = sqlx::query_as::<_, Show>(&format!(
        "SELECT {} FROM shows ORDER BY name, id",
        SHOW_COLUMNS
    ))
    .fetch_all(db)
    .await?;
    Ok(shows)
}

pub async fn get_show(db: &SqlitePool, id: &str) -> CatalogResult<Show> {
    sqlx::query_as::<_, Show>(&format!("SELECT {} FROM shows WHERE id = ?", SHOW_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Show".to_string()))
}

/// Show with its seasons / 获取节目详情
pub async fn get_show_detail(db: &SqlitePool, id: &str) -> CatalogResult<ShowDetail> {
    let show = get_show(db, id).await?;
    let seasons = list_seasons_for_show(db, id).await?;
    Ok(ShowDetail { show, seasons })
}

/// Update show fields; renaming keeps the slug unless a new one is given / 更新节目
pub async fn update_show(db: &SqlitePool, id: &str, req: UpdateShowRequest) -> CatalogResult<Show> {
    let current = get_show(db, id).await?;

    let name = match req.name {
        Some(v) => require_text("name", &v)?,
        None => current.name,
    };
    let slug = match req.slug {
        Some(v) => pick_slug(Some(&v), &name, id),
        None => current.slug,
    };
    let description = match req.description {
        Some(v) => non_blank(Some(&v)).map(str::to_string),
        None => current.description,
    };
    let episode_count = match req.episode_count {
        Some(v) => check_episode_count(Some(v))?,
        None => current.episode_count,
    };

    let mut tx = db.begin().await?;
    ensure_slug_free(&mut *tx, &slug, id).await?;
    sqlx::query(
        "UPDATE shows SET name = ?, slug = ?, description = ?, episode_count = ?, updated_at = ? WHERE id = ?"
    )
    .bind(&name)
    .bind(&slug)
    .bind(&description)
    .bind(episode_count)
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    get_show(db, id).await
}

/// Delete a show; its seasons and episodes go with it, linked subtitles are
/// kept but unlinked / 删除节目
pub async fn delete_show(db: &SqlitePool, id: &str) -> CatalogResult<()> {
    let result = sqlx::query("DELETE FROM shows WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound("Show".to_string()));
    }
    tracing::info!("Deleted show {}", id);
    Ok(())
}
