//! Episodes / 集管理

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::seasons::get_season;
use super::shows::get_show;
use super::{require_number, require_text};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateEpisodeRequest, Episode, UpdateEpisodeRequest};
use crate::utils::{non_blank, slugify};

const EPISODE_COLUMNS: &str =
    "id, show_id, season_id, title, slug, description, episode_number, created_at, updated_at";

fn episode_slug(slug: Option<&str>, title: &str, id: &str) -> String {
    let slug = slugify(non_blank(slug).unwrap_or(title));
    if slug.is_empty() {
        id.to_string()
    } else {
        slug
    }
}

/// Create an episode in a season; the show comes from the season / 创建集
pub async fn create_episode(db: &SqlitePool, req: CreateEpisodeRequest) -> CatalogResult<Episode> {
    let title = require_text("title", &req.title)?;
    let episode_number = require_number("episodeNumber", req.episode_number)?;

    let id = Uuid::new_v4().to_string();
    let slug = episode_slug(req.slug.as_deref(), &title, &id);
    let now = Utc::now().to_rfc3339();

    let mut tx = db.begin().await?;
    let show_id: String = sqlx::query_scalar("SELECT show_id FROM seasons WHERE id = ?")
        .bind(&req.season_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Season".to_string()))?;

    sqlx::query(
        "INSERT INTO episodes (id, show_id, season_id, title, slug, description, episode_number, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&id)
    .bind(&show_id)
    .bind(&req.season_id)
    .bind(&title)
    .bind(&slug)
    .bind(non_blank(req.description.as_deref()))
    .bind(episode_number)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    get_episode(db, &id).await
}

pub async fn get_episode(db: &SqlitePool, id: &str) -> CatalogResult<Episode> {
    sqlx::query_as::<_, Episode>(&format!("SELECT {} FROM episodes WHERE id = ?", EPISODE_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Episode".to_string()))
}

/// All episodes of a show, ordered by season number then episode number
pub async fn list_episodes_for_show(db: &SqlitePool, show_id: &str) -> CatalogResult<Vec<Episode>> {
    get_show(db, show_id).await?;

    let episodes = sqlx::query_as::<_, Episode>(
        "SELECT e.id, e.show_id, e.season_id, e.title, e.slug, e.description, e.episode_number,
                e.created_at, e.updated_at
         FROM episodes e
         JOIN seasons s ON s.id = e.season_id
         WHERE e.show_id = ?
         ORDER BY s.season_number, e.episode_number, e.id",
    )
    .bind(show_id)
    .fetch_all(db)
    .await?;
    Ok(episodes)
}

/// Episodes of one season / 获取季的所有集
pub async fn list_episodes_for_season(db: &SqlitePool, season_id: &str) -> CatalogResult<Vec<Episode>> {
    get_season(db, season_id).await?;

    let episodes = sqlx::query_as::<_, Episode>(&format!(
        "SELECT {} FROM episodes WHERE season_id = ? ORDER BY episode_number, id",
        EPISODE_COLUMNS
    ))
    .bind(season_id)
    .fetch_all(db)
    .await?;
    Ok(episodes)
}

/// Update an episode; a blank slug is derived again from the title / 更新集
pub async fn update_episode(db: &SqlitePool, id: &str, req: UpdateEpisodeRequest) -> CatalogResult<Episode> {
    let current = get_episode(db, id).await?;

    let title = match req.title {
        Some(v) => require_text("title", &v)?,
        None => current.title,
    };
    let episode_number = match req.episode_number {
        Some(v) => require_number("episodeNumber", v)?,
        None => current.episode_number,
    };
    let slug = match req.slug {
        Some(v) => episode_slug(Some(&v), &title, id),
        None => current.slug,
    };
    let description = match req.description {
        Some(v) => non_blank(Some(&v)).map(str::to_string),
        None => current.description,
    };

    sqlx::query(
        "UPDATE episodes SET title = ?, slug = ?, description = ?, episode_number = ?, updated_at = ? WHERE id = ?"
    )
    .bind(&title)
    .bind(&slug)
    .bind(&description)
    .bind(episode_number)
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .execute(db)
    .await?;

    get_episode(db, id).await
}

/// Delete an episode; its subtitles stay, unlinked / 删除集
pub async fn delete_episode(db: &SqlitePool, id: &str) -> CatalogResult<()> {
    let result = sqlx::query("DELETE FROM episodes WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound("Episode".to_string()));
    }
    tracing::info!("Deleted episode {}", id);
    Ok(())
}
