//! Seasons of a show / 季管理

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::shows::get_show;
use super::{ensure_exists, require_number, require_text};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateSeasonRequest, Season, UpdateSeasonRequest};

const SEASON_COLUMNS: &str = "id, show_id, title, season_number, episode_count, created_at, updated_at";

fn check_episode_count(value: i64) -> CatalogResult<i64> {
    if value < 0 {
        return Err(CatalogError::Validation("episodeCount must not be negative".to_string()));
    }
    Ok(value)
}

/// Create a season under an existing show / 创建季
pub async fn create_season(db: &SqlitePool, req: CreateSeasonRequest) -> CatalogResult<Season> {
    let title = require_text("title", &req.title)?;
    let season_number = require_number("seasonNumber", req.season_number)?;
    let episode_count = check_episode_count(req.episode_count)?;

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let mut tx = db.begin().await?;
    ensure_exists(&mut *tx, "shows", "Show", &req.show_id).await?;
    sqlx::query(
        "INSERT INTO seasons (id, show_id, title, season_number, episode_count, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&id)
    .bind(&req.show_id)
    .bind(&title)
    .bind(season_number)
    .bind(episode_count)
    .bind(&now)
    .bind(&now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;

    get_season(db, &id).await
}

pub async fn list_seasons(db: &SqlitePool) -> CatalogResult<Vec<Season>> {
    let seasons = sqlx::query_as::<_, Season>(&format!(
        "SELECT {} FROM seasons ORDER BY show_id, season_number, id",
        SEASON_COLUMNS
    ))
    .fetch_all(db)
    .await?;
    Ok(seasons)
}

/// Seasons of one show by number / 获取节目的所有季
pub async fn list_seasons_for_show(db: &SqlitePool, show_id: &str) -> CatalogResult<Vec<Season>> {
    get_show(db, show_id).await?;

    let seasons = sqlx::query_as::<_, Season>(&format!(
        "SELECT {} FROM seasons WHERE show_id = ? ORDER BY season_number, id",
        SEASON_COLUMNS
    ))
    .bind(show_id)
    .fetch_all(db)
    .await?;
    Ok(seasons)
}

pub async fn get_season(db: &SqlitePool, id: &str) -> CatalogResult<Season> {
    sqlx::query_as::<_, Season>(&format!("SELECT {} FROM seasons WHERE id = ?", SEASON_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Season".to_string()))
}

/// Update a season; it cannot move to another show / 更新季
pub async fn update_season(db: &SqlitePool, id: &str, req: UpdateSeasonRequest) -> CatalogResult<Season> {
    let current = get_season(db, id).await?;

    let title = match req.title {
        Some(v) => require_text("title", &v)?,
        None => current.title,
    };
    let season_number = match req.season_number {
        Some(v) => require_number("seasonNumber", v)?,
        None => current.season_number,
    };
    let episode_count = match req.episode_count {
        Some(v) => check_episode_count(v)?,
        None => current.episode_count,
    };

    sqlx::query(
        "UPDATE seasons SET title = ?, season_number = ?, episode_count = ?, updated_at = ? WHERE id = ?"
    )
    .bind(&title)
    .bind(season_number)
    .bind(episode_count)
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .execute(db)
    .await?;

    get_season(db, id).await
}

/// Delete a season and its episodes / 删除季
pub async fn delete_season(db: &SqlitePool, id: &str) -> CatalogResult<()> {
    let result = sqlx::query("DELETE FROM seasons WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound("Season".to_string()));
    }
    tracing::info!("Deleted season {}", id);
    Ok(())
}
