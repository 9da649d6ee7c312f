use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use anyhow::Result;
use std::str::FromStr;
use uuid::Uuid;
use chrono::Utc;

use crate::models::NewDialog;
use crate::search::{index_text, index_words};

/// Open the main database pool / 打开主数据库连接池
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await?;

    // WAL keeps readers (search) from blocking on writers (CRUD)
    sqlx::query("PRAGMA journal_mode=WAL")
        .execute(&pool)
        .await?;

    sqlx::query("PRAGMA busy_timeout=5000")
        .execute(&pool)
        .await?;

    Ok(pool)
}

/// Single-connection in-memory database, migrated / 内存数据库
///
/// The connection is never recycled, otherwise the database would vanish.
pub async fn connect_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    run_migrations(&pool).await?;
    Ok(pool)
}

/// Run database migrations / 运行数据库迁移
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    // 节目 / 季 / 集
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS shows (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            slug TEXT NOT NULL UNIQUE,
            description TEXT,
            episode_count INTEGER,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS seasons (
            id TEXT PRIMARY KEY,
            show_id TEXT NOT NULL,
            title TEXT NOT NULL,
            season_number INTEGER NOT NULL,
            episode_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (show_id) REFERENCES shows(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS episodes (
            id TEXT PRIMARY KEY,
            show_id TEXT NOT NULL,
            season_id TEXT NOT NULL,
            title TEXT NOT NULL,
            slug TEXT NOT NULL,
            description TEXT,
            episode_number INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (show_id) REFERENCES shows(id) ON DELETE CASCADE,
            FOREIGN KEY (season_id) REFERENCES seasons(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    // 字幕 / 对白
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS subtitles (
            id TEXT PRIMARY KEY,
            episode_id TEXT,
            show_name TEXT NOT NULL,
            season INTEGER NOT NULL,
            episode INTEGER NOT NULL,
            language TEXT NOT NULL,
            filler INTEGER NOT NULL DEFAULT 0,
            filename TEXT NOT NULL,
            release_group TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (episode_id) REFERENCES episodes(id) ON DELETE SET NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS dialogs (
            id TEXT PRIMARY KEY,
            subtitle_id TEXT NOT NULL,
            position INTEGER NOT NULL,
            text TEXT NOT NULL,
            search_text TEXT NOT NULL,
            search_words TEXT NOT NULL,
            start_time TEXT NOT NULL,
            end_time TEXT NOT NULL,
            name TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY (subtitle_id) REFERENCES subtitles(id) ON DELETE CASCADE
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_dialogs_subtitle ON dialogs(subtitle_id, position)"
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_subtitles_listing ON subtitles(show_name, season, episode)"
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_subtitles_episode ON subtitles(episode_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_seasons_show ON seasons(show_id, season_number)")
        .execute(pool)
        .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_episodes_parent ON episodes(show_id, season_id, episode_number)"
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Insert a dialog at the end of its subtitle's order / 追加对白
///
/// Returns the new dialog id.
pub async fn append_dialog(
    tx: &mut Transaction<'_, Sqlite>,
    subtitle_id: &str,
    dialog: &NewDialog,
) -> std::result::Result<String, sqlx::Error> {
    let next_position: i64 = sqlx::query_scalar(
        "SELECT COALESCE(MAX(position) + 1, 0) FROM dialogs WHERE subtitle_id = ?"
    )
    .bind(subtitle_id)
    .fetch_one(&mut **tx)
    .await?;

    let id = Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    sqlx::query(
        "INSERT INTO dialogs (id, subtitle_id, position, text, search_text, search_words, start_time, end_time, name, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
    )
    .bind(&id)
    .bind(subtitle_id)
    .bind(next_position)
    .bind(&dialog.text)
    .bind(index_text(&dialog.text))
    .bind(index_words(&dialog.text))
    .bind(&dialog.start_time)
    .bind(&dialog.end_time)
    .bind(&dialog.name)
    .bind(&now)
    .bind(&now)
    .execute(&mut **tx)
    .await?;

    Ok(id)
}
