//! Dialog lines / 对白管理

use chrono::Utc;
use sqlx::SqlitePool;

use super::subtitles::get_subtitle;
use super::{ensure_exists, require_text, validate_dialog, validate_timing};
use crate::db::append_dialog;
use crate::error::{CatalogError, CatalogResult};
use crate::models::{CreateDialogRequest, Dialog, NewDialog, UpdateDialogRequest};
use crate::search::{index_text, index_words};
use crate::utils::non_blank;

pub(crate) const DIALOG_COLUMNS: &str =
    "id, subtitle_id, position, text, start_time, end_time, name, created_at, updated_at";

/// Append a dialog to an existing subtitle / 创建对白
pub async fn create_dialog(db: &SqlitePool, req: CreateDialogRequest) -> CatalogResult<Dialog> {
    let dialog = NewDialog {
        text: req.text,
        start_time: req.start_time.trim().to_string(),
        end_time: req.end_time.trim().to_string(),
        name: non_blank(req.name.as_deref()).map(str::to_string),
    };
    validate_dialog(&dialog)?;

    let mut tx = db.begin().await?;
    ensure_exists(&mut *tx, "subtitles", "Subtitle", &req.subtitle_id).await?;
    let id = append_dialog(&mut tx, &req.subtitle_id, &dialog).await?;
    tx.commit().await?;

    get_dialog(db, &id).await
}

pub async fn get_dialog(db: &SqlitePool, id: &str) -> CatalogResult<Dialog> {
    sqlx::query_as::<_, Dialog>(&format!("SELECT {} FROM dialogs WHERE id = ?", DIALOG_COLUMNS))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| CatalogError::NotFound("Dialog".to_string()))
}

/// Dialogs of one subtitle in display order / 获取字幕的所有对白
pub async fn list_dialogs_for_subtitle(db: &SqlitePool, subtitle_id: &str) -> CatalogResult<Vec<Dialog>> {
    get_subtitle(db, subtitle_id).await?;

    let dialogs = sqlx::query_as::<_, Dialog>(&format!(
        "SELECT {} FROM dialogs WHERE subtitle_id = ? ORDER BY position",
        DIALOG_COLUMNS
    ))
    .bind(subtitle_id)
    .fetch_all(db)
    .await?;

    Ok(dialogs)
}

/// Update a dialog; the search columns follow the text / 更新对白
pub async fn update_dialog(db: &SqlitePool, id: &str, req: UpdateDialogRequest) -> CatalogResult<Dialog> {
    let current = get_dialog(db, id).await?;

    let text = match req.text {
        Some(v) => {
            require_text("text", &v)?;
            v
        }
        None => current.text,
    };
    let start_time = req.start_time.map(|v| v.trim().to_string()).unwrap_or(current.start_time);
    let end_time = req.end_time.map(|v| v.trim().to_string()).unwrap_or(current.end_time);
    validate_timing(&start_time, &end_time)?;
    let name = match req.name {
        Some(v) => non_blank(Some(&v)).map(str::to_string),
        None => current.name,
    };

    sqlx::query(
        "UPDATE dialogs SET text = ?, search_text = ?, search_words = ?, start_time = ?, end_time = ?,
         name = ?, updated_at = ? WHERE id = ?"
    )
    .bind(&text)
    .bind(index_text(&text))
    .bind(index_words(&text))
    .bind(&start_time)
    .bind(&end_time)
    .bind(&name)
    .bind(Utc::now().to_rfc3339())
    .bind(id)
    .execute(db)
    .await?;

    get_dialog(db, id).await
}

/// Delete a dialog / 删除对白
pub async fn delete_dialog(db: &SqlitePool, id: &str) -> CatalogResult<()> {
    let result = sqlx::query("DELETE FROM dialogs WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::NotFound("Dialog".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::create_subtitle;
    use crate::db::connect_in_memory;
    use crate::models::CreateSubtitleRequest;
    use crate::search::{search_dialogs, MatchMode, SearchParams, SqliteDialogStore};
    use crate::pagination::PageRequest;

    async fn subtitle(db: &SqlitePool) -> String {
        create_subtitle(
            db,
            CreateSubtitleRequest {
                filename: "ep1.srt".to_string(),
                filler: false,
                episode: 1,
                season: 1,
                show_name: "Show".to_string(),
                language: "en".to_string(),
                release_group: None,
                episode_id: None,
                dialogs: vec![],
            },
        )
        .await
        .unwrap()
        .subtitle
        .id
    }

    fn create(subtitle_id: &str, text: &str) -> CreateDialogRequest {
        CreateDialogRequest {
            subtitle_id: subtitle_id.to_string(),
            text: text.to_string(),
            start_time: "00:00:01,000".to_string(),
            end_time: "00:00:02,000".to_string(),
            name: None,
        }
    }

    #[tokio::test]
    async fn test_create_appends_in_order() {
        let db = connect_in_memory().await.unwrap();
        let sid = subtitle(&db).await;

        create_dialog(&db, create(&sid, "first")).await.unwrap();
        let second = create_dialog(&db, create(&sid, "second")).await.unwrap();
        assert_eq!(second.position, 1);

        let texts: Vec<String> = list_dialogs_for_subtitle(&db, &sid)
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.text)
            .collect();
        assert_eq!(texts, vec!["first", "second"]);
    }

    #[tokio::test]
    async fn test_create_validation() {
        let db = connect_in_memory().await.unwrap();
        let sid = subtitle(&db).await;

        let err = create_dialog(&db, create("missing", "hi")).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));

        let err = create_dialog(&db, create(&sid, "  ")).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));

        let mut bad = create(&sid, "hi");
        bad.start_time = "1 minute".to_string();
        assert!(matches!(create_dialog(&db, bad).await, Err(CatalogError::Validation(_))));

        assert!(matches!(
            list_dialogs_for_subtitle(&db, "missing").await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_for_deleted_subtitle() {
        let db = connect_in_memory().await.unwrap();
        let sid = subtitle(&db).await;
        create_dialog(&db, create(&sid, "before")).await.unwrap();
        crate::catalog::delete_subtitle(&db, &sid).await.unwrap();

        let err = create_dialog(&db, create(&sid, "after")).await.unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(ref what) if what == "Subtitle"));

        let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dialogs")
            .fetch_one(&db)
            .await
            .unwrap();
        assert_eq!(rows, 0);
    }

    #[tokio::test]
    async fn test_update_reindexes_text() {
        let db = connect_in_memory().await.unwrap();
        let sid = subtitle(&db).await;
        let dialog = create_dialog(&db, create(&sid, "old words")).await.unwrap();

        let updated = update_dialog(
            &db,
            &dialog.id,
            UpdateDialogRequest {
                text: Some("{i1}Brand new{i0} line".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.start_time, "00:00:01,000");

        let store = SqliteDialogStore::new(db.clone());
        let params = SearchParams {
            query: "brand".to_string(),
            page: PageRequest { page: 1, limit: 10 },
            match_mode: MatchMode::Exact,
        };
        let page = search_dialogs(&store, &params, "/s").await.unwrap();
        assert_eq!(page.metadata.total_results, 1);

        let params = SearchParams { query: "old".to_string(), ..params };
        let page = search_dialogs(&store, &params, "/s").await.unwrap();
        assert_eq!(page.metadata.total_results, 0);

        let err = update_dialog(
            &db,
            &dialog.id,
            UpdateDialogRequest {
                end_time: Some("00:00:00,100".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CatalogError::Validation(_)));
    }

    #[tokio::test]
    async fn test_delete_dialog() {
        let db = connect_in_memory().await.unwrap();
        let sid = subtitle(&db).await;
        let dialog = create_dialog(&db, create(&sid, "bye")).await.unwrap();

        delete_dialog(&db, &dialog.id).await.unwrap();
        assert!(matches!(get_dialog(&db, &dialog.id).await, Err(CatalogError::NotFound(_))));
        assert!(matches!(delete_dialog(&db, &dialog.id).await, Err(CatalogError::NotFound(_))));
    }
}
