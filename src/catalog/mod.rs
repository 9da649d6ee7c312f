//! Subtitle catalog / 字幕目录
//!
//! CRUD over the show / season / episode hierarchy, subtitles and their
//! dialog lines, plus the paginated subtitle listing. Handlers in the binary
//! stay thin and call into here.

pub mod dialogs;
pub mod episodes;
pub mod seasons;
pub mod shows;
pub mod subtitles;

pub use dialogs::{
    create_dialog, delete_dialog, get_dialog, list_dialogs_for_subtitle, update_dialog,
};
pub use episodes::{
    create_episode, delete_episode, get_episode, list_episodes_for_season, list_episodes_for_show,
    update_episode,
};
pub use seasons::{
    create_season, delete_season, get_season, list_seasons, list_seasons_for_show, update_season,
};
pub use shows::{create_show, delete_show, get_show, get_show_detail, list_shows, update_show, ShowDetail};
pub use subtitles::{
    create_subtitle, delete_subtitle, get_subtitle, get_subtitle_detail, list_subtitles,
    list_subtitles_for_episode, update_subtitle, DetailOptions, DialogView, SortOrder, SubtitleDetail, SubtitleListQuery,
    SubtitlePage, SubtitleSort,
};

use sqlx::SqliteConnection;

use crate::error::{CatalogError, CatalogResult};
use crate::models::NewDialog;
use crate::timecode::parse_timecode;

/// Fail with `NotFound(entity)` unless `table` holds a row with this id.
///
/// Run it on the transaction that writes the referencing row, so the parent
/// cannot disappear between the check and the insert. `table` is always one
/// of our own table names, never user input.
pub(crate) async fn ensure_exists(
    conn: &mut SqliteConnection,
    table: &str,
    entity: &str,
    id: &str,
) -> CatalogResult<()> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE id = ?", table))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if count == 0 {
        return Err(CatalogError::NotFound(entity.to_string()));
    }
    Ok(())
}

/// Season or episode numbers start at 1
pub(crate) fn require_number(field: &str, value: i64) -> CatalogResult<i64> {
    if value < 1 {
        return Err(CatalogError::Validation(format!("{} must be at least 1", field)));
    }
    Ok(value)
}

/// Trimmed non-empty value, or a validation error naming the field
pub(crate) fn require_text(field: &str, value: &str) -> CatalogResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

/// Both timestamps parse and the dialog does not end before it starts
pub(crate) fn validate_timing(start_time: &str, end_time: &str) -> CatalogResult<()> {
    let start = parse_timecode(start_time)?;
    let end = parse_timecode(end_time)?;
    if end < start {
        return Err(CatalogError::Validation(format!(
            "endTime {} is before startTime {}",
            end_time, start_time
        )));
    }
    Ok(())
}

/// Validate a dialog payload / 校验对白数据
pub(crate) fn validate_dialog(dialog: &NewDialog) -> CatalogResult<()> {
    if dialog.text.trim().is_empty() {
        return Err(CatalogError::Validation("text must not be empty".to_string()));
    }
    validate_timing(&dialog.start_time, &dialog.end_time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_dialog() {
        let mut dialog = NewDialog {
            text: "Hi".to_string(),
            start_time: "00:00:01,000".to_string(),
            end_time: "00:00:02,000".to_string(),
            name: None,
        };
        assert!(validate_dialog(&dialog).is_ok());

        dialog.end_time = "00:00:00,500".to_string();
        assert!(matches!(validate_dialog(&dialog), Err(CatalogError::Validation(_))));

        dialog.end_time = "soon".to_string();
        assert!(validate_dialog(&dialog).is_err());

        dialog.end_time = "00:00:02".to_string();
        dialog.text = "   ".to_string();
        assert!(validate_dialog(&dialog).is_err());
    }

    #[test]
    fn test_require_text() {
        assert_eq!(require_text("filename", "  a.srt ").unwrap(), "a.srt");
        assert!(require_text("filename", "").is_err());
    }

    #[test]
    fn test_require_number() {
        assert_eq!(require_number("seasonNumber", 2).unwrap(), 2);
        assert!(matches!(require_number("episodeNumber", 0), Err(CatalogError::Validation(_))));
    }
}
