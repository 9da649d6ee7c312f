use serde::{Deserialize, Serialize};

/// Show row / 节目
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub episode_count: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Season row / 季
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Season {
    pub id: String,
    pub show_id: String,
    pub title: String,
    pub season_number: i64,
    pub episode_count: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Episode row / 集
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: String,
    pub show_id: String,
    pub season_id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub episode_number: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Subtitle track row / 字幕记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subtitle {
    pub id: String,
    /// Catalog episode this track belongs to, if linked
    pub episode_id: Option<String>,
    pub show_name: String,
    pub season: i64,
    pub episode: i64,
    pub language: String,
    pub filler: bool,
    pub filename: String,
    pub release_group: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Subtitle row with its dialog count, used by the listing / 带对白数量的字幕
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SubtitleSummary {
    pub id: String,
    pub episode_id: Option<String>,
    pub show_name: String,
    pub season: i64,
    pub episode: i64,
    pub language: String,
    pub filler: bool,
    pub filename: String,
    pub release_group: Option<String>,
    pub dialog_count: i64,
}

/// Dialog line row / 对白记录
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Dialog {
    pub id: String,
    pub subtitle_id: String,
    pub position: i64,
    pub text: String,
    pub start_time: String,
    pub end_time: String,
    pub name: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDialog {
    pub text: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSubtitleRequest {
    pub filename: String,
    pub filler: bool,
    pub episode: i64,
    pub season: i64,
    pub show_name: String,
    pub language: String,
    #[serde(default)]
    pub release_group: Option<String>,
    #[serde(default)]
    pub episode_id: Option<String>,
    #[serde(default)]
    pub dialogs: Vec<NewDialog>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSubtitleRequest {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub filler: Option<bool>,
    #[serde(default)]
    pub episode: Option<i64>,
    #[serde(default)]
    pub season: Option<i64>,
    #[serde(default)]
    pub show_name: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub release_group: Option<String>,
    /// Blank unlinks the subtitle from its episode
    #[serde(default)]
    pub episode_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDialogRequest {
    pub subtitle_id: String,
    pub text: String,
    pub start_time: String,
    pub end_time: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDialogRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShowRequest {
    pub name: String,
    /// Derived from the name when absent
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub episode_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateShowRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub episode_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSeasonRequest {
    pub show_id: String,
    pub title: String,
    pub season_number: i64,
    #[serde(default)]
    pub episode_count: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSeasonRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub season_number: Option<i64>,
    #[serde(default)]
    pub episode_count: Option<i64>,
}

/// The show is taken from the season / 创建集（节目取自所属季）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEpisodeRequest {
    pub season_id: String,
    pub title: String,
    pub episode_number: i64,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEpisodeRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub episode_number: Option<i64>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}
