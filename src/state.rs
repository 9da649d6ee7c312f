use sqlx::SqlitePool;
use subshelf_backend::config::AppConfig;
use subshelf_backend::search::SqliteDialogStore;

/// Shared application state / 应用共享状态
pub struct AppState {
    pub db: SqlitePool,
    pub config: AppConfig,
    pub dialog_store: SqliteDialogStore,
}

impl AppState {
    pub fn new(db: SqlitePool, config: AppConfig) -> Self {
        Self {
            dialog_store: SqliteDialogStore::new(db.clone()),
            db,
            config,
        }
    }
}
