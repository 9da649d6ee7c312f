//! Catalog error taxonomy / 目录错误类型

use thiserror::Error;

/// Errors surfaced by the catalog, search and timecode modules.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Missing or blank search term / 搜索关键词为空
    #[error("query parameter is required and must not be empty")]
    InvalidQuery,

    /// Non-positive page/limit, or limit over the configured maximum / 分页参数无效
    #[error("invalid pagination: {0}")]
    InvalidPagination(String),

    /// Request payload failed validation / 请求数据无效
    #[error("{0}")]
    Validation(String),

    #[error("{0} not found")]
    NotFound(String),

    /// Backing store call failed; detail is logged, never sent to clients
    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
