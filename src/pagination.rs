//! Page requests and page metadata / 分页
//!
//! Shared by dialog search and the subtitle listing. Pages are 1-indexed and
//! every page link repeats the request's own query parameters.

use serde::Serialize;

use crate::error::{CatalogError, CatalogResult};
use crate::utils::build_query_string;

/// Validated page request / 分页请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Validate raw page/limit values. Non-positive values and limits above
    /// `max_limit` are rejected, never clamped.
    pub fn new(page: i64, limit: i64, max_limit: u32) -> CatalogResult<Self> {
        if page < 1 {
            return Err(CatalogError::InvalidPagination(format!(
                "page must be a positive integer, got {}",
                page
            )));
        }
        if limit < 1 {
            return Err(CatalogError::InvalidPagination(format!(
                "limit must be a positive integer, got {}",
                limit
            )));
        }
        if limit > i64::from(max_limit) {
            return Err(CatalogError::InvalidPagination(format!(
                "limit must not exceed {}, got {}",
                max_limit, limit
            )));
        }
        let page = u32::try_from(page).map_err(|_| {
            CatalogError::InvalidPagination(format!("page {} is out of range", page))
        })?;
        Ok(Self { page, limit: limit as u32 })
    }

    /// Validate page/limit as received in a query string. Absent values take
    /// the defaults (page 1, `default_limit`); non-numeric ones are rejected.
    pub fn from_query(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
        max_limit: u32,
    ) -> CatalogResult<Self> {
        let parse = |name: &str, raw: Option<&str>, default: i64| -> CatalogResult<i64> {
            match raw.map(str::trim) {
                None | Some("") => Ok(default),
                Some(value) => value.parse::<i64>().map_err(|_| {
                    CatalogError::InvalidPagination(format!(
                        "{} must be a positive integer, got {:?}",
                        name, value
                    ))
                }),
            }
        };
        let page = parse("page", page, 1)?;
        let limit = parse("limit", limit, i64::from(default_limit))?;
        Self::new(page, limit, max_limit)
    }

    /// Number of items skipped before this page / 偏移量
    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }
}

/// Page navigation metadata / 分页元数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    pub total_results: u64,
    pub current_page: u32,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<String>,
    pub prev_page: Option<String>,
}

impl PageMetadata {
    /// Build metadata and page links.
    ///
    /// `params` are the query parameters to repeat in every link, without
    /// `page` and `limit`, which are appended here.
    pub fn new(total_results: u64, request: PageRequest, base_path: &str, params: &[(&str, String)]) -> Self {
        let total_pages = if total_results == 0 {
            0
        } else {
            total_results.div_ceil(u64::from(request.limit))
        };
        let has_next_page = u64::from(request.page) < total_pages;
        let has_prev_page = request.page > 1;

        let link = |page: u32| {
            let mut pairs: Vec<(&str, String)> = params.to_vec();
            pairs.push(("page", page.to_string()));
            pairs.push(("limit", request.limit.to_string()));
            format!("{}?{}", base_path, build_query_string(&pairs))
        };

        Self {
            total_results,
            current_page: request.page,
            total_pages,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then(|| link(request.page + 1)),
            prev_page: has_prev_page.then(|| link(request.page - 1)),
        }
    }
}
