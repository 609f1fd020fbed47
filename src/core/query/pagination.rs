//! Page windows and pagination links

use crate::config::QueryConfig;
use serde::Serialize;

/// One page of results: `page` and `limit` plus the derived index range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageWindow {
    pub page: usize,
    pub limit: usize,
    pub start_index: usize,
    pub end_index: usize,
}

impl PageWindow {
    /// Create a window; `page` and `limit` are raised to at least 1
    pub fn new(page: usize, limit: usize) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        Self {
            page,
            limit,
            start_index: (page - 1).saturating_mul(limit),
            end_index: page.saturating_mul(limit),
        }
    }

    /// Parse raw `page`/`limit` values, falling back to the configured
    /// defaults for anything absent, non-numeric or below 1.
    pub fn from_params(page: Option<&str>, limit: Option<&str>, config: &QueryConfig) -> Self {
        let page = parse_positive(page).unwrap_or(config.default_page);
        let limit = parse_positive(limit).unwrap_or(config.default_limit);
        let limit = match config.max_limit {
            Some(max) => limit.min(max),
            None => limit,
        };
        Self::new(page, limit)
    }

    /// Number of documents to skip
    pub fn skip(&self) -> usize {
        self.start_index
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw?.trim().parse::<usize>().ok().filter(|n| *n >= 1)
}

/// A link to a neighbouring page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: usize,
    pub limit: usize,
}

/// `next`/`prev` links; absent links are omitted from JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PaginationResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl PaginationResult {
    /// `next` exists while the window ends before `total`,
    /// `prev` whenever the window does not start at 0.
    pub fn compute(window: &PageWindow, total: u64) -> Self {
        let total = usize::try_from(total).unwrap_or(usize::MAX);

        let next = (window.end_index < total).then_some(PageLink {
            page: window.page + 1,
            limit: window.limit,
        });
        let prev = (window.start_index > 0).then_some(PageLink {
            page: window.page - 1,
            limit: window.limit,
        });

        Self { next, prev }
    }
}
