//! List query normalization.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Page/limit/search parameters for a collection listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self { page: DEFAULT_PAGE, limit: DEFAULT_LIMIT, search: None }
    }
}

impl PageQuery {
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self::default().with_page(page).with_limit(limit)
    }

    /// Build from untrusted query-string values.
    ///
    /// Absent, non-numeric, zero or negative values fall back to `page=1`,
    /// `limit=10`. `limit` is capped at [`MAX_LIMIT`]. Search is trimmed and
    /// dropped when blank.
    #[must_use]
    pub fn from_raw(page: Option<&str>, limit: Option<&str>, search: Option<&str>) -> Self {
        Self {
            page: parse_positive(page).unwrap_or(DEFAULT_PAGE),
            limit: parse_positive(limit).map_or(DEFAULT_LIMIT, |l| l.min(MAX_LIMIT)),
            search: search.map(str::trim).filter(|s| !s.is_empty()).map(str::to_owned),
        }
    }

    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = if page == 0 { DEFAULT_PAGE } else { page };
        self
    }

    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = if limit == 0 { DEFAULT_LIMIT } else { limit.min(MAX_LIMIT) };
        self
    }

    #[must_use]
    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.map(|s| s.trim().to_owned()).filter(|s| !s.is_empty());
        self
    }

    /// Query pairs in the order the backend documents them.
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![("page", self.page.to_string()), ("limit", self.limit.to_string())];
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse::<u32>().ok().filter(|v| *v > 0)
}
