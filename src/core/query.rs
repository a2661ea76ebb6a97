use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::validation::{Params, ValidationErrors};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;

/// Validated page request over one resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery<F> {
    pub page: u32,
    pub limit: u32,
    pub search: Option<String>,
    /// Narrows the result to one record while keeping the page shape
    pub id: Option<i64>,
    pub filter: F,
}

impl<F> ResourceQuery<F> {
    /// Validate raw query parameters.
    ///
    /// `parse_filter` reads the resource-specific filters from the same
    /// reader so all field errors are reported together.
    pub fn from_params(
        raw: &HashMap<String, String>,
        parse_filter: impl FnOnce(&mut Params<'_>) -> F,
    ) -> Result<Self, ValidationErrors> {
        let mut params = Params::new(raw);

        let page = params.positive_int("page", DEFAULT_PAGE, None);
        let limit = params.positive_int("limit", DEFAULT_LIMIT, Some(MAX_LIMIT));
        let search = params.text("search");
        let id = params.id("id");
        let filter = parse_filter(&mut params);

        params.finish()?;

        Ok(Self {
            page,
            limit,
            search,
            id,
            filter,
        })
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// LIKE pattern for the search term, if any
    pub fn search_pattern(&self) -> Option<String> {
        self.search.as_deref().map(like_pattern)
    }
}

impl<F: Default> ResourceQuery<F> {
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            search: None,
            id: None,
            filter: F::default(),
        }
    }
}

/// Paginated read result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourcePage<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
}

impl<T> ResourcePage<T> {
    pub fn new<F>(data: Vec<T>, total: u64, query: &ResourceQuery<F>) -> Self {
        Self {
            data,
            total,
            page: query.page,
            limit: query.limit,
        }
    }
}

/// Case-insensitive substring pattern with LIKE wildcards escaped
pub fn like_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for ch in search.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
