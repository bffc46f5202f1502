//! Request DTOs for the diagnostic API
//!
//! Defines the query strings accepted by the catalog endpoints.

use serde::Deserialize;

use crate::catalog::PhotoQuery;

/// Largest page a listing request may ask for
pub const MAX_PAGE_LIMIT: u32 = 100;

/// Query string shared by the lookup and single-photo endpoints
///
/// # Fields
/// - `force_fresh`: Skip the cache read and refetch from the catalog
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FreshParams {
    #[serde(default)]
    pub force_fresh: bool,
}

/// Query string for the listing endpoint (GET /photos)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PhotosParams {
    /// 1-based page number (default 1)
    pub page: Option<u32>,
    /// Page size (default from configuration)
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub photographer: Option<String>,
    pub location: Option<String>,
    pub search: Option<String>,
    #[serde(default)]
    pub force_fresh: bool,
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl PhotosParams {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.page == Some(0) {
            return Some("Page numbers start at 1".to_string());
        }
        match self.limit {
            Some(0) => Some("Limit must be at least 1".to_string()),
            Some(limit) if limit > MAX_PAGE_LIMIT => Some(format!(
                "Limit exceeds maximum of {}",
                MAX_PAGE_LIMIT
            )),
            _ => None,
        }
    }

    /// Builds the catalog query, dropping blank filters.
    pub fn to_query(&self, default_limit: u32) -> PhotoQuery {
        PhotoQuery {
            page: self.page.unwrap_or(1),
            limit: self.limit.unwrap_or(default_limit),
            category: non_empty(&self.category),
            photographer: non_empty(&self.photographer),
            location: non_empty(&self.location),
            search: non_empty(&self.search),
        }
    }
}
