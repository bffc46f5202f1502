//! Catalog records and the cache keys and lifetimes they are stored under.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(60 * 60);
const DAY: Duration = Duration::from_secs(24 * 60 * 60);

// == Lookup Kind ==
/// Reference tables used as filter options in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookupKind {
    Categories,
    Photographers,
    Locations,
    Organisations,
    Gauges,
    Collections,
    Countries,
    Routes,
    CorporateBodies,
    Facilities,
    Builders,
}

impl LookupKind {
    pub const ALL: [LookupKind; 11] = [
        LookupKind::Categories,
        LookupKind::Photographers,
        LookupKind::Locations,
        LookupKind::Organisations,
        LookupKind::Gauges,
        LookupKind::Collections,
        LookupKind::Countries,
        LookupKind::Routes,
        LookupKind::CorporateBodies,
        LookupKind::Facilities,
        LookupKind::Builders,
    ];

    /// Cache key, also the resource name used in URLs.
    pub fn cache_key(self) -> &'static str {
        match self {
            LookupKind::Categories => "categories",
            LookupKind::Photographers => "photographers",
            LookupKind::Locations => "locations",
            LookupKind::Organisations => "organisations",
            LookupKind::Gauges => "gauges",
            LookupKind::Collections => "collections",
            LookupKind::Countries => "countries",
            LookupKind::Routes => "routes",
            LookupKind::CorporateBodies => "corporate_bodies",
            LookupKind::Facilities => "facilities",
            LookupKind::Builders => "builders",
        }
    }

    /// How long a fetched table may be served from cache.
    ///
    /// Tables that practically never change are kept for a week; the rest
    /// for half a day.
    pub fn ttl(self) -> Duration {
        match self {
            LookupKind::Countries | LookupKind::Builders | LookupKind::Gauges => DAY * 7,
            _ => HOUR * 12,
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.cache_key())
    }
}

impl FromStr for LookupKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LookupKind::ALL
            .into_iter()
            .find(|kind| kind.cache_key() == s)
            .ok_or_else(|| format!("Unknown lookup resource '{}'", s))
    }
}

// == Lookup Record ==
/// One row of a lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupRecord {
    pub id: u32,
    pub name: String,
}

impl LookupRecord {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

// == Photo ==
/// A photograph offered for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub photographer: String,
    pub location: String,
    /// Price in pence
    pub price: u32,
    pub image_url: String,
}

impl Photo {
    /// Cache key for this photo on its own.
    pub fn cache_key(id: u64) -> String {
        format!("photo_{}", id)
    }

    /// How long a single photo may be served from cache.
    pub fn ttl() -> Duration {
        MINUTE * 30
    }
}

// == Photo Page ==
/// One page of a photo listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoPage {
    pub items: Vec<Photo>,
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    /// Matches across all pages
    pub total: usize,
}

// == Photo Query ==
/// Listing request: pagination plus optional filters.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PhotoQuery {
    /// 1-based page number
    pub page: u32,
    pub limit: u32,
    pub category: Option<String>,
    pub photographer: Option<String>,
    pub location: Option<String>,
    /// Free text matched against titles
    pub search: Option<String>,
}

impl PhotoQuery {
    /// Unfiltered listing page.
    pub fn page(page: u32, limit: u32) -> Self {
        Self {
            page,
            limit,
            ..Self::default()
        }
    }

    /// Deterministic cache key: page and limit, then each filter that is set,
    /// in a fixed order.
    ///
    /// Filter values are ASCII case-folded and length-prefixed
    /// (`_category_5:steam`), so a value containing `_` can never read as
    /// another filter.
    pub fn cache_key(&self) -> String {
        let mut key = format!("photos_page_{}_limit_{}", self.page, self.limit);
        let filters = [
            ("category", &self.category),
            ("photographer", &self.photographer),
            ("location", &self.location),
            ("search", &self.search),
        ];
        for (name, value) in filters {
            if let Some(value) = value {
                let folded = value.to_ascii_lowercase();
                key.push_str(&format!("_{}_{}:{}", name, folded.len(), folded));
            }
        }
        key
    }

    /// How long a listing page may be served from cache.
    pub fn ttl() -> Duration {
        MINUTE * 15
    }
}

/// Keys reported by the status aggregator: every lookup table plus the
/// first unfiltered listing page.
pub fn known_cache_keys(page_size: u32) -> Vec<String> {
    LookupKind::ALL
        .iter()
        .map(|kind| kind.cache_key().to_string())
        .chain(std::iter::once(PhotoQuery::page(1, page_size).cache_key()))
        .collect()
}
