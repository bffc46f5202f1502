//! In-memory catalog seeded with demo data.
//!
//! Stands in for the hosted backend in the demo server and in tests. Built
//! once at startup and shared by `Arc`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{LookupKind, LookupRecord, Photo, PhotoPage, PhotoQuery, RemoteCatalog};
use crate::error::RemoteError;

// == Sample Catalog ==
#[derive(Debug)]
pub struct SampleCatalog {
    lookups: RwLock<HashMap<LookupKind, Vec<LookupRecord>>>,
    photos: RwLock<Vec<Photo>>,
    /// Remote calls served so far
    calls: AtomicUsize,
    /// Simulates the backend being unreachable
    offline: AtomicBool,
}

impl Default for SampleCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleCatalog {
    /// Creates a catalog holding the demo lookups and photos.
    pub fn new() -> Self {
        Self::with_data(demo_lookups(), demo_photos())
    }

    /// Creates a catalog with the given contents.
    pub fn with_data(
        lookups: HashMap<LookupKind, Vec<LookupRecord>>,
        photos: Vec<Photo>,
    ) -> Self {
        Self {
            lookups: RwLock::new(lookups),
            photos: RwLock::new(photos),
            calls: AtomicUsize::new(0),
            offline: AtomicBool::new(false),
        }
    }

    /// Number of fetches served, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Makes every subsequent fetch fail with a network error until cleared.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Inserts or replaces a photo, as an admin edit would.
    pub async fn upsert_photo(&self, photo: Photo) {
        let mut photos = self.photos.write().await;
        match photos.iter_mut().find(|p| p.id == photo.id) {
            Some(existing) => *existing = photo,
            None => photos.push(photo),
        }
    }

    /// Replaces a lookup table.
    pub async fn set_lookup(&self, kind: LookupKind, records: Vec<LookupRecord>) {
        self.lookups.write().await.insert(kind, records);
    }

    fn begin_call(&self) -> Result<(), RemoteError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RemoteError::Network("catalog backend unreachable".into()));
        }
        Ok(())
    }
}

fn matches(filter: &Option<String>, value: &str) -> bool {
    filter
        .as_deref()
        .map_or(true, |f| f.eq_ignore_ascii_case(value))
}

#[async_trait]
impl RemoteCatalog for SampleCatalog {
    async fn fetch_lookup(&self, kind: LookupKind) -> Result<Vec<LookupRecord>, RemoteError> {
        self.begin_call()?;
        debug!("Remote fetch of lookup '{}'", kind);
        Ok(self
            .lookups
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }

    async fn fetch_photos(&self, query: &PhotoQuery) -> Result<PhotoPage, RemoteError> {
        self.begin_call()?;
        debug!("Remote fetch of photos {:?}", query);

        if query.page == 0 || query.limit == 0 {
            return Err(RemoteError::Server(format!(
                "invalid range: page {} limit {}",
                query.page, query.limit
            )));
        }

        let search = query.search.as_deref().map(str::to_ascii_lowercase);
        let photos = self.photos.read().await;
        let matching: Vec<&Photo> = photos
            .iter()
            .filter(|p| matches(&query.category, &p.category))
            .filter(|p| matches(&query.photographer, &p.photographer))
            .filter(|p| matches(&query.location, &p.location))
            .filter(|p| {
                search
                    .as_deref()
                    .map_or(true, |s| p.title.to_ascii_lowercase().contains(s))
            })
            .collect();

        let start = (query.page as usize - 1) * query.limit as usize;
        let items = matching
            .iter()
            .skip(start)
            .take(query.limit as usize)
            .map(|p| (*p).clone())
            .collect();

        Ok(PhotoPage {
            items,
            page: query.page,
            limit: query.limit,
            total: matching.len(),
        })
    }

    async fn fetch_photo(&self, id: u64) -> Result<Photo, RemoteError> {
        self.begin_call()?;
        debug!("Remote fetch of photo {}", id);
        self.photos
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| RemoteError::NotFound(format!("photo {}", id)))
    }
}

// == Demo Data ==
fn records(names: &[&str]) -> Vec<LookupRecord> {
    names
        .iter()
        .enumerate()
        .map(|(i, name)| LookupRecord::new(i as u32 + 1, *name))
        .collect()
}

fn demo_lookups() -> HashMap<LookupKind, Vec<LookupRecord>> {
    HashMap::from([
        (LookupKind::Categories, records(&["Steam", "Diesel", "Electric", "Modern"])),
        (
            LookupKind::Photographers,
            records(&["A. Hughes", "M. Patel", "R. Okafor"]),
        ),
        (
            LookupKind::Locations,
            records(&["York", "Crewe", "Settle", "Ribblehead"]),
        ),
        (
            LookupKind::Organisations,
            records(&["LNER", "LMS", "British Rail"]),
        ),
        (
            LookupKind::Gauges,
            records(&["Standard", "Narrow", "Broad"]),
        ),
        (
            LookupKind::Collections,
            records(&["Heritage Lines", "Night Freight"]),
        ),
        (
            LookupKind::Countries,
            records(&["United Kingdom", "France", "Switzerland"]),
        ),
        (
            LookupKind::Routes,
            records(&["East Coast Main Line", "Settle-Carlisle"]),
        ),
        (
            LookupKind::CorporateBodies,
            records(&["Network Rail", "Railway Heritage Trust"]),
        ),
        (
            LookupKind::Facilities,
            records(&["Engine Shed", "Turntable", "Signal Box"]),
        ),
        (
            LookupKind::Builders,
            records(&["Crewe Works", "Doncaster Works", "Swindon Works"]),
        ),
    ])
}

fn photo(
    id: u64,
    title: &str,
    category: &str,
    photographer: &str,
    location: &str,
    price: u32,
) -> Photo {
    Photo {
        id,
        title: title.to_string(),
        category: category.to_string(),
        photographer: photographer.to_string(),
        location: location.to_string(),
        price,
        image_url: format!("https://images.example.com/photos/{}.jpg", id),
    }
}

fn demo_photos() -> Vec<Photo> {
    vec![
        photo(1, "Flying Scotsman at York", "Steam", "A. Hughes", "York", 1500),
        photo(2, "Mallard on shed", "Steam", "M. Patel", "York", 1800),
        photo(3, "Class 37 in the rain", "Diesel", "R. Okafor", "Crewe", 1200),
        photo(4, "Azuma crossing the viaduct", "Modern", "A. Hughes", "Ribblehead", 2000),
        photo(5, "Black Five on the climb", "Steam", "R. Okafor", "Settle", 1500),
        photo(6, "Class 91 at speed", "Electric", "M. Patel", "York", 1300),
        photo(7, "Deltic at dusk", "Diesel", "A. Hughes", "Crewe", 1700),
        photo(8, "Tornado over Ribblehead", "Steam", "M. Patel", "Ribblehead", 2200),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_lookup_is_seeded() {
        let catalog = SampleCatalog::new();
        for kind in LookupKind::ALL {
            assert!(!catalog.fetch_lookup(kind).await.unwrap().is_empty(), "{kind}");
        }
        assert_eq!(catalog.calls(), LookupKind::ALL.len());
    }

    #[tokio::test]
    async fn test_fetch_photos_paginates() {
        let catalog = SampleCatalog::new();

        let first = catalog.fetch_photos(&PhotoQuery::page(1, 3)).await.unwrap();
        let third = catalog.fetch_photos(&PhotoQuery::page(3, 3)).await.unwrap();

        assert_eq!(first.items.len(), 3);
        assert_eq!(first.total, 8);
        assert_eq!(third.items.len(), 2);
        assert_eq!(third.items[0].id, 7);
    }

    #[tokio::test]
    async fn test_fetch_photos_filters() {
        let catalog = SampleCatalog::new();
        let query = PhotoQuery {
            category: Some("steam".into()),
            location: Some("York".into()),
            ..PhotoQuery::page(1, 10)
        };

        let page = catalog.fetch_photos(&query).await.unwrap();
        let ids: Vec<u64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_photos_search() {
        let catalog = SampleCatalog::new();
        let query = PhotoQuery {
            search: Some("RIBBLEHEAD".into()),
            ..PhotoQuery::page(1, 10)
        };

        let page = catalog.fetch_photos(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, 8);
    }

    #[tokio::test]
    async fn test_fetch_photos_rejects_page_zero() {
        let catalog = SampleCatalog::new();
        let result = catalog.fetch_photos(&PhotoQuery::page(0, 10)).await;
        assert!(matches!(result, Err(RemoteError::Server(_))));
    }

    #[tokio::test]
    async fn test_fetch_photo_not_found() {
        let catalog = SampleCatalog::new();
        let result = catalog.fetch_photo(999).await;
        assert!(matches!(result, Err(RemoteError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_offline_fails_with_network_error() {
        let catalog = SampleCatalog::new();
        catalog.set_offline(true);

        let result = catalog.fetch_lookup(LookupKind::Categories).await;
        assert!(matches!(result, Err(RemoteError::Network(_))));

        catalog.set_offline(false);
        assert!(catalog.fetch_lookup(LookupKind::Categories).await.is_ok());
    }

    #[tokio::test]
    async fn test_upsert_photo_replaces() {
        let catalog = SampleCatalog::new();
        let mut edited = catalog.fetch_photo(3).await.unwrap();
        edited.price = 999;

        catalog.upsert_photo(edited).await;
        assert_eq!(catalog.fetch_photo(3).await.unwrap().price, 999);
    }
}
