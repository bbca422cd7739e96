//! Behavioral tests for the catalog cache lifecycle.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use tempfile::TempDir;

use clima_catalog::{Catalog, CatalogCache, CatalogEntry, CatalogSource, DatasetDetails};
use clima_common::{ClimError, ClimResult, Clock};

/// Clock that only moves when a test advances it. Starts at the real current
/// time so ages computed against real file mtimes are meaningful.
#[derive(Clone)]
struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    fn start_now() -> Self {
        Self(Arc::new(Mutex::new(Utc::now())))
    }

    fn advance(&self, duration: Duration) {
        *self.0.lock().unwrap() += duration;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// In-memory source that counts remote invocations. Clones share state so a
/// test can inspect call counts after handing the source to a cache.
#[derive(Clone)]
struct StaticSource {
    catalog: Arc<Mutex<Catalog>>,
    calls: Arc<AtomicUsize>,
}

impl StaticSource {
    fn new(catalog: Catalog) -> Self {
        Self {
            catalog: Arc::new(Mutex::new(catalog)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn set_catalog(&self, catalog: Catalog) {
        *self.catalog.lock().unwrap() = catalog;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogSource for StaticSource {
    async fn collections(&self) -> ClimResult<Catalog> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn collection_details(&self, _id: &str) -> ClimResult<DatasetDetails> {
        Err(ClimError::RemoteUnavailable { status: 404 })
    }
}

/// Source whose every request fails with the given status.
struct FailingSource(u16);

#[async_trait]
impl CatalogSource for FailingSource {
    async fn collections(&self) -> ClimResult<Catalog> {
        Err(ClimError::RemoteUnavailable { status: self.0 })
    }

    async fn collection_details(&self, _id: &str) -> ClimResult<DatasetDetails> {
        Err(ClimError::RemoteUnavailable { status: self.0 })
    }
}

/// Source with working detail lookups.
struct DetailSource;

#[async_trait]
impl CatalogSource for DetailSource {
    async fn collections(&self) -> ClimResult<Catalog> {
        Ok(Catalog::new())
    }

    async fn collection_details(&self, _id: &str) -> ClimResult<DatasetDetails> {
        Ok(DatasetDetails {
            keywords: vec!["reanalysis".to_string()],
            ..Default::default()
        })
    }
}

fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new();
    catalog.insert(
        "reanalysis-era5-single-levels",
        CatalogEntry::new().with_title("ERA5 hourly data"),
    );
    catalog.insert(
        "projections-cmip6",
        CatalogEntry::new().with_title("CMIP6 climate projections"),
    );
    catalog
}

fn cache_path(dir: &TempDir) -> PathBuf {
    dir.path().join("dataset_cache.json")
}

#[tokio::test]
async fn test_fetch_within_ttl_skips_the_remote() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(sample_catalog());
    let cache = CatalogCache::new(source.clone())
        .with_cache_path(cache_path(&dir))
        .with_clock(ManualClock::start_now());

    let first = cache.fetch().await.unwrap();
    assert_eq!(source.calls(), 1);

    let second = cache.fetch().await.unwrap();
    assert_eq!(source.calls(), 1, "second fetch must not hit the remote");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_cache_lifecycle_from_absent_to_expired() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(sample_catalog());
    let clock = ManualClock::start_now();
    let cache = CatalogCache::new(source.clone())
        .with_cache_path(cache_path(&dir))
        .with_clock(clock.clone());

    assert!(!cache.is_valid(), "absent artifact must be invalid");

    cache.fetch().await.unwrap();
    assert_eq!(source.calls(), 1);
    assert!(cache.is_valid(), "freshly persisted artifact must be valid");

    clock.advance(Duration::days(29));
    assert!(cache.is_valid(), "still within the 30-day window");

    clock.advance(Duration::days(2));
    assert!(!cache.is_valid(), "31 days is past the TTL");
}

#[tokio::test]
async fn test_expired_cache_refetches_from_remote() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(sample_catalog());
    let clock = ManualClock::start_now();
    let cache = CatalogCache::new(source.clone())
        .with_cache_path(cache_path(&dir))
        .with_clock(clock.clone());

    cache.fetch().await.unwrap();
    clock.advance(Duration::days(31));
    cache.fetch().await.unwrap();

    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_fetch_persists_the_catalog_mapping() {
    let dir = TempDir::new().unwrap();
    let path = cache_path(&dir);
    let source = StaticSource::new(sample_catalog());
    let cache = CatalogCache::new(source)
        .with_cache_path(path.clone())
        .with_clock(ManualClock::start_now());

    cache.fetch().await.unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(
        json["reanalysis-era5-single-levels"]["title"],
        "ERA5 hourly data"
    );
}

#[tokio::test]
async fn test_corrupt_artifact_surfaces_as_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = cache_path(&dir);
    std::fs::write(&path, "{not json").unwrap();

    let cache = CatalogCache::new(StaticSource::new(sample_catalog()))
        .with_cache_path(path)
        .with_clock(ManualClock::start_now());

    let err = cache.fetch().await.unwrap_err();
    assert!(matches!(err, ClimError::ParseError(_)));
}

#[tokio::test]
async fn test_diff_new_on_empty_cache_reports_every_live_id() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(sample_catalog());
    let cache = CatalogCache::new(source.clone())
        .with_cache_path(cache_path(&dir))
        .with_clock(ManualClock::start_now());

    let new_ids = cache.diff_new().await.unwrap();

    assert_eq!(
        new_ids,
        vec![
            "projections-cmip6".to_string(),
            "reanalysis-era5-single-levels".to_string(),
        ]
    );
    assert_eq!(source.calls(), 1, "empty baseline must not fetch twice");
}

#[tokio::test]
async fn test_diff_new_on_fresh_cache_is_empty() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(sample_catalog());
    let cache = CatalogCache::new(source.clone())
        .with_cache_path(cache_path(&dir))
        .with_clock(ManualClock::start_now());

    cache.fetch().await.unwrap();
    let new_ids = cache.diff_new().await.unwrap();

    assert!(new_ids.is_empty());
    assert_eq!(source.calls(), 1, "valid cache serves both diff sides");
}

#[tokio::test]
async fn test_stale_cache_treats_every_dataset_as_new() {
    let dir = TempDir::new().unwrap();
    let source = StaticSource::new(sample_catalog());
    let clock = ManualClock::start_now();
    let cache = CatalogCache::new(source.clone())
        .with_cache_path(cache_path(&dir))
        .with_clock(clock.clone());

    cache.fetch().await.unwrap();

    let mut grown = sample_catalog();
    grown.insert(
        "satellite-sea-ice-thickness",
        CatalogEntry::new().with_title("Sea ice thickness"),
    );
    source.set_catalog(grown);
    clock.advance(Duration::days(31));

    // The stale baseline is empty, so previously known ids reappear as new
    // alongside the genuinely new one.
    let new_ids = cache.diff_new().await.unwrap();
    assert_eq!(new_ids.len(), 3);
    assert!(new_ids.contains(&"satellite-sea-ice-thickness".to_string()));
    assert!(new_ids.contains(&"reanalysis-era5-single-levels".to_string()));
}

#[tokio::test]
async fn test_remote_failure_propagates_with_status() {
    let dir = TempDir::new().unwrap();
    let cache = CatalogCache::new(FailingSource(503))
        .with_cache_path(cache_path(&dir))
        .with_clock(ManualClock::start_now());

    let err = cache.fetch().await.unwrap_err();
    match err {
        ClimError::RemoteUnavailable { status } => assert_eq!(status, 503),
        other => panic!("expected RemoteUnavailable, got {:?}", other),
    }
}

#[tokio::test]
async fn test_detail_lookup_degrades_to_none() {
    let dir = TempDir::new().unwrap();
    let cache = CatalogCache::new(StaticSource::new(sample_catalog()))
        .with_cache_path(cache_path(&dir))
        .with_clock(ManualClock::start_now());

    assert!(cache.details("reanalysis-era5-single-levels").await.is_none());
}

#[tokio::test]
async fn test_detail_lookup_returns_details_when_available() {
    let dir = TempDir::new().unwrap();
    let cache = CatalogCache::new(DetailSource)
        .with_cache_path(cache_path(&dir))
        .with_clock(ManualClock::start_now());

    let details = cache.details("reanalysis-era5-single-levels").await.unwrap();
    assert_eq!(details.keywords, vec!["reanalysis"]);
}
