//! On-disk catalog cache with TTL invalidation.

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use clima_common::{ClimResult, Clock, SystemClock};

use crate::catalog::Catalog;
use crate::details::DatasetDetails;
use crate::source::CatalogSource;

/// Default cache artifact, relative to the working directory.
pub const DEFAULT_CACHE_FILE: &str = "dataset_cache.json";

/// Cached catalogs go stale after 30 days.
pub const CACHE_TTL_DAYS: i64 = 30;

/// Disk-backed catalog cache.
///
/// One JSON artifact holds the serialized catalog. Freshness is the file's
/// last-write time measured against the injected [`Clock`], not a field in
/// the payload; refreshing rewrites the whole file. Concurrent refreshes are
/// not mutually excluded: the last writer wins, which is harmless because
/// every writer persists a complete catalog.
pub struct CatalogCache<S, C = SystemClock> {
    source: S,
    path: PathBuf,
    clock: C,
}

impl<S: CatalogSource> CatalogCache<S> {
    /// Cache at [`DEFAULT_CACHE_FILE`] using the system clock.
    pub fn new(source: S) -> Self {
        Self {
            source,
            path: PathBuf::from(DEFAULT_CACHE_FILE),
            clock: SystemClock,
        }
    }
}

impl<S: CatalogSource, C: Clock> CatalogCache<S, C> {
    /// Use a different artifact location.
    pub fn with_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Substitute the freshness clock; tests age the cache this way instead
    /// of rewriting file timestamps.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> CatalogCache<S, C2> {
        CatalogCache {
            source: self.source,
            path: self.path,
            clock,
        }
    }

    /// Whether the cache artifact exists and is younger than the TTL.
    pub fn is_valid(&self) -> bool {
        let modified = match fs::metadata(&self.path).and_then(|m| m.modified()) {
            Ok(modified) => DateTime::<Utc>::from(modified),
            Err(_) => return false,
        };
        self.clock.now() - modified < Duration::days(CACHE_TTL_DAYS)
    }

    /// Return the catalog: from disk while the cache is valid, from the
    /// remote source otherwise. A remote fetch persists the fresh catalog
    /// before returning it, making the cache valid at age zero.
    pub async fn fetch(&self) -> ClimResult<Catalog> {
        if self.is_valid() {
            debug!(path = %self.path.display(), "Loading datasets from cache");
            let raw = fs::read_to_string(&self.path)?;
            let catalog: Catalog = serde_json::from_str(&raw)?;
            return Ok(catalog);
        }

        let catalog = self.source.collections().await?;
        fs::write(&self.path, serde_json::to_string(&catalog)?)?;
        info!(
            count = catalog.len(),
            path = %self.path.display(),
            "Refreshed catalog cache"
        );
        Ok(catalog)
    }

    /// Ids present in the live catalog but absent from the cached baseline,
    /// sorted.
    ///
    /// The baseline is gated on the validity state at entry: an invalid or
    /// absent cache yields an empty baseline, so every live id is reported
    /// as new. Downstream callers rely on "empty cache means everything is
    /// new", so the gate is kept rather than smoothed away.
    pub async fn diff_new(&self) -> ClimResult<Vec<String>> {
        let previous = if self.is_valid() {
            self.fetch().await?
        } else {
            Catalog::new()
        };
        let live = self.fetch().await?;

        let mut new_ids: Vec<String> = live
            .ids()
            .filter(|id| !previous.contains(id))
            .map(str::to_string)
            .collect();
        new_ids.sort_unstable();

        if new_ids.is_empty() {
            debug!("No new datasets found");
        } else {
            info!(count = new_ids.len(), "New datasets found");
        }
        Ok(new_ids)
    }

    /// Supplementary detail for one dataset.
    ///
    /// Detail rides on top of the catalog listing, so a failed lookup logs a
    /// warning and yields `None` instead of aborting the caller's flow.
    pub async fn details(&self, id: &str) -> Option<DatasetDetails> {
        match self.source.collection_details(id).await {
            Ok(details) => Some(details),
            Err(err) => {
                warn!(dataset = %id, error = %err, "No detail available for dataset");
                None
            }
        }
    }
}
