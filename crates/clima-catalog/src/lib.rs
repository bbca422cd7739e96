//! Dataset catalog discovery with on-disk caching.
//!
//! The remote catalogue serves an index of available climate datasets. This
//! crate fetches that index through a swappable [`CatalogSource`], persists
//! it to a single JSON artifact with a 30-day TTL, diffs cached against live
//! state to spot newly published datasets, and filters the in-memory catalog
//! by keyword.
//!
//! # Example
//!
//! ```ignore
//! use clima_catalog::{search, CatalogCache, HttpCatalogSource};
//!
//! let cache = CatalogCache::new(HttpCatalogSource::new());
//! let catalog = cache.fetch().await?;
//! let reanalysis = search("reanalysis", &catalog);
//! let new_ids = cache.diff_new().await?;
//! ```

pub mod cache;
pub mod catalog;
pub mod details;
pub mod search;
pub mod source;

pub use cache::{CatalogCache, CACHE_TTL_DAYS, DEFAULT_CACHE_FILE};
pub use catalog::{Catalog, CatalogEntry};
pub use details::{DatasetDetails, Extent, SpatialExtent, TemporalExtent, VariableDetail};
pub use search::search;
pub use source::{CatalogSource, HttpCatalogSource, DEFAULT_CATALOG_URL};
