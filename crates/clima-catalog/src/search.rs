//! Keyword search over the in-memory catalog.

use crate::catalog::{Catalog, CatalogEntry};

/// Filter `catalog` to entries matching `keyword`.
///
/// A case-insensitive substring match against the id, title, or description
/// includes the entry; one hit is enough. The empty keyword matches every
/// entry. Absent title or description fields count as empty strings, never
/// as an error.
pub fn search(keyword: &str, catalog: &Catalog) -> Catalog {
    let needle = keyword.to_lowercase();
    catalog
        .iter()
        .filter(|(id, entry)| matches(id, entry, &needle))
        .map(|(id, entry)| (id.to_string(), entry.clone()))
        .collect()
}

fn matches(id: &str, entry: &CatalogEntry, needle: &str) -> bool {
    id.to_lowercase().contains(needle)
        || entry
            .title
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(needle)
        || entry
            .description
            .as_deref()
            .unwrap_or("")
            .to_lowercase()
            .contains(needle)
}
