//! One-off catalog loading.

use springtrip_core::{CatalogError, CatalogSource, WaypointCatalog};

/// Fetch every record from `source` and index the valid ones.
///
/// Records without a valid coordinate are skipped.
///
/// # Errors
///
/// Propagates the source's [`CatalogError`].
pub async fn load_catalog(source: &dyn CatalogSource) -> Result<WaypointCatalog, CatalogError> {
    let records = source.fetch_records().await?;
    let fetched = records.len();
    let catalog = WaypointCatalog::from_records(records);
    log::info!("loaded {} of {fetched} catalog records", catalog.len());
    Ok(catalog)
}
