//! HTTP query API, settings and logging for the survey insights service.
//!
//! The `survey-insights` binary wires these together; the pieces are exposed
//! here so the router can be exercised without a network listener.

pub mod api;
pub mod config;
pub mod logging;

use std::path::Path;

use insights_catalog::Catalog;
use insights_ingest::{UnpackReport, unpack_archives};

/// Extracts pending bundles under `data_dir`, then catalogs what is there.
///
/// Neither step fails; problems are logged and the affected bundle or
/// directory is left out.
pub fn prepare_catalog(data_dir: &Path) -> (UnpackReport, Catalog) {
    let report = unpack_archives(data_dir);
    let catalog = Catalog::discover(data_dir);
    tracing::info!(
        data_dir = %data_dir.display(),
        extracted = report.extracted.len(),
        failed = report.failed.len(),
        sources = catalog.len(),
        "Data directory ready"
    );
    (report, catalog)
}
