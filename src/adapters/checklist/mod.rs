//! Checklist catalog loading.

mod csv_loader;

pub use csv_loader::load_catalog_from_csv;
