//! Metadata provider implementations

pub mod catalog;

pub use catalog::{Catalog, CatalogProvider};
