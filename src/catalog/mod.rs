// Catalog module: loading and validating the static alternatives data.

pub mod loader;

pub use loader::{parse_catalog, CatalogLoader, JsonCatalogLoader, StaticCatalogLoader};
