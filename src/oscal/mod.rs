//! OSCAL documents - catalog and profile models and their output

pub mod catalog;
pub mod metadata;
pub mod model;
pub mod profile;
pub mod writer;

pub use catalog::{Catalog, CatalogDocument};
pub use profile::{Profile, ProfileDocument, ProfileTemplate};
pub use writer::{Documents, OutputPaths};
