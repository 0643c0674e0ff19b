//! Core module - rows, tiers, and the catalog tree

pub mod builder;
pub mod config;
pub mod error;
pub mod row;
pub mod tier;
pub mod tree;
pub mod workbook;

pub use builder::{build, Build, BuildStats, BuildWarning};
pub use config::Config;
pub use error::{BuildError, ConfigError, OutputError, WorkbookError};
pub use row::{Row, RowKind};
pub use tier::{PerTier, Tier};
pub use tree::{Category, Control, ControlTree, Requirement};
pub use workbook::{Sheet, Workbook};
