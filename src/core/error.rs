//! Error types for reading the workbook and building the catalog

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Structural problem found while building the catalog tree.
///
/// Row numbers are 1-indexed sheet lines, counting the header as line 1.
#[derive(Debug, Error, Diagnostic)]
pub enum BuildError {
    #[error("Row {row}: not a category, control, or requirement row ({shape})")]
    #[diagnostic(
        code(eucs::build::malformed_row),
        help("category rows fill only 'Category', control rows add 'Control', requirement rows add 'Requirement'")
    )]
    MalformedRow { row: usize, shape: String },

    #[error("Row {row}: requirement '{requirement}' belongs to control '{control}', which has not been defined yet")]
    #[diagnostic(
        code(eucs::build::requirement_without_control),
        help("a control row must come before the control's requirement rows")
    )]
    RequirementWithoutControl {
        row: usize,
        control: String,
        requirement: String,
    },

    #[error("Row {row}: control '{control}' belongs to category '{category}', which has not been defined yet")]
    #[diagnostic(
        code(eucs::build::control_without_category),
        help("a category row must come before the category's control rows")
    )]
    ControlWithoutCategory {
        row: usize,
        category: String,
        control: String,
    },

    #[error("Row {row}: control '{control}' has no title")]
    #[diagnostic(
        code(eucs::build::untitled_control),
        help("the first word of the title becomes the control's catalog id")
    )]
    UntitledControl { row: usize, control: String },

    #[error("Row {row}: control '{control}' would get catalog id 'eucs-{category}.{token}', already used by control '{existing}'")]
    #[diagnostic(
        code(eucs::build::duplicate_control_id),
        help("the first word of each control title must be unique within its category")
    )]
    DuplicateControlId {
        row: usize,
        category: String,
        token: String,
        control: String,
        existing: String,
    },
}

/// Problem opening the workbook or reading its controls sheet
#[derive(Debug, Error, Diagnostic)]
pub enum WorkbookError {
    #[error("Input not found: {}", .0.display())]
    #[diagnostic(code(eucs::input::not_found))]
    NotFound(PathBuf),

    #[error("No sheet name contains '{pattern}' (found: {})", .available.join(", "))]
    #[diagnostic(
        code(eucs::input::no_controls_sheet),
        help("name the controls sheet file e.g. 'EUCS_controls.csv'")
    )]
    NoControlsSheet {
        pattern: String,
        available: Vec<String>,
    },

    #[error("Several sheets contain '{pattern}': {}", .candidates.join(", "))]
    #[diagnostic(
        code(eucs::input::ambiguous_controls_sheet),
        help("pass the sheet file itself with --input")
    )]
    AmbiguousControlsSheet {
        pattern: String,
        candidates: Vec<String>,
    },

    #[error("Sheet '{sheet}' is missing required column '{column}'")]
    #[diagnostic(code(eucs::input::missing_column))]
    MissingColumn { sheet: String, column: String },

    #[error("Sheet '{sheet}': CSV error: {source}")]
    #[diagnostic(code(eucs::input::csv))]
    Csv {
        sheet: String,
        #[source]
        source: csv::Error,
    },

    #[error("IO error: {0}")]
    #[diagnostic(code(eucs::input::io))]
    Io(#[from] std::io::Error),
}

/// Problem loading a configuration file
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Cannot read config file {}: {source}", .path.display())]
    #[diagnostic(code(eucs::config::io))]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    #[diagnostic(code(eucs::config::parse))]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}

/// Problem writing an output document
#[derive(Debug, Error, Diagnostic)]
pub enum OutputError {
    #[error("Cannot create output directory {}: {source}", .path.display())]
    #[diagnostic(code(eucs::output::create_dir))]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write {}: {source}", .path.display())]
    #[diagnostic(code(eucs::output::io))]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot serialize {}: {source}", .path.display())]
    #[diagnostic(code(eucs::output::json))]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
