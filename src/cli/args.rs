//! CLI argument definitions using clap derive

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "eucs-oscal")]
#[command(author, version, about = "EUCS to OSCAL converter")]
#[command(long_about = "Convert the EUCS controls spreadsheet into an OSCAL catalog and one OSCAL profile per assurance level (Basic, Substantial, High).")]
pub struct Cli {
    /// Controls sheet (CSV file) or workbook directory of CSV sheets
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Directory the catalog and profiles are written to
    #[arg(long, short = 'o', default_value = ".")]
    pub output: PathBuf,

    /// EUCS version, used in file names and document metadata
    #[arg(long = "EUCS-version", short = 'v', default_value = "1.0")]
    pub eucs_version: String,

    /// Configuration file overriding document metadata
    #[arg(long, env = "EUCS_OSCAL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Build and report without writing any files
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug, Default)]
pub struct GlobalOpts {
    /// Suppress non-essential output
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,

    /// Print the converted control tree
    #[arg(long)]
    pub verbose: bool,
}
