//! CLI module - argument parsing and the conversion run

pub mod args;
pub mod convert;
pub mod output;

pub use args::{Cli, GlobalOpts};
