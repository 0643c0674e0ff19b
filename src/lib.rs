//! eucs-oscal: EUCS controls to OSCAL
//!
//! Converts the EUCS controls spreadsheet into an OSCAL catalog and one
//! OSCAL profile per assurance level.

pub mod cli;
pub mod core;
pub mod oscal;
