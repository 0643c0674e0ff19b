//! Configuration management with layered hierarchy
//!
//! Settings control the document metadata written into the catalog and
//! profiles, and which sheet of the workbook holds the controls.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::core::error::ConfigError;

/// Converter configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog title
    pub title: String,

    /// Remarks placed in the document metadata
    pub remarks: String,

    /// UUID of the generated catalog, also the namespace of the profile UUIDs
    pub catalog_uuid: Uuid,

    /// Substring identifying the controls sheet
    pub sheet: String,

    /// Value of the `keywords` metadata property
    pub keywords: String,

    /// Organization publishing the converted documents
    pub party: PartyConfig,

    /// Source publication the catalog is derived from
    pub source: SourceConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PartyConfig {
    pub uuid: String,
    pub name: String,
    pub email: String,
    pub address: Vec<String>,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub uuid: String,
    pub title: String,
    pub href: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "Sample EUCS Catalog".to_string(),
            remarks: "The following is a short excerpt from EUCS Catalog. This work is provided here under copyright fair use for non-profit, educational purposes only. Copyrights for this work are held by the publisher.".to_string(),
            catalog_uuid: Uuid::from_u128(0x74c8ba1e_5cd4_4ad1_bbfd_d888e2f6c724),
            sheet: "controls".to_string(),
            keywords: "cybersecurity, information security, information system, OSCAL, Open Security Controls Assessment Language".to_string(),
            party: PartyConfig::default(),
            source: SourceConfig::default(),
        }
    }
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            uuid: "f550d94e-0f01-415f-a1e2-c8188c9ff4a5".to_string(),
            name: "ENISA".to_string(),
            email: "name@domain.eu".to_string(),
            address: vec![
                "ENISA".to_string(),
                "Attn: Somebody".to_string(),
                "1 Some Street".to_string(),
            ],
            city: "City".to_string(),
            country: "EU".to_string(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            uuid: "3ab41d8a-66e3-4732-ae28-07405dad5127".to_string(),
            title: "EUCS prCEN/TS (PDF)".to_string(),
            href: "https://enisa.europa.eu/publications/eucs.pdf".to_string(),
        }
    }
}

/// A config file layer; every field is optional so layers only override what they set
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    title: Option<String>,
    remarks: Option<String>,
    catalog_uuid: Option<Uuid>,
    sheet: Option<String>,
    keywords: Option<String>,
    party: Option<PartyConfig>,
    source: Option<SourceConfig>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order.
    ///
    /// An unreadable global config is ignored; an explicit config file must load.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Global user config (~/.config/eucs-oscal/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                if let Ok(layer) = Self::read_layer(&global_path) {
                    config.merge(layer);
                }
            }
        }

        if let Some(path) = explicit {
            config.merge(Self::read_layer(path)?);
        }

        config.merge_env(|key| std::env::var(key).ok());

        Ok(config)
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "eucs-oscal")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    fn read_layer(path: &Path) -> Result<ConfigLayer, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Merge a config layer into this one (the layer takes precedence)
    fn merge(&mut self, other: ConfigLayer) {
        if let Some(title) = other.title {
            self.title = title;
        }
        if let Some(remarks) = other.remarks {
            self.remarks = remarks;
        }
        if let Some(uuid) = other.catalog_uuid {
            self.catalog_uuid = uuid;
        }
        if let Some(sheet) = other.sheet {
            self.sheet = sheet;
        }
        if let Some(keywords) = other.keywords {
            self.keywords = keywords;
        }
        if let Some(party) = other.party {
            self.party = party;
        }
        if let Some(source) = other.source {
            self.source = source;
        }
    }

    /// Apply `EUCS_OSCAL_TITLE` and `EUCS_OSCAL_SHEET` overrides
    fn merge_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(title) = var("EUCS_OSCAL_TITLE") {
            self.title = title;
        }
        if let Some(sheet) = var("EUCS_OSCAL_SHEET") {
            self.sheet = sheet;
        }
    }
}
