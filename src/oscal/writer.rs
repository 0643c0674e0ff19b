//! Deriving the output documents and writing them to disk

use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::builder::Build;
use crate::core::config::Config;
use crate::core::error::OutputError;
use crate::core::tier::Tier;
use crate::oscal::catalog::Catalog;
use crate::oscal::metadata;
use crate::oscal::profile::{Profile, ProfileTemplate};

/// File names of the documents for one EUCS version
#[derive(Debug, Clone)]
pub struct OutputPaths {
    dir: PathBuf,
    version: String,
}

impl OutputPaths {
    pub fn new(dir: impl Into<PathBuf>, version: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            version: version.into(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn catalog_file_name(&self) -> String {
        format!("EUCS_controls_version_{}_catalog.json", self.version)
    }

    pub fn profile_file_name(&self, tier: Tier) -> String {
        format!("EUCS_version_{}_profile_{}.json", self.version, tier.label())
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.join(self.catalog_file_name())
    }

    pub fn profile_path(&self, tier: Tier) -> PathBuf {
        self.dir.join(self.profile_file_name(tier))
    }
}

/// The catalog and one profile per tier, ready to be written
#[derive(Debug, Clone)]
pub struct Documents {
    pub catalog: Catalog,
    pub profiles: Vec<(Tier, Profile)>,
}

impl Documents {
    /// Turn a finished build into documents.
    ///
    /// Every profile is built fresh from the same template and only sees its
    /// own tier's identifier list.
    pub fn derive(
        build: &Build,
        config: &Config,
        paths: &OutputPaths,
        timestamp: DateTime<FixedOffset>,
    ) -> Self {
        let metadata = metadata::metadata(config, &paths.version, timestamp);
        let catalog = Catalog::new(
            config.catalog_uuid.to_string(),
            metadata.clone(),
            &build.tree,
            metadata::back_matter(config),
        );

        let template =
            ProfileTemplate::new(config.catalog_uuid, paths.catalog_file_name(), metadata);
        let profiles = build
            .tier_ids
            .iter()
            .map(|(tier, ids)| (tier, template.profile(tier, ids)))
            .collect();

        Self { catalog, profiles }
    }

    /// Write the catalog, then each profile, returning the written paths.
    ///
    /// Existing files are overwritten.
    pub fn write(&self, paths: &OutputPaths) -> Result<Vec<PathBuf>, OutputError> {
        fs::create_dir_all(paths.dir()).map_err(|source| OutputError::CreateDir {
            path: paths.dir().to_path_buf(),
            source,
        })?;

        let mut written = Vec::with_capacity(1 + self.profiles.len());

        let catalog_path = paths.catalog_path();
        write_json(&catalog_path, &self.catalog.clone().into_document())?;
        written.push(catalog_path);

        for (tier, profile) in &self.profiles {
            let path = paths.profile_path(*tier);
            write_json(&path, &profile.clone().into_document())?;
            written.push(path);
        }

        Ok(written)
    }
}

/// Serialize `value` as pretty-printed JSON to `path`
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), OutputError> {
    let write_err = |source: std::io::Error| OutputError::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| OutputError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.write_all(b"\n").map_err(write_err)?;
    writer.flush().map_err(write_err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder;
    use crate::core::row::Row;
    use crate::oscal::catalog::CatalogDocument;
    use crate::oscal::profile::ProfileDocument;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn rows() -> Vec<Row> {
        let cell = |s: &str| Some(s.to_string());
        vec![
            Row {
                category: cell("OIS"),
                title: cell("Organisation"),
                ..Default::default()
            },
            Row {
                category: cell("OIS"),
                control: cell("OIS-01"),
                title: cell("OIS-01 ISMS"),
                description: cell("Objective"),
                ..Default::default()
            },
            Row {
                category: cell("OIS"),
                control: cell("OIS-01"),
                requirement: cell("OIS-01.1B"),
                description: cell("Scope"),
                basic: cell("x"),
                substantial: cell("x"),
                high: cell("x"),
                ..Default::default()
            },
            Row {
                category: cell("OIS"),
                control: cell("OIS-01"),
                requirement: cell("OIS-01.2S"),
                description: cell("Review"),
                substantial: cell("x"),
                high: cell("x"),
                ..Default::default()
            },
        ]
    }

    fn derive(paths: &OutputPaths) -> Documents {
        let build = builder::build(rows()).unwrap();
        Documents::derive(&build, &Config::default(), paths, metadata::now())
    }

    #[test]
    fn test_file_names() {
        let paths = OutputPaths::new("/out", "2.1");

        assert_eq!(
            paths.catalog_file_name(),
            "EUCS_controls_version_2.1_catalog.json"
        );
        assert_eq!(
            paths.profile_path(Tier::Substantial),
            PathBuf::from("/out/EUCS_version_2.1_profile_Substantial.json")
        );
    }

    #[test]
    fn test_derive_profiles_per_tier() {
        let docs = derive(&OutputPaths::new(".", "1.0"));

        let tiers: Vec<Tier> = docs.profiles.iter().map(|(t, _)| *t).collect();
        assert_eq!(tiers, Tier::all());

        let selected = |i: usize| docs.profiles[i].1.selected_ids().collect::<Vec<_>>();
        assert_eq!(selected(0), vec!["OIS-01.1B"]);
        assert_eq!(selected(1), vec!["OIS-01.1S", "OIS-01.2S"]);
        assert_eq!(selected(2), vec!["OIS-01.1H", "OIS-01.2H"]);

        assert_eq!(docs.catalog.metadata.version, "1.0");
        assert_eq!(
            docs.profiles[0].1.imports[0].href,
            "EUCS_controls_version_1.0_catalog.json"
        );
    }

    #[test]
    fn test_write_and_reread_round_trip() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("nested/out");
        let paths = OutputPaths::new(&out, "1.0");
        let docs = derive(&paths);

        let written = docs.write(&paths).unwrap();
        assert_eq!(written.len(), 4);
        assert!(written.iter().all(|p| p.exists()));

        let catalog: CatalogDocument =
            serde_json::from_str(&fs::read_to_string(paths.catalog_path()).unwrap()).unwrap();
        let catalog_ids: HashSet<&str> = catalog.catalog.requirement_ids().into_iter().collect();

        for (tier, expected) in &docs.profiles {
            let profile: ProfileDocument = serde_json::from_str(
                &fs::read_to_string(paths.profile_path(*tier)).unwrap(),
            )
            .unwrap();
            let reread: Vec<&str> = profile.profile.selected_ids().collect();
            let kept: Vec<&str> = reread
                .iter()
                .copied()
                .filter(|id| catalog_ids.contains(id))
                .collect();

            assert_eq!(kept, expected.selected_ids().collect::<Vec<_>>());
            assert_eq!(profile.profile.imports[0].href, paths.catalog_file_name());
        }
    }

    #[test]
    fn test_rewrite_overwrites_existing_files() {
        let tmp = TempDir::new().unwrap();
        let paths = OutputPaths::new(tmp.path(), "1.0");
        fs::write(paths.profile_path(Tier::High), "stale").unwrap();

        derive(&paths).write(&paths).unwrap();

        let content = fs::read_to_string(paths.profile_path(Tier::High)).unwrap();
        assert!(content.starts_with('{'));
    }
}
