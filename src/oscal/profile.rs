//! OSCAL profiles selecting one tier's requirements from the catalog

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::tier::Tier;
use crate::oscal::model::Metadata;

/// Root of a profile file: `{"profile": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub profile: Profile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub uuid: String,
    pub metadata: Metadata,
    pub imports: Vec<Import>,
}

/// Import of a catalog, restricted to the listed ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Import {
    pub href: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include_controls: Vec<SelectControl>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SelectControl {
    #[serde(default)]
    pub with_ids: Vec<String>,
}

/// What all profiles of one conversion have in common
#[derive(Debug, Clone)]
pub struct ProfileTemplate {
    catalog_uuid: Uuid,
    catalog_href: String,
    metadata: Metadata,
}

impl ProfileTemplate {
    /// `catalog_href` is the catalog's path relative to the profile files
    pub fn new(
        catalog_uuid: Uuid,
        catalog_href: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            catalog_uuid,
            catalog_href: catalog_href.into(),
            metadata,
        }
    }

    /// A new profile for `tier`, selecting exactly `ids` in the given order
    pub fn profile(&self, tier: Tier, ids: &[String]) -> Profile {
        Profile {
            uuid: profile_uuid(&self.catalog_uuid, tier).to_string(),
            metadata: self.metadata.clone(),
            imports: vec![Import {
                href: self.catalog_href.clone(),
                include_controls: vec![SelectControl {
                    with_ids: ids.to_vec(),
                }],
            }],
        }
    }
}

impl Profile {
    pub fn into_document(self) -> ProfileDocument {
        ProfileDocument { profile: self }
    }

    /// Every selected id across all imports
    pub fn selected_ids(&self) -> impl Iterator<Item = &str> {
        self.imports
            .iter()
            .flat_map(|i| i.include_controls.iter())
            .flat_map(|s| s.with_ids.iter())
            .map(String::as_str)
    }
}

/// Name-based (v5) UUID for a tier's profile, in the catalog UUID's namespace
fn profile_uuid(catalog_uuid: &Uuid, tier: Tier) -> Uuid {
    Uuid::new_v5(catalog_uuid, tier.as_str().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oscal::metadata::tests::fixed_metadata;

    const CATALOG_UUID: Uuid = Uuid::from_u128(0x74c8ba1e_5cd4_4ad1_bbfd_d888e2f6c724);

    fn template() -> ProfileTemplate {
        ProfileTemplate::new(
            CATALOG_UUID,
            "EUCS_controls_version_1.0_catalog.json",
            fixed_metadata(),
        )
    }

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_profile_imports_catalog_and_selects_ids() {
        let profile = template().profile(Tier::Basic, &ids(&["R2B", "R1B", "R2B"]));

        assert_eq!(profile.imports.len(), 1);
        assert_eq!(
            profile.imports[0].href,
            "EUCS_controls_version_1.0_catalog.json"
        );
        let selected: Vec<&str> = profile.selected_ids().collect();
        assert_eq!(selected, vec!["R2B", "R1B", "R2B"]);
    }

    #[test]
    fn test_profiles_do_not_share_selection() {
        let template = template();

        let basic = template.profile(Tier::Basic, &ids(&["R1B"]));
        let substantial = template.profile(Tier::Substantial, &ids(&["R1S", "R2S"]));
        let high = template.profile(Tier::High, &[]);

        assert_eq!(basic.selected_ids().collect::<Vec<_>>(), vec!["R1B"]);
        assert_eq!(substantial.selected_ids().count(), 2);
        assert_eq!(high.selected_ids().count(), 0);
    }

    #[test]
    fn test_profile_uuid_is_v5_in_catalog_namespace() {
        let basic = profile_uuid(&CATALOG_UUID, Tier::Basic);

        assert_eq!(basic, profile_uuid(&CATALOG_UUID, Tier::Basic));
        assert_ne!(basic, profile_uuid(&CATALOG_UUID, Tier::High));
        assert_ne!(basic, CATALOG_UUID);
        assert_eq!(basic.get_version_num(), 5);
        assert_eq!(basic, Uuid::new_v5(&CATALOG_UUID, b"basic"));
    }

    #[test]
    fn test_profile_carries_v5_uuid() {
        let profile = template().profile(Tier::Substantial, &[]);

        let parsed = Uuid::parse_str(&profile.uuid).unwrap();
        assert_eq!(parsed, Uuid::new_v5(&CATALOG_UUID, b"substantial"));
    }

    #[test]
    fn test_empty_selection_still_serializes_with_ids() {
        let doc = template().profile(Tier::High, &[]).into_document();
        let json = serde_json::to_value(&doc).unwrap();

        let select = &json["profile"]["imports"][0]["include-controls"][0];
        assert_eq!(select["with-ids"], serde_json::json!([]));
    }
}
