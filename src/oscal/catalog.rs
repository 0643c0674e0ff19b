//! OSCAL catalog document

use serde::{Deserialize, Serialize};

use crate::core::tree::{self, ControlTree};
use crate::oscal::model::{BackMatter, Metadata, Part, Property};

/// Prefix of every id generated for catalog objects
const ID_PREFIX: &str = "eucs";

/// Root of a catalog file: `{"catalog": {...}}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub catalog: Catalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Catalog {
    pub uuid: String,
    pub metadata: Metadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub back_matter: Option<BackMatter>,
}

/// A catalog group, one per EUCS category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub controls: Vec<Control>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    pub id: String,
    #[serde(default, rename = "class", skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub props: Vec<Property>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<Part>,
}

impl Catalog {
    pub fn new(
        uuid: impl Into<String>,
        metadata: Metadata,
        tree: &ControlTree,
        back_matter: BackMatter,
    ) -> Self {
        let groups = tree
            .categories
            .iter()
            .map(Group::from_category)
            .collect();

        Self {
            uuid: uuid.into(),
            metadata,
            groups,
            back_matter: Some(back_matter),
        }
    }

    pub fn into_document(self) -> CatalogDocument {
        CatalogDocument { catalog: self }
    }

    /// The tier identifier of every requirement part, in document order
    pub fn requirement_ids(&self) -> Vec<&str> {
        self.groups
            .iter()
            .flat_map(|g| g.controls.iter())
            .flat_map(|c| c.parts.iter())
            .flat_map(|p| p.parts.iter())
            .filter(|p| p.name == "item")
            .flat_map(|p| p.props.iter())
            .filter(|prop| prop.name == "alt-identifier")
            .map(|prop| prop.value.as_str())
            .collect()
    }
}

impl Group {
    fn from_category(category: &tree::Category) -> Self {
        Self {
            id: format!("{}-{}", ID_PREFIX, category.id),
            title: category.title.clone(),
            props: vec![Property::label(format!("{}.", category.id))],
            controls: category
                .controls
                .iter()
                .map(|ctrl| Control::from_control(&category.id, ctrl))
                .collect(),
        }
    }
}

impl Control {
    fn from_control(category_id: &str, control: &tree::Control) -> Self {
        let id = format!("{}-{}.{}", ID_PREFIX, category_id, control.title_token());
        let label = control
            .id
            .chars()
            .last()
            .map(|c| format!("{}.", c))
            .unwrap_or_default();

        let objective = Part {
            id: Some(format!("{}_obj", id)),
            name: "statement".to_string(),
            class: None,
            props: vec![Property::label("1."), Property::alt_identifier("Objective")],
            prose: Some(control.objective.clone()),
            parts: Vec::new(),
        };

        let requirements = Part {
            id: Some(format!("{}_req", id)),
            name: "statement".to_string(),
            class: None,
            props: vec![
                Property::label("2."),
                Property::alt_identifier("Requirements"),
            ],
            prose: None,
            parts: control
                .requirements
                .iter()
                .map(|req| requirement_part(&id, req))
                .collect(),
        };

        Self {
            id,
            class: Some(ID_PREFIX.to_string()),
            title: control.title.clone(),
            props: vec![Property::label(label)],
            parts: vec![objective, requirements],
        }
    }
}

/// Requirement part; its id ends in the last two characters of the tier identifier
fn requirement_part(control_id: &str, req: &tree::Requirement) -> Part {
    let tail_start = req
        .id
        .char_indices()
        .rev()
        .nth(1)
        .map(|(i, _)| i)
        .unwrap_or(0);

    Part {
        id: Some(format!("{}_req.{}", control_id, &req.id[tail_start..])),
        name: "item".to_string(),
        class: Some(req.tier.as_str().to_string()),
        props: vec![Property::alt_identifier(&req.id).with_class(req.tier.as_str())],
        prose: Some(format!("{} - {}", req.id, req.description)),
        parts: Vec::new(),
    }
}
