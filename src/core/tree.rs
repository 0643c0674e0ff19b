//! The controls hierarchy: categories, controls and their requirements

use crate::core::tier::Tier;

/// Every category of the sheet, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlTree {
    pub categories: Vec<Category>,
}

/// Top-level grouping of controls, e.g. `OIS` (organisation of information security)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub controls: Vec<Control>,
}

/// A control with its objective and the requirements implementing it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    /// Value of the control column, e.g. `OIS-01`
    pub id: String,
    pub title: String,
    /// Control objective, taken from the description of the control row
    pub objective: String,
    /// The requirement group: requirements in the order they were read
    pub requirements: Vec<Requirement>,
}

/// A requirement at one tier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub tier: Tier,
    /// Tier-specific identifier, see [`Tier::requirement_id`]
    pub id: String,
    pub description: String,
}

impl Control {
    /// First word of the title, which names the control in the catalog
    pub fn title_token(&self) -> &str {
        title_token(&self.title)
    }
}

/// First whitespace-separated word of a control title
pub fn title_token(title: &str) -> &str {
    title.split_whitespace().next().unwrap_or_default()
}

impl ControlTree {
    pub fn controls(&self) -> impl Iterator<Item = (&Category, &Control)> {
        self.categories
            .iter()
            .flat_map(|cat| cat.controls.iter().map(move |ctrl| (cat, ctrl)))
    }

    pub fn requirements(&self) -> impl Iterator<Item = &Requirement> {
        self.controls().flat_map(|(_, ctrl)| ctrl.requirements.iter())
    }

    /// Identifiers of all requirements at `tier`, in tree order
    pub fn requirement_ids(&self, tier: Tier) -> impl Iterator<Item = &str> {
        self.requirements()
            .filter(move |r| r.tier == tier)
            .map(|r| r.id.as_str())
    }
}
