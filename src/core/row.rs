//! Input rows and their structural role

use crate::core::tier::{PerTier, Tier};

/// One row of the controls sheet.
///
/// Blank cells are `None`. Which of the category, control and requirement
/// columns are filled in decides what the row describes, see [`Row::kind`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    pub category: Option<String>,
    pub control: Option<String>,
    pub requirement: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub basic: Option<String>,
    pub substantial: Option<String>,
    pub high: Option<String>,
}

/// Structural role of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind<'a> {
    /// Introduces a category
    Category { category: &'a str },
    /// Introduces a control inside a category
    Control { category: &'a str, control: &'a str },
    /// Adds a requirement to a control
    Requirement {
        category: &'a str,
        control: &'a str,
        requirement: &'a str,
    },
}

impl Row {
    /// Classify the row, or `None` if it matches no known pattern
    pub fn kind(&self) -> Option<RowKind<'_>> {
        match (
            self.category.as_deref(),
            self.control.as_deref(),
            self.requirement.as_deref(),
        ) {
            (Some(category), None, None) => Some(RowKind::Category { category }),
            (Some(category), Some(control), None) => Some(RowKind::Control { category, control }),
            (Some(category), Some(control), Some(requirement)) => Some(RowKind::Requirement {
                category,
                control,
                requirement,
            }),
            _ => None,
        }
    }

    /// Whether the row is flagged as applicable at the given tier
    pub fn applies_at(&self, tier: Tier) -> bool {
        let flag = match tier {
            Tier::Basic => &self.basic,
            Tier::Substantial => &self.substantial,
            Tier::High => &self.high,
        };
        flag.is_some()
    }

    /// Tier flags of the row
    pub fn tiers(&self) -> PerTier<bool> {
        PerTier {
            basic: self.applies_at(Tier::Basic),
            substantial: self.applies_at(Tier::Substantial),
            high: self.applies_at(Tier::High),
        }
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Short description of which columns are filled, for error messages
    pub fn shape(&self) -> String {
        let cell = |name: &str, value: &Option<String>| {
            format!("{}={}", name, if value.is_some() { "set" } else { "blank" })
        };
        [
            cell("category", &self.category),
            cell("control", &self.control),
            cell("requirement", &self.requirement),
        ]
        .join(", ")
    }
}
