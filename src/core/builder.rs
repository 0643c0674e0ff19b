//! Row-to-tree transformation
//!
//! The sheet is read in a single pass. Each row is folded into a
//! [`BuildState`] which owns the tree under construction, the keyed indexes
//! used to find existing categories and controls, and the per-tier
//! identifier lists that later become the profiles.
//!
//! Rows name a control by its control column, but the catalog names it by
//! the first word of its title. Both keys are tracked, and each
//! (category, title token) pair may belong to one control only.

use std::collections::{HashMap, HashSet};

use crate::core::error::BuildError;
use crate::core::row::{Row, RowKind};
use crate::core::tier::{PerTier, Tier};
use crate::core::tree::{title_token, Category, Control, ControlTree, Requirement};

/// Counters collected while building
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildStats {
    pub rows_processed: usize,
    pub categories_created: usize,
    pub controls_created: usize,
    pub requirements_created: usize,
    /// Category or control rows naming an entity that already exists
    pub repeated_rows: usize,
    /// Requirement rows with none of the tier columns filled in
    pub untiered_rows: usize,
}

/// Non-fatal finding, reported to the user but kept in the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// The same identifier was produced twice for one tier
    DuplicateId { row: usize, tier: Tier, id: String },
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::DuplicateId { row, tier, id } => write!(
                f,
                "Row {}: requirement '{}' already listed for the {} tier",
                row, id, tier
            ),
        }
    }
}

/// Result of a successful build
#[derive(Debug, Clone, Default)]
pub struct Build {
    pub tree: ControlTree,
    /// Requirement identifiers per tier, in row order, duplicates included
    pub tier_ids: PerTier<Vec<String>>,
    pub stats: BuildStats,
    pub warnings: Vec<BuildWarning>,
}

/// Where a control lives in the tree
#[derive(Debug, Clone, Copy)]
struct ControlSlot {
    category: usize,
    control: usize,
}

/// State threaded through the fold over the rows
#[derive(Debug, Default)]
pub struct BuildState {
    tree: ControlTree,
    categories: HashMap<String, usize>,
    controls: HashMap<(String, String), ControlSlot>,
    /// (category, title token) → control column value that claimed it
    catalog_ids: HashMap<(String, String), String>,
    tier_ids: PerTier<Vec<String>>,
    seen_ids: PerTier<HashSet<String>>,
    stats: BuildStats,
    warnings: Vec<BuildWarning>,
}

/// Build the control tree and tier lists from the rows of a controls sheet.
///
/// Row numbers in errors assume the first row follows a header line.
pub fn build<I>(rows: I) -> Result<Build, BuildError>
where
    I: IntoIterator<Item = Row>,
{
    rows.into_iter()
        .enumerate()
        .try_fold(BuildState::default(), |state, (idx, row)| {
            state.apply(idx + 2, &row)
        })
        .map(BuildState::finish)
}

impl BuildState {
    /// Fold one row into the state
    pub fn apply(mut self, row_num: usize, row: &Row) -> Result<Self, BuildError> {
        self.stats.rows_processed += 1;

        match row.kind() {
            Some(RowKind::Category { category }) => self.category_row(category, row),
            Some(RowKind::Control { category, control }) => {
                self.control_row(row_num, category, control, row)?
            }
            Some(RowKind::Requirement {
                category,
                control,
                requirement,
            }) => self.requirement_row(row_num, category, control, requirement, row)?,
            None => {
                return Err(BuildError::MalformedRow {
                    row: row_num,
                    shape: row.shape(),
                })
            }
        }

        Ok(self)
    }

    pub fn finish(self) -> Build {
        Build {
            tree: self.tree,
            tier_ids: self.tier_ids,
            stats: self.stats,
            warnings: self.warnings,
        }
    }

    fn category_row(&mut self, category: &str, row: &Row) {
        if self.categories.contains_key(category) {
            self.stats.repeated_rows += 1;
            return;
        }

        self.categories
            .insert(category.to_string(), self.tree.categories.len());
        self.tree.categories.push(Category {
            id: category.to_string(),
            title: row.title().to_string(),
            controls: Vec::new(),
        });
        self.stats.categories_created += 1;
    }

    fn control_row(
        &mut self,
        row_num: usize,
        category: &str,
        control: &str,
        row: &Row,
    ) -> Result<(), BuildError> {
        let key = (category.to_string(), control.to_string());
        if self.controls.contains_key(&key) {
            self.stats.repeated_rows += 1;
            return Ok(());
        }

        let cat_idx =
            *self
                .categories
                .get(category)
                .ok_or_else(|| BuildError::ControlWithoutCategory {
                    row: row_num,
                    category: category.to_string(),
                    control: control.to_string(),
                })?;

        if row.title().trim().is_empty() {
            return Err(BuildError::UntitledControl {
                row: row_num,
                control: control.to_string(),
            });
        }

        let token = title_token(row.title());
        let catalog_key = (category.to_string(), token.to_string());
        if let Some(existing) = self.catalog_ids.get(&catalog_key) {
            return Err(BuildError::DuplicateControlId {
                row: row_num,
                category: category.to_string(),
                token: token.to_string(),
                control: control.to_string(),
                existing: existing.clone(),
            });
        }
        self.catalog_ids.insert(catalog_key, control.to_string());

        let controls = &mut self.tree.categories[cat_idx].controls;
        self.controls.insert(
            key,
            ControlSlot {
                category: cat_idx,
                control: controls.len(),
            },
        );
        controls.push(Control {
            id: control.to_string(),
            title: row.title().to_string(),
            objective: row.description().to_string(),
            requirements: Vec::new(),
        });
        self.stats.controls_created += 1;

        Ok(())
    }

    fn requirement_row(
        &mut self,
        row_num: usize,
        category: &str,
        control: &str,
        requirement: &str,
        row: &Row,
    ) -> Result<(), BuildError> {
        let slot = *self
            .controls
            .get(&(category.to_string(), control.to_string()))
            .ok_or_else(|| BuildError::RequirementWithoutControl {
                row: row_num,
                control: control.to_string(),
                requirement: requirement.to_string(),
            })?;

        let flags = row.tiers();
        let tiers: Vec<Tier> = flags
            .iter()
            .filter(|(_, set)| **set)
            .map(|(tier, _)| tier)
            .collect();
        if tiers.is_empty() {
            self.stats.untiered_rows += 1;
            return Ok(());
        }

        for tier in tiers {
            let id = tier.requirement_id(requirement);

            if !self.seen_ids.get_mut(tier).insert(id.clone()) {
                self.warnings.push(BuildWarning::DuplicateId {
                    row: row_num,
                    tier,
                    id: id.clone(),
                });
            }
            self.tier_ids.get_mut(tier).push(id.clone());

            self.tree.categories[slot.category].controls[slot.control]
                .requirements
                .push(Requirement {
                    tier,
                    id,
                    description: row.description().to_string(),
                });
            self.stats.requirements_created += 1;
        }

        Ok(())
    }
}
