//! Assurance tiers and tier-specific requirement identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// EUCS assurance level a requirement applies at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Basic,
    Substantial,
    High,
}

impl Tier {
    /// Lowercase name, used as the OSCAL `class` of requirement parts
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Basic => "basic",
            Tier::Substantial => "substantial",
            Tier::High => "high",
        }
    }

    /// Capitalized name, used in profile file names and column headers
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Basic => "Basic",
            Tier::Substantial => "Substantial",
            Tier::High => "High",
        }
    }

    /// Trailing letter that marks a requirement identifier as belonging to this tier
    pub fn suffix(&self) -> char {
        match self {
            Tier::Basic => 'B',
            Tier::Substantial => 'S',
            Tier::High => 'H',
        }
    }

    /// All tiers in ascending order
    pub fn all() -> &'static [Tier] {
        &[Tier::Basic, Tier::Substantial, Tier::High]
    }

    /// Tiers strictly below this one
    fn lower(&self) -> &'static [Tier] {
        match self {
            Tier::Basic => &[],
            Tier::Substantial => &[Tier::Basic],
            Tier::High => &[Tier::Basic, Tier::Substantial],
        }
    }

    /// Derive this tier's identifier from a raw requirement identifier.
    ///
    /// Identifiers are written once, at the lowest tier they apply to
    /// (`OIS-01.1B`). A higher tier swaps a lower tier's suffix letter for its
    /// own (`OIS-01.1S`, `OIS-01.1H`). Anything else is taken to be tier-specific
    /// already and is returned unchanged.
    pub fn requirement_id(&self, raw: &str) -> String {
        match raw.chars().last() {
            Some(last) if self.lower().iter().any(|t| t.suffix() == last) => {
                let mut id = raw[..raw.len() - last.len_utf8()].to_string();
                id.push(self.suffix());
                id
            }
            _ => raw.to_string(),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One value per tier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerTier<T> {
    pub basic: T,
    pub substantial: T,
    pub high: T,
}

impl<T> PerTier<T> {
    pub fn get(&self, tier: Tier) -> &T {
        match tier {
            Tier::Basic => &self.basic,
            Tier::Substantial => &self.substantial,
            Tier::High => &self.high,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut T {
        match tier {
            Tier::Basic => &mut self.basic,
            Tier::Substantial => &mut self.substantial,
            Tier::High => &mut self.high,
        }
    }

    /// Iterate `(tier, value)` pairs in ascending tier order
    pub fn iter(&self) -> impl Iterator<Item = (Tier, &T)> {
        Tier::all().iter().map(move |&tier| (tier, self.get(tier)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_id_is_unchanged() {
        assert_eq!(Tier::Basic.requirement_id("OIS-01.1B"), "OIS-01.1B");
        assert_eq!(Tier::Basic.requirement_id("OIS-01.1S"), "OIS-01.1S");
    }

    #[test]
    fn test_substantial_rewrites_basic_suffix() {
        assert_eq!(Tier::Substantial.requirement_id("R1B"), "R1S");
    }

    #[test]
    fn test_substantial_keeps_own_and_high_suffix() {
        assert_eq!(Tier::Substantial.requirement_id("R2S"), "R2S");
        assert_eq!(Tier::Substantial.requirement_id("R3H"), "R3H");
    }

    #[test]
    fn test_high_rewrites_basic_and_substantial_suffix() {
        assert_eq!(Tier::High.requirement_id("R1B"), "R1H");
        assert_eq!(Tier::High.requirement_id("R2S"), "R2H");
        assert_eq!(Tier::High.requirement_id("R3H"), "R3H");
    }

    #[test]
    fn test_all_tiers_differ_only_in_last_char() {
        let ids: Vec<String> = Tier::all()
            .iter()
            .map(|t| t.requirement_id("AM-03.4B"))
            .collect();
        assert_eq!(ids, vec!["AM-03.4B", "AM-03.4S", "AM-03.4H"]);
        for id in &ids {
            assert_eq!(&id[..id.len() - 1], "AM-03.4");
        }
    }

    #[test]
    fn test_other_trailing_shapes_pass_through() {
        for raw in ["R1", "R1.2", "R1b", "R1-", "R1X", ""] {
            assert_eq!(Tier::Substantial.requirement_id(raw), raw);
            assert_eq!(Tier::High.requirement_id(raw), raw);
        }
    }

    #[test]
    fn test_tier_display_and_label() {
        assert_eq!(Tier::Substantial.to_string(), "substantial");
        assert_eq!(Tier::Substantial.label(), "Substantial");
    }

    #[test]
    fn test_per_tier_access() {
        let mut lists: PerTier<Vec<&str>> = PerTier::default();
        lists.get_mut(Tier::High).push("R1H");
        assert!(lists.basic.is_empty());
        assert_eq!(lists.get(Tier::High), &vec!["R1H"]);
        let tiers: Vec<Tier> = lists.iter().map(|(t, _)| t).collect();
        assert_eq!(tiers, Tier::all());
    }
}
