//! Terminal output for a conversion run

use console::style;
use std::path::Path;
use tabled::{builder::Builder, settings::Style};

use crate::core::builder::Build;
use crate::core::tier::Tier;
use crate::oscal::OutputPaths;

/// Truncate a string to max_len, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// One line per category and control, with requirement counts per tier
pub fn render_tree(build: &Build) -> String {
    let mut out = String::new();

    for category in &build.tree.categories {
        out.push_str(&format!(
            "{} {}\n",
            style(&category.id).cyan().bold(),
            truncate_str(&category.title, 60)
        ));
        for control in &category.controls {
            let counts: Vec<String> = Tier::all()
                .iter()
                .map(|&tier| {
                    let n = control.requirements.iter().filter(|r| r.tier == tier).count();
                    format!("{}{}", tier.suffix(), n)
                })
                .collect();
            out.push_str(&format!(
                "  {} {} {}\n",
                style(&control.id).cyan(),
                truncate_str(&control.title, 50),
                style(format!("[{}]", counts.join(" "))).dim()
            ));
        }
    }

    out
}

/// Table of requirements per tier and the profile each lands in
pub fn render_summary(build: &Build, paths: &OutputPaths) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Tier", "Requirements", "Profile"]);

    for (tier, ids) in build.tier_ids.iter() {
        builder.push_record([
            tier.label().to_string(),
            ids.len().to_string(),
            paths.profile_file_name(tier),
        ]);
    }

    builder.build().with(Style::rounded()).to_string()
}

/// Display a path relative to the working directory when possible
pub fn display_path(path: &Path) -> String {
    std::env::current_dir()
        .ok()
        .and_then(|cwd| path.strip_prefix(cwd).ok().map(|p| p.display().to_string()))
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::builder;
    use crate::core::row::Row;

    fn sample_build() -> Build {
        let cell = |s: &str| Some(s.to_string());
        builder::build(vec![
            Row {
                category: cell("OIS"),
                title: cell("Organisation"),
                ..Default::default()
            },
            Row {
                category: cell("OIS"),
                control: cell("OIS-01"),
                title: cell("OIS-01 ISMS"),
                ..Default::default()
            },
            Row {
                category: cell("OIS"),
                control: cell("OIS-01"),
                requirement: cell("OIS-01.1B"),
                basic: cell("x"),
                high: cell("x"),
                ..Default::default()
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("short", 10), "short");
        assert_eq!(truncate_str("exactly10!", 10), "exactly10!");
        assert_eq!(truncate_str("this is too long", 10), "this is...");
    }

    #[test]
    fn test_render_tree_counts_per_tier() {
        console::set_colors_enabled(false);
        let tree = render_tree(&sample_build());

        assert!(tree.contains("OIS Organisation"));
        assert!(tree.contains("OIS-01 OIS-01 ISMS [B1 S0 H1]"));
    }

    #[test]
    fn test_render_summary_lists_every_tier() {
        let paths = OutputPaths::new(".", "1.0");
        let table = render_summary(&sample_build(), &paths);

        assert!(table.contains("Basic"));
        assert!(table.contains("Substantial"));
        assert!(table.contains("EUCS_version_1.0_profile_High.json"));
    }
}
