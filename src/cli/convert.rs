//! The conversion run: read the sheet, build the tree, write the documents

use console::style;
use miette::Result;

use crate::cli::args::Cli;
use crate::cli::output::{display_path, render_summary, render_tree};
use crate::core::builder;
use crate::core::config::Config;
use crate::core::workbook::Workbook;
use crate::oscal::metadata;
use crate::oscal::{Documents, OutputPaths};

pub fn run(cli: Cli) -> Result<()> {
    let global = &cli.global;
    let config = Config::load(cli.config.as_deref())?;

    let workbook = Workbook::open(&cli.input)?;
    let sheet = workbook.controls_sheet(&config.sheet)?;

    if !global.quiet {
        println!(
            "{} Converting sheet {} from {}{}",
            style("→").blue(),
            style(&sheet.name).cyan(),
            style(display_path(&cli.input)).yellow(),
            if cli.dry_run {
                style(" (dry run)").dim().to_string()
            } else {
                String::new()
            }
        );
    }

    let rows = sheet.rows()?;
    let build = builder::build(rows)?;

    for warning in &build.warnings {
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    if global.verbose {
        println!();
        print!("{}", render_tree(&build));
    }

    let paths = OutputPaths::new(&cli.output, &cli.eucs_version);
    let documents = Documents::derive(&build, &config, &paths, metadata::now());

    if !global.quiet {
        let stats = &build.stats;
        println!();
        println!("  Rows processed:        {}", style(stats.rows_processed).cyan());
        println!("  Categories:            {}", style(stats.categories_created).green());
        println!("  Controls:              {}", style(stats.controls_created).green());
        println!("  Requirements:          {}", style(stats.requirements_created).green());
        if stats.repeated_rows > 0 {
            println!("  Repeated rows:         {}", style(stats.repeated_rows).dim());
        }
        if stats.untiered_rows > 0 {
            println!("  Rows without a tier:   {}", style(stats.untiered_rows).dim());
        }
        println!();
        println!("{}", render_summary(&build, &paths));
    }

    if cli.dry_run {
        if !global.quiet {
            println!();
            println!(
                "{}",
                style("Dry run complete. No files were written.").yellow()
            );
        }
        return Ok(());
    }

    let written = documents.write(&paths)?;

    if !global.quiet {
        println!();
        for path in &written {
            println!("{} Wrote {}", style("✓").green(), display_path(path));
        }
    }

    Ok(())
}
