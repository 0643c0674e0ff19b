//! Reading the controls sheet
//!
//! A workbook is a directory of CSV files, one per sheet, named after the
//! sheet (`EUCS_controls.csv`). A single CSV file is a workbook with one
//! sheet and is used as-is.

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::core::error::WorkbookError;
use crate::core::row::Row;

/// Columns the controls sheet must provide, with accepted header spellings
const COLUMNS: &[(Column, &[&str])] = &[
    (Column::Category, &["category", "eucs category"]),
    (Column::Control, &["control", "eucs control"]),
    (Column::Requirement, &["requirement", "eucs requirement"]),
    (Column::Title, &["title"]),
    (Column::Description, &["description"]),
    (Column::Basic, &["basic"]),
    (Column::Substantial, &["substantial"]),
    (Column::High, &["high"]),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Column {
    Category,
    Control,
    Requirement,
    Title,
    Description,
    Basic,
    Substantial,
    High,
}

impl Column {
    fn name(&self) -> &'static str {
        match self {
            Column::Category => "Category",
            Column::Control => "Control",
            Column::Requirement => "Requirement",
            Column::Title => "Title",
            Column::Description => "Description",
            Column::Basic => "Basic",
            Column::Substantial => "Substantial",
            Column::High => "High",
        }
    }
}

/// One sheet of a workbook
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sheet {
    pub name: String,
    pub path: PathBuf,
}

/// The sheets available in an input
#[derive(Debug)]
pub struct Workbook {
    sheets: Vec<Sheet>,
    single: bool,
}

impl Workbook {
    /// Open a CSV file or a directory of CSV files
    pub fn open(path: &Path) -> Result<Self, WorkbookError> {
        if !path.exists() {
            return Err(WorkbookError::NotFound(path.to_path_buf()));
        }

        if path.is_file() {
            return Ok(Self {
                sheets: vec![Sheet {
                    name: sheet_name(path),
                    path: path.to_path_buf(),
                }],
                single: true,
            });
        }

        let mut sheets = Vec::new();
        for entry in fs::read_dir(path)? {
            let entry_path = entry?.path();
            let is_csv = entry_path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case("csv"))
                .unwrap_or(false);
            if entry_path.is_file() && is_csv {
                sheets.push(Sheet {
                    name: sheet_name(&entry_path),
                    path: entry_path,
                });
            }
        }
        sheets.sort_by(|a, b| a.name.cmp(&b.name));

        Ok(Self {
            sheets,
            single: false,
        })
    }

    /// Find the sheet whose name contains `pattern`, ignoring case.
    ///
    /// A single-file workbook always yields its only sheet.
    pub fn controls_sheet(&self, pattern: &str) -> Result<&Sheet, WorkbookError> {
        if self.single {
            if let Some(sheet) = self.sheets.first() {
                return Ok(sheet);
            }
        }

        let needle = pattern.to_lowercase();
        let matches: Vec<&Sheet> = self
            .sheets
            .iter()
            .filter(|s| s.name.to_lowercase().contains(&needle))
            .collect();

        match matches.as_slice() {
            [sheet] => Ok(*sheet),
            [] => Err(WorkbookError::NoControlsSheet {
                pattern: pattern.to_string(),
                available: self.sheets.iter().map(|s| s.name.clone()).collect(),
            }),
            _ => Err(WorkbookError::AmbiguousControlsSheet {
                pattern: pattern.to_string(),
                candidates: matches.iter().map(|s| s.name.clone()).collect(),
            }),
        }
    }
}

impl Sheet {
    /// Read every data row of the sheet
    pub fn rows(&self) -> Result<Vec<Row>, WorkbookError> {
        let csv_err = |source: csv::Error| WorkbookError::Csv {
            sheet: self.name.clone(),
            source,
        };

        let file = File::open(&self.path)?;
        let mut rdr = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(BufReader::new(file));

        let headers = rdr.headers().map_err(csv_err)?.clone();
        let columns = self.column_map(&headers)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(csv_err)?;
            let field = |col: Column| get_field(&record, &columns, col);
            rows.push(Row {
                category: field(Column::Category),
                control: field(Column::Control),
                requirement: field(Column::Requirement),
                title: field(Column::Title),
                description: field(Column::Description),
                basic: field(Column::Basic),
                substantial: field(Column::Substantial),
                high: field(Column::High),
            });
        }

        Ok(rows)
    }

    /// Resolve every required column to its index in the header
    fn column_map(&self, headers: &StringRecord) -> Result<HashMap<Column, usize>, WorkbookError> {
        let header_map = build_header_map(headers);

        COLUMNS
            .iter()
            .map(|(col, spellings)| {
                spellings
                    .iter()
                    .find_map(|s| header_map.get(*s))
                    .map(|&idx| (*col, idx))
                    .ok_or_else(|| WorkbookError::MissingColumn {
                        sheet: self.name.clone(),
                        column: col.name().to_string(),
                    })
            })
            .collect()
    }
}

fn sheet_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// Build a map from lowercased header name to column index
fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_lowercase(), i))
        .collect()
}

/// Get a cell, treating empty cells as absent
fn get_field(record: &StringRecord, columns: &HashMap<Column, usize>, col: Column) -> Option<String> {
    columns
        .get(&col)
        .and_then(|&idx| record.get(idx))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const HEADER: &str = "EUCS Category,EUCS Control,EUCS Requirement,Title,Description,Basic,Substantial,High";

    fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_single_file_is_its_own_sheet() {
        let tmp = TempDir::new().unwrap();
        let path = write(tmp.path(), "eucs.csv", HEADER);

        let wb = Workbook::open(&path).unwrap();
        let sheet = wb.controls_sheet("controls").unwrap();

        assert_eq!(sheet.name, "eucs");
    }

    #[test]
    fn test_directory_selects_controls_sheet_case_insensitive() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Overview.csv", "a,b\n");
        write(tmp.path(), "EUCS Controls.csv", HEADER);
        write(tmp.path(), "notes.txt", "ignored");

        let wb = Workbook::open(tmp.path()).unwrap();

        assert_eq!(wb.sheets.len(), 2);
        assert_eq!(wb.controls_sheet("controls").unwrap().name, "EUCS Controls");
    }

    #[test]
    fn test_missing_controls_sheet() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "Overview.csv", "a,b\n");

        let wb = Workbook::open(tmp.path()).unwrap();
        let err = wb.controls_sheet("controls").unwrap_err();

        match err {
            WorkbookError::NoControlsSheet { available, .. } => {
                assert_eq!(available, vec!["Overview"])
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ambiguous_controls_sheet() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "controls_v1.csv", HEADER);
        write(tmp.path(), "controls_v2.csv", HEADER);

        let wb = Workbook::open(tmp.path()).unwrap();
        let err = wb.controls_sheet("controls").unwrap_err();

        assert!(matches!(err, WorkbookError::AmbiguousControlsSheet { .. }));
    }

    #[test]
    fn test_missing_input() {
        let tmp = TempDir::new().unwrap();
        let err = Workbook::open(&tmp.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, WorkbookError::NotFound(_)));
    }

    #[test]
    fn test_rows_read_blank_cells_as_absent() {
        let tmp = TempDir::new().unwrap();
        let content = format!(
            "{HEADER}\n\
             OIS,,,Organisation,,,,\n\
             OIS,OIS-01,,OIS-01 ISMS,Objective text,,,\n\
             OIS,OIS-01,OIS-01.1B,, Do it ,x, ,x\n"
        );
        let path = write(tmp.path(), "controls.csv", &content);

        let wb = Workbook::open(&path).unwrap();
        let rows = wb.controls_sheet("controls").unwrap().rows().unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].category.as_deref(), Some("OIS"));
        assert_eq!(rows[0].control, None);
        assert_eq!(rows[1].description.as_deref(), Some("Objective text"));
        assert_eq!(rows[2].description.as_deref(), Some("Do it"));
        assert!(rows[2].basic.is_some());
        assert!(rows[2].substantial.is_none());
        assert!(rows[2].high.is_some());
    }

    #[test]
    fn test_plain_column_names_accepted() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "controls.csv",
            "category,CONTROL,Requirement,title,description,basic,substantial,high\nC1,,,Cat,,,,\n",
        );

        let rows = Workbook::open(&path)
            .unwrap()
            .controls_sheet("controls")
            .unwrap()
            .rows()
            .unwrap();

        assert_eq!(rows[0].title.as_deref(), Some("Cat"));
    }

    #[test]
    fn test_missing_column() {
        let tmp = TempDir::new().unwrap();
        let path = write(
            tmp.path(),
            "controls.csv",
            "Category,Control,Requirement,Title,Description,Basic,Substantial\n",
        );

        let wb = Workbook::open(&path).unwrap();
        let err = wb.controls_sheet("controls").unwrap().rows().unwrap_err();

        match err {
            WorkbookError::MissingColumn { column, .. } => assert_eq!(column, "High"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
