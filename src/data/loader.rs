//! Roster Loader Module
//! Reads term roster exports (spreadsheet workbooks or CSV) into Polars frames.

use crate::data::cache::content_hash;
use calamine::{Data, Range, Reader};
use polars::prelude::*;
use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse roster: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to read workbook: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("Unsupported roster format: {0}")]
    UnsupportedFormat(String),
    #[error("Workbook has no worksheets")]
    NoSheets,
    #[error("Worksheet is empty")]
    EmptySheet,
}

/// Source format of a roster export.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterFormat {
    Csv,
    Workbook,
}

impl RosterFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(RosterFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(RosterFormat::Workbook),
            _ => Err(LoaderError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// A raw roster as read from disk, tagged with the digest of its bytes.
#[derive(Debug, Clone)]
pub struct RawRoster {
    pub df: DataFrame,
    pub digest: String,
    pub path: PathBuf,
}

/// Loads raw roster exports.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster file. The first row is the header.
    pub fn load(path: &Path) -> Result<RawRoster, LoaderError> {
        let format = RosterFormat::from_path(path)?;
        let bytes = fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let digest = content_hash(&bytes);
        debug!(path = %path.display(), %digest, "read roster bytes");

        let df = Self::parse(bytes, format)?;
        info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded roster"
        );

        Ok(RawRoster {
            df,
            digest,
            path: path.to_path_buf(),
        })
    }

    /// Parse roster bytes of a known format.
    pub fn parse(bytes: Vec<u8>, format: RosterFormat) -> Result<DataFrame, LoaderError> {
        match format {
            RosterFormat::Csv => Self::parse_csv(bytes),
            RosterFormat::Workbook => Self::parse_workbook(bytes),
        }
    }

    fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            // Full-file inference keeps a late text cell from being read as null
            .with_infer_schema_length(None)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    fn parse_workbook(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;

        // Rosters are single-sheet exports
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or(LoaderError::NoSheets)?;
        let range = workbook.worksheet_range(&sheet_name)?;

        Self::frame_from_range(&range)
    }

    /// Build a frame from a worksheet range, inferring one dtype per column.
    pub fn frame_from_range(range: &Range<Data>) -> Result<DataFrame, LoaderError> {
        let mut rows = range.rows();
        let header = rows.next().ok_or(LoaderError::EmptySheet)?;
        let body: Vec<&[Data]> = rows.collect();

        let columns = header
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let name = match name.to_string().trim() {
                    "" => format!("column_{}", idx + 1),
                    trimmed => trimmed.to_string(),
                };
                let cells: Vec<&Data> = body
                    .iter()
                    .map(|row| row.get(idx).unwrap_or(EMPTY_CELL))
                    .collect();
                Self::build_column(&name, &cells)
            })
            .collect::<Vec<Column>>();

        if columns.is_empty() {
            return Err(LoaderError::EmptySheet);
        }

        Ok(DataFrame::new(columns)?)
    }

    fn build_column(name: &str, cells: &[&Data]) -> Column {
        match CellKind::infer(cells) {
            CellKind::Int => {
                let values: Vec<Option<i64>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Data::Int(i) => Some(*i),
                        Data::Float(f) => Some(*f as i64),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            CellKind::Float => {
                let values: Vec<Option<f64>> = cells
                    .iter()
                    .map(|cell| match cell {
                        Data::Int(i) => Some(*i as f64),
                        Data::Float(f) => Some(*f),
                        _ => None,
                    })
                    .collect();
                Column::new(name.into(), values)
            }
            CellKind::Text => {
                let values: Vec<Option<String>> =
                    cells.iter().map(|cell| cell_text(cell)).collect();
                Column::new(name.into(), values)
            }
        }
    }
}

const EMPTY_CELL: &Data = &Data::Empty;

/// Column dtype inferred from worksheet cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Int,
    Float,
    Text,
}

impl CellKind {
    fn infer(cells: &[&Data]) -> Self {
        let mut kind = CellKind::Int;
        for cell in cells {
            match cell {
                Data::Empty => {}
                Data::Int(_) => {}
                Data::Float(f) if f.fract() == 0.0 => {}
                Data::Float(_) => kind = CellKind::Float,
                _ => return CellKind::Text,
            }
        }
        kind
    }
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::Int(i) => Some(i.to_string()),
        Data::Float(f) if f.fract() == 0.0 => Some((*f as i64).to_string()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{self, raw};
    use crate::data::{count_values, text_values, RosterProcessor};
    use rust_xlsxwriter::Workbook;
    use std::io::Write;

    fn sheet(cells: &[&[Data]]) -> Range<Data> {
        let height = cells.len() as u32;
        let width = cells.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), cell.clone());
            }
        }
        range
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            RosterFormat::from_path(Path::new("Fall-2024-PIN-PWL.xlsx")).unwrap(),
            RosterFormat::Workbook
        );
        assert_eq!(
            RosterFormat::from_path(Path::new("spring.CSV")).unwrap(),
            RosterFormat::Csv
        );
        assert!(matches!(
            RosterFormat::from_path(Path::new("roster.json")),
            Err(LoaderError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_frame_from_range_infers_column_types() {
        let range = sheet(&[
            &[
                Data::String("Subject".into()),
                Data::String("COURSE".into()),
                Data::String("Ratio".into()),
                Data::String("ROOM".into()),
            ],
            &[
                Data::String("CS".into()),
                Data::Float(18000.0),
                Data::Float(0.5),
                Data::Float(101.0),
            ],
            &[
                Data::String("MA".into()),
                Data::Int(26100),
                Data::Empty,
                Data::String("B12".into()),
            ],
        ]);

        let df = RosterLoader::frame_from_range(&range).unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("Subject").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("COURSE").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("Ratio").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("ROOM").unwrap().dtype(), &DataType::String);

        let rooms = df
            .column("ROOM")
            .unwrap()
            .as_materialized_series()
            .str()
            .unwrap()
            .clone();
        assert_eq!(rooms.get(0), Some("101"));
        assert_eq!(rooms.get(1), Some("B12"));
    }

    #[test]
    fn test_header_only_sheet_gives_empty_frame() {
        let range = sheet(&[&[Data::String("Subject".into()), Data::String("COURSE".into())]]);
        let df = RosterLoader::frame_from_range(&range).unwrap();
        assert_eq!(df.height(), 0);
        assert_eq!(df.width(), 2);
    }

    #[test]
    fn test_load_csv_roster_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "Subject,COURSE,CAMPUS,DEPARTMENT_DESC,Instructor,INSTR_TYPE,\"ENRL(RE,RW,RT,RC,AU)\",LIMIT"
        )
        .unwrap();
        writeln!(file, "CS,18000,PWL,Computer Science,Smith,LEC,30,35").unwrap();
        writeln!(file, "MA,26100,PIN,Mathematics,Jones,LAB,12,10").unwrap();
        file.flush().unwrap();

        let roster = RosterLoader::load(file.path()).unwrap();
        assert_eq!(roster.df.height(), 2);
        assert!(roster.df.column("ENRL(RE,RW,RT,RC,AU)").is_ok());
        assert_eq!(roster.digest.len(), 64);
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = RosterLoader::load(Path::new("/nonexistent/roster.csv")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/roster.csv"));
    }

    #[test]
    fn test_load_xlsx_roster_from_disk() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (col, name) in raw::REQUIRED.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }
        let rows = [
            ("CS", 18000, "PWL", "Computer Science", "Smith", "LEC", 30, 35),
            ("MA", 26100, "PIN", "Mathematics", "Jones", "LAB", 12, 10),
        ];
        for (i, r) in rows.iter().enumerate() {
            let row = i as u32 + 1;
            sheet.write_string(row, 0, r.0).unwrap();
            sheet.write_number(row, 1, r.1).unwrap();
            sheet.write_string(row, 2, r.2).unwrap();
            sheet.write_string(row, 3, r.3).unwrap();
            sheet.write_string(row, 4, r.4).unwrap();
            sheet.write_string(row, 5, r.5).unwrap();
            sheet.write_number(row, 6, r.6).unwrap();
            sheet.write_number(row, 7, r.7).unwrap();
        }
        workbook.save(file.path()).unwrap();

        let roster = RosterLoader::load(file.path()).unwrap();
        assert_eq!(roster.df.height(), 2);
        assert_eq!(roster.df.column(raw::COURSE).unwrap().dtype(), &DataType::Int64);

        let normalized = RosterProcessor::normalize(&roster.df).unwrap();
        let ids = text_values(normalized.column(schema::IDENTIFIER).unwrap()).unwrap();
        assert_eq!(ids, vec!["CS-18000", "MA-26100"]);
        let enrolled = count_values(
            normalized.column(schema::ENROLLED_COUNT).unwrap(),
            schema::ENROLLED_COUNT,
        )
        .unwrap();
        assert_eq!(enrolled, vec![30, 12]);
    }

    #[test]
    fn test_empty_worksheet_is_rejected() {
        let file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        workbook.save(file.path()).unwrap();

        assert!(matches!(
            RosterLoader::load(file.path()),
            Err(LoaderError::EmptySheet)
        ));
    }

    #[test]
    fn test_corrupt_workbook_is_rejected() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a workbook").unwrap();
        file.flush().unwrap();

        assert!(matches!(
            RosterLoader::load(file.path()),
            Err(LoaderError::Workbook(_))
        ));
    }
}
