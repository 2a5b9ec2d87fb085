//! Instructor CSV Export Module
//! Encodes instructor aggregates as UTF-8 CSV for download.

use crate::data::schema;
#[cfg(test)]
use crate::stats::instructor_rows;
use crate::stats::{Campus, InstructorAggregate, TermFilter, TermLabels};
use polars::prelude::*;
#[cfg(test)]
use std::io::Cursor;
#[cfg(test)]
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to encode CSV: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to fingerprint rows: {0}")]
    Fingerprint(#[from] serde_json::Error),
    #[error("Failed to write export: {0}")]
    Io(#[from] std::io::Error),
}

/// CSV codec for instructor extracts.
pub struct InstructorCsv;

impl InstructorCsv {
    /// Encode rows as CSV with a header row.
    pub fn encode(rows: &[InstructorAggregate]) -> Result<Vec<u8>, ExportError> {
        let mut df = DataFrame::new(vec![
            Column::new(
                schema::INSTRUCTOR.into(),
                rows.iter().map(|r| r.instructor.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::IDENTIFIER.into(),
                rows.iter().map(|r| r.identifier.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::CAMPUS.into(),
                rows.iter().map(|r| r.campus.as_str()).collect::<Vec<_>>(),
            ),
            Column::new(
                schema::INSTRUCTION_TYPE.into(),
                rows.iter()
                    .map(|r| r.instruction_type.as_str())
                    .collect::<Vec<_>>(),
            ),
            Column::new(
                schema::ENROLLED_COUNT.into(),
                rows.iter().map(|r| r.total_enrolled).collect::<Vec<i64>>(),
            ),
            Column::new(
                schema::SEAT_LIMIT.into(),
                rows.iter().map(|r| r.total_limit).collect::<Vec<i64>>(),
            ),
        ])?;

        let mut buffer: Vec<u8> = Vec::new();
        CsvWriter::new(&mut buffer)
            .include_header(true)
            .finish(&mut df)?;
        Ok(buffer)
    }

    /// Parse an extract produced by [`InstructorCsv::encode`]. Key columns are
    /// read as text so values like `01` survive unchanged.
    #[cfg(test)]
    pub fn decode(bytes: &[u8]) -> Result<Vec<InstructorAggregate>, ExportError> {
        let text_columns = Schema::from_iter(
            [
                schema::INSTRUCTOR,
                schema::IDENTIFIER,
                schema::CAMPUS,
                schema::INSTRUCTION_TYPE,
            ]
            .into_iter()
            .map(|name| Field::new(name.into(), DataType::String)),
        );
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_schema_overwrite(Some(Arc::new(text_columns)))
            .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
            .finish()?;
        Ok(instructor_rows(&df)?)
    }

    /// Download filename: `{instructor}-{campus_label}-{term_label}.csv`.
    /// Unset filters render as `None`.
    pub fn file_name(
        instructor: &str,
        campus: Option<Campus>,
        term: Option<TermFilter>,
        labels: &TermLabels,
    ) -> String {
        let campus_label = campus.map(|c| c.label()).unwrap_or("None");
        let term_label = term.map(|t| t.label(labels)).unwrap_or("None");
        let name = format!("{}-{}-{}.csv", instructor, campus_label, term_label);
        name.replace(['/', '\\'], "_")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> TermLabels {
        TermLabels {
            fall: "Fall 2024".to_string(),
            spring: "Spring 2025".to_string(),
        }
    }

    fn row(identifier: &str, instruction_type: &str, enrolled: i64, limit: i64) -> InstructorAggregate {
        InstructorAggregate {
            instructor: "Smith, Jane".to_string(),
            identifier: identifier.to_string(),
            campus: "PWL".to_string(),
            instruction_type: instruction_type.to_string(),
            total_enrolled: enrolled,
            total_limit: limit,
        }
    }

    #[test]
    fn test_encode_writes_header_and_rows() {
        let csv = InstructorCsv::encode(&[row("CS-18000", "LEC", 35, 35)]).unwrap();
        let text = String::from_utf8(csv).unwrap();
        let mut lines = text.lines();

        assert_eq!(
            lines.next(),
            Some("instructor,identifier,campus,instruction_type,enrolled_count,seat_limit")
        );
        assert_eq!(lines.next(), Some("\"Smith, Jane\",CS-18000,PWL,LEC,35,35"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_csv_round_trip_preserves_rows() {
        let rows = vec![
            row("CS-18000", "LEC", 35, 35),
            row("CS-18000", "LAB", 22, 24),
            row("CS-25100", "LEC", 140, 120),
        ];

        let decoded = InstructorCsv::decode(&InstructorCsv::encode(&rows).unwrap()).unwrap();
        assert_eq!(decoded, rows);
    }

    #[test]
    fn test_round_trip_keeps_numeric_looking_text() {
        let mut coded = row("CS-18000", "01", 12, 15);
        coded.instructor = "007".to_string();
        let rows = vec![coded];

        let decoded = InstructorCsv::decode(&InstructorCsv::encode(&rows).unwrap()).unwrap();
        assert_eq!(decoded, rows);
        assert_eq!(decoded[0].instruction_type, "01");
    }

    #[test]
    fn test_file_name_uses_filter_labels() {
        assert_eq!(
            InstructorCsv::file_name(
                "Smith",
                Some(Campus::WestLafayette),
                Some(TermFilter::All),
                &labels()
            ),
            "Smith-West Lafayette-All.csv"
        );
        assert_eq!(
            InstructorCsv::file_name("Smith", Some(Campus::Indianapolis), Some(TermFilter::Spring), &labels()),
            "Smith-Indianapolis-Spring 2025.csv"
        );
    }

    #[test]
    fn test_file_name_for_unset_filters() {
        assert_eq!(
            InstructorCsv::file_name("Lee", None, None, &labels()),
            "Lee-None-None.csv"
        );
    }

    #[test]
    fn test_file_name_strips_path_separators() {
        assert_eq!(
            InstructorCsv::file_name("TBA/Staff", None, Some(TermFilter::Fall), &labels()),
            "TBA_Staff-None-Fall 2024.csv"
        );
    }
}
