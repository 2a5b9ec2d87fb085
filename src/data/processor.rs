//! Roster Processor Module
//! Normalizes raw term rosters into the common reporting schema.

use crate::data::schema::{self, raw};
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Roster is missing required columns: {}", .0.join(", "))]
    SchemaError(Vec<String>),
    #[error("Negative value {value} in column {column} at row {row}")]
    NegativeCount {
        column: String,
        row: usize,
        value: i64,
    },
    #[error("Value {value:?} in column {column} at row {row} is not a whole count")]
    InvalidCount {
        column: String,
        row: usize,
        value: String,
    },
}

/// Turns raw roster tables into normalized tables.
pub struct RosterProcessor;

impl RosterProcessor {
    /// Normalize a raw roster.
    ///
    /// Output columns: [identifier, campus, department_desc, instructor,
    /// instruction_type, enrolled_count, seat_limit]. The input frame is only
    /// read; every output column is freshly built.
    pub fn normalize(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        Self::check_schema(df)?;

        let subjects = text_values(df.column(raw::SUBJECT)?)?;
        let courses = text_values(df.column(raw::COURSE)?)?;
        let identifiers: Vec<String> = subjects
            .iter()
            .zip(courses.iter())
            .map(|(subject, course)| format!("{}-{}", subject, course))
            .collect();

        let normalized = DataFrame::new(vec![
            Column::new(schema::IDENTIFIER.into(), identifiers),
            Column::new(schema::CAMPUS.into(), text_values(df.column(raw::CAMPUS)?)?),
            Column::new(
                schema::DEPARTMENT_DESC.into(),
                text_values(df.column(raw::DEPARTMENT_DESC)?)?,
            ),
            Column::new(
                schema::INSTRUCTOR.into(),
                text_values(df.column(raw::INSTRUCTOR)?)?,
            ),
            Column::new(
                schema::INSTRUCTION_TYPE.into(),
                text_values(df.column(raw::INSTR_TYPE)?)?,
            ),
            Column::new(
                schema::ENROLLED_COUNT.into(),
                count_values(df.column(raw::ENROLLED)?, raw::ENROLLED)?,
            ),
            Column::new(
                schema::SEAT_LIMIT.into(),
                count_values(df.column(raw::LIMIT)?, raw::LIMIT)?,
            ),
        ])?;

        Ok(normalized)
    }

    /// Fail with every missing required column at once.
    pub fn check_schema(df: &DataFrame) -> Result<(), ProcessorError> {
        let missing: Vec<String> = raw::REQUIRED
            .iter()
            .filter(|name| df.get_column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ProcessorError::SchemaError(missing))
        }
    }
}

/// Coerce a column to text. Integral floats render without a fractional part
/// so a course number read as 101.0 from one export and 101 from another
/// yields the same identifier. Nulls become empty strings.
pub(crate) fn text_values(column: &Column) -> PolarsResult<Vec<String>> {
    let series = column.as_materialized_series();
    match series.dtype() {
        DataType::Float32 | DataType::Float64 => {
            let floats = series.cast(&DataType::Float64)?;
            Ok(floats
                .f64()?
                .into_iter()
                .map(|v| match v {
                    Some(v) if v.fract() == 0.0 && v.abs() < i64::MAX as f64 => {
                        (v as i64).to_string()
                    }
                    Some(v) => v.to_string(),
                    None => String::new(),
                })
                .collect())
        }
        _ => {
            let text = series.cast(&DataType::String)?;
            Ok(text
                .str()?
                .into_iter()
                .map(|v| v.unwrap_or_default().trim().to_string())
                .collect())
        }
    }
}

/// Coerce a column to non-negative counts. Blank cells count as zero; any
/// other cell must hold a whole number.
pub(crate) fn count_values(column: &Column, name: &str) -> Result<Vec<i64>, ProcessorError> {
    text_values(column)?
        .into_iter()
        .enumerate()
        .map(|(row, text)| {
            if text.is_empty() {
                return Ok(0);
            }
            match text.parse::<i64>() {
                Ok(value) if value < 0 => Err(ProcessorError::NegativeCount {
                    column: name.to_string(),
                    row,
                    value,
                }),
                Ok(value) => Ok(value),
                Err(_) => Err(ProcessorError::InvalidCount {
                    column: name.to_string(),
                    row,
                    value: text,
                }),
            }
        })
        .collect()
}
