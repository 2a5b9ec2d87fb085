//! Load Aggregator Module
//! Department and instructor enrollment totals over a selection.

use crate::data::schema;
use crate::data::{text_values, ProcessorError};
use crate::stats::selection::{filter_campus, Campus};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Total enrollment of one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentAggregate {
    pub department_desc: String,
    pub total_enrolled: i64,
}

/// Enrollment and capacity of one instructor's course offering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InstructorAggregate {
    pub instructor: String,
    pub identifier: String,
    pub campus: String,
    pub instruction_type: String,
    pub total_enrolled: i64,
    pub total_limit: i64,
}

impl InstructorAggregate {
    pub fn load_delta(&self) -> LoadDelta {
        LoadDelta::new(self.total_enrolled, self.total_limit)
    }
}

/// Whether a section is above, below or at its seat limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Over,
    Under,
    At,
}

/// Enrolled minus limit, with its sign classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadDelta {
    pub delta: i64,
    pub status: LoadStatus,
}

impl LoadDelta {
    pub fn new(enrolled: i64, limit: i64) -> Self {
        let delta = enrolled - limit;
        let status = match delta {
            d if d > 0 => LoadStatus::Over,
            d if d < 0 => LoadStatus::Under,
            _ => LoadStatus::At,
        };
        Self { delta, status }
    }

    /// Caption shown under a course metric.
    pub fn describe(&self) -> String {
        match self.status {
            LoadStatus::Over => format!("+{} over limit", self.delta),
            LoadStatus::Under => format!("{} under limit", self.delta),
            LoadStatus::At => "At limit".to_string(),
        }
    }
}

/// Computes load aggregates over normalized selections.
pub struct LoadAggregator;

impl LoadAggregator {
    /// Sum enrollment per department, sorted by department name.
    pub fn aggregate_by_department(selected: &DataFrame) -> PolarsResult<Vec<DepartmentAggregate>> {
        let grouped = selected
            .clone()
            .lazy()
            .group_by([col(schema::DEPARTMENT_DESC)])
            .agg([col(schema::ENROLLED_COUNT).sum()])
            .collect()?;

        let departments = text_values(grouped.column(schema::DEPARTMENT_DESC)?)?;
        let totals = totals(grouped.column(schema::ENROLLED_COUNT)?)?;

        let mut rows: Vec<DepartmentAggregate> = departments
            .into_iter()
            .zip(totals)
            .map(|(department_desc, total_enrolled)| DepartmentAggregate {
                department_desc,
                total_enrolled,
            })
            .collect();
        rows.sort_by(|a, b| a.department_desc.cmp(&b.department_desc));
        Ok(rows)
    }

    /// Sum enrollment and limit per (instructor, identifier, campus,
    /// instruction type), keeping only one campus.
    ///
    /// The campus kept is PWL when the filter is West Lafayette and PIN for
    /// anything else, including no campus filter at all.
    pub fn aggregate_by_instructor(
        selected: &DataFrame,
        campus: Option<Campus>,
    ) -> PolarsResult<Vec<InstructorAggregate>> {
        let grouped = selected
            .clone()
            .lazy()
            .group_by([
                col(schema::INSTRUCTOR),
                col(schema::IDENTIFIER),
                col(schema::CAMPUS),
                col(schema::INSTRUCTION_TYPE),
            ])
            .agg([
                col(schema::ENROLLED_COUNT).sum(),
                col(schema::SEAT_LIMIT).sum(),
            ])
            .collect()?;

        let kept = campus.unwrap_or_else(|| {
            debug!("no campus filter, instructor load defaults to PIN");
            Campus::Indianapolis
        });
        let filtered = filter_campus(&grouped, kept.code())?;

        let mut rows = instructor_rows(&filtered)?;
        rows.sort_by(|a, b| {
            (&a.instructor, &a.identifier, &a.campus, &a.instruction_type).cmp(&(
                &b.instructor,
                &b.identifier,
                &b.campus,
                &b.instruction_type,
            ))
        });
        Ok(rows)
    }

    /// Sorted distinct instructor names.
    pub fn instructor_names(rows: &[InstructorAggregate]) -> Vec<String> {
        let mut names: Vec<String> = rows.iter().map(|r| r.instructor.clone()).collect();
        names.sort();
        names.dedup();
        names
    }

    /// Rows belonging to one instructor.
    pub fn rows_for_instructor(rows: &[InstructorAggregate], instructor: &str) -> Vec<InstructorAggregate> {
        rows.iter()
            .filter(|r| r.instructor == instructor)
            .cloned()
            .collect()
    }
}

/// Read a frame with the instructor aggregate columns into typed rows.
pub fn instructor_rows(df: &DataFrame) -> PolarsResult<Vec<InstructorAggregate>> {
    let instructors = text_values(df.column(schema::INSTRUCTOR)?)?;
    let identifiers = text_values(df.column(schema::IDENTIFIER)?)?;
    let campuses = text_values(df.column(schema::CAMPUS)?)?;
    let types = text_values(df.column(schema::INSTRUCTION_TYPE)?)?;
    let enrolled = totals(df.column(schema::ENROLLED_COUNT)?)?;
    let limits = totals(df.column(schema::SEAT_LIMIT)?)?;

    Ok(instructors
        .into_iter()
        .zip(identifiers)
        .zip(campuses)
        .zip(types)
        .zip(enrolled.into_iter().zip(limits))
        .map(
            |((((instructor, identifier), campus), instruction_type), (total_enrolled, total_limit))| {
                InstructorAggregate {
                    instructor,
                    identifier,
                    campus,
                    instruction_type,
                    total_enrolled,
                    total_limit,
                }
            },
        )
        .collect())
}

fn totals(column: &Column) -> PolarsResult<Vec<i64>> {
    crate::data::count_values(column, column.name()).map_err(|e| match e {
        ProcessorError::PolarsError(e) => e,
        other => PolarsError::ComputeError(other.to_string().into()),
    })
}
