//! Per-filter load report recomputed on every filter change.

use crate::data::TermTables;
use crate::stats::{
    select, Campus, DepartmentAggregate, InstructorAggregate, LoadAggregator, TermFilter,
};
use polars::prelude::PolarsResult;
use tracing::debug;

/// Everything the dashboard shows for one `(campus, term)` selection.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub campus: Option<Campus>,
    pub term: Option<TermFilter>,
    pub selected_rows: usize,
    pub departments: Vec<DepartmentAggregate>,
    pub instructor_rows: Vec<InstructorAggregate>,
    pub instructors: Vec<String>,
}

impl LoadReport {
    pub fn build(
        tables: &TermTables,
        campus: Option<Campus>,
        term: Option<TermFilter>,
    ) -> PolarsResult<Self> {
        let selected = select(&tables.fall, &tables.spring, campus, term)?;
        let departments = LoadAggregator::aggregate_by_department(&selected)?;
        let instructor_rows = LoadAggregator::aggregate_by_instructor(&selected, campus)?;
        let instructors = LoadAggregator::instructor_names(&instructor_rows);

        debug!(
            rows = selected.height(),
            departments = departments.len(),
            instructors = instructors.len(),
            "built load report"
        );

        Ok(Self {
            campus,
            term,
            selected_rows: selected.height(),
            departments,
            instructor_rows,
            instructors,
        })
    }

    /// Total enrollment across all departments in the selection.
    pub fn department_total(&self) -> i64 {
        self.departments.iter().map(|d| d.total_enrolled).sum()
    }

    pub fn rows_for(&self, instructor: &str) -> Vec<InstructorAggregate> {
        LoadAggregator::rows_for_instructor(&self.instructor_rows, instructor)
    }
}
