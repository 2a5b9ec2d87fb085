//! Stats module - selection, aggregation and load reports

mod aggregator;
mod report;
pub mod selection;

pub use aggregator::{
    instructor_rows, DepartmentAggregate, InstructorAggregate, LoadAggregator, LoadStatus,
};
pub use report::LoadReport;
pub use selection::{select, Campus, TermFilter, TermLabels};
