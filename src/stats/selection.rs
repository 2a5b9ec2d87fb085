//! Campus/term filters and the dataset selection rule.

use crate::data::schema;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Campus filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Campus {
    WestLafayette,
    Indianapolis,
}

impl Campus {
    pub const ALL: [Campus; 2] = [Campus::WestLafayette, Campus::Indianapolis];

    /// Campus code as it appears in the roster `CAMPUS` column.
    pub fn code(self) -> &'static str {
        match self {
            Campus::WestLafayette => "PWL",
            Campus::Indianapolis => "PIN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Campus::WestLafayette => "West Lafayette",
            Campus::Indianapolis => "Indianapolis",
        }
    }

}

/// Term filter values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TermFilter {
    Fall,
    Spring,
    All,
}

impl TermFilter {
    pub const ALL: [TermFilter; 3] = [TermFilter::Fall, TermFilter::Spring, TermFilter::All];

    pub fn label(self, labels: &TermLabels) -> &str {
        match self {
            TermFilter::Fall => &labels.fall,
            TermFilter::Spring => &labels.spring,
            TermFilter::All => "All",
        }
    }
}

/// Display names of the two loaded terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermLabels {
    pub fall: String,
    pub spring: String,
}

impl Default for TermLabels {
    fn default() -> Self {
        Self {
            fall: "Fall 2024".to_string(),
            spring: "Spring 2025".to_string(),
        }
    }
}

/// Pick the rows a `(campus, term)` filter pair refers to.
///
/// Only a set campus together with a set term narrows the data. Every other
/// combination falls back to the whole Fall table. `All` stacks Fall and
/// Spring (no dedup) before the campus filter applies. The error path only
/// carries Polars failures on malformed tables.
pub fn select(
    fall: &DataFrame,
    spring: &DataFrame,
    campus: Option<Campus>,
    term: Option<TermFilter>,
) -> PolarsResult<DataFrame> {
    let (Some(campus), Some(term)) = (campus, term) else {
        debug!(?campus, ?term, "incomplete filter, using full Fall table");
        return Ok(fall.clone());
    };

    let source = match term {
        TermFilter::Fall => fall.clone(),
        TermFilter::Spring => spring.clone(),
        TermFilter::All => fall.vstack(spring)?,
    };

    let selected = filter_campus(&source, campus.code())?;
    debug!(
        campus = campus.code(),
        ?term,
        rows = selected.height(),
        "selected rows"
    );
    Ok(selected)
}

/// Rows of a normalized table whose campus equals `code`.
pub fn filter_campus(df: &DataFrame, code: &str) -> PolarsResult<DataFrame> {
    df.clone()
        .lazy()
        .filter(col(schema::CAMPUS).eq(lit(code)))
        .collect()
}
