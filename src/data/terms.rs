//! Loads and normalizes both term rosters.

use crate::data::cache::NormalizeCache;
use crate::data::loader::{LoaderError, RosterLoader};
use crate::data::processor::ProcessorError;
use polars::prelude::DataFrame;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum TermLoadError {
    #[error("{term} roster: {source}")]
    Load {
        term: &'static str,
        source: LoaderError,
    },
    #[error("{term} roster: {source}")]
    Normalize {
        term: &'static str,
        source: ProcessorError,
    },
}

/// Normalized Fall and Spring tables, shared read-only.
#[derive(Debug, Clone)]
pub struct TermTables {
    pub fall: Arc<DataFrame>,
    pub spring: Arc<DataFrame>,
}

/// Load both rosters in parallel and normalize them through `cache`.
pub fn load_terms(
    fall_path: &Path,
    spring_path: &Path,
    cache: &NormalizeCache,
) -> Result<TermTables, TermLoadError> {
    let (fall, spring) = rayon::join(
        || load_term("Fall", fall_path, cache),
        || load_term("Spring", spring_path, cache),
    );
    let tables = TermTables {
        fall: fall?,
        spring: spring?,
    };

    info!(
        fall_rows = tables.fall.height(),
        spring_rows = tables.spring.height(),
        "normalized term rosters"
    );
    Ok(tables)
}

fn load_term(
    term: &'static str,
    path: &Path,
    cache: &NormalizeCache,
) -> Result<Arc<DataFrame>, TermLoadError> {
    let raw = RosterLoader::load(path).map_err(|source| TermLoadError::Load { term, source })?;
    let normalized = cache
        .get_or_normalize(&raw.digest, &raw.df)
        .map_err(|source| TermLoadError::Normalize { term, source })?;
    info!(term, path = %raw.path.display(), rows = normalized.height(), "normalized roster");
    Ok(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "Subject,COURSE,CAMPUS,DEPARTMENT_DESC,Instructor,INSTR_TYPE,\"ENRL(RE,RW,RT,RC,AU)\",LIMIT,ROOM";

    fn write_roster(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{}", HEADER).unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_terms_normalizes_both_files() {
        let fall = write_roster(&[
            "CS,18000,PWL,Computer Science,Smith,LEC,30,35,101",
            "MA,26100,PIN,Mathematics,Jones,LAB,12,10,B12",
        ]);
        let spring = write_roster(&["CS,18200,PWL,Computer Science,Smith,LEC,40,35,220"]);
        let cache = NormalizeCache::new();

        let tables = load_terms(fall.path(), spring.path(), &cache).unwrap();
        assert_eq!(tables.fall.height(), 2);
        assert_eq!(tables.spring.height(), 1);
        assert_eq!(tables.fall.width(), 7);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_identical_files_share_one_cache_entry() {
        let fall = write_roster(&["CS,18000,PWL,Computer Science,Smith,LEC,30,35,101"]);
        let spring = write_roster(&["CS,18000,PWL,Computer Science,Smith,LEC,30,35,101"]);
        let cache = NormalizeCache::new();

        let tables = load_terms(fall.path(), spring.path(), &cache).unwrap();
        assert!(tables.fall.equals(&tables.spring));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_schema_error_names_the_term() {
        let fall = write_roster(&["CS,18000,PWL,Computer Science,Smith,LEC,30,35,101"]);
        let mut spring = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(spring, "Subject,COURSE,CAMPUS").unwrap();
        writeln!(spring, "CS,18000,PWL").unwrap();
        spring.flush().unwrap();

        let err = load_terms(fall.path(), spring.path(), &NormalizeCache::new()).unwrap_err();
        assert!(matches!(
            err,
            TermLoadError::Normalize {
                term: "Spring",
                source: ProcessorError::SchemaError(_)
            }
        ));
    }
}
