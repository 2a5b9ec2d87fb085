//! Synthetic rosters shared by the test suites.

use crate::data::RosterProcessor;
use polars::prelude::*;

/// A raw roster with the administrative columns a real export carries.
pub fn raw_roster() -> DataFrame {
    df!(
        "ACADEMIC_PERIOD" => &["202510", "202510", "202510"],
        "Subject" => &["CS", "MA", "CS"],
        "COURSE" => &[18000i64, 26100, 18000],
        "CAMPUS" => &["PWL", "PIN", "PWL"],
        "DEPARTMENT" => &["CS", "MATH", "CS"],
        "DEPARTMENT_DESC" => &["Computer Science", "Mathematics", "Computer Science"],
        "Sec-CRN" => &["001-12345", "002-23456", "003-34567"],
        "ROOM" => &["101", "B12", "220"],
        "INSTRUCTOR_ID" => &["0011", "0042", "0011"],
        "Instructor" => &["Smith", "Jones", "Smith"],
        "INSTR_TYPE" => &["LEC", "LAB", "LEC"],
        "ENRL(RE,RW,RT,RC,AU)" => &[30i64, 12, 5],
        "LIMIT" => &[35i64, 10, 0],
        "WAITLIST_COUNT" => &[0i64, 3, 0],
    )
    .expect("fixture roster")
}

/// Build a raw roster from `(subject, course, campus, department, instructor,
/// type, enrolled, limit)` rows.
pub fn roster_from_rows(rows: &[(&str, i64, &str, &str, &str, &str, i64, i64)]) -> DataFrame {
    df!(
        "Subject" => rows.iter().map(|r| r.0).collect::<Vec<_>>(),
        "COURSE" => rows.iter().map(|r| r.1).collect::<Vec<_>>(),
        "CAMPUS" => rows.iter().map(|r| r.2).collect::<Vec<_>>(),
        "DEPARTMENT_DESC" => rows.iter().map(|r| r.3).collect::<Vec<_>>(),
        "Instructor" => rows.iter().map(|r| r.4).collect::<Vec<_>>(),
        "INSTR_TYPE" => rows.iter().map(|r| r.5).collect::<Vec<_>>(),
        "ENRL(RE,RW,RT,RC,AU)" => rows.iter().map(|r| r.6).collect::<Vec<_>>(),
        "LIMIT" => rows.iter().map(|r| r.7).collect::<Vec<_>>(),
    )
    .expect("fixture roster")
}

/// Two tiny normalized terms, each with one PWL and one PIN row.
pub fn normalized_terms() -> (DataFrame, DataFrame) {
    let fall = roster_from_rows(&[
        ("CS", 18000, "PWL", "Computer Science", "Smith", "LEC", 30, 35),
        ("MA", 26100, "PIN", "Mathematics", "Jones", "LAB", 12, 10),
    ]);
    let spring = roster_from_rows(&[
        ("CS", 18200, "PWL", "Computer Science", "Smith", "LEC", 40, 35),
        ("PHYS", 17200, "PIN", "Physics", "Lee", "LEC", 20, 24),
    ]);

    (
        RosterProcessor::normalize(&fall).expect("normalize fall"),
        RosterProcessor::normalize(&spring).expect("normalize spring"),
    )
}
