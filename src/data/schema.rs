//! Column names of the raw roster exports and of the normalized table.

/// Raw roster export headers.
pub mod raw {
    pub const SUBJECT: &str = "Subject";
    pub const COURSE: &str = "COURSE";
    pub const CAMPUS: &str = "CAMPUS";
    pub const DEPARTMENT_DESC: &str = "DEPARTMENT_DESC";
    pub const INSTRUCTOR: &str = "Instructor";
    pub const INSTR_TYPE: &str = "INSTR_TYPE";
    pub const ENROLLED: &str = "ENRL(RE,RW,RT,RC,AU)";
    pub const LIMIT: &str = "LIMIT";

    /// Columns a roster must carry to be normalized.
    pub const REQUIRED: [&str; 8] = [
        SUBJECT,
        COURSE,
        CAMPUS,
        DEPARTMENT_DESC,
        INSTRUCTOR,
        INSTR_TYPE,
        ENROLLED,
        LIMIT,
    ];

    /// Administrative and logistics columns that never reach the report.
    #[cfg(test)]
    pub const DROPPED: [&str; 17] = [
        "ACADEMIC_PERIOD",
        "SUB_ACADEMIC_PERIOD",
        SUBJECT,
        COURSE,
        "DEPARTMENT",
        "Sec-CRN",
        "DAYS",
        "TIME",
        "BUILDING",
        "ROOM",
        "INSTRUCTOR_ID",
        "LASTNAME",
        "FIRSTNAME",
        "GROUPNBR",
        "Date",
        "WAITLIST_COUNT",
        "Waitlist remaining space",
    ];
}

pub const IDENTIFIER: &str = "identifier";
pub const CAMPUS: &str = "campus";
pub const DEPARTMENT_DESC: &str = "department_desc";
pub const INSTRUCTOR: &str = "instructor";
pub const INSTRUCTION_TYPE: &str = "instruction_type";
pub const ENROLLED_COUNT: &str = "enrolled_count";
pub const SEAT_LIMIT: &str = "seat_limit";

/// Columns of a normalized table, in output order.
#[cfg(test)]
pub const NORMALIZED: [&str; 7] = [
    IDENTIFIER,
    CAMPUS,
    DEPARTMENT_DESC,
    INSTRUCTOR,
    INSTRUCTION_TYPE,
    ENROLLED_COUNT,
    SEAT_LIMIT,
];
