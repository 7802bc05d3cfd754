use thiserror::Error;

/// Why a placement did not change the roster.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlacementError {
    #[error("Select a staff member to assign first")]
    NothingArmed,

    #[error("Unknown staff member: {0}")]
    UnknownStaff(String),

    /// The placement validator refused the staff/column pair.
    #[error("{0}")]
    Rejected(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown session: {0}")]
    UnknownSession(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Malformed cell id: {0}")]
    MalformedCellId(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("Duplicate staff id: {0}")]
    DuplicateId(String),

    #[error("Staff member '{0}' has an empty id")]
    EmptyId(String),
}
