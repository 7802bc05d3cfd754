//! Placement rules: which roles may occupy which columns.
//!
//! A column is a support column when its identifier is `PCA` or ends in
//! `PCA`. Physiotherapists never go in support columns and support staff
//! only go in support columns. Every roster mutation is checked here first.

use crate::error::PlacementError;
use crate::models::{ColumnId, StaffMember, StaffRole};

pub const PT_IN_SUPPORT_COLUMN: &str =
    "Physiotherapists (PT) cannot be placed in the PCA column.";

pub const SUPPORT_IN_PT_COLUMN: &str = "Support staff (PCA) cannot be placed in PT columns.";

/// Result of checking one staff/column pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub valid: bool,
    pub reason: Option<&'static str>,
}

impl Validation {
    fn accepted() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    fn rejected(reason: &'static str) -> Self {
        Self {
            valid: false,
            reason: Some(reason),
        }
    }

    pub fn into_result(self) -> Result<(), PlacementError> {
        match self.reason {
            Some(reason) if !self.valid => Err(PlacementError::Rejected(reason.to_string())),
            _ => Ok(()),
        }
    }
}

pub fn is_support_column(column_id: &str) -> bool {
    column_id == "PCA" || column_id.ends_with("PCA")
}

/// Check whether `staff` may occupy the column with raw identifier `column_id`.
///
/// Total over arbitrary strings, so it can be applied to ids that do not
/// name a known column.
pub fn validate(staff: &StaffMember, column_id: &str) -> Validation {
    let support_column = is_support_column(column_id);
    match staff.role {
        StaffRole::Pt if support_column => Validation::rejected(PT_IN_SUPPORT_COLUMN),
        StaffRole::Support if !support_column => Validation::rejected(SUPPORT_IN_PT_COLUMN),
        _ => Validation::accepted(),
    }
}

pub fn validate_column(staff: &StaffMember, column: ColumnId) -> Validation {
    validate(staff, column.as_str())
}
