//! Physio FTE: each physiotherapist placement is a quarter day.

use crate::models::StaffDirectory;
use crate::roster::RosterState;

pub const FTE_PER_PLACEMENT: f64 = 0.25;

/// Count placements of PT-role staff across all cells.
///
/// An id placed in several cells counts once per cell. Ids that do not
/// resolve in the directory are ignored.
pub fn physio_placements(roster: &RosterState, directory: &StaffDirectory) -> usize {
    roster
        .placements()
        .filter(|id| directory.get(id).is_some_and(|m| m.is_physio()))
        .count()
}

pub fn physio_fte(roster: &RosterState, directory: &StaffDirectory) -> f64 {
    physio_placements(roster, directory) as f64 * FTE_PER_PLACEMENT
}

/// Two-decimal display form, e.g. `0.75`.
pub fn format_fte(fte: f64) -> String {
    format!("{:.2}", fte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellId, ColumnId};

    fn cell(s: &str) -> CellId {
        s.parse().unwrap()
    }

    #[test]
    fn test_three_physio_placements_is_three_quarters() {
        let directory = StaffDirectory::builtin();
        let mut roster = RosterState::new();
        roster.toggle(cell("1st-T1_PTI"), "p1");
        roster.toggle(cell("2nd-T1_PTI"), "p1");
        roster.toggle(cell("1st-T2_PTII"), "p2");
        // Support staff do not count
        roster.toggle(cell("1st-PCA"), "s1");

        assert_eq!(physio_placements(&roster, &directory), 3);
        assert_eq!(physio_fte(&roster, &directory), 0.75);
    }

    #[test]
    fn test_empty_roster_is_zero() {
        let directory = StaffDirectory::builtin();
        assert_eq!(physio_fte(&RosterState::new(), &directory), 0.0);
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let directory = StaffDirectory::builtin();
        let mut roster = RosterState::new();
        roster.toggle(cell("1st-T1_PTI"), "departed");
        roster.stamp_column(ColumnId::T2PtI, "p4");
        assert_eq!(physio_fte(&roster, &directory), 1.0);
    }

    #[test]
    fn test_format_fte() {
        assert_eq!(format_fte(0.75), "0.75");
        assert_eq!(format_fte(2.0), "2.00");
        assert_eq!(format_fte(0.0), "0.00");
    }
}
