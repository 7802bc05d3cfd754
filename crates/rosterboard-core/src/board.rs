//! The board aggregate: directory, roster, selection and role filter.
//!
//! Front ends drive the board exclusively through these operations so that
//! every roster mutation passes through the placement validator first.

use tracing::{debug, info};

use crate::error::PlacementError;
use crate::export::BoardSnapshot;
use crate::fte;
use crate::models::{CellId, ColumnId, StaffDirectory, StaffMember, StaffRole};
use crate::roster::{RosterState, Toggle};
use crate::selection::Selection;
use crate::validation;

/// What a successful placement did to the roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Assigned,
    Unassigned,
    /// Column-header placement; `added` is how many sessions gained the id.
    Stamped { added: usize },
}

#[derive(Debug, Clone)]
pub struct Board {
    directory: StaffDirectory,
    roster: RosterState,
    selection: Selection,
    role_filter: StaffRole,
}

impl Board {
    pub fn new(directory: StaffDirectory) -> Self {
        Self {
            directory,
            roster: RosterState::new(),
            selection: Selection::Idle,
            role_filter: StaffRole::Pt,
        }
    }

    pub fn directory(&self) -> &StaffDirectory {
        &self.directory
    }

    pub fn roster(&self) -> &RosterState {
        &self.roster
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn role_filter(&self) -> StaffRole {
        self.role_filter
    }

    /// The staff member currently armed for placement, if any.
    pub fn armed_staff(&self) -> Option<&StaffMember> {
        self.selection.armed().and_then(|id| self.directory.get(id))
    }

    /// Staff shown in the pool for the active role filter.
    pub fn visible_staff(&self) -> Vec<&StaffMember> {
        self.directory.by_role(self.role_filter)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a staff entry; selecting the armed entry again disarms it.
    pub fn select_staff(&mut self, id: &str) -> Result<(), PlacementError> {
        if self.directory.get(id).is_none() {
            return Err(PlacementError::UnknownStaff(id.to_string()));
        }
        self.selection.select(id);
        Ok(())
    }

    /// Switch the role tab. Always disarms, even when the tab is unchanged.
    pub fn set_role_filter(&mut self, role: StaffRole) {
        self.role_filter = role;
        self.selection.role_filter_changed();
    }

    // =========================================================================
    // Roster mutations
    // =========================================================================

    fn armed_for(&self, column: ColumnId) -> Result<&StaffMember, PlacementError> {
        let id = self.selection.armed().ok_or(PlacementError::NothingArmed)?;
        let staff = self
            .directory
            .get(id)
            .ok_or_else(|| PlacementError::UnknownStaff(id.to_string()))?;
        validation::validate_column(staff, column).into_result()?;
        Ok(staff)
    }

    /// Toggle the armed staff member in `cell`.
    pub fn place_in_cell(&mut self, cell: CellId) -> Result<PlacementOutcome, PlacementError> {
        let staff_id = self.armed_for(cell.column)?.id.clone();
        let outcome = match self.roster.toggle(cell, &staff_id) {
            Toggle::Assigned => PlacementOutcome::Assigned,
            Toggle::Unassigned => PlacementOutcome::Unassigned,
        };
        debug!(%cell, staff_id = %staff_id, ?outcome, "Cell placement");
        Ok(outcome)
    }

    /// Assign the armed staff member to every session of `column`.
    pub fn stamp_column(&mut self, column: ColumnId) -> Result<PlacementOutcome, PlacementError> {
        let staff_id = self.armed_for(column)?.id.clone();
        let added = self.roster.stamp_column(column, &staff_id);
        debug!(%column, staff_id = %staff_id, added, "Column placement");
        Ok(PlacementOutcome::Stamped { added })
    }

    /// Clear every cell and disarm. Callers confirm with the user first.
    pub fn reset(&mut self) {
        info!(cells = self.roster.occupied_cells(), "Resetting roster");
        self.roster.clear();
        self.selection.reset();
    }

    // =========================================================================
    // Derived values
    // =========================================================================

    pub fn physio_placements(&self) -> usize {
        fte::physio_placements(&self.roster, &self.directory)
    }

    pub fn physio_fte(&self) -> f64 {
        fte::physio_fte(&self.roster, &self.directory)
    }

    /// Resolve the occupants of a cell to staff members, skipping unknown ids.
    pub fn staff_in_cell(&self, cell: &CellId) -> Vec<&StaffMember> {
        self.roster
            .occupants(cell)
            .iter()
            .filter_map(|id| self.directory.get(id))
            .collect()
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Disarm and capture the board for rendering.
    pub fn begin_export(&mut self) -> BoardSnapshot {
        self.selection.export_started();
        BoardSnapshot::capture(&self.directory, &self.roster)
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(StaffDirectory::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Session;
    use crate::validation::{PT_IN_SUPPORT_COLUMN, SUPPORT_IN_PT_COLUMN};

    fn cell(s: &str) -> CellId {
        s.parse().unwrap()
    }

    #[test]
    fn test_placement_requires_selection() {
        let mut board = Board::default();
        assert_eq!(
            board.place_in_cell(cell("1st-T1_PTI")),
            Err(PlacementError::NothingArmed)
        );
        assert_eq!(
            board.stamp_column(ColumnId::T1PtI),
            Err(PlacementError::NothingArmed)
        );
        assert!(board.roster().is_empty());
    }

    #[test]
    fn test_select_unknown_staff_is_rejected() {
        let mut board = Board::default();
        assert_eq!(
            board.select_staff("ghost"),
            Err(PlacementError::UnknownStaff("ghost".to_string()))
        );
        assert!(board.selection().is_idle());
    }

    #[test]
    fn test_invalid_cell_placement_leaves_roster_untouched() {
        let mut board = Board::default();
        board.select_staff("s1").unwrap();
        let before = board.roster().clone();
        assert_eq!(
            board.place_in_cell(cell("2nd-T2_PTI")),
            Err(PlacementError::Rejected(SUPPORT_IN_PT_COLUMN.to_string()))
        );
        assert_eq!(board.roster(), &before);
        // The selection survives a rejected placement
        assert!(board.selection().is_armed("s1"));
    }

    #[test]
    fn test_invalid_column_stamp_is_rejected() {
        let mut board = Board::default();
        board.select_staff("p2").unwrap();
        assert_eq!(
            board.stamp_column(ColumnId::Pca),
            Err(PlacementError::Rejected(PT_IN_SUPPORT_COLUMN.to_string()))
        );
        assert!(board.roster().is_empty());
    }

    #[test]
    fn test_stamp_column_fills_every_session() {
        let mut board = Board::default();
        board.select_staff("p1").unwrap();
        board.place_in_cell(cell("2nd-T1_PTII")).unwrap();

        assert_eq!(
            board.stamp_column(ColumnId::T1PtII),
            Ok(PlacementOutcome::Stamped { added: 3 })
        );
        for session in Session::ALL {
            assert_eq!(
                board.roster().occupants(&CellId::new(session, ColumnId::T1PtII)),
                ["p1"]
            );
        }
        assert_eq!(board.physio_fte(), 1.0);
    }

    #[test]
    fn test_role_filter_change_disarms() {
        let mut board = Board::default();
        board.select_staff("p1").unwrap();
        board.set_role_filter(StaffRole::Support);
        assert!(board.selection().is_idle());
        assert!(board.visible_staff().iter().all(|m| m.role == StaffRole::Support));

        board.select_staff("s1").unwrap();
        board.set_role_filter(StaffRole::Support);
        assert!(board.selection().is_idle());
    }

    #[test]
    fn test_reset_clears_roster_and_selection() {
        let mut board = Board::default();
        board.select_staff("p1").unwrap();
        board.stamp_column(ColumnId::T2PtI).unwrap();
        board.select_staff("s2").unwrap();
        board.stamp_column(ColumnId::Pca).unwrap();

        board.reset();
        assert!(board.selection().is_idle());
        assert!(CellId::all().all(|c| board.roster().occupants(&c).is_empty()));
        assert_eq!(board.physio_fte(), 0.0);
    }

    #[test]
    fn test_begin_export_disarms_and_snapshots() {
        let mut board = Board::default();
        board.select_staff("p1").unwrap();
        board.place_in_cell(cell("1st-T1_PTI")).unwrap();

        let snapshot = board.begin_export();
        assert!(board.selection().is_idle());
        assert_eq!(snapshot.roster, *board.roster());
        assert_eq!(snapshot.physio_placements, 1);
    }

    #[test]
    fn test_staff_in_cell_resolves_members() {
        let mut board = Board::default();
        board.select_staff("s3").unwrap();
        board.place_in_cell(cell("4th-PCA")).unwrap();
        let names: Vec<&str> = board
            .staff_in_cell(&cell("4th-PCA"))
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(names, vec!["Kate"]);
    }
}
