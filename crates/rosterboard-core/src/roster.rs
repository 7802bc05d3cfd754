//! The roster store: which staff ids occupy which cell.
//!
//! Occupant lists keep insertion order and never hold the same id twice.
//! Empty lists are not stored, so a cell that was filled and emptied again
//! compares equal to one that was never touched.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CellId, ColumnId};

/// What a single-cell toggle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Assigned,
    Unassigned,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterState {
    cells: BTreeMap<CellId, Vec<String>>,
}

impl RosterState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Occupants of a cell in placement order (empty if none).
    pub fn occupants(&self, cell: &CellId) -> &[String] {
        self.cells.get(cell).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, cell: &CellId, staff_id: &str) -> bool {
        self.occupants(cell).iter().any(|id| id == staff_id)
    }

    /// Remove `staff_id` from the cell if present, otherwise append it.
    pub fn toggle(&mut self, cell: CellId, staff_id: &str) -> Toggle {
        if self.contains(&cell, staff_id) {
            if let Some(ids) = self.cells.get_mut(&cell) {
                ids.retain(|id| id != staff_id);
                if ids.is_empty() {
                    self.cells.remove(&cell);
                }
            }
            Toggle::Unassigned
        } else {
            self.cells.entry(cell).or_default().push(staff_id.to_string());
            Toggle::Assigned
        }
    }

    /// Append `staff_id` unless already present. Returns whether it was added.
    pub fn assign(&mut self, cell: CellId, staff_id: &str) -> bool {
        if self.contains(&cell, staff_id) {
            return false;
        }
        self.cells.entry(cell).or_default().push(staff_id.to_string());
        true
    }

    /// Assign `staff_id` to every session of `column`. Returns how many cells gained it.
    pub fn stamp_column(&mut self, column: ColumnId, staff_id: &str) -> usize {
        CellId::column_cells(column)
            .filter(|cell| self.assign(*cell, staff_id))
            .count()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    /// Non-empty cells and their occupants, in board order.
    pub fn iter(&self) -> impl Iterator<Item = (&CellId, &[String])> {
        self.cells.iter().map(|(cell, ids)| (cell, ids.as_slice()))
    }

    /// Every placed id, once per cell it occupies.
    pub fn placements(&self) -> impl Iterator<Item = &str> {
        self.cells.values().flatten().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }
}
