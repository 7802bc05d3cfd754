//! Data models for the roster board.
//!
//! - `StaffMember`, `StaffRole`, `MagnetColor`, `StaffDirectory`: who can be placed
//! - `Session`, `ColumnId`, `CellId`: where they can be placed

pub mod grid;
pub mod staff;

pub use grid::{CellId, ColumnId, Session};
pub use staff::{MagnetColor, StaffDirectory, StaffMember, StaffRole};
