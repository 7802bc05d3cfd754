//! Core library for rosterboard.
//!
//! This crate holds everything that is not terminal-specific:
//!
//! - `models`: staff directory, sessions, columns and cell identifiers
//! - `roster`: the cell -> occupants store with toggle/stamp semantics
//! - `validation`: which roles may sit in which columns
//! - `selection`: the armed staff member for click-to-place
//! - `fte`: derived physio FTE
//! - `board`: the aggregate the front ends drive
//! - `export`: board snapshot rasterization, sharing and saving

pub mod board;
pub mod error;
pub mod export;
pub mod fte;
pub mod models;
pub mod roster;
pub mod selection;
pub mod validation;

pub use board::{Board, PlacementOutcome};
pub use error::{DirectoryError, ParseError, PlacementError};
pub use models::{CellId, ColumnId, MagnetColor, Session, StaffDirectory, StaffMember, StaffRole};
pub use roster::RosterState;
pub use selection::Selection;
