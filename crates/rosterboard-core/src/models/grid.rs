//! Board coordinates: sessions (rows), columns, and the cells they form.
//!
//! A cell is addressed by the composite key `"<session>-<column>"`, e.g.
//! `"1st-T1_PTI"`. Four sessions by five columns gives 20 cells.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A quarter-day session on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Session {
    #[serde(rename = "1st")]
    First,
    #[serde(rename = "2nd")]
    Second,
    #[serde(rename = "3rd")]
    Third,
    #[serde(rename = "4th")]
    Fourth,
}

impl Session {
    pub const ALL: [Session; 4] = [
        Session::First,
        Session::Second,
        Session::Third,
        Session::Fourth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Session::First => "1st",
            Session::Second => "2nd",
            Session::Third => "3rd",
            Session::Fourth => "4th",
        }
    }

    /// Position of this session in `Session::ALL`.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Session::ALL
            .into_iter()
            .find(|session| session.as_str() == s)
            .ok_or_else(|| ParseError::UnknownSession(s.to_string()))
    }
}

/// A board column. Team columns hold physiotherapists; `Pca` holds support staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum ColumnId {
    #[serde(rename = "T1_PTI")]
    T1PtI,
    #[serde(rename = "T1_PTII")]
    T1PtII,
    #[serde(rename = "T2_PTI")]
    T2PtI,
    #[serde(rename = "T2_PTII")]
    T2PtII,
    #[serde(rename = "PCA")]
    Pca,
}

impl ColumnId {
    pub const ALL: [ColumnId; 5] = [
        ColumnId::T1PtI,
        ColumnId::T1PtII,
        ColumnId::T2PtI,
        ColumnId::T2PtII,
        ColumnId::Pca,
    ];

    /// Wire identifier, as used in cell ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnId::T1PtI => "T1_PTI",
            ColumnId::T1PtII => "T1_PTII",
            ColumnId::T2PtI => "T2_PTI",
            ColumnId::T2PtII => "T2_PTII",
            ColumnId::Pca => "PCA",
        }
    }

    /// Column header text.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnId::T1PtI | ColumnId::T2PtI => "PT I",
            ColumnId::T1PtII | ColumnId::T2PtII => "PT II",
            ColumnId::Pca => "PCA",
        }
    }

    /// Team banner the column sits under, if any.
    pub fn team(&self) -> Option<&'static str> {
        match self {
            ColumnId::T1PtI | ColumnId::T1PtII => Some("Team 1"),
            ColumnId::T2PtI | ColumnId::T2PtII => Some("Team 2"),
            ColumnId::Pca => None,
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for ColumnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ColumnId::ALL
            .into_iter()
            .find(|column| column.as_str() == s)
            .ok_or_else(|| ParseError::UnknownColumn(s.to_string()))
    }
}

/// Composite key of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CellId {
    pub session: Session,
    pub column: ColumnId,
}

impl CellId {
    pub fn new(session: Session, column: ColumnId) -> Self {
        Self { session, column }
    }

    /// Every cell on the board, session-major.
    pub fn all() -> impl Iterator<Item = CellId> {
        Session::ALL
            .into_iter()
            .flat_map(|session| ColumnId::ALL.into_iter().map(move |column| CellId::new(session, column)))
    }

    /// The cells of one column, in session order.
    pub fn column_cells(column: ColumnId) -> impl Iterator<Item = CellId> {
        Session::ALL
            .into_iter()
            .map(move |session| CellId::new(session, column))
    }
}

impl fmt::Display for CellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.session, self.column)
    }
}

impl FromStr for CellId {
    type Err = ParseError;

    /// The session is everything before the first `-`; the column is the rest.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (session, column) = s
            .split_once('-')
            .ok_or_else(|| ParseError::MalformedCellId(s.to_string()))?;
        Ok(CellId::new(session.parse()?, column.parse()?))
    }
}

impl TryFrom<String> for CellId {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CellId> for String {
    fn from(cell: CellId) -> Self {
        cell.to_string()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_has_twenty_cells() {
        let cells: Vec<CellId> = CellId::all().collect();
        assert_eq!(cells.len(), 20);
        assert_eq!(cells[0].to_string(), "1st-T1_PTI");
        assert_eq!(cells[19].to_string(), "4th-PCA");
    }

    #[test]
    fn test_cell_id_parse() {
        let cell: CellId = "2nd-T2_PTII".parse().unwrap();
        assert_eq!(cell, CellId::new(Session::Second, ColumnId::T2PtII));

        let cell: CellId = "4th-PCA".parse().unwrap();
        assert_eq!(cell.column, ColumnId::Pca);
    }

    #[test]
    fn test_cell_id_parse_errors() {
        assert_eq!(
            "1st".parse::<CellId>(),
            Err(ParseError::MalformedCellId("1st".to_string()))
        );
        assert_eq!(
            "5th-PCA".parse::<CellId>(),
            Err(ParseError::UnknownSession("5th".to_string()))
        );
        // Only the first dash splits; the remainder is the column
        assert_eq!(
            "1st-T1-PTI".parse::<CellId>(),
            Err(ParseError::UnknownColumn("T1-PTI".to_string()))
        );
    }

    #[test]
    fn test_column_cells_follow_session_order() {
        let cells: Vec<String> = CellId::column_cells(ColumnId::Pca)
            .map(|c| c.to_string())
            .collect();
        assert_eq!(cells, vec!["1st-PCA", "2nd-PCA", "3rd-PCA", "4th-PCA"]);
    }

    #[test]
    fn test_column_labels_and_teams() {
        assert_eq!(ColumnId::T1PtII.label(), "PT II");
        assert_eq!(ColumnId::T2PtI.team(), Some("Team 2"));
        assert_eq!(ColumnId::Pca.team(), None);
    }

    #[test]
    fn test_cell_id_serializes_as_string() {
        let cell = CellId::new(Session::Third, ColumnId::T1PtI);
        let json = serde_json::to_string(&cell).unwrap();
        assert_eq!(json, "\"3rd-T1_PTI\"");
        let back: CellId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}
