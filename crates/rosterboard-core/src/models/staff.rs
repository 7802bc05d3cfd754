//! Staff members and the directory they are drawn from.
//!
//! The directory is fixed for the lifetime of a session: members are
//! created at startup (built in, or from the config file) and never
//! mutated afterwards.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::DirectoryError;

/// Professional role of a staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum StaffRole {
    /// Physiotherapist
    #[serde(rename = "PT")]
    Pt,
    /// Support worker / physio care assistant
    Support,
}

impl StaffRole {
    pub const ALL: [StaffRole; 2] = [StaffRole::Pt, StaffRole::Support];

    /// Tab title used when filtering the staff pool.
    pub fn label(&self) -> &'static str {
        match self {
            StaffRole::Pt => "Physiotherapist",
            StaffRole::Support => "Support / PCA",
        }
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            StaffRole::Pt => "PT",
            StaffRole::Support => "PCA",
        }
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StaffRole::Pt => write!(f, "PT"),
            StaffRole::Support => write!(f, "Support"),
        }
    }
}

/// Color of the physical magnet a staff member is usually shown with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum MagnetColor {
    #[default]
    White,
    Yellow,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct StaffMember {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
    #[serde(rename = "defaultColor", alias = "default_color", default)]
    pub default_color: MagnetColor,
}

impl StaffMember {
    pub fn new(id: &str, name: &str, role: StaffRole, default_color: MagnetColor) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            role,
            default_color,
        }
    }

    pub fn is_physio(&self) -> bool {
        self.role == StaffRole::Pt
    }
}

/// The fixed list of staff that can be placed on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffDirectory {
    members: Vec<StaffMember>,
}

impl StaffDirectory {
    /// Build a directory, rejecting empty or duplicate ids.
    pub fn new(members: Vec<StaffMember>) -> Result<Self, DirectoryError> {
        let mut seen = HashSet::new();
        for member in &members {
            if member.id.trim().is_empty() {
                return Err(DirectoryError::EmptyId(member.name.clone()));
            }
            if !seen.insert(member.id.as_str()) {
                return Err(DirectoryError::DuplicateId(member.id.clone()));
            }
        }
        Ok(Self { members })
    }

    /// The directory used when no staff list is configured.
    pub fn builtin() -> Self {
        use MagnetColor::{White, Yellow};
        use StaffRole::{Pt, Support};

        let members = vec![
            StaffMember::new("p1", "Alice", Pt, White),
            StaffMember::new("p2", "Ben", Pt, White),
            StaffMember::new("p3", "Chloe", Pt, Yellow),
            StaffMember::new("p4", "David", Pt, White),
            StaffMember::new("p5", "Emma", Pt, Yellow),
            StaffMember::new("p6", "Finn", Pt, White),
            StaffMember::new("p7", "Grace", Pt, White),
            StaffMember::new("p8", "Hugo", Pt, Yellow),
            StaffMember::new("s1", "Ivy", Support, Yellow),
            StaffMember::new("s2", "Jack", Support, White),
            StaffMember::new("s3", "Kate", Support, Yellow),
            StaffMember::new("s4", "Leo", Support, White),
        ];

        Self { members }
    }

    pub fn get(&self, id: &str) -> Option<&StaffMember> {
        self.members.iter().find(|m| m.id == id)
    }

    /// Resolve an id to its role, if the id is known.
    pub fn role_of(&self, id: &str) -> Option<StaffRole> {
        self.get(id).map(|m| m.role)
    }

    /// Members with the given role, in directory order.
    pub fn by_role(&self, role: StaffRole) -> Vec<&StaffMember> {
        self.members.iter().filter(|m| m.role == role).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StaffMember> {
        self.members.iter()
    }

    pub fn members(&self) -> &[StaffMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

impl Default for StaffDirectory {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// Tests
// ============================================================================
