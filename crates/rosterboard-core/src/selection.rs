//! The "stamp" selection: at most one armed staff id.
//!
//! ```text
//! Idle --select(a)--> Armed(a) --select(a)--> Idle
//!                     Armed(a) --select(b)--> Armed(b)
//! any  --role filter / export / reset--> Idle
//! ```

use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum Selection {
    #[default]
    Idle,
    Armed(String),
}

impl Selection {
    /// Select a staff entry. Selecting the armed entry again disarms it.
    pub fn select(&mut self, id: &str) {
        *self = match self {
            Selection::Armed(current) if current.as_str() == id => Selection::Idle,
            _ => Selection::Armed(id.to_string()),
        };
        debug!(selection = ?self, "Selection changed");
    }

    pub fn role_filter_changed(&mut self) {
        self.clear();
    }

    pub fn export_started(&mut self) {
        self.clear();
    }

    pub fn reset(&mut self) {
        self.clear();
    }

    fn clear(&mut self) {
        *self = Selection::Idle;
    }

    pub fn armed(&self) -> Option<&str> {
        match self {
            Selection::Idle => None,
            Selection::Armed(id) => Some(id.as_str()),
        }
    }

    pub fn is_armed(&self, id: &str) -> bool {
        self.armed() == Some(id)
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }
}
