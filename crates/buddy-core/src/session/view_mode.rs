//! View mode types for session state management.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Which screen the user is looking at.
///
/// `Chat` and `Settings` always refer to an active buddy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// Buddy listing
    #[default]
    List,
    /// Create form
    Create,
    /// Chat with the active buddy
    Chat,
    /// Settings of the active buddy
    Settings,
}

impl ViewMode {
    /// Returns true for modes that require an active buddy.
    pub fn has_active_buddy(&self) -> bool {
        matches!(self, ViewMode::Chat | ViewMode::Settings)
    }
}

/// Outcome of feeding an event to the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// State changed (or was re-affirmed) as the event describes
    Applied,
    /// The event does not apply in the current state; nothing changed
    Ignored,
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied)
    }
}
