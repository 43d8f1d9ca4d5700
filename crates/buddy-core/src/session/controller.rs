//! Session controller: which buddy is active and which view is shown.

use super::view_mode::{Transition, ViewMode};
use crate::buddy::BuddyLookup;

/// Identifies one chat session with one buddy.
///
/// A new token is minted every time a chat session starts, so a reply
/// produced for an earlier session never matches the current one even if
/// the same buddy is selected again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionToken {
    pub buddy_id: String,
    pub generation: u64,
}

/// Ephemeral view/selection state machine over [`ViewMode`].
///
/// Every operation is total: an event that does not apply in the current
/// state returns [`Transition::Ignored`] and leaves the state unchanged.
#[derive(Debug, Default)]
pub struct SessionController {
    active_buddy_id: Option<String>,
    view_mode: ViewMode,
    generation: u64,
}

impl SessionController {
    /// Starts in the list view with nothing selected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn active_buddy_id(&self) -> Option<&str> {
        self.active_buddy_id.as_deref()
    }

    /// Token of the running chat session, if any.
    pub fn current_token(&self) -> Option<SessionToken> {
        if !self.view_mode.has_active_buddy() {
            return None;
        }
        self.active_buddy_id.as_ref().map(|id| SessionToken {
            buddy_id: id.clone(),
            generation: self.generation,
        })
    }

    /// Returns true if `token` still names the running chat session.
    pub fn is_current(&self, token: &SessionToken) -> bool {
        self.current_token().as_ref() == Some(token)
    }

    /// Opens a chat with `id`.
    ///
    /// Ignored with a warning if `id` does not resolve.
    pub fn select_buddy(&mut self, id: &str, buddies: &(impl BuddyLookup + ?Sized)) -> Transition {
        if !buddies.contains_buddy(id) {
            tracing::warn!("[SessionController] Cannot select unknown buddy {}", id);
            return Transition::Ignored;
        }

        let resumes_current =
            self.view_mode.has_active_buddy() && self.active_buddy_id.as_deref() == Some(id);
        if !resumes_current {
            self.generation += 1;
        }

        self.active_buddy_id = Some(id.to_string());
        self.view_mode = ViewMode::Chat;
        Transition::Applied
    }

    /// Shows the create form. Only offered from the listing.
    pub fn start_create(&mut self) -> Transition {
        match self.view_mode {
            ViewMode::List | ViewMode::Create => {
                self.view_mode = ViewMode::Create;
                Transition::Applied
            }
            other => self.ignore("start_create", other),
        }
    }

    /// Leaves the create form without creating anything.
    pub fn cancel_create(&mut self) -> Transition {
        match self.view_mode {
            ViewMode::Create => {
                self.view_mode = ViewMode::List;
                Transition::Applied
            }
            other => self.ignore("cancel_create", other),
        }
    }

    /// Chat -> Settings for the same buddy.
    pub fn open_settings(&mut self) -> Transition {
        match self.view_mode {
            ViewMode::Chat => {
                self.view_mode = ViewMode::Settings;
                Transition::Applied
            }
            other => self.ignore("open_settings", other),
        }
    }

    /// Settings -> Chat for the same buddy.
    pub fn back_from_settings(&mut self) -> Transition {
        match self.view_mode {
            ViewMode::Settings => {
                self.view_mode = ViewMode::Chat;
                Transition::Applied
            }
            other => self.ignore("back_from_settings", other),
        }
    }

    /// Chat -> List, ending the chat session.
    pub fn back_from_chat(&mut self) -> Transition {
        match self.view_mode {
            ViewMode::Chat => {
                self.end_session();
                Transition::Applied
            }
            other => self.ignore("back_from_chat", other),
        }
    }

    /// Returns to the listing after a buddy was created.
    pub fn on_buddy_created(&mut self) -> Transition {
        match self.view_mode {
            ViewMode::Create | ViewMode::List => {
                self.view_mode = ViewMode::List;
                Transition::Applied
            }
            other => self.ignore("on_buddy_created", other),
        }
    }

    /// Ends the session if the deleted buddy was the active one.
    pub fn on_buddy_deleted(&mut self, id: &str) -> Transition {
        if self.active_buddy_id.as_deref() != Some(id) {
            return Transition::Ignored;
        }
        self.end_session();
        Transition::Applied
    }

    /// Checks that Chat/Settings refer to a resolvable buddy.
    pub fn is_consistent(&self, buddies: &(impl BuddyLookup + ?Sized)) -> bool {
        if !self.view_mode.has_active_buddy() {
            return true;
        }
        self.active_buddy_id
            .as_deref()
            .is_some_and(|id| buddies.contains_buddy(id))
    }

    fn end_session(&mut self) {
        self.active_buddy_id = None;
        self.view_mode = ViewMode::List;
        self.generation += 1;
    }

    fn ignore(&self, event: &str, mode: ViewMode) -> Transition {
        tracing::debug!("[SessionController] Ignoring {} in {} view", event, mode);
        Transition::Ignored
    }
}
