//! Dirty tracking and tab navigation
//!
//! ```text
//! Clean --Mutated--> Dirty
//! Dirty --Saved/Discarded/Loaded--> Clean
//! Dirty --Mutated--> Dirty
//! ```
//!
//! A failed save produces no event, so the buffer stays dirty.

use std::fmt;
use std::str::FromStr;

use vam_core::ParseVariantError;

/// Whether the pending buffer holds unsaved edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Clean,
    Dirty,
}

/// Events that move the edit state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditEvent {
    /// A snapshot was loaded and the buffer rebuilt from it
    Loaded,
    /// Any local edit to the buffer
    Mutated,
    /// The backend accepted the buffer
    Saved,
    /// The buffer was reset from the committed snapshot
    Discarded,
}

impl EditState {
    pub fn apply(self, event: EditEvent) -> EditState {
        use EditEvent::*;

        match (self, event) {
            (_, Mutated) => EditState::Dirty,
            (_, Loaded | Saved | Discarded) => EditState::Clean,
        }
    }

    pub fn is_dirty(self) -> bool {
        self == EditState::Dirty
    }
}

/// Top-level panel tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tab {
    #[default]
    Entities,
    Settings,
}

impl Tab {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Entities => "entities",
            Tab::Settings => "settings",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entities" => Ok(Tab::Entities),
            "settings" => Ok(Tab::Settings),
            other => Err(ParseVariantError::new("tab", other)),
        }
    }
}

/// Outcome of asking to switch tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabSwitch {
    /// Already on the requested tab
    Unchanged,
    /// The switch happened
    Switched(Tab),
    /// Unsaved edits exist; the caller must confirm (discard) or cancel
    NeedsConfirmation(Tab),
}

/// Decide a tab switch without performing it
pub fn request_tab_switch(state: EditState, current: Tab, target: Tab) -> TabSwitch {
    if current == target {
        TabSwitch::Unchanged
    } else if state.is_dirty() {
        TabSwitch::NeedsConfirmation(target)
    } else {
        TabSwitch::Switched(target)
    }
}
