//! Notifications published to panel observers

use vam_core::AssistantMode;

use crate::dirty::Tab;

/// Which remote operation is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Busy {
    #[default]
    Idle,
    Loading,
    Saving,
}

impl Busy {
    pub fn is_busy(self) -> bool {
        self != Busy::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing message (the panel's alert/toast)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// One change to the panel, sent after the mutation completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelUpdate {
    /// A snapshot was loaded (or failed to load; see `load_error`)
    Loaded,
    /// The pending buffer changed; after a bulk action the selection and
    /// the action value are empty as well
    Edited,
    Saved,
    Discarded,
    ModeChanged(AssistantMode),
    /// The selection or the bulk action value changed
    SelectionChanged,
    /// Filters, page, page size or active platform changed
    ViewChanged,
    /// The active tab, also sent when a pending switch is cancelled
    TabChanged(Tab),
    /// A tab switch is waiting on discard-or-cancel
    ConfirmDiscard(Tab),
    Busy(bool),
    Notice(Notice),
}
