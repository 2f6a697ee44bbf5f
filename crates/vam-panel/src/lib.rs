//! State container for the voice assistant exposure panel
//!
//! The panel mirrors the host's state snapshot, buffers every edit locally
//! until an explicit save, and drives the host's remote operations through
//! a [`vam_client::Backend`]. Front ends render from [`Panel::page_view`] and
//! react to [`PanelUpdate`]s from [`Panel::subscribe`].

mod buffer;
mod debounce;
mod dirty;
mod error;
mod locale;
mod panel;
mod update;
mod view;

pub use buffer::PendingBuffer;
pub use debounce::{Debouncer, DEFAULT_SEARCH_DEBOUNCE};
pub use dirty::{request_tab_switch, EditEvent, EditState, Tab, TabSwitch};
pub use error::{PanelError, PanelResult};
pub use locale::Translator;
pub use panel::{Panel, PanelOptions};
pub use update::{Busy, Notice, NoticeLevel, PanelUpdate};
pub use vam_core::MAX_ALIAS_LENGTH;
pub use view::{reason_label, write_summary, EntityRow, PageView};
