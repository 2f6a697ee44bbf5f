//! Core types for the Voice Assistant Manager panel
//!
//! This crate holds everything the panel computes locally: the entity
//! catalog delivered by the host, per-assistant filter configurations and
//! alias maps, the exposure evaluator, the entity filter pipeline,
//! pagination, and the bulk operator. Nothing here performs I/O.

mod alias;
mod bulk;
mod entity;
mod entity_id;
mod exposure;
mod filter_config;
mod filters;
mod pagination;
mod scope;
mod settings;
mod state;

pub use alias::{AliasMap, MAX_ALIAS_LENGTH};
pub use bulk::{apply_bulk_action, BulkAction, BulkError, BulkOutcome, BulkTarget};
pub use entity::{domain_of, Area, Device, Entity, HomekitBridge};
pub use entity_id::{EntityId, EntityIdError, MAX_ENTITY_ID_LENGTH};
pub use exposure::{evaluate, Exposure, ExposureReason};
pub use filter_config::{FilterConfig, FilterMode};
pub use filters::{filter_entities, EntityFilters, ExposureFilter};
pub use pagination::{paginate, Page, PageSize, PageSizeError};
pub use scope::{resolve_scope, AssistantMode, ParseVariantError, Platform, ScopeKey};
pub use settings::{AlexaSettings, GoogleSettings};
pub use state::{LastGenerated, VoiceManagerState};

/// Integration domain used as the prefix of every remote command
pub const DOMAIN: &str = "voice_assistant_manager";
