//! Exposure evaluator: decides whether an entity reaches a voice assistant

use serde::{Deserialize, Serialize};

use crate::entity::domain_of;
use crate::filter_config::{FilterConfig, FilterMode};

/// Which rule decided an entity's exposure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExposureReason {
    /// No rule matched; the filter mode's default applies
    None,
    /// Entity is in `overrides`
    Override,
    /// Entity's domain is in `domains`
    Domain,
    /// Entity is in `entities`
    Entity,
}

impl ExposureReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Override => "override",
            Self::Domain => "domain",
            Self::Entity => "entity",
        }
    }
}

/// Result of evaluating one entity against one filter config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exposure {
    pub exposed: bool,
    pub reason: ExposureReason,
}

/// Evaluate an entity id against a filter config
///
/// Precedence is fixed: override, then domain, then entity, then the
/// default. Override and the default expose in exclude mode; domain and
/// entity matches expose in include mode.
pub fn evaluate(entity_id: &str, config: &FilterConfig) -> Exposure {
    let reason = if config.overrides.contains(entity_id) {
        ExposureReason::Override
    } else if config.domains.contains(domain_of(entity_id)) {
        ExposureReason::Domain
    } else if config.entities.contains(entity_id) {
        ExposureReason::Entity
    } else {
        ExposureReason::None
    };

    let exposed = match reason {
        ExposureReason::Override | ExposureReason::None => {
            config.filter_mode == FilterMode::Exclude
        }
        ExposureReason::Domain | ExposureReason::Entity => {
            config.filter_mode == FilterMode::Include
        }
    };

    Exposure { exposed, reason }
}
