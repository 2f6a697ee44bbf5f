//! Entity filter pipeline for the entity table

use crate::alias::AliasMap;
use crate::entity::Entity;
use crate::exposure::evaluate;
use crate::filter_config::FilterConfig;

/// Exposure-based narrowing; the two toggles are mutually exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExposureFilter {
    #[default]
    Any,
    OnlyHidden,
    OnlyExposed,
}

impl ExposureFilter {
    /// Build from the two checkbox flags. "only hidden" wins when both are set.
    pub fn from_flags(only_hidden: bool, only_exposed: bool) -> Self {
        match (only_hidden, only_exposed) {
            (true, _) => Self::OnlyHidden,
            (false, true) => Self::OnlyExposed,
            (false, false) => Self::Any,
        }
    }

    fn admits(self, exposed: bool) -> bool {
        match self {
            Self::Any => true,
            Self::OnlyHidden => !exposed,
            Self::OnlyExposed => exposed,
        }
    }
}

/// Active table filters. The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityFilters {
    /// Case-insensitive substring of the entity id or name
    pub search: String,
    /// Keep entities whose domain is listed; empty keeps all
    pub domains: Vec<String>,
    pub area: Option<String>,
    pub device: Option<String>,
    pub exposure: ExposureFilter,
    pub only_with_alias: bool,
    pub only_overrides: bool,
}

impl EntityFilters {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Whether one entity passes every enabled stage
    pub fn matches(
        &self,
        entity: &Entity,
        config: &FilterConfig,
        aliases: Option<&AliasMap>,
    ) -> bool {
        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let in_id = entity.entity_id.to_lowercase().contains(&needle);
            let in_name = entity
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle));
            if !in_id && !in_name {
                return false;
            }
        }

        if !self.domains.is_empty() && !self.domains.iter().any(|d| d == entity.domain()) {
            return false;
        }

        if let Some(area) = &self.area {
            if entity.area_id.as_ref() != Some(area) {
                return false;
            }
        }

        if let Some(device) = &self.device {
            if entity.device_id.as_ref() != Some(device) {
                return false;
            }
        }

        if self.exposure != ExposureFilter::Any
            && !self
                .exposure
                .admits(evaluate(&entity.entity_id, config).exposed)
        {
            return false;
        }

        if self.only_with_alias && !aliases.is_some_and(|a| a.contains(&entity.entity_id)) {
            return false;
        }

        if self.only_overrides && !config.is_override(&entity.entity_id) {
            return false;
        }

        true
    }
}

/// Narrow the catalog with every enabled filter, preserving catalog order
pub fn filter_entities<'a>(
    entities: &'a [Entity],
    filters: &EntityFilters,
    config: &FilterConfig,
    aliases: Option<&AliasMap>,
) -> Vec<&'a Entity> {
    entities
        .iter()
        .filter(|entity| filters.matches(entity, config, aliases))
        .collect()
}
