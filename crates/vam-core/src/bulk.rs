//! Bulk operator: set-algebra edits applied to a selection of entities

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::debug;

use crate::alias::{AliasMap, MAX_ALIAS_LENGTH};
use crate::entity::{domain_of, Entity};
use crate::entity_id::{EntityId, EntityIdError};
use crate::filter_config::FilterConfig;

/// A bulk action offered by the table's action picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkAction {
    /// Add to `entities`
    Exclude,
    /// Remove from `entities`
    Unexclude,
    AddOverride,
    RemoveOverride,
    /// Add each selected entity's domain to `domains`
    ExcludeDomain,
    /// Add each selected entity's device to `devices`
    ExcludeDevice,
    /// Give every selected entity the same alias
    SetAlias,
    /// Alias becomes `value + name`
    SetAliasPrefix,
    /// Alias becomes `name + value`
    SetAliasSuffix,
    ClearAlias,
}

impl BulkAction {
    pub const ALL: [BulkAction; 10] = [
        Self::Exclude,
        Self::Unexclude,
        Self::AddOverride,
        Self::RemoveOverride,
        Self::ExcludeDomain,
        Self::ExcludeDevice,
        Self::SetAlias,
        Self::SetAliasPrefix,
        Self::SetAliasSuffix,
        Self::ClearAlias,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exclude => "exclude",
            Self::Unexclude => "unexclude",
            Self::AddOverride => "add_override",
            Self::RemoveOverride => "remove_override",
            Self::ExcludeDomain => "exclude_domain",
            Self::ExcludeDevice => "exclude_device",
            Self::SetAlias => "set_alias",
            Self::SetAliasPrefix => "set_alias_prefix",
            Self::SetAliasSuffix => "set_alias_suffix",
            Self::ClearAlias => "clear_alias",
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BulkAction {
    type Err = BulkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| BulkError::UnknownAction(s.to_string()))
    }
}

/// Why a bulk action was rejected. A rejected action changes nothing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BulkError {
    #[error("unknown bulk action '{0}'")]
    UnknownAction(String),

    #[error("no entities selected")]
    EmptySelection,

    #[error("invalid entity id '{entity_id}': {source}")]
    InvalidEntityId {
        entity_id: String,
        #[source]
        source: EntityIdError,
    },

    #[error("an alias value is required")]
    AliasValueRequired,

    #[error("this scope has no alias map")]
    AliasesUnsupported,

    #[error("alias for '{entity_id}' exceeds {max} characters")]
    AliasTooLong { entity_id: String, max: usize },
}

/// Collections a bulk action operates on
pub struct BulkTarget<'a> {
    pub config: &'a mut FilterConfig,
    /// `None` for scopes without aliases
    pub aliases: Option<&'a mut AliasMap>,
    /// Host catalog used to resolve device ids and display names
    pub catalog: &'a [Entity],
}

/// Summary of an applied bulk action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BulkOutcome {
    pub action: BulkAction,
    /// Number of collection members added, removed, or rewritten
    pub changed: usize,
}

/// Apply `action` to every selected entity id
///
/// The selection is validated up front so that a rejected action leaves
/// the target untouched.
pub fn apply_bulk_action(
    action: BulkAction,
    selected: &[String],
    value: &str,
    target: BulkTarget<'_>,
) -> Result<BulkOutcome, BulkError> {
    if selected.is_empty() {
        return Err(BulkError::EmptySelection);
    }
    for entity_id in selected {
        EntityId::parse(entity_id.as_str()).map_err(|source| BulkError::InvalidEntityId {
            entity_id: entity_id.clone(),
            source,
        })?;
    }
    if action == BulkAction::SetAlias && value.trim().is_empty() {
        return Err(BulkError::AliasValueRequired);
    }

    let BulkTarget {
        config,
        aliases,
        catalog,
    } = target;

    let changed = match action {
        BulkAction::Exclude => count(selected, |id| config.entities.insert(id.clone())),
        BulkAction::Unexclude => count(selected, |id| config.entities.shift_remove(id)),
        BulkAction::AddOverride => count(selected, |id| config.overrides.insert(id.clone())),
        BulkAction::RemoveOverride => count(selected, |id| config.overrides.shift_remove(id)),
        BulkAction::ExcludeDomain => count(selected, |id| {
            config.domains.insert(domain_of(id).to_string())
        }),
        BulkAction::ExcludeDevice => count(selected, |id| {
            catalog
                .iter()
                .find(|e| &e.entity_id == id)
                .and_then(|e| e.device_id.clone())
                .is_some_and(|device| config.devices.insert(device))
        }),
        BulkAction::SetAlias
        | BulkAction::SetAliasPrefix
        | BulkAction::SetAliasSuffix
        | BulkAction::ClearAlias => {
            let aliases = aliases.ok_or(BulkError::AliasesUnsupported)?;
            apply_alias_action(action, selected, value, aliases, catalog)?
        }
    };

    debug!(
        action = %action,
        selected = selected.len(),
        changed,
        "Applied bulk action"
    );

    Ok(BulkOutcome { action, changed })
}

/// Every alias is computed and length-checked before the map is touched
fn apply_alias_action(
    action: BulkAction,
    selected: &[String],
    value: &str,
    aliases: &mut AliasMap,
    catalog: &[Entity],
) -> Result<usize, BulkError> {
    let display_name = |id: &str| -> String {
        catalog
            .iter()
            .find(|e| e.entity_id == id)
            .map_or(id, Entity::display_name)
            .to_string()
    };

    let mut proposed = Vec::with_capacity(selected.len());
    for id in selected {
        let alias = match action {
            BulkAction::SetAlias => Some(value.trim().to_string()),
            BulkAction::SetAliasPrefix => Some(format!("{value}{}", display_name(id.as_str()))),
            BulkAction::SetAliasSuffix => Some(format!("{}{value}", display_name(id.as_str()))),
            _ => None,
        };
        if alias
            .as_ref()
            .is_some_and(|alias| alias.chars().count() > MAX_ALIAS_LENGTH)
        {
            return Err(BulkError::AliasTooLong {
                entity_id: id.clone(),
                max: MAX_ALIAS_LENGTH,
            });
        }
        proposed.push((id, alias));
    }

    let mut changed = 0;
    for (id, alias) in proposed {
        let updated = match alias {
            Some(alias) => aliases.set(id.as_str(), alias),
            None => aliases.remove(id),
        };
        if updated {
            changed += 1;
        }
    }
    Ok(changed)
}

fn count(selected: &[String], mut apply: impl FnMut(&String) -> bool) -> usize {
    selected.iter().filter(|id| apply(id)).count()
}
