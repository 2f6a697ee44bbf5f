//! Include/exclude filter configuration for one assistant scope

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::scope::ParseVariantError;

/// Whether the configured domains/entities are exclusions or inclusions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Everything is exposed unless listed
    #[default]
    Exclude,
    /// Nothing is exposed unless listed
    Include,
}

impl FilterMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Exclude => "exclude",
            Self::Include => "include",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FilterMode {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exclude" => Ok(Self::Exclude),
            "include" => Ok(Self::Include),
            other => Err(ParseVariantError::new("filter mode", other)),
        }
    }
}

/// Filter rules for one scope
///
/// Every collection is an insertion-ordered set: duplicates coming from the
/// host are collapsed on deserialization and re-adding a member is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub filter_mode: FilterMode,
    #[serde(default)]
    pub domains: IndexSet<String>,
    #[serde(default)]
    pub entities: IndexSet<String>,
    /// Collected by the "exclude device" bulk action; the evaluator does not read it
    #[serde(default)]
    pub devices: IndexSet<String>,
    #[serde(default)]
    pub overrides: IndexSet<String>,
}

impl FilterConfig {
    pub fn new(filter_mode: FilterMode) -> Self {
        Self {
            filter_mode,
            ..Default::default()
        }
    }

    /// Add the domain if absent, remove it if present. Returns true if it is now a member.
    pub fn toggle_domain(&mut self, domain: &str) -> bool {
        toggle(&mut self.domains, domain)
    }

    /// Add the override if absent, remove it if present. Returns true if it is now a member.
    pub fn toggle_override(&mut self, entity_id: &str) -> bool {
        toggle(&mut self.overrides, entity_id)
    }

    /// Replace the domain list with the host's full domain catalog
    pub fn select_all_domains<I, S>(&mut self, catalog: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains = catalog.into_iter().map(Into::into).collect();
    }

    pub fn clear_domains(&mut self) {
        self.domains.clear();
    }

    pub fn is_override(&self, entity_id: &str) -> bool {
        self.overrides.contains(entity_id)
    }
}

fn toggle(set: &mut IndexSet<String>, member: &str) -> bool {
    if set.shift_remove(member) {
        false
    } else {
        set.insert(member.to_string());
        true
    }
}
