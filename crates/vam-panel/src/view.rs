//! Render-ready rows and pages

use vam_client::WriteResult;
use vam_core::{evaluate, AliasMap, Entity, ExposureReason, FilterConfig, VoiceManagerState};

use crate::locale::Translator;

/// One entity as shown in the table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRow {
    pub entity_id: String,
    pub name: String,
    pub domain: String,
    pub area_name: Option<String>,
    pub exposed: bool,
    pub reason: ExposureReason,
    pub reason_label: String,
    pub alias: Option<String>,
    pub is_override: bool,
    /// The override button is offered for domain matches and existing overrides
    pub can_toggle_override: bool,
    pub selected: bool,
}

impl EntityRow {
    pub(crate) fn build(
        entity: &Entity,
        state: &VoiceManagerState,
        config: &FilterConfig,
        aliases: Option<&AliasMap>,
        selected: bool,
        translator: &Translator,
    ) -> Self {
        let exposure = evaluate(&entity.entity_id, config);
        let is_override = config.is_override(&entity.entity_id);
        let area_name = entity.area_name.clone().or_else(|| {
            entity
                .area_id
                .as_deref()
                .and_then(|id| state.area_name(id))
                .map(str::to_string)
        });

        Self {
            entity_id: entity.entity_id.clone(),
            name: entity.display_name().to_string(),
            domain: entity.domain().to_string(),
            area_name,
            exposed: exposure.exposed,
            reason: exposure.reason,
            reason_label: reason_label(exposure.reason, translator).to_string(),
            alias: aliases
                .and_then(|a| a.get(&entity.entity_id))
                .map(str::to_string),
            is_override,
            can_toggle_override: is_override || exposure.reason == ExposureReason::Domain,
            selected,
        }
    }
}

/// Label for the table's reason column
pub fn reason_label(reason: ExposureReason, translator: &Translator) -> &'static str {
    match reason {
        ExposureReason::Domain => translator.t("byDomain"),
        ExposureReason::Entity => translator.t("manual"),
        ExposureReason::Override => translator.t("override"),
        ExposureReason::None => "",
    }
}

/// The current page of the filtered table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub rows: Vec<EntityRow>,
    pub page: usize,
    pub total_pages: usize,
    /// Rows matching the filters
    pub total: usize,
    /// Entities in the catalog
    pub catalog_total: usize,
    /// One-based index of the first row, zero when the page is empty
    pub first_index: usize,
}

impl PageView {
    /// One-based `(first, last)` row numbers for "Showing a-b of n"
    pub fn showing(&self) -> Option<(usize, usize)> {
        if self.rows.is_empty() {
            None
        } else {
            Some((self.first_index, self.first_index + self.rows.len() - 1))
        }
    }
}

/// Per-assistant summary of a `write_files` result
///
/// Assistants that were neither written nor reported an error are left out.
pub fn write_summary(result: &WriteResult, translator: &Translator) -> String {
    let mut lines = vec![translator.t("configSaved").to_string()];
    let assistants = [
        (&result.google, "googleOk", "Google Assistant"),
        (&result.alexa, "alexaOk", "Alexa"),
        (&result.homekit, "homekitOk", "HomeKit"),
    ];
    for (status, ok_key, label) in assistants {
        if status.written {
            lines.push(format!("- {}", translator.t(ok_key)));
        } else if let Some(error) = &status.error {
            lines.push(format!("- {label}: {error}"));
        }
    }
    lines.join("\n")
}
