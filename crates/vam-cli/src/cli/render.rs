//! Plain-text rendering of panel views

use std::fmt::Write;

use vam_client::{PreviewContent, PreviewEntry};
use vam_core::{AssistantMode, LastGenerated, ScopeKey, VoiceManagerState};
use vam_panel::{PageView, PendingBuffer, Translator};

/// Entity table with a "Showing a-b of n" footer
pub fn page(view: &PageView, t: &Translator) -> String {
    let mut out = String::new();
    if view.rows.is_empty() {
        let _ = writeln!(out, "{}", t.t("noResults"));
        return out;
    }

    let _ = writeln!(
        out,
        "{:<9} {:<3} {:<40} {:<24} {:<14} {:<16} {:<12} {}",
        t.t("status"),
        "",
        "entity_id",
        t.t("name"),
        t.t("domain"),
        t.t("area"),
        t.t("reason"),
        t.t("voiceAlias"),
    );
    for row in &view.rows {
        let status = if row.exposed { t.t("exposed") } else { t.t("hidden") };
        let marker = match (row.selected, row.is_override) {
            (true, true) => "*!",
            (true, false) => "*",
            (false, true) => "!",
            (false, false) => "",
        };
        let _ = writeln!(
            out,
            "{:<9} {:<3} {:<40} {:<24} {:<14} {:<16} {:<12} {}",
            status,
            marker,
            row.entity_id,
            row.name,
            row.domain,
            row.area_name.as_deref().unwrap_or("-"),
            row.reason_label,
            row.alias.as_deref().unwrap_or(""),
        );
    }

    if let Some((first, last)) = view.showing() {
        let _ = writeln!(
            out,
            "\n{} {}-{} {} {} ({} {}) | {} {}/{}",
            t.t("showing"),
            first,
            last,
            t.t("of"),
            view.total,
            view.catalog_total,
            t.t("total"),
            t.t("page"),
            view.page,
            view.total_pages.max(1),
        );
    }
    out
}

/// Mode, active scope rules and assistant status
pub fn state(
    state: &VoiceManagerState,
    buffer: &PendingBuffer,
    scope: ScopeKey,
    t: &Translator,
) -> String {
    let mut out = String::new();
    let mode = match state.mode {
        AssistantMode::Linked => t.t("linked"),
        AssistantMode::Separate => t.t("separate"),
    };
    let _ = writeln!(out, "{}", t.t("title"));
    let _ = writeln!(out, "{}: {} ({})", t.t("mode"), mode, scope.filter_config_key());

    let config = buffer.filter_config(scope);
    let domains_label = match config.filter_mode {
        vam_core::FilterMode::Exclude => t.t("domainsToExclude"),
        vam_core::FilterMode::Include => t.t("domainsToInclude"),
    };
    let domains: Vec<&str> = config.domains.iter().map(String::as_str).collect();
    let _ = writeln!(
        out,
        "{} ({} {}): {}",
        domains_label,
        domains.len(),
        t.t("selected"),
        domains.join(", ")
    );
    let _ = writeln!(
        out,
        "{}: {} | {}: {} | {}: {}",
        t.t("entities"),
        config.entities.len(),
        t.t("override"),
        config.overrides.len(),
        t.t("voiceAlias"),
        buffer.aliases(scope).map_or(0, |a| a.len()),
    );

    let _ = writeln!(out);
    let google = if state.google_complete { "googleReady" } else { "googleNotConfigured" };
    let alexa = if state.alexa_complete { "alexaReady" } else { "alexaNotConfigured" };
    let homekit = if state.homekit_complete {
        "homekitEnabledStatus"
    } else {
        "homekitDisabledStatus"
    };
    let _ = writeln!(out, "{}", t.t(google));
    let _ = writeln!(out, "{}", t.t(alexa));
    let _ = writeln!(out, "{}", t.t(homekit));

    let bridge = buffer
        .homekit_bridge()
        .map(|id| state.bridge(id).map_or(id, |b| b.name.as_str()))
        .unwrap_or_else(|| t.t("noBridge"));
    let _ = writeln!(out, "{}: {}", t.t("homekitBridge"), bridge);

    last_generated(&mut out, &state.last_generated, t);
    out
}

fn last_generated(out: &mut String, last: &LastGenerated, t: &Translator) {
    let stamps = [
        ("Google Assistant", last.google_at()),
        ("Alexa", last.alexa_at()),
        ("HomeKit", last.homekit_at()),
    ];
    for (label, stamp) in stamps {
        if let Some(stamp) = stamp {
            let _ = writeln!(
                out,
                "{} ({}): {}",
                t.t("lastGenerated"),
                label,
                stamp.format("%Y-%m-%d %H:%M")
            );
        }
    }
}

/// Generated YAML per assistant
pub fn preview(content: &PreviewContent, t: &Translator) -> String {
    let mut out = String::new();
    let sections = [
        (t.t("googleAssistant"), content.google.as_ref()),
        (t.t("amazonAlexa"), content.alexa.as_ref()),
    ];
    for (title, entry) in sections {
        let _ = writeln!(out, "# {title}");
        match entry {
            Some(entry) => preview_entry(&mut out, entry, t),
            None => {
                let _ = writeln!(out, "{}", t.t("notConfigured"));
            }
        }
        let _ = writeln!(out);
    }
    out
}

fn preview_entry(out: &mut String, entry: &PreviewEntry, t: &Translator) {
    if !entry.complete {
        let _ = writeln!(out, "({})", t.t("notConfigured"));
    }
    if !entry.warnings.is_empty() {
        let _ = writeln!(out, "{}:", t.t("warnings"));
        for warning in &entry.warnings {
            let _ = writeln!(out, "  - {warning}");
        }
    }
    let _ = write!(out, "{}", entry.yaml);
    if !entry.yaml.ends_with('\n') {
        let _ = writeln!(out);
    }
}
