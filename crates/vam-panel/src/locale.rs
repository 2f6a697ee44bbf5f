//! Localized strings
//!
//! Static tables per language. Lookups fall back to English, then to the
//! key itself.

use std::collections::HashMap;
use std::sync::OnceLock;

type Table = HashMap<&'static str, &'static str>;

static TABLES: OnceLock<HashMap<&'static str, Table>> = OnceLock::new();

const EN: &[(&str, &str)] = &[
    ("title", "Voice Assistant Manager"),
    ("mode", "Mode"),
    ("linked", "Linked"),
    ("separate", "Separate"),
    ("exclude", "Exclude"),
    ("include", "Include"),
    ("entities", "Entities"),
    ("settings", "Settings"),
    ("domainsToExclude", "Domains to Exclude"),
    ("domainsToInclude", "Domains to Include"),
    ("selected", "selected"),
    ("status", "Status"),
    ("override", "Override"),
    ("voiceAlias", "Voice Alias"),
    ("name", "Name"),
    ("domain", "Domain"),
    ("area", "Area"),
    ("reason", "Reason"),
    ("exposed", "Exposed"),
    ("hidden", "Hidden"),
    ("byDomain", "By domain"),
    ("manual", "Manual"),
    ("showing", "Showing"),
    ("of", "of"),
    ("total", "total"),
    ("page", "Page"),
    ("noResults", "No entities match the current filters"),
    ("googleAssistant", "Google Assistant"),
    ("amazonAlexa", "Amazon Alexa"),
    ("homekitBridge", "HomeKit Bridge"),
    ("noBridge", "No bridge (disabled)"),
    ("googleReady", "Google Assistant: Ready"),
    ("googleNotConfigured", "Google Assistant: Not configured"),
    ("alexaReady", "Alexa: Ready"),
    ("alexaNotConfigured", "Alexa: Not configured"),
    ("homekitEnabledStatus", "HomeKit: Enabled"),
    ("homekitDisabledStatus", "HomeKit: Disabled"),
    ("lastGenerated", "Last generated"),
    ("warnings", "Warnings"),
    ("notConfigured", "Not configured"),
    ("error", "Error"),
    ("unsavedChanges", "You have unsaved changes. Discard them?"),
    ("aliasRequired", "Please enter an alias"),
    ("settingsSaved", "Settings saved successfully!"),
    ("configValid", "Configuration valid!"),
    ("configError", "Configuration error"),
    ("unknownError", "Unknown error"),
    ("restartConfirm", "Are you sure you want to restart Home Assistant?"),
    ("restarting", "Home Assistant is restarting..."),
    ("configSaved", "Configuration saved:"),
    ("googleOk", "Google Assistant: OK"),
    ("alexaOk", "Alexa: OK"),
    ("homekitOk", "HomeKit: OK"),
    ("failedLoad", "Failed to load Voice Manager state"),
    ("failedSetMode", "Failed to set mode"),
    ("failedSave", "Failed to save settings"),
    ("failedPreview", "Failed to preview YAML"),
    ("failedWrite", "Failed to write files"),
    ("failedCheck", "Failed to check config"),
    ("failedRestart", "Failed to restart"),
];

const IT: &[(&str, &str)] = &[
    ("title", "Voice Assistant Manager"),
    ("mode", "Modalità"),
    ("linked", "Collegata"),
    ("separate", "Separata"),
    ("exclude", "Escludi"),
    ("include", "Includi"),
    ("entities", "Entità"),
    ("settings", "Impostazioni"),
    ("domainsToExclude", "Domini da Escludere"),
    ("domainsToInclude", "Domini da Includere"),
    ("selected", "selezionati"),
    ("status", "Stato"),
    ("override", "Override"),
    ("voiceAlias", "Alias Vocale"),
    ("name", "Nome"),
    ("domain", "Dominio"),
    ("area", "Area"),
    ("reason", "Motivo"),
    ("exposed", "Esposto"),
    ("hidden", "Nascosto"),
    ("byDomain", "Per dominio"),
    ("manual", "Manuale"),
    ("showing", "Mostrando"),
    ("of", "di"),
    ("total", "totali"),
    ("page", "Pagina"),
    ("noResults", "Nessuna entità corrisponde ai filtri attuali"),
    ("googleAssistant", "Google Assistant"),
    ("amazonAlexa", "Amazon Alexa"),
    ("homekitBridge", "Bridge HomeKit"),
    ("noBridge", "Nessun bridge (disabilitato)"),
    ("googleReady", "Google Assistant: Pronto"),
    ("googleNotConfigured", "Google Assistant: Non configurato"),
    ("alexaReady", "Alexa: Pronto"),
    ("alexaNotConfigured", "Alexa: Non configurato"),
    ("homekitEnabledStatus", "HomeKit: Abilitato"),
    ("homekitDisabledStatus", "HomeKit: Disabilitato"),
    ("warnings", "Avvisi"),
    ("notConfigured", "Non configurato"),
    ("error", "Errore"),
    ("settingsSaved", "Impostazioni salvate con successo!"),
    ("configValid", "Configurazione valida!"),
    ("configError", "Errore configurazione"),
    ("restartConfirm", "Sei sicuro di voler riavviare Home Assistant?"),
    ("restarting", "Home Assistant si sta riavviando..."),
    ("configSaved", "Configurazione salvata:"),
    ("googleOk", "Google Assistant: OK"),
    ("alexaOk", "Alexa: OK"),
    ("homekitOk", "HomeKit: OK"),
];

fn tables() -> &'static HashMap<&'static str, Table> {
    TABLES.get_or_init(|| {
        let mut tables = HashMap::new();
        tables.insert("en", EN.iter().copied().collect());
        tables.insert("it", IT.iter().copied().collect());
        tables
    })
}

/// Resolves keys for one language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Translator {
    language: &'static str,
}

impl Translator {
    /// Pick a table from the first two letters of a language tag
    /// (`it-IT` -> `it`). Unknown languages use English.
    pub fn new(language: &str) -> Self {
        let code = language.get(..2).unwrap_or(language).to_ascii_lowercase();
        let language = tables()
            .get_key_value(code.as_str())
            .map(|(key, _)| *key)
            .unwrap_or("en");
        Self { language }
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        let tables = tables();
        tables
            .get(self.language)
            .and_then(|table| table.get(key))
            .or_else(|| tables.get("en").and_then(|table| table.get(key)))
            .copied()
            .unwrap_or(key)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new("en")
    }
}
