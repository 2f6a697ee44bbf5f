//! Panel workflows against an in-memory host

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use vam_client::{Backend, ClientError, ClientResult, Command, SaveAllPayload};
use vam_core::{
    AssistantMode, Entity, ExposureFilter, ExposureReason, FilterMode, HomekitBridge, PageSize,
    Platform, ScopeKey, VoiceManagerState,
};
use vam_panel::{
    Busy, EditState, Notice, NoticeLevel, Panel, PanelError, PanelOptions, PanelUpdate,
    PendingBuffer, Tab, TabSwitch,
};

// =============================================================================
// Mock host
// =============================================================================

/// Records every command and applies `save_all` payloads to its snapshot
#[derive(Default)]
struct MockBackend {
    state: Mutex<VoiceManagerState>,
    calls: Mutex<Vec<Command>>,
    failing: Mutex<HashSet<&'static str>>,
    check_error: Mutex<Option<String>>,
}

impl MockBackend {
    fn with_state(state: VoiceManagerState) -> Arc<Self> {
        Arc::new(Self {
            state: Mutex::new(state),
            ..Default::default()
        })
    }

    fn fail(&self, command: &'static str) {
        self.failing.lock().unwrap().insert(command);
    }

    fn recover(&self, command: &'static str) {
        self.failing.lock().unwrap().remove(command);
    }

    fn call_names(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().iter().map(Command::name).collect()
    }

    fn saved_payloads(&self) -> Vec<SaveAllPayload> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter_map(|c| match c {
                Command::SaveAll(payload) => Some(payload.clone()),
                _ => None,
            })
            .collect()
    }

    fn snapshot(&self) -> VoiceManagerState {
        self.state.lock().unwrap().clone()
    }

    fn apply(&self, payload: SaveAllPayload) {
        let mut state = self.state.lock().unwrap();
        if let Some(v) = payload.filter_config {
            state.filter_config = v;
        }
        if let Some(v) = payload.aliases {
            state.aliases = v;
        }
        if let Some(v) = payload.google_filter_config {
            state.google_filter_config = v;
        }
        if let Some(v) = payload.alexa_filter_config {
            state.alexa_filter_config = v;
        }
        if let Some(v) = payload.homekit_filter_config {
            state.homekit_filter_config = v;
        }
        if let Some(v) = payload.google_aliases {
            state.google_aliases = v;
        }
        if let Some(v) = payload.alexa_aliases {
            state.alexa_aliases = v;
        }
        if let Some(v) = payload.google_settings {
            state.google_settings = v;
        }
        if let Some(v) = payload.alexa_settings {
            state.alexa_settings = v;
        }
        if let Some(v) = payload.homekit_entry_id {
            state.homekit_entry_id = v;
        }
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn call(&self, command: Command) -> ClientResult<Value> {
        self.calls.lock().unwrap().push(command.clone());

        if self.failing.lock().unwrap().contains(command.name()) {
            return Err(ClientError::Remote {
                code: "home_assistant_error".to_string(),
                message: "disk full".to_string(),
            });
        }

        let result = match command {
            Command::GetState => serde_json::to_value(self.snapshot()).unwrap(),
            Command::SetMode { mode } => {
                self.state.lock().unwrap().mode = mode;
                Value::Null
            }
            Command::SaveAll(payload) => {
                self.apply(payload);
                Value::Null
            }
            Command::PreviewYaml => json!({
                "google": {"yaml": "google_assistant:\n", "warnings": [], "complete": false}
            }),
            Command::WriteFiles => json!({
                "google": {"written": true, "error": null},
                "alexa": {"written": false, "error": "Alexa settings incomplete"},
                "homekit": {"written": false, "error": null}
            }),
            Command::CheckConfig => match self.check_error.lock().unwrap().clone() {
                Some(error) => json!({"success": false, "error": error}),
                None => json!({"success": true}),
            },
            Command::Restart => Value::Null,
        };
        Ok(result)
    }
}

// =============================================================================
// Fixtures
// =============================================================================

fn catalog_state() -> VoiceManagerState {
    VoiceManagerState {
        entities: vec![
            Entity::new("light.kitchen")
                .with_name("Kitchen")
                .with_device("dev-kitchen")
                .with_area("kitchen", "Kitchen"),
            Entity::new("light.living").with_name("Living Room"),
            Entity::new("switch.lamp").with_name("Lamp"),
            Entity::new("sensor.temp1").with_name("Temperature 1"),
            Entity::new("sensor.temp2").with_name("Temperature 2"),
        ],
        domains: vec!["light".into(), "sensor".into(), "switch".into()],
        homekit_bridges: vec![HomekitBridge {
            entry_id: "bridge-1".to_string(),
            title: "HASS Bridge:21064".to_string(),
            port: 21064,
            name: "HASS Bridge".to_string(),
            include_domains: Vec::new(),
            exclude_entities: Vec::new(),
        }],
        ..Default::default()
    }
}

fn large_state(count: usize) -> VoiceManagerState {
    VoiceManagerState {
        entities: (0..count)
            .map(|i| Entity::new(format!("sensor.s{i:03}")))
            .collect(),
        ..Default::default()
    }
}

async fn loaded(state: VoiceManagerState) -> (Panel<Arc<MockBackend>>, Arc<MockBackend>) {
    let backend = MockBackend::with_state(state);
    let mut panel = Panel::new(backend.clone(), PanelOptions::default());
    panel.load().await.unwrap();
    (panel, backend)
}

fn drain(rx: &mut broadcast::Receiver<PanelUpdate>) -> Vec<PanelUpdate> {
    let mut updates = Vec::new();
    while let Ok(update) = rx.try_recv() {
        updates.push(update);
    }
    updates
}

fn notices(updates: &[PanelUpdate]) -> Vec<Notice> {
    updates
        .iter()
        .filter_map(|u| match u {
            PanelUpdate::Notice(notice) => Some(notice.clone()),
            _ => None,
        })
        .collect()
}

// =============================================================================
// Dirty tracking
// =============================================================================

#[tokio::test]
async fn test_override_discard_then_save() {
    let (mut panel, backend) = loaded(catalog_state()).await;
    assert_eq!(panel.edit_state(), EditState::Clean);

    assert!(panel.toggle_override("light.kitchen").unwrap());
    assert!(panel.is_dirty());

    panel.discard().unwrap();
    assert!(!panel.is_dirty());
    assert_eq!(
        panel.buffer(),
        &PendingBuffer::from_state(panel.state().unwrap())
    );
    assert!(!panel
        .current_filter_config()
        .unwrap()
        .is_override("light.kitchen"));

    panel.toggle_override("light.kitchen").unwrap();
    panel.save().await.unwrap();

    assert!(!panel.is_dirty());
    assert!(panel.state().unwrap().filter_config.is_override("light.kitchen"));
    assert!(backend.snapshot().filter_config.is_override("light.kitchen"));
    assert_eq!(backend.call_names(), ["get_state", "save_all", "get_state"]);
}

#[tokio::test]
async fn test_failed_save_keeps_edits() {
    let (mut panel, backend) = loaded(catalog_state()).await;
    let mut rx = panel.subscribe();
    backend.fail("save_all");

    panel.toggle_domain("light").unwrap();
    let err = panel.save().await.unwrap_err();

    assert!(matches!(err, PanelError::Remote { .. }));
    assert!(panel.is_dirty());
    assert!(panel.current_filter_config().unwrap().domains.contains("light"));
    assert!(!panel.is_busy());

    let updates = drain(&mut rx);
    assert_eq!(
        notices(&updates),
        [Notice {
            level: NoticeLevel::Error,
            message: "Failed to save settings: disk full".to_string(),
        }]
    );

    backend.recover("save_all");
    panel.save().await.unwrap();
    assert!(!panel.is_dirty());
    assert!(backend.snapshot().filter_config.domains.contains("light"));
}

#[tokio::test]
async fn test_load_failure_is_kept_for_retry() {
    let backend = MockBackend::with_state(catalog_state());
    backend.fail("get_state");
    let mut panel = Panel::new(backend.clone(), PanelOptions::default());

    assert!(panel.load().await.is_err());
    assert_eq!(panel.load_error(), Some("disk full"));
    assert!(panel.state().is_none());
    assert!(matches!(panel.toggle_domain("light"), Err(PanelError::NotLoaded)));

    backend.recover("get_state");
    panel.load().await.unwrap();
    assert_eq!(panel.load_error(), None);
    assert_eq!(panel.state().unwrap().entities.len(), 5);
}

#[tokio::test]
async fn test_every_edit_marks_dirty() {
    let (mut panel, _backend) = loaded(catalog_state()).await;

    type P = Panel<Arc<MockBackend>>;
    let edits: [fn(&mut P); 8] = [
        |p: &mut P| p.set_filter_mode(FilterMode::Include).unwrap(),
        |p: &mut P| {
            p.toggle_domain("switch").unwrap();
        },
        |p: &mut P| p.select_all_domains().unwrap(),
        |p: &mut P| p.deselect_all_domains().unwrap(),
        |p: &mut P| p.set_alias("switch.lamp", "Desk lamp").unwrap(),
        |p: &mut P| p.update_google_settings(|g| g.enabled = true).unwrap(),
        |p: &mut P| p.update_alexa_settings(|a| a.enabled = true).unwrap(),
        |p: &mut P| p.pick_bridge(Some("bridge-1")).unwrap(),
    ];

    for edit in edits {
        panel.discard().unwrap();
        assert!(!panel.is_dirty());
        edit(&mut panel);
        assert!(panel.is_dirty());
    }
}

// =============================================================================
// Scopes and payloads
// =============================================================================

#[tokio::test]
async fn test_separate_mode_edits_active_platform() {
    let (mut panel, backend) = loaded(catalog_state()).await;

    panel.set_mode(AssistantMode::Separate).await.unwrap();
    assert_eq!(panel.state().unwrap().mode, AssistantMode::Separate);
    assert!(!panel.is_dirty());

    panel.set_platform(Platform::Alexa);
    assert_eq!(panel.scope(), Some(ScopeKey::Alexa));
    panel.toggle_domain("light").unwrap();
    panel.save().await.unwrap();

    let payload = backend.saved_payloads().pop().unwrap();
    assert!(payload.filter_config.is_none());
    assert!(payload
        .alexa_filter_config
        .as_ref()
        .unwrap()
        .domains
        .contains("light"));
    assert!(payload.google_filter_config.unwrap().domains.is_empty());

    let state = backend.snapshot();
    assert!(state.alexa_filter_config.domains.contains("light"));
    assert!(state.filter_config.domains.is_empty());
}

#[tokio::test]
async fn test_set_mode_failure_keeps_mode() {
    let (mut panel, backend) = loaded(catalog_state()).await;
    backend.fail("set_mode");

    assert!(panel.set_mode(AssistantMode::Separate).await.is_err());
    assert_eq!(panel.state().unwrap().mode, AssistantMode::Linked);
}

#[tokio::test]
async fn test_homekit_scope_has_no_aliases() {
    let (mut panel, _backend) = loaded(catalog_state()).await;
    panel.set_mode(AssistantMode::Separate).await.unwrap();
    panel.set_platform(Platform::Homekit);

    assert!(matches!(
        panel.set_alias("light.kitchen", "Kitchen"),
        Err(PanelError::AliasesUnsupported)
    ));
    assert!(!panel.is_dirty());

    panel.toggle_selected("light.kitchen");
    panel.set_bulk_value("Hey ");
    assert!(matches!(
        panel.bulk_action("set_alias_prefix"),
        Err(PanelError::Bulk(_))
    ));
    assert_eq!(panel.selection().len(), 1);
}

#[tokio::test]
async fn test_bridge_selection() {
    let (mut panel, backend) = loaded(catalog_state()).await;

    assert!(matches!(
        panel.pick_bridge(Some("missing")),
        Err(PanelError::UnknownBridge(_))
    ));
    assert!(!panel.is_dirty());

    panel.pick_bridge(Some("bridge-1")).unwrap();
    panel.save().await.unwrap();
    assert_eq!(
        backend.saved_payloads()[0].homekit_entry_id,
        Some(Some("bridge-1".to_string()))
    );
    assert_eq!(backend.snapshot().homekit_entry_id.as_deref(), Some("bridge-1"));

    panel.pick_bridge(None).unwrap();
    panel.save().await.unwrap();
    assert_eq!(backend.saved_payloads()[1].homekit_entry_id, Some(None));
}

#[tokio::test]
async fn test_alias_length_limit() {
    let (mut panel, _backend) = loaded(catalog_state()).await;

    let long = "x".repeat(129);
    assert!(matches!(
        panel.set_alias("light.kitchen", &long),
        Err(PanelError::AliasTooLong { max: 128, .. })
    ));

    panel.toggle_selected("light.kitchen");
    panel.set_bulk_value(long.as_str());
    assert!(matches!(
        panel.bulk_action("set_alias"),
        Err(PanelError::Bulk(vam_core::BulkError::AliasTooLong { max: 128, .. }))
    ));
    assert_eq!(panel.selection().len(), 1);
    assert!(!panel.is_dirty());
    panel.clear_selection();

    panel.set_alias("light.kitchen", "  Cooking light ").unwrap();
    assert_eq!(
        panel.current_aliases().unwrap().get("light.kitchen"),
        Some("Cooking light")
    );

    panel.set_alias("light.kitchen", "").unwrap();
    assert!(!panel.current_aliases().unwrap().contains("light.kitchen"));
}

// =============================================================================
// Bulk actions and selection
// =============================================================================

#[tokio::test]
async fn test_bulk_action_clears_selection() {
    let (mut panel, _backend) = loaded(catalog_state()).await;

    panel.toggle_selected("sensor.temp1");
    let mut rx = panel.subscribe();
    panel.set_bulk_value("unused");
    assert_eq!(drain(&mut rx), [PanelUpdate::SelectionChanged]);

    let outcome = panel.bulk_action("exclude_domain").unwrap();
    assert_eq!(drain(&mut rx), [PanelUpdate::Edited]);

    assert_eq!(outcome.changed, 1);
    assert!(panel.selection().is_empty());
    assert_eq!(panel.bulk_value(), "");
    assert!(panel.is_dirty());

    let rows = panel.rows();
    let temp2 = rows.iter().find(|r| r.entity_id == "sensor.temp2").unwrap();
    assert!(!temp2.exposed);
    assert_eq!(temp2.reason, ExposureReason::Domain);
    assert_eq!(temp2.reason_label, "By domain");
}

#[tokio::test]
async fn test_rejected_bulk_action_changes_nothing() {
    let (mut panel, _backend) = loaded(catalog_state()).await;
    panel.toggle_selected("light.kitchen");
    panel.set_bulk_value("value");

    assert!(matches!(
        panel.bulk_action("explode"),
        Err(PanelError::Bulk(vam_core::BulkError::UnknownAction(_)))
    ));
    assert_eq!(panel.selection().len(), 1);
    assert_eq!(panel.bulk_value(), "value");
    assert!(!panel.is_dirty());

    panel.clear_selection();
    assert!(matches!(
        panel.bulk_action("exclude"),
        Err(PanelError::Bulk(vam_core::BulkError::EmptySelection))
    ));
    assert!(!panel.is_dirty());
}

#[tokio::test]
async fn test_bulk_prefix_uses_display_names() {
    let (mut panel, _backend) = loaded(catalog_state()).await;
    panel.toggle_selected("light.kitchen");
    panel.toggle_selected("light.living");
    panel.set_bulk_value("Hey ");

    panel.bulk_action("set_alias_prefix").unwrap();

    let aliases = panel.current_aliases().unwrap();
    assert_eq!(aliases.get("light.kitchen"), Some("Hey Kitchen"));
    assert_eq!(aliases.get("light.living"), Some("Hey Living Room"));
}

#[tokio::test]
async fn test_page_selection() {
    let (mut panel, _backend) = loaded(large_state(60)).await;
    panel.set_page_size(PageSize::try_from(25).unwrap());

    panel.set_page(2);
    panel.select_page();
    assert_eq!(panel.selection().len(), 25);
    assert_eq!(panel.selection().first().map(String::as_str), Some("sensor.s025"));
    assert!(panel.page_view().rows.iter().all(|r| r.selected));

    panel.set_page(3);
    panel.select_page();
    assert_eq!(panel.selection().len(), 35);

    panel.deselect_page();
    assert_eq!(panel.selection().len(), 25);
    assert!(!panel.toggle_selected("sensor.s025"));
    assert_eq!(panel.selection().len(), 24);
}

// =============================================================================
// Filters and paging
// =============================================================================

#[tokio::test]
async fn test_filter_changes_reset_page() {
    let (mut panel, _backend) = loaded(large_state(60)).await;
    panel.set_page_size(PageSize::try_from(25).unwrap());
    panel.set_page(3);

    let view = panel.page_view();
    assert_eq!(view.page, 3);
    assert_eq!(view.total_pages, 3);
    assert_eq!(view.rows.len(), 10);
    assert_eq!(view.showing(), Some((51, 60)));

    panel.set_search("s00");
    assert_eq!(panel.page(), 1);
    let view = panel.page_view();
    assert_eq!(view.total, 10);
    assert_eq!(view.catalog_total, 60);

    panel.set_page(2);
    panel.set_page_size(PageSize::try_from(100).unwrap());
    assert_eq!(panel.page(), 1);
}

#[tokio::test]
async fn test_page_clamped_when_results_shrink() {
    let (mut panel, _backend) = loaded(large_state(60)).await;
    panel.set_page_size(PageSize::try_from(25).unwrap());
    panel.set_page(99);

    assert_eq!(panel.page_view().page, 3);

    panel.set_only_overrides(true);
    let view = panel.page_view();
    assert_eq!(view.page, 1);
    assert_eq!(view.total_pages, 0);
    assert!(view.rows.is_empty());
    assert_eq!(view.showing(), None);
}

#[tokio::test]
async fn test_exposure_and_alias_filters() {
    let (mut panel, _backend) = loaded(catalog_state()).await;
    panel.toggle_domain("light").unwrap();
    panel.set_alias("switch.lamp", "Desk").unwrap();

    panel.set_exposure_filter(ExposureFilter::OnlyHidden);
    let hidden: Vec<String> = panel.rows().into_iter().map(|r| r.entity_id).collect();
    assert_eq!(hidden, ["light.kitchen", "light.living"]);

    panel.set_exposure_filter(ExposureFilter::from_flags(true, true));
    assert_eq!(panel.rows().len(), 2);

    panel.clear_filters();
    panel.set_only_with_alias(true);
    let rows = panel.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].alias.as_deref(), Some("Desk"));

    panel.clear_filters();
    panel.set_area_filter(Some("kitchen".to_string()));
    assert_eq!(panel.rows().len(), 1);

    panel.clear_filters();
    panel.set_device_filter(Some("dev-kitchen".to_string()));
    panel.set_domain_filter(vec!["light".to_string()]);
    assert_eq!(panel.rows()[0].entity_id, "light.kitchen");
}

#[tokio::test(start_paused = true)]
async fn test_debounced_search_applies_last_text() {
    let backend = MockBackend::with_state(catalog_state());
    let options = PanelOptions {
        search_debounce: Duration::from_millis(300),
        ..Default::default()
    };
    let mut panel = Panel::new(backend, options);
    panel.load().await.unwrap();

    let (tx, mut input) = panel.search_input();
    for text in ["t", "te", "temp"] {
        tx.send(text.to_string()).unwrap();
    }

    assert!(panel.apply_debounced_search(&mut input).await);
    assert_eq!(panel.filters().search, "temp");
    assert_eq!(panel.rows().len(), 2);

    drop(tx);
    assert!(!panel.apply_debounced_search(&mut input).await);
}

// =============================================================================
// Tabs
// =============================================================================

#[tokio::test]
async fn test_tab_switch_with_unsaved_edits() {
    let (mut panel, _backend) = loaded(catalog_state()).await;
    let mut rx = panel.subscribe();

    assert_eq!(panel.request_tab(Tab::Settings), TabSwitch::Switched(Tab::Settings));
    assert_eq!(panel.tab(), Tab::Settings);

    panel.update_google_settings(|g| g.project_id = "home-1234".into()).unwrap();
    assert_eq!(
        panel.request_tab(Tab::Entities),
        TabSwitch::NeedsConfirmation(Tab::Entities)
    );
    assert_eq!(panel.tab(), Tab::Settings);
    assert!(drain(&mut rx).contains(&PanelUpdate::ConfirmDiscard(Tab::Entities)));

    panel.cancel_tab_switch();
    assert_eq!(panel.pending_tab(), None);
    assert_eq!(drain(&mut rx), [PanelUpdate::TabChanged(Tab::Settings)]);
    assert!(panel.is_dirty());
    assert_eq!(panel.buffer().google_settings().project_id, "home-1234");

    panel.request_tab(Tab::Entities);
    assert_eq!(panel.confirm_tab_switch().unwrap(), Some(Tab::Entities));
    assert_eq!(panel.tab(), Tab::Entities);
    assert!(!panel.is_dirty());
    assert_eq!(panel.buffer().google_settings().project_id, "");
}

// =============================================================================
// Remote operations
// =============================================================================

#[tokio::test]
async fn test_write_files_saves_pending_edits_first() {
    let (mut panel, backend) = loaded(catalog_state()).await;
    let mut rx = panel.subscribe();

    panel.toggle_override("switch.lamp").unwrap();
    let result = panel.write_files().await.unwrap();

    assert!(result.google.written);
    assert!(!panel.is_dirty());
    assert_eq!(
        backend.call_names(),
        ["get_state", "save_all", "write_files", "get_state"]
    );

    let updates = drain(&mut rx);
    assert!(updates.contains(&PanelUpdate::Busy(true)));
    assert_eq!(updates.last(), Some(&PanelUpdate::Busy(false)));
    let notices = notices(&updates);
    assert_eq!(notices.len(), 1);
    assert_eq!(
        notices[0].message,
        "Configuration saved:\n- Google Assistant: OK\n- Alexa: Alexa settings incomplete"
    );
}

#[tokio::test]
async fn test_write_files_when_clean_skips_save() {
    let (mut panel, backend) = loaded(catalog_state()).await;
    panel.write_files().await.unwrap();
    assert_eq!(backend.call_names(), ["get_state", "write_files", "get_state"]);
}

#[tokio::test]
async fn test_restart_requires_confirmation() {
    let (mut panel, backend) = loaded(catalog_state()).await;

    assert!(matches!(
        panel.restart(false).await,
        Err(PanelError::ConfirmationRequired)
    ));
    assert_eq!(backend.call_names(), ["get_state"]);

    let mut rx = panel.subscribe();
    panel.restart(true).await.unwrap();
    assert_eq!(backend.call_names(), ["get_state", "restart"]);
    assert_eq!(
        notices(&drain(&mut rx)),
        [Notice::info("Home Assistant is restarting...")]
    );
}

#[tokio::test]
async fn test_check_config_reports_host_error() {
    let (mut panel, backend) = loaded(catalog_state()).await;
    *backend.check_error.lock().unwrap() = Some("Invalid config for google_assistant".into());
    let mut rx = panel.subscribe();

    let check = panel.check_config().await.unwrap();

    assert!(!check.success);
    assert_eq!(
        notices(&drain(&mut rx)),
        [Notice::error(
            "Configuration error: Invalid config for google_assistant"
        )]
    );
    assert_eq!(panel.busy(), Busy::Idle);
}

#[tokio::test]
async fn test_preview_and_localized_failure() {
    let backend = MockBackend::with_state(catalog_state());
    let options = PanelOptions {
        language: "it-IT".to_string(),
        ..Default::default()
    };
    let mut panel = Panel::new(backend.clone(), options);
    panel.load().await.unwrap();

    let preview = panel.preview_yaml().await.unwrap();
    assert!(!preview.google.unwrap().complete);
    assert!(preview.alexa.is_none());

    let mut rx = panel.subscribe();
    panel.check_config().await.unwrap();
    assert_eq!(
        notices(&drain(&mut rx)),
        [Notice::info("Configurazione valida!")]
    );

    // no Italian entry for the prefix, so English is used
    backend.fail("preview_yaml");
    let err = panel.preview_yaml().await.unwrap_err();
    assert_eq!(err.to_string(), "Failed to preview YAML: disk full");
}
