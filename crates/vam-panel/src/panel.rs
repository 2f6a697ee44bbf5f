//! The panel state container
//!
//! [`Panel`] owns the committed snapshot, the pending-edit buffer and the
//! view state (tab, platform, selection, filters, page). Local edits only
//! touch the buffer; remote operations go through a [`Backend`]. Every
//! change ends with one [`PanelUpdate`] sent to subscribers.

use std::time::Duration;

use indexmap::IndexSet;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};
use vam_client::{Backend, CheckResult, ClientError, PreviewContent, SaveAllPayload, WriteResult};
use vam_core::{
    apply_bulk_action, filter_entities, paginate, resolve_scope, AliasMap, AlexaSettings,
    AssistantMode, BulkAction, BulkOutcome, BulkTarget, EntityFilters, ExposureFilter,
    FilterConfig, FilterMode, GoogleSettings, PageSize, Platform, ScopeKey, VoiceManagerState,
    MAX_ALIAS_LENGTH,
};

use crate::buffer::PendingBuffer;
use crate::debounce::{Debouncer, DEFAULT_SEARCH_DEBOUNCE};
use crate::dirty::{request_tab_switch, EditEvent, EditState, Tab, TabSwitch};
use crate::error::{PanelError, PanelResult};
use crate::locale::Translator;
use crate::update::{Busy, Notice, PanelUpdate};
use crate::view::{write_summary, EntityRow, PageView};

const UPDATE_CAPACITY: usize = 64;

/// Construction options for [`Panel`]
#[derive(Debug, Clone)]
pub struct PanelOptions {
    pub language: String,
    pub page_size: PageSize,
    pub search_debounce: Duration,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            page_size: PageSize::default(),
            search_debounce: DEFAULT_SEARCH_DEBOUNCE,
        }
    }
}

pub struct Panel<B> {
    backend: B,
    translator: Translator,
    committed: Option<VoiceManagerState>,
    buffer: PendingBuffer,
    edit_state: EditState,
    load_error: Option<String>,
    busy: Busy,
    tab: Tab,
    pending_tab: Option<Tab>,
    platform: Platform,
    selection: IndexSet<String>,
    bulk_value: String,
    filters: EntityFilters,
    page: usize,
    page_size: PageSize,
    search_debounce: Duration,
    updates: broadcast::Sender<PanelUpdate>,
}

impl<B: Backend> Panel<B> {
    pub fn new(backend: B, options: PanelOptions) -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CAPACITY);
        Self {
            backend,
            translator: Translator::new(&options.language),
            committed: None,
            buffer: PendingBuffer::default(),
            edit_state: EditState::Clean,
            load_error: None,
            busy: Busy::Idle,
            tab: Tab::default(),
            pending_tab: None,
            platform: Platform::default(),
            selection: IndexSet::new(),
            bulk_value: String::new(),
            filters: EntityFilters::default(),
            page: 1,
            page_size: options.page_size,
            search_debounce: options.search_debounce,
            updates,
        }
    }

    /// Receive every update published after this call
    pub fn subscribe(&self) -> broadcast::Receiver<PanelUpdate> {
        self.updates.subscribe()
    }

    fn notify(&self, update: PanelUpdate) {
        // no subscribers is fine
        let _ = self.updates.send(update);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    /// The last snapshot loaded from the host
    pub fn state(&self) -> Option<&VoiceManagerState> {
        self.committed.as_ref()
    }

    pub fn buffer(&self) -> &PendingBuffer {
        &self.buffer
    }

    pub fn edit_state(&self) -> EditState {
        self.edit_state
    }

    pub fn is_dirty(&self) -> bool {
        self.edit_state.is_dirty()
    }

    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    pub fn busy(&self) -> Busy {
        self.busy
    }

    /// Advisory: front ends disable controls while this is set
    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn pending_tab(&self) -> Option<Tab> {
        self.pending_tab
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// The scope edits currently apply to
    pub fn scope(&self) -> Option<ScopeKey> {
        self.committed
            .as_ref()
            .map(|state| resolve_scope(state.mode, self.platform))
    }

    pub fn current_filter_config(&self) -> Option<&FilterConfig> {
        self.scope().map(|scope| self.buffer.filter_config(scope))
    }

    pub fn current_aliases(&self) -> Option<&AliasMap> {
        self.scope().and_then(|scope| self.buffer.aliases(scope))
    }

    pub fn selection(&self) -> &IndexSet<String> {
        &self.selection
    }

    pub fn bulk_value(&self) -> &str {
        &self.bulk_value
    }

    pub fn filters(&self) -> &EntityFilters {
        &self.filters
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    // =========================================================================
    // Remote operations
    // =========================================================================

    /// Fetch the snapshot and rebuild the buffer from it
    ///
    /// On failure the message is kept in [`Panel::load_error`] for a retry
    /// prompt; the previous snapshot, if any, stays in place.
    pub async fn load(&mut self) -> PanelResult<()> {
        self.set_busy(Busy::Loading);
        let result = self.refresh().await;
        self.set_busy(Busy::Idle);
        result
    }

    /// Push the buffer to the host, then reload
    ///
    /// A failed save leaves the buffer and the dirty flag untouched.
    pub async fn save(&mut self) -> PanelResult<()> {
        let payload = self.save_payload()?;
        self.set_busy(Busy::Saving);
        let result = self.push(payload).await;
        self.set_busy(Busy::Idle);
        result
    }

    /// Throw away pending edits without a round trip
    pub fn discard(&mut self) -> PanelResult<()> {
        let state = self.committed.as_ref().ok_or(PanelError::NotLoaded)?;
        self.buffer = PendingBuffer::from_state(state);
        self.edit_state = self.edit_state.apply(EditEvent::Discarded);
        self.pending_tab = None;
        debug!("Discarded pending edits");
        self.notify(PanelUpdate::Discarded);
        Ok(())
    }

    /// Switch between linked and separate mode on the host immediately
    pub async fn set_mode(&mut self, mode: AssistantMode) -> PanelResult<()> {
        if self.committed.is_none() {
            return Err(PanelError::NotLoaded);
        }

        self.set_busy(Busy::Saving);
        let result = self.backend.set_mode(mode).await;
        self.set_busy(Busy::Idle);
        result.map_err(|source| self.remote_error("failedSetMode", source))?;

        if let Some(state) = self.committed.as_mut() {
            state.mode = mode;
        }
        info!(%mode, "Assistant mode changed");
        self.notify(PanelUpdate::ModeChanged(mode));
        Ok(())
    }

    pub async fn preview_yaml(&self) -> PanelResult<PreviewContent> {
        self.backend
            .preview_yaml()
            .await
            .map_err(|source| self.remote_error("failedPreview", source))
    }

    /// Save pending edits if any, write the assistant files, then reload
    pub async fn write_files(&mut self) -> PanelResult<WriteResult> {
        let payload = if self.is_dirty() {
            Some(self.save_payload()?)
        } else {
            None
        };

        self.set_busy(Busy::Saving);
        let result = self.save_then_write(payload).await;
        self.set_busy(Busy::Idle);
        result
    }

    pub async fn check_config(&mut self) -> PanelResult<CheckResult> {
        self.set_busy(Busy::Saving);
        let result = self.backend.check_config().await;
        self.set_busy(Busy::Idle);
        let check = result.map_err(|source| self.remote_error("failedCheck", source))?;

        let notice = if check.success {
            Notice::info(self.translator.t("configValid"))
        } else {
            let reason = check
                .error
                .as_deref()
                .unwrap_or_else(|| self.translator.t("unknownError"));
            Notice::error(format!("{}: {}", self.translator.t("configError"), reason))
        };
        self.notify(PanelUpdate::Notice(notice));
        Ok(check)
    }

    /// Restart the host; `confirmed` is the answer to the confirm prompt
    pub async fn restart(&mut self, confirmed: bool) -> PanelResult<()> {
        if !confirmed {
            return Err(PanelError::ConfirmationRequired);
        }

        self.set_busy(Busy::Saving);
        let result = self.backend.restart().await;
        self.set_busy(Busy::Idle);
        result.map_err(|source| self.remote_error("failedRestart", source))?;

        info!("Host restart requested");
        self.notify(PanelUpdate::Notice(Notice::info(
            self.translator.t("restarting"),
        )));
        Ok(())
    }

    async fn refresh(&mut self) -> PanelResult<()> {
        self.load_error = None;
        match self.backend.get_state().await {
            Ok(state) => {
                info!(
                    mode = %state.mode,
                    entities = state.entities.len(),
                    "Loaded voice assistant state"
                );
                self.buffer = PendingBuffer::from_state(&state);
                self.committed = Some(state);
                self.edit_state = self.edit_state.apply(EditEvent::Loaded);
                self.notify(PanelUpdate::Loaded);
                Ok(())
            }
            Err(source) => {
                let context = self.translator.t("failedLoad").to_string();
                warn!(error = %source, "{context}");
                self.load_error = Some(source.to_string());
                self.notify(PanelUpdate::Loaded);
                Err(PanelError::Remote { context, source })
            }
        }
    }

    async fn push(&mut self, payload: SaveAllPayload) -> PanelResult<()> {
        let result = self.backend.save_all(payload).await;
        result.map_err(|source| self.remote_error("failedSave", source))?;

        self.edit_state = self.edit_state.apply(EditEvent::Saved);
        info!("Saved pending edits");
        if let Err(e) = self.refresh().await {
            debug!(error = %e, "Reload after save failed");
        }
        self.notify(PanelUpdate::Saved);
        self.notify(PanelUpdate::Notice(Notice::info(
            self.translator.t("settingsSaved"),
        )));
        Ok(())
    }

    async fn save_then_write(
        &mut self,
        payload: Option<SaveAllPayload>,
    ) -> PanelResult<WriteResult> {
        if let Some(payload) = payload {
            let result = self.backend.save_all(payload).await;
            result.map_err(|source| self.remote_error("failedWrite", source))?;
            self.edit_state = self.edit_state.apply(EditEvent::Saved);
            self.notify(PanelUpdate::Saved);
        }

        let result = self.backend.write_files().await;
        let written = result.map_err(|source| self.remote_error("failedWrite", source))?;
        info!(
            google = written.google.written,
            alexa = written.alexa.written,
            homekit = written.homekit.written,
            "Wrote assistant configuration"
        );
        self.notify(PanelUpdate::Notice(Notice::info(write_summary(
            &written,
            &self.translator,
        ))));

        if let Err(e) = self.refresh().await {
            debug!(error = %e, "Reload after write failed");
        }
        Ok(written)
    }

    fn save_payload(&self) -> PanelResult<SaveAllPayload> {
        let state = self.committed.as_ref().ok_or(PanelError::NotLoaded)?;
        Ok(self.buffer.save_payload(state))
    }

    fn set_busy(&mut self, busy: Busy) {
        self.busy = busy;
        self.notify(PanelUpdate::Busy(busy.is_busy()));
    }

    fn remote_error(&self, key: &'static str, source: ClientError) -> PanelError {
        let error = PanelError::Remote {
            context: self.translator.t(key).to_string(),
            source,
        };
        warn!(error = %error, "Remote operation failed");
        self.notify(PanelUpdate::Notice(Notice::error(error.to_string())));
        error
    }

    // =========================================================================
    // Buffered edits
    // =========================================================================

    fn loaded_scope(&self) -> PanelResult<ScopeKey> {
        self.scope().ok_or(PanelError::NotLoaded)
    }

    fn mark_dirty(&mut self) {
        self.edit_state = self.edit_state.apply(EditEvent::Mutated);
        self.notify(PanelUpdate::Edited);
    }

    pub fn set_filter_mode(&mut self, mode: FilterMode) -> PanelResult<()> {
        let scope = self.loaded_scope()?;
        self.buffer.filter_config_mut(scope).filter_mode = mode;
        self.mark_dirty();
        Ok(())
    }

    /// Returns true if the domain is now listed
    pub fn toggle_domain(&mut self, domain: &str) -> PanelResult<bool> {
        let scope = self.loaded_scope()?;
        let listed = self.buffer.filter_config_mut(scope).toggle_domain(domain);
        self.mark_dirty();
        Ok(listed)
    }

    /// List every domain in the host catalog
    pub fn select_all_domains(&mut self) -> PanelResult<()> {
        let state = self.committed.as_ref().ok_or(PanelError::NotLoaded)?;
        let scope = resolve_scope(state.mode, self.platform);
        self.buffer
            .filter_config_mut(scope)
            .select_all_domains(state.domains.iter().cloned());
        self.mark_dirty();
        Ok(())
    }

    pub fn deselect_all_domains(&mut self) -> PanelResult<()> {
        let scope = self.loaded_scope()?;
        self.buffer.filter_config_mut(scope).clear_domains();
        self.mark_dirty();
        Ok(())
    }

    /// Returns true if the entity is now overridden
    pub fn toggle_override(&mut self, entity_id: &str) -> PanelResult<bool> {
        let scope = self.loaded_scope()?;
        let overridden = self.buffer.filter_config_mut(scope).toggle_override(entity_id);
        self.mark_dirty();
        Ok(overridden)
    }

    /// Set one entity's alias; a blank alias removes it
    pub fn set_alias(&mut self, entity_id: &str, alias: &str) -> PanelResult<()> {
        let scope = self.loaded_scope()?;
        let alias = alias.trim();
        if alias.chars().count() > MAX_ALIAS_LENGTH {
            return Err(PanelError::AliasTooLong {
                entity_id: entity_id.to_string(),
                max: MAX_ALIAS_LENGTH,
            });
        }

        let aliases = self
            .buffer
            .aliases_mut(scope)
            .ok_or(PanelError::AliasesUnsupported)?;
        aliases.set(entity_id, alias);
        self.mark_dirty();
        Ok(())
    }

    pub fn update_google_settings(
        &mut self,
        edit: impl FnOnce(&mut GoogleSettings),
    ) -> PanelResult<()> {
        self.loaded_scope()?;
        edit(self.buffer.google_settings_mut());
        self.mark_dirty();
        Ok(())
    }

    pub fn update_alexa_settings(
        &mut self,
        edit: impl FnOnce(&mut AlexaSettings),
    ) -> PanelResult<()> {
        self.loaded_scope()?;
        edit(self.buffer.alexa_settings_mut());
        self.mark_dirty();
        Ok(())
    }

    /// Choose the HomeKit bridge entry; `None` or an empty id detaches it
    pub fn pick_bridge(&mut self, entry_id: Option<&str>) -> PanelResult<()> {
        let state = self.committed.as_ref().ok_or(PanelError::NotLoaded)?;
        let entry_id = entry_id.filter(|id| !id.is_empty());
        if let Some(id) = entry_id {
            if state.bridge(id).is_none() {
                return Err(PanelError::UnknownBridge(id.to_string()));
            }
        }

        self.buffer.set_homekit_bridge(entry_id.map(str::to_string));
        self.mark_dirty();
        Ok(())
    }

    /// Apply a bulk action named by its wire string
    pub fn bulk_action(&mut self, action: &str) -> PanelResult<BulkOutcome> {
        let action: BulkAction = action.parse()?;
        self.apply_bulk(action)
    }

    /// Apply a bulk action to the selection
    ///
    /// On success the selection and the action value are cleared. A
    /// rejected action changes nothing, including the dirty flag.
    pub fn apply_bulk(&mut self, action: BulkAction) -> PanelResult<BulkOutcome> {
        let state = self.committed.as_ref().ok_or(PanelError::NotLoaded)?;
        let scope = resolve_scope(state.mode, self.platform);
        let selected: Vec<String> = self.selection.iter().cloned().collect();
        let (config, aliases) = self.buffer.scope_mut(scope);

        let outcome = apply_bulk_action(
            action,
            &selected,
            &self.bulk_value,
            BulkTarget {
                config,
                aliases,
                catalog: &state.entities,
            },
        )?;

        self.selection.clear();
        self.bulk_value.clear();
        self.mark_dirty();
        Ok(outcome)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Returns true if the entity is now selected
    pub fn toggle_selected(&mut self, entity_id: &str) -> bool {
        let selected = if self.selection.shift_remove(entity_id) {
            false
        } else {
            self.selection.insert(entity_id.to_string());
            true
        };
        self.notify(PanelUpdate::SelectionChanged);
        selected
    }

    /// Add every row of the current page to the selection
    pub fn select_page(&mut self) {
        for row in self.page_view().rows {
            self.selection.insert(row.entity_id);
        }
        self.notify(PanelUpdate::SelectionChanged);
    }

    /// Remove every row of the current page from the selection
    pub fn deselect_page(&mut self) {
        let page: Vec<String> = self
            .page_view()
            .rows
            .into_iter()
            .map(|row| row.entity_id)
            .collect();
        self.selection.retain(|id| !page.contains(id));
        self.notify(PanelUpdate::SelectionChanged);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.notify(PanelUpdate::SelectionChanged);
    }

    /// Value used by `set_alias`, `set_alias_prefix` and `set_alias_suffix`
    pub fn set_bulk_value(&mut self, value: impl Into<String>) {
        self.bulk_value = value.into();
        self.notify(PanelUpdate::SelectionChanged);
    }

    // =========================================================================
    // Filters, paging and navigation
    // =========================================================================

    fn update_filters(&mut self, edit: impl FnOnce(&mut EntityFilters)) {
        edit(&mut self.filters);
        self.page = 1;
        self.notify(PanelUpdate::ViewChanged);
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.update_filters(|filters| filters.search = text);
    }

    pub fn set_domain_filter(&mut self, domains: Vec<String>) {
        self.update_filters(|filters| filters.domains = domains);
    }

    pub fn set_area_filter(&mut self, area: Option<String>) {
        self.update_filters(|filters| filters.area = area);
    }

    pub fn set_device_filter(&mut self, device: Option<String>) {
        self.update_filters(|filters| filters.device = device);
    }

    pub fn set_exposure_filter(&mut self, exposure: ExposureFilter) {
        self.update_filters(|filters| filters.exposure = exposure);
    }

    pub fn set_only_with_alias(&mut self, only_with_alias: bool) {
        self.update_filters(|filters| filters.only_with_alias = only_with_alias);
    }

    pub fn set_only_overrides(&mut self, only_overrides: bool) {
        self.update_filters(|filters| filters.only_overrides = only_overrides);
    }

    pub fn clear_filters(&mut self) {
        self.update_filters(|filters| *filters = EntityFilters::default());
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        self.page = 1;
        self.notify(PanelUpdate::ViewChanged);
    }

    /// Request a page; out-of-range values are clamped when rendering
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
        self.notify(PanelUpdate::ViewChanged);
    }

    /// Pick the assistant tab edited in separate mode
    pub fn set_platform(&mut self, platform: Platform) {
        self.platform = platform;
        self.notify(PanelUpdate::ViewChanged);
    }

    /// Create a debounced search input using the configured quiet period
    pub fn search_input(&self) -> (mpsc::UnboundedSender<String>, Debouncer<String>) {
        Debouncer::channel(self.search_debounce)
    }

    /// Wait for the next settled search text and apply it. Returns false
    /// once the input is closed.
    pub async fn apply_debounced_search(&mut self, input: &mut Debouncer<String>) -> bool {
        match input.next().await {
            Some(text) => {
                self.set_search(text);
                true
            }
            None => false,
        }
    }

    /// Ask to switch tabs; with unsaved edits this only records the request
    pub fn request_tab(&mut self, target: Tab) -> TabSwitch {
        let outcome = request_tab_switch(self.edit_state, self.tab, target);
        match outcome {
            TabSwitch::Switched(tab) => {
                self.tab = tab;
                self.notify(PanelUpdate::TabChanged(tab));
            }
            TabSwitch::NeedsConfirmation(tab) => {
                self.pending_tab = Some(tab);
                self.notify(PanelUpdate::ConfirmDiscard(tab));
            }
            TabSwitch::Unchanged => {}
        }
        outcome
    }

    /// Discard pending edits and complete the recorded tab switch
    pub fn confirm_tab_switch(&mut self) -> PanelResult<Option<Tab>> {
        let Some(tab) = self.pending_tab.take() else {
            return Ok(None);
        };
        self.discard()?;
        self.tab = tab;
        self.notify(PanelUpdate::TabChanged(tab));
        Ok(Some(tab))
    }

    /// Stay on the current tab and keep the edits
    pub fn cancel_tab_switch(&mut self) {
        if self.pending_tab.take().is_some() {
            self.notify(PanelUpdate::TabChanged(self.tab));
        }
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Every row passing the filters, in catalog order
    pub fn rows(&self) -> Vec<EntityRow> {
        let Some(state) = &self.committed else {
            return Vec::new();
        };
        let scope = resolve_scope(state.mode, self.platform);
        let config = self.buffer.filter_config(scope);
        let aliases = self.buffer.aliases(scope);

        filter_entities(&state.entities, &self.filters, config, aliases)
            .into_iter()
            .map(|entity| {
                let selected = self.selection.contains(&entity.entity_id);
                EntityRow::build(entity, state, config, aliases, selected, &self.translator)
            })
            .collect()
    }

    /// The requested page of [`Panel::rows`], clamped into range
    pub fn page_view(&self) -> PageView {
        let rows = self.rows();
        let page = paginate(&rows, self.page_size, self.page);

        PageView {
            first_index: page.first_index(self.page_size),
            page: page.page,
            total_pages: page.total_pages,
            total: page.total,
            catalog_total: self.committed.as_ref().map_or(0, |s| s.entities.len()),
            rows: page.items.to_vec(),
        }
    }
}
