//! Command handlers
//!
//! Each edit command stages its change in the panel buffer and saves it
//! in the same run.

use anyhow::{bail, Context, Result};
use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, info};
use vam_client::Backend;
use vam_core::{ExposureFilter, PageSize};
use vam_panel::{Notice, NoticeLevel, Panel, PanelError, PanelUpdate};

use super::render;
use super::setup::{AlexaArgs, Commands, DomainAction, GoogleArgs, ListArgs};

pub async fn run<B: Backend>(panel: &mut Panel<B>, command: Commands) -> Result<()> {
    match command {
        Commands::State => {
            let (state, scope) = match (panel.state(), panel.scope()) {
                (Some(state), Some(scope)) => (state, scope),
                _ => bail!("state has not been loaded"),
            };
            print!(
                "{}",
                render::state(state, panel.buffer(), scope, panel.translator())
            );
        }
        Commands::List(args) => {
            apply_list_args(panel, args)?;
            print!("{}", render::page(&panel.page_view(), panel.translator()));
        }
        Commands::Bulk {
            action,
            entity_ids,
            value,
        } => {
            for entity_id in &entity_ids {
                if !panel.selection().contains(entity_id) {
                    panel.toggle_selected(entity_id);
                }
            }
            if let Some(value) = value {
                panel.set_bulk_value(value);
            }
            let outcome = panel.apply_bulk(action)?;
            info!(action = %outcome.action, changed = outcome.changed, "Bulk action applied");
            panel.save().await?;
        }
        Commands::Alias { entity_id, alias } => {
            panel.set_alias(&entity_id, &alias)?;
            panel.save().await?;
        }
        Commands::Domains { action } => {
            match action {
                DomainAction::Toggle { domains } => {
                    for domain in &domains {
                        let listed = panel.toggle_domain(domain)?;
                        debug!(domain = %domain, listed, "Toggled domain");
                    }
                }
                DomainAction::All => panel.select_all_domains()?,
                DomainAction::None => panel.deselect_all_domains()?,
            }
            panel.save().await?;
        }
        Commands::Override { entity_ids } => {
            for entity_id in &entity_ids {
                let overridden = panel.toggle_override(entity_id)?;
                debug!(entity_id = %entity_id, overridden, "Toggled override");
            }
            panel.save().await?;
        }
        Commands::FilterMode { mode } => {
            panel.set_filter_mode(mode)?;
            panel.save().await?;
        }
        Commands::Google(args) => {
            edit_google(panel, args)?;
            panel.save().await?;
        }
        Commands::Alexa(args) => {
            edit_alexa(panel, args)?;
            panel.save().await?;
        }
        Commands::Bridge { entry_id } => {
            panel.pick_bridge(entry_id.as_deref())?;
            panel.save().await?;
        }
        Commands::Mode { mode } => panel.set_mode(mode).await?,
        Commands::Preview => {
            let content = panel.preview_yaml().await?;
            print!("{}", render::preview(&content, panel.translator()));
        }
        Commands::Write => {
            panel.write_files().await?;
        }
        Commands::Check => {
            let check = panel.check_config().await?;
            if !check.success {
                let t = panel.translator();
                bail!(
                    "{}: {}",
                    t.t("configError"),
                    check.error.as_deref().unwrap_or_else(|| t.t("unknownError"))
                );
            }
        }
        Commands::Restart { yes } => match panel.restart(yes).await {
            Err(PanelError::ConfirmationRequired) => {
                bail!(
                    "{} Re-run with --yes to confirm.",
                    panel.translator().t("restartConfirm")
                )
            }
            other => other?,
        },
    }
    Ok(())
}

fn apply_list_args<B: Backend>(panel: &mut Panel<B>, args: ListArgs) -> Result<()> {
    if let Some(size) = args.page_size {
        panel.set_page_size(PageSize::try_from(size)?);
    }
    if let Some(search) = args.search {
        panel.set_search(search);
    }
    if !args.domain.is_empty() {
        panel.set_domain_filter(args.domain);
    }
    panel.set_area_filter(args.area);
    panel.set_device_filter(args.device);
    panel.set_exposure_filter(ExposureFilter::from_flags(
        args.only_hidden,
        args.only_exposed,
    ));
    panel.set_only_with_alias(args.with_alias);
    panel.set_only_overrides(args.overrides);
    panel.set_page(args.page);
    Ok(())
}

fn edit_google<B: Backend>(panel: &mut Panel<B>, args: GoogleArgs) -> Result<()> {
    let advanced_yaml = read_optional(args.advanced_yaml_file.as_deref())?;
    panel.update_google_settings(|google| {
        if let Some(enabled) = args.enabled {
            google.enabled = enabled;
        }
        if let Some(project_id) = args.project_id {
            google.project_id = project_id;
        }
        if let Some(path) = args.service_account_path {
            google.service_account_path = path;
        }
        if let Some(report_state) = args.report_state {
            google.report_state = report_state;
        }
        if let Some(pin) = args.secure_devices_pin {
            google.secure_devices_pin = pin;
        }
        if let Some(yaml) = advanced_yaml {
            google.advanced_yaml = yaml;
        }
    })?;
    Ok(())
}

fn edit_alexa<B: Backend>(panel: &mut Panel<B>, args: AlexaArgs) -> Result<()> {
    let advanced_yaml = read_optional(args.advanced_yaml_file.as_deref())?;
    panel.update_alexa_settings(|alexa| {
        if let Some(enabled) = args.enabled {
            alexa.enabled = enabled;
        }
        if let Some(yaml) = advanced_yaml {
            alexa.advanced_yaml = yaml;
        }
    })?;
    Ok(())
}

fn read_optional(path: Option<&std::path::Path>) -> Result<Option<String>> {
    path.map(|path| {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    })
    .transpose()
}

/// Collect the notices still queued on `rx`
///
/// Updates dropped because the receiver lagged are skipped; the newest
/// ones, which carry the outcome of the command, are kept.
pub fn drain_notices(rx: &mut broadcast::Receiver<PanelUpdate>) -> Vec<Notice> {
    let mut notices = Vec::new();
    loop {
        match rx.try_recv() {
            Ok(PanelUpdate::Notice(notice)) => notices.push(notice),
            Ok(_) => {}
            Err(TryRecvError::Lagged(skipped)) => {
                debug!(skipped, "Panel updates dropped before printing");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return notices,
        }
    }
}

/// Print info notices to stdout
///
/// Error notices are not printed: the failing operation also returns the
/// error, which `main` reports.
pub fn print_notices(rx: &mut broadcast::Receiver<PanelUpdate>) {
    for notice in drain_notices(rx) {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message),
            NoticeLevel::Error => debug!(message = %notice.message, "Error notice"),
        }
    }
}
