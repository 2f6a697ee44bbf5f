use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use vam_core::{AssistantMode, BulkAction, FilterMode, Platform};
use vam_config::DEFAULT_CONFIG_FILE;

#[derive(Parser, Debug)]
#[command(name = "vam", bin_name = "vam", version)]
#[command(about = "Choose which entities are exposed to voice assistants", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file
    #[arg(
        short,
        long,
        global = true,
        default_value = DEFAULT_CONFIG_FILE,
        help_heading = "Options"
    )]
    pub config: PathBuf,

    /// Home Assistant base URL (overrides the config file)
    #[arg(long, global = true, env = "VAM_URL", help_heading = "Options")]
    pub url: Option<String>,

    /// Long-lived access token (overrides the config file)
    #[arg(long, global = true, env = "VAM_TOKEN", hide_env_values = true, help_heading = "Options")]
    pub token: Option<String>,

    /// Assistant to edit in separate mode: google, alexa or homekit
    #[arg(short, long, global = true, help_heading = "Options")]
    pub platform: Option<Platform>,

    /// Verbose output
    #[arg(short, long, global = true, help_heading = "Options")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show mode, filter summary and assistant status
    State,

    /// List entities with their exposure
    #[command(alias = "ls")]
    List(ListArgs),

    /// Apply a bulk action to entities and save
    Bulk {
        /// exclude, unexclude, add_override, remove_override, exclude_domain,
        /// exclude_device, set_alias, set_alias_prefix, set_alias_suffix, clear_alias
        action: BulkAction,

        #[arg(required = true)]
        entity_ids: Vec<String>,

        /// Alias, prefix or suffix for the alias actions
        #[arg(long)]
        value: Option<String>,
    },

    /// Set (or with an empty value, clear) one entity's alias and save
    Alias { entity_id: String, alias: String },

    /// Edit the domain list and save
    Domains {
        #[command(subcommand)]
        action: DomainAction,
    },

    /// Toggle overrides for entities and save
    Override {
        #[arg(required = true)]
        entity_ids: Vec<String>,
    },

    /// Set whether listed domains/entities are excluded or included, and save
    FilterMode { mode: FilterMode },

    /// Edit Google Assistant settings and save
    Google(GoogleArgs),

    /// Edit Alexa settings and save
    Alexa(AlexaArgs),

    /// Attach the HomeKit scope to a bridge entry (omit to detach) and save
    Bridge { entry_id: Option<String> },

    /// Switch between linked and separate configuration
    Mode { mode: AssistantMode },

    /// Show the generated YAML
    Preview,

    /// Write the assistant configuration files
    Write,

    /// Validate the host configuration
    Check,

    /// Restart Home Assistant
    Restart {
        /// Confirm the restart
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Match entity id or name
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only these domains
    #[arg(short, long)]
    pub domain: Vec<String>,

    #[arg(long)]
    pub area: Option<String>,

    #[arg(long)]
    pub device: Option<String>,

    #[arg(long)]
    pub only_hidden: bool,

    #[arg(long)]
    pub only_exposed: bool,

    #[arg(long)]
    pub with_alias: bool,

    #[arg(long)]
    pub overrides: bool,

    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// 25, 50, 100 or 200 (defaults to the configured size)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum DomainAction {
    /// Add missing domains, remove listed ones
    Toggle {
        #[arg(required = true)]
        domains: Vec<String>,
    },
    /// List every known domain
    All,
    /// Empty the domain list
    None,
}

#[derive(Args, Debug)]
pub struct GoogleArgs {
    #[arg(long)]
    pub enabled: Option<bool>,
    #[arg(long)]
    pub project_id: Option<String>,
    #[arg(long)]
    pub service_account_path: Option<String>,
    #[arg(long)]
    pub report_state: Option<bool>,
    #[arg(long)]
    pub secure_devices_pin: Option<String>,
    /// File whose contents replace the advanced YAML block
    #[arg(long)]
    pub advanced_yaml_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct AlexaArgs {
    #[arg(long)]
    pub enabled: Option<bool>,
    /// File whose contents replace the base configuration YAML
    #[arg(long)]
    pub advanced_yaml_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bulk() {
        let cli = Cli::try_parse_from([
            "vam",
            "bulk",
            "set_alias_prefix",
            "light.kitchen",
            "light.hall",
            "--value",
            "Hey ",
            "--platform",
            "alexa",
        ])
        .unwrap();

        assert_eq!(cli.platform, Some(Platform::Alexa));
        match cli.command {
            Commands::Bulk {
                action,
                entity_ids,
                value,
            } => {
                assert_eq!(action, BulkAction::SetAliasPrefix);
                assert_eq!(entity_ids, ["light.kitchen", "light.hall"]);
                assert_eq!(value.as_deref(), Some("Hey "));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_action_rejected() {
        assert!(Cli::try_parse_from(["vam", "bulk", "explode", "light.kitchen"]).is_err());
    }

    #[test]
    fn test_parse_list_filters() {
        let cli = Cli::try_parse_from([
            "vam", "ls", "-d", "light", "-d", "switch", "--only-hidden", "--page", "2",
        ])
        .unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.domain, ["light", "switch"]);
        assert!(args.only_hidden);
        assert_eq!(args.page, 2);
        assert_eq!(cli.config, PathBuf::from("vam.yaml"));
    }
}
