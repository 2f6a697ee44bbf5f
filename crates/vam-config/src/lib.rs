//! Client configuration for the Voice Assistant Manager panel
//!
//! The panel reads a small YAML file describing how to reach the host and
//! how to present the entity table. Two custom tags are understood:
//!
//! - `!secret key` - Substitute from `secrets.yaml` next to the config file
//! - `!env_var VAR` - Substitute from the process environment
//!
//! # Example
//!
//! ```ignore
//! use vam_config::PanelConfig;
//!
//! let config = PanelConfig::load("/etc/vam", "vam.yaml")?;
//! println!("{}", config.websocket_url());
//! ```

mod error;
mod loader;
mod panel_config;
mod secrets;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_yaml, YamlLoader};
pub use panel_config::{PanelConfig, DEFAULT_CONFIG_FILE};
pub use secrets::Secrets;
