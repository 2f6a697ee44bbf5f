//! Panel error types

use thiserror::Error;
use vam_client::ClientError;
use vam_core::BulkError;

/// Result type for panel operations
pub type PanelResult<T> = Result<T, PanelError>;

/// Errors raised by panel operations
#[derive(Debug, Error)]
pub enum PanelError {
    #[error("state has not been loaded")]
    NotLoaded,

    #[error(transparent)]
    Bulk(#[from] BulkError),

    #[error("the homekit scope has no aliases")]
    AliasesUnsupported,

    #[error("alias for {entity_id} exceeds {max} characters")]
    AliasTooLong { entity_id: String, max: usize },

    #[error("unknown HomeKit bridge: {0}")]
    UnknownBridge(String),

    #[error("restart must be confirmed")]
    ConfirmationRequired,

    /// A remote call failed; `context` is the localized operation prefix
    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: ClientError,
    },
}
