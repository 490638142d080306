// ── Core error types ──
//
// Workflow-level errors from deeper-core. Tool handlers never surface raw
// HTTP or JSON failures; the `From<deeper_api::Error>` impl folds them into
// the variants below, and the dispatcher renders every variant as text.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session ──────────────────────────────────────────────────────
    #[error("Please login to Deeper device first using loginToDeeperDevice tool.")]
    NotLoggedIn,

    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Device request timed out")]
    Timeout,

    // ── Workflow preconditions ───────────────────────────────────────
    #[error(
        "tunnelCode is required for setting dpnMode, please use listTunnels tool to pick one available tunnel codes."
    )]
    TunnelCodeRequired,

    #[error("Device list not found. Please run 'setAccessControl' first to select a device.")]
    DeviceListMissing,

    #[error("Invalid index {index}. Please provide an index between 1 and {len}.")]
    IndexOutOfRange { index: u64, len: usize },

    #[error("could not enable the access control switch: {reason}")]
    AccessControlSwitch { reason: String },

    #[error("could not enable sharing first: {reason}")]
    SharingNotEnabled { reason: String },

    #[error("Ad filter must be enabled before allowing SSL bypass. Please enable ad filter first.")]
    AdsFilterDisabled,

    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // ── Device errors ────────────────────────────────────────────────
    #[error("Device rejected the request: {message}")]
    Rejected { message: String },

    #[error("Unexpected device response: {message}")]
    MalformedResponse { message: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    // ── Fan-out ──────────────────────────────────────────────────────
    #[error("{} request(s) failed: {}", .failures.len(), .failures.join("; "))]
    Aggregate { failures: Vec<String> },
}

impl CoreError {
    /// `true` for errors caused by the caller or by missing session state
    /// rather than by a failed device write. Their text is a complete
    /// instruction and is shown without a tool-name prefix.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::NotLoggedIn
                | Self::TunnelCodeRequired
                | Self::DeviceListMissing
                | Self::IndexOutOfRange { .. }
                | Self::AdsFilterDisabled
                | Self::InvalidArgument { .. }
        )
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<deeper_api::Error> for CoreError {
    fn from(err: deeper_api::Error) -> Self {
        match err {
            deeper_api::Error::Authentication { message } => {
                CoreError::AuthenticationFailed { message }
            }
            deeper_api::Error::Crypto(message) => CoreError::AuthenticationFailed {
                message: format!("password encryption failed: {message}"),
            },
            deeper_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), |u| u.origin().ascii_serialization()),
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            deeper_api::Error::InvalidUrl(e) => CoreError::InvalidArgument {
                message: format!("invalid URL: {e}"),
            },
            deeper_api::Error::Http { status, message } => CoreError::Api {
                message: format!("HTTP {status}: {message}"),
                status: Some(status),
            },
            deeper_api::Error::Rejected { message } => CoreError::Rejected { message },
            deeper_api::Error::MalformedResponse { message }
            | deeper_api::Error::Deserialization { message, .. } => {
                CoreError::MalformedResponse { message }
            }
            deeper_api::Error::InvalidArgument(message) => CoreError::InvalidArgument { message },
            deeper_api::Error::UnknownSharingKey(key) => CoreError::InvalidArgument {
                message: format!("unknown sharing config type: {key}"),
            },
        }
    }
}
