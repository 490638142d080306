use thiserror::Error;

/// Top-level error type for the `deeper-api` crate.
///
/// Covers every failure mode of the device client: local preconditions,
/// transport, and protocol/shape errors. `deeper-core` maps these into
/// workflow-level errors and, finally, into tool result text.
#[derive(Debug, Error)]
pub enum Error {
    // ── Authentication ──────────────────────────────────────────────
    /// Login round-trip completed but produced no session.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// Password could not be encrypted with the device public key.
    #[error("Password encryption failed: {0}")]
    Crypto(String),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, reset, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Protocol ────────────────────────────────────────────────────
    /// The device answered with a non-2xx HTTP status.
    #[error("Device returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// The device answered `success: false`.
    #[error("Device rejected the request: {message}")]
    Rejected { message: String },

    /// The response decoded but lacks a field the endpoint contract requires.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    /// JSON deserialization failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },

    // ── Local preconditions ─────────────────────────────────────────
    /// An argument was rejected before any request was sent.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Sharing config type outside `btEnabled` / `smtpEnabled` / `sharingEnabled`.
    #[error("Unknown sharing config type: {0}")]
    UnknownSharingKey(String),
}

impl Error {
    /// Shorthand for [`Error::MalformedResponse`].
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }
}
