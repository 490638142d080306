// Device API HTTP client
//
// Wraps `reqwest::Client` with device URL construction, cookie attachment
// and response decoding. Endpoint groups (smart route, security, sharing,
// etc.) are implemented as inherent methods in separate files so this
// module stays focused on transport mechanics.

pub mod models;

mod access_control;
mod app_relocator;
mod auth;
mod security;
mod sharing;
mod smart_route;
mod system;

pub use auth::is_expected_disconnect;

use reqwest::header::COOKIE;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::crypto::PasswordEncryptor;
use crate::device::models::Ack;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Host used when nothing else is configured.
pub const DEFAULT_HOST: &str = "34.34.34.34";

/// Longest body excerpt carried in error messages.
const PREVIEW_CHARS: usize = 200;

/// HTTP client for the device's admin API.
///
/// The client is stateless with respect to authentication: every call
/// takes the session cookie explicitly and sends it verbatim in the
/// `Cookie` header. Callers own the session.
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
    encryptor: PasswordEncryptor,
}

impl DeviceClient {
    /// Create a client for `base_url` (e.g. `http://34.34.34.34`).
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            encryptor: PasswordEncryptor::default(),
        }
    }

    /// Use a different public key for login password encryption.
    pub fn with_encryptor(mut self, encryptor: PasswordEncryptor) -> Self {
        self.encryptor = encryptor;
        self
    }

    /// The underlying HTTP client.
    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Point the client at another device. Existing cookies are not
    /// carried over by the device, so callers should log in again.
    pub fn set_base_url(&mut self, base_url: Url) {
        debug!(%base_url, "device base URL changed");
        self.base_url = base_url;
    }

    /// Parse a user-supplied host or URL. A bare host or IP gets `http://`.
    pub fn parse_base_url(input: &str) -> Result<Url, Error> {
        let trimmed = input.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument("base URL must not be empty".into()));
        }
        let candidate = if trimmed.contains("://") {
            trimmed.to_owned()
        } else {
            format!("http://{trimmed}")
        };
        let url = Url::parse(&candidate)?;
        if url.host_str().is_none() {
            return Err(Error::InvalidArgument(format!("no host in {input:?}")));
        }
        Ok(url)
    }

    pub(crate) fn encryptor(&self) -> &PasswordEncryptor {
        &self.encryptor
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/api/{path}`.
    pub(crate) fn api_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and decode the JSON body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        cookie: &str,
        path: &str,
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .header(COOKIE, cookie)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_body(resp).await
    }

    /// Send an authenticated POST with a JSON body and decode the reply.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        cookie: &str,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<T, Error> {
        let url = self.api_url(path)?;
        debug!("POST {}", url);

        let resp = self
            .http
            .post(url)
            .header(COOKIE, cookie)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;

        parse_body(resp).await
    }

    /// POST and require an explicit `success: true` acknowledgement.
    pub(crate) async fn post_ack(
        &self,
        cookie: &str,
        path: &str,
        body: &(impl Serialize + Sync),
    ) -> Result<(), Error> {
        let ack: Ack = self.post(cookie, path, body).await?;
        ack.into_result()
    }
}

/// Check the status line, then decode the JSON body into `T`.
pub(crate) async fn parse_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(Error::Http {
            status: status.as_u16(),
            message: preview(&body),
        });
    }

    let body = resp.text().await.map_err(Error::Transport)?;

    serde_json::from_str(&body).map_err(|e| Error::Deserialization {
        message: format!("{e} (body preview: {:?})", preview(&body)),
        body,
    })
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}
