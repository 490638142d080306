// Admin endpoints: session login and reboot
//
// Login posts the encrypted password and hands back the first cookie the
// device sets. Reboot tolerates the connection drop a rebooting device
// causes.

use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use reqwest::header::{COOKIE, SET_COOKIE};
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::{debug, info, warn};

use crate::device::models::Ack;
use crate::device::{DeviceClient, parse_body};
use crate::error::Error;

/// Deadline for the reboot request. The device drops the connection as it
/// goes down, so waiting longer only delays the same outcome.
const REBOOT_TIMEOUT: Duration = Duration::from_secs(1);

impl DeviceClient {
    /// Authenticate and return the session cookie as `name=value`.
    ///
    /// `POST /api/admin/login` with `{"username", "password"}`, the password
    /// RSA-encrypted and base64-encoded. Cookie attributes (`Path`,
    /// `HttpOnly`, ...) are stripped; only the first `Set-Cookie` is used.
    pub async fn login(&self, username: &str, password: &SecretString) -> Result<String, Error> {
        let url = self.api_url("admin/login")?;
        debug!("logging in at {}", url);

        let encrypted = self.encryptor().encrypt(password.expose_secret())?;
        let body = json!({
            "username": username,
            "password": encrypted,
        });

        let resp = self
            .http()
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(Error::Authentication {
                message: format!("login failed (HTTP {status}): {body}"),
            });
        }

        let cookie = resp
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .find_map(|v| v.to_str().ok())
            .and_then(session_pair)
            .ok_or_else(|| Error::Authentication {
                message: "device returned no session cookie".into(),
            })?;

        info!(username, "login successful");
        Ok(cookie)
    }

    /// Ask the device to reboot.
    ///
    /// `POST /api/admin/reboot` with a 1 s deadline. Transport failures that
    /// [`is_expected_disconnect`] recognises count as success; everything
    /// else (refused connection, HTTP error, `success: false`) is reported.
    pub async fn reboot(&self, cookie: &str) -> Result<(), Error> {
        let url = self.api_url("admin/reboot")?;
        debug!("POST {}", url);

        let sent = self
            .http()
            .post(url)
            .header(COOKIE, cookie)
            .json(&json!({}))
            .timeout(REBOOT_TIMEOUT)
            .send()
            .await;

        let outcome = match sent {
            Ok(resp) => parse_body::<Ack>(resp).await.and_then(Ack::into_result),
            Err(e) => Err(Error::Transport(e)),
        };

        match outcome {
            Err(Error::Transport(e)) if is_expected_disconnect(&e) => {
                warn!(error = %e, "reboot request cut off, treating as accepted");
                Ok(())
            }
            other => other,
        }
    }
}

/// Keep `name=value` from a `Set-Cookie` directive.
fn session_pair(directive: &str) -> Option<String> {
    let pair = directive.split(';').next()?.trim();
    (!pair.is_empty()).then(|| pair.to_owned())
}

/// Best-effort completion under expected disconnect.
///
/// A device that has begun rebooting stops answering mid-request. Timeouts,
/// connection resets/aborts and a connection closed before the response
/// completed are indistinguishable from that and count as success. Refused
/// connections and anything else remain errors. Only reboot applies this.
pub fn is_expected_disconnect(err: &reqwest::Error) -> bool {
    if err.is_timeout() {
        return true;
    }

    let mut source: Option<&(dyn StdError + 'static)> = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::UnexpectedEof
                    | io::ErrorKind::BrokenPipe
            ) {
                return true;
            }
        }
        let text = cause.to_string();
        if text.contains("connection closed before message completed")
            || text.contains("hang up")
        {
            return true;
        }
        source = cause.source();
    }
    false
}
