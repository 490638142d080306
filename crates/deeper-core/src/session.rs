// ── Session state ──
//
// Everything the server remembers between tool calls: the device cookie,
// the last known tunnel code per DPN mode, and the roster fetched for
// access-control editing. Lives for one process; nothing is persisted.

use std::collections::HashMap;

use deeper_api::{AccessControlDevice, DpnMode, DpnModeStatus};
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;

/// Cache key holding the mode the device reported as active.
pub const CURRENT_MODE_KEY: &str = "curMode";

/// In-memory state for one device session.
///
/// Owned by the dispatcher, which handles one call at a time, so no
/// interior locking is needed.
#[derive(Debug, Clone)]
pub struct Session {
    cookie: Option<String>,
    dpn_tunnel_codes: HashMap<String, String>,
    device_list: Option<Vec<AccessControlDevice>>,
}

impl Default for Session {
    fn default() -> Self {
        let mut dpn_tunnel_codes = HashMap::new();
        dpn_tunnel_codes.insert(
            DpnMode::Direct.name().to_owned(),
            DpnMode::DIRECT_TUNNEL_CODE.to_owned(),
        );
        Self {
            cookie: None,
            dpn_tunnel_codes,
            device_list: None,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Cookie ───────────────────────────────────────────────────────

    pub fn cookie(&self) -> Option<&str> {
        self.cookie.as_deref()
    }

    /// Replace the cookie. Expiry is the device's business; a stale cookie
    /// shows up as a failed call, not a local check.
    pub fn set_cookie(&mut self, cookie: impl Into<String>) {
        self.cookie = Some(cookie.into());
    }

    /// The cookie, or [`CoreError::NotLoggedIn`].
    pub fn require_cookie(&self) -> Result<&str, CoreError> {
        self.cookie().ok_or(CoreError::NotLoggedIn)
    }

    // ── DPN tunnel codes ─────────────────────────────────────────────

    pub fn dpn_tunnel_code(&self, mode: &str) -> Option<&str> {
        self.dpn_tunnel_codes.get(mode).map(String::as_str)
    }

    pub fn set_dpn_tunnel_code(&mut self, mode: impl Into<String>, code: impl Into<String>) {
        self.dpn_tunnel_codes.insert(mode.into(), code.into());
    }

    /// Fold a freshly fetched DPN status into the cache.
    ///
    /// `smartTunnel` and `fullTunnel` update their modes when they are
    /// strings; other shapes are ignored. When the device
    /// reports a textual `tunnelCode`, the active mode name is stored under
    /// [`CURRENT_MODE_KEY`].
    pub fn record_dpn_status(&mut self, status: &DpnModeStatus) {
        if let Some(Value::String(code)) = &status.smart_tunnel {
            self.set_dpn_tunnel_code(DpnMode::Smart.name(), code.clone());
        }
        if let Some(Value::String(code)) = &status.full_tunnel {
            self.set_dpn_tunnel_code(DpnMode::Full.name(), code.clone());
        }
        if status.tunnel_code.as_ref().is_some_and(Value::is_string) {
            if let Some(mode) = &status.dpn_mode {
                self.set_dpn_tunnel_code(CURRENT_MODE_KEY, mode.clone());
            }
        }
        debug!(codes = ?self.dpn_tunnel_codes, "DPN tunnel cache updated");
    }

    // ── Access-control roster ────────────────────────────────────────

    pub fn device_list(&self) -> Option<&[AccessControlDevice]> {
        self.device_list.as_deref()
    }

    pub fn set_device_list(&mut self, devices: Vec<AccessControlDevice>) {
        self.device_list = Some(devices);
    }
}
