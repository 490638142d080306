// Device API response and request types
//
// The device returns bare JSON objects or arrays (no envelope). Write
// endpoints answer with an `{ success, ... }` acknowledgement. Structs keep
// unknown fields in a flattened `extra` map so records can be echoed back
// to the device without losing data.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use strum::{AsRefStr, EnumString};

use crate::error::Error;

// ── Acknowledgement ──────────────────────────────────────────────────

/// `{ "success": bool, "message"?: .., "error"?: .. }` returned by write endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct Ack {
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
}

impl Ack {
    /// Turn the acknowledgement into a result. A missing flag is not
    /// treated as success.
    pub(crate) fn into_result(self) -> Result<(), Error> {
        match self.success {
            Some(true) => Ok(()),
            Some(false) => Err(Error::Rejected {
                message: self
                    .error
                    .or(self.message)
                    .map_or_else(|| "success: false".into(), |v| value_text(&v)),
            }),
            None => Err(Error::malformed("response carries no success flag")),
        }
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// ── DPN ──────────────────────────────────────────────────────────────

/// Routing mode as the caller names it.
///
/// On the wire `Direct` is `disabled`; its tunnel code is always `DIRECT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DpnMode {
    Direct,
    Smart,
    Full,
}

impl DpnMode {
    /// Tunnel code the device expects alongside `Direct`.
    pub const DIRECT_TUNNEL_CODE: &'static str = "DIRECT";

    /// Resolve a caller-supplied mode string by substring, checking
    /// `direct`, `smart`, `full` in that order.
    pub fn from_label(label: &str) -> Option<Self> {
        if label.contains("direct") {
            Some(Self::Direct)
        } else if label.contains("smart") {
            Some(Self::Smart)
        } else if label.contains("full") {
            Some(Self::Full)
        } else {
            None
        }
    }

    /// The value sent as `dpnMode`.
    pub fn device_code(self) -> &'static str {
        match self {
            Self::Direct => "disabled",
            Self::Smart => "smart",
            Self::Full => "full",
        }
    }

    /// Key under which the mode's tunnel code is cached.
    pub fn name(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Smart => "smart",
            Self::Full => "full",
        }
    }
}

impl fmt::Display for DpnMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `GET /api/smartRoute/getDpnMode`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DpnModeStatus {
    #[serde(default)]
    pub dpn_mode: Option<String>,
    #[serde(default)]
    pub tunnel_code: Option<Value>,
    /// Usually a tunnel code; firmware has been seen to send other shapes.
    #[serde(default)]
    pub smart_tunnel: Option<Value>,
    #[serde(default)]
    pub full_tunnel: Option<Value>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// One entry of `GET /api/smartRoute/listTunnels`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tunnel {
    pub tunnel_code: String,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub active_ip: Option<String>,
    #[serde(default)]
    pub active_num: i64,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

// ── App relocator ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AppCategory {
    pub category: Option<String>,
    pub apps_by_subcategory: Option<Vec<AppSubcategory>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppSubcategory {
    pub subcategory: Option<String>,
    pub apps: Option<Vec<AppEntry>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AppEntry {
    pub app: Option<String>,
}

// ── Security ─────────────────────────────────────────────────────────

/// Parental-control category states.
///
/// `0` not blocked, `1` blocked, `2`/`4`/`8` unblocked for that many hours.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CategoryStates {
    #[serde(default)]
    pub porn: i64,
    #[serde(default)]
    pub social: i64,
    #[serde(default)]
    pub game: i64,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UrlFilterData {
    pub category_states: Option<CategoryStates>,
}

/// Ad-filter sub-categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct AdsCategoryStates {
    #[serde(default)]
    pub ads: bool,
    #[serde(default)]
    pub tracker: bool,
    #[serde(default)]
    pub malicious: bool,
}

/// `GET /api/security/getAdsFilter`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdsFilterStatus {
    pub enable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<AdsCategoryStates>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// Which parental-control categories a write changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryChanges {
    pub porn: bool,
    pub social: bool,
    pub game: bool,
}

/// Which ad-filter categories a write changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdsCategoryChanges {
    pub ads: bool,
    pub tracker: bool,
    pub malicious: bool,
}

// ── Access control ───────────────────────────────────────────────────

/// One client device on the access-control roster.
///
/// `mac` identifies the record; `mac`, `ip` and `region_code` are never
/// changed by this client.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlDevice {
    pub mac: String,
    #[serde(default)]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Number>,
    #[serde(default)]
    pub route_mode: Option<String>,
    #[serde(default)]
    pub region_code: Option<String>,
    #[serde(default)]
    pub https_filter: bool,
    #[serde(default)]
    pub bypass: Vec<String>,
    /// Kept as a raw number so fractional limits survive the echo.
    #[serde(default)]
    pub bw_limit: Option<Number>,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub remark: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

/// The mutable subset of [`AccessControlDevice`]. Absent fields are left
/// untouched by [`AccessControlDevice::apply`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessControlUpdate {
    pub route_mode: Option<String>,
    pub https_filter: Option<bool>,
    pub bypass: Option<Vec<String>>,
    pub bw_limit: Option<Number>,
    pub pinned: Option<bool>,
    pub remark: Option<String>,
    pub name: Option<String>,
}

impl AccessControlDevice {
    /// The user-facing name, empty when the device has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Merge the supplied fields onto this snapshot.
    pub fn apply(&mut self, update: AccessControlUpdate) {
        if let Some(v) = update.route_mode {
            self.route_mode = Some(v);
        }
        if let Some(v) = update.https_filter {
            self.https_filter = v;
        }
        if let Some(v) = update.bypass {
            self.bypass = v;
        }
        if let Some(v) = update.bw_limit {
            self.bw_limit = Some(v);
        }
        if let Some(v) = update.pinned {
            self.pinned = v;
        }
        if let Some(v) = update.remark {
            self.remark = Some(v);
        }
        if let Some(v) = update.name {
            self.name = Some(v);
        }
    }
}

/// `GET /api/accessControl/list`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AccessControlList {
    #[serde(default)]
    pub online: Vec<AccessControlDevice>,
    #[serde(default)]
    pub offline: Vec<AccessControlDevice>,
}

impl AccessControlList {
    /// Online devices followed by offline ones.
    pub fn into_merged(self) -> Vec<AccessControlDevice> {
        let mut all = self.online;
        all.extend(self.offline);
        all
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SwitchValue {
    pub value: Option<bool>,
}

// ── Sharing ──────────────────────────────────────────────────────────

/// The three sharing toggles the device exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr)]
pub enum SharingConfigKey {
    #[strum(serialize = "btEnabled")]
    Bt,
    #[strum(serialize = "smtpEnabled")]
    Smtp,
    #[strum(serialize = "sharingEnabled")]
    Sharing,
}

impl SharingConfigKey {
    /// Parse a wire key, failing locally on anything outside the closed set.
    pub fn parse(key: &str) -> Result<Self, Error> {
        key.parse()
            .map_err(|_| Error::UnknownSharingKey(key.to_owned()))
    }

    /// Endpoint (relative to `/api/sharing/`) that toggles this key.
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Bt => "setBtSharing",
            Self::Smtp => "setSmtpSharing",
            Self::Sharing => "setSharingState",
        }
    }
}

/// `GET /api/sharing/getSharingConfig`
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingConfig {
    #[serde(default)]
    pub sharing_enabled: bool,
    #[serde(default)]
    pub bt_enabled: bool,
    #[serde(default)]
    pub smtp_enabled: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn mode_label_matches_by_substring_in_order() {
        assert_eq!(DpnMode::from_label("direct"), Some(DpnMode::Direct));
        assert_eq!(DpnMode::from_label("smart-mode"), Some(DpnMode::Smart));
        assert_eq!(DpnMode::from_label("fullTunnel"), Some(DpnMode::Full));
        // "direct" wins when several names appear
        assert_eq!(DpnMode::from_label("smart-direct"), Some(DpnMode::Direct));
        assert_eq!(DpnMode::from_label("auto"), None);
        assert_eq!(DpnMode::Direct.device_code(), "disabled");
    }

    #[test]
    fn ack_maps_flag_to_result() {
        let ok: Ack = serde_json::from_value(json!({ "success": true })).unwrap();
        assert!(ok.into_result().is_ok());

        let rejected: Ack =
            serde_json::from_value(json!({ "success": false, "error": "busy" })).unwrap();
        match rejected.into_result() {
            Err(Error::Rejected { message }) => assert_eq!(message, "busy"),
            other => panic!("expected Rejected, got {other:?}"),
        }

        let missing: Ack = serde_json::from_value(json!({ "status": "ok" })).unwrap();
        assert!(matches!(
            missing.into_result(),
            Err(Error::MalformedResponse { .. })
        ));
    }

    #[test]
    fn access_control_apply_keeps_identity_fields() {
        let mut device: AccessControlDevice = serde_json::from_value(json!({
            "mac": "aa:bb:cc:dd:ee:ff",
            "ip": "192.168.1.20",
            "createdAt": 1_700_000_000,
            "routeMode": "direct",
            "regionCode": "AS",
            "httpsFilter": false,
            "bypass": [],
            "bwLimit": 0,
            "pinned": false,
            "remark": "",
            "name": "laptop",
            "vendor": "acme"
        }))
        .unwrap();

        device.apply(AccessControlUpdate {
            route_mode: Some("smart".into()),
            bw_limit: Some(512.into()),
            ..AccessControlUpdate::default()
        });

        let wire = serde_json::to_value(&device).unwrap();
        assert_eq!(wire["mac"], "aa:bb:cc:dd:ee:ff");
        assert_eq!(wire["ip"], "192.168.1.20");
        assert_eq!(wire["regionCode"], "AS");
        assert_eq!(wire["routeMode"], "smart");
        assert_eq!(wire["bwLimit"], 512);
        assert_eq!(wire["name"], "laptop");
        assert_eq!(wire["vendor"], "acme");
    }

    #[test]
    fn sharing_key_is_a_closed_set() {
        assert_eq!(
            SharingConfigKey::parse("smtpEnabled").unwrap(),
            SharingConfigKey::Smtp
        );
        assert_eq!(SharingConfigKey::Bt.as_ref(), "btEnabled");
        assert!(matches!(
            SharingConfigKey::parse("ftpEnabled"),
            Err(Error::UnknownSharingKey(k)) if k == "ftpEnabled"
        ));
    }
}
