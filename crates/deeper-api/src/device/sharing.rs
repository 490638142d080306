// Sharing endpoints
//
// Bandwidth sharing toggles and limits.

use serde_json::json;
use tracing::debug;

use crate::device::DeviceClient;
use crate::device::models::{SharingConfig, SharingConfigKey};
use crate::error::Error;

/// Device bandwidth unit per caller Mbps.
const KBPS_PER_MBPS: u64 = 1024;

impl DeviceClient {
    /// `GET /api/sharing/getSharingConfig`
    pub async fn get_sharing_config(&self, cookie: &str) -> Result<SharingConfig, Error> {
        self.get(cookie, "sharing/getSharingConfig").await
    }

    /// Set one sharing toggle. Each key has its own endpoint and uses its
    /// own name as the payload key, e.g. `POST /api/sharing/setBtSharing`
    /// with `{"btEnabled": true}`.
    pub async fn set_sharing_config(
        &self,
        cookie: &str,
        key: SharingConfigKey,
        value: bool,
    ) -> Result<(), Error> {
        debug!(key = key.as_ref(), value, "setting sharing config");
        let mut body = serde_json::Map::new();
        body.insert(key.as_ref().to_owned(), value.into());
        self.post_ack(cookie, &format!("sharing/{}", key.endpoint()), &body)
            .await
    }

    /// Like [`set_sharing_config`](Self::set_sharing_config) for a key given
    /// as text. Unknown keys fail before any request is sent.
    pub async fn set_sharing_config_by_name(
        &self,
        cookie: &str,
        key: &str,
        value: bool,
    ) -> Result<(), Error> {
        let key = SharingConfigKey::parse(key)?;
        self.set_sharing_config(cookie, key, value).await
    }

    pub async fn set_sharing_state(&self, cookie: &str, enabled: bool) -> Result<(), Error> {
        self.set_sharing_config(cookie, SharingConfigKey::Sharing, enabled)
            .await
    }

    pub async fn set_bt_sharing(&self, cookie: &str, enabled: bool) -> Result<(), Error> {
        self.set_sharing_config(cookie, SharingConfigKey::Bt, enabled)
            .await
    }

    pub async fn set_smtp_sharing(&self, cookie: &str, enabled: bool) -> Result<(), Error> {
        self.set_sharing_config(cookie, SharingConfigKey::Smtp, enabled)
            .await
    }

    /// Cap shared traffic at `limit_gb` gigabytes.
    ///
    /// `POST /api/sharing/setTrafficLimit` with `{"limit", "unit": "GB"}`
    pub async fn set_sharing_traffic_limit(&self, cookie: &str, limit_gb: u64) -> Result<(), Error> {
        debug!(limit_gb, "setting sharing traffic limit");
        self.post_ack(
            cookie,
            "sharing/setTrafficLimit",
            &json!({ "limit": limit_gb, "unit": "GB" }),
        )
        .await
    }

    /// Cap shared bandwidth at `mbps`. The device takes the value in
    /// units of Mbps/1024, so `100` goes out as `102400`.
    ///
    /// `POST /api/sharing/setBandwidthLimit` with `{"limit"}`
    pub async fn set_sharing_bandwidth_limit(&self, cookie: &str, mbps: u64) -> Result<(), Error> {
        let limit = mbps
            .checked_mul(KBPS_PER_MBPS)
            .ok_or_else(|| Error::InvalidArgument(format!("bandwidth limit {mbps} too large")))?;
        debug!(mbps, limit, "setting sharing bandwidth limit");
        self.post_ack(cookie, "sharing/setBandwidthLimit", &json!({ "limit": limit }))
            .await
    }
}
