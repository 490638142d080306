// System information endpoints
//
// All four return loosely-typed JSON because the field set differs
// between hardware revisions and firmware versions.

use crate::device::DeviceClient;
use crate::error::Error;

impl DeviceClient {
    /// `GET /api/system-info/session-info`
    pub async fn get_session_info(&self, cookie: &str) -> Result<serde_json::Value, Error> {
        self.get(cookie, "system-info/session-info").await
    }

    /// `GET /api/system-info/hardware-info`
    pub async fn get_hardware_info(&self, cookie: &str) -> Result<serde_json::Value, Error> {
        self.get(cookie, "system-info/hardware-info").await
    }

    /// `GET /api/system-info/software-info`
    pub async fn get_software_info(&self, cookie: &str) -> Result<serde_json::Value, Error> {
        self.get(cookie, "system-info/software-info").await
    }

    /// `GET /api/system-info/network-address`
    pub async fn get_network_address(&self, cookie: &str) -> Result<serde_json::Value, Error> {
        self.get(cookie, "system-info/network-address").await
    }
}
