// Access-control endpoints
//
// Per-device routing policy and the global switch that makes it effective.

use serde_json::json;
use tracing::{debug, info};

use crate::device::DeviceClient;
use crate::device::models::{AccessControlDevice, AccessControlList, SwitchValue};
use crate::error::Error;

impl DeviceClient {
    /// `GET /api/accessControl/list`
    pub async fn list_access_control(&self, cookie: &str) -> Result<AccessControlList, Error> {
        self.get(cookie, "accessControl/list").await
    }

    /// Replace one device's record. `device` must be a full record, usually
    /// a fetched snapshot with changes merged in.
    ///
    /// `POST /api/accessControl/setOne`
    pub async fn set_one_access_control(
        &self,
        cookie: &str,
        device: &AccessControlDevice,
    ) -> Result<(), Error> {
        debug!(mac = %device.mac, "updating access control device");
        self.post_ack(cookie, "accessControl/setOne", device).await
    }

    /// `GET /api/accessControl/getSwitch`, returning `value`.
    pub async fn get_access_control_switch(&self, cookie: &str) -> Result<bool, Error> {
        let sw: SwitchValue = self.get(cookie, "accessControl/getSwitch").await?;
        sw.value
            .ok_or_else(|| Error::malformed("access control switch has no value"))
    }

    /// `POST /api/accessControl/switch` with `{"value"}`
    pub async fn switch_access_control(&self, cookie: &str, value: bool) -> Result<(), Error> {
        debug!(value, "setting access control switch");
        self.post_ack(cookie, "accessControl/switch", &json!({ "value": value }))
            .await
    }

    /// Make sure the switch is `desired`: one read, and a write only when
    /// the current value differs.
    pub async fn ensure_access_control_switch(
        &self,
        cookie: &str,
        desired: bool,
    ) -> Result<(), Error> {
        let current = self.get_access_control_switch(cookie).await?;
        if current == desired {
            debug!(desired, "access control switch already set");
            return Ok(());
        }
        self.switch_access_control(cookie, desired).await?;
        info!(desired, "access control switch changed");
        Ok(())
    }
}
