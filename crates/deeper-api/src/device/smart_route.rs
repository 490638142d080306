// Smart-route endpoints
//
// DPN mode, tunnel lifecycle and per-tunnel node maintenance.

use serde_json::json;
use tracing::debug;

use crate::device::DeviceClient;
use crate::device::models::{DpnMode, DpnModeStatus, Tunnel};
use crate::error::Error;

impl DeviceClient {
    /// Switch the routing mode.
    ///
    /// `POST /api/smartRoute/setDpnMode` with `{"dpnMode", "tunnelCode"}`.
    pub async fn set_dpn_mode(
        &self,
        cookie: &str,
        mode: DpnMode,
        tunnel_code: &str,
    ) -> Result<(), Error> {
        debug!(mode = mode.device_code(), tunnel_code, "setting DPN mode");
        self.post_ack(
            cookie,
            "smartRoute/setDpnMode",
            &json!({
                "dpnMode": mode.device_code(),
                "tunnelCode": tunnel_code,
            }),
        )
        .await
    }

    /// Current DPN mode and the tunnels bound to smart/full routing.
    ///
    /// `GET /api/smartRoute/getDpnMode`
    pub async fn get_dpn_mode(&self, cookie: &str) -> Result<DpnModeStatus, Error> {
        self.get(cookie, "smartRoute/getDpnMode").await
    }

    /// List configured tunnels as the device reports them.
    ///
    /// `GET /api/smartRoute/listTunnels`
    pub async fn list_tunnels(&self, cookie: &str) -> Result<Vec<Tunnel>, Error> {
        self.get(cookie, "smartRoute/listTunnels").await
    }

    /// `POST /api/smartRoute/addTunnel`
    pub async fn add_tunnel(
        &self,
        cookie: &str,
        region_code: &str,
        tunnel_code: &str,
    ) -> Result<(), Error> {
        debug!(region_code, tunnel_code, "adding tunnel");
        self.post_ack(
            cookie,
            "smartRoute/addTunnel",
            &json!({
                "regionCode": region_code,
                "tunnelCode": tunnel_code,
            }),
        )
        .await
    }

    /// `POST /api/smartRoute/deleteTunnels` with `{"tunnelCodes": [...]}`
    pub async fn delete_tunnels(&self, cookie: &str, tunnel_codes: &[String]) -> Result<(), Error> {
        debug!(count = tunnel_codes.len(), "deleting tunnels");
        self.post_ack(
            cookie,
            "smartRoute/deleteTunnels",
            &json!({ "tunnelCodes": tunnel_codes }),
        )
        .await
    }

    /// Ask the device to move a tunnel off `current_ip` to another node.
    ///
    /// `POST /api/smartRoute/switchNode`
    pub async fn switch_node(
        &self,
        cookie: &str,
        tunnel_code: &str,
        current_ip: &str,
    ) -> Result<(), Error> {
        debug!(tunnel_code, current_ip, "switching tunnel node");
        self.post_ack(
            cookie,
            "smartRoute/switchNode",
            &json!({
                "tunnelCode": tunnel_code,
                "currentIp": current_ip,
            }),
        )
        .await
    }

    /// Rebuild a tunnel that has a single endpoint.
    ///
    /// `POST /api/smartRoute/refreshTunnel`
    pub async fn refresh_tunnel(&self, cookie: &str, tunnel_code: &str) -> Result<(), Error> {
        debug!(tunnel_code, "refreshing tunnel");
        self.post_ack(
            cookie,
            "smartRoute/refreshTunnel",
            &json!({ "tunnelCode": tunnel_code }),
        )
        .await
    }
}
