// DPN tools: routing mode, tunnels, connectivity, app routing

use deeper_api::{DpnMode, Prober};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::{ToolDispatcher, ToolResult, parse_args};
use crate::connectivity;
use crate::error::CoreError;

pub(super) fn definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "setDpnMode",
            "description": "Sets the DPN mode and the associated tunnel for that mode.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "dpnMode": {
                        "type": "string",
                        "description": "The DPN mode to set: 'direct' for Direct routing, 'smart' for Smart routing, or 'full' for Full routing.",
                        "default": "smart"
                    },
                    "tunnelCode": {
                        "type": ["string", "null"],
                        "description": "Tunnel code for the mode. Null reuses the last known tunnel for that mode."
                    }
                },
                "additionalProperties": false
            }
        }),
        json!({
            "name": "getDpnMode",
            "description": "Retrieves the current DPN mode and the tunnels assigned to \"smart\" and \"full\" modes.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
        json!({
            "name": "listTunnels",
            "description": "List the tunnel codes configured on the device.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
        json!({
            "name": "testTunnelsConnectivity",
            "description": "Ping each tunnel's active IP. Unreachable tunnels are switched to another node, or refreshed when they have only one.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
        json!({
            "name": "listApps",
            "description": "List the apps that can be routed through a specific tunnel.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
        json!({
            "name": "setAppTunnelCode",
            "description": "Route an app through a specific tunnel.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "appName": {
                        "type": "string",
                        "description": "The name of the app to set."
                    },
                    "tunnelCode": {
                        "type": "string",
                        "description": "The tunnel code to use for the app. For direct access use LL."
                    }
                },
                "required": ["appName", "tunnelCode"],
                "additionalProperties": false
            }
        }),
        json!({
            "name": "addTunnel",
            "description": "Add a tunnel in a region.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "regionCode": {
                        "type": "string",
                        "description": "Region code (e.g. 'AMN' for North America, 'ASE' for East Asia)."
                    },
                    "tunnelCode": {
                        "type": "string",
                        "description": "Tunnel code to add."
                    }
                },
                "required": ["regionCode", "tunnelCode"],
                "additionalProperties": false
            }
        }),
        json!({
            "name": "deleteTunnels",
            "description": "Delete one or more tunnels.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "tunnelCodes": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Tunnel codes to delete."
                    }
                },
                "required": ["tunnelCodes"],
                "additionalProperties": false
            }
        }),
    ]
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetDpnModeArgs {
    #[serde(default = "default_mode")]
    dpn_mode: String,
    #[serde(default)]
    tunnel_code: Option<String>,
}

fn default_mode() -> String {
    DpnMode::Smart.name().to_owned()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppTunnelArgs {
    app_name: String,
    tunnel_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddTunnelArgs {
    region_code: String,
    tunnel_code: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteTunnelsArgs {
    tunnel_codes: Vec<String>,
}

impl<P: Prober + Send + Sync> ToolDispatcher<P> {
    pub(super) async fn set_dpn_mode(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: SetDpnModeArgs = parse_args(args)?;

        let mode = DpnMode::from_label(&args.dpn_mode).ok_or_else(|| {
            CoreError::invalid(format!(
                "unknown dpnMode {:?}: expected direct, smart or full",
                args.dpn_mode
            ))
        })?;

        let tunnel_code = match args.tunnel_code.filter(|c| !c.is_empty()) {
            Some(code) => code,
            None => self
                .session
                .dpn_tunnel_code(mode.name())
                .map(str::to_owned)
                .ok_or(CoreError::TunnelCodeRequired)?,
        };

        self.client
            .set_dpn_mode(&cookie, mode, &tunnel_code)
            .await?;
        self.session.set_dpn_tunnel_code(mode.name(), tunnel_code.clone());
        info!(%mode, tunnel = %tunnel_code, "DPN mode set");
        Ok(format!("set Deeper device DPN mode to {} success", args.dpn_mode))
    }

    pub(super) async fn get_dpn_mode(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let status = self.client.get_dpn_mode(&cookie).await?;
        self.session.record_dpn_status(&status);
        let rendered = serde_json::to_string(&status)
            .map_err(|e| CoreError::invalid(format!("cannot render result: {e}")))?;
        Ok(format!("Current DPN mode: {rendered}"))
    }

    pub(super) async fn list_tunnels(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let tunnels = self.client.list_tunnels(&cookie).await?;
        Ok(tunnels
            .iter()
            .map(|t| t.tunnel_code.as_str())
            .collect::<Vec<_>>()
            .join(", "))
    }

    pub(super) async fn test_tunnels_connectivity(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let reports = connectivity::test_tunnels(&self.client, &self.prober, &cookie).await?;
        if reports.is_empty() {
            return Ok("No tunnels configured.".into());
        }
        Ok(reports
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n"))
    }

    pub(super) async fn list_apps(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let apps = self.client.list_apps(&cookie).await?;
        Ok(format!("Supported apps: {}", apps.join(", ")))
    }

    pub(super) async fn set_app_tunnel_code(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: AppTunnelArgs = parse_args(args)?;
        self.client
            .add_app(&cookie, &args.app_name, &args.tunnel_code)
            .await?;
        Ok(format!(
            "App \"{}\" added successfully with tunnel code \"{}\".",
            args.app_name, args.tunnel_code
        ))
    }

    pub(super) async fn add_tunnel(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: AddTunnelArgs = parse_args(args)?;
        self.client
            .add_tunnel(&cookie, &args.region_code, &args.tunnel_code)
            .await?;
        Ok(format!(
            "Tunnel \"{}\" in region \"{}\" added successfully.",
            args.tunnel_code, args.region_code
        ))
    }

    pub(super) async fn delete_tunnels(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: DeleteTunnelsArgs = parse_args(args)?;
        if args.tunnel_codes.is_empty() {
            return Err(CoreError::invalid("tunnelCodes must not be empty"));
        }
        self.client
            .delete_tunnels(&cookie, &args.tunnel_codes)
            .await?;
        Ok(format!(
            "Tunnels deleted successfully: {}",
            args.tunnel_codes.join(", ")
        ))
    }
}
