// Sharing tools
//
// BitTorrent, SMTP and the limits only take effect while sharing itself is
// on, so those handlers turn sharing on first.

use deeper_api::Prober;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ToolDispatcher, ToolResult, enabled_word, parse_args, pretty};
use crate::error::CoreError;

fn toggle_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "enabled": { "type": "boolean", "description": description }
        },
        "required": ["enabled"],
        "additionalProperties": false
    })
}

fn limit_schema(description: &str) -> Value {
    json!({
        "type": "object",
        "properties": {
            "limit": { "type": "integer", "minimum": 1, "description": description }
        },
        "required": ["limit"],
        "additionalProperties": false
    })
}

pub(super) fn definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "enableSharingState",
            "description": "Enables or disables the sharing on the Deeper device.",
            "inputSchema": toggle_schema("Set to true to enable sharing, false to disable.")
        }),
        json!({
            "name": "setBtSharing",
            "description": "Enables or disables BitTorrent sharing on the Deeper device.",
            "inputSchema": toggle_schema("Set to true to enable BitTorrent sharing, false to disable.")
        }),
        json!({
            "name": "setSmtpSharing",
            "description": "Enables or disables SMTP sharing on the Deeper device.",
            "inputSchema": toggle_schema("Set to true to enable SMTP sharing, false to disable.")
        }),
        json!({
            "name": "setSharingTrafficLimit",
            "description": "Sets the monthly traffic limit for sharing on the Deeper device (in GB).",
            "inputSchema": limit_schema("Traffic limit in GB.")
        }),
        json!({
            "name": "setSharingBandwidthLimit",
            "description": "Sets the bandwidth limit for sharing on the Deeper device (in Mbps).",
            "inputSchema": limit_schema("Bandwidth limit in Mbps.")
        }),
        json!({
            "name": "getSharingConfig",
            "description": "Show which sharing features are enabled.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
    ]
}

#[derive(Deserialize)]
struct ToggleArgs {
    enabled: bool,
}

#[derive(Deserialize)]
struct LimitArgs {
    limit: u64,
}

impl LimitArgs {
    fn positive(self) -> Result<u64, CoreError> {
        if self.limit == 0 {
            return Err(CoreError::invalid("limit must be a positive integer"));
        }
        Ok(self.limit)
    }
}

impl<P: Prober + Send + Sync> ToolDispatcher<P> {
    async fn ensure_sharing(&self, cookie: &str) -> Result<(), CoreError> {
        self.client
            .set_sharing_state(cookie, true)
            .await
            .map_err(|e| CoreError::SharingNotEnabled {
                reason: CoreError::from(e).to_string(),
            })
    }

    pub(super) async fn enable_sharing_state(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: ToggleArgs = parse_args(args)?;
        self.client.set_sharing_state(&cookie, args.enabled).await?;
        Ok(format!(
            "sharing has been {} successfully.",
            enabled_word(args.enabled)
        ))
    }

    pub(super) async fn set_bt_sharing(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: ToggleArgs = parse_args(args)?;
        if args.enabled {
            self.ensure_sharing(&cookie).await?;
        }
        self.client.set_bt_sharing(&cookie, args.enabled).await?;
        Ok(format!(
            "BitTorrent sharing has been {} successfully.",
            enabled_word(args.enabled)
        ))
    }

    pub(super) async fn set_smtp_sharing(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: ToggleArgs = parse_args(args)?;
        if args.enabled {
            self.ensure_sharing(&cookie).await?;
        }
        self.client.set_smtp_sharing(&cookie, args.enabled).await?;
        Ok(format!(
            "SMTP sharing has been {} successfully.",
            enabled_word(args.enabled)
        ))
    }

    pub(super) async fn set_sharing_traffic_limit(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let limit = parse_args::<LimitArgs>(args)?.positive()?;
        self.ensure_sharing(&cookie).await?;
        self.client
            .set_sharing_traffic_limit(&cookie, limit)
            .await?;
        Ok(format!(
            "Sharing traffic limit has been set to {limit} GB successfully."
        ))
    }

    pub(super) async fn set_sharing_bandwidth_limit(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let limit = parse_args::<LimitArgs>(args)?.positive()?;
        self.ensure_sharing(&cookie).await?;
        self.client
            .set_sharing_bandwidth_limit(&cookie, limit)
            .await?;
        Ok(format!(
            "Sharing bandwidth limit has been set to {limit} Mbps successfully."
        ))
    }

    pub(super) async fn get_sharing_config(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let config = self.client.get_sharing_config(&cookie).await?;
        pretty(&config)
    }
}
