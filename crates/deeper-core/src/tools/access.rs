// Access-control tools

use deeper_api::{AccessControlUpdate, Prober};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ToolDispatcher, ToolResult, enabled_word, parse_args, pretty};
use crate::access;

pub(super) fn definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "listAccessControl",
            "description": "List the online and offline devices known to access control, with their full settings.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
        json!({
            "name": "setAccessControl",
            "description": "Show a numbered list of devices. Use the number with updateOneAccessControlDevice.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
        json!({
            "name": "updateOneAccessControlDevice",
            "description": "Update one device from the list shown by setAccessControl. Only the supplied settings change. The access control switch is turned on if it is off.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "index": {
                        "type": "integer",
                        "minimum": 0,
                        "description": "1-based position in the setAccessControl list."
                    },
                    "routeMode": {
                        "type": "string",
                        "enum": ["direct", "smart", "full"],
                        "description": "Routing mode for this device: direct, smart or full."
                    },
                    "httpsFilter": { "type": "boolean", "description": "Filter HTTPS traffic." },
                    "bypass": {
                        "type": "array",
                        "items": { "type": "string" },
                        "description": "Bypass rules for this device."
                    },
                    "bwLimit": { "type": "number", "minimum": 0, "description": "Bandwidth limit." },
                    "pinned": { "type": "boolean", "description": "Pin the device." },
                    "remark": { "type": "string", "description": "Free-form note." },
                    "name": { "type": "string", "description": "Display name." }
                },
                "required": ["index"],
                "additionalProperties": false
            }
        }),
        json!({
            "name": "getAccessControlSwitch",
            "description": "Show whether access control is enabled.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
        json!({
            "name": "switchAccessControl",
            "description": "Enable or disable access control.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "value": {
                        "type": "boolean",
                        "description": "true to enable access control, false to disable it."
                    }
                },
                "required": ["value"],
                "additionalProperties": false
            }
        }),
    ]
}

#[derive(Deserialize)]
struct UpdateArgs {
    index: u64,
    #[serde(flatten)]
    update: AccessControlUpdate,
}

#[derive(Deserialize)]
struct SwitchArgs {
    value: bool,
}

impl<P: Prober + Send + Sync> ToolDispatcher<P> {
    pub(super) async fn list_access_control(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let list = self.client.list_access_control(&cookie).await?;
        pretty(&list)
    }

    pub(super) async fn set_access_control(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let devices = access::load_roster(&self.client, &mut self.session, &cookie).await?;
        if devices.is_empty() {
            return Ok("No devices found.".into());
        }
        Ok(format!(
            "Here are the devices:\n{}\nPlease use 'updateOneAccessControlDevice' with the device index and the settings you want to change.",
            access::numbered_list(&devices)
        ))
    }

    pub(super) async fn update_one_access_control_device(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: UpdateArgs = parse_args(args)?;
        let device =
            access::update_device(&self.client, &self.session, &cookie, args.index, args.update)
                .await?;
        Ok(format!(
            "Successfully updated device {} ({}).",
            device.display_name(),
            device.mac
        ))
    }

    pub(super) async fn get_access_control_switch(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let on = self.client.get_access_control_switch(&cookie).await?;
        Ok(format!("Access control is {}.", enabled_word(on)))
    }

    pub(super) async fn switch_access_control(&mut self, args: Value) -> ToolResult {
        let cookie = self.cookie()?;
        let args: SwitchArgs = parse_args(args)?;
        self.client
            .switch_access_control(&cookie, args.value)
            .await?;
        Ok(format!(
            "Access control has been {} successfully.",
            enabled_word(args.value)
        ))
    }
}
