// System tools: login, reboot, base URL, system info

use deeper_api::{DEFAULT_HOST, DeviceClient, Prober};
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::{ToolDispatcher, ToolResult, parse_args, pretty};
use crate::error::CoreError;
use crate::system_info;

pub(super) fn definitions() -> Vec<Value> {
    vec![
        json!({
            "name": "loginToDeeperDevice",
            "description": "Log in to the Deeper device. Must be called before any other tool. Username and password default to the configured credentials.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "username": {
                        "type": "string",
                        "description": "The username for authentication.",
                        "default": "admin"
                    },
                    "password": {
                        "type": "string",
                        "description": "The password for authentication. Omit to use the configured password."
                    }
                },
                "additionalProperties": false
            }
        }),
        json!({
            "name": "rebootDevice",
            "description": "Reboot the Deeper device. The connection drops while it restarts.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
        json!({
            "name": "setBaseUrl",
            "description": format!("Configure the host or base URL of the Deeper device API. Default: {DEFAULT_HOST}."),
            "inputSchema": {
                "type": "object",
                "properties": {
                    "baseUrl": {
                        "type": "string",
                        "description": "Host, IP or URL of the device. A bare host gets http://.",
                        "default": DEFAULT_HOST
                    }
                },
                "additionalProperties": false
            }
        }),
        json!({
            "name": "getSystemInfo",
            "description": "Get session, hardware, software and network address information from the device.",
            "inputSchema": {
                "type": "object",
                "properties": {},
                "additionalProperties": false
            }
        }),
    ]
}

#[derive(Deserialize)]
struct LoginArgs {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    password: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BaseUrlArgs {
    #[serde(default = "default_host")]
    base_url: String,
}

fn default_host() -> String {
    DEFAULT_HOST.to_owned()
}

impl<P: Prober + Send + Sync> ToolDispatcher<P> {
    pub(super) async fn login(&mut self, args: Value) -> ToolResult {
        let args: LoginArgs = parse_args(args)?;
        let username = args.username.unwrap_or_else(|| self.login.username.clone());

        let supplied = args.password.map(SecretString::from);
        let password = supplied
            .as_ref()
            .or(self.login.password.as_ref())
            .ok_or_else(|| {
                CoreError::invalid("password is required: pass it or set device.password")
            })?;

        let cookie = self.client.login(&username, password).await?;
        self.session.set_cookie(cookie);
        Ok("loginToDeeperDevice success".into())
    }

    pub(super) async fn reboot_device(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        self.client.reboot(&cookie).await?;
        info!("device reboot requested");
        Ok("Device reboot initiated successfully.".into())
    }

    pub(super) fn set_base_url(&mut self, args: Value) -> ToolResult {
        let args: BaseUrlArgs = parse_args(args)?;
        let url = DeviceClient::parse_base_url(&args.base_url)?;
        self.client.set_base_url(url);
        Ok(format!(
            "Base URL set to {}. You can now use other tools with this base URL.",
            args.base_url
        ))
    }

    pub(super) async fn system_info(&mut self) -> ToolResult {
        let cookie = self.cookie()?;
        let info = system_info::get_system_info(&self.client, &cookie).await?;
        pretty(&info)
    }
}
