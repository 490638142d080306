// ── Tool dispatch ──
//
// Each tool has a JSON-schema definition (returned by `definitions`) and a
// handler on `ToolDispatcher`. Handlers decode their arguments into typed
// structs, run one workflow against the device, and return the reply text.
// Every failure comes back as text flagged `is_error`; nothing escapes
// `ToolDispatcher::call`.
//
// Groups:
// - system: login, reboot, base URL, system info
// - dpn: mode, tunnels, connectivity, app routing
// - parental: category filtering, ad filter, SSL bypass
// - access: per-device access control
// - sharing: bandwidth sharing toggles and limits

mod access;
mod dpn;
mod parental;
mod sharing;
mod system;

use deeper_api::{DeviceClient, Prober};
use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::CoreError;
use crate::session::Session;

type ToolResult = Result<String, CoreError>;

/// Text reply of one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    /// Maps to `isError` in the protocol response.
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: true,
        }
    }
}

/// Credentials `loginToDeeperDevice` falls back to when called without
/// arguments.
#[derive(Debug)]
pub struct LoginDefaults {
    pub username: String,
    pub password: Option<SecretString>,
}

impl Default for LoginDefaults {
    fn default() -> Self {
        Self {
            username: "admin".into(),
            password: None,
        }
    }
}

/// Definitions of every tool, in listing order.
pub fn definitions() -> Vec<Value> {
    let mut tools = system::definitions();
    tools.extend(dpn::definitions());
    tools.extend(parental::definitions());
    tools.extend(access::definitions());
    tools.extend(sharing::definitions());
    tools
}

/// Owns the device client and session, and routes tool calls to handlers.
pub struct ToolDispatcher<P> {
    client: DeviceClient,
    session: Session,
    prober: P,
    login: LoginDefaults,
}

impl<P: Prober + Send + Sync> ToolDispatcher<P> {
    pub fn new(client: DeviceClient, prober: P, login: LoginDefaults) -> Self {
        Self {
            client,
            session: Session::new(),
            prober,
            login,
        }
    }

    pub fn client(&self) -> &DeviceClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Run one tool. `args` may be `null` for tools without parameters.
    pub async fn call(&mut self, name: &str, args: Value) -> ToolOutput {
        debug!(tool = name, "tool call");
        let result = match name {
            // system
            "loginToDeeperDevice" => self.login(args).await,
            "rebootDevice" => self.reboot_device().await,
            "setBaseUrl" => self.set_base_url(args),
            "getSystemInfo" => self.system_info().await,
            // dpn
            "setDpnMode" => self.set_dpn_mode(args).await,
            "getDpnMode" => self.get_dpn_mode().await,
            "listTunnels" => self.list_tunnels().await,
            "testTunnelsConnectivity" => self.test_tunnels_connectivity().await,
            "listApps" => self.list_apps().await,
            "setAppTunnelCode" => self.set_app_tunnel_code(args).await,
            "addTunnel" => self.add_tunnel(args).await,
            "deleteTunnels" => self.delete_tunnels(args).await,
            // parental
            "setParentalControl" => self.set_parental_control(args).await,
            "setAdsFilter" => self.set_ads_filter(args).await,
            "setAdsFilterCategories" => self.set_ads_filter_categories(args).await,
            "setSslBypass" => self.set_ssl_bypass(args).await,
            // access
            "listAccessControl" => self.list_access_control().await,
            "setAccessControl" => self.set_access_control().await,
            "updateOneAccessControlDevice" => self.update_one_access_control_device(args).await,
            "getAccessControlSwitch" => self.get_access_control_switch().await,
            "switchAccessControl" => self.switch_access_control(args).await,
            // sharing
            "enableSharingState" => self.enable_sharing_state(args).await,
            "setBtSharing" => self.set_bt_sharing(args).await,
            "setSmtpSharing" => self.set_smtp_sharing(args).await,
            "setSharingTrafficLimit" => self.set_sharing_traffic_limit(args).await,
            "setSharingBandwidthLimit" => self.set_sharing_bandwidth_limit(args).await,
            "getSharingConfig" => self.get_sharing_config().await,
            _ => return ToolOutput::error(format!("Unknown tool: {name}")),
        };

        match result {
            Ok(text) => ToolOutput::success(text),
            Err(e) if e.is_precondition() => ToolOutput::error(e.to_string()),
            Err(e) => {
                warn!(tool = name, error = %e, "tool failed");
                ToolOutput::error(format!("{name} failed: {e}"))
            }
        }
    }

    /// Owned copy of the session cookie, so handlers can borrow the session
    /// mutably afterwards.
    fn cookie(&self) -> Result<String, CoreError> {
        self.session.require_cookie().map(str::to_owned)
    }
}

/// Decode tool arguments. `null` is read as an empty object.
fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, CoreError> {
    let args = if args.is_null() {
        Value::Object(Map::new())
    } else {
        args
    };
    serde_json::from_value(args).map_err(|e| CoreError::invalid(e.to_string()))
}

fn pretty(value: &impl serde::Serialize) -> ToolResult {
    serde_json::to_string_pretty(value)
        .map_err(|e| CoreError::invalid(format!("cannot render result: {e}")))
}

fn enabled_word(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
