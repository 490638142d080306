#![allow(clippy::unwrap_used)]
// Integration tests for `ToolDispatcher` against a wiremock device.

use std::collections::HashMap;
use std::sync::Mutex;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use deeper_api::{DeviceClient, Prober, TransportConfig};
use deeper_core::connectivity::test_tunnels;
use deeper_core::{LoginDefaults, ToolDispatcher, TunnelHealth};

const COOKIE: &str = "session=abc";

// ── Helpers ─────────────────────────────────────────────────────────

/// Scripted prober: answers from a fixed table and records every address.
#[derive(Default)]
struct FakePing {
    reachable: HashMap<String, bool>,
    calls: Mutex<Vec<String>>,
}

impl FakePing {
    fn with(entries: &[(&str, bool)]) -> Self {
        Self {
            reachable: entries
                .iter()
                .map(|(ip, up)| ((*ip).to_owned(), *up))
                .collect(),
            calls: Mutex::default(),
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Prober for FakePing {
    async fn ping(&self, ip: &str) -> bool {
        self.calls.lock().unwrap().push(ip.to_owned());
        self.reachable.get(ip).copied().unwrap_or(false)
    }
}

async fn setup_with(prober: FakePing) -> (MockServer, ToolDispatcher<FakePing>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = DeviceClient::new(base_url, &TransportConfig::default()).unwrap();
    let login = LoginDefaults {
        username: "admin".into(),
        password: Some("secret".to_string().into()),
    };
    (server, ToolDispatcher::new(client, prober, login))
}

async fn setup() -> (MockServer, ToolDispatcher<FakePing>) {
    setup_with(FakePing::default()).await
}

async fn login(server: &MockServer, tools: &mut ToolDispatcher<FakePing>) {
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .append_header("Set-Cookie", format!("{COOKIE}; Path=/; HttpOnly").as_str())
                .set_body_json(json!({ "success": true })),
        )
        .mount(server)
        .await;

    let out = tools.call("loginToDeeperDevice", Value::Null).await;
    assert!(!out.is_error, "{}", out.text);
}

fn ok() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "success": true }))
}

fn json_response(body: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(body)
}

// ── Session ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_tools_require_login() {
    let (server, mut tools) = setup().await;

    let out = tools.call("listTunnels", Value::Null).await;
    assert!(out.is_error);
    assert_eq!(
        out.text,
        "Please login to Deeper device first using loginToDeeperDevice tool."
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_login_stores_cookie_for_later_calls() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;
    assert_eq!(tools.session().cookie(), Some(COOKIE));

    Mock::given(method("GET"))
        .and(path("/api/smartRoute/listTunnels"))
        .respond_with(json_response(json!([
            { "tunnelCode": "US", "regionCode": "AMN" },
            { "tunnelCode": "JP", "regionCode": "ASE" }
        ])))
        .mount(&server)
        .await;

    let out = tools.call("listTunnels", json!({})).await;
    assert!(!out.is_error, "{}", out.text);
    assert_eq!(out.text, "US, JP");

    let requests = server.received_requests().await.unwrap();
    let list = requests
        .iter()
        .find(|r| r.url.path() == "/api/smartRoute/listTunnels")
        .unwrap();
    assert_eq!(list.headers.get("cookie").unwrap().to_str().unwrap(), COOKIE);
}

#[tokio::test]
async fn test_login_without_any_password_is_rejected_locally() {
    let server = MockServer::start().await;
    let client =
        DeviceClient::new(Url::parse(&server.uri()).unwrap(), &TransportConfig::default())
            .unwrap();
    let mut tools = ToolDispatcher::new(client, FakePing::default(), LoginDefaults::default());

    let out = tools.call("loginToDeeperDevice", json!({})).await;
    assert!(out.is_error);
    assert!(out.text.contains("password is required"), "{}", out.text);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_base_url_needs_no_login() {
    let (_server, mut tools) = setup().await;

    let out = tools.call("setBaseUrl", json!({ "baseUrl": "10.0.0.1" })).await;
    assert!(!out.is_error, "{}", out.text);
    assert_eq!(
        out.text,
        "Base URL set to 10.0.0.1. You can now use other tools with this base URL."
    );
    assert_eq!(tools.client().base_url().as_str(), "http://10.0.0.1/");
}

#[tokio::test]
async fn test_unknown_tool() {
    let (_server, mut tools) = setup().await;
    let out = tools.call("formatDisk", Value::Null).await;
    assert!(out.is_error);
    assert_eq!(out.text, "Unknown tool: formatDisk");
}

#[tokio::test]
async fn test_login_is_checked_before_arguments() {
    let (server, mut tools) = setup().await;

    for (tool, args) in [
        ("setDpnMode", json!({ "dpnMode": 5 })),
        ("updateOneAccessControlDevice", json!({})),
        ("setAdsFilter", json!({ "enabled": "yes" })),
        ("setSharingTrafficLimit", json!({ "limit": 0 })),
    ] {
        let out = tools.call(tool, args).await;
        assert!(out.is_error);
        assert_eq!(
            out.text,
            "Please login to Deeper device first using loginToDeeperDevice tool.",
            "{tool}"
        );
    }
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── DPN ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_set_dpn_mode_requires_tunnel_when_nothing_cached() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/smartRoute/setDpnMode"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;

    let out = tools
        .call("setDpnMode", json!({ "dpnMode": "full", "tunnelCode": null }))
        .await;
    assert!(out.is_error);
    assert!(out.text.starts_with("tunnelCode is required"), "{}", out.text);
}

#[tokio::test]
async fn test_set_dpn_mode_reuses_tunnel_seen_by_get_dpn_mode() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("GET"))
        .and(path("/api/smartRoute/getDpnMode"))
        .respond_with(json_response(json!({
            "dpnMode": "smart",
            "tunnelCode": "US",
            "smartTunnel": "US",
            "fullTunnel": "JP"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/smartRoute/setDpnMode"))
        .and(body_json(json!({ "dpnMode": "full", "tunnelCode": "JP" })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("getDpnMode", Value::Null).await;
    assert!(out.text.starts_with("Current DPN mode: "), "{}", out.text);

    let out = tools.call("setDpnMode", json!({ "dpnMode": "full" })).await;
    assert!(!out.is_error, "{}", out.text);
    assert_eq!(out.text, "set Deeper device DPN mode to full success");
}

#[tokio::test]
async fn test_get_dpn_mode_ignores_non_string_tunnels() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("GET"))
        .and(path("/api/smartRoute/getDpnMode"))
        .respond_with(json_response(json!({
            "dpnMode": "smart",
            "tunnelCode": "US",
            "smartTunnel": { "code": "US" },
            "fullTunnel": "JP"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/smartRoute/setDpnMode"))
        .and(body_json(json!({ "dpnMode": "full", "tunnelCode": "JP" })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("getDpnMode", Value::Null).await;
    assert!(!out.is_error, "{}", out.text);

    let out = tools.call("setDpnMode", json!({ "dpnMode": "smart" })).await;
    assert!(out.is_error);
    assert!(out.text.starts_with("tunnelCode is required"), "{}", out.text);

    let out = tools.call("setDpnMode", json!({ "dpnMode": "full" })).await;
    assert!(!out.is_error, "{}", out.text);
}

#[tokio::test]
async fn test_direct_mode_uses_builtin_tunnel() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/smartRoute/setDpnMode"))
        .and(body_json(json!({ "dpnMode": "disabled", "tunnelCode": "DIRECT" })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("setDpnMode", json!({ "dpnMode": "direct" })).await;
    assert!(!out.is_error, "{}", out.text);
}

#[tokio::test]
async fn test_device_rejection_is_prefixed_with_tool_name() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/smartRoute/setDpnMode"))
        .respond_with(json_response(json!({ "success": false, "error": "busy" })))
        .mount(&server)
        .await;

    let out = tools
        .call("setDpnMode", json!({ "dpnMode": "smart", "tunnelCode": "US" }))
        .await;
    assert!(out.is_error);
    assert!(out.text.starts_with("setDpnMode failed: "), "{}", out.text);
    assert!(out.text.contains("busy"), "{}", out.text);
    // a failed write does not update the cache
    assert_eq!(tools.session().dpn_tunnel_code("smart"), None);
}

#[tokio::test]
async fn test_connectivity_switches_refreshes_and_skips() {
    let prober = FakePing::with(&[("1.1.1.1", true), ("2.2.2.2", false), ("3.3.3.3", false)]);
    let (server, mut tools) = setup_with(prober).await;
    login(&server, &mut tools).await;

    Mock::given(method("GET"))
        .and(path("/api/smartRoute/listTunnels"))
        .respond_with(json_response(json!([
            { "tunnelCode": "US", "activeIp": "1.1.1.1", "activeNum": 2 },
            { "tunnelCode": "JP", "activeIp": "2.2.2.2", "activeNum": 3 },
            { "tunnelCode": "DE", "activeIp": "3.3.3.3", "activeNum": 1 },
            { "tunnelCode": "FR", "activeIp": null, "activeNum": 0 }
        ])))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/smartRoute/switchNode"))
        .and(body_json(json!({ "tunnelCode": "JP", "currentIp": "2.2.2.2" })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/smartRoute/refreshTunnel"))
        .and(body_json(json!({ "tunnelCode": "DE" })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("testTunnelsConnectivity", Value::Null).await;
    assert!(!out.is_error, "{}", out.text);
    assert_eq!(
        out.text,
        "Tunnel US (1.1.1.1) is reachable.\n\
         Tunnel JP (2.2.2.2) unreachable, switched node successfully.\n\
         Tunnel DE (3.3.3.3) unreachable, refreshed tunnel successfully.\n\
         Tunnel FR has no active IP."
    );
}

#[tokio::test]
async fn test_connectivity_skips_tunnels_without_ip() {
    let server = MockServer::start().await;
    let client =
        DeviceClient::new(Url::parse(&server.uri()).unwrap(), &TransportConfig::default())
            .unwrap();
    let prober = FakePing::with(&[("1.1.1.1", true)]);

    Mock::given(method("GET"))
        .and(path("/api/smartRoute/listTunnels"))
        .respond_with(json_response(json!([
            { "tunnelCode": "US", "activeIp": "1.1.1.1", "activeNum": 1 },
            { "tunnelCode": "FR", "activeIp": "", "activeNum": 0 },
            { "tunnelCode": "DE" }
        ])))
        .mount(&server)
        .await;

    let reports = test_tunnels(&client, &prober, COOKIE).await.unwrap();
    assert_eq!(prober.calls(), vec!["1.1.1.1".to_owned()]);
    assert_eq!(reports.len(), 3);
    assert_eq!(reports[0].health, TunnelHealth::Reachable);
    assert_eq!(reports[1].health, TunnelHealth::NoActiveIp);
    assert_eq!(reports[2].health, TunnelHealth::NoActiveIp);
}

#[tokio::test]
async fn test_delete_tunnels_reports_codes() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/smartRoute/deleteTunnels"))
        .and(body_json(json!({ "tunnelCodes": ["US", "JP"] })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools
        .call("deleteTunnels", json!({ "tunnelCodes": ["US", "JP"] }))
        .await;
    assert_eq!(out.text, "Tunnels deleted successfully: US, JP");
}

// ── Content filtering ───────────────────────────────────────────────

#[tokio::test]
async fn test_parental_control_flags_only_changed_categories() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("GET"))
        .and(path("/api/security/getUrlFilterData"))
        .respond_with(json_response(json!({
            "categoryStates": { "porn": 1, "social": 0, "game": 0 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/security/setCategoryStates"))
        .and(body_partial_json(json!({
            "categoryStates": { "porn": 1, "social": 4, "game": 0 },
            "pornStateChanged": false,
            "socialStateChanged": true,
            "gameStateChanged": false
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools
        .call("setParentalControl", json!({ "porn": 1, "social": 4 }))
        .await;
    assert!(!out.is_error, "{}", out.text);
    assert_eq!(out.text, "Parental control updated. Changed: social");
}

#[tokio::test]
async fn test_ads_filter_takes_enabled_flag() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/security/setAdsFilter"))
        .and(body_json(json!({ "enable": true })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("setAdsFilter", json!({ "enabled": true })).await;
    assert!(!out.is_error, "{}", out.text);
    assert_eq!(out.text, "Ad filter has been enabled successfully.");
}

#[test]
fn test_tool_schemas_describe_device_values() {
    let tools = deeper_core::definitions();
    let tool = |name: &str| tools.iter().find(|t| t["name"] == name).unwrap().clone();

    let parental = tool("setParentalControl");
    assert!(
        parental["description"]
            .as_str()
            .unwrap()
            .contains("0 (not block), 1 (block), 2/4/8 (unblock 2/4/8 hours)")
    );

    let update = tool("updateOneAccessControlDevice");
    assert_eq!(
        update["inputSchema"]["properties"]["routeMode"]["enum"],
        json!(["direct", "smart", "full"])
    );

    for name in ["setAdsFilter", "setSslBypass", "setBtSharing"] {
        assert_eq!(tool(name)["inputSchema"]["required"], json!(["enabled"]), "{name}");
    }
}

#[tokio::test]
async fn test_ssl_bypass_requires_ads_filter() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("GET"))
        .and(path("/api/security/getAdsFilter"))
        .respond_with(json_response(json!({ "enable": false })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tproxy/setSslBypass"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;

    let out = tools.call("setSslBypass", json!({ "enabled": true })).await;
    assert!(out.is_error);
    assert_eq!(
        out.text,
        "Ad filter must be enabled before allowing SSL bypass. Please enable ad filter first."
    );
}

#[tokio::test]
async fn test_disabling_ssl_bypass_skips_ads_check() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("GET"))
        .and(path("/api/security/getAdsFilter"))
        .respond_with(json_response(json!({ "enable": false })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/tproxy/setSslBypass"))
        .and(body_json(json!({ "enable": false })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("setSslBypass", json!({ "enabled": false })).await;
    assert_eq!(out.text, "SSL bypass has been disabled successfully.");
}

// ── Access control ──────────────────────────────────────────────────

async fn mount_roster(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/accessControl/list"))
        .respond_with(json_response(json!({
            "online": [{
                "mac": "aa:bb:cc:dd:ee:01",
                "ip": "192.168.1.10",
                "routeMode": "direct",
                "regionCode": "AMN",
                "httpsFilter": false,
                "bypass": [],
                "bwLimit": 0,
                "pinned": false,
                "remark": "",
                "name": "laptop"
            }],
            "offline": [{
                "mac": "aa:bb:cc:dd:ee:02",
                "ip": "192.168.1.11",
                "name": "tv"
            }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_update_before_listing_is_refused() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    let out = tools
        .call("updateOneAccessControlDevice", json!({ "index": 1, "pinned": true }))
        .await;
    assert!(out.is_error);
    assert_eq!(
        out.text,
        "Device list not found. Please run 'setAccessControl' first to select a device."
    );
    // only the login went out
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_merges_onto_cached_device() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;
    mount_roster(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/accessControl/getSwitch"))
        .respond_with(json_response(json!({ "value": false })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/accessControl/switch"))
        .and(body_json(json!({ "value": true })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/accessControl/setOne"))
        .and(body_partial_json(json!({
            "mac": "aa:bb:cc:dd:ee:01",
            "ip": "192.168.1.10",
            "regionCode": "AMN",
            "routeMode": "US",
            "name": "laptop"
        })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("setAccessControl", Value::Null).await;
    assert_eq!(
        out.text,
        "Here are the devices:\n\
         1. laptop (aa:bb:cc:dd:ee:01)\n\
         2. tv (aa:bb:cc:dd:ee:02)\n\
         Please use 'updateOneAccessControlDevice' with the device index and the settings you want to change."
    );

    // index 0 is accepted as the first device
    let out = tools
        .call("updateOneAccessControlDevice", json!({ "index": 0, "routeMode": "US" }))
        .await;
    assert!(!out.is_error, "{}", out.text);
    assert_eq!(out.text, "Successfully updated device laptop (aa:bb:cc:dd:ee:01).");
}

#[tokio::test]
async fn test_update_index_out_of_range_sends_nothing() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;
    mount_roster(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/accessControl/getSwitch"))
        .respond_with(json_response(json!({ "value": true })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/accessControl/setOne"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;

    tools.call("setAccessControl", Value::Null).await;
    let out = tools
        .call("updateOneAccessControlDevice", json!({ "index": 5, "pinned": true }))
        .await;
    assert!(out.is_error);
    assert_eq!(
        out.text,
        "Invalid index 5. Please provide an index between 1 and 2."
    );
}

// ── Sharing ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_enabling_bt_sharing_enables_sharing_first() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/sharing/setSharingState"))
        .and(body_json(json!({ "sharingEnabled": true })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sharing/setBtSharing"))
        .and(body_json(json!({ "btEnabled": true })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("setBtSharing", json!({ "enabled": true })).await;
    assert_eq!(out.text, "BitTorrent sharing has been enabled successfully.");
}

#[tokio::test]
async fn test_disabling_smtp_sharing_leaves_sharing_alone() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/sharing/setSharingState"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sharing/setSmtpSharing"))
        .and(body_json(json!({ "smtpEnabled": false })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools.call("setSmtpSharing", json!({ "enabled": false })).await;
    assert_eq!(out.text, "SMTP sharing has been disabled successfully.");
}

#[tokio::test]
async fn test_limit_aborts_when_sharing_cannot_be_enabled() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/sharing/setSharingState"))
        .respond_with(json_response(json!({ "success": false, "error": "locked" })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sharing/setBandwidthLimit"))
        .respond_with(ok())
        .expect(0)
        .mount(&server)
        .await;

    let out = tools
        .call("setSharingBandwidthLimit", json!({ "limit": 100 }))
        .await;
    assert!(out.is_error);
    assert!(
        out.text
            .starts_with("setSharingBandwidthLimit failed: could not enable sharing first:"),
        "{}",
        out.text
    );
}

#[tokio::test]
async fn test_bandwidth_limit_is_sent_in_kbps() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    Mock::given(method("POST"))
        .and(path("/api/sharing/setSharingState"))
        .respond_with(ok())
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sharing/setBandwidthLimit"))
        .and(body_json(json!({ "limit": 102_400 })))
        .respond_with(ok())
        .expect(1)
        .mount(&server)
        .await;

    let out = tools
        .call("setSharingBandwidthLimit", json!({ "limit": 100 }))
        .await;
    assert_eq!(
        out.text,
        "Sharing bandwidth limit has been set to 100 Mbps successfully."
    );
}

#[tokio::test]
async fn test_zero_limit_is_rejected() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    let out = tools.call("setSharingTrafficLimit", json!({ "limit": 0 })).await;
    assert!(out.is_error);
    assert!(out.text.contains("positive"), "{}", out.text);
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

// ── System info ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_system_info_reports_every_failed_read() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    for (endpoint, status) in [
        ("session-info", 200_u16),
        ("hardware-info", 500),
        ("software-info", 200),
        ("network-address", 503),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("/api/system-info/{endpoint}")))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({ "ok": 1 })))
            .mount(&server)
            .await;
    }

    let out = tools.call("getSystemInfo", Value::Null).await;
    assert!(out.is_error);
    assert!(out.text.starts_with("getSystemInfo failed: 2 request(s) failed: "), "{}", out.text);
    assert!(out.text.contains("hardware-info: "), "{}", out.text);
    assert!(out.text.contains("network-address: "), "{}", out.text);
}

#[tokio::test]
async fn test_system_info_combines_all_reads() {
    let (server, mut tools) = setup().await;
    login(&server, &mut tools).await;

    for endpoint in ["session-info", "hardware-info", "software-info", "network-address"] {
        Mock::given(method("GET"))
            .and(path(format!("/api/system-info/{endpoint}")))
            .respond_with(json_response(json!({ "source": endpoint })))
            .mount(&server)
            .await;
    }

    let out = tools.call("getSystemInfo", Value::Null).await;
    assert!(!out.is_error, "{}", out.text);
    let info: Value = serde_json::from_str(&out.text).unwrap();
    assert_eq!(info["hardwareInfo"]["source"], "hardware-info");
    assert_eq!(info["networkAddress"]["source"], "network-address");
}
