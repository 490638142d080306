// ── System info fan-out ──
//
// The four system-info reads are independent, so they run concurrently.
// The result is all-or-nothing: any failure fails the whole call and the
// error lists every read that failed.

use deeper_api::DeviceClient;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::CoreError;

/// Combined system-info snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemInfo {
    pub session_info: Value,
    pub hardware_info: Value,
    pub software_info: Value,
    pub network_address: Value,
}

pub async fn get_system_info(client: &DeviceClient, cookie: &str) -> Result<SystemInfo, CoreError> {
    debug!("fetching system info");
    let (session, hardware, software, network) = futures::join!(
        client.get_session_info(cookie),
        client.get_hardware_info(cookie),
        client.get_software_info(cookie),
        client.get_network_address(cookie),
    );

    let mut failures = Vec::new();
    let session_info = collect("session-info", session, &mut failures);
    let hardware_info = collect("hardware-info", hardware, &mut failures);
    let software_info = collect("software-info", software, &mut failures);
    let network_address = collect("network-address", network, &mut failures);

    if !failures.is_empty() {
        return Err(CoreError::Aggregate { failures });
    }

    Ok(SystemInfo {
        session_info,
        hardware_info,
        software_info,
        network_address,
    })
}

fn collect(
    label: &str,
    result: Result<Value, deeper_api::Error>,
    failures: &mut Vec<String>,
) -> Value {
    result.unwrap_or_else(|e| {
        failures.push(format!("{label}: {}", CoreError::from(e)));
        Value::Null
    })
}
