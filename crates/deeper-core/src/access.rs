// ── Access-control editing ──
//
// Two steps: `load_roster` fetches online+offline devices into the session,
// then `update_device` edits one of them by its 1-based position in that
// roster. The roster is a hint; it is not refreshed after an update.

use deeper_api::{AccessControlDevice, AccessControlUpdate, DeviceClient};
use tracing::{debug, info};

use crate::error::CoreError;
use crate::session::Session;

/// Fetch the roster, cache it in `session`, and return it.
pub async fn load_roster(
    client: &DeviceClient,
    session: &mut Session,
    cookie: &str,
) -> Result<Vec<AccessControlDevice>, CoreError> {
    let devices = client.list_access_control(cookie).await?.into_merged();
    info!(count = devices.len(), "access control roster cached");
    session.set_device_list(devices.clone());
    Ok(devices)
}

/// `1. name (mac)` lines for a roster.
pub fn numbered_list(devices: &[AccessControlDevice]) -> String {
    devices
        .iter()
        .enumerate()
        .map(|(i, d)| format!("{}. {} ({})", i + 1, d.display_name(), d.mac))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Map a caller's 1-based index onto the roster. `0` is accepted as an
/// alias for the first entry.
pub fn resolve_index(index: u64, len: usize) -> Result<usize, CoreError> {
    let position = if index == 0 { 0 } else { index - 1 };
    usize::try_from(position)
        .ok()
        .filter(|&p| p < len)
        .ok_or(CoreError::IndexOutOfRange { index, len })
}

/// Edit one cached device.
///
/// The roster and index are checked before any request. Then the
/// access-control switch is turned on if needed, the supplied fields are
/// merged onto the cached snapshot and the full record is sent. Returns
/// the record as sent.
pub async fn update_device(
    client: &DeviceClient,
    session: &Session,
    cookie: &str,
    index: u64,
    update: AccessControlUpdate,
) -> Result<AccessControlDevice, CoreError> {
    let devices = session.device_list().ok_or(CoreError::DeviceListMissing)?;
    let position = resolve_index(index, devices.len())?;
    let mut device = devices[position].clone();

    client
        .ensure_access_control_switch(cookie, true)
        .await
        .map_err(|e| CoreError::AccessControlSwitch {
            reason: CoreError::from(e).to_string(),
        })?;

    debug!(mac = %device.mac, ?update, "merging access control update");
    device.apply(update);
    client.set_one_access_control(cookie, &device).await?;
    info!(mac = %device.mac, "access control device updated");
    Ok(device)
}
