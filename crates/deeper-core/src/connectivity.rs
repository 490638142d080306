// ── Tunnel self-healing ──
//
// Ping every tunnel's active endpoint. An unreachable tunnel with spare
// endpoints is moved to another node; one with a single endpoint is
// rebuilt instead. Each tunnel gets exactly one outcome line.

use std::fmt;

use deeper_api::{DeviceClient, Prober, Tunnel};
use tracing::{debug, info, warn};

use crate::error::CoreError;

/// What happened to one tunnel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelHealth {
    NoActiveIp,
    Reachable,
    Switched,
    SwitchFailed(String),
    Refreshed,
    RefreshFailed(String),
}

/// Outcome line for one tunnel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TunnelReport {
    pub tunnel_code: String,
    pub active_ip: Option<String>,
    pub health: TunnelHealth,
}

impl fmt::Display for TunnelReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = &self.tunnel_code;
        let ip = self.active_ip.as_deref().unwrap_or_default();
        match &self.health {
            TunnelHealth::NoActiveIp => write!(f, "Tunnel {code} has no active IP."),
            TunnelHealth::Reachable => write!(f, "Tunnel {code} ({ip}) is reachable."),
            TunnelHealth::Switched => {
                write!(f, "Tunnel {code} ({ip}) unreachable, switched node successfully.")
            }
            TunnelHealth::SwitchFailed(reason) => write!(
                f,
                "Tunnel {code} ({ip}) unreachable, failed to switch node: {reason}"
            ),
            TunnelHealth::Refreshed => {
                write!(f, "Tunnel {code} ({ip}) unreachable, refreshed tunnel successfully.")
            }
            TunnelHealth::RefreshFailed(reason) => write!(
                f,
                "Tunnel {code} ({ip}) unreachable, failed to refresh tunnel: {reason}"
            ),
        }
    }
}

/// Probe every tunnel and repair the unreachable ones.
///
/// Only listing the tunnels can fail the whole run; per-tunnel repair
/// failures are recorded in that tunnel's report.
pub async fn test_tunnels<P: Prober + Sync>(
    client: &DeviceClient,
    prober: &P,
    cookie: &str,
) -> Result<Vec<TunnelReport>, CoreError> {
    let tunnels = client.list_tunnels(cookie).await?;
    debug!(count = tunnels.len(), "testing tunnel connectivity");

    let mut reports = Vec::with_capacity(tunnels.len());
    for tunnel in tunnels {
        reports.push(check_tunnel(client, prober, cookie, tunnel).await);
    }
    Ok(reports)
}

async fn check_tunnel<P: Prober + Sync>(
    client: &DeviceClient,
    prober: &P,
    cookie: &str,
    tunnel: Tunnel,
) -> TunnelReport {
    let Tunnel {
        tunnel_code,
        active_ip,
        active_num,
        ..
    } = tunnel;

    let Some(ip) = active_ip.filter(|ip| !ip.is_empty()) else {
        return TunnelReport {
            tunnel_code,
            active_ip: None,
            health: TunnelHealth::NoActiveIp,
        };
    };

    let health = if prober.ping(&ip).await {
        TunnelHealth::Reachable
    } else if active_num > 1 {
        match client.switch_node(cookie, &tunnel_code, &ip).await {
            Ok(()) => {
                info!(tunnel = %tunnel_code, %ip, "switched tunnel node");
                TunnelHealth::Switched
            }
            Err(e) => {
                warn!(tunnel = %tunnel_code, error = %e, "node switch failed");
                TunnelHealth::SwitchFailed(CoreError::from(e).to_string())
            }
        }
    } else {
        match client.refresh_tunnel(cookie, &tunnel_code).await {
            Ok(()) => {
                info!(tunnel = %tunnel_code, %ip, "refreshed tunnel");
                TunnelHealth::Refreshed
            }
            Err(e) => {
                warn!(tunnel = %tunnel_code, error = %e, "tunnel refresh failed");
                TunnelHealth::RefreshFailed(CoreError::from(e).to_string())
            }
        }
    };

    TunnelReport {
        tunnel_code,
        active_ip: Some(ip),
        health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_lines() {
        let report = TunnelReport {
            tunnel_code: "US".into(),
            active_ip: Some("1.2.3.4".into()),
            health: TunnelHealth::Switched,
        };
        assert_eq!(
            report.to_string(),
            "Tunnel US (1.2.3.4) unreachable, switched node successfully."
        );

        let report = TunnelReport {
            tunnel_code: "JP".into(),
            active_ip: None,
            health: TunnelHealth::NoActiveIp,
        };
        assert_eq!(report.to_string(), "Tunnel JP has no active IP.");
    }
}
