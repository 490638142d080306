// Host reachability probing
//
// Tunnel health checks ping each tunnel's active endpoint from the host
// running this process. The `Prober` seam lets callers substitute a
// scripted implementation.

use std::future::Future;
use std::net::IpAddr;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;
use tracing::{debug, warn};

/// Something that can tell whether an address answers an ICMP echo.
pub trait Prober {
    /// Send one echo request to `ip`; `true` iff a reply arrived.
    fn ping(&self, ip: &str) -> impl Future<Output = bool> + Send;
}

/// Pings through the host's `ping` binary, one echo request per call.
#[derive(Debug, Clone)]
pub struct SystemPing {
    /// Upper bound on how long a single `ping` invocation may run.
    pub deadline: Duration,
}

impl Default for SystemPing {
    fn default() -> Self {
        Self {
            deadline: Duration::from_secs(5),
        }
    }
}

impl Prober for SystemPing {
    async fn ping(&self, ip: &str) -> bool {
        if ip.parse::<IpAddr>().is_err() {
            warn!(ip, "refusing to ping a non-IP address");
            return false;
        }

        let count_flag = if cfg!(windows) { "-n" } else { "-c" };
        let status = Command::new("ping")
            .args([count_flag, "1", ip])
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .status();

        match tokio::time::timeout(self.deadline, status).await {
            Ok(Ok(status)) => {
                debug!(ip, success = status.success(), "ping finished");
                status.success()
            }
            Ok(Err(e)) => {
                warn!(ip, error = %e, "failed to run ping");
                false
            }
            Err(_) => {
                debug!(ip, "ping timed out");
                false
            }
        }
    }
}
