// `system` object
//
// Board identity and runtime counters from rpcd's system plugin.

use serde_json::json;
use tracing::debug;

use crate::client::UbusClient;
use crate::error::Error;
use crate::models::{SystemBoard, SystemInfo};

impl UbusClient {
    /// Hostname, model and kernel release.
    ///
    /// `system/board`
    pub async fn system_board(&self) -> Result<SystemBoard, Error> {
        debug!("fetching board info");
        self.call("system", "board", json!({})).await
    }

    /// Uptime, load averages and memory counters.
    ///
    /// `system/info`
    pub async fn system_info(&self) -> Result<SystemInfo, Error> {
        debug!("fetching system info");
        self.call("system", "info", json!({})).await
    }
}
