use tracing::debug;

use ubusctl_api::{Error, UbusClient};

use crate::convert::system_summary;
use crate::model::SystemSummary;

use super::degrade;

/// `system/board` + `system/info`, loads scaled by `cores`.
pub async fn fetch(client: &UbusClient, cores: u32) -> Result<SystemSummary, Error> {
    let (board, info) = tokio::join!(client.system_board(), client.system_info());
    let board = degrade("system/board", board)?;
    let info = degrade("system/info", info)?;

    let summary = system_summary(&board, &info, cores);
    debug!(hostname = %summary.hostname, uptime = summary.uptime_secs, "system info");
    Ok(summary)
}
