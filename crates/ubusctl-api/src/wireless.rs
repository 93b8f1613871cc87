// `network.wireless` object

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::client::UbusClient;
use crate::error::Error;
use crate::models::RadioStatus;

impl UbusClient {
    /// Radio and wifi-iface state keyed by radio name.
    ///
    /// `network.wireless/status`
    pub async fn wireless_status(&self) -> Result<BTreeMap<String, RadioStatus>, Error> {
        debug!("fetching wireless status");
        self.call("network.wireless", "status", json!({})).await
    }
}
