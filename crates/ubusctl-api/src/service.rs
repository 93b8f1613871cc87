// `service` object
//
// procd service listing and init-script control.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::debug;

use crate::client::UbusClient;
use crate::error::Error;
use crate::models::ServiceEntry;

impl UbusClient {
    /// All procd services with their instances.
    ///
    /// `service/list`
    pub async fn service_list(&self) -> Result<BTreeMap<String, ServiceEntry>, Error> {
        debug!("listing services");
        self.call("service", "list", json!({})).await
    }

    /// `service/start` with `{"name": ...}`
    pub async fn service_start(&self, name: &str) -> Result<(), Error> {
        self.service_command("start", name).await
    }

    /// `service/stop` with `{"name": ...}`
    pub async fn service_stop(&self, name: &str) -> Result<(), Error> {
        self.service_command("stop", name).await
    }

    /// `service/restart` with `{"name": ...}`
    pub async fn service_restart(&self, name: &str) -> Result<(), Error> {
        self.service_command("restart", name).await
    }

    async fn service_command(&self, method: &str, name: &str) -> Result<(), Error> {
        debug!(service = name, method, "service command");
        self.command("service", method, json!({ "name": name })).await
    }
}
