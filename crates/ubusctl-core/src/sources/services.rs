use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use ubusctl_api::{Error, UbusClient};

use crate::model::ServiceStatus;

use super::degrade;

/// Run state of every managed service that `service/list` knows about.
pub async fn status(
    client: &UbusClient,
    managed: &BTreeSet<String>,
) -> Result<BTreeMap<String, ServiceStatus>, Error> {
    if managed.is_empty() {
        return Ok(BTreeMap::new());
    }

    let mut listed = degrade("service/list", client.service_list().await)?;

    let status: BTreeMap<_, _> = managed
        .iter()
        .filter_map(|name| {
            let data = listed.remove(name)?;
            Some((
                name.clone(),
                ServiceStatus {
                    name: name.clone(),
                    running: data.is_running(),
                    data,
                },
            ))
        })
        .collect();

    debug!(
        managed = managed.len(),
        present = status.len(),
        "service status"
    );
    Ok(status)
}
