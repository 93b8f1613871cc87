// ── Service discovery ──
//
// Used while setting up a profile: confirms the credentials work and offers
// the router's services for management.

use std::collections::BTreeMap;

use tracing::{info, warn};

use ubusctl_api::models::ServiceEntry;

use crate::config::{COMMON_SERVICES, RouterConfig};
use crate::coordinator::Coordinator;
use crate::error::CoreError;

/// Log in and list the services the router knows about, sorted by name.
///
/// Falls back to [`COMMON_SERVICES`] when the router returns an empty list or
/// refuses to list services. Login and transport failures are errors.
pub async fn discover_services(config: &RouterConfig) -> Result<Vec<String>, CoreError> {
    let coordinator = Coordinator::new(config.clone())?;
    let client = coordinator.client();
    client.ensure_session().await?;

    let listed: BTreeMap<String, ServiceEntry> = match client.service_list().await {
        Ok(listed) => listed,
        Err(e) if e.is_session_fatal() => return Err(e.into()),
        Err(e) => {
            warn!(error = %e, "service/list failed, offering common services");
            BTreeMap::new()
        }
    };

    if listed.is_empty() {
        return Ok(COMMON_SERVICES.iter().map(|s| (*s).to_owned()).collect());
    }
    info!(count = listed.len(), "services discovered");
    Ok(listed.into_keys().collect())
}
