// ── Data source adapters ──
//
// One module per slice of router state. Each adapter degrades to an empty or
// default payload when its own call fails, except for session and transport
// failures, which are returned so the coordinator can abort the cycle.

pub mod dhcp;
pub mod ethers;
pub mod services;
pub mod system;
pub mod wireless;

use tracing::{debug, warn};

/// Pass cycle-fatal errors through, replace anything else with `T::default()`.
pub(crate) fn degrade<T: Default>(
    source: &str,
    result: Result<T, ubusctl_api::Error>,
) -> Result<T, ubusctl_api::Error> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_session_fatal() => Err(e),
        Err(ref e @ ubusctl_api::Error::Rpc { .. }) => {
            debug!(source, error = %e, "source unavailable, using defaults");
            Ok(T::default())
        }
        Err(e) => {
            warn!(source, error = %e, "unexpected error, using defaults");
            Ok(T::default())
        }
    }
}
