use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ubusctl_api::models::ServiceEntry;

/// Run state of a managed service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub name: String,
    pub running: bool,
    /// The raw `service/list` entry.
    pub data: ServiceEntry,
}

/// Init-script actions exposed for managed services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
}
