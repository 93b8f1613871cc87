// ubusctl-core: Polling coordinator and control layer between ubusctl-api and the CLI.

pub mod config;
pub mod control;
pub mod convert;
pub mod coordinator;
pub mod discovery;
pub mod error;
pub mod model;
pub mod naming;
pub mod sources;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DhcpBackend, RouterConfig, TlsVerification, WirelessBackend};
pub use coordinator::{Coordinator, CoordinatorState};
pub use discovery::discover_services;
pub use error::CoreError;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    ConnectedDevice, DhcpLease, InterfaceClients, MemoryUsage, ProcessedDevice, ServiceAction,
    ServiceStatus, Snapshot, SystemSummary, WirelessNetwork,
};
