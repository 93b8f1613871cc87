// ── Domain model ──
//
// Canonical types published in every snapshot. Built from ubus payloads in
// `convert`, consumed read-only by the CLI.

pub mod device;
pub mod service;
pub mod snapshot;
pub mod system;
pub mod wireless;

pub use device::{ConnectedDevice, DhcpLease, ProcessedDevice};
pub use service::{ServiceAction, ServiceStatus};
pub use snapshot::Snapshot;
pub use system::{MemoryUsage, SystemSummary};
pub use wireless::{InterfaceClients, WirelessNetwork};
