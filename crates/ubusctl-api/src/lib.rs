// ubusctl-api: Async Rust client for the OpenWrt ubus JSON-RPC bridge

pub mod client;
pub mod error;
pub mod file;
pub mod hostapd;
pub mod models;
pub mod rpc;
pub mod service;
pub mod session;
pub mod system;
pub mod transport;
pub mod wireless;

pub use client::UbusClient;
pub use error::Error;
pub use rpc::{RpcTransport, SENTINEL_TOKEN};
pub use session::{Session, SessionManager};
pub use transport::{TlsMode, TransportConfig};
