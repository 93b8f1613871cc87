use serde::{Deserialize, Serialize};

/// Board identity and runtime counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemSummary {
    pub hostname: String,
    pub model: String,
    pub kernel: String,
    pub uptime_secs: u64,
    /// Load averages as a percentage of the configured core count.
    pub load_1min: f64,
    pub load_5min: f64,
    pub load_15min: f64,
    /// Absent when the router reported no memory block.
    pub memory: Option<MemoryUsage>,
}

impl Default for SystemSummary {
    fn default() -> Self {
        Self {
            hostname: "OpenWrt".into(),
            model: "Unknown".into(),
            kernel: "Unknown".into(),
            uptime_secs: 0,
            load_1min: 0.0,
            load_5min: 0.0,
            load_15min: 0.0,
            memory: None,
        }
    }
}

/// Human-readable memory figures (`"117.3 MB"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryUsage {
    pub total: String,
    pub free: String,
    pub available: String,
}
