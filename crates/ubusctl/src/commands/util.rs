//! Shared helpers for command handlers.

use std::sync::Arc;
use std::time::Duration;

use ubusctl_core::{Coordinator, Snapshot};

use crate::error::CliError;

/// Run one refresh cycle and return the resulting snapshot.
pub async fn fetch_snapshot(coordinator: &Coordinator) -> Result<Arc<Snapshot>, CliError> {
    Ok(coordinator.first_refresh().await?)
}

/// `3h 12m 5s` style uptime.
pub fn format_uptime(secs: u64) -> String {
    humantime::format_duration(Duration::from_secs(secs)).to_string()
}

/// Link rate in kbit/s as reported by hostapd, shown in Mbit/s.
#[allow(clippy::cast_precision_loss)]
pub fn format_rate(rate: Option<u64>) -> String {
    rate.map_or_else(|| "-".into(), |r| format!("{:.1} Mbit/s", r as f64 / 1000.0))
}

pub fn format_signal(signal: Option<i64>) -> String {
    signal.map_or_else(|| "-".into(), |s| format!("{s} dBm"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_is_human_readable() {
        assert_eq!(format_uptime(3 * 3600 + 12 * 60 + 5), "3h 12m 5s");
        assert_eq!(format_uptime(0), "0s");
    }

    #[test]
    fn rates_and_signal() {
        assert_eq!(format_rate(Some(866_700)), "866.7 Mbit/s");
        assert_eq!(format_rate(None), "-");
        assert_eq!(format_signal(Some(-61)), "-61 dBm");
    }
}
