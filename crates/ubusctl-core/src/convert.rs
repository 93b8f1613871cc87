// ── API-to-domain type conversions ──
//
// Bridges raw `ubusctl_api::models` payloads into the canonical
// `ubusctl_core::model` types. Missing optional data is filled with the same
// defaults the router's own web UI shows ("N/A", "auto", "Unknown").

use serde_json::Value;

use ubusctl_api::models::{
    Encryption, HostapdClient, MemoryInfo, RadioStatus, SystemBoard, SystemInfo,
    WirelessInterface,
};

use crate::model::{ConnectedDevice, MemoryUsage, SystemSummary, WirelessNetwork};

// ── Helpers ────────────────────────────────────────────────────────

const KIB: f64 = 1024.0;
const MIB: f64 = KIB * 1024.0;
const GIB: f64 = MIB * 1024.0;

/// Format a byte count as GB, MB or KB with one decimal.
#[allow(clippy::cast_precision_loss)]
pub fn format_bytes(bytes: u64) -> String {
    let value = bytes as f64;
    if value > GIB {
        format!("{:.1} GB", value / GIB)
    } else if value > MIB {
        format!("{:.1} MB", value / MIB)
    } else {
        format!("{:.1} KB", value / KIB)
    }
}

/// Scale a load average to a percentage of `cores`, rounded to one decimal.
pub fn load_percent(load: f64, cores: u32) -> f64 {
    let cores = f64::from(cores.max(1));
    (load / cores * 100.0 * 10.0).round() / 10.0
}

/// Render a UCI value that may be a number or a string.
fn value_label(value: Option<&Value>, default: &str) -> String {
    match value {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => default.to_owned(),
    }
}

/// Derive a display label for an encryption setting.
///
/// Rules, first match wins: no block or disabled is `Open`; PSK with CCMP is
/// `WPA2-PSK (CCMP)`; any other PSK is `WPA-PSK`; otherwise the suites and
/// ciphers are listed in upper case, falling back to `Encrypted`.
pub fn encryption_label(encryption: Option<&Encryption>) -> String {
    let block = match encryption {
        None => return "Open".into(),
        Some(Encryption::Mode(mode)) => {
            return if mode.is_empty() || mode == "none" {
                "Open".into()
            } else {
                "Encrypted".into()
            };
        }
        Some(Encryption::Block(block)) => block,
    };

    if !block.enabled {
        return "Open".into();
    }

    let has = |list: &[String], needle: &str| list.iter().any(|s| s == needle);
    let auth: &[String] = &block.auth_suites;
    let cipher: &[String] = &block.pair_ciphers;

    if has(auth, "psk") && has(cipher, "ccmp") {
        "WPA2-PSK (CCMP)".into()
    } else if has(auth, "psk") {
        "WPA-PSK".into()
    } else if !auth.is_empty() && !cipher.is_empty() {
        format!(
            "{} ({})",
            auth.join("/").to_uppercase(),
            cipher.join("/").to_uppercase()
        )
    } else {
        "Encrypted".into()
    }
}

// ── System ─────────────────────────────────────────────────────────

impl From<&MemoryInfo> for MemoryUsage {
    fn from(m: &MemoryInfo) -> Self {
        Self {
            total: format_bytes(m.total),
            free: format_bytes(m.free),
            available: format_bytes(m.available),
        }
    }
}

/// Merge `system/board` and `system/info` into one summary.
pub fn system_summary(board: &SystemBoard, info: &SystemInfo, cores: u32) -> SystemSummary {
    let load = |idx: usize| {
        info.load
            .get(idx)
            .copied()
            .map_or(0.0, |l| load_percent(l, cores))
    };
    let defaults = SystemSummary::default();

    SystemSummary {
        hostname: board.hostname.clone().unwrap_or(defaults.hostname),
        model: board.model.clone().unwrap_or(defaults.model),
        kernel: board.kernel.clone().unwrap_or(defaults.kernel),
        uptime_secs: info.uptime,
        load_1min: load(0),
        load_5min: load(1),
        load_15min: load(2),
        memory: info.memory.as_ref().map(MemoryUsage::from),
    }
}

// ── Wireless ───────────────────────────────────────────────────────

/// Build a connected device from a hostapd station entry.
pub fn connected_device(mac: &str, interface: &str, client: &HostapdClient) -> ConnectedDevice {
    ConnectedDevice {
        mac: mac.to_owned(),
        interface: Some(interface.to_owned()),
        connected: true,
        wireless: true,
        signal: client.signal,
        rx_rate: client.rate.map(|r| r.rx),
        tx_rate: client.rate.map(|r| r.tx),
        attributes: client.extra.clone(),
    }
}

/// Build a network entry for one wifi-iface of `radio`.
pub fn wireless_network(
    radio: &str,
    radio_status: &RadioStatus,
    section: &str,
    iface: &WirelessInterface,
) -> WirelessNetwork {
    let config = &iface.config;
    WirelessNetwork {
        interface: iface.ifname.clone().unwrap_or_else(|| section.to_owned()),
        radio: radio.to_owned(),
        ssid: config.ssid.clone().unwrap_or_else(|| "N/A".into()),
        mode: config.mode.clone().unwrap_or_else(|| "ap".into()),
        encryption: encryption_label(config.encryption.as_ref()),
        channel: value_label(radio_status.config.channel.as_ref(), "auto"),
        txpower: value_label(radio_status.config.txpower.as_ref(), "auto"),
        disabled: config.disabled.unwrap_or(false),
        up: iface.up.unwrap_or(false),
    }
}
