// ── Device naming ──
//
// Resolves a human name for every connected device and derives a stable
// identifier from it. Pure: the same three maps always produce the same
// output, no matter how they were built.

use std::collections::{BTreeMap, HashSet};

use crate::model::{ConnectedDevice, DhcpLease, ProcessedDevice};

/// Interface label for devices that report none.
const UNKNOWN_INTERFACE: &str = "unknown";

/// Resolve names for every device.
///
/// Display name priority: ethers entry (lowercased MAC), then a non-empty DHCP
/// hostname (MAC as reported), then the MAC itself. Devices are visited in
/// MAC order, and a slug already issued in this pass gets a numeric suffix.
pub fn process_devices(
    devices: &BTreeMap<String, ConnectedDevice>,
    dhcp_leases: &BTreeMap<String, DhcpLease>,
    ethers: &BTreeMap<String, String>,
) -> BTreeMap<String, ProcessedDevice> {
    let mut issued = HashSet::with_capacity(devices.len());

    devices
        .iter()
        .map(|(mac, device)| {
            let display_name = display_name(mac, dhcp_leases, ethers);
            let qualified_name = qualified_name(&display_name, device.interface.as_deref());

            let mut base = slugify(&qualified_name);
            if base.is_empty() {
                base = slugify(mac);
            }
            let slug = unique_slug(&base, &mut issued);

            let processed = ProcessedDevice {
                device: device.clone(),
                display_name,
                qualified_name,
                slug,
            };
            (mac.clone(), processed)
        })
        .collect()
}

/// Pick the best available name for `mac`. Never empty for a non-empty MAC.
pub fn display_name(
    mac: &str,
    dhcp_leases: &BTreeMap<String, DhcpLease>,
    ethers: &BTreeMap<String, String>,
) -> String {
    if let Some(name) = ethers.get(&mac.to_lowercase()) {
        return name.clone();
    }
    dhcp_leases
        .get(mac)
        .and_then(|lease| lease.hostname.as_deref())
        .filter(|h| !h.is_empty())
        .map_or_else(|| mac.to_owned(), str::to_owned)
}

/// `"{name} ({interface})"`, with `unknown` for a missing interface.
pub fn qualified_name(display_name: &str, interface: Option<&str>) -> String {
    format!(
        "{display_name} ({})",
        interface.unwrap_or(UNKNOWN_INTERFACE)
    )
}

/// Lowercase, map everything outside `[a-z0-9_]` to `_`, collapse repeated
/// underscores and trim them from both ends.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.to_lowercase().chars() {
        let ch = if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '_' {
            ch
        } else {
            '_'
        };
        if ch == '_' && slug.ends_with('_') {
            continue;
        }
        slug.push(ch);
    }
    slug.trim_matches('_').to_owned()
}

fn unique_slug(base: &str, issued: &mut HashSet<String>) -> String {
    let mut candidate = base.to_owned();
    let mut n = 2;
    while issued.contains(&candidate) {
        candidate = format!("{base}_{n}");
        n += 1;
    }
    issued.insert(candidate.clone());
    candidate
}
