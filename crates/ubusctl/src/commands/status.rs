//! Router status handler.

use chrono::{DateTime, Utc};
use serde::Serialize;

use ubusctl_core::{Coordinator, Snapshot, SystemSummary};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct StatusView<'a> {
    #[serde(flatten)]
    system: &'a SystemSummary,
    connected_devices: usize,
    networks_online: usize,
    networks_total: usize,
    services_running: usize,
    services_managed: usize,
    refreshed_at: DateTime<Utc>,
}

impl<'a> StatusView<'a> {
    fn new(snap: &'a Snapshot) -> Self {
        Self {
            system: &snap.system,
            connected_devices: snap.devices.len(),
            networks_online: snap
                .wireless_networks
                .values()
                .filter(|n| n.is_online())
                .count(),
            networks_total: snap.wireless_networks.len(),
            services_running: snap.services.values().filter(|s| s.running).count(),
            services_managed: snap.services.len(),
            refreshed_at: snap.refreshed_at,
        }
    }
}

fn detail(v: &StatusView<'_>) -> String {
    let s = v.system;
    let mut lines = vec![
        format!("Hostname: {}", s.hostname),
        format!("Model:    {}", s.model),
        format!("Kernel:   {}", s.kernel),
        format!("Uptime:   {}", util::format_uptime(s.uptime_secs)),
        format!(
            "Load:     {:.1}% / {:.1}% / {:.1}%",
            s.load_1min, s.load_5min, s.load_15min
        ),
    ];
    if let Some(ref mem) = s.memory {
        lines.push(format!(
            "Memory:   {} total, {} free, {} available",
            mem.total, mem.free, mem.available
        ));
    }
    lines.push(format!("Devices:  {}", v.connected_devices));
    lines.push(format!(
        "Networks: {}/{} online",
        v.networks_online, v.networks_total
    ));
    lines.push(format!(
        "Services: {}/{} running",
        v.services_running, v.services_managed
    ));
    lines.join("\n")
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = util::fetch_snapshot(coordinator).await?;
    let view = StatusView::new(&snap);
    let out = output::render_single(&global.output, &view, detail, |v| {
        v.system.hostname.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
