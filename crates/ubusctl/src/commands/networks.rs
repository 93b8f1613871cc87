//! Wireless network listing.

use serde::Serialize;
use tabled::Tabled;

use ubusctl_core::{Coordinator, WirelessNetwork};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Serialize)]
struct NetworkView {
    #[serde(flatten)]
    network: WirelessNetwork,
    connected: usize,
}

#[derive(Tabled)]
struct NetworkRow {
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "SSID")]
    ssid: String,
    #[tabled(rename = "Radio")]
    radio: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Security")]
    encryption: String,
    #[tabled(rename = "Channel")]
    channel: String,
    #[tabled(rename = "TX Power")]
    txpower: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "Clients")]
    connected: usize,
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let snap = util::fetch_snapshot(coordinator).await?;
    let color = output::should_color(&global.color);

    let networks: Vec<NetworkView> = snap
        .wireless_networks
        .values()
        .map(|n| NetworkView {
            connected: snap.connected_count(&n.interface),
            network: n.clone(),
        })
        .collect();

    let out = output::render_list(
        &global.output,
        &networks,
        |v| NetworkRow {
            interface: v.network.interface.clone(),
            ssid: v.network.ssid.clone(),
            radio: v.network.radio.clone(),
            mode: v.network.mode.clone(),
            encryption: v.network.encryption.clone(),
            channel: v.network.channel.clone(),
            txpower: v.network.txpower.clone(),
            state: output::state_label(v.network.is_online(), "online", "offline", color),
            connected: v.connected,
        },
        |v| v.network.interface.clone(),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
