//! Device command handlers.

use tabled::Tabled;

use ubusctl_core::{Coordinator, CoreError, ProcessedDevice};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "MAC")]
    mac: String,
    #[tabled(rename = "Interface")]
    interface: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "RX")]
    rx: String,
    #[tabled(rename = "TX")]
    tx: String,
    #[tabled(rename = "ID")]
    slug: String,
}

impl From<&ProcessedDevice> for DeviceRow {
    fn from(d: &ProcessedDevice) -> Self {
        Self {
            name: d.display_name.clone(),
            mac: d.device.mac.clone(),
            interface: d.device.interface.clone().unwrap_or_else(|| "-".into()),
            signal: util::format_signal(d.device.signal),
            rx: util::format_rate(d.device.rx_rate),
            tx: util::format_rate(d.device.tx_rate),
            slug: d.slug.clone(),
        }
    }
}

fn detail(d: &ProcessedDevice) -> String {
    let mut lines = vec![
        format!("Name:      {}", d.display_name),
        format!("Qualified: {}", d.qualified_name),
        format!("ID:        {}", d.slug),
        format!("MAC:       {}", d.device.mac),
        format!(
            "Interface: {}",
            d.device.interface.as_deref().unwrap_or("-")
        ),
        format!("Signal:    {}", util::format_signal(d.device.signal)),
        format!("RX rate:   {}", util::format_rate(d.device.rx_rate)),
        format!("TX rate:   {}", util::format_rate(d.device.tx_rate)),
    ];
    for (key, value) in &d.device.attributes {
        lines.push(format!("{key}: {value}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    coordinator: &Coordinator,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let snap = util::fetch_snapshot(coordinator).await?;

    match args.command {
        DevicesCommand::List { interface } => {
            let devices: Vec<ProcessedDevice> = snap
                .devices
                .values()
                .filter(|d| {
                    interface
                        .as_deref()
                        .is_none_or(|i| d.device.interface.as_deref() == Some(i))
                })
                .cloned()
                .collect();
            let out = output::render_list(&global.output, &devices, |d| DeviceRow::from(d), |d| {
                d.device.mac.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { mac } => {
            let device = snap
                .device(&mac)
                .ok_or(CoreError::DeviceNotFound { identifier: mac })?;
            let out = output::render_single(&global.output, device, detail, |d| {
                d.device.mac.clone()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
