//! Service command handlers.

use serde::Serialize;
use tabled::Tabled;

use ubusctl_core::{Coordinator, ServiceAction, ServiceStatus, discover_services};

use crate::cli::{GlobalOpts, ServicesArgs, ServicesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
    #[tabled(rename = "PID")]
    pid: String,
}

#[derive(Serialize)]
struct AvailableService {
    name: String,
    managed: bool,
}

#[derive(Tabled)]
struct AvailableRow {
    #[tabled(rename = "Service")]
    name: String,
    #[tabled(rename = "Managed")]
    managed: String,
}

fn main_pid(status: &ServiceStatus) -> String {
    status
        .data
        .instances
        .get("instance1")
        .and_then(|i| i.pid)
        .map_or_else(|| "-".into(), |pid| pid.to_string())
}

pub async fn handle(
    coordinator: &Coordinator,
    args: ServicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ServicesCommand::List => {
            let snap = util::fetch_snapshot(coordinator).await?;
            if snap.services.is_empty() && !global.quiet {
                eprintln!(
                    "No managed services reported. \
                     Add some with: ubusctl config set managed_services dnsmasq,firewall"
                );
            }
            let services: Vec<ServiceStatus> = snap.services.values().cloned().collect();
            let out = output::render_list(
                &global.output,
                &services,
                |s| ServiceRow {
                    name: s.name.clone(),
                    state: output::state_label(s.running, "running", "stopped", color),
                    pid: main_pid(s),
                },
                |s| s.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServicesCommand::Available => {
            let config = coordinator.config();
            let services: Vec<AvailableService> = discover_services(config)
                .await?
                .into_iter()
                .map(|name| AvailableService {
                    managed: config.is_managed(&name),
                    name,
                })
                .collect();
            let out = output::render_list(
                &global.output,
                &services,
                |s| AvailableRow {
                    name: s.name.clone(),
                    managed: if s.managed { "yes".into() } else { String::new() },
                },
                |s| s.name.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ServicesCommand::Start { name } => {
            control(coordinator, &name, ServiceAction::Start, global).await
        }
        ServicesCommand::Stop { name } => {
            control(coordinator, &name, ServiceAction::Stop, global).await
        }
        ServicesCommand::Restart { name } => {
            control(coordinator, &name, ServiceAction::Restart, global).await
        }
    }
}

async fn control(
    coordinator: &Coordinator,
    name: &str,
    action: ServiceAction,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator
        .try_control_service(name, &action.to_string())
        .await?;
    if !global.quiet {
        eprintln!("Sent {action} to {name}");
    }
    Ok(())
}
