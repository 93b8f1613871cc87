//! Continuous polling until Ctrl-C.

use std::time::Duration;

use ubusctl_core::{Coordinator, RouterConfig, Snapshot};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

/// Apply `--interval` before the coordinator is built.
pub fn apply_interval(router: &mut RouterConfig, args: &WatchArgs) {
    if let Some(secs) = args.interval {
        router.poll_interval = Duration::from_secs(secs.max(1));
    }
}

fn summary(snap: &Snapshot) -> String {
    let online = snap
        .wireless_networks
        .values()
        .filter(|n| n.is_online())
        .count();
    let running = snap.services.values().filter(|s| s.running).count();
    format!(
        "[{}] {}  load {:.1}%  devices {}  networks {}/{} online  services {}/{} running",
        snap.refreshed_at.format("%H:%M:%S"),
        snap.system.hostname,
        snap.system.load_1min,
        snap.devices.len(),
        online,
        snap.wireless_networks.len(),
        running,
        snap.services.len(),
    )
}

fn print_snapshot(snap: &Snapshot, global: &GlobalOpts) {
    let out = output::render_single(&global.output, snap, summary, summary);
    output::print_output(&out, global.quiet);
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    coordinator.start().await?;

    let mut rx = coordinator.subscribe();
    if let Some(snap) = rx.borrow_and_update().clone() {
        print_snapshot(&snap, global);
    }

    loop {
        tokio::select! {
            biased;
            _ = tokio::signal::ctrl_c() => break,
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = rx.borrow_and_update().clone();
                if let Some(snap) = latest {
                    print_snapshot(&snap, global);
                }
            }
        }
    }

    coordinator.shutdown().await;
    Ok(())
}
