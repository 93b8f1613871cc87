//! Kick handler.

use ubusctl_core::Coordinator;

use crate::cli::{GlobalOpts, KickArgs};
use crate::error::CliError;

use super::util;

pub async fn handle(
    coordinator: &Coordinator,
    args: KickArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    // Without an interface, the kick goes to every interface in the snapshot.
    if args.interface.is_none() {
        util::fetch_snapshot(coordinator).await?;
    }

    let sent = coordinator
        .try_kick_device(&args.mac, args.interface.as_deref())
        .await?;

    if sent == 0 {
        return Err(CliError::NotFound {
            resource_type: "wireless interface".into(),
            identifier: "(any)".into(),
            list_command: "networks".into(),
        });
    }

    if !global.quiet {
        let ban = coordinator.config().kick_ban;
        eprintln!(
            "Kicked {} on {sent} interface(s), banned for {}",
            args.mac,
            util::format_uptime(ban.as_secs())
        );
    }
    Ok(())
}
