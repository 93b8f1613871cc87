//! Command dispatch: bridges CLI args -> coordinator -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod kick;
pub mod networks;
pub mod services;
pub mod status;
pub mod util;
pub mod watch;

use ubusctl_core::Coordinator;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a router-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    coordinator: &Coordinator,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(coordinator, global).await,
        Command::Devices(args) => devices::handle(coordinator, args, global).await,
        Command::Networks => networks::handle(coordinator, global).await,
        Command::Services(args) => services::handle(coordinator, args, global).await,
        Command::Kick(args) => kick::handle(coordinator, args, global).await,
        Command::Watch(_) => watch::handle(coordinator, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
