//! Command dispatch: bridges CLI args -> coordinator calls -> output formatting.

pub mod config_cmd;
pub mod heater;
pub mod info;
pub mod status;
pub mod watch;

use std::time::Duration;

use heatctl_core::{Coordinator, CoordinatorConfig};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Dispatch a device-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let config = config::coordinator_config(global)?;
    tracing::debug!(command = ?cmd, host = %config.host, "dispatching command");

    match cmd {
        Command::Status(args) => status::handle(&one_shot(config)?, &args, global).await,
        Command::Watch(args) => watch::handle(config, &args, global).await,
        Command::Info => info::handle(&one_shot(config)?, global).await,
        Command::Power(args) => heater::power(&one_shot(config)?, args.level, global).await,
        Command::Enable => heater::set_enabled(&one_shot(config)?, true, global).await,
        Command::Disable => heater::set_enabled(&one_shot(config)?, false, global).await,
        // Config and Completions never reach the device
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}

/// A coordinator without a poll timer, for commands that run one cycle.
fn one_shot(config: CoordinatorConfig) -> Result<Coordinator, CliError> {
    Ok(Coordinator::new(config.with_poll_interval(Duration::ZERO))?)
}
