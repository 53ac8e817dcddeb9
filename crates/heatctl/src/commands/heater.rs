//! Device mutations: power target and the enable flag.
//!
//! Each is followed by the coordinator's forced refresh; a failed refresh
//! is reported but does not fail the command.

use heatctl_core::{Coordinator, Health};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub async fn power(
    coordinator: &Coordinator,
    level: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator.set_power_target(level).await?;
    report(coordinator, &format!("Power target set to {level}"), global);
    Ok(())
}

pub async fn set_enabled(
    coordinator: &Coordinator,
    enabled: bool,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    coordinator.try_set_enabled(enabled).await?;
    let message = if enabled { "Heater enabled" } else { "Heater disabled" };
    report(coordinator, message, global);
    Ok(())
}

fn report(coordinator: &Coordinator, message: &str, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    eprintln!("✓ {message}");

    let state = coordinator.state();
    if state.health == Health::Degraded {
        if let Some(err) = state.last_error {
            eprintln!("  refresh after the change failed: {err}");
        }
    }
}
