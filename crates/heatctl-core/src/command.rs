// ── Command API ──
//
// Mutations flow through the `Command` enum. Each successful command is
// followed by exactly one forced refresh so readers see its effect.

use heatctl_api::PowerTarget;
use tracing::{Instrument, debug, info, warn};

use crate::coordinator::{Coordinator, CycleMode};
use crate::error::CoreError;

/// All write operations against a heater.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetPowerTarget(PowerTarget),
    SetEnabled(bool),
}

impl Coordinator {
    /// Send `command` to the device, then refresh.
    ///
    /// A failed refresh does not fail the command; it shows up in the
    /// coordinator state instead.
    pub async fn execute(&self, command: Command) -> Result<(), CoreError> {
        async {
            route_command(self, command).await?;
            info!(?command, "command applied");

            if let Err(e) = self.run_cycle(CycleMode::Force).await {
                debug!(error = %e, "refresh after command failed");
            }
            Ok(())
        }
        .instrument(self.span().clone())
        .await
    }

    /// Set the power target level (`0..=4`).
    ///
    /// Out-of-range levels are rejected before any request is made.
    pub async fn set_power_target(&self, level: i64) -> Result<(), CoreError> {
        let target = PowerTarget::new(level)?;
        self.execute(Command::SetPowerTarget(target)).await
    }

    /// Enable or disable the heater, ignoring failures.
    ///
    /// Errors are logged and dropped. Use
    /// [`try_set_enabled`](Self::try_set_enabled) to observe them.
    pub async fn set_enabled(&self, enabled: bool) {
        if let Err(e) = self.try_set_enabled(enabled).await {
            warn!(parent: self.span(), error = %e, enabled, "failed to set enable flag");
        }
    }

    pub async fn try_set_enabled(&self, enabled: bool) -> Result<(), CoreError> {
        self.execute(Command::SetEnabled(enabled)).await
    }
}

async fn route_command(coordinator: &Coordinator, command: Command) -> Result<(), CoreError> {
    let client = coordinator.client();
    match command {
        Command::SetPowerTarget(target) => client.set_power_target(target).await?,
        Command::SetEnabled(enabled) => client.set_enabled(enabled).await?,
    }
    Ok(())
}
