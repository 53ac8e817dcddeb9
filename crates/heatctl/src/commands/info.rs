//! `heatctl info`: the device identity.

use serde::Serialize;

use heatctl_core::{Coordinator, CoreError, DeviceInfo};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct InfoReport<'a> {
    host: &'a str,
    name: String,
    manufacturer: &'static str,
    #[serde(flatten)]
    device: &'a DeviceInfo,
}

fn detail(report: &InfoReport<'_>) -> String {
    [
        format!("Name:          {}", report.name),
        format!("Manufacturer:  {}", report.manufacturer),
        format!("Model:         {}", report.device.model),
        format!("Product ID:    {}", report.device.product_id),
        format!("Firmware:      {}", report.device.firmware),
        format!("Paired:        {}", if report.device.paired { "yes" } else { "no" }),
        format!("Host:          {}", report.host),
    ]
    .join("\n")
}

pub async fn handle(coordinator: &Coordinator, global: &GlobalOpts) -> Result<(), CliError> {
    let started = coordinator.start().await;
    coordinator.shutdown().await;
    started?;

    let device = coordinator.identity().ok_or_else(|| CoreError::Generic {
        message: "device identity unavailable".into(),
    })?;
    let report = InfoReport {
        host: &coordinator.config().host,
        name: device.display_name(),
        manufacturer: device.manufacturer(),
        device,
    };

    let out = output::render_single(global.output, &report, detail, |r| {
        r.device.product_id.clone()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
