//! `heatctl watch`: keep the coordinator polling and print every published
//! state until Ctrl-C.

use std::time::Duration;

use heatctl_core::{Coordinator, CoordinatorConfig, CoordinatorState};

use crate::cli::{GlobalOpts, OutputFormat, WatchArgs};
use crate::commands::status::{self, StatusReport};
use crate::error::CliError;
use crate::output::{self, paint_health};

const SUMMARY_FIELDS: [(&str, &str); 4] = [
    ("status_temperature", "temp"),
    ("power_consumption", "power"),
    ("hashrate_1m", "hashrate"),
    ("fanspeed", "fan"),
];

pub async fn handle(
    config: CoordinatorConfig,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let config = match args.interval {
        Some(seconds) => config.with_poll_interval(Duration::from_secs(seconds)),
        None => config,
    };
    if config.poll_interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "watch needs a poll interval of at least 1 second".into(),
        });
    }

    let coordinator = Coordinator::new(config)?;
    let result = follow(&coordinator, args, global).await;
    coordinator.shutdown().await;
    result
}

async fn follow(
    coordinator: &Coordinator,
    args: &WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut stream = coordinator.watch();
    coordinator.start().await?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::debug!("interrupted, stopping");
                return Ok(());
            }
            changed = stream.changed() => {
                let Some(state) = changed else {
                    return Ok(());
                };
                let report = StatusReport::new(
                    &coordinator.config().host,
                    state,
                    coordinator.identity(),
                    args.all,
                );
                output::print_output(&render_update(&report, state, global)?, global.quiet);
            }
        }
    }
}

/// One update: a summary line for humans, the full report otherwise.
fn render_update(
    report: &StatusReport,
    state: &CoordinatorState,
    global: &GlobalOpts,
) -> Result<String, CliError> {
    match global.output {
        OutputFormat::Table | OutputFormat::Plain => {
            let color = global.output == OutputFormat::Table && output::should_color(global.color);
            Ok(summary_line(report, state, color))
        }
        _ => status::render(report, global),
    }
}

fn summary_line(report: &StatusReport, state: &CoordinatorState, color: bool) -> String {
    let mut parts = vec![
        chrono::Local::now().format("%H:%M:%S").to_string(),
        paint_health(report.health, color),
        if report.running { "running" } else { "idle" }.to_owned(),
    ];
    for (key, label) in SUMMARY_FIELDS {
        let value = report.display(key).unwrap_or("-");
        parts.push(format!("{label} {value}"));
    }
    if let Some(err) = &state.last_error {
        parts.push(format!("({err})"));
    }
    parts.join("  ")
}
