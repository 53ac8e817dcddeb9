//! `heatctl status`: one refresh cycle, every field with its availability.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabled::Tabled;

use heatctl_core::{Coordinator, CoordinatorState, DeviceInfo, FIELDS, Health, SnapshotValue};

use crate::cli::{GlobalOpts, StatusArgs};
use crate::error::CliError;
use crate::output::{self, format_value, paint_availability, paint_health};

// ── Report ───────────────────────────────────────────────────────────

/// Serializable view of one published state. Shared with `watch`.
#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub host: String,
    pub health: Health,
    pub running: bool,
    pub last_success: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub fields: Vec<FieldReport>,
}

#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub key: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    pub available: bool,
    /// `None` whenever the field is unavailable, even if an older value exists.
    pub value: Option<SnapshotValue>,
    pub unit: Option<&'static str>,
    #[serde(skip)]
    display: String,
}

impl StatusReport {
    pub fn new(
        host: &str,
        state: &CoordinatorState,
        identity: Option<&DeviceInfo>,
        all: bool,
    ) -> Self {
        let fields = FIELDS
            .iter()
            .filter(|spec| all || !spec.advanced)
            .map(|spec| {
                let available = state.is_available(spec.key);
                let value = state.value(spec.key).cloned();
                let display = value
                    .as_ref()
                    .map_or_else(String::new, |v| format_value(spec, v));
                FieldReport {
                    key: spec.key,
                    entity_id: identity.map(|info| info.entity_id(spec.key)),
                    available,
                    value,
                    unit: spec.unit,
                    display,
                }
            })
            .collect();

        Self {
            host: host.to_owned(),
            health: state.health,
            running: state.is_device_running(),
            last_success: state.last_success,
            last_error: state.last_error.as_ref().map(ToString::to_string),
            fields,
        }
    }

    /// Value of an available field, formatted for display.
    pub fn display(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key == key && f.available)
            .map(|f| f.display.as_str())
    }
}

// ── Table rows ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    key: &'static str,
    #[tabled(rename = "Value")]
    value: String,
    #[tabled(rename = "Available")]
    available: String,
    #[tabled(rename = "Entity")]
    entity_id: String,
}

fn detail(report: &StatusReport, color: bool) -> String {
    let rows: Vec<FieldRow> = report
        .fields
        .iter()
        .map(|f| FieldRow {
            key: f.key,
            value: f.display.clone(),
            available: paint_availability(f.available, color),
            entity_id: f.entity_id.clone().unwrap_or_default(),
        })
        .collect();

    let mut lines = vec![format!(
        "{}  {}  {}",
        report.host,
        paint_health(report.health, color),
        if report.running { "running" } else { "idle" },
    )];
    if let Some(err) = &report.last_error {
        lines.push(format!("last error: {err}"));
    }
    lines.push(output::render_table(&rows));
    lines.join("\n")
}

fn plain(report: &StatusReport) -> String {
    report
        .fields
        .iter()
        .filter(|f| f.available)
        .map(|f| format!("{}={}", f.key, f.display.replace('\n', " ")))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render(report: &StatusReport, global: &GlobalOpts) -> Result<String, CliError> {
    let color = output::should_color(global.color);
    output::render_single(global.output, report, |r| detail(r, color), plain)
}

// ── Handler ──────────────────────────────────────────────────────────

pub async fn handle(
    coordinator: &Coordinator,
    args: &StatusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let started = coordinator.start().await;
    let state = coordinator.state();
    coordinator.shutdown().await;
    started?;

    if let Some(err) = state.last_error {
        return Err(err.into());
    }

    let report = StatusReport::new(
        &coordinator.config().host,
        &state,
        coordinator.identity(),
        args.all,
    );
    output::print_output(&render(&report, global)?, global.quiet);
    Ok(())
}
