//! Config subcommand handlers.

use serde::Serialize;
use tabled::Tabled;

use heatctl_config::{Config, Profile, save_config_to};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

/// Handle a config subcommand.
pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = config::config_path(global);

    match args.command {
        // ── Init ────────────────────────────────────────────────────
        ConfigCommand::Init {
            host,
            name,
            poll_interval,
            timeout,
            force,
        } => {
            let host = host.trim();
            if host.is_empty() {
                return Err(CliError::Validation {
                    field: "host".into(),
                    reason: "must not be empty".into(),
                });
            }

            let mut cfg = config::load(global)?;
            if cfg.profiles.contains_key(&name) && !force {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: format!(
                        "profile '{name}' already exists (use --force to replace it)"
                    ),
                });
            }

            // The first profile becomes the default.
            if cfg.profiles.is_empty() {
                cfg.default_profile = Some(name.clone());
            }
            cfg.profiles.insert(
                name.clone(),
                Profile {
                    poll_interval,
                    timeout,
                    ..Profile::new(host)
                },
            );

            save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("✓ Saved profile '{name}' to {}", path.display());
            }
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let toml = toml::to_string_pretty(&cfg)?;
            let out = output::render_single(
                global.output,
                &cfg,
                |_| toml.trim_end().to_owned(),
                |_| path.display().to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            output::print_output(&path.display().to_string(), false);
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load(global)?;
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: heatctl config init --host <HOST>");
                return Ok(());
            }
            let entries = profile_entries(&cfg);
            let out = output::render_list(
                global.output,
                &entries,
                |e| ProfileRow {
                    name: if e.default {
                        format!("{} *", e.name)
                    } else {
                        e.name.clone()
                    },
                    host: e.host.clone(),
                },
                |e| e.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load(global)?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: config::available_profiles(&cfg),
                    name,
                });
            }

            cfg.default_profile = Some(name.clone());
            save_config_to(&cfg, &path)?;
            if !global.quiet {
                eprintln!("✓ Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}

#[derive(Debug, Serialize)]
struct ProfileEntry {
    name: String,
    host: String,
    default: bool,
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "Host")]
    host: String,
}

fn profile_entries(cfg: &Config) -> Vec<ProfileEntry> {
    let default = cfg.default_profile.as_deref().unwrap_or("default");
    cfg.profiles
        .iter()
        .map(|(name, profile)| ProfileEntry {
            name: name.clone(),
            host: profile.host.clone(),
            default: name == default,
        })
        .collect()
}
