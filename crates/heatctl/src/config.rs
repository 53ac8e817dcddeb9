//! Config resolution for device commands: profile from the TOML file,
//! overridden by `--host` and `--timeout`.

use std::path::PathBuf;
use std::time::Duration;

use heatctl_config::{Config, ConfigError, Profile, profile_to_coordinator_config};
use heatctl_core::CoordinatorConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// The config file in effect: `--config` / `HEATCTL_CONFIG`, else the
/// platform default.
pub fn config_path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(heatctl_config::config_path)
}

pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(heatctl_config::load_config_from(&config_path(global))?)
}

/// Build a `CoordinatorConfig` from the config file, profile, and CLI overrides.
pub fn coordinator_config(global: &GlobalOpts) -> Result<CoordinatorConfig, CliError> {
    let cfg = load(global)?;
    let selected = cfg.profile(global.profile.as_deref());

    let profile = match (selected, &global.host) {
        (Ok((_, profile)), Some(host)) => Profile {
            host: host.clone(),
            ..profile.clone()
        },
        (Ok((_, profile)), None) => profile.clone(),
        // No profile: --host alone is enough, with the file's defaults.
        (Err(_), Some(host)) => Profile::new(host.as_str()),
        (Err(ConfigError::ProfileNotFound { name }), None) if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name,
                available: available_profiles(&cfg),
            });
        }
        (Err(_), None) => {
            return Err(CliError::NoConfig {
                path: config_path(global).display().to_string(),
            });
        }
    };

    let mut config = profile_to_coordinator_config(&profile, &cfg.defaults)?;
    if let Some(seconds) = global.timeout {
        if seconds == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        config = config.with_timeout(Duration::from_secs(seconds));
    }
    Ok(config)
}

pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        "(none)".into()
    } else {
        cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global_for(args: &[&str], config: &std::path::Path) -> GlobalOpts {
        let mut argv = vec!["heatctl", "--config", config.to_str().unwrap()];
        argv.extend_from_slice(args);
        argv.push("info");
        Cli::try_parse_from(argv).unwrap().global
    }

    fn write_config(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[profiles.default]\nhost = \"heater.local\"\npoll_interval = 5\n\n\
             [profiles.garage]\nhost = \"10.0.0.7\"\n",
        )
        .unwrap();
        path
    }

    #[test]
    fn host_flag_overrides_profile_host_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir);

        let config = coordinator_config(&global_for(&["--host", "10.0.0.9"], &path)).unwrap();
        assert_eq!(config.host, "10.0.0.9");
        assert_eq!(config.poll_interval, Duration::from_secs(5));
    }

    #[test]
    fn host_flag_works_without_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config =
            coordinator_config(&global_for(&["--host", "heater.lan", "--timeout", "3"], &path))
                .unwrap();
        assert_eq!(config.host, "heater.lan");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn missing_profile_lists_available_ones() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir);

        let err = coordinator_config(&global_for(&["-p", "attic"], &path)).unwrap_err();
        match err {
            CliError::ProfileNotFound { name, available } => {
                assert_eq!(name, "attic");
                assert_eq!(available, "default, garage");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn nothing_configured_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = coordinator_config(&global_for(&[], &path)).unwrap_err();
        assert!(matches!(err, CliError::NoConfig { .. }));
    }

    #[test]
    fn zero_timeout_flag_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(&dir);

        let err = coordinator_config(&global_for(&["--timeout", "0"], &path)).unwrap_err();
        assert!(matches!(err, CliError::Validation { .. }));
    }
}
