#![allow(clippy::unwrap_used)]
// Loading and saving config files, with environment overrides.

use std::time::Duration;

use figment::Jail;

use heatctl_config::{
    Config, Profile, load_config_from, profile_to_coordinator_config, save_config_to,
};

#[test]
fn test_missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = load_config_from(&dir.path().join("absent.toml")).unwrap();

    assert_eq!(config, Config::default());
    assert_eq!(config.defaults.poll_interval, 30);
    assert_eq!(config.defaults.timeout, 10);
}

#[test]
fn test_save_then_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    let mut config = Config::default();
    config.profiles.insert(
        "default".into(),
        Profile {
            poll_interval: Some(15),
            ..Profile::new("192.168.1.40")
        },
    );
    save_config_to(&config, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    assert_eq!(loaded, config);

    let (name, profile) = loaded.profile(None).unwrap();
    assert_eq!(name, "default");
    let coordinator = profile_to_coordinator_config(profile, &loaded.defaults).unwrap();
    assert_eq!(coordinator.poll_interval, Duration::from_secs(15));
}

#[test]
fn test_file_and_env_layers() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
                default_profile = "attic"

                [defaults]
                timeout = 4

                [profiles.attic]
                host = "heater.local"
                poll_interval = 60
            "#,
        )?;
        jail.set_env("HEATCTL_DEFAULTS__TIMEOUT", "7");
        jail.set_env("HEATCTL_PROFILES__ATTIC__HOST", "10.0.0.9");

        let path = jail.directory().join("config.toml");
        let config = load_config_from(&path).unwrap();

        assert_eq!(config.default_profile.as_deref(), Some("attic"));
        assert_eq!(config.defaults.timeout, 7);
        assert_eq!(config.defaults.output, "table");

        let (_, profile) = config.profile(None).unwrap();
        assert_eq!(profile.host, "10.0.0.9");
        assert_eq!(profile.poll_interval, Some(60));
        Ok(())
    });
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[profiles.attic]\npoll_interval = \"often\"\n").unwrap();

    assert!(load_config_from(&path).is_err());
}
