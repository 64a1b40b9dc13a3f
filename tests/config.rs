// ABOUTME: Integration tests for settings parsing and target discovery.
// ABOUTME: Tests YAML parsing with humantime durations, file discovery, and CF_HOME handling.

use std::fs;
use std::time::Duration;

use v3push::config::*;
use v3push::error::Error;
use v3push::types::SpaceId;

mod settings {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let settings = PushSettings::from_yaml("").unwrap();
        assert_eq!(settings, PushSettings::default());
        assert_eq!(settings.package.interval, Duration::from_secs(2));
        assert_eq!(settings.package.timeout, Duration::from_secs(300));
        assert_eq!(settings.build.interval, Duration::from_secs(10));
        assert_eq!(settings.build.timeout, Duration::from_secs(600));
        assert!(settings.stream_logs);
    }

    #[test]
    fn parse_full_settings() {
        let yaml = r#"
package:
  interval: 500ms
  timeout: 2m
build:
  interval: 5s
  timeout: 15m
stream_logs: false
"#;
        let settings = PushSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.package.interval, Duration::from_millis(500));
        assert_eq!(settings.package.timeout, Duration::from_secs(120));
        assert_eq!(settings.build.interval, Duration::from_secs(5));
        assert_eq!(settings.build.timeout, Duration::from_secs(900));
        assert!(!settings.stream_logs);
    }

    #[test]
    fn partial_section_keeps_its_own_defaults() {
        let yaml = r#"
build:
  timeout: 20m
"#;
        let settings = PushSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.build.timeout, Duration::from_secs(1200));
        assert_eq!(settings.build.interval, Duration::from_secs(10));
        assert_eq!(settings.package, PollSettings::package());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PushSettings::from_yaml("stream_log: false\n").is_err());
        assert!(PushSettings::from_yaml("build:\n  retries: 3\n").is_err());
    }

    #[test]
    fn invalid_duration_is_rejected() {
        assert!(PushSettings::from_yaml("package:\n  timeout: soon\n").is_err());
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(PushSettings::from_yaml("package:\n  interval: 0s\n").is_err());
    }

    #[test]
    fn oversized_timeout_is_rejected() {
        assert!(PushSettings::from_yaml("build:\n  timeout: 100000000years\n").is_err());
        assert!(PushSettings::from_yaml("build:\n  timeout: 25h\n").is_err());

        let settings = PushSettings::from_yaml("build:\n  timeout: 24h\n").unwrap();
        assert_eq!(settings.build.timeout, MAX_POLL_TIMEOUT);
    }
}

mod discovery {
    use super::*;

    #[test]
    fn discovers_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "stream_logs: false\n").unwrap();

        let settings = PushSettings::discover(dir.path()).unwrap();
        assert!(!settings.stream_logs);
    }

    #[test]
    fn discovers_file_in_dot_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join(".v3push")).unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_DIR), "build:\n  interval: 1s\n").unwrap();

        let settings = PushSettings::discover(dir.path()).unwrap();
        assert_eq!(settings.build.interval, Duration::from_secs(1));
    }

    #[test]
    fn missing_file_is_reported_or_defaulted() {
        let dir = tempfile::tempdir().unwrap();

        assert!(matches!(
            PushSettings::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
        assert_eq!(
            PushSettings::discover_or_default(dir.path()).unwrap(),
            PushSettings::default()
        );
    }

    #[test]
    fn invalid_file_is_not_silently_defaulted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME_ALT), "package: 5\n").unwrap();

        assert!(PushSettings::discover_or_default(dir.path()).is_err());
    }
}

mod target {
    use super::*;

    const CF_CONFIG: &str = r#"{
        "ConfigVersion": 3,
        "Target": "https://api.sys.example.com",
        "AccessToken": "bearer token-1",
        "SpaceFields": {"GUID": "space-1", "Name": "dev"}
    }"#;

    fn cf_home_with(config: Option<&str>) -> tempfile::TempDir {
        let home = tempfile::tempdir().unwrap();
        if let Some(config) = config {
            fs::create_dir(home.path().join(".cf")).unwrap();
            fs::write(home.path().join(".cf/config.json"), config).unwrap();
        }
        home
    }

    #[test]
    fn cf_home_locates_config() {
        let home = cf_home_with(Some(CF_CONFIG));

        let target = temp_env::with_var(CF_HOME_VAR, Some(home.path()), || {
            Target::discover(None)
        })
        .unwrap();

        assert_eq!(target.api, "https://api.sys.example.com");
        assert_eq!(target.token, "bearer token-1");
        assert_eq!(target.space, SpaceId::new("space-1"));
    }

    #[test]
    fn config_path_follows_cf_home() {
        let home = cf_home_with(None);

        let path = temp_env::with_var(CF_HOME_VAR, Some(home.path()), cf_config_path);

        assert_eq!(path, Some(home.path().join(".cf").join("config.json")));
    }

    #[test]
    fn missing_config_is_not_logged_in() {
        let home = cf_home_with(None);

        let result = temp_env::with_var(CF_HOME_VAR, Some(home.path()), || {
            Target::discover(None)
        });

        assert!(matches!(result, Err(Error::NotLoggedIn(_))));
    }

    #[test]
    fn space_override_replaces_missing_space() {
        let home = cf_home_with(Some(
            r#"{"Target": "https://api.sys.example.com", "AccessToken": "bearer t", "SpaceFields": {"GUID": ""}}"#,
        ));

        let (without, with) = temp_env::with_var(CF_HOME_VAR, Some(home.path()), || {
            (
                Target::discover(None),
                Target::discover(Some(SpaceId::new("space-9"))),
            )
        });

        assert!(matches!(without, Err(Error::NoTargetSpace)));
        assert_eq!(with.unwrap().space.as_str(), "space-9");
    }

    #[test]
    fn malformed_config_is_a_json_error() {
        let home = cf_home_with(Some("{not json"));

        let result = temp_env::with_var(CF_HOME_VAR, Some(home.path()), || {
            Target::discover(None)
        });

        assert!(matches!(result, Err(Error::Json(_))));
    }
}
