use toolbox::cli::{build_clean_path_cli, build_cli, parse_config};
use toolbox::internal::config::{
    get_version_info, AppConfig, CallSiteMode, LoggerConfig, LoggingConfig, VERSION,
};
use toolbox::internal::instrument::FailurePolicy;
use toolbox::internal::logger::formatter::{DEFAULT_DATE_FORMAT, DEFAULT_MESSAGE_FORMAT};
use toolbox::internal::logger::{CallSiteStrategy, FileMode, LevelId, DEFAULT_SKIP_NAMES};

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper to create a temp file with YAML content
    fn create_temp_yaml(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write temp file");
        file
    }

    // ==================== defaults tests ====================

    #[test]
    fn test_logger_config_defaults() {
        let config = LoggerConfig::default();

        assert_eq!(config.name, "toolbox");
        assert_eq!(config.level, LevelId::Name("DEBUG".to_string()));
        assert_eq!(config.format, DEFAULT_MESSAGE_FORMAT);
        assert_eq!(config.date_format, DEFAULT_DATE_FORMAT);
        assert_eq!(config.out_file, None);
        assert_eq!(config.file_mode, FileMode::Overwrite);
    }

    #[test]
    fn test_logging_config_defaults() {
        let config = LoggingConfig::default();

        assert!(config.enabled);
        assert!(config.color);
        assert_eq!(config.call_sites, CallSiteMode::StackWalk);
        assert_eq!(config.failure_policy, FailurePolicy::Suppress);
        assert_eq!(config.logger_config(), LoggerConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_call_site_strategy_from_config() {
        let mut config = LoggingConfig::default();
        assert_eq!(
            config.call_site_strategy(),
            CallSiteStrategy::StackWalk {
                skip_names: DEFAULT_SKIP_NAMES.iter().map(|s| s.to_string()).collect()
            }
        );

        config.skip_names = Some(vec!["helper".to_string()]);
        assert_eq!(
            config.call_site_strategy(),
            CallSiteStrategy::StackWalk {
                skip_names: vec!["helper".to_string()]
            }
        );

        config.call_sites = CallSiteMode::TrackCaller;
        assert_eq!(config.settings().call_sites, CallSiteStrategy::TrackCaller);
    }

    // ==================== load_from() tests ====================

    #[test]
    fn test_load_from_yaml_file() {
        let file = create_temp_yaml(
            r#"
logging:
  level: success
  color: false
  call_sites: track_caller
  failure_policy: propagate
  out_file: /tmp/toolbox-test.log
  file_mode: append
"#,
        );
        let config = AppConfig::load_from(file.path().to_str()).unwrap();

        assert_eq!(config.logging.level, LevelId::Name("success".to_string()));
        assert!(!config.logging.color);
        assert_eq!(config.logging.call_sites, CallSiteMode::TrackCaller);
        assert_eq!(config.logging.failure_policy, FailurePolicy::Propagate);
        assert_eq!(config.logging.file_mode, FileMode::Append);
        assert_eq!(
            config.logging.out_file.as_deref(),
            Some(std::path::Path::new("/tmp/toolbox-test.log"))
        );
        assert_eq!(config.logging.format, DEFAULT_MESSAGE_FORMAT);
    }

    #[test]
    fn test_load_from_rejects_unknown_level() {
        let file = create_temp_yaml("logging:\n  level: chatty\n");

        assert!(AppConfig::load_from(file.path().to_str()).is_err());
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        assert!(AppConfig::load_from(Some("/nonexistent/toolbox-config.yaml")).is_err());
    }

    // ==================== CLI tests ====================

    #[test]
    fn test_cli_overrides_config() {
        let matches = build_cli()
            .try_get_matches_from([
                "toolbox",
                "--level",
                "21",
                "--format",
                "%(msg)s",
                "--out-file",
                "/tmp/toolbox-cli.log",
                "--append",
                "--no-color",
                "demo",
            ])
            .unwrap();
        let config = parse_config(&matches).unwrap();

        assert_eq!(config.logging.level, LevelId::Value(21));
        assert_eq!(config.logging.format, "%(msg)s");
        assert_eq!(config.logging.file_mode, FileMode::Append);
        assert!(!config.logging.color);
        assert!(config.logging.out_file.is_some());
    }

    #[test]
    fn test_cli_bench_iterations() {
        let matches = build_cli()
            .try_get_matches_from(["toolbox", "bench"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();

        assert_eq!(name, "bench");
        assert_eq!(sub.get_one::<u64>("iterations").copied(), Some(100_000));
    }

    #[test]
    fn test_clean_path_cli_flags() {
        let matches = build_clean_path_cli()
            .try_get_matches_from(["clean-path-var", "-V", "-F"])
            .unwrap();

        assert_eq!(matches.get_one::<String>("env-var").unwrap(), "PATH");
        assert!(matches.get_flag("verbose"));
        assert!(matches.get_flag("force-lowercase"));
    }

    #[test]
    fn test_version_info() {
        let info = get_version_info();

        assert!(info.starts_with(&format!("toolbox version {}", VERSION)));
        assert!(info.contains("Rust:"));
    }
}
