use toolbox::internal::pathvar::{condense, condense_var, normalize_name, PathVarError};

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    fn any_dir(_: &str) -> bool {
        true
    }

    // ==================== condense() tests ====================

    #[test]
    fn test_duplicates_removed_in_order() {
        let condensed = condense("/a:/b:/a:/c", any_dir);

        assert_eq!(condensed.condensed, vec!["/a", "/b", "/c"]);
        assert_eq!(condensed.original, vec!["/a", "/b", "/a", "/c"]);
        assert_eq!(condensed.joined(), "/a:/b:/c");
    }

    #[test]
    fn test_trims_whitespace_and_outer_separators() {
        let condensed = condense("  ::/a:/b:: \n", any_dir);

        assert_eq!(condensed.joined(), "/a:/b");
    }

    #[test]
    fn test_non_directories_dropped() {
        let condensed = condense("/keep:/gone:/keep2", |entry| entry.starts_with("/keep"));

        assert_eq!(condensed.joined(), "/keep:/keep2");
    }

    #[test]
    fn test_against_real_directories() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let a = a.path().to_str().unwrap().to_string();
        let b = b.path().to_str().unwrap().to_string();
        let missing = format!("{}/does-not-exist", a);
        let value = format!("{a}:{b}:{a}:{missing}:{b}");

        let condensed = condense(&value, |entry| std::path::Path::new(entry).is_dir());
        assert_eq!(condensed.joined(), format!("{a}:{b}"));
    }

    // ==================== condense_var() tests ====================

    #[test]
    fn test_missing_or_empty_variable_is_error() {
        let missing = condense_var("NOPE", |_| None, any_dir);
        assert_eq!(missing, Err(PathVarError::NotFound("NOPE".to_string())));

        let empty = condense_var("EMPTY", |_| Some(String::new()), any_dir);
        assert!(empty.is_err());
        assert_eq!(
            PathVarError::NotFound("EMPTY".to_string()).to_string(),
            "EMPTY was not found!"
        );
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("path", false), "PATH");
        assert_eq!(normalize_name("Ld_Library_Path", true), "ld_library_path");
    }

    // ==================== clean-path-var binary tests ====================

    #[test]
    fn test_binary_prints_condensed_value() {
        let a = tempfile::tempdir().unwrap();
        let b = tempfile::tempdir().unwrap();
        let a = a.path().to_str().unwrap().to_string();
        let b = b.path().to_str().unwrap().to_string();

        let output = Command::new(env!("CARGO_BIN_EXE_clean-path-var"))
            .args(["-n", "toolbox_test_paths"])
            .env("TOOLBOX_TEST_PATHS", format!("{a}:{b}:{a}"))
            .output()
            .unwrap();

        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), format!("{a}:{b}\n"));
    }

    #[test]
    fn test_binary_unset_variable_fails_quietly_on_stdout() {
        let output = Command::new(env!("CARGO_BIN_EXE_clean-path-var"))
            .args(["--env-var", "TOOLBOX_DEFINITELY_UNSET_VAR"])
            .env_remove("TOOLBOX_DEFINITELY_UNSET_VAR")
            .output()
            .unwrap();

        assert!(!output.status.success());
        assert_eq!(output.status.code(), Some(255));
        assert!(output.stdout.is_empty());
        assert!(String::from_utf8_lossy(&output.stderr).contains("was not found!"));
    }

    #[test]
    fn test_binary_verbose_reports_on_stderr() {
        let a = tempfile::tempdir().unwrap();
        let a = a.path().to_str().unwrap().to_string();

        let output = Command::new(env!("CARGO_BIN_EXE_clean-path-var"))
            .args(["-V", "-n", "TOOLBOX_TEST_VERBOSE"])
            .env("TOOLBOX_TEST_VERBOSE", format!("{a}:{a}"))
            .output()
            .unwrap();

        assert!(output.status.success());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Original TOOLBOX_TEST_VERBOSE:"));
        assert!(stderr.contains("Condensed TOOLBOX_TEST_VERBOSE:"));
        assert_eq!(String::from_utf8_lossy(&output.stdout), format!("{a}\n"));
    }

    #[test]
    fn test_binary_force_lowercase_warns() {
        let output = Command::new(env!("CARGO_BIN_EXE_clean-path-var"))
            .args(["-F", "-n", "TOOLBOX_lower_unset"])
            .output()
            .unwrap();

        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("forced to keep this variable name lowercase"));
        assert!(stderr.contains("toolbox_lower_unset was not found!"));
        assert_eq!(output.status.code(), Some(255));
    }
}
