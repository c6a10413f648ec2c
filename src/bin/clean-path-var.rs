use toolbox::cli::build_clean_path_cli;
use toolbox::internal::config::{CallSiteMode, LoggerConfig, LoggingConfig};
use toolbox::internal::logger::{level, Logging};
use toolbox::internal::pathvar::{condense_env, normalize_name};
use toolbox::{log_error, log_info, log_warn};

const EXIT_FAILURE: i32 = 255;

fn main() -> anyhow::Result<()> {
    let matches = build_clean_path_cli().get_matches();
    let env_var = matches
        .get_one::<String>("env-var")
        .map(|s| s.as_str())
        .unwrap_or(toolbox::internal::pathvar::DEFAULT_ENV_VAR);
    let verbose = matches.get_flag("verbose");
    let force_lowercase = matches.get_flag("force-lowercase");

    // stdout carries only the condensed value; everything else goes to stderr
    let settings = LoggingConfig {
        call_sites: CallSiteMode::TrackCaller,
        ..Default::default()
    }
    .settings();
    let logging = Logging::new(settings);
    let threshold = if verbose { level::INFO } else { level::WARNING };
    let logger = LoggerConfig::new("clean-path-var")
        .with_level(&threshold)
        .with_format("%(msg)s");
    let log = logging.setup(&logger, true)?.unwrap_or_else(|| logging.root());

    if force_lowercase {
        log_warn!(
            log,
            "Warning: you forced to keep this variable name lowercase: {}",
            env_var
        );
    }
    let name = normalize_name(env_var, force_lowercase);

    log_info!(log, "Condensing {}...", name);
    let condensed = match condense_env(&name) {
        Ok(condensed) => condensed,
        Err(e) => {
            log_error!(log, "{}", e);
            std::process::exit(EXIT_FAILURE);
        }
    };

    if verbose {
        log_info!(log, "\nOriginal {}:", name);
        for entry in &condensed.original {
            log_info!(log, "\t{}", entry);
        }
        log_info!(log, "\nCondensed {}:", name);
        for entry in &condensed.condensed {
            log_info!(log, "\t{}", entry);
        }
    }

    println!("{}", condensed.joined());
    Ok(())
}
