use anyhow::Context;
use clap::{Arg, ArgAction, Command};
use crate::internal::config::config::AppConfig;
use crate::internal::logger::{FileMode, LevelId};
use crate::internal::pathvar::DEFAULT_ENV_VAR;

pub fn build_cli() -> Command {
    // Leak the version string to get a 'static lifetime
    let version: &'static str = Box::leak(
        crate::internal::config::get_version_info().into_boxed_str()
    );

    Command::new("toolbox")
        .version(version)
        .about("Leveled, colored, call-site aware logging toolbox")
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .help("Path to config file (default: ./toolbox.yaml, /etc/toolbox/config.yaml)")
        )
        .arg(
            Arg::new("level")
                .long("level")
                .short('l')
                .global(true)
                .help("Minimum severity, by name or number (e.g. success, 21)")
        )
        .arg(
            Arg::new("format")
                .long("format")
                .global(true)
                .help("Message template, e.g. \"[%(asctime)s] [%(levelname)-8s] - %(message)s\"")
        )
        .arg(
            Arg::new("date-format")
                .long("date-format")
                .global(true)
                .help("strftime format for %(asctime)s")
        )
        .arg(
            Arg::new("out-file")
                .long("out-file")
                .short('o')
                .global(true)
                .help("Also write records to this file")
        )
        .arg(
            Arg::new("append")
                .long("append")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Append to --out-file instead of truncating it")
        )
        .arg(
            Arg::new("no-color")
                .long("no-color")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Never emit ANSI colors")
        )
        .subcommand(Command::new("demo").about("Log at every level and exercise instrumentation (default)"))
        .subcommand(Command::new("colors").about("Print the ANSI color palette"))
        .subcommand(
            Command::new("bench")
                .about("Compare a few arithmetic functions")
                .arg(
                    Arg::new("iterations")
                        .long("iterations")
                        .short('n')
                        .value_parser(clap::value_parser!(u64))
                        .default_value("100000")
                        .help("Calls per function")
                )
        )
}

pub fn parse_config(matches: &clap::ArgMatches) -> anyhow::Result<AppConfig> {
    let config_path = matches.get_one::<String>("config").map(|s| s.as_str());

    let mut config = AppConfig::load_from(config_path)
        .with_context(|| match config_path {
            Some(path) => format!("failed to load configuration from {}", path),
            None => "failed to load configuration".to_string(),
        })?;

    // Override with CLI values
    if let Some(level) = matches.get_one::<String>("level") {
        config.logging.level = LevelId::from(level.as_str());
    }
    if let Some(format) = matches.get_one::<String>("format") {
        config.logging.format = format.to_string();
    }
    if let Some(date_format) = matches.get_one::<String>("date-format") {
        config.logging.date_format = date_format.to_string();
    }
    if let Some(out_file) = matches.get_one::<String>("out-file") {
        config.logging.out_file = Some(out_file.into());
    }
    if matches.get_flag("append") {
        config.logging.file_mode = FileMode::Append;
    }
    if matches.get_flag("no-color") {
        config.logging.color = false;
    }

    Ok(config)
}

pub fn build_clean_path_cli() -> Command {
    // -V is taken by --verbose
    Command::new("clean-path-var")
        .disable_version_flag(true)
        .about("Condense an environment variable containing a list of paths, removing duplicates while maintaining their order precedence.")
        .arg(
            Arg::new("env-var")
                .long("env-var")
                .short('n')
                .value_name("ENV-VAR")
                .default_value(DEFAULT_ENV_VAR)
                .help("Name of the environment variable to condense")
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('V')
                .action(ArgAction::SetTrue)
                .help("Report the original and condensed entries on stderr")
        )
        .arg(
            Arg::new("force-lowercase")
                .long("force-lowercase")
                .short('F')
                .action(ArgAction::SetTrue)
                .help("Keep a lowercase variable name lowercase")
        )
}
