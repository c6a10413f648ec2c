use std::collections::BTreeMap;
use std::io::IsTerminal;

use toolbox::cli::{build_cli, parse_config};
use toolbox::internal::bench::compare_performance;
use toolbox::internal::config::{get_version_info, AppConfig};
use toolbox::internal::instrument::{InstrumentedMethodFailure, Instrumentation, LogOwner};
use toolbox::internal::logger::{capture_tracing, Colors, Logger, Logging};
use toolbox::internal::lookup::{get_key, get_keys};
use toolbox::level;
use toolbox::{log_debug, log_flag, log_info, log_success};

/// Exercises every logging path of the crate the way an application would.
struct Harness {
    logger: Option<Logger>,
    instrumentation: Instrumentation,
}

impl LogOwner for Harness {
    fn logger(&self) -> Option<&Logger> {
        self.logger.as_ref()
    }
}

impl Harness {
    fn log_every_level(&self, logging: &Logging) {
        for severity in logging.registry().levels() {
            logging.log_message(
                &format!("log_message {}", severity.name().to_lowercase()),
                severity,
                None,
            );
        }
        for severity in logging.registry().levels() {
            self.print_status(
                logging,
                &format!("print_status {}", severity.name().to_lowercase()),
                severity,
            );
        }
    }

    fn lookups(&self, logging: &Logging) {
        let map: BTreeMap<&str, &str> = [
            ("key1", "value1"),
            ("key2", "value5"),
            ("key3", "value5"),
            ("key4", "value4"),
        ]
        .into_iter()
        .collect();

        match get_keys(&"value5", &map) {
            Ok(keys) => {
                self.print_status(logging, &format!("keys of value5: {:?}", keys), &level::INFO)
            }
            Err(e) => self.print_status(logging, &e.to_string(), &level::FAILURE),
        }
        let missing = get_key(&"value6", &map);
        self.print_status(logging, &format!("key of value6: {:?}", missing), &level::INFO);
    }

    fn throw_exception(&self, code: i32) -> Result<Option<i32>, InstrumentedMethodFailure> {
        self.instrumentation.call(self, "throw_exception", || {
            if code < 0 {
                Err(format!("refusing negative code {}", code))
            } else {
                Ok(code)
            }
        })
    }
}

fn run_demo(logging: &Logging, root: &Logger, config: &AppConfig) -> anyhow::Result<()> {
    log_debug!(root, "{}", get_version_info().replace('\n', "; "));

    let harness = Harness {
        logger: None,
        instrumentation: Instrumentation::from_logging(logging, config.logging.failure_policy),
    };

    harness.log_every_level(logging);
    harness.lookups(logging);
    harness.iterdict(logging, &serde_json::to_value(config)?);

    match harness.throw_exception(7)? {
        Some(code) => log_success!(root, "throw_exception(7) returned {}", code),
        None => log_info!(root, "throw_exception(7) returned nothing"),
    }
    if harness.throw_exception(-1)?.is_none() {
        log_info!(root, "throw_exception(-1) was suppressed");
    }

    if let Err(e) = capture_tracing(root.clone()) {
        log_info!(root, "tracing already has a subscriber: {}", e);
    }
    tracing::warn!(source = "tracing", "events from tracing land in the same sinks");

    log_flag!(root, "demo finished");
    Ok(())
}

fn run_bench(root: &Logger, iterations: u64) -> anyhow::Result<()> {
    fn add(args: &(i64, i64)) -> i64 {
        args.0 + args.1
    }
    fn multiply(args: &(i64, i64)) -> i64 {
        args.0 * args.1
    }
    fn subtract(args: &(i64, i64)) -> i64 {
        args.0 - args.1
    }

    let functions: [(&str, &dyn Fn(&(i64, i64)) -> i64); 3] =
        [("add", &add), ("multiply", &multiply), ("subtract", &subtract)];
    let ranking = compare_performance(&functions, &(2, 3), iterations)?;
    if let Some(fastest) = ranking.fastest() {
        log_info!(root, "{} was fastest", fastest.name);
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    // Parse command line arguments first
    let matches = build_cli().get_matches();
    let config = match parse_config(&matches) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    // Initialize logging
    let logging = Logging::new(config.logging.settings());
    let root = match logging.setup(&config.logging.logger_config(), true) {
        Ok(Some(root)) => root,
        Ok(None) => logging.root(),
        Err(e) => {
            eprintln!("Failed to initialize logger: {}", e);
            std::process::exit(1);
        }
    };

    match matches.subcommand() {
        Some(("colors", _)) => {
            let enabled = config.logging.color && std::io::stdout().is_terminal();
            for line in Colors::palette_lines(enabled) {
                println!("{}", line);
            }
            Ok(())
        }
        Some(("bench", sub)) => {
            let iterations = sub.get_one::<u64>("iterations").copied().unwrap_or_default();
            run_bench(&root, iterations)
        }
        _ => run_demo(&logging, &root, &config),
    }
}
