use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use xml_bind::cli::{Cli, VerbosityLevel};
use xml_bind::config::ConfigManager;
use xml_bind::error_reporter::ErrorReporter;
use xml_bind::mapping;
use xml_bind::output::Output;
use xml_bind::Parser;

const EXIT_BIND_FAILURE: u8 = 1;
const EXIT_SETUP_FAILURE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    let reporter = ErrorReporter::new(cli.verbosity());

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        return ExitCode::from(EXIT_SETUP_FAILURE);
    }

    let config = match ConfigManager::load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            reporter.report_config_error(&e);
            return ExitCode::from(EXIT_SETUP_FAILURE);
        }
    };

    let verbosity = if config.output.quiet {
        VerbosityLevel::Quiet
    } else if config.output.verbose {
        VerbosityLevel::Verbose
    } else {
        VerbosityLevel::Normal
    };
    let reporter = ErrorReporter::new(verbosity);
    init_tracing(config.output.verbose);

    let registry = match mapping::load_registry(&cli.mapping) {
        Ok(registry) => registry,
        Err(e) => {
            reporter.report_mapping_error(&e);
            return ExitCode::from(EXIT_SETUP_FAILURE);
        }
    };
    debug!(types = registry.len(), "loaded declaration table");

    let xml = match read_input(&cli) {
        Ok(xml) => xml,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::from(EXIT_SETUP_FAILURE);
        }
    };

    let parser = Parser::with_options(registry, config.binding.clone());
    let output = Output::new(config.output.format, verbosity);

    let started = Instant::now();
    let bound = match parser.parse(&xml, cli.type_name.as_deref()) {
        Ok(bound) => bound,
        Err(e) => {
            reporter.report_bind_error(&e);
            return ExitCode::from(EXIT_BIND_FAILURE);
        }
    };

    match output.format_instance(&bound.result) {
        Ok(formatted) => println!("{}", formatted.trim_end()),
        Err(e) => {
            eprintln!("Error: failed to format result: {}", e);
            return ExitCode::from(EXIT_SETUP_FAILURE);
        }
    }

    if let Some(summary) = output.format_summary(&bound.result, started.elapsed()) {
        eprintln!("{}", summary);
    }

    ExitCode::SUCCESS
}

fn read_input(cli: &Cli) -> anyhow::Result<String> {
    std::fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
