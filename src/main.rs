use anyhow::Context;
use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use unitcheck::{in_test_body, run_with_options, OutputFormat, RunnerOptions};

mod demo;

use demo::DemoSuite;

#[derive(Parser)]
#[command(name = "unitcheck")]
#[command(about = "Runs the bundled unitcheck demonstration suites")]
#[command(version)]
struct Cli {
    /// Demonstration suite to run
    #[arg(value_enum, default_value = "fizzbuzz")]
    suite: DemoSuite,

    /// Output format
    #[arg(long = "output-format", value_enum, default_value = "text")]
    output_format: OutputFormat,

    /// Write the structured report to a file instead of standard output
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Do not echo results while collecting a structured report
    #[arg(long)]
    no_console: bool,

    /// Disable colored status output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose logging
    #[arg(long, short)]
    verbose: bool,
}

/// Logs go to stderr so they never interleave with report output.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

/// Panics inside test bodies are classified by the runner and only logged.
/// Anything else, such as a panicking setup hook, is fatal and keeps the
/// default report.
fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if in_test_body() {
            tracing::debug!("Caught panic in test body: {}", info);
        } else {
            tracing::error!("Panic outside a test body: {}", info);
            default_hook(info);
        }
    }));
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    install_panic_hook();

    let options = RunnerOptions {
        output_format: cli.output_format,
        output: cli.output,
        console: !cli.no_console,
        color: !cli.no_color && std::io::stdout().is_terminal(),
    };

    let suite = cli.suite;
    let result = run_with_options(&options, |reporter| suite.run(reporter))
        .with_context(|| format!("Failed to run the {:?} suite", suite))?;

    std::process::exit(result.exit_code());
}
