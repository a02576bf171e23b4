use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use hush_cli::{ConsoleReporter, Filter, RunnerConfig};
use hush_engine::{registry, DispatchPool, TransportConfig};

#[derive(Parser)]
#[command(name = "hush-vts", version, about = "Noise suppression parameter conformance tests")]
struct Cli {
    /// Only run tests matching POS[:POS...][-NEG[:NEG...]]
    #[arg(long, alias = "gtest_filter", value_name = "PATTERNS")]
    filter: Option<String>,
    /// List test names and exit
    #[arg(long, alias = "gtest_list_tests")]
    list: bool,
    /// Worker threads servicing effect calls
    #[arg(long, default_value_t = 1)]
    dispatch_threads: usize,
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,
    /// Frames per input and output buffer
    #[arg(long, default_value_t = 0x100)]
    frame_count: usize,
    /// Stop at the first failing test
    #[arg(long)]
    fail_fast: bool,
    /// Don't publish the built-in software implementations
    #[arg(long)]
    no_builtin: bool,
}

fn main() -> ExitCode {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<bool> {
    let pool = DispatchPool::start(&TransportConfig { max_threads: cli.dispatch_threads })
        .context("starting dispatch pool")?;
    let registry = registry::global();
    if !cli.no_builtin {
        hush_engine::register_default_services(registry, &pool);
    }

    let cfg = RunnerConfig {
        sample_rate: cli.sample_rate,
        input_frames: cli.frame_count,
        output_frames: cli.frame_count,
        filter: cli.filter.as_deref().map(Filter::parse).unwrap_or_default(),
        fail_fast: cli.fail_fast,
    };

    let cases = hush_cli::collect(registry, &cfg.filter);
    if cli.list {
        for case in &cases {
            println!("{}", case.full_name());
        }
        return Ok(true);
    }

    let summary = hush_cli::run(&cases, &cfg, &mut ConsoleReporter);
    Ok(summary.success())
}
