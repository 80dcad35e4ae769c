//! Regulated loop demo.
//!
//! Run with: `cargo run -p loop-rate-limiters --features demo --bin demo -- --frequency 200`
//!
//! Log verbosity follows `RUST_LOG` (default `info`); `RUST_LOG=trace` shows
//! every tick.

use anyhow::{ensure, Context, Result};
use clap::Parser;
use loop_rate_limiters::{LimiterConfig, RateLimiter};
use rand::Rng;
use std::thread;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(about = "Run a loop at a fixed frequency and report its timing")]
struct Args {
    /// Target loop frequency in hertz.
    #[arg(short, long, default_value_t = 100.0)]
    frequency: f64,

    /// Number of loop iterations.
    #[arg(short = 'n', long, default_value_t = 200)]
    iterations: u32,

    /// Simulated work per iteration, in milliseconds.
    #[arg(long, default_value_t = 2.0)]
    work_ms: f64,

    /// Uniform random jitter added to the work, in milliseconds.
    #[arg(long, default_value_t = 1.0)]
    jitter_ms: f64,

    /// Spin through the last 500 µs of each period.
    #[arg(long)]
    precise: bool,

    /// Do not warn when an iteration overruns its period.
    #[arg(short, long)]
    quiet: bool,

    /// Print the final metrics as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn validate(&self) -> Result<()> {
        ensure!(
            self.work_ms.is_finite() && self.work_ms >= 0.0,
            "--work-ms must be a finite, non-negative number, got {}",
            self.work_ms
        );
        ensure!(
            self.jitter_ms.is_finite() && self.jitter_ms >= 0.0,
            "--jitter-ms must be a finite, non-negative number, got {}",
            self.jitter_ms
        );
        Ok(())
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    args.validate()?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config = if args.precise {
        LimiterConfig::precise(args.frequency)
    } else {
        LimiterConfig::new(args.frequency)
    }
    .with_name("demo_loop")
    .with_warn(!args.quiet)
    .with_metrics(true);

    let mut rate = RateLimiter::from_config(config).context("invalid limiter configuration")?;
    info!(
        frequency_hz = rate.frequency(),
        period_ms = rate.dt() * 1e3,
        iterations = args.iterations,
        "starting regulated loop"
    );

    let mut rng = rand::thread_rng();
    let mut total = Duration::ZERO;
    let mut worst = Duration::ZERO;
    for _ in 0..args.iterations {
        let jitter = if args.jitter_ms > 0.0 {
            rng.gen_range(0.0..args.jitter_ms)
        } else {
            0.0
        };
        let work = Duration::try_from_secs_f64((args.work_ms + jitter).max(0.0) / 1e3)
            .context("work duration out of range")?;
        thread::sleep(work);

        rate.sleep();
        total += rate.measured_period();
        worst = worst.max(rate.measured_period());
    }

    let mean = total / args.iterations.max(1);
    info!(
        mean_ms = mean.as_secs_f64() * 1e3,
        worst_ms = worst.as_secs_f64() * 1e3,
        error_pct = (mean.as_secs_f64() / rate.dt() - 1.0) * 100.0,
        "loop finished"
    );

    if let Some(metrics) = rate.metrics() {
        info!(
            ticks = metrics.ticks,
            overruns = metrics.overruns,
            overrun_ratio = metrics.overrun_ratio(),
            "limiter metrics"
        );
        if args.json {
            println!("{}", serde_json::to_string_pretty(&metrics)?);
        }
    }
    Ok(())
}
