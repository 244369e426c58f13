use anyhow::Context;
use clap::{Parser, Subcommand};
use cursometer::commands::replay::{load_trace, replay_trace, write_reports};
use cursometer::TrackerOptions;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, arg_required_else_help = true)]
struct Cli {
    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand, Debug)]
enum CliCommand {
    /// Replay a recorded pointer trace and report the polled speeds
    Replay {
        /// Path to the trace JSON file
        trace: PathBuf,
        #[arg(long, help = "Override the speed poll interval (ms)")]
        poll_interval_ms: Option<u64>,
        #[arg(long, help = "Override the sampler re-arm interval (ms)")]
        sample_interval_ms: Option<u64>,
        #[arg(long, short = 'o', help = "Write speed reports as JSON")]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    cursometer::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        CliCommand::Replay {
            trace,
            poll_interval_ms,
            sample_interval_ms,
            output,
        } => {
            let pointer_trace = load_trace(&trace)
                .with_context(|| format!("Failed to load trace {}", trace.display()))?;

            let overrides = TrackerOptions {
                poll_interval_ms,
                sample_interval_ms,
                on_speed_update: None,
            };
            let reports = replay_trace(&pointer_trace, &overrides)?;

            let peak = reports.iter().map(|r| r.speed).fold(0.0, f64::max);
            let moving: Vec<f64> = reports.iter().map(|r| r.speed).filter(|s| *s > 0.0).collect();
            let mean = if moving.is_empty() {
                0.0
            } else {
                moving.iter().sum::<f64>() / moving.len() as f64
            };

            println!(
                "{} reports, peak {:.3} px/ms, mean while moving {:.3} px/ms",
                reports.len(),
                peak,
                mean
            );

            if let Some(output) = output {
                write_reports(&output, &reports)
                    .with_context(|| format!("Failed to write {}", output.display()))?;
                tracing::info!("Wrote {} speed reports to {}", reports.len(), output.display());
            }
        }
    }

    Ok(())
}
