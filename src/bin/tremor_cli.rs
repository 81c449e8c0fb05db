use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tremor_core::{AppConfig, Sample, TremorPipeline, WindowResult};

#[derive(Parser, Debug)]
#[command(
    name = "tremor-cli",
    about = "Offline tremor analysis harness for accelerometer recordings"
)]
struct Cli {
    /// Path to a JSON config file (omitted sections fall back to defaults)
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze a CSV recording (timestamp_us,x,y,z per line) and print the summary
    Analyze {
        #[arg(long)]
        input: PathBuf,
        /// Also stream each classified window as a JSON line
        #[arg(long)]
        windows: bool,
        /// Write the session summary to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Analyze a synthetic sine tremor, for smoke-testing the pipeline
    Synth {
        /// Oscillation frequency in Hz
        #[arg(long, default_value_t = 6.0)]
        frequency: f32,
        /// Peak acceleration in m/s^2
        #[arg(long, default_value_t = 0.5)]
        amplitude: f32,
        /// Recording length in seconds
        #[arg(long, default_value_t = 10.0)]
        seconds: f32,
    },
    /// Print the effective configuration as JSON
    DumpConfig,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt::init();
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:?}");
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path),
        None => AppConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            input,
            windows,
            output,
        } => run_analyze(&config, &input, windows, output),
        Commands::Synth {
            frequency,
            amplitude,
            seconds,
        } => run_synth(&config, frequency, amplitude, seconds),
        Commands::DumpConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn run_analyze(
    config: &AppConfig,
    input: &PathBuf,
    stream_windows: bool,
    output: Option<PathBuf>,
) -> Result<ExitCode> {
    let samples = load_csv(input)?;
    if samples.is_empty() {
        bail!("no samples in {}", input.display());
    }

    let mut pipeline =
        TremorPipeline::new(config).context("building pipeline from configuration")?;
    pipeline.start_session()?;

    for sample in samples {
        let results = pipeline.ingest(sample)?;
        if stream_windows {
            emit_windows(&results)?;
        }
    }

    let summary = pipeline.stop_session()?;
    let json = serde_json::to_string_pretty(&summary)?;
    match output {
        Some(path) => fs::write(&path, json)
            .with_context(|| format!("writing summary to {}", path.display()))?,
        None => println!("{}", json),
    }
    Ok(ExitCode::SUCCESS)
}

fn run_synth(config: &AppConfig, frequency: f32, amplitude: f32, seconds: f32) -> Result<ExitCode> {
    if seconds <= 0.0 {
        bail!("seconds must be positive");
    }

    let sample_rate = config.sampling.sample_rate_hz;
    let interval_us = (1_000_000.0 / sample_rate).round() as u64;
    let count = (seconds * sample_rate) as u64;

    let mut pipeline =
        TremorPipeline::new(config).context("building pipeline from configuration")?;
    pipeline.start_session()?;

    for i in 0..count {
        let ts = i * interval_us;
        let t = ts as f32 / 1_000_000.0;
        let x = amplitude * (2.0 * std::f32::consts::PI * frequency * t).sin();
        let results = pipeline.ingest(Sample::new(ts, x, 0.0, 9.81))?;
        emit_windows(&results)?;
    }

    let summary = pipeline.stop_session()?;
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(ExitCode::SUCCESS)
}

fn emit_windows(results: &[WindowResult]) -> Result<()> {
    for result in results {
        println!("{}", serde_json::to_string(result)?);
    }
    Ok(())
}

/// Parse `timestamp_us,x,y,z` lines; a non-numeric first line is a header
fn load_csv(path: &PathBuf) -> Result<Vec<Sample>> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    let mut samples = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split(',').map(str::trim).collect();
        if fields.len() != 4 {
            bail!("line {}: expected 4 fields, got {}", index + 1, fields.len());
        }
        let timestamp_us: u64 = match fields[0].parse() {
            Ok(ts) => ts,
            Err(_) if index == 0 => continue,
            Err(err) => bail!("line {}: bad timestamp: {}", index + 1, err),
        };
        let parse_axis = |field: &str, name: &str| -> Result<f32> {
            field
                .parse()
                .with_context(|| format!("line {}: bad {} value", index + 1, name))
        };
        samples.push(Sample::new(
            timestamp_us,
            parse_axis(fields[1], "x")?,
            parse_axis(fields[2], "y")?,
            parse_axis(fields[3], "z")?,
        ));
    }
    Ok(samples)
}
