mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use std::io::Write;

use cli::Cli;
use wavescope::config;
use wavescope::{Analysis, AnalysisParams, Engine, FileInfo};

#[derive(Serialize)]
struct Report<'a> {
    info: Option<&'a FileInfo>,
    #[serde(flatten)]
    analysis: &'a Analysis,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let mut cli = Cli::parse();

    // Merge: config values apply only when CLI is at its default
    if let Some(path) = config::find_config(cli.config.as_deref()) {
        if let Some(cfg) = config::load_config(&path) {
            log::info!("Loaded config from {}", path.display());
            if cli.resolution == 1024 { cli.resolution = cfg.analysis.resolution; }
            if cli.fft_size == 1024 { cli.fft_size = cfg.analysis.fft_size; }
            if cli.history == 10 { cli.history = cfg.analysis.history; }
            if !cli.pretty { cli.pretty = cfg.output.pretty; }
        } else {
            log::warn!("Failed to load config from {}", path.display());
        }
    }

    let params = AnalysisParams {
        resolution: cli.resolution,
        fft_size: cli.fft_size,
        history: cli.history,
    };
    params.validate().context("Invalid analysis parameters")?;

    log::info!("wavescope - waveform overview & tempo");
    log::info!("Input: {}", cli.input.display());

    let mut engine = Engine::new(params);
    engine.load_file(&cli.input)?;

    if let Some(info) = engine.file_info() {
        log::info!(
            "{}Hz, {} samples, {} channels, {:.2}s",
            info.sample_rate,
            info.total_samples,
            info.num_channels,
            info.duration_seconds
        );
    }
    log::info!(
        "Overview: {} segments, onsets: {}, BPM: {:.1}",
        engine.overview().len(),
        engine.beat_positions().len(),
        engine.bpm()
    );

    if cli.onsets {
        for t in engine.beat_positions() {
            println!("{:.3}", t);
        }
    }

    if let Some(ref path) = cli.json {
        let report = Report {
            info: engine.file_info(),
            analysis: engine.analysis(),
        };
        let json = if cli.pretty {
            serde_json::to_string_pretty(&report)?
        } else {
            serde_json::to_string(&report)?
        };
        if path.as_os_str() == "-" {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
        } else {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Wrote {}", path.display());
        }
    }

    Ok(())
}
