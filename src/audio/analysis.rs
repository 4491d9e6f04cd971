use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::features::OverviewSegment;
use super::overview::Summarizer;
use super::tempo::{estimate_tempo, TempoEstimate};

pub const DEFAULT_RESOLUTION: usize = 1024;
pub const DEFAULT_FFT_SIZE: usize = 1024;
pub const DEFAULT_HISTORY: usize = 10;

#[derive(Error, Debug, PartialEq)]
pub enum ParamError {
    #[error("overview resolution must be at least 1")]
    ZeroResolution,

    #[error("FFT size must be a power of two >= 2, got {0}")]
    FftSize(usize),

    #[error("onset history must be at least 1 segment")]
    ZeroHistory,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParams {
    /// Number of overview segments
    pub resolution: usize,
    /// Samples per spectral window
    pub fft_size: usize,
    /// Trailing window for the onset average, in segments
    pub history: usize,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            fft_size: DEFAULT_FFT_SIZE,
            history: DEFAULT_HISTORY,
        }
    }
}

impl AnalysisParams {
    pub fn validate(&self) -> Result<(), ParamError> {
        if self.resolution == 0 {
            return Err(ParamError::ZeroResolution);
        }
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(ParamError::FftSize(self.fft_size));
        }
        if self.history == 0 {
            return Err(ParamError::ZeroHistory);
        }
        Ok(())
    }
}

/// Everything derived from one buffer: overview, onsets and tempo.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Analysis {
    overview: Vec<OverviewSegment>,
    onsets: Vec<f64>,
    bpm: f64,
}

impl Analysis {
    pub fn overview(&self) -> &[OverviewSegment] {
        &self.overview
    }

    /// Onset times in seconds
    pub fn onsets(&self) -> &[f64] {
        &self.onsets
    }

    /// 0.0 when no tempo could be estimated
    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    pub fn is_empty(&self) -> bool {
        self.overview.is_empty()
    }
}

/// Summarize `samples` and estimate their tempo.
///
/// Deterministic. An empty stream, a non-positive sample rate or invalid
/// `params` give an empty [`Analysis`].
pub fn analyze(samples: &[f32], sample_rate: f64, params: &AnalysisParams) -> Analysis {
    if samples.is_empty() || !(sample_rate > 0.0) {
        log::info!("No audio data to analyze");
        return Analysis::default();
    }
    if let Err(err) = params.validate() {
        log::warn!("Skipping analysis: {}", err);
        return Analysis::default();
    }
    let duration = samples.len() as f64 / sample_rate;

    log::info!(
        "Pass 1: Overview ({} segments, FFT size {})...",
        params.resolution,
        params.fft_size
    );
    let mut summarizer = Summarizer::new(params.fft_size);
    let overview = summarizer.summarize(samples, sample_rate, params.resolution);

    log::info!("Pass 2: Onsets & tempo...");
    let TempoEstimate { bpm, onsets } =
        estimate_tempo(&overview, duration, params.resolution, params.history);

    log::info!(
        "Analysis: {} segments, {} onsets, tempo={:.1} BPM, duration={:.1}s",
        overview.len(),
        onsets.len(),
        bpm,
        duration
    );

    Analysis {
        overview,
        onsets,
        bpm,
    }
}
