use anyhow::{Context, Result};
use std::path::Path;

use crate::audio::analysis::{Analysis, AnalysisParams};
use crate::audio::buffer::{FileInfo, SampleBuffer};
use crate::audio::decode::decode_audio;
use crate::audio::features::OverviewSegment;

/// Keeps the results of the most recent load around for querying.
///
/// Every load replaces the previous results as a whole. A failed load leaves
/// the engine empty rather than holding on to data from an earlier file.
#[derive(Debug, Default)]
pub struct Engine {
    params: AnalysisParams,
    info: Option<FileInfo>,
    analysis: Analysis,
}

impl Engine {
    pub fn new(params: AnalysisParams) -> Self {
        Self {
            params,
            ..Default::default()
        }
    }

    pub fn params(&self) -> &AnalysisParams {
        &self.params
    }

    pub fn load_file(&mut self, path: &Path) -> Result<()> {
        self.clear();
        if !path.is_file() {
            anyhow::bail!("Audio file does not exist: {}", path.display());
        }
        let buffer = decode_audio(path)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        self.load_buffer(&buffer);
        Ok(())
    }

    pub fn load_buffer(&mut self, buffer: &SampleBuffer) {
        let info = buffer.info();
        log::info!(
            "Loaded buffer: {}Hz, {} channels, {:.2}s",
            info.sample_rate,
            info.num_channels,
            info.duration_seconds
        );
        self.analysis = buffer.analyze(&self.params);
        self.info = Some(info);
    }

    pub fn clear(&mut self) {
        self.info = None;
        self.analysis = Analysis::default();
    }

    pub fn file_info(&self) -> Option<&FileInfo> {
        self.info.as_ref()
    }

    pub fn analysis(&self) -> &Analysis {
        &self.analysis
    }

    pub fn overview(&self) -> &[OverviewSegment] {
        self.analysis.overview()
    }

    pub fn bpm(&self) -> f64 {
        self.analysis.bpm()
    }

    pub fn beat_positions(&self) -> &[f64] {
        self.analysis.onsets()
    }

    /// Copy as many overview segments as fit into `out`; returns the count.
    pub fn copy_overview(&self, out: &mut [OverviewSegment]) -> usize {
        copy_prefix(self.overview(), out)
    }

    /// Copy as many onset times as fit into `out`; returns the count.
    pub fn copy_beat_positions(&self, out: &mut [f64]) -> usize {
        copy_prefix(self.beat_positions(), out)
    }
}

fn copy_prefix<T: Copy>(src: &[T], out: &mut [T]) -> usize {
    let n = src.len().min(out.len());
    out[..n].copy_from_slice(&src[..n]);
    n
}
