use serde::Serialize;

use super::features::OverviewSegment;

/// Candidate must exceed the local average by this factor
const ONSET_RATIO: f32 = 1.5;
/// Absolute peak-to-peak floor; quieter segments never count as onsets
const ONSET_FLOOR: f32 = 0.05;
/// Minimum gap between accepted onsets, seconds
const MIN_ONSET_GAP: f64 = 0.2;
/// Median IOIs at or below this are treated as noise, seconds
const MIN_MEDIAN_IOI: f64 = 0.01;
const MIN_BPM: f64 = 70.0;
const MAX_BPM: f64 = 180.0;
const BPM_FLOOR: f64 = 0.1;

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TempoEstimate {
    /// 0.0 when no tempo could be derived
    pub bpm: f64,
    /// Onset times in seconds, strictly increasing
    pub onsets: Vec<f64>,
}

/// Detect onsets in the overview envelope and estimate a tempo from them.
///
/// `resolution` is the overview resolution the segments were built with and
/// `history` the length of the trailing averaging window, in segments.
pub fn estimate_tempo(
    segments: &[OverviewSegment],
    duration: f64,
    resolution: usize,
    history: usize,
) -> TempoEstimate {
    let onsets = detect_onsets(segments, duration, resolution, history);
    if onsets.len() < 2 {
        log::debug!("Only {} onsets, no tempo estimate", onsets.len());
        return TempoEstimate { bpm: 0.0, onsets };
    }

    let mut intervals: Vec<f64> = onsets.windows(2).map(|w| w[1] - w[0]).collect();
    intervals.sort_by(f64::total_cmp);
    let median = intervals[intervals.len() / 2];

    TempoEstimate {
        bpm: fold_bpm(median),
        onsets,
    }
}

fn detect_onsets(
    segments: &[OverviewSegment],
    duration: f64,
    resolution: usize,
    history: usize,
) -> Vec<f64> {
    let history = history.max(1);
    let resolution = resolution.max(1) as f64;
    let energies: Vec<f32> = segments.iter().map(OverviewSegment::peak_to_peak).collect();

    let mut onsets: Vec<f64> = Vec::new();
    let mut window_sum = 0.0f32;

    for (i, &energy) in energies.iter().enumerate() {
        // trailing window: segments i+1-m ..= i
        window_sum += energy;
        if i >= history {
            window_sum -= energies[i - history];
        }
        let local_average = window_sum / (i + 1).min(history) as f32;

        if energy > local_average * ONSET_RATIO && energy > ONSET_FLOOR {
            let timestamp = (i as f64 / resolution) * duration;
            let far_enough = onsets
                .last()
                .map_or(true, |&last| timestamp - last > MIN_ONSET_GAP);
            if far_enough {
                onsets.push(timestamp);
            }
        }
    }

    onsets
}

/// Convert a median inter-onset interval into BPM folded into 70-180.
fn fold_bpm(median_ioi: f64) -> f64 {
    if !(median_ioi > MIN_MEDIAN_IOI) {
        return 0.0;
    }
    let mut bpm = 60.0 / median_ioi;
    while bpm < MIN_BPM && bpm > BPM_FLOOR {
        bpm *= 2.0;
    }
    while bpm > MAX_BPM {
        bpm /= 2.0;
    }
    bpm
}
