use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use super::features::{BandColor, FrequencyBand, OverviewSegment};

/// Seed for the total-energy denominator so silent windows stay finite
const ENERGY_EPSILON: f32 = 1e-4;
/// Saturation factor: a segment dominated by one band reads as a near-pure color
const COLOR_GAIN: f32 = 3.0;

/// Builds the min/max + band-color overview of a sample stream.
///
/// Holds one planned FFT together with its Hann table and scratch space, so
/// summarizing a file costs one fixed-size transform per segment no matter
/// how long the file is.
pub struct Summarizer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    hann: Vec<f32>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
}

impl Summarizer {
    pub fn new(fft_size: usize) -> Self {
        let mut planner = FftPlanner::<f32>::new();
        let fft = planner.plan_fft_forward(fft_size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];
        Self {
            fft,
            fft_size,
            hann: hann_window(fft_size),
            buffer: vec![Complex::new(0.0, 0.0); fft_size],
            scratch,
        }
    }

    /// Summarize `samples` into at most `resolution` segments.
    ///
    /// Returns nothing for an empty stream or a non-positive sample rate.
    pub fn summarize(
        &mut self,
        samples: &[f32],
        sample_rate: f64,
        resolution: usize,
    ) -> Vec<OverviewSegment> {
        let total = samples.len();
        if total == 0 || !(sample_rate > 0.0) || resolution == 0 || self.fft_size < 2 {
            log::debug!("Overview skipped: {} samples at {} Hz", total, sample_rate);
            return Vec::new();
        }

        let width = segment_width(total, resolution);
        let mut segments = Vec::with_capacity(resolution.min(total));

        for i in 0..resolution {
            let start = i * width;
            if start >= total {
                break;
            }
            let end = (start + width).min(total);
            let range = &samples[start..end];

            let (min, max) = envelope(range);
            let color = self.band_color(samples, start + (end - start) / 2, sample_rate);
            segments.push(OverviewSegment { min, max, color });
        }

        log::debug!(
            "Overview: {} segments of {} samples (FFT size {})",
            segments.len(),
            width,
            self.fft_size
        );
        segments
    }

    /// Tint for the FFT window centred on `center`.
    fn band_color(&mut self, samples: &[f32], center: usize, sample_rate: f64) -> BandColor {
        let start = center.saturating_sub(self.fft_size / 2);

        for (k, slot) in self.buffer.iter_mut().enumerate() {
            let s = samples.get(start + k).copied().unwrap_or(0.0);
            *slot = Complex::new(s * self.hann[k], 0.0);
        }
        self.fft.process_with_scratch(&mut self.buffer, &mut self.scratch);

        let freq_resolution = (sample_rate / self.fft_size as f64) as f32;
        let (mut low, mut mid, mut high) = (0.0f32, 0.0f32, 0.0f32);
        let mut total = ENERGY_EPSILON;

        // DC through Nyquist inclusive
        for (k, bin) in self.buffer[..=self.fft_size / 2].iter().enumerate() {
            let magnitude = bin.norm();
            match FrequencyBand::classify(k as f32 * freq_resolution) {
                FrequencyBand::Low => low += magnitude,
                FrequencyBand::Mid => mid += magnitude,
                FrequencyBand::High => high += magnitude,
            }
            total += magnitude;
        }

        BandColor {
            r: color_byte(low / total),
            g: color_byte(mid / total),
            b: color_byte(high / total),
        }
    }
}

/// Samples per segment: `floor(total / resolution)`, at least one.
pub fn segment_width(total: usize, resolution: usize) -> usize {
    (total / resolution.max(1)).max(1)
}

fn envelope(range: &[f32]) -> (f32, f32) {
    let first = range.first().copied().unwrap_or(0.0);
    range
        .iter()
        .fold((first, first), |(lo, hi), &s| (lo.min(s), hi.max(s)))
}

fn color_byte(share: f32) -> u8 {
    (share * 255.0 * COLOR_GAIN).round().clamp(0.0, 255.0) as u8
}

pub(crate) fn hann_window(size: usize) -> Vec<f32> {
    if size < 2 {
        return vec![1.0; size];
    }
    (0..size)
        .map(|i| {
            0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(freq: f32, sample_rate: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate).sin() * 0.8)
            .collect()
    }

    #[test]
    fn empty_input_produces_nothing() {
        let mut s = Summarizer::new(1024);
        assert!(s.summarize(&[], 44100.0, 1024).is_empty());
        assert!(s.summarize(&[0.5; 2048], 0.0, 1024).is_empty());
        assert!(s.summarize(&[0.5; 2048], -44100.0, 1024).is_empty());
        assert!(s.summarize(&[0.5; 2048], f64::NAN, 1024).is_empty());
    }

    #[test]
    fn silence_is_black_and_flat() {
        let mut s = Summarizer::new(1024);
        let segments = s.summarize(&vec![0.0; 44100], 44100.0, 1024);
        assert_eq!(segments.len(), 1024);
        for seg in &segments {
            assert_eq!(seg.min, 0.0);
            assert_eq!(seg.max, 0.0);
            assert_eq!(seg.color, BandColor::BLACK);
        }
    }

    #[test]
    fn tiny_buffer_gets_one_segment_per_sample() {
        let samples: Vec<f32> = (0..100).map(|i| i as f32 / 100.0 - 0.5).collect();
        let mut s = Summarizer::new(1024);
        let segments = s.summarize(&samples, 44100.0, 1024);
        assert_eq!(segments.len(), 100);
        for (seg, &x) in segments.iter().zip(&samples) {
            assert_eq!(seg.min, x);
            assert_eq!(seg.max, x);
        }
    }

    #[test]
    fn remainder_past_last_full_segment_is_dropped() {
        assert_eq!(segment_width(2050, 1024), 2);
        let mut samples = vec![0.0f32; 2050];
        samples[2049] = 1.0;
        let mut s = Summarizer::new(256);
        let segments = s.summarize(&samples, 8000.0, 1024);
        assert_eq!(segments.len(), 1024);
        assert_eq!(segments[1023].max, 0.0);
    }

    #[test]
    fn envelope_tracks_segment_extremes() {
        let samples: Vec<f32> = (0..4096).map(|i| ((i * 37 % 101) as f32 / 50.0) - 1.0).collect();
        let mut s = Summarizer::new(512);
        let segments = s.summarize(&samples, 22050.0, 64);
        let width = segment_width(samples.len(), 64);
        assert_eq!(segments.len(), 64);
        for (i, seg) in segments.iter().enumerate() {
            let range = &samples[i * width..(i + 1) * width];
            assert!(seg.min <= seg.max);
            assert!(range.contains(&seg.min));
            assert!(range.contains(&seg.max));
            assert!(range.iter().all(|&x| x >= seg.min && x <= seg.max));
        }
    }

    #[test]
    fn low_tone_tints_red() {
        let mut s = Summarizer::new(1024);
        let segments = s.summarize(&tone(100.0, 44100.0, 44100), 44100.0, 32);
        for seg in &segments[1..31] {
            assert!(seg.color.r > seg.color.g, "{:?}", seg.color);
            assert!(seg.color.r > seg.color.b, "{:?}", seg.color);
        }
    }

    #[test]
    fn mid_tone_tints_green() {
        let mut s = Summarizer::new(1024);
        let segments = s.summarize(&tone(800.0, 44100.0, 44100), 44100.0, 32);
        for seg in &segments[1..31] {
            assert!(seg.color.g > seg.color.r, "{:?}", seg.color);
            assert!(seg.color.g > seg.color.b, "{:?}", seg.color);
        }
    }

    #[test]
    fn high_tone_tints_blue() {
        let mut s = Summarizer::new(1024);
        let segments = s.summarize(&tone(6000.0, 44100.0, 44100), 44100.0, 32);
        for seg in &segments[1..31] {
            assert!(seg.color.b > seg.color.r, "{:?}", seg.color);
            assert!(seg.color.b > seg.color.g, "{:?}", seg.color);
        }
    }

    #[test]
    fn color_saturates_at_full_scale() {
        assert_eq!(color_byte(0.0), 0);
        assert_eq!(color_byte(0.2), 153);
        assert_eq!(color_byte(0.5), 255);
        assert_eq!(color_byte(1.0), 255);
    }

    #[test]
    fn hann_is_symmetric_and_tapered() {
        let w = hann_window(1024);
        assert_eq!(w.len(), 1024);
        assert!(w[0].abs() < 1e-6);
        assert!(w[1023].abs() < 1e-6);
        for i in 0..512 {
            assert!((w[i] - w[1023 - i]).abs() < 1e-5);
        }
    }
}
