use serde::Serialize;
use thiserror::Error;

use super::analysis::{analyze, Analysis, AnalysisParams};

#[derive(Error, Debug, PartialEq)]
pub enum BufferError {
    #[error("sample buffer needs at least one channel")]
    NoChannels,

    #[error("channel {channel} has {len} samples, expected {expected}")]
    RaggedChannels {
        channel: usize,
        len: usize,
        expected: usize,
    },

    #[error("{len} interleaved samples do not divide into {channels} channels")]
    Interleaving { len: usize, channels: usize },
}

/// Decoded audio, one `Vec` per channel.
#[derive(Clone, Debug)]
pub struct SampleBuffer {
    channels: Vec<Vec<f32>>,
    sample_rate: f64,
}

/// Basic properties of a loaded buffer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FileInfo {
    pub sample_rate: f64,
    pub total_samples: usize,
    pub num_channels: usize,
    pub duration_seconds: f64,
}

impl SampleBuffer {
    pub fn new(channels: Vec<Vec<f32>>, sample_rate: f64) -> Result<Self, BufferError> {
        let expected = channels.first().ok_or(BufferError::NoChannels)?.len();
        if let Some((channel, samples)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != expected)
        {
            return Err(BufferError::RaggedChannels {
                channel,
                len: samples.len(),
                expected,
            });
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn mono(samples: Vec<f32>, sample_rate: f64) -> Self {
        Self {
            channels: vec![samples],
            sample_rate,
        }
    }

    /// Split frame-interleaved samples (`L R L R ...`) into channels.
    pub fn from_interleaved(
        samples: &[f32],
        num_channels: usize,
        sample_rate: f64,
    ) -> Result<Self, BufferError> {
        if num_channels == 0 {
            return Err(BufferError::NoChannels);
        }
        if samples.len() % num_channels != 0 {
            return Err(BufferError::Interleaving {
                len: samples.len(),
                channels: num_channels,
            });
        }

        let frames = samples.len() / num_channels;
        let mut channels = vec![Vec::with_capacity(frames); num_channels];
        for frame in samples.chunks_exact(num_channels) {
            for (c, &s) in frame.iter().enumerate() {
                channels[c].push(s);
            }
        }
        Ok(Self {
            channels,
            sample_rate,
        })
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Samples per channel.
    pub fn len(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn channel(&self, index: usize) -> Option<&[f32]> {
        self.channels.get(index).map(Vec::as_slice)
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate > 0.0 {
            self.len() as f64 / self.sample_rate
        } else {
            0.0
        }
    }

    pub fn info(&self) -> FileInfo {
        FileInfo {
            sample_rate: self.sample_rate,
            total_samples: self.len(),
            num_channels: self.num_channels(),
            duration_seconds: self.duration(),
        }
    }

    /// Analyze channel 0. Other channels are ignored, not mixed in.
    pub fn analyze(&self, params: &AnalysisParams) -> Analysis {
        if self.num_channels() > 1 {
            log::warn!(
                "Using only the first of {} channels for analysis",
                self.num_channels()
            );
        }
        analyze(self.channel(0).unwrap_or(&[]), self.sample_rate, params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deinterleaves_frames() {
        let buf = SampleBuffer::from_interleaved(&[0.1, -0.1, 0.2, -0.2, 0.3, -0.3], 2, 8000.0)
            .unwrap();
        assert_eq!(buf.num_channels(), 2);
        assert_eq!(buf.len(), 3);
        assert_eq!(buf.channel(0).unwrap(), &[0.1f32, 0.2, 0.3][..]);
        assert_eq!(buf.channel(1).unwrap(), &[-0.1f32, -0.2, -0.3][..]);
    }

    #[test]
    fn rejects_partial_frame() {
        let err = SampleBuffer::from_interleaved(&[0.0; 5], 2, 8000.0).unwrap_err();
        assert_eq!(err, BufferError::Interleaving { len: 5, channels: 2 });
    }

    #[test]
    fn rejects_ragged_channels() {
        let err = SampleBuffer::new(vec![vec![0.0; 4], vec![0.0; 3]], 8000.0).unwrap_err();
        assert_eq!(
            err,
            BufferError::RaggedChannels {
                channel: 1,
                len: 3,
                expected: 4
            }
        );
        assert_eq!(SampleBuffer::new(vec![], 8000.0).unwrap_err(), BufferError::NoChannels);
    }

    #[test]
    fn info_reports_duration() {
        let info = SampleBuffer::mono(vec![0.0; 22050], 44100.0).info();
        assert_eq!(info.total_samples, 22050);
        assert_eq!(info.num_channels, 1);
        assert!((info.duration_seconds - 0.5).abs() < 1e-12);

        let silent_rate = SampleBuffer::mono(vec![0.0; 10], 0.0).info();
        assert_eq!(silent_rate.duration_seconds, 0.0);
    }

    #[test]
    fn analysis_uses_first_channel_only() {
        let left: Vec<f32> = (0..64).map(|i| if i % 2 == 0 { 0.5 } else { -0.5 }).collect();
        let right = vec![0.9f32; 64];
        let buf = SampleBuffer::new(vec![left, right], 8000.0).unwrap();
        let params = AnalysisParams {
            resolution: 8,
            ..AnalysisParams::default()
        };
        let analysis = buf.analyze(&params);
        assert_eq!(analysis.overview().len(), 8);
        for seg in analysis.overview() {
            assert_eq!(seg.min, -0.5);
            assert_eq!(seg.max, 0.5);
        }
    }
}
