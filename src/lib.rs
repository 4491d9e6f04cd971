//! Waveform overview and tempo estimation for decoded audio.
//!
//! [`analyze`] turns a channel of samples into a fixed-resolution min/max
//! overview tinted by low/mid/high band energy, plus onset times and a BPM
//! estimate derived from that overview. [`Engine`] keeps the results of the
//! last load for later queries.

pub mod audio;
pub mod config;
pub mod engine;

pub use audio::analysis::{analyze, Analysis, AnalysisParams, ParamError};
pub use audio::buffer::{BufferError, FileInfo, SampleBuffer};
pub use audio::features::{BandColor, FrequencyBand, OverviewSegment};
pub use engine::Engine;
