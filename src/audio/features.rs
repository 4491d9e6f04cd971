use serde::Serialize;

/// Upper edge of the low band (inclusive), Hz
pub const LOW_CUTOFF_HZ: f32 = 200.0;
/// Upper edge of the mid band (inclusive), Hz
pub const MID_CUTOFF_HZ: f32 = 2000.0;

/// Frequency ranges used to tint the overview
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrequencyBand {
    /// 0-200 Hz
    Low,
    /// 200-2000 Hz
    Mid,
    /// 2000 Hz up to Nyquist
    High,
}

impl FrequencyBand {
    pub fn classify(freq_hz: f32) -> Self {
        if freq_hz <= LOW_CUTOFF_HZ {
            FrequencyBand::Low
        } else if freq_hz <= MID_CUTOFF_HZ {
            FrequencyBand::Mid
        } else {
            FrequencyBand::High
        }
    }
}

/// Low/mid/high energy share mapped to red/green/blue
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BandColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl BandColor {
    pub const BLACK: BandColor = BandColor { r: 0, g: 0, b: 0 };
}

/// One time bucket of the overview
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct OverviewSegment {
    /// Lowest raw sample in the bucket
    pub min: f32,
    /// Highest raw sample in the bucket
    pub max: f32,
    pub color: BandColor,
}

impl OverviewSegment {
    /// Peak-to-peak amplitude, used as a cheap transient proxy
    pub fn peak_to_peak(&self) -> f32 {
        self.max - self.min
    }
}
