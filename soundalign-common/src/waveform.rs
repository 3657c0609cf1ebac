//! Progress tone waveform presets
//!
//! A preset is a harmonic weight set: index k holds the amplitude of
//! overtone k+1 (index 0 is the fundamental). The weights are not
//! normalized; they are chosen so the summed peak stays near [-1, 1] once
//! the volume scale is applied.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Pure sine: fundamental only
pub const TONE_SINE: &[f32] = &[1.0];

/// Odd harmonics with 1/n² weights (triangle approximation)
pub const TONE_TRIANGLE: &[f32] = &[1.0, 0.0, 1.0 / 9.0, 0.0, 1.0 / 25.0, 0.0, 1.0 / 49.0];

/// All harmonics with 1/n weights (sawtooth approximation)
pub const TONE_SAWTOOTH: &[f32] = &[
    1.0,
    1.0 / 2.0,
    1.0 / 3.0,
    1.0 / 4.0,
    1.0 / 5.0,
    1.0 / 6.0,
    1.0 / 7.0,
];

/// Progress tone type selected in the settings record (`waveformType`, 0-3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WaveformType {
    Sine,
    Triangle,
    Sawtooth,
    /// Leave the host's own beep in place and only pan it
    OriginalTone,
}

impl WaveformType {
    /// Harmonic weights for synthesized presets; `None` for `OriginalTone`
    pub fn harmonics(&self) -> Option<&'static [f32]> {
        match self {
            WaveformType::Sine => Some(TONE_SINE),
            WaveformType::Triangle => Some(TONE_TRIANGLE),
            WaveformType::Sawtooth => Some(TONE_SAWTOOTH),
            WaveformType::OriginalTone => None,
        }
    }

    /// True when progress sounds are synthesized rather than passed through
    pub fn is_synthesized(&self) -> bool {
        self.harmonics().is_some()
    }

    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(WaveformType::Sine),
            1 => Some(WaveformType::Triangle),
            2 => Some(WaveformType::Sawtooth),
            3 => Some(WaveformType::OriginalTone),
            _ => None,
        }
    }

    pub fn index(&self) -> u8 {
        match self {
            WaveformType::Sine => 0,
            WaveformType::Triangle => 1,
            WaveformType::Sawtooth => 2,
            WaveformType::OriginalTone => 3,
        }
    }

    /// Parse from a CLI-style name
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sine" => Some(WaveformType::Sine),
            "triangle" => Some(WaveformType::Triangle),
            "sawtooth" | "saw" => Some(WaveformType::Sawtooth),
            "original" | "original-tone" => Some(WaveformType::OriginalTone),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            WaveformType::Sine => "Sine",
            WaveformType::Triangle => "Triangle",
            WaveformType::Sawtooth => "Sawtooth",
            WaveformType::OriginalTone => "Original Tone Beep",
        }
    }
}

impl Default for WaveformType {
    fn default() -> Self {
        WaveformType::Sine
    }
}

impl TryFrom<u8> for WaveformType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        WaveformType::from_index(value)
            .ok_or_else(|| Error::InvalidInput(format!("waveform type out of range: {}", value)))
    }
}

impl From<WaveformType> for u8 {
    fn from(waveform: WaveformType) -> u8 {
        waveform.index()
    }
}

impl std::fmt::Display for WaveformType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
