//! Synthesis parameters
//!
//! The whole struct is swapped at once by `ToneEngine::apply_settings`;
//! synthesis calls read a snapshot and never observe a partial update.

use crate::error::{Error, Result};
use crate::synth::panner::PanLaw;
use soundalign_common::waveform::TONE_SINE;
use soundalign_common::{FadeAlgorithm, SoundAlignSettings};

/// Output sample rate for the whole engine (Hz)
pub const SAMPLE_RATE: u32 = 44100;

/// Interleaved stereo
pub const CHANNELS: u16 = 2;

/// Bytes per sample (signed 16-bit)
pub const SAMPLE_WIDTH: usize = 2;

/// Length of one progress tone
pub const DEFAULT_TONE_DURATION_SECS: f32 = 0.1;

/// Longest tone the engine will render; longer requests are rejected
pub const MAX_TONE_DURATION_SECS: f32 = 10.0;

/// Fraction of the tone spent fading on each side
pub const DEFAULT_FADE_RATIO: f32 = 0.5;

#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParameters {
    /// Frequency at 0% (Hz)
    pub min_frequency: f32,
    /// Frequency at 100% (Hz)
    pub max_frequency: f32,
    /// Index k = amplitude of overtone k+1
    pub harmonic_weights: Vec<f32>,
    pub fade_algorithm: FadeAlgorithm,
    pub fade_ratio: f32,
    pub volume: f32,
    pub tone_duration_secs: f32,
    pub sample_rate: u32,
    pub pan_law: PanLaw,
}

impl Default for SynthesisParameters {
    fn default() -> Self {
        Self {
            min_frequency: 110.0,
            max_frequency: 1760.0,
            harmonic_weights: TONE_SINE.to_vec(),
            fade_algorithm: FadeAlgorithm::Cosine,
            fade_ratio: DEFAULT_FADE_RATIO,
            volume: 0.5,
            tone_duration_secs: DEFAULT_TONE_DURATION_SECS,
            sample_rate: SAMPLE_RATE,
            pan_law: PanLaw::EqualPower,
        }
    }
}

impl SynthesisParameters {
    /// Build parameters from the host settings record.
    ///
    /// The "original tone" waveform never synthesizes, so it keeps the sine
    /// weights for any tone that is rendered anyway (e.g. test sequences).
    pub fn from_settings(settings: &SoundAlignSettings) -> Self {
        let harmonic_weights = settings
            .waveform_type
            .harmonics()
            .unwrap_or(TONE_SINE)
            .to_vec();

        Self {
            min_frequency: settings.min_frequency as f32,
            max_frequency: settings.max_frequency as f32,
            harmonic_weights,
            fade_algorithm: settings.fade_algorithm,
            volume: settings.volume,
            pan_law: if settings.smooth_panning {
                PanLaw::EqualPower
            } else {
                PanLaw::Linear
            },
            ..Default::default()
        }
    }

    /// Same parameters with a different harmonic weight set
    pub fn with_harmonics(&self, harmonic_weights: &[f32]) -> Self {
        Self {
            harmonic_weights: harmonic_weights.to_vec(),
            ..self.clone()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.min_frequency.is_finite() && self.min_frequency > 0.0) {
            return Err(Error::InvalidParameter(format!(
                "min_frequency must be positive, got {}",
                self.min_frequency
            )));
        }
        if !(self.max_frequency.is_finite() && self.max_frequency > self.min_frequency) {
            return Err(Error::InvalidParameter(format!(
                "max_frequency {} must exceed min_frequency {}",
                self.max_frequency, self.min_frequency
            )));
        }
        if self
            .harmonic_weights
            .iter()
            .any(|w| !(w.is_finite() && *w >= 0.0))
        {
            return Err(Error::InvalidParameter(format!(
                "harmonic weights must be non-negative: {:?}",
                self.harmonic_weights
            )));
        }
        if !(self.fade_ratio > 0.0 && self.fade_ratio <= 1.0) {
            return Err(Error::InvalidParameter(format!(
                "fade_ratio must be in (0, 1], got {}",
                self.fade_ratio
            )));
        }
        if !(0.0..=1.0).contains(&self.volume) {
            return Err(Error::InvalidParameter(format!(
                "volume must be in [0, 1], got {}",
                self.volume
            )));
        }
        check_tone_duration(self.tone_duration_secs)?;
        if self.sample_rate == 0 {
            return Err(Error::InvalidParameter("sample_rate must be positive".to_string()));
        }
        Ok(())
    }

    /// Number of frames in one tone: round(sample_rate * duration)
    pub fn frame_count(&self) -> usize {
        (self.sample_rate as f64 * self.tone_duration_secs as f64).round() as usize
    }

    /// Linear map of percent onto [min_frequency, max_frequency].
    ///
    /// Percent is clamped to 0..=100; None or negative picks the midpoint.
    pub fn frequency_for_percent(&self, percent: Option<f32>) -> f32 {
        let fraction = match percent {
            Some(p) if p >= 0.0 => p.min(100.0) / 100.0,
            _ => 0.5,
        };
        self.min_frequency + (self.max_frequency - self.min_frequency) * fraction
    }
}

/// Duration must be positive, finite and at most `MAX_TONE_DURATION_SECS`
pub(crate) fn check_tone_duration(duration_secs: f32) -> Result<()> {
    if !(duration_secs.is_finite() && duration_secs > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "tone duration must be positive, got {}",
            duration_secs
        )));
    }
    if duration_secs > MAX_TONE_DURATION_SECS {
        return Err(Error::InvalidParameter(format!(
            "tone duration {} s exceeds the {} s limit",
            duration_secs, MAX_TONE_DURATION_SECS
        )));
    }
    Ok(())
}
