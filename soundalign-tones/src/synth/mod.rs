//! Tone synthesis pipeline
//!
//! Runs synchronously on the caller's thread:
//! synthesize -> envelope -> pan -> pack into 16-bit stereo frames.
//! A 0.1 s tone is 4410 frames, rendered in well under a millisecond.

pub mod envelope;
pub mod packer;
pub mod panner;
pub mod params;
pub mod waveform;

pub use packer::pack_stereo;
pub use panner::{PanLaw, StereoGains};
pub use params::SynthesisParameters;
pub use waveform::synthesize;

use crate::audio::types::AudioFrameBuffer;
use crate::error::Result;
use soundalign_common::Direction;

/// Frequency and stereo placement chosen for one progress tone
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressTone {
    pub frequency: f32,
    pub pan: f32,
    pub gains: StereoGains,
}

impl ProgressTone {
    /// Map a percent (None or negative = indeterminate) onto pitch and pan.
    ///
    /// Indeterminate progress uses the midpoint frequency and a centred pan.
    pub fn plan(percent: Option<f32>, direction: Direction, params: &SynthesisParameters) -> Self {
        let frequency = params.frequency_for_percent(percent);
        let pan = panner::progress_pan(percent, direction);
        let gains = params.pan_law.gains(pan);
        Self {
            frequency,
            pan,
            gains,
        }
    }
}

/// Render a complete progress tone ready for the playback queue
pub fn render_progress_tone(
    percent: Option<f32>,
    direction: Direction,
    params: &SynthesisParameters,
) -> Result<AudioFrameBuffer> {
    let tone = ProgressTone::plan(percent, direction, params);
    let mut samples = synthesize(tone.frequency, params)?;
    envelope::apply_envelope(&mut samples, params.fade_algorithm, params.fade_ratio);
    Ok(pack_stereo(&samples, tone.gains, params.volume))
}
