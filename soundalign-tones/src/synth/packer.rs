//! Stereo frame packing
//!
//! Fixed output contract: 16-bit signed little-endian, 2 channels,
//! interleaved L R L R. No resampling or format negotiation happens here.

use crate::audio::types::AudioFrameBuffer;
use crate::synth::panner::StereoGains;

/// Convert a float sample to i16: round(clamp(v, -1, 1) × 32767)
pub fn to_i16(value: f32) -> i16 {
    (value.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16
}

/// Scale shaped mono samples by volume and per-channel gains, then
/// interleave into an immutable frame buffer.
pub fn pack_stereo(samples: &[f32], gains: StereoGains, volume: f32) -> AudioFrameBuffer {
    let mut interleaved = Vec::with_capacity(samples.len() * 2);
    for sample in samples {
        let value = sample * volume;
        interleaved.push(to_i16(value * gains.left));
        interleaved.push(to_i16(value * gains.right));
    }
    AudioFrameBuffer::from_samples(&interleaved)
}
