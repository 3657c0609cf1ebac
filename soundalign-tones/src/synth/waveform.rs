//! Additive waveform synthesis
//!
//! value(t) = Σ_k w[k] × sin(2π × f × (k+1) × t)
//!
//! The sum is not peak-normalized. The presets keep the peak near [-1, 1]
//! once the volume scale is applied; the packer clamps whatever remains.

use crate::error::{Error, Result};
use crate::synth::params::{check_tone_duration, SynthesisParameters};
use std::f64::consts::TAU;

/// Synthesize one mono tone of `round(sample_rate × duration)` samples.
///
/// Zero-weight harmonics are skipped.
///
/// # Errors
/// `InvalidParameter` if the frequency, duration or sample rate is not
/// positive, or the duration exceeds `MAX_TONE_DURATION_SECS`.
pub fn synthesize(frequency: f32, params: &SynthesisParameters) -> Result<Vec<f32>> {
    if !(frequency.is_finite() && frequency > 0.0) {
        return Err(Error::InvalidParameter(format!(
            "tone frequency must be positive, got {}",
            frequency
        )));
    }
    check_tone_duration(params.tone_duration_secs)?;
    if params.sample_rate == 0 {
        return Err(Error::InvalidParameter("sample_rate must be positive".to_string()));
    }

    let frame_count = params.frame_count();
    let sample_rate = params.sample_rate as f64;

    let partials: Vec<(f64, f64)> = params
        .harmonic_weights
        .iter()
        .enumerate()
        .filter(|(_, weight)| **weight != 0.0)
        .map(|(k, weight)| (TAU * frequency as f64 * (k + 1) as f64, *weight as f64))
        .collect();

    let samples = (0..frame_count)
        .map(|i| {
            let t = i as f64 / sample_rate;
            partials
                .iter()
                .map(|(omega, weight)| weight * (omega * t).sin())
                .sum::<f64>() as f32
        })
        .collect();

    Ok(samples)
}
