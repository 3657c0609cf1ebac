//! Envelope shaping
//!
//! Multiplies each sample by the fade factor for its position so the tone
//! ramps up from silence, holds at unity, and ramps back down.

use soundalign_common::FadeAlgorithm;

/// Apply a symmetric fade-in/fade-out window in place
pub fn apply_envelope(samples: &mut [f32], algorithm: FadeAlgorithm, fade_ratio: f32) {
    let frame_count = samples.len();
    for (i, sample) in samples.iter_mut().enumerate() {
        *sample *= algorithm.fade_factor(i, frame_count, fade_ratio);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_on_constant_signal() {
        let mut samples = vec![1.0f32; 100];
        apply_envelope(&mut samples, FadeAlgorithm::Gaussian, 0.2);

        // 20 fade frames each side
        assert_eq!(samples[0], 0.0);
        assert!((samples[10] - 0.5).abs() < 1e-6);
        assert!(samples[20..=80].iter().all(|s| *s == 1.0));
        assert!((samples[90] - 0.5).abs() < 1e-6);
        assert!((samples[99] - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_envelope_never_amplifies() {
        let mut samples = vec![-0.8f32; 441];
        apply_envelope(&mut samples, FadeAlgorithm::Cosine, 0.5);
        assert!(samples.iter().all(|s| (-0.8..=0.0).contains(s)));
    }

    #[test]
    fn test_empty_input() {
        let mut samples: Vec<f32> = Vec::new();
        apply_envelope(&mut samples, FadeAlgorithm::Cosine, 0.5);
        assert!(samples.is_empty());
    }
}
