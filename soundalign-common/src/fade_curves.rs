//! Fade curve implementations for tone envelopes
//!
//! Every synthesized tone is shaped with a symmetric fade-in/fade-out window
//! so that it starts and ends at zero amplitude (no clicks), with a flat
//! unity region in the middle.
//!
//! Two curve shapes are available:
//! - Cosine: raised cosine, v(t) = 0.5 × (1 - cos(π × t))
//! - Gaussian: a linear ramp, v(t) = t. The settings record calls this
//!   "gaussian"; a true Gaussian bell is not used, the linear ramp is the
//!   documented stand-in.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

/// Fade curve shapes for tone envelopes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FadeAlgorithm {
    /// Raised cosine: smooth acceleration and deceleration
    Cosine,

    /// Linear ramp (stored as "gaussian" in the settings record)
    Gaussian,
}

impl FadeAlgorithm {
    /// Calculate fade-in multiplier at given position
    ///
    /// # Arguments
    /// * `position` - Normalized position through fade (0.0 to 1.0)
    ///
    /// # Returns
    /// Volume multiplier to apply to sample (0.0 = silence, 1.0 = full volume)
    pub fn calculate_fade_in(&self, position: f32) -> f32 {
        let t = position.clamp(0.0, 1.0);

        match self {
            FadeAlgorithm::Cosine => 0.5 * (1.0 - (PI * t).cos()),
            FadeAlgorithm::Gaussian => t,
        }
    }

    /// Envelope multiplier for frame `index` of a tone `frame_count` frames long.
    ///
    /// `fade_ratio` is the fraction of the tone spent fading on each side,
    /// capped at one half so the fade-in and fade-out regions never overlap.
    /// The fade-out mirrors the fade-in using `frame_count - index` as its
    /// position. When the fade length rounds down to zero the envelope is flat.
    pub fn fade_factor(&self, index: usize, frame_count: usize, fade_ratio: f32) -> f32 {
        let fade_frames = fade_frame_count(frame_count, fade_ratio);
        if fade_frames == 0 {
            return 1.0;
        }

        let factor = if index < fade_frames {
            self.calculate_fade_in(index as f32 / fade_frames as f32)
        } else if index > frame_count - fade_frames {
            let remaining = frame_count.saturating_sub(index);
            self.calculate_fade_in(remaining as f32 / fade_frames as f32)
        } else {
            1.0
        };

        factor.clamp(0.0, 1.0)
    }

    /// Parse from the settings record string
    ///
    /// Supports:
    /// - 'cosine'
    /// - 'gaussian', 'linear' (both map to the linear ramp)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Some(FadeAlgorithm::Cosine),
            "gaussian" | "linear" => Some(FadeAlgorithm::Gaussian),
            _ => None,
        }
    }

    /// Convert to the settings record string representation
    pub fn to_settings_string(&self) -> &'static str {
        match self {
            FadeAlgorithm::Cosine => "cosine",
            FadeAlgorithm::Gaussian => "gaussian",
        }
    }

    /// Get human-readable display name
    pub fn display_name(&self) -> &'static str {
        match self {
            FadeAlgorithm::Cosine => "Cosine",
            FadeAlgorithm::Gaussian => "Gaussian",
        }
    }

    /// Get all available fade algorithms
    pub fn all_variants() -> &'static [FadeAlgorithm] {
        &[FadeAlgorithm::Cosine, FadeAlgorithm::Gaussian]
    }
}

/// Number of frames in each of the fade-in and fade-out regions
pub fn fade_frame_count(frame_count: usize, fade_ratio: f32) -> usize {
    if !(fade_ratio > 0.0) {
        return 0;
    }
    let requested = (frame_count as f64 * fade_ratio.min(1.0) as f64).floor() as usize;
    requested.min(frame_count / 2)
}

impl Default for FadeAlgorithm {
    fn default() -> Self {
        FadeAlgorithm::Cosine
    }
}

impl std::fmt::Display for FadeAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fade_in_bounds() {
        for curve in FadeAlgorithm::all_variants() {
            let start_val = curve.calculate_fade_in(0.0);
            let end_val = curve.calculate_fade_in(1.0);
            assert!(
                start_val.abs() < 1e-6,
                "{:?} fade-in at 0.0 should be 0.0, got {}",
                curve,
                start_val
            );
            assert!(
                (end_val - 1.0).abs() < 1e-6,
                "{:?} fade-in at 1.0 should be 1.0, got {}",
                curve,
                end_val
            );
        }
    }

    #[test]
    fn test_fade_factor_starts_at_zero() {
        for curve in FadeAlgorithm::all_variants() {
            assert_eq!(curve.fade_factor(0, 4410, 0.5), 0.0);
        }
    }

    #[test]
    fn test_fade_factor_tail_mirrors_head() {
        let frame_count = 4410;
        for curve in FadeAlgorithm::all_variants() {
            for offset in 1..50 {
                let head = curve.fade_factor(offset, frame_count, 0.3);
                let tail = curve.fade_factor(frame_count - offset, frame_count, 0.3);
                assert!(
                    (head - tail).abs() < 1e-6,
                    "{:?}: head {} vs tail {} at offset {}",
                    curve,
                    head,
                    tail,
                    offset
                );
            }
            let last = curve.fade_factor(frame_count - 1, frame_count, 0.3);
            assert!(last < 0.01, "{:?}: last frame should be near silent, got {}", curve, last);
        }
    }

    #[test]
    fn test_flat_region_is_exactly_unity() {
        let frame_count = 1000;
        for curve in FadeAlgorithm::all_variants() {
            for i in 200..=800 {
                assert_eq!(curve.fade_factor(i, frame_count, 0.2), 1.0);
            }
        }
    }

    #[test]
    fn test_zero_fade_frames_is_flat() {
        // 10 frames * 0.05 rounds down to zero fade frames
        for curve in FadeAlgorithm::all_variants() {
            for i in 0..10 {
                assert_eq!(curve.fade_factor(i, 10, 0.05), 1.0);
            }
        }
    }

    #[test]
    fn test_full_ratio_caps_at_half() {
        assert_eq!(fade_frame_count(4410, 1.0), 2205);
        assert_eq!(fade_frame_count(4410, 0.5), 2205);
        assert_eq!(fade_frame_count(4410, 0.1), 441);
        assert_eq!(fade_frame_count(4410, 0.0), 0);
        assert_eq!(fade_frame_count(4410, f32::NAN), 0);
    }

    #[test]
    fn test_cosine_midpoint() {
        // Half way through a 100-frame fade the raised cosine is 0.5
        let value = FadeAlgorithm::Cosine.fade_factor(50, 1000, 0.1);
        assert!((value - 0.5).abs() < 1e-6);

        let linear = FadeAlgorithm::Gaussian.fade_factor(25, 1000, 0.1);
        assert!((linear - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_settings_round_trip() {
        for curve in FadeAlgorithm::all_variants() {
            let s = curve.to_settings_string();
            assert_eq!(FadeAlgorithm::from_str(s), Some(*curve));
        }
        assert_eq!(FadeAlgorithm::from_str("COSINE"), Some(FadeAlgorithm::Cosine));
        assert_eq!(FadeAlgorithm::from_str("bell"), None);
    }

    #[test]
    fn test_default_and_display() {
        assert_eq!(FadeAlgorithm::default(), FadeAlgorithm::Cosine);
        assert_eq!(format!("{}", FadeAlgorithm::Gaussian), "Gaussian");
    }
}
