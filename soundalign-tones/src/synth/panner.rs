//! Stereo panning
//!
//! Progress tones follow the percent across the stereo field; plain beeps
//! use fixed gains per direction.

use soundalign_common::Direction;

/// Left/right gain multipliers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StereoGains {
    pub left: f32,
    pub right: f32,
}

impl StereoGains {
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Gains as the 0-100 balance values the plain tone call takes
    pub fn to_balance(&self) -> (u8, u8) {
        let scale = |g: f32| (g.clamp(0.0, 1.0) * 100.0).round() as u8;
        (scale(self.left), scale(self.right))
    }
}

/// How a pan position becomes channel gains
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanLaw {
    /// left² + right² = 1, no loudness dip at the centre
    EqualPower,
    /// left + right = 1
    Linear,
}

impl PanLaw {
    /// Gains for a pan position in [0, 1] (0 = left, 1 = right)
    pub fn gains(&self, pan: f32) -> StereoGains {
        match self {
            PanLaw::EqualPower => equal_power_gains(pan),
            PanLaw::Linear => linear_gains(pan),
        }
    }
}

/// Pan position for a progress tone.
///
/// `LeftToRight` maps 0..100% onto 0..1, `RightToLeft` onto 1..0, and every
/// other direction (or indeterminate progress) sits in the centre.
pub fn progress_pan(percent: Option<f32>, direction: Direction) -> f32 {
    let Some(percent) = percent.filter(|p| *p >= 0.0) else {
        return 0.5;
    };
    let fraction = percent.min(100.0) / 100.0;
    match direction {
        Direction::LeftToRight => fraction,
        Direction::RightToLeft => 1.0 - fraction,
        _ => 0.5,
    }
}

/// Square-root (equal-power) pan law
pub fn equal_power_gains(pan: f32) -> StereoGains {
    let pan = pan.clamp(0.0, 1.0);
    StereoGains::new((1.0 - pan).sqrt(), pan.sqrt())
}

pub fn linear_gains(pan: f32) -> StereoGains {
    let pan = pan.clamp(0.0, 1.0);
    StereoGains::new(1.0 - pan, pan)
}

/// Fixed gains for plain beeps.
///
/// Sweep directions only mean something for progress tones, so they are
/// treated as centred here.
pub fn fixed_gains(direction: Direction) -> StereoGains {
    match direction {
        Direction::Left => StereoGains::new(1.0, 0.0),
        Direction::Right => StereoGains::new(0.0, 1.0),
        Direction::Center | Direction::LeftToRight | Direction::RightToLeft => {
            StereoGains::new(0.5, 0.5)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_power_identity() {
        for step in 0..=100 {
            let pan = step as f32 / 100.0;
            let gains = equal_power_gains(pan);
            let power = gains.left * gains.left + gains.right * gains.right;
            assert!((power - 1.0).abs() < 1e-6, "pan {} power {}", pan, power);
        }
    }

    #[test]
    fn test_equal_power_endpoints() {
        assert_eq!(equal_power_gains(0.0), StereoGains::new(1.0, 0.0));
        assert_eq!(equal_power_gains(1.0), StereoGains::new(0.0, 1.0));
        // Out of range pans are clamped
        assert_eq!(equal_power_gains(-3.0), StereoGains::new(1.0, 0.0));
    }

    #[test]
    fn test_progress_pan_directions() {
        assert_eq!(progress_pan(Some(25.0), Direction::LeftToRight), 0.25);
        assert_eq!(progress_pan(Some(25.0), Direction::RightToLeft), 0.75);
        assert_eq!(progress_pan(Some(25.0), Direction::Left), 0.5);
        assert_eq!(progress_pan(Some(25.0), Direction::Center), 0.5);
        assert_eq!(progress_pan(None, Direction::LeftToRight), 0.5);
        assert_eq!(progress_pan(Some(-1.0), Direction::LeftToRight), 0.5);
        assert_eq!(progress_pan(Some(140.0), Direction::LeftToRight), 1.0);
    }

    #[test]
    fn test_fixed_gains() {
        assert_eq!(fixed_gains(Direction::Left), StereoGains::new(1.0, 0.0));
        assert_eq!(fixed_gains(Direction::Center), StereoGains::new(0.5, 0.5));
        assert_eq!(fixed_gains(Direction::Right), StereoGains::new(0.0, 1.0));
        assert_eq!(fixed_gains(Direction::LeftToRight), StereoGains::new(0.5, 0.5));
        assert_eq!(fixed_gains(Direction::RightToLeft), StereoGains::new(0.5, 0.5));
    }

    #[test]
    fn test_linear_law_and_balance() {
        let gains = PanLaw::Linear.gains(0.3);
        assert!((gains.left - 0.7).abs() < 1e-6);
        assert!((gains.right - 0.3).abs() < 1e-6);
        assert_eq!(gains.to_balance(), (70, 30));
    }
}
