//! SoundAlign settings record
//!
//! The host add-on persists a flat key/value record. The tone engine only
//! consumes it as a value object; the keys and their defaults are fixed so
//! records written by the host deserialize unchanged.
//!
//! # Ranges
//!
//! | key | range |
//! |-----|-------|
//! | volume | 0.1 - 1.0 (step 0.1) |
//! | minFrequency | 110 - 300 Hz (step 10) |
//! | maxFrequency | 1200 - 1760 Hz (step 10) |
//! | speech/beepPercentageInterval | one of 1, 2, 5, 10 |
//! | timeBasedInterval | 0 - 60 seconds (0 = off) |

use crate::direction::Direction;
use crate::fade_curves::FadeAlgorithm;
use crate::waveform::WaveformType;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const VOLUME_RANGE: (f32, f32) = (0.1, 1.0);
pub const MIN_FREQUENCY_RANGE: (u32, u32) = (110, 300);
pub const MAX_FREQUENCY_RANGE: (u32, u32) = (1200, 1760);
pub const PERCENTAGE_INTERVALS: &[u32] = &[1, 2, 5, 10];
pub const MAX_TIME_BASED_INTERVAL: u32 = 60;

/// The flat settings record shared with the host add-on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SoundAlignSettings {
    pub error_direction: Direction,
    pub effects_direction: Direction,
    pub progress_direction: Direction,
    /// Add-on beeps below 1000 Hz
    pub addon_beep_direction_a: Direction,
    /// Add-on beeps at or above 1000 Hz
    pub addon_beep_direction_b: Direction,
    pub is_active: bool,
    pub waveform_type: WaveformType,
    pub fade_algorithm: FadeAlgorithm,
    pub volume: f32,
    pub min_frequency: u32,
    pub max_frequency: u32,
    pub speech_percentage_interval: u32,
    pub beep_percentage_interval: u32,
    /// Seconds between forced announcements (0 = disabled)
    pub time_based_interval: u32,
    pub mixed_mode: bool,
    pub smooth_panning: bool,
}

impl Default for SoundAlignSettings {
    fn default() -> Self {
        Self {
            error_direction: Direction::Left,
            effects_direction: Direction::Left,
            progress_direction: Direction::LeftToRight,
            addon_beep_direction_a: Direction::Left,
            addon_beep_direction_b: Direction::Right,
            is_active: true,
            waveform_type: WaveformType::Sine,
            fade_algorithm: FadeAlgorithm::Cosine,
            volume: 0.5,
            min_frequency: 110,
            max_frequency: 1760,
            speech_percentage_interval: 10,
            beep_percentage_interval: 5,
            time_based_interval: 0,
            mixed_mode: false,
            smooth_panning: true,
        }
    }
}

impl SoundAlignSettings {
    /// Parse a record written by the host. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every value against its documented range
    pub fn validate(&self) -> Result<()> {
        if !(VOLUME_RANGE.0..=VOLUME_RANGE.1).contains(&self.volume) {
            return Err(Error::InvalidInput(format!(
                "volume {} outside {}..={}",
                self.volume, VOLUME_RANGE.0, VOLUME_RANGE.1
            )));
        }
        if !(MIN_FREQUENCY_RANGE.0..=MIN_FREQUENCY_RANGE.1).contains(&self.min_frequency) {
            return Err(Error::InvalidInput(format!(
                "minFrequency {} outside {}..={}",
                self.min_frequency, MIN_FREQUENCY_RANGE.0, MIN_FREQUENCY_RANGE.1
            )));
        }
        if !(MAX_FREQUENCY_RANGE.0..=MAX_FREQUENCY_RANGE.1).contains(&self.max_frequency) {
            return Err(Error::InvalidInput(format!(
                "maxFrequency {} outside {}..={}",
                self.max_frequency, MAX_FREQUENCY_RANGE.0, MAX_FREQUENCY_RANGE.1
            )));
        }
        if self.min_frequency >= self.max_frequency {
            return Err(Error::InvalidInput(format!(
                "minFrequency {} must be below maxFrequency {}",
                self.min_frequency, self.max_frequency
            )));
        }
        for (key, value) in [
            ("speechPercentageInterval", self.speech_percentage_interval),
            ("beepPercentageInterval", self.beep_percentage_interval),
        ] {
            if !PERCENTAGE_INTERVALS.contains(&value) {
                return Err(Error::InvalidInput(format!(
                    "{} {} must be one of {:?}",
                    key, value, PERCENTAGE_INTERVALS
                )));
            }
        }
        if self.time_based_interval > MAX_TIME_BASED_INTERVAL {
            return Err(Error::InvalidInput(format!(
                "timeBasedInterval {} exceeds {} seconds",
                self.time_based_interval, MAX_TIME_BASED_INTERVAL
            )));
        }
        Ok(())
    }

    /// Clamp out-of-range values back into range, logging each correction.
    ///
    /// Percentage intervals that are not one of the allowed values fall back
    /// to their defaults.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        let volume = self.volume.clamp(VOLUME_RANGE.0, VOLUME_RANGE.1);
        if volume != self.volume || self.volume.is_nan() {
            warn!("volume {} out of range, using {}", self.volume, volume);
            self.volume = if volume.is_nan() { defaults.volume } else { volume };
        }

        let min = self.min_frequency.clamp(MIN_FREQUENCY_RANGE.0, MIN_FREQUENCY_RANGE.1);
        if min != self.min_frequency {
            warn!("minFrequency {} out of range, using {}", self.min_frequency, min);
            self.min_frequency = min;
        }

        let max = self.max_frequency.clamp(MAX_FREQUENCY_RANGE.0, MAX_FREQUENCY_RANGE.1);
        if max != self.max_frequency {
            warn!("maxFrequency {} out of range, using {}", self.max_frequency, max);
            self.max_frequency = max;
        }

        if !PERCENTAGE_INTERVALS.contains(&self.speech_percentage_interval) {
            warn!(
                "speechPercentageInterval {} not allowed, using {}",
                self.speech_percentage_interval, defaults.speech_percentage_interval
            );
            self.speech_percentage_interval = defaults.speech_percentage_interval;
        }
        if !PERCENTAGE_INTERVALS.contains(&self.beep_percentage_interval) {
            warn!(
                "beepPercentageInterval {} not allowed, using {}",
                self.beep_percentage_interval, defaults.beep_percentage_interval
            );
            self.beep_percentage_interval = defaults.beep_percentage_interval;
        }

        if self.time_based_interval > MAX_TIME_BASED_INTERVAL {
            warn!(
                "timeBasedInterval {} too long, using {}",
                self.time_based_interval, MAX_TIME_BASED_INTERVAL
            );
            self.time_based_interval = MAX_TIME_BASED_INTERVAL;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SoundAlignSettings::default().validate().is_ok());
    }

    #[test]
    fn test_parse_host_record() {
        let json = r#"{
            "errorDirection": 2,
            "effectsDirection": 1,
            "progressDirection": 4,
            "addonBeepDirectionA": 0,
            "addonBeepDirectionB": 2,
            "isActive": false,
            "waveformType": 2,
            "fadeAlgorithm": "gaussian",
            "volume": 0.8,
            "minFrequency": 200,
            "maxFrequency": 1500,
            "speechPercentageInterval": 5,
            "beepPercentageInterval": 1,
            "timeBasedInterval": 30,
            "mixedMode": true,
            "smoothPanning": false
        }"#;

        let settings = SoundAlignSettings::from_json_str(json).unwrap();
        assert_eq!(settings.error_direction, Direction::Right);
        assert_eq!(settings.progress_direction, Direction::RightToLeft);
        assert!(!settings.is_active);
        assert_eq!(settings.waveform_type, WaveformType::Sawtooth);
        assert_eq!(settings.fade_algorithm, FadeAlgorithm::Gaussian);
        assert_eq!(settings.min_frequency, 200);
        assert_eq!(settings.time_based_interval, 30);
        assert!(settings.mixed_mode);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let settings = SoundAlignSettings::from_json_str(r#"{"volume": 0.3}"#).unwrap();
        assert_eq!(settings.volume, 0.3);
        assert_eq!(settings.max_frequency, 1760);
        assert_eq!(settings.progress_direction, Direction::LeftToRight);
    }

    #[test]
    fn test_corrupt_record_is_error() {
        assert!(SoundAlignSettings::from_json_str("").is_err());
        assert!(SoundAlignSettings::from_json_str(r#"{"waveformType": 7}"#).is_err());
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let settings = SoundAlignSettings {
            min_frequency: 300,
            max_frequency: 1200,
            ..Default::default()
        };
        assert!(settings.validate().is_ok());

        let settings = SoundAlignSettings {
            speech_percentage_interval: 3,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_sanitized_clamps_values() {
        let settings = SoundAlignSettings {
            volume: 4.0,
            min_frequency: 20,
            max_frequency: 20_000,
            speech_percentage_interval: 7,
            time_based_interval: 600,
            ..Default::default()
        }
        .sanitized();

        assert_eq!(settings.volume, 1.0);
        assert_eq!(settings.min_frequency, 110);
        assert_eq!(settings.max_frequency, 1760);
        assert_eq!(settings.speech_percentage_interval, 10);
        assert_eq!(settings.time_based_interval, 60);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_json_round_trip_keeps_key_names() {
        let json = SoundAlignSettings::default().to_json_string().unwrap();
        assert!(json.contains("\"addonBeepDirectionA\""));
        assert!(json.contains("\"speechPercentageInterval\""));
        assert!(json.contains("\"fadeAlgorithm\": \"cosine\""));
    }
}
