//! Beep classification
//!
//! Incoming beeps carry no category, so the kind is inferred from the
//! frequency/duration fingerprint of the well-known host sounds.

use soundalign_common::{Direction, SoundAlignSettings};
use std::fmt;

/// Addon beeps below this frequency use direction A, others direction B
pub const ADDON_SPLIT_HZ: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundKind {
    ErrorWarning,
    SoundEffect,
    ProgressIndicator,
    AddonBeep,
}

impl fmt::Display for SoundKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SoundKind::ErrorWarning => "error/warning",
            SoundKind::SoundEffect => "sound effect",
            SoundKind::ProgressIndicator => "progress indicator",
            SoundKind::AddonBeep => "addon beep",
        };
        f.write_str(name)
    }
}

/// Infer the kind of a beep from its frequency (Hz) and length (ms).
///
/// - 600 Hz / 300 ms: error or warning
/// - 110..=2000 Hz lasting 15..=60 ms, or 2000 Hz / 150 ms: progress
/// - anything else: addon beep
///
/// Sound effects are never inferred; they are only a configured direction
/// used by the test sequence.
pub fn classify(hz: f32, length_ms: u32) -> SoundKind {
    if hz == 600.0 && length_ms == 300 {
        return SoundKind::ErrorWarning;
    }

    let progress_band = (110.0..=2000.0).contains(&hz) && (15..=60).contains(&length_ms);
    if progress_band || (hz == 2000.0 && length_ms == 150) {
        return SoundKind::ProgressIndicator;
    }

    SoundKind::AddonBeep
}

/// Configured direction for a beep of this kind
pub fn direction_for(kind: SoundKind, hz: f32, settings: &SoundAlignSettings) -> Direction {
    match kind {
        SoundKind::ErrorWarning => settings.error_direction,
        SoundKind::SoundEffect => settings.effects_direction,
        SoundKind::ProgressIndicator => settings.progress_direction,
        SoundKind::AddonBeep if hz < ADDON_SPLIT_HZ => settings.addon_beep_direction_a,
        SoundKind::AddonBeep => settings.addon_beep_direction_b,
    }
}
