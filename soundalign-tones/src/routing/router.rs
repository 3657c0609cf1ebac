//! Beep routing
//!
//! Entry point for every beep the host would otherwise play. Progress beeps
//! become synthesized, panned tones; everything else is replayed as a plain
//! tone at the balance configured for its kind.

use crate::audio::plain_tone::PlainTonePlayer;
use crate::playback::engine::{ToneEngine, ToneOutcome};
use crate::playback::tracker::{AnnouncementPolicy, TrackedObjectId};
use crate::routing::classify::{classify, direction_for, SoundKind};
use crate::synth::panner::{fixed_gains, progress_pan};
use crate::synth::SynthesisParameters;
use soundalign_common::{Direction, SoundAlignSettings, WaveformType};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

/// Receives spoken progress messages
pub trait Announcer: Send + Sync {
    fn announce(&self, message: &str);
}

/// Announcer that only logs
#[derive(Debug, Default)]
pub struct LogAnnouncer;

impl Announcer for LogAnnouncer {
    fn announce(&self, message: &str) {
        info!("Announcement: {}", message);
    }
}

/// Progress value read from the focused control
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressReading {
    Value(f64),
    /// Busy control without a value
    Indeterminate,
    /// Nothing readable; derive the percent from the beep frequency
    Unknown,
}

/// The focused control at the time of a beep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusProgress {
    pub object: TrackedObjectId,
    pub reading: ProgressReading,
}

/// What `handle_beep` did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BeepRoute {
    /// Inactive: replayed exactly as requested
    PassThrough,
    /// Handed to the tone engine
    Progress { tone: ToneOutcome },
    /// Original-tone waveform: plain tone panned by percent
    OriginalTone { left: u8, right: u8 },
    /// Plain tone at the fixed balance for its kind
    Fixed { kind: SoundKind, left: u8, right: u8 },
}

pub struct BeepRouter {
    engine: Arc<ToneEngine>,
    plain: Arc<dyn PlainTonePlayer>,
    announcer: Arc<dyn Announcer>,
    settings: RwLock<SoundAlignSettings>,
}

impl BeepRouter {
    pub fn new(
        engine: Arc<ToneEngine>,
        plain: Arc<dyn PlainTonePlayer>,
        announcer: Arc<dyn Announcer>,
        settings: SoundAlignSettings,
    ) -> Self {
        let router = Self {
            engine,
            plain,
            announcer,
            settings: RwLock::new(SoundAlignSettings::default()),
        };
        router.apply_settings(settings);
        router
    }

    pub fn engine(&self) -> &Arc<ToneEngine> {
        &self.engine
    }

    pub fn settings(&self) -> SoundAlignSettings {
        self.settings
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Install a new settings record and push it into the engine.
    ///
    /// Out-of-range values are clamped first. If the record is active and
    /// the output worker is not running, a start is attempted.
    pub fn apply_settings(&self, settings: SoundAlignSettings) {
        let settings = settings.sanitized();

        if let Err(e) = self
            .engine
            .apply_settings(SynthesisParameters::from_settings(&settings))
        {
            warn!("Rejected synthesis settings: {}", e);
        }
        self.engine
            .apply_announcement_policy(AnnouncementPolicy::from_settings(&settings));
        self.engine.set_enabled(settings.is_active);

        info!(
            "Settings applied - waveform: {}, fade: {}, volume: {}, range: {}-{} Hz",
            settings.waveform_type.display_name(),
            settings.fade_algorithm,
            settings.volume,
            settings.min_frequency,
            settings.max_frequency
        );

        let active = settings.is_active;
        *self
            .settings
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = settings;

        if active && !self.engine.is_worker_alive() {
            if let Err(e) = self.engine.ensure_worker() {
                warn!("Output worker not running after settings change: {}", e);
            }
        }
    }

    /// Turn routing on or off. Inactive routing replays beeps unchanged.
    pub fn set_active(&self, active: bool) {
        let mut settings = self.settings();
        settings.is_active = active;
        self.apply_settings(settings);
        self.announcer
            .announce(if active { "SoundAlign on" } else { "SoundAlign off" });
    }

    pub fn is_active(&self) -> bool {
        self.settings().is_active
    }

    /// Route one beep.
    ///
    /// `left`/`right` are the caller's balance (0-100), used verbatim when
    /// routing is inactive and as the fallback when a progress tone cannot
    /// be produced. Never fails; plain tone errors are logged.
    pub fn handle_beep(
        &self,
        hz: f32,
        length_ms: u32,
        left: u8,
        right: u8,
        focus: Option<FocusProgress>,
    ) -> BeepRoute {
        let settings = self.settings();
        if !settings.is_active {
            debug!("Routing inactive, passing beep through");
            self.play_plain(hz, length_ms, left, right);
            return BeepRoute::PassThrough;
        }

        let kind = classify(hz, length_ms);
        let direction = direction_for(kind, hz, &settings);
        debug!("Beep {} Hz / {} ms is {} ({})", hz, length_ms, kind, direction);

        if kind != SoundKind::ProgressIndicator {
            let (left, right) = fixed_gains(direction).to_balance();
            self.play_plain(hz, length_ms, left, right);
            return BeepRoute::Fixed { kind, left, right };
        }

        let object = focus.map_or(TrackedObjectId(0), |f| f.object);
        let reading = focus.map_or(ProgressReading::Unknown, |f| f.reading);

        if settings.waveform_type == WaveformType::OriginalTone {
            let percent = match reading {
                ProgressReading::Value(p) if p >= 0.0 => p.min(100.0),
                _ => percent_from_hz(hz, &settings),
            };
            self.announce(self.engine.track_progress(object, percent).map(|a| a.message()));

            let pan = progress_pan(Some(percent as f32), direction);
            let (left, right) = linear_balance(pan);
            self.play_plain(hz, length_ms, left, right);
            return BeepRoute::OriginalTone { left, right };
        }

        let percent = match reading {
            ProgressReading::Value(p) => Some(p),
            ProgressReading::Indeterminate => None,
            ProgressReading::Unknown => Some(percent_from_hz(hz, &settings)),
        };

        let outcome = self.engine.notify_progress(percent, direction, object);
        self.announce(outcome.announcement.map(|a| a.message()));

        if outcome.tone == ToneOutcome::Unavailable {
            debug!("Progress tone unavailable, falling back to plain tone");
            self.play_plain(hz, length_ms, left, right);
        }
        BeepRoute::Progress { tone: outcome.tone }
    }

    fn announce(&self, message: Option<String>) {
        if let Some(message) = message {
            self.announcer.announce(&message);
        }
    }

    pub(crate) fn play_plain(&self, hz: f32, length_ms: u32, left: u8, right: u8) {
        if let Err(e) = self.plain.play_tone(hz, length_ms, left, right) {
            warn!("Plain tone {} Hz failed: {}", hz, e);
        }
    }
}

/// Percent implied by a beep frequency within the configured range, 0..=100
pub fn percent_from_hz(hz: f32, settings: &SoundAlignSettings) -> f64 {
    let min = settings.min_frequency as f64;
    let max = settings.max_frequency as f64;
    if max <= min {
        return 50.0;
    }
    ((hz as f64 - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// Balance for the original-tone mode: linear (1 - pan, pan)
pub fn linear_balance(pan: f32) -> (u8, u8) {
    let pan = pan.clamp(0.0, 1.0);
    let scale = |v: f32| (v * 100.0) as u8;
    (scale(1.0 - pan), scale(pan))
}

/// Balance for a fixed direction
pub fn balance_for(direction: Direction) -> (u8, u8) {
    fixed_gains(direction).to_balance()
}
