//! Progress announcement debounce
//!
//! Decides when a progress update should also be spoken. Tones are never
//! gated here: the engine sounds every percent change regardless of what the
//! tracker decides.

use soundalign_common::SoundAlignSettings;
use std::time::{Duration, Instant};
use tracing::debug;

/// Identity of the control whose progress is being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TrackedObjectId(pub u64);

/// When to speak progress
#[derive(Debug, Clone, PartialEq)]
pub struct AnnouncementPolicy {
    /// Speak every N percent
    pub speech_interval: u32,
    /// Beep interval for mixed mode
    pub beep_interval: u32,
    /// Speak after this much time regardless of percent (zero = off)
    pub time_interval: Duration,
    pub mixed_mode: bool,
}

impl Default for AnnouncementPolicy {
    fn default() -> Self {
        Self::from_settings(&SoundAlignSettings::default())
    }
}

impl AnnouncementPolicy {
    pub fn from_settings(settings: &SoundAlignSettings) -> Self {
        Self {
            speech_interval: settings.speech_percentage_interval.max(1),
            beep_interval: settings.beep_percentage_interval.max(1),
            time_interval: Duration::from_secs(settings.time_based_interval as u64),
            mixed_mode: settings.mixed_mode,
        }
    }
}

/// Per-object debounce counters; `None` means never
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressAnnouncementState {
    pub last_spoken_percent: Option<f64>,
    pub last_beep_percent: Option<f64>,
    pub last_announced_at: Option<Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnouncementReason {
    /// Percent reached a multiple of the speech interval
    Interval,
    /// The time-based interval elapsed
    Elapsed,
}

/// A progress value that should be spoken
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Announcement {
    pub percent: f64,
    pub reason: AnnouncementReason,
}

impl Announcement {
    pub fn message(&self) -> String {
        format!("{}% complete", self.percent as i64)
    }
}

fn is_multiple(percent: f64, interval: u32) -> bool {
    percent % interval as f64 == 0.0
}

/// Debounce state for the progress object currently in focus
#[derive(Debug, Default)]
pub struct ProgressTracker {
    policy: AnnouncementPolicy,
    object: Option<TrackedObjectId>,
    state: ProgressAnnouncementState,
}

impl ProgressTracker {
    pub fn new(policy: AnnouncementPolicy) -> Self {
        Self {
            policy,
            object: None,
            state: ProgressAnnouncementState::default(),
        }
    }

    pub fn policy(&self) -> &AnnouncementPolicy {
        &self.policy
    }

    pub fn set_policy(&mut self, policy: AnnouncementPolicy) {
        self.policy = policy;
    }

    pub fn state(&self) -> &ProgressAnnouncementState {
        &self.state
    }

    pub fn observe(&mut self, object: TrackedObjectId, percent: f64) -> Option<Announcement> {
        self.observe_at(object, percent, Instant::now())
    }

    /// Record a progress value and decide whether to speak it.
    ///
    /// Negative or non-finite percents are never announced. A new object
    /// resets all counters so its first value can be announced.
    pub fn observe_at(
        &mut self,
        object: TrackedObjectId,
        percent: f64,
        now: Instant,
    ) -> Option<Announcement> {
        if !percent.is_finite() || percent < 0.0 {
            return None;
        }

        if self.object != Some(object) {
            debug!("Progress object changed to {:?}, resetting announcements", object);
            self.object = Some(object);
            self.state = ProgressAnnouncementState::default();
        }

        let time_interval = self.policy.time_interval;
        if !time_interval.is_zero() {
            let due = self
                .state
                .last_announced_at
                .map_or(true, |at| now.saturating_duration_since(at) >= time_interval);
            if due {
                self.state.last_announced_at = Some(now);
                self.state.last_spoken_percent = Some(percent);
                return Some(Announcement {
                    percent,
                    reason: AnnouncementReason::Elapsed,
                });
            }
        }

        let already_spoken = self.state.last_spoken_percent == Some(percent);
        if is_multiple(percent, self.policy.speech_interval) && !already_spoken {
            self.state.last_spoken_percent = Some(percent);
            return Some(Announcement {
                percent,
                reason: AnnouncementReason::Interval,
            });
        }

        // Mixed mode beep interval: recorded only, no audible effect yet
        if self.policy.mixed_mode
            && is_multiple(percent, self.policy.beep_interval)
            && self.state.last_beep_percent != Some(percent)
        {
            self.state.last_beep_percent = Some(percent);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJECT: TrackedObjectId = TrackedObjectId(1);

    fn tracker(speech_interval: u32) -> ProgressTracker {
        ProgressTracker::new(AnnouncementPolicy {
            speech_interval,
            beep_interval: 5,
            time_interval: Duration::ZERO,
            mixed_mode: false,
        })
    }

    #[test]
    fn test_debounce_sequence() {
        let mut tracker = tracker(10);
        let announced: Vec<f64> = [0.0, 3.0, 10.0, 10.0, 20.0]
            .into_iter()
            .filter_map(|p| tracker.observe(OBJECT, p))
            .map(|a| a.percent)
            .collect();
        assert_eq!(announced, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_object_change_resets() {
        let mut tracker = tracker(10);
        assert!(tracker.observe(OBJECT, 50.0).is_some());
        assert!(tracker.observe(OBJECT, 50.0).is_none());
        assert!(tracker.observe(TrackedObjectId(2), 50.0).is_some());
        assert_eq!(tracker.state().last_spoken_percent, Some(50.0));
    }

    #[test]
    fn test_time_trigger_takes_precedence() {
        let mut tracker = ProgressTracker::new(AnnouncementPolicy {
            speech_interval: 10,
            beep_interval: 5,
            time_interval: Duration::from_secs(3),
            mixed_mode: false,
        });
        let start = Instant::now();

        // Never announced: due immediately, even off-interval
        let first = tracker.observe_at(OBJECT, 7.0, start).unwrap();
        assert_eq!(first.reason, AnnouncementReason::Elapsed);

        // Within the window only the percent rule applies
        assert!(tracker.observe_at(OBJECT, 8.0, start + Duration::from_secs(1)).is_none());
        let interval = tracker
            .observe_at(OBJECT, 10.0, start + Duration::from_secs(2))
            .unwrap();
        assert_eq!(interval.reason, AnnouncementReason::Interval);

        let elapsed = tracker
            .observe_at(OBJECT, 13.0, start + Duration::from_secs(3))
            .unwrap();
        assert_eq!(elapsed.reason, AnnouncementReason::Elapsed);
        assert_eq!(elapsed.message(), "13% complete");
    }

    #[test]
    fn test_mixed_mode_records_beep_percent() {
        let mut tracker = ProgressTracker::new(AnnouncementPolicy {
            speech_interval: 10,
            beep_interval: 5,
            time_interval: Duration::ZERO,
            mixed_mode: true,
        });
        assert!(tracker.observe(OBJECT, 15.0).is_none());
        assert_eq!(tracker.state().last_beep_percent, Some(15.0));
        assert_eq!(tracker.state().last_spoken_percent, None);
    }

    #[test]
    fn test_negative_percent_ignored() {
        let mut tracker = tracker(10);
        assert!(tracker.observe(OBJECT, -1.0).is_none());
        assert!(tracker.observe(OBJECT, f64::NAN).is_none());
    }

    #[test]
    fn test_policy_from_settings() {
        let settings = SoundAlignSettings {
            speech_percentage_interval: 5,
            time_based_interval: 30,
            mixed_mode: true,
            ..Default::default()
        };
        let policy = AnnouncementPolicy::from_settings(&settings);
        assert_eq!(policy.speech_interval, 5);
        assert_eq!(policy.time_interval, Duration::from_secs(30));
        assert!(policy.mixed_mode);
    }
}
