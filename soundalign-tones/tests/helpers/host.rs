//! Stand-ins for the host side: plain tone player and announcer

use soundalign_tones::audio::PlainTonePlayer;
use soundalign_tones::routing::Announcer;
use soundalign_tones::Result;
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlainTone {
    pub hz: f32,
    pub duration_ms: u32,
    pub left: u8,
    pub right: u8,
}

/// Records plain tones instead of playing them
#[derive(Default)]
pub struct RecordingPlainTone {
    tones: Mutex<Vec<PlainTone>>,
}

impl RecordingPlainTone {
    pub fn tones(&self) -> Vec<PlainTone> {
        self.tones.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<PlainTone> {
        self.tones.lock().unwrap().last().copied()
    }
}

impl PlainTonePlayer for RecordingPlainTone {
    fn play_tone(&self, frequency: f32, duration_ms: u32, left: u8, right: u8) -> Result<()> {
        self.tones.lock().unwrap().push(PlainTone {
            hz: frequency,
            duration_ms,
            left,
            right,
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAnnouncer {
    messages: Mutex<Vec<String>>,
}

impl RecordingAnnouncer {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl Announcer for RecordingAnnouncer {
    fn announce(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}
