//! Test helper modules for soundalign-tones integration tests
//!
//! - Capture / CaptureSink: record output instead of opening a device
//! - UnavailableSink: device that never opens
//! - RecordingPlainTone / RecordingAnnouncer: host-side stand-ins

#![allow(dead_code)]

pub mod audio_capture;
pub mod host;

pub use audio_capture::{
    capture_factory, failing_write_factory, unavailable_factory, Capture, CaptureSink,
};
pub use host::{PlainTone, RecordingAnnouncer, RecordingPlainTone};
