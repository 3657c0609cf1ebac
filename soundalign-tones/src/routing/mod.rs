//! Integration layer
//!
//! Classifies incoming beeps and routes them to the tone engine or the plain
//! tone player, plus the user-facing test sequences.

pub mod classify;
pub mod router;

pub use classify::{classify, direction_for, SoundKind};
pub use router::{Announcer, BeepRoute, BeepRouter, FocusProgress, LogAnnouncer, ProgressReading};
pub use self_test::{test_beeps, test_progress, TestBeep};
