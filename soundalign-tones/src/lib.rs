//! # SoundAlign Tone Engine (soundalign-tones)
//!
//! Real-time synthesis and playback of progress tones for a screen reader.
//!
//! **Purpose:** Turn "progress at P% moving in direction D" into a short
//! stereo tone whose pitch and pan encode P, and stream it through a
//! continuously running output device without glitches.
//!
//! **Architecture:**
//! - `synth`: additive waveform synthesis, envelope, pan law, 16-bit packing
//! - `playback`: FIFO queue, dedicated output worker, engine facade,
//!   announcement debounce, liveness supervisor
//! - `audio`: output device access (cpal) and the plain tone pass-through
//! - `routing`: the thin integration layer classifying incoming beeps

pub mod audio;
pub mod error;
pub mod playback;
pub mod routing;
pub mod synth;

pub use error::{Error, Result};
pub use playback::ToneEngine;
pub use routing::BeepRouter;
pub use synth::SynthesisParameters;
