//! # SoundAlign Common Library
//!
//! Shared code for the SoundAlign tone engine and its integration layers:
//! - Settings record (the flat key/value record owned by the host add-on)
//! - Stereo directions and waveform presets
//! - Fade curve definitions and envelope calculations
//! - Bootstrap configuration loading

pub mod config;
pub mod direction;
pub mod error;
pub mod fade_curves;
pub mod settings;
pub mod waveform;

pub use direction::Direction;
pub use error::{Error, Result};
pub use fade_curves::FadeAlgorithm;
pub use settings::SoundAlignSettings;
pub use waveform::WaveformType;
