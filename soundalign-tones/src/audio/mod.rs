//! Audio output
//!
//! Device access through cpal, the `OutputSink` seam the output worker
//! writes to, and the plain tone pass-through player.

pub mod device;
pub mod output;
pub mod plain_tone;
pub mod ring_buffer;
pub mod sink;
pub mod types;

pub use output::CpalSink;
pub use plain_tone::{CpalPlainTone, PlainTonePlayer};
pub use sink::{OutputSink, SinkFactory};
pub use types::AudioFrameBuffer;
