//! Audio data types
//!
//! `AudioFrameBuffer` is the unit handed from synthesis to the output worker:
//! a complete tone of interleaved 16-bit little-endian stereo frames.

use crate::synth::params::{CHANNELS, SAMPLE_RATE, SAMPLE_WIDTH};
use std::time::Duration;

/// Bytes in one interleaved stereo frame
pub const FRAME_BYTES: usize = SAMPLE_WIDTH * CHANNELS as usize;

/// Immutable block of 16-bit LE interleaved stereo frames.
///
/// Ownership moves from the producer into the playback queue and then to the
/// output worker. The buffer is never copied or mutated after packing.
#[derive(Debug, PartialEq, Eq)]
pub struct AudioFrameBuffer {
    bytes: Box<[u8]>,
}

impl AudioFrameBuffer {
    /// Pack interleaved i16 samples (L R L R ...) as little-endian bytes
    pub fn from_samples(samples: &[i16]) -> Self {
        let bytes: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
        Self {
            bytes: bytes.into_boxed_slice(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of stereo frames
    pub fn frame_count(&self) -> usize {
        self.bytes.len() / FRAME_BYTES
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the interleaved samples back to i16
    pub fn samples(&self) -> impl Iterator<Item = i16> + '_ {
        self.bytes
            .chunks_exact(SAMPLE_WIDTH)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
    }

    /// Playback duration at the engine sample rate
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.frame_count() as f64 / SAMPLE_RATE as f64)
    }
}
