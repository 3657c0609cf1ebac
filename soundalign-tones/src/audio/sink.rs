//! Output sink abstraction
//!
//! The output worker only ever talks to an `OutputSink`. Production uses the
//! cpal-backed [`CpalSink`](crate::audio::output::CpalSink); tests plug in
//! capturing or failing sinks.

use crate::audio::types::AudioFrameBuffer;
use crate::error::Result;
use std::sync::Arc;

/// Streaming destination for packed stereo frames.
///
/// Not `Send`: a sink is created and dropped on the worker thread that owns
/// it, which lets the cpal stream live there.
pub trait OutputSink {
    /// Acquire the device and start the stream
    fn open(&mut self) -> Result<()>;

    /// Blocking write of a whole buffer. Returns once the device has accepted
    /// every frame (it may still be playing the tail).
    fn write(&mut self, buffer: &AudioFrameBuffer) -> Result<()>;

    /// Let accepted frames finish playing, then release the device
    fn close(&mut self) -> Result<()>;

    /// True between a successful `open` and `close`
    fn is_active(&self) -> bool;
}

/// Builds a fresh sink for every worker start
pub type SinkFactory = Arc<dyn Fn() -> Box<dyn OutputSink> + Send + Sync>;
