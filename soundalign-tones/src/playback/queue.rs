//! Playback queue
//!
//! Unbounded FIFO between caller threads (producers) and the output worker
//! (single consumer). A stop request travels through the same channel as a
//! sentinel, tagged with the worker generation it is meant for, so a stale
//! sentinel left over from a dead worker never stops its replacement.

use crate::audio::types::AudioFrameBuffer;
use crossbeam::channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::debug;

/// One entry in the playback queue
#[derive(Debug)]
pub enum QueueItem {
    Frames(AudioFrameBuffer),
    /// Stop the worker of this generation
    Stop { generation: u64 },
}

/// Outcome of a timed pop
#[derive(Debug)]
pub enum PopResult {
    Item(QueueItem),
    Timeout,
    /// Every sender is gone
    Disconnected,
}

/// FIFO of audio buffers plus stop sentinels.
///
/// Cloning yields another handle to the same queue. No duplicate
/// suppression: consecutive identical tones are all played.
#[derive(Clone)]
pub struct PlaybackQueue {
    sender: Sender<QueueItem>,
    receiver: Receiver<QueueItem>,
}

impl PlaybackQueue {
    pub fn new() -> Self {
        let (sender, receiver) = unbounded();
        Self { sender, receiver }
    }

    /// Append a buffer. Never blocks.
    pub fn push(&self, buffer: AudioFrameBuffer) {
        // Both ends live in self, so the channel cannot be disconnected here
        let _ = self.sender.send(QueueItem::Frames(buffer));
    }

    /// Append a stop sentinel for the given worker generation
    pub fn request_stop(&self, generation: u64) {
        let _ = self.sender.send(QueueItem::Stop { generation });
    }

    /// Remove the oldest item, waiting at most `timeout`
    pub fn pop_timeout(&self, timeout: Duration) -> PopResult {
        match self.receiver.recv_timeout(timeout) {
            Ok(item) => PopResult::Item(item),
            Err(RecvTimeoutError::Timeout) => PopResult::Timeout,
            Err(RecvTimeoutError::Disconnected) => PopResult::Disconnected,
        }
    }

    /// Discard every pending buffer.
    ///
    /// Stop sentinels survive the flush so a pending shutdown still happens.
    /// Returns the number of buffers dropped.
    pub fn flush(&self) -> usize {
        let mut dropped = 0;
        let mut stops = Vec::new();

        for item in self.receiver.try_iter() {
            match item {
                QueueItem::Frames(_) => dropped += 1,
                QueueItem::Stop { generation } => stops.push(generation),
            }
        }
        for generation in stops {
            self.request_stop(generation);
        }

        debug!("Flushed {} queued buffers", dropped);
        dropped
    }

    /// Items currently queued, sentinels included
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

impl Default for PlaybackQueue {
    fn default() -> Self {
        Self::new()
    }
}
