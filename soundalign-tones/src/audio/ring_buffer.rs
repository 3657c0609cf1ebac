//! Lock-free sample ring between the output worker and the device callback
//!
//! Single producer (worker thread, blocking writes) and single consumer
//! (cpal callback, never blocks). The callback plays silence whenever the
//! ring is empty, which is the normal state between tones. Running dry only
//! counts as an underrun while the producer is part way through a write.

use ringbuf::{traits::*, HeapCons, HeapProd, HeapRb};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

/// ~46 ms of stereo samples at 44.1 kHz
pub const DEFAULT_CAPACITY_SAMPLES: usize = 4096;

/// Ring of interleaved i16 samples
pub struct SampleRing {
    buffer: HeapRb<i16>,
    underruns: Arc<AtomicU64>,
    writing: Arc<AtomicBool>,
}

impl SampleRing {
    pub fn new(capacity: usize) -> Self {
        debug!("Creating sample ring with capacity: {} samples", capacity);
        Self {
            buffer: HeapRb::new(capacity),
            underruns: Arc::new(AtomicU64::new(0)),
            writing: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Split into the worker-side producer and callback-side consumer
    pub fn split(self) -> (SampleProducer, SampleConsumer) {
        let (producer, consumer) = self.buffer.split();
        (
            SampleProducer {
                producer,
                underruns: Arc::clone(&self.underruns),
                writing: Arc::clone(&self.writing),
            },
            SampleConsumer {
                consumer,
                underruns: self.underruns,
                writing: self.writing,
            },
        )
    }
}

impl Default for SampleRing {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY_SAMPLES)
    }
}

pub struct SampleProducer {
    producer: HeapProd<i16>,
    underruns: Arc<AtomicU64>,
    writing: Arc<AtomicBool>,
}

impl SampleProducer {
    /// Mark the start or end of a write; the consumer only counts
    /// underruns in between
    pub fn set_writing(&self, writing: bool) {
        self.writing.store(writing, Ordering::Release);
    }

    /// Push as many samples as fit; returns how many were taken
    pub fn push_slice(&mut self, samples: &[i16]) -> usize {
        self.producer.push_slice(samples)
    }

    /// Samples still waiting to be played
    pub fn occupied(&self) -> usize {
        self.producer.occupied_len()
    }

    /// Underruns counted by the consumer so far
    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}

pub struct SampleConsumer {
    consumer: HeapCons<i16>,
    underruns: Arc<AtomicU64>,
    writing: Arc<AtomicBool>,
}

impl SampleConsumer {
    /// Fill `out` from the ring, padding the rest with silence.
    ///
    /// Returns the number of real samples copied. Called from the audio
    /// callback, so it never blocks or allocates.
    pub fn fill(&mut self, out: &mut [i16]) -> usize {
        let copied = self.consumer.pop_slice(out);
        if copied < out.len() {
            out[copied..].fill(0);
            if self.writing.load(Ordering::Acquire) {
                // Producer is still mid-write: samples arrived late
                self.underruns.fetch_add(1, Ordering::Relaxed);
            }
        }
        copied
    }

    pub fn underruns(&self) -> u64 {
        self.underruns.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_fill() {
        let (mut producer, mut consumer) = SampleRing::new(8).split();
        assert_eq!(producer.push_slice(&[1, 2, 3, 4]), 4);
        assert_eq!(producer.occupied(), 4);

        let mut out = [9i16; 6];
        assert_eq!(consumer.fill(&mut out), 4);
        assert_eq!(out, [1, 2, 3, 4, 0, 0]);
        assert_eq!(producer.occupied(), 0);
    }

    #[test]
    fn test_tone_tail_is_not_an_underrun() {
        let (mut producer, mut consumer) = SampleRing::new(8).split();
        producer.set_writing(true);
        producer.push_slice(&[1, 2, 3, 4]);
        producer.set_writing(false);

        let mut out = [0i16; 6];
        assert_eq!(consumer.fill(&mut out), 4);
        assert_eq!(consumer.underruns(), 0);
        assert_eq!(producer.underruns(), 0);
    }

    #[test]
    fn test_running_dry_mid_write_counts_underrun() {
        let (mut producer, mut consumer) = SampleRing::new(8).split();
        producer.set_writing(true);
        producer.push_slice(&[1, 2]);

        let mut out = [0i16; 4];
        assert_eq!(consumer.fill(&mut out), 2);
        assert_eq!(consumer.fill(&mut out), 0);
        assert_eq!(producer.underruns(), 2);
    }

    #[test]
    fn test_full_ring_accepts_partial_push() {
        let (mut producer, _consumer) = SampleRing::new(4).split();
        assert_eq!(producer.push_slice(&[1, 2, 3, 4, 5, 6]), 4);
        assert_eq!(producer.push_slice(&[7]), 0);
    }

    #[test]
    fn test_empty_ring_plays_silence_without_counting() {
        let (_producer, mut consumer) = SampleRing::new(4).split();
        let mut out = [5i16; 4];
        assert_eq!(consumer.fill(&mut out), 0);
        assert_eq!(out, [0; 4]);
        assert_eq!(consumer.underruns(), 0);
    }
}
