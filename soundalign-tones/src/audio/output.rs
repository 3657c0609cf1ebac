//! Audio output using cpal
//!
//! `CpalSink` owns one cpal output stream for the lifetime of an output
//! worker. Writes go into a lock-free sample ring; the device callback drains
//! it and plays silence whenever it runs dry, so the stream stays open
//! between tones.

use crate::audio::device;
use crate::audio::ring_buffer::{SampleConsumer, SampleProducer, SampleRing};
use crate::audio::sink::OutputSink;
use crate::audio::types::AudioFrameBuffer;
use crate::error::{Error, Result};
use crate::synth::params::SAMPLE_RATE;
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Device, FromSample, Sample, SampleFormat, SizedSample, Stream, StreamConfig};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Sleep between attempts while the ring is full
const WRITE_POLL: Duration = Duration::from_millis(5);

/// A write that makes no progress for this long has failed
const WRITE_STALL_TIMEOUT: Duration = Duration::from_secs(2);

/// Extra time allowed for the ring to drain on close
const DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Blocking cpal output sink
pub struct CpalSink {
    device_name: Option<String>,
    stream: Option<Stream>,
    producer: Option<SampleProducer>,
    /// Set by the stream error callback
    error_flag: Arc<AtomicBool>,
}

impl CpalSink {
    /// Sink for the named device (None = system default)
    pub fn new(device_name: Option<String>) -> Self {
        Self {
            device_name,
            stream: None,
            producer: None,
            error_flag: Arc::new(AtomicBool::new(false)),
        }
    }

    fn build_stream<S>(
        &self,
        device: &Device,
        config: &StreamConfig,
        mut consumer: SampleConsumer,
    ) -> Result<Stream>
    where
        S: SizedSample + FromSample<i16>,
    {
        let error_flag = Arc::clone(&self.error_flag);
        let mut scratch: Vec<i16> = Vec::new();

        device
            .build_output_stream(
                config,
                move |data: &mut [S], _: &cpal::OutputCallbackInfo| {
                    // Only grows when the host asks for a larger buffer than before
                    if scratch.len() < data.len() {
                        scratch.resize(data.len(), 0);
                    }
                    let scratch = &mut scratch[..data.len()];
                    consumer.fill(scratch);
                    for (out, sample) in data.iter_mut().zip(scratch.iter()) {
                        *out = S::from_sample(*sample);
                    }
                },
                move |err| {
                    error!("Audio stream error: {}", err);
                    error_flag.store(true, Ordering::SeqCst);
                },
                None,
            )
            .map_err(|e| Error::DeviceUnavailable(format!("Failed to build stream: {}", e)))
    }
}

/// Push every sample, sleeping while the ring is full
fn push_all(producer: &mut SampleProducer, samples: &[i16], error_flag: &AtomicBool) -> Result<()> {
    let mut offset = 0;
    let mut last_progress = Instant::now();

    while offset < samples.len() {
        if error_flag.load(Ordering::SeqCst) {
            return Err(Error::StreamWriteFailure(
                "device reported a stream error".to_string(),
            ));
        }

        let pushed = producer.push_slice(&samples[offset..]);
        if pushed > 0 {
            offset += pushed;
            last_progress = Instant::now();
            continue;
        }

        if last_progress.elapsed() > WRITE_STALL_TIMEOUT {
            return Err(Error::StreamWriteFailure(format!(
                "device stopped consuming samples ({} of {} written)",
                offset,
                samples.len()
            )));
        }
        thread::sleep(WRITE_POLL);
    }

    Ok(())
}

impl OutputSink for CpalSink {
    fn open(&mut self) -> Result<()> {
        let device = device::open_device(self.device_name.as_deref())?;
        let (config, sample_format) = device::stream_config(&device)?;
        let (producer, consumer) = SampleRing::default().split();

        self.error_flag.store(false, Ordering::SeqCst);
        let stream = match sample_format {
            SampleFormat::I16 => self.build_stream::<i16>(&device, &config, consumer)?,
            SampleFormat::F32 => self.build_stream::<f32>(&device, &config, consumer)?,
            SampleFormat::U16 => self.build_stream::<u16>(&device, &config, consumer)?,
            other => {
                return Err(Error::DeviceUnavailable(format!(
                    "Unsupported sample format: {:?}",
                    other
                )))
            }
        };

        stream
            .play()
            .map_err(|e| Error::DeviceUnavailable(format!("Failed to start stream: {}", e)))?;

        self.stream = Some(stream);
        self.producer = Some(producer);
        info!("Audio stream started");
        Ok(())
    }

    fn write(&mut self, buffer: &AudioFrameBuffer) -> Result<()> {
        let producer = self
            .producer
            .as_mut()
            .ok_or_else(|| Error::StreamWriteFailure("stream is not open".to_string()))?;

        let samples: Vec<i16> = buffer.samples().collect();
        producer.set_writing(true);
        let result = push_all(producer, &samples, &self.error_flag);
        producer.set_writing(false);
        result
    }

    fn close(&mut self) -> Result<()> {
        if let Some(producer) = self.producer.take() {
            let underruns = producer.underruns();
            if underruns > 0 {
                warn!("Audio stream had {} underruns while writing", underruns);
            } else {
                debug!("Audio stream closing with no underruns");
            }

            let ring_duration = Duration::from_secs_f64(
                producer.occupied() as f64 / (2.0 * SAMPLE_RATE as f64),
            );
            let deadline = Instant::now() + ring_duration + DRAIN_GRACE;

            while producer.occupied() > 0 && !self.error_flag.load(Ordering::SeqCst) {
                if Instant::now() > deadline {
                    warn!(
                        "Closing audio stream with {} samples unplayed",
                        producer.occupied()
                    );
                    break;
                }
                thread::sleep(WRITE_POLL);
            }
        }

        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                debug!("Failed to pause stream on close: {}", e);
            }
            drop(stream);
            info!("Audio stream closed");
        }
        Ok(())
    }

    fn is_active(&self) -> bool {
        self.stream.is_some() && !self.error_flag.load(Ordering::SeqCst)
    }
}

impl Drop for CpalSink {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.take() {
            let _ = stream.pause();
        }
    }
}
