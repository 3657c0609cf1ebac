//! Plain tone pass-through
//!
//! Plays an unmodified sine beep at a fixed balance. This is what every
//! non-progress sound goes through, and the fallback whenever the tone
//! engine has no running output worker.

use crate::audio::output::CpalSink;
use crate::audio::sink::OutputSink;
use crate::audio::types::AudioFrameBuffer;
use crate::error::{Error, Result};
use crate::synth::params::MAX_TONE_DURATION_SECS;
use crate::synth::{envelope, pack_stereo, synthesize, StereoGains, SynthesisParameters};
use crossbeam::channel::{bounded, RecvTimeoutError};
use soundalign_common::FadeAlgorithm;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Short edge fade so plain beeps do not click
const PLAIN_FADE_RATIO: f32 = 0.05;

/// How long `play_tone` waits to learn whether the device opened
const OPEN_WAIT: Duration = Duration::from_millis(500);

/// Something that can play a plain beep at a given balance
pub trait PlainTonePlayer: Send + Sync {
    /// Play `frequency` Hz for `duration_ms`, with per-channel volume 0-100.
    ///
    /// Returns once playback has been started; does not wait for it to end.
    fn play_tone(&self, frequency: f32, duration_ms: u32, left: u8, right: u8) -> Result<()>;
}

/// Render a plain beep: sine, short cosine fade, fixed channel volumes
pub fn render_plain_tone(
    frequency: f32,
    duration_ms: u32,
    left: u8,
    right: u8,
) -> Result<AudioFrameBuffer> {
    if duration_ms == 0 {
        return Err(Error::InvalidParameter(
            "tone duration must be positive, got 0 ms".to_string(),
        ));
    }
    if duration_ms as f32 > MAX_TONE_DURATION_SECS * 1000.0 {
        return Err(Error::InvalidParameter(format!(
            "tone duration {} ms exceeds the {} s limit",
            duration_ms, MAX_TONE_DURATION_SECS
        )));
    }
    if left > 100 || right > 100 {
        return Err(Error::InvalidParameter(format!(
            "balance must be 0-100, got left={} right={}",
            left, right
        )));
    }

    let params = SynthesisParameters {
        tone_duration_secs: duration_ms as f32 / 1000.0,
        ..Default::default()
    };
    let mut samples = synthesize(frequency, &params)?;
    envelope::apply_envelope(&mut samples, FadeAlgorithm::Cosine, PLAIN_FADE_RATIO);

    let gains = StereoGains::new(left as f32 / 100.0, right as f32 / 100.0);
    Ok(pack_stereo(&samples, gains, 1.0))
}

/// Plain tones on a short-lived cpal stream, one thread per beep
pub struct CpalPlainTone {
    device_name: Option<String>,
}

impl CpalPlainTone {
    pub fn new(device_name: Option<String>) -> Self {
        Self { device_name }
    }
}

impl PlainTonePlayer for CpalPlainTone {
    fn play_tone(&self, frequency: f32, duration_ms: u32, left: u8, right: u8) -> Result<()> {
        let buffer = render_plain_tone(frequency, duration_ms, left, right)?;
        let device_name = self.device_name.clone();
        let (opened_tx, opened_rx) = bounded::<Result<()>>(1);

        thread::Builder::new()
            .name("plain-tone".to_string())
            .spawn(move || {
                let mut sink = CpalSink::new(device_name);
                if let Err(e) = sink.open() {
                    let _ = opened_tx.send(Err(e));
                    return;
                }
                let _ = opened_tx.send(Ok(()));

                if let Err(e) = sink.write(&buffer) {
                    warn!("Plain tone write failed: {}", e);
                }
                if let Err(e) = sink.close() {
                    debug!("Plain tone close failed: {}", e);
                }
            })?;

        match opened_rx.recv_timeout(OPEN_WAIT) {
            Ok(result) => result,
            Err(RecvTimeoutError::Timeout) => {
                debug!("Plain tone device still opening, not waiting");
                Ok(())
            }
            Err(RecvTimeoutError::Disconnected) => Err(Error::DeviceUnavailable(
                "plain tone thread exited before opening the device".to_string(),
            )),
        }
    }
}
