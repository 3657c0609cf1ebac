//! Output device lookup
//!
//! Device selection falls back to the system default when the named device
//! is missing. The stream format is fixed at 44.1 kHz stereo; only the
//! sample type is negotiated.

use crate::error::{Error, Result};
use crate::synth::params::{CHANNELS, SAMPLE_RATE};
use cpal::traits::{DeviceTrait, HostTrait};
use cpal::{Device, SampleFormat, StreamConfig};
use tracing::{debug, info, warn};

/// Sample types we can feed, in order of preference
const PREFERRED_FORMATS: [SampleFormat; 3] =
    [SampleFormat::I16, SampleFormat::F32, SampleFormat::U16];

/// List output device names
pub fn list_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();

    let devices: Vec<String> = host
        .output_devices()
        .map_err(|e| Error::DeviceUnavailable(format!("Failed to enumerate devices: {}", e)))?
        .filter_map(|device| device.name().ok())
        .collect();

    debug!("Found {} output devices", devices.len());
    Ok(devices)
}

/// Open the named output device, or the default one.
///
/// A name that cannot be found falls back to the default device.
pub fn open_device(device_name: Option<&str>) -> Result<Device> {
    let host = cpal::default_host();

    if let Some(name) = device_name {
        let mut devices = host
            .output_devices()
            .map_err(|e| Error::DeviceUnavailable(format!("Failed to enumerate devices: {}", e)))?;

        if let Some(device) = devices.find(|d| d.name().ok().as_deref() == Some(name)) {
            info!("Found requested audio device: {}", name);
            return Ok(device);
        }

        warn!("Requested device '{}' not found, falling back to default device", name);
    }

    let device = host
        .default_output_device()
        .ok_or_else(|| Error::DeviceUnavailable("No default output device found".to_string()))?;

    info!(
        "Using default audio device: {}",
        device.name().unwrap_or_else(|_| "Unknown".to_string())
    );
    Ok(device)
}

/// Pick a 44.1 kHz stereo configuration the device supports
pub fn stream_config(device: &Device) -> Result<(StreamConfig, SampleFormat)> {
    let supported: Vec<_> = device
        .supported_output_configs()
        .map_err(|e| Error::DeviceUnavailable(format!("Failed to get device configs: {}", e)))?
        .filter(|config| {
            config.channels() == CHANNELS
                && config.min_sample_rate().0 <= SAMPLE_RATE
                && config.max_sample_rate().0 >= SAMPLE_RATE
        })
        .collect();

    for format in PREFERRED_FORMATS {
        if let Some(config) = supported.iter().find(|c| c.sample_format() == format) {
            let config = config
                .clone()
                .with_sample_rate(cpal::SampleRate(SAMPLE_RATE))
                .config();
            debug!(
                "Audio config: sample_rate={}, channels={}, format={:?}",
                config.sample_rate.0, config.channels, format
            );
            return Ok((config, format));
        }
    }

    Err(Error::DeviceUnavailable(format!(
        "Device does not support {} Hz stereo output",
        SAMPLE_RATE
    )))
}
