use std::sync::{Arc, Mutex};
use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use log::info;

use crate::error::SyncError;

/// Play a mono buffer on the default output device, blocking until done.
///
/// The buffer is resampled to the device rate by linear interpolation, the
/// same way stems are read back anywhere else in the crate.
pub fn play_buffer(samples: &[f32], sample_rate: u32) -> Result<(), SyncError> {
    if samples.is_empty() {
        return Ok(());
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| SyncError::Audio("No output device found".to_string()))?;
    let config = device
        .default_output_config()
        .map_err(|e| SyncError::Audio(e.to_string()))?;
    let stream_config = config.config();

    let out_rate = stream_config.sample_rate.0 as f32;
    let channels = stream_config.channels as usize;
    let step = sample_rate as f32 / out_rate;
    let duration = samples.len() as f32 / sample_rate as f32;

    let buffer: Arc<Vec<f32>> = Arc::new(samples.to_vec());
    let position = Arc::new(Mutex::new(0.0f32));

    let cb_buffer = Arc::clone(&buffer);
    let cb_position = Arc::clone(&position);
    let stream = device
        .build_output_stream(
            &stream_config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut pos = cb_position.lock().unwrap();
                for frame in data.chunks_mut(channels) {
                    let idx = *pos as usize;
                    let value = if idx + 1 < cb_buffer.len() {
                        // Linear interpolation
                        let frac = *pos - idx as f32;
                        cb_buffer[idx] * (1.0 - frac) + cb_buffer[idx + 1] * frac
                    } else if idx < cb_buffer.len() {
                        cb_buffer[idx]
                    } else {
                        0.0
                    };
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                    *pos += step;
                }
            },
            |err| log::error!("Stream error: {}", err),
            None,
        )
        .map_err(|e| SyncError::Audio(e.to_string()))?;

    stream.play().map_err(|e| SyncError::Audio(e.to_string()))?;
    info!("Playing {:.1}s of audio", duration);

    // The callback runs on its own thread; wait for it to drain the buffer.
    std::thread::sleep(Duration::from_secs_f32(duration + 0.25));
    Ok(())
}
