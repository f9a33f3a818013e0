use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::error::SyncError;
use crate::stem::StemData;

/// Convert a normalized volume control in [0.0, 1.0] into a linear gain.
///
/// The control maps to a decibel offset of `20 * (volume - 1.0)`, so 1.0 is
/// unity and 0.0 is -20 dB attenuation rather than silence. That floor is the
/// established mixer behavior and is asserted by tests; changing it to a true
/// mute is a product decision, not a cleanup.
pub fn volume_to_gain(volume: f32) -> f32 {
    let db = 20.0 * (volume - 1.0);
    10f32.powf(db / 20.0)
}

/// Mix decoded stems into one buffer.
///
/// The first stem fixes the mix's sample rate and channel layout. Later stems
/// that disagree on rate are skipped with a warning, never resampled; channel
/// mismatches are adapted where `StemData::with_channels` allows and skipped
/// otherwise. Shorter stems are zero-padded at the tail, nothing is
/// truncated, and the sum is scaled down by its peak if it clips.
pub fn mix_stems(tracks: &[(StemData, f32)]) -> Result<StemData, SyncError> {
    if tracks.is_empty() {
        return Err(SyncError::Mix("No tracks to mix".to_string()));
    }

    let mut mix: Option<StemData> = None;

    for (stem, volume) in tracks {
        let gain = volume_to_gain(*volume);

        if mix.is_none() {
            let mut base = stem.clone();
            for sample in &mut base.samples {
                *sample *= gain;
            }
            mix = Some(base);
            continue;
        }

        if let Some(base) = mix.as_mut() {
            if stem.sample_rate != base.sample_rate {
                warn!(
                    "Skipping stem at {} Hz, mix runs at {} Hz",
                    stem.sample_rate, base.sample_rate
                );
                continue;
            }

            let adapted = match stem.with_channels(base.channels) {
                Some(adapted) => adapted,
                None => {
                    warn!(
                        "Skipping stem with {} channels, mix has {}",
                        stem.channels, base.channels
                    );
                    continue;
                }
            };

            if base.samples.len() < adapted.samples.len() {
                base.samples.resize(adapted.samples.len(), 0.0);
            }
            for (i, &sample) in adapted.samples.iter().enumerate() {
                base.samples[i] += sample * gain;
            }
        }
    }

    let mut mixed = mix.ok_or_else(|| SyncError::Mix("No compatible tracks".to_string()))?;
    normalize(&mut mixed.samples);
    Ok(mixed)
}

/// Scale the buffer down by its peak when it exceeds full scale.
pub fn normalize(buffer: &mut [f32]) {
    if let Some(max) = buffer
        .iter()
        .map(|v| v.abs())
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    {
        if max > 1.0 {
            for sample in buffer.iter_mut() {
                *sample /= max;
            }
        }
    }
}

/// Decode a list of audio files into mix inputs.
///
/// A file that fails to decode is skipped with a warning and the rest keep
/// going; only ending up with nothing at all is an error. Missing volume
/// entries default to full volume.
pub fn decode_tracks(
    paths: &[PathBuf],
    volumes: Option<&[f32]>,
) -> Result<Vec<(StemData, f32)>, SyncError> {
    if paths.is_empty() {
        return Err(SyncError::Mix("No tracks to mix".to_string()));
    }

    let mut tracks = Vec::with_capacity(paths.len());
    for (i, path) in paths.iter().enumerate() {
        let volume = volumes.and_then(|v| v.get(i).copied()).unwrap_or(1.0);
        match StemData::from_wav(path) {
            Ok(stem) => tracks.push((stem, volume)),
            Err(e) => warn!("Skipping track {}: {}", path.display(), e),
        }
    }

    if tracks.is_empty() {
        return Err(SyncError::Mix("No compatible tracks".to_string()));
    }
    Ok(tracks)
}

/// Mix audio files into a single playback track on disk.
pub fn mix_files(
    paths: &[PathBuf],
    volumes: Option<&[f32]>,
    output: &Path,
) -> Result<PathBuf, SyncError> {
    let tracks = decode_tracks(paths, volumes)?;
    let mixed = mix_stems(&tracks)?;
    mixed.write_wav(output)?;
    info!(
        "Mixed {} tracks into {} ({:.2}s)",
        tracks.len(),
        output.display(),
        mixed.duration_secs()
    );
    Ok(output.to_path_buf())
}
