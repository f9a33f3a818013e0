use std::fs;
use std::io;
use std::path::Path;

use log::info;

use crate::error::SyncError;

/// Decoded audio for one instrument stem. Samples are interleaved f32 in
/// [-1.0, 1.0] at the stem's native rate.
#[derive(Debug, Clone, PartialEq)]
pub struct StemData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl StemData {
    /// Decode a .wav file into an f32 sample buffer
    pub fn from_wav(path: &Path) -> Result<Self, SyncError> {
        let data = fs::read(path)
            .map_err(|e| SyncError::File(format!("{}: {}", path.display(), e)))?;
        let cursor = io::Cursor::new(data);
        let mut reader = hound::WavReader::new(cursor)
            .map_err(|e| SyncError::Decode(format!("{}: {}", path.display(), e)))?;
        let spec = reader.spec();

        info!(
            "Loading stem '{}': {} Hz, {} channels",
            path.display(),
            spec.sample_rate,
            spec.channels
        );

        let samples: Result<Vec<f32>, hound::Error> = match (spec.sample_format, spec.bits_per_sample)
        {
            (hound::SampleFormat::Float, _) => reader.samples::<f32>().collect(),
            (hound::SampleFormat::Int, 16) => reader
                .samples::<i16>()
                .map(|r| r.map(|s| s as f32 / 32768.0)) // i16 audio samples range from -32768 to 32767
                .collect(),
            (hound::SampleFormat::Int, bits) => {
                let scale = (1u64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|r| r.map(|s| s as f32 / scale))
                    .collect()
            }
        };
        let samples =
            samples.map_err(|e| SyncError::Decode(format!("{}: {}", path.display(), e)))?;

        Ok(StemData {
            samples,
            sample_rate: spec.sample_rate,
            channels: spec.channels.max(1),
        })
    }

    /// Write the buffer out as 16-bit PCM WAV.
    pub fn write_wav(&self, path: &Path) -> Result<(), SyncError> {
        let spec = hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec)
            .map_err(|e| SyncError::File(format!("{}: {}", path.display(), e)))?;
        for &sample in &self.samples {
            let clamped = sample.clamp(-1.0, 1.0);
            writer
                .write_sample((clamped * 32767.0) as i16)
                .map_err(|e| SyncError::File(format!("{}: {}", path.display(), e)))?;
        }
        writer
            .finalize()
            .map_err(|e| SyncError::File(format!("{}: {}", path.display(), e)))
    }

    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration_secs(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    /// Fold interleaved channels down to a single mono buffer by averaging
    /// each frame.
    pub fn to_mono(&self) -> Vec<f32> {
        if self.channels <= 1 {
            return self.samples.clone();
        }
        let channels = self.channels as usize;
        self.samples
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
            .collect()
    }

    /// Rebuild the buffer with a different channel count: mono spreads by
    /// frame replication, multichannel folds to mono by averaging. Any other
    /// conversion returns None and the caller decides what to skip.
    pub fn with_channels(&self, channels: u16) -> Option<StemData> {
        if channels == self.channels {
            return Some(self.clone());
        }
        if self.channels == 1 {
            let mut samples = Vec::with_capacity(self.samples.len() * channels as usize);
            for &sample in &self.samples {
                for _ in 0..channels {
                    samples.push(sample);
                }
            }
            return Some(StemData {
                samples,
                sample_rate: self.sample_rate,
                channels,
            });
        }
        if channels == 1 {
            return Some(StemData {
                samples: self.to_mono(),
                sample_rate: self.sample_rate,
                channels: 1,
            });
        }
        None
    }
}
