use std::collections::VecDeque;

/// Post-mix processing knobs, mirroring the playback controls: tempo factor
/// (0.5 half speed .. 2.0 double speed), reverb room scale (0.0 dry .. 1.0),
/// and a decibel gain.
#[derive(Debug, Clone)]
pub struct PlaybackEffects {
    pub tempo: f32,
    pub reverb: f32,
    pub gain_db: f32,
}

impl Default for PlaybackEffects {
    fn default() -> Self {
        PlaybackEffects {
            tempo: 1.0,
            reverb: 0.0,
            gain_db: 0.0,
        }
    }
}

impl PlaybackEffects {
    pub fn is_identity(&self) -> bool {
        self.tempo == 1.0 && self.reverb == 0.0 && self.gain_db == 0.0
    }
}

/// Apply tempo, reverb and gain in that order to a mono buffer.
pub fn process(samples: &[f32], sample_rate: u32, effects: &PlaybackEffects) -> Vec<f32> {
    let mut audio = time_stretch(samples, sample_rate, effects.tempo);
    audio = reverb(&audio, sample_rate, effects.reverb);
    apply_gain_db(&mut audio, effects.gain_db);
    audio
}

/// Pitch-preserving tempo change by windowed overlap-add.
///
/// `factor` 2.0 doubles the speed (half the length), 0.5 halves it. Values
/// are clamped to [0.5, 2.0] and 1.0 returns the input as-is.
pub fn time_stretch(samples: &[f32], sample_rate: u32, factor: f32) -> Vec<f32> {
    if factor == 1.0 || samples.is_empty() {
        return samples.to_vec();
    }
    let factor = factor.clamp(0.5, 2.0);

    let frame = ((sample_rate as f32 * 0.05) as usize).max(4); // 50ms analysis window
    let hop_out = frame / 2;
    let hop_in = ((hop_out as f32) * factor) as usize;
    let out_len = (samples.len() as f32 / factor) as usize;

    if samples.len() < frame {
        return samples.to_vec();
    }

    let mut out = vec![0.0f32; out_len + frame];
    let mut window_sum = vec![0.0f32; out_len + frame];

    let mut in_pos = 0usize;
    let mut out_pos = 0usize;
    while in_pos + frame <= samples.len() && out_pos < out_len {
        for i in 0..frame {
            let w = hann(i, frame);
            out[out_pos + i] += samples[in_pos + i] * w;
            window_sum[out_pos + i] += w;
        }
        in_pos += hop_in.max(1);
        out_pos += hop_out;
    }

    for (sample, weight) in out.iter_mut().zip(&window_sum) {
        if *weight > 1e-6 {
            *sample /= weight;
        }
    }
    out.truncate(out_len);
    out
}

#[inline]
fn hann(i: usize, frame: usize) -> f32 {
    0.5 - 0.5 * (std::f32::consts::TAU * i as f32 / (frame - 1) as f32).cos()
}

/// Room reverb on a whole buffer. `room_scale` 0.0 is a no-op; the wet
/// output is re-normalized to full scale the way the playback path always
/// presented it.
pub fn reverb(samples: &[f32], sample_rate: u32, room_scale: f32) -> Vec<f32> {
    if room_scale <= 0.0 || samples.is_empty() {
        return samples.to_vec();
    }
    let room_scale = room_scale.min(1.0);

    let mut processor = ReverbProcessor::new(sample_rate as f32);
    let wet_level = 0.7 * room_scale;
    let room_size = 0.7 + 0.25 * room_scale;

    let mut out: Vec<f32> = samples
        .iter()
        .map(|&s| processor.process(s, room_size, wet_level))
        .collect();

    if let Some(max) = out
        .iter()
        .map(|v| v.abs())
        .max_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
    {
        if max > 0.0 {
            for sample in &mut out {
                *sample /= max;
            }
        }
    }
    out
}

/// Gain in decibels with a hard clip back into [-1.0, 1.0].
pub fn apply_gain_db(samples: &mut [f32], gain_db: f32) {
    if gain_db == 0.0 {
        return;
    }
    let gain = 10f32.powf(gain_db / 20.0);
    for sample in samples.iter_mut() {
        *sample = (*sample * gain).clamp(-1.0, 1.0);
    }
}

const COMB_COUNT: usize = 8;
const REVERB_DAMPING: f32 = 0.5;

pub struct ReverbProcessor {
    comb_buffers: Vec<VecDeque<f32>>,
    comb_filter_state: Vec<f32>,
    allpass_buffers: Vec<VecDeque<f32>>,
}

impl ReverbProcessor {
    pub fn new(sample_rate: f32) -> Self {
        let scale = sample_rate / 44100.0;
        let comb_delays = vec![ // Freeverb design, 8 combs
            (1116.0 * scale) as usize,
            (1188.0 * scale) as usize,
            (1277.0 * scale) as usize,
            (1356.0 * scale) as usize,
            (1422.0 * scale) as usize,
            (1491.0 * scale) as usize,
            (1557.0 * scale) as usize,
            (1617.0 * scale) as usize,
        ];

        let allpass_delays = vec![
            (556.0 * scale) as usize,
            (441.0 * scale) as usize,
            (341.0 * scale) as usize,
            (225.0 * scale) as usize,
        ];

        ReverbProcessor {
            comb_buffers: comb_delays
                .iter()
                .map(|&size| VecDeque::from(vec![0.0; size.max(1)]))
                .collect(),
            comb_filter_state: vec![0.0; COMB_COUNT],
            allpass_buffers: allpass_delays
                .iter()
                .map(|&size| VecDeque::from(vec![0.0; size.max(1)]))
                .collect(),
        }
    }

    pub fn process(&mut self, input: f32, room_size: f32, wet: f32) -> f32 {
        let mut output = 0.0;

        for i in 0..COMB_COUNT {
            let delayed = self.comb_buffers[i].back().copied().unwrap_or(0.0);

            self.comb_filter_state[i] =
                delayed * (1.0 - REVERB_DAMPING) + self.comb_filter_state[i] * REVERB_DAMPING;

            let feedback = self.comb_filter_state[i] * room_size;

            Self::cycle_buffer(&mut self.comb_buffers[i], input + feedback);

            output += delayed;
        }

        output /= COMB_COUNT as f32;

        for buffer in &mut self.allpass_buffers {
            let delayed = buffer.back().copied().unwrap_or(0.0);
            let new_val = output + delayed * 0.5;
            Self::cycle_buffer(buffer, new_val);
            output = delayed - output * 0.5;
        }

        input * (1.0 - wet) + output * wet
    }

    #[inline]
    fn cycle_buffer(buffer: &mut VecDeque<f32>, new_value: f32) {
        buffer.pop_back();
        buffer.push_front(new_value);
    }
}
