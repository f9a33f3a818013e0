use std::collections::HashMap;
use std::path::Path;

use log::info;

use crate::error::SyncError;
use crate::events;
use crate::stem::StemData;

/// Chord label turned into a segment key: `:` dropped, `#` spelled out.
pub fn sanitize_chord_name(chord: &str) -> String {
    chord.replace(':', "").replace('#', "sharp")
}

/// Slice a stem recording into one mono segment per chord event.
///
/// Keys are sanitized chord names suffixed with a per-name occurrence index
/// (`Cmaj_0`, `Cmaj_1`, ...), so a consumer holding a chord label and its
/// occurrence count can find the matching audio. Returns the segments and
/// the stem's sample rate.
pub fn extract_chord_segments(
    audio_path: &Path,
    chords_path: &Path,
) -> Result<(HashMap<String, Vec<f32>>, u32), SyncError> {
    let stem = StemData::from_wav(audio_path)?;
    let chords = events::load_chords(chords_path)?;

    info!(
        "Slicing {} chords out of {}",
        chords.len(),
        audio_path.display()
    );

    let mono = stem.to_mono();
    let rate = stem.sample_rate;

    let mut instance_counts: HashMap<String, usize> = HashMap::new();
    let mut segments = HashMap::new();

    for chord in &chords {
        let start = ((chord.start * rate as f64) as usize).min(mono.len());
        let end = ((chord.end * rate as f64) as usize).clamp(start, mono.len());

        let name = sanitize_chord_name(&chord.chord);
        let count = instance_counts.entry(name.clone()).or_insert(0);
        let key = format!("{}_{}", name, count);
        *count += 1;

        segments.insert(key, mono[start..end].to_vec());
    }

    Ok((segments, rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn sanitizes_separators_and_accidentals() {
        assert_eq!(sanitize_chord_name("C:maj"), "Cmaj");
        assert_eq!(sanitize_chord_name("F#:min"), "Fsharpmin");
        assert_eq!(sanitize_chord_name("N"), "N");
    }

    #[test]
    fn segments_are_keyed_by_occurrence() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("piano.wav");
        StemData {
            samples: vec![0.1; 44100], // 1.0s
            sample_rate: 44100,
            channels: 1,
        }
        .write_wav(&wav)
        .unwrap();

        let chords = dir.path().join("piano_chords.json");
        fs::write(
            &chords,
            r#"[
                {"chord_simple_pop": "C:maj", "start": 0.0, "end": 0.25},
                {"chord_simple_pop": "F#:min", "start": 0.25, "end": 0.5},
                {"chord_simple_pop": "C:maj", "start": 0.5, "end": 0.75}
            ]"#,
        )
        .unwrap();

        let (segments, rate) = extract_chord_segments(&wav, &chords).unwrap();
        assert_eq!(rate, 44100);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments["Cmaj_0"].len(), 11025);
        assert_eq!(segments["Cmaj_1"].len(), 11025);
        assert!(segments.contains_key("Fsharpmin_0"));
    }

    #[test]
    fn out_of_range_events_clamp_to_the_buffer() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("short.wav");
        StemData {
            samples: vec![0.1; 4410], // 0.1s
            sample_rate: 44100,
            channels: 1,
        }
        .write_wav(&wav)
        .unwrap();

        let chords = dir.path().join("short_chords.json");
        fs::write(
            &chords,
            r#"[{"chord_simple_pop": "G:maj", "start": 0.05, "end": 9.0}]"#,
        )
        .unwrap();

        let (segments, _) = extract_chord_segments(&wav, &chords).unwrap();
        assert_eq!(segments["Gmaj_0"].len(), 4410 - 2205);
    }

    #[test]
    fn missing_audio_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let chords = dir.path().join("chords.json");
        fs::write(&chords, "[]").unwrap();
        assert!(extract_chord_segments(&dir.path().join("nope.wav"), &chords).is_err());
    }
}
