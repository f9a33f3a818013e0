use std::fs;
use std::path::{Path, PathBuf};

use playalong::events;
use playalong::mix;
use playalong::resolve;
use playalong::slice;
use playalong::stem::StemData;
use playalong::sync_lyrics_with_chords;

const RATE: u32 = 22050;

fn write_stem(dir: &Path, name: &str, seconds: f32) -> PathBuf {
    let frames = (seconds * RATE as f32) as usize;
    let samples: Vec<f32> = (0..frames)
        .map(|_| fastrand::f32() * 0.4 - 0.2)
        .collect();
    let path = dir.join(name);
    StemData {
        samples,
        sample_rate: RATE,
        channels: 1,
    }
    .write_wav(&path)
    .unwrap();
    path
}

fn write_results_dir(dir: &Path) -> (PathBuf, Vec<PathBuf>, Vec<PathBuf>) {
    let lyrics = dir.join("lyrics.json");
    fs::write(
        &lyrics,
        r#"[
            {"words": [
                {"word": "Hello", "start": 0.1, "end": 0.4},
                {"word": "darkness", "start": 0.5, "end": 1.0}
            ]},
            {"words": [
                {"word": "my", "start": 1.1, "end": 1.3},
                {"word": "old", "start": 1.4, "end": 1.7},
                {"word": "friend", "start": 1.8, "end": 2.3}
            ]}
        ]"#,
    )
    .unwrap();

    let piano_chords = dir.join("piano_chords.json");
    fs::write(
        &piano_chords,
        r#"[
            {"chord_simple_pop": "N", "start": 0.0, "end": 0.1},
            {"chord_simple_pop": "C:maj", "start": 0.2, "end": 1.0},
            {"chord_simple_pop": "G:maj", "start": 1.5, "end": 2.3}
        ]"#,
    )
    .unwrap();

    let guitar_chords = dir.join("guitar_chords.json");
    fs::write(
        &guitar_chords,
        r#"[{"chord_simple_pop": "C:maj", "start": 0.0, "end": 2.3}]"#,
    )
    .unwrap();

    let stems = vec![
        write_stem(dir, "piano_stem.wav", 2.5),
        write_stem(dir, "guitar_stem.wav", 2.0),
        write_stem(dir, "drums_stem.wav", 1.0),
    ];

    (lyrics, vec![piano_chords, guitar_chords], stems)
}

#[test]
fn play_along_flow_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let (lyrics_path, chord_files, stem_files) = write_results_dir(dir.path());

    // Resolve instruments: only piano has more than one chord event, so the
    // strict tier keeps it alone.
    let instruments = resolve::resolve_instruments(&chord_files, &stem_files);
    assert_eq!(instruments.len(), 1);
    let piano = &instruments["piano"];
    assert!(piano.audio.as_ref().unwrap().ends_with("piano_stem.wav"));

    // The muted instrument supplies the chord guide...
    let lyrics = events::load_lyrics(&lyrics_path).unwrap();
    let chords = events::load_chords(&piano.chords).unwrap();
    let synced = sync_lyrics_with_chords(&lyrics, &chords);

    assert_eq!(synced.len(), 5);
    let wire: Vec<_> = synced.iter().map(|w| w.to_wire()).collect();
    assert_eq!(wire[0].word, "{C:maj}Hello");
    assert!(wire[0].has_chord);
    assert!(!wire[1].has_chord);
    // The "N" sentinel never reaches the output.
    assert!(wire.iter().all(|w| !w.word.starts_with("{N}")));

    // ...its stem gets sliced into per-chord snippets...
    let audio = piano.audio.as_ref().unwrap();
    let (segments, rate) = slice::extract_chord_segments(audio, &piano.chords).unwrap();
    assert_eq!(rate, RATE);
    assert!(segments.contains_key("Cmaj_0"));
    assert!(segments.contains_key("Gmaj_0"));
    let expected = ((1.0 - 0.2) * RATE as f64) as usize;
    assert_eq!(segments["Cmaj_0"].len(), expected);

    // ...and everything else is mixed into the backing track.
    let active: Vec<PathBuf> = stem_files
        .iter()
        .filter(|path| !path.to_string_lossy().contains("piano"))
        .cloned()
        .collect();
    let output = dir.path().join("mixed_playback.wav");
    let written = mix::mix_files(&active, None, &output).unwrap();

    let mixed = StemData::from_wav(&written).unwrap();
    assert_eq!(mixed.sample_rate, RATE);
    // Mix runs as long as the longest active stem (guitar, 2.0s).
    assert_eq!(mixed.frames(), (2.0 * RATE as f32) as usize);
}

#[test]
fn corrupt_stem_degrades_gracefully() {
    let dir = tempfile::tempdir().unwrap();
    let good = write_stem(dir.path(), "bass_stem.wav", 0.5);
    let bad = dir.path().join("drums_stem.wav");
    fs::write(&bad, b"nothing like a wav").unwrap();

    let output = dir.path().join("mixed_playback.wav");
    let written = mix::mix_files(&[good, bad], None, &output).unwrap();
    let mixed = StemData::from_wav(&written).unwrap();
    assert_eq!(mixed.frames(), (0.5 * RATE as f32) as usize);
}
