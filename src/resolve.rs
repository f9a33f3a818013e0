use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::Serialize;
use serde_json::Value;

/// Recognized instrument names, in match-precedence order.
pub const KNOWN_INSTRUMENTS: [&str; 5] = ["guitar", "piano", "vocals", "bass", "drums"];

/// Files backing one resolved instrument. The chord file is always present;
/// a chords-only instrument with no recorded stem is valid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentFiles {
    pub chords: PathBuf,
    pub audio: Option<PathBuf>,
}

/// Canonical instrument name for a file path: first recognized instrument
/// whose name appears in the path (case-insensitive), else the file stem.
pub fn instrument_name(path: &Path) -> String {
    let lowered = path.to_string_lossy().to_lowercase();
    for name in KNOWN_INSTRUMENTS {
        if lowered.contains(name) {
            return name.to_string();
        }
    }
    path.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

// A chord file only counts if it holds a JSON array; anything unreadable or
// differently shaped is treated as absent.
fn chord_event_count(path: &Path) -> Option<usize> {
    let content = fs::read_to_string(path).ok()?;
    match serde_json::from_str::<Value>(&content).ok()? {
        Value::Array(events) => Some(events.len()),
        _ => None,
    }
}

/// Map discovered chord and stem files to instruments.
///
/// Selection runs in two tiers and stops at the first that yields anything:
/// chord files with more than one event (vocals files count regardless of
/// event count), then any non-empty chord file. Each selected instrument is
/// paired with the first stem path containing its name; a missing stem is
/// warned about but kept.
pub fn resolve_instruments(
    chord_files: &[PathBuf],
    stem_files: &[PathBuf],
) -> BTreeMap<String, InstrumentFiles> {
    let counted: Vec<(&PathBuf, usize)> = chord_files
        .iter()
        .filter_map(|path| chord_event_count(path).map(|count| (path, count)))
        .collect();

    let mut selected: Vec<&PathBuf> = counted
        .iter()
        .filter(|(path, count)| {
            *count > 1 || path.to_string_lossy().to_lowercase().contains("vocals")
        })
        .map(|(path, _)| *path)
        .collect();

    if selected.is_empty() {
        selected = counted
            .iter()
            .filter(|(_, count)| *count >= 1)
            .map(|(path, _)| *path)
            .collect();
    }

    if selected.is_empty() {
        warn!("No valid chord files found");
        return BTreeMap::new();
    }

    let mut instruments = BTreeMap::new();
    for path in selected {
        let name = instrument_name(path);
        let needle = name.to_lowercase();
        let audio = stem_files
            .iter()
            .find(|stem| stem.to_string_lossy().to_lowercase().contains(&needle))
            .cloned();
        if audio.is_none() {
            warn!("Found {} chords, but no matching audio stem", name);
        }
        instruments.insert(
            name,
            InstrumentFiles {
                chords: path.clone(),
                audio,
            },
        );
    }
    instruments
}
