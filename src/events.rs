use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SyncError;

/// "No chord detected" label emitted by the chord analysis provider.
pub const NO_CHORD: &str = "N";

// Lyrics JSON arrives as an array of phrase objects; only the word list
// matters here, everything else the transcription service attaches is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Phrase {
    #[serde(default)]
    pub words: Vec<WordEvent>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WordEvent {
    pub word: String,
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChordEvent {
    // The analysis provider calls this field "chord_simple_pop".
    #[serde(rename = "chord_simple_pop", alias = "chord")]
    pub chord: String,
    pub start: f64,
    pub end: f64,
}

impl ChordEvent {
    pub fn is_no_chord(&self) -> bool {
        self.chord == NO_CHORD
    }
}

/// A lyric word with its chord annotation, if one landed on it.
///
/// This is the internal form: the chord stays a separate field so nothing
/// downstream has to re-parse bracket markers out of the word text. The
/// brace-embedded form only exists on the wire, see [`SyncedWord`].
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedWord {
    pub word: String,
    pub chord: Option<String>,
    pub start: f64,
    pub end: f64,
}

impl AnnotatedWord {
    pub fn has_chord(&self) -> bool {
        self.chord.is_some()
    }

    /// Word text with the chord label embedded as a `{chord}` prefix.
    pub fn display_text(&self) -> String {
        match &self.chord {
            Some(chord) => format!("{{{}}}{}", chord, self.word),
            None => self.word.clone(),
        }
    }

    pub fn to_wire(&self) -> SyncedWord {
        SyncedWord {
            word: self.display_text(),
            start: self.start,
            end: self.end,
            has_chord: self.chord.is_some(),
        }
    }
}

/// Wire form of an annotated word, matching what the frontend consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncedWord {
    pub word: String,
    pub start: f64,
    pub end: f64,
    pub has_chord: bool,
}

pub fn load_lyrics(path: &Path) -> Result<Vec<Phrase>, SyncError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SyncError::File(format!("{}: {}", path.display(), e)))?;
    parse_lyrics(&content)
}

pub fn load_chords(path: &Path) -> Result<Vec<ChordEvent>, SyncError> {
    let content = fs::read_to_string(path)
        .map_err(|e| SyncError::File(format!("{}: {}", path.display(), e)))?;
    parse_chords(&content)
}

pub fn parse_lyrics(json: &str) -> Result<Vec<Phrase>, SyncError> {
    serde_json::from_str(json)
        .map_err(|e| SyncError::Alignment(format!("Invalid lyrics JSON: {}", e)))
}

pub fn parse_chords(json: &str) -> Result<Vec<ChordEvent>, SyncError> {
    serde_json::from_str(json)
        .map_err(|e| SyncError::Alignment(format!("Invalid chords JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_phrased_lyrics() {
        let json = r#"[
            {"text": "hello there", "words": [
                {"word": "hello", "start": 0.1, "end": 0.4},
                {"word": "there", "start": 0.5, "end": 0.9}
            ]},
            {"text": "instrumental"}
        ]"#;
        let phrases = parse_lyrics(json).unwrap();
        assert_eq!(phrases.len(), 2);
        assert_eq!(phrases[0].words.len(), 2);
        assert!(phrases[1].words.is_empty());
    }

    #[test]
    fn parses_provider_and_plain_chord_fields() {
        let provider = r#"[{"chord_simple_pop": "C:maj", "start": 0.0, "end": 1.0}]"#;
        let plain = r#"[{"chord": "G:min", "start": 1.0, "end": 2.0}]"#;
        assert_eq!(parse_chords(provider).unwrap()[0].chord, "C:maj");
        assert_eq!(parse_chords(plain).unwrap()[0].chord, "G:min");
    }

    #[test]
    fn missing_required_field_is_an_alignment_error() {
        let json = r#"[{"words": [{"word": "hello", "start": 0.1}]}]"#;
        match parse_lyrics(json) {
            Err(SyncError::Alignment(_)) => {}
            other => panic!("expected alignment error, got {:?}", other),
        }
    }

    #[test]
    fn wire_form_embeds_chord_marker() {
        let word = AnnotatedWord {
            word: "Hello".to_string(),
            chord: Some("C:maj".to_string()),
            start: 0.12,
            end: 0.45,
        };
        let wire = word.to_wire();
        assert_eq!(wire.word, "{C:maj}Hello");
        assert!(wire.has_chord);

        let value = serde_json::to_value(&wire).unwrap();
        assert_eq!(value["word"], "{C:maj}Hello");
        assert_eq!(value["has_chord"], true);
    }

    #[test]
    fn wire_form_without_chord_is_untouched() {
        let word = AnnotatedWord {
            word: "Hello".to_string(),
            chord: None,
            start: 0.12,
            end: 0.45,
        };
        let wire = word.to_wire();
        assert_eq!(wire.word, "Hello");
        assert!(!wire.has_chord);
    }
}
