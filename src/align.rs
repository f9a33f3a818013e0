use std::cmp::Ordering;

use log::debug;

use crate::events::{AnnotatedWord, ChordEvent, Phrase, WordEvent};

/// A chord attaches to a word only if it starts within this many seconds of
/// the word's own start.
pub const CHORD_TOLERANCE_SECS: f64 = 0.5;

/// Floor on the playable length of a chord snippet, so very short words
/// still produce an audible strum.
pub const MIN_CHORD_SECS: f64 = 0.15;

/// Align lyric phrases with chord detections.
///
/// Flattens the phrases into one word sequence (in phrase order) and runs
/// [`align_events`] over it.
pub fn sync_lyrics_with_chords(lyrics: &[Phrase], chords: &[ChordEvent]) -> Vec<AnnotatedWord> {
    let words: Vec<WordEvent> = lyrics
        .iter()
        .flat_map(|phrase| phrase.words.iter().cloned())
        .collect();
    align_events(&words, chords)
}

/// Annotate each word with the chord sounding at it, if any.
///
/// Single forward pass with one monotone chord cursor: a chord is consumed
/// as soon as it starts at or before the current word's end, and it attaches
/// only when it also starts within [`CHORD_TOLERANCE_SECS`] of the word's
/// start. A consumed chord is never revisited, so a chord that misses its
/// word is dropped rather than reassigned to a later, closer word. Greedy
/// and O(words + chords) by construction, not a best-cost matching.
pub fn align_events(words: &[WordEvent], chords: &[ChordEvent]) -> Vec<AnnotatedWord> {
    let mut words: Vec<WordEvent> = words.to_vec();
    let mut chords: Vec<ChordEvent> = chords
        .iter()
        .filter(|chord| !chord.is_no_chord())
        .cloned()
        .collect();

    words.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));
    chords.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

    debug!("Aligning {} words against {} chords", words.len(), chords.len());

    let mut synced = Vec::with_capacity(words.len());
    let mut chord_index = 0;

    for word in words {
        let mut chord_to_place = None;

        // Only the cursor chord is ever examined for this word. If it starts
        // after the word ends it stays put for the next word; otherwise it is
        // consumed here whether or not it lands inside the tolerance window.
        if let Some(chord) = chords.get(chord_index) {
            if chord.start <= word.end {
                if (chord.start - word.start).abs() <= CHORD_TOLERANCE_SECS {
                    chord_to_place = Some(chord.chord.clone());
                }
                chord_index += 1;
            }
        }

        synced.push(AnnotatedWord {
            word: word.word,
            chord: chord_to_place,
            start: word.start,
            end: word.end,
        });
    }

    synced
}

/// Playable duration of a chord snippet attached to a word.
pub fn chord_duration(word: &AnnotatedWord) -> f64 {
    (word.end - word.start).max(MIN_CHORD_SECS)
}
