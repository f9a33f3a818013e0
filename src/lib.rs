//  _____   _                __     __          _        ____   _   _   _____
// |  __ \ | |         /\    \ \   / /    /\   | |      / __ \ | \ | | / ____|
// | |__) || |        /  \    \ \_/ /    /  \  | |     | |  | ||  \| || |  __
// |  ___/ | |       / /\ \    \   /    / /\ \ | |     | |  | || . ` || | |_ |
// | |     | |____  / ____ \    | |    / ____ \| |____ | |__| || |\  || |__| |
// |_|     |______|/_/    \_\   |_|   /_/    \_\|______| \____/ |_| \_| \_____|

pub mod error;
pub mod events;
pub mod align;
pub mod stem;
pub mod mix;
pub mod resolve;
pub mod slice;
pub mod effects;
pub mod playback;
pub mod server;

pub use error::SyncError;
pub use events::{AnnotatedWord, ChordEvent, Phrase, SyncedWord, WordEvent, NO_CHORD};
pub use align::{align_events, chord_duration, sync_lyrics_with_chords, CHORD_TOLERANCE_SECS, MIN_CHORD_SECS};
pub use stem::StemData;
pub use mix::{decode_tracks, mix_files, mix_stems, volume_to_gain};
pub use resolve::{resolve_instruments, InstrumentFiles, KNOWN_INSTRUMENTS};
pub use slice::{extract_chord_segments, sanitize_chord_name};
pub use effects::PlaybackEffects;
pub use playback::play_buffer;
pub use server::AppState;
