use std::fmt;

impl std::error::Error for SyncError {}

#[derive(Debug, Clone)]
pub enum SyncError {
    Alignment(String),
    Mix(String),
    File(String),
    Decode(String),
    Audio(String),
    Server(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SyncError::Alignment(msg) => write!(f, "Alignment Error: {}", msg),
            SyncError::Mix(msg) => write!(f, "Mix Error: {}", msg),
            SyncError::File(msg) => write!(f, "File Error: {}", msg),
            SyncError::Decode(msg) => write!(f, "Decode Error: {}", msg),
            SyncError::Audio(msg) => write!(f, "Audio Error: {}", msg),
            SyncError::Server(msg) => write!(f, "Server Error: {}", msg),
        }
    }
}
