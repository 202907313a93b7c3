use std::fmt;

/// Why an inbound frame was dropped before reaching the board.
#[derive(Debug)]
pub enum ProtocolError {
    TooLarge { size: usize, limit: usize },
    Invalid(serde_json::Error),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::TooLarge { size, limit } => {
                write!(f, "Message of {} bytes exceeds limit of {} bytes", size, limit)
            }
            ProtocolError::Invalid(e) => write!(f, "Malformed message: {}", e),
        }
    }
}

impl std::error::Error for ProtocolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProtocolError::Invalid(e) => Some(e),
            ProtocolError::TooLarge { .. } => None,
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(e: serde_json::Error) -> Self {
        ProtocolError::Invalid(e)
    }
}
