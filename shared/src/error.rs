use thiserror::Error;

/// Failures the map view can surface. None are fatal; each is cleared by the
/// next successful fetch or image decode.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("fetch error: {0}")]
    Network(String),
    #[error("HTTP {0}")]
    HttpStatus(u16),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("map image failed to load ({url}): {reason}")]
    ImageDecode { url: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    ImageDecode,
}

impl MapError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Network(_) | Self::HttpStatus(_) | Self::Parse(_) => ErrorKind::Network,
            Self::ImageDecode { .. } => ErrorKind::ImageDecode,
        }
    }
}
