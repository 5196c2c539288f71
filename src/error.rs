use std::error::Error;
use std::fmt;
use std::path::PathBuf;

/// Everything that can go wrong in the digestion/rendering pipeline.
///
/// Validation and lookup failures carry enough context for a user-facing
/// message; nothing here is ever silently swallowed into a partial result.
#[derive(Debug)]
pub enum GelSimError {
    EmptySequence,
    InvalidSequence { position: usize, symbol: char },
    UnknownEnzyme(String),
    RenderIo { path: PathBuf, source: image::ImageError },
}

impl Error for GelSimError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            GelSimError::RenderIo { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl fmt::Display for GelSimError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            GelSimError::EmptySequence => write!(f, "DNA sequence is empty"),
            GelSimError::InvalidSequence { position, symbol } => write!(
                f,
                "Invalid symbol '{symbol}' at position {position}; only A, T, G, C are allowed"
            ),
            GelSimError::UnknownEnzyme(name) => {
                write!(f, "Unknown restriction enzyme '{name}'")
            }
            GelSimError::RenderIo { path, source } => {
                write!(f, "Could not write gel image '{}': {source}", path.display())
            }
        }
    }
}
