use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failures of the persistence operations. Everything else on the canvas
/// (undo/redo on an empty history, resize, strokes) is infallible.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("cannot decode `{}`: {reason}", .path.display())]
    Decode { path: PathBuf, reason: String },

    #[error("cannot encode `{}`: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },
}

impl CanvasError {
    pub fn decode(path: &Path, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub fn encode(path: &Path, reason: impl ToString) -> Self {
        Self::Encode {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }
}
