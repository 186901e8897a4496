use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Malformed input: {0}")]
    Format(String),

    #[error("Coefficient vector has {actual} entries, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Frame rejected: failure stress {stress} above usable threshold")]
    UnreliableFrame { stress: f32 },

    #[error("Tracking lost: failure stress {stress}, tracker must be reset")]
    TrackingLost { stress: f32 },

    #[error("Cannot open {path:?}: {source}")]
    ResourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No usable face after {attempts} detection attempts")]
    DetectionFailed { attempts: u32 },

    #[error("Tracking engine error: {0}")]
    Engine(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MeshError>;
