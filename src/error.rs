use thiserror::Error;

use crate::canvas::ObjectId;
use crate::document::BlockId;

/// A canvas object whose geometry cannot be interpreted.
///
/// Raised per object; callers keep the offending object rather than dropping it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedObject {
    #[error("unknown path command `{0}`")]
    UnknownCommand(String),

    #[error("path command `{command}` expects {expected} coordinates, got {found}")]
    WrongArity {
        command: char,
        expected: usize,
        found: usize,
    },

    #[error("path command `{0}` has a non-numeric coordinate")]
    NonNumeric(char),

    #[error("path command `{0}` appears before any move-to")]
    MissingMoveTo(char),

    #[error("non-finite coordinate in {0}")]
    NonFinite(&'static str),

    #[error("negative circle radius {0}")]
    NegativeRadius(f32),
}

/// Errors returned by the eraser engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EraseError {
    #[error("eraser rectangle {0} is not on the canvas")]
    EraserNotFound(ObjectId),
}

/// Errors raised while choosing drawing tool settings
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ToolError {
    #[error("fill color {0} is reserved for the eraser")]
    ReservedColor(String),
}

/// Errors raised by document block operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DocumentError {
    #[error("no block with id {0}")]
    BlockNotFound(BlockId),

    #[error("document does not start with a title block")]
    MissingTitle,

    #[error("block index {index} is out of range (document has {len} blocks)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Errors that can occur while saving or loading notes
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to serialize notes: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No saved notes named {0}")]
    NotFound(String),

    #[error("Invalid notes name {0:?}: use a file name without folders")]
    InvalidName(String),
}

/// Errors raised while reading or creating the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to write default config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while rendering notes to PDF
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to render PDF: {0}")]
    Pdf(String),

    #[error("Failed to write PDF: {0}")]
    Persistence(#[from] PersistenceError),
}
