// ---------------------------------------------------------------------------
// ExportError: typed errors for the export pipeline
// ---------------------------------------------------------------------------

use std::fmt;

/// The five ordered stages of an export run.  Failures carry the stage they
/// happened in; cleanup is not a stage because it always runs and never fails
/// the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    Isolate,
    PurgeContents,
    PurgeStructure,
    Serialize,
    Finalize,
}

impl fmt::Display for ExportStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExportStage::Isolate => "isolate",
            ExportStage::PurgeContents => "purge-contents",
            ExportStage::PurgeStructure => "purge-structure",
            ExportStage::Serialize => "serialize",
            ExportStage::Finalize => "finalize",
        };
        write!(f, "{name}")
    }
}

/// Errors that can occur during an export run.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error on the scratch file (create, write, read, delete).
    Io(std::io::Error),
    /// Bitcode encoding failed.
    Encode(String),
    /// Bitcode decoding failed (corrupt or foreign snapshot data).
    Decode(String),
    /// Snapshot header problems: bad magic, truncation, checksum mismatch,
    /// or a newer format version than this build supports.
    Header(String),
    /// The root entity vanished before the pipeline could use it.
    RootVanished,
    /// The requested root exists but is not a grid.
    NotAGrid,
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Io(e) => write!(f, "I/O error: {e}"),
            ExportError::Encode(msg) => write!(f, "Encoding error: {msg}"),
            ExportError::Decode(msg) => write!(f, "Decoding error: {msg}"),
            ExportError::Header(msg) => write!(f, "Snapshot header error: {msg}"),
            ExportError::RootVanished => write!(f, "Root entity no longer exists"),
            ExportError::NotAGrid => write!(f, "Root entity is not a grid"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        ExportError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_display_names() {
        assert_eq!(ExportStage::Isolate.to_string(), "isolate");
        assert_eq!(ExportStage::PurgeContents.to_string(), "purge-contents");
        assert_eq!(ExportStage::Serialize.to_string(), "serialize");
    }

    #[test]
    fn test_error_display_io() {
        let err = ExportError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing scratch dir",
        ));
        let msg = format!("{err}");
        assert!(msg.contains("I/O error"), "got: {msg}");
        assert!(msg.contains("missing scratch dir"), "got: {msg}");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: ExportError = io_err.into();
        assert!(matches!(err, ExportError::Io(_)));
    }

    #[test]
    fn test_error_source_only_for_io() {
        let err = ExportError::Io(std::io::Error::new(std::io::ErrorKind::Other, "x"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(std::error::Error::source(&ExportError::RootVanished).is_none());
    }
}
