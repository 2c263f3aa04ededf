//! Error types for the export pipeline

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for export operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving or running an export job
#[derive(Error, Debug)]
pub enum Error {
    /// A numeric flag or token did not parse or was out of range
    #[error("Invalid {label}: {value}")]
    InvalidNumber { label: &'static str, value: String },

    /// A `--variant` token did not follow `name:WIDTHxHEIGHT[@SCALE][,key=value]`
    #[error("Variant \"{input}\" {reason}")]
    InvalidVariant { input: String, reason: String },

    /// A `,key=value` clause used a key the grammar does not know
    #[error("Unknown variant option \"{key}\" in \"{input}\"")]
    UnknownVariantOption { key: String, input: String },

    /// Image type other than jpeg, png or webp
    #[error("Unsupported image type: {0}")]
    UnsupportedEncoding(String),

    /// Two variants share a name and would write the same file
    #[error("Duplicate variant name: {0}")]
    DuplicateVariant(String),

    /// The source HTML document does not exist
    #[error("HTML file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// No discovery probe produced an existing executable
    #[error("No local Chrome/Chromium binary found. Set CHROME env var to your Chrome executable.")]
    BrowserNotFound,

    /// The browser was found but could not be launched
    #[error("Engine initialization failed: {0}")]
    InitializationError(String),

    /// Failed to load the source document
    #[error("Failed to load URL: {0}")]
    LoadError(String),

    /// Navigation did not reach network idle in time
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// The capture selector matched nothing
    #[error("Selector \"{selector}\" matched no element for variant \"{variant}\"")]
    SelectorNotFound { selector: String, variant: String },

    /// The capture selector matched an element without rendered area
    #[error("Selector \"{selector}\" rendered zero-sized element for variant \"{variant}\"")]
    ZeroSizedRegion { selector: String, variant: String },

    /// Failed to produce an image
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to execute JavaScript in the page
    #[error("Script execution failed: {0}")]
    ScriptError(String),

    /// CDP-specific error
    #[cfg(feature = "cdp")]
    #[error("CDP error: {0}")]
    CdpError(String),

    /// Filesystem failure while preparing or writing output
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Coarse classification of failures.
///
/// Every kind is fatal for the invocation; the classification only tells a
/// caller at which stage the job stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input, detected before any browser is launched
    Specification,
    /// No usable browser
    Environment,
    /// The document could not be loaded
    Load,
    /// A variant could not be captured or written
    Capture,
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Stage at which this error stopped the job.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidNumber { .. }
            | Error::InvalidVariant { .. }
            | Error::UnknownVariantOption { .. }
            | Error::UnsupportedEncoding(_)
            | Error::DuplicateVariant(_)
            | Error::SourceNotFound(_) => ErrorKind::Specification,
            Error::BrowserNotFound | Error::InitializationError(_) => ErrorKind::Environment,
            Error::LoadError(_) | Error::Timeout(_) => ErrorKind::Load,
            #[cfg(feature = "cdp")]
            Error::CdpError(_) => ErrorKind::Capture,
            Error::SelectorNotFound { .. }
            | Error::ZeroSizedRegion { .. }
            | Error::RenderError(_)
            | Error::ScriptError(_)
            | Error::Io { .. } => ErrorKind::Capture,
        }
    }
}

#[cfg(feature = "cdp")]
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::CdpError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_input() {
        let err = Error::UnknownVariantOption {
            key: "dpi".into(),
            input: "hero:800x600,dpi=3".into(),
        };
        assert_eq!(
            err.to_string(),
            "Unknown variant option \"dpi\" in \"hero:800x600,dpi=3\""
        );

        let err = Error::ZeroSizedRegion {
            selector: "#page".into(),
            variant: "high".into(),
        };
        assert!(err.to_string().contains("#page"));
        assert!(err.to_string().contains("high"));
    }

    #[test]
    fn kinds_follow_pipeline_stages() {
        assert_eq!(
            Error::SourceNotFound(PathBuf::from("/nope.html")).kind(),
            ErrorKind::Specification
        );
        assert_eq!(Error::BrowserNotFound.kind(), ErrorKind::Environment);
        assert_eq!(Error::Timeout(120_000).kind(), ErrorKind::Load);
        assert_eq!(
            Error::io("/tmp/x.jpg", std::io::Error::other("disk full")).kind(),
            ErrorKind::Capture
        );
    }
}
