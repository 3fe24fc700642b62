//! Error types shared by every officemd pipeline.

use thiserror::Error;

/// Result type for officemd operations
pub type Result<T> = std::result::Result<T, OfficeError>;

/// Caller-facing classification of an [`OfficeError`].
///
/// Every failure maps onto exactly one of these kinds, so callers can
/// branch on the kind without matching the underlying collaborator error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The declared or detected extension has no synthesizer
    ExtensionUnsupported,
    /// A mandatory entry is missing or the content is malformed
    FileCorrupted,
    /// The input path does not resolve to a readable file
    FileDoesNotExist,
    /// The type of an in-memory buffer could not be detected
    ImproperBuffers,
    /// The input is neither a usable buffer nor a path
    InvalidInput,
}

/// Errors that can occur while extracting Markdown from a document
#[derive(Error, Debug)]
pub enum OfficeError {
    /// Extension is not one of the supported formats
    #[error("Unsupported extension: {0}")]
    ExtensionUnsupported(String),

    /// Mandatory entry missing or a reference points outside its table
    #[error("File is corrupted: {0}")]
    FileCorrupted(String),

    /// Path does not exist or is not a file
    #[error("File does not exist: {0}")]
    FileDoesNotExist(String),

    /// Buffer type could not be sniffed
    #[error("Improper buffers: unable to detect the document type of the buffer")]
    ImproperBuffers,

    /// Input is unusable
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error reading the ZIP container
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Error in streaming XML content
    #[error("XML parsing error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Error building an XML tree
    #[error("XML tree error: {0}")]
    XmlTree(#[from] roxmltree::Error),

    /// Error reported by the PDF engine
    #[error("PDF error: {0}")]
    Pdf(String),

    /// Error reading files
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A background extraction task failed to complete
    #[error("Extraction task failed: {0}")]
    Task(String),
}

impl OfficeError {
    /// Create an unsupported extension error
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::ExtensionUnsupported(extension.into())
    }

    /// Create a corrupted file error
    pub fn corrupted(reason: impl Into<String>) -> Self {
        Self::FileCorrupted(reason.into())
    }

    /// Create a missing file error
    pub fn missing(path: impl Into<String>) -> Self {
        Self::FileDoesNotExist(path.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput(reason.into())
    }

    /// Create a PDF engine error
    pub fn pdf(reason: impl std::fmt::Display) -> Self {
        Self::Pdf(reason.to_string())
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ExtensionUnsupported(_) => ErrorKind::ExtensionUnsupported,
            Self::FileDoesNotExist(_) | Self::Io(_) => ErrorKind::FileDoesNotExist,
            Self::ImproperBuffers => ErrorKind::ImproperBuffers,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::FileCorrupted(_)
            | Self::Archive(_)
            | Self::Xml(_)
            | Self::XmlTree(_)
            | Self::Pdf(_)
            | Self::Task(_) => ErrorKind::FileCorrupted,
        }
    }

    /// Get the error code for diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            Self::ExtensionUnsupported(_) => "OFFICE001",
            Self::FileCorrupted(_) => "OFFICE002",
            Self::FileDoesNotExist(_) => "OFFICE003",
            Self::ImproperBuffers => "OFFICE004",
            Self::InvalidInput(_) => "OFFICE005",
            Self::Archive(_) => "OFFICE006",
            Self::Xml(_) => "OFFICE007",
            Self::XmlTree(_) => "OFFICE008",
            Self::Pdf(_) => "OFFICE009",
            Self::Io(_) => "OFFICE010",
            Self::Task(_) => "OFFICE011",
        }
    }
}
