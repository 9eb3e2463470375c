//! Errors that reject a whole configuration load.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::xml::deserialize::DeserializeError;

/// A failed load. No partial configuration is ever returned alongside it.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read.
    #[error("IO error{context}: {source}")]
    Io {
        #[source]
        source: std::io::Error,
        context: ErrorContext,
    },

    /// The document is not well-formed XML.
    #[error("XML parsing error{context}: {message}")]
    Xml {
        message: String,
        context: ErrorContext,
    },

    /// The document is well-formed but is not an audio policy configuration.
    #[error("Structure error{context}: {message}")]
    Structure {
        message: String,
        context: ErrorContext,
    },

    /// The root element declares an unsupported version.
    #[error("Version mismatch{context}: expected '{expected}', found '{found}'")]
    VersionMismatch {
        expected: String,
        found: String,
        context: ErrorContext,
    },

    /// A collection aborted while loading the document body.
    #[error("Deserialization error{context}: {source}")]
    Deserialize {
        #[source]
        source: DeserializeError,
        context: ErrorContext,
    },
}

impl ConfigError {
    pub fn context(&self) -> &ErrorContext {
        match self {
            ConfigError::Io { context, .. }
            | ConfigError::Xml { context, .. }
            | ConfigError::Structure { context, .. }
            | ConfigError::VersionMismatch { context, .. }
            | ConfigError::Deserialize { context, .. } => context,
        }
    }

    /// Wrap a document parse failure.
    pub(crate) fn from_document(error: DeserializeError, context: ErrorContext) -> Self {
        match error {
            DeserializeError::Io(source) => ConfigError::Io { source, context },
            other => ConfigError::Xml {
                message: other.to_string(),
                context,
            },
        }
    }
}

/// Context information for error reporting.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorContext {
    /// The file being loaded, if the document came from a file.
    pub file_path: Option<PathBuf>,
    /// What was being parsed when the error occurred.
    pub parsing: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            file_path: Some(path.into()),
            parsing: None,
        }
    }

    /// Add parsing context information.
    pub fn with_parsing<S: Into<String>>(mut self, parsing: S) -> Self {
        self.parsing = Some(parsing.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();

        if let Some(ref path) = self.file_path {
            parts.push(format!(" in file '{}'", path.display()));
        }
        if let Some(ref parsing) = self.parsing {
            parts.push(format!(" while parsing {}", parsing));
        }

        write!(f, "{}", parts.join(","))
    }
}
