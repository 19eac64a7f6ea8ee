//! Error types for loading, processing and rendering

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("--config is required")]
    EmptyPath,

    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Config file {path:?} is empty")]
    Empty { path: PathBuf },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Broad class of a certificate failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Opening, reading, writing or copying failed
    Io,
    /// The envelope or the certificate structure is invalid
    Parse,
}

/// Errors raised while processing a single certificate.
///
/// Each variant names the step that failed.
#[derive(Debug, Error)]
pub enum CertificateError {
    #[error("opening certificate file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading certificate file: {0}")]
    Read(#[source] io::Error),

    #[error("decoding PEM envelope: {0}")]
    Envelope(String),

    #[error("parsing certificate: {0}")]
    Parse(String),

    #[error("certificate expiry {0} is out of range")]
    Expiry(i64),

    #[error("hashing with {algorithm}: {source}")]
    Hash {
        algorithm: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("creating folder structure {path:?}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("copying certificate file to {path:?}: {source}")]
    Copy {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading description {path:?}: {source}")]
    Description {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CertificateError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CertificateError::Envelope(_)
            | CertificateError::Parse(_)
            | CertificateError::Expiry(_) => ErrorKind::Parse,
            _ => ErrorKind::Io,
        }
    }
}

/// Run-level errors; any of these aborts a build
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to parse config")]
    Config(#[from] ConfigError),

    #[error("error creating output folder {path:?}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error rendering {path:?}")]
    Render {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let err = CertificateError::Envelope("no PEM block".to_string());
        assert_eq!(err.kind(), ErrorKind::Parse);

        let err = CertificateError::Open {
            path: PathBuf::from("/missing.crt"),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_certificate_error_names_step() {
        let err = CertificateError::Hash {
            algorithm: "SHA256",
            source: io::Error::other("boom"),
        };
        assert_eq!(err.to_string(), "hashing with SHA256: boom");
    }

    #[test]
    fn test_config_error_source_chain() {
        let err = Error::from(ConfigError::EmptyPath);
        assert_eq!(err.to_string(), "failed to parse config");

        let source = std::error::Error::source(&err).map(|e| e.to_string());
        assert_eq!(source.as_deref(), Some("--config is required"));
    }
}
