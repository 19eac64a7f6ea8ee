//! Certificate list configuration
//!
//! The config file groups certificates under named headings:
//!
//! ```yaml
//! groups:
//!   - name: Root CAs
//!     description: Trust anchors
//!     certificates:
//!       - name: Example Root
//!         path: certs/root.pem
//!         filename: example-root
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Root of the configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Groups in display order
    #[serde(default)]
    pub groups: Vec<CertificateGroup>,
}

/// A heading in the index and the certificates listed under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateGroup {
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub deprecated: bool,

    /// Certificates in display order
    #[serde(default)]
    pub certificates: Vec<CertificateSpec>,
}

/// A single certificate entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSpec {
    /// Display name
    pub name: String,

    /// Source file location
    pub path: PathBuf,

    /// Basename the file is published under (without extension)
    #[serde(default, rename = "filename")]
    pub file_name: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub deprecated: bool,
}

impl Config {
    /// Load config from a specific file path
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse_document(&content)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?
            .ok_or_else(|| ConfigError::Empty {
                path: path.to_path_buf(),
            })
    }

    /// Parse config from YAML string. An empty document is an error.
    pub fn parse(content: &str) -> Result<Self, serde_yaml::Error> {
        Self::parse_document(content)?
            .ok_or_else(|| serde::de::Error::custom("config document is empty"))
    }

    /// `None` when the document is empty, comments only, or `null`
    fn parse_document(content: &str) -> Result<Option<Self>, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(None);
        }

        let value: serde_yaml::Value = serde_yaml::from_str(content)?;
        if value.is_null() {
            return Ok(None);
        }

        serde_yaml::from_value(value).map(Some)
    }

    /// Total number of certificate entries across all groups
    pub fn certificate_count(&self) -> usize {
        self.groups.iter().map(|g| g.certificates.len()).sum()
    }
}
