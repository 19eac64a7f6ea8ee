//! Static certificate index
//!
//! Reads a list of X.509 certificate files, publishes copies of them into an
//! output directory, and renders an `index.html` listing each one with its
//! expiry and SHA-256 / SHA-1 / MD5 fingerprints.
//!
//! ```text
//! {output}/index.html
//! {output}/certificates/{group}/{basename}.crt
//! ```

pub mod certificate;
pub mod config;
pub mod directory;
pub mod error;
pub mod fingerprint;
pub mod pipeline;
pub mod render;

pub use certificate::{
    output_basename, process_certificate, CertificateResult, Destination, Expiry,
};
pub use config::{CertificateGroup, CertificateSpec, Config};
pub use error::{CertificateError, ConfigError, Error, ErrorKind, Result};
pub use fingerprint::Fingerprints;
pub use pipeline::{
    build_directory_index, build_index, build_index_from_config, BuildReport, Failure, INDEX_FILE,
};
pub use render::GroupView;
