//! File fingerprints
//!
//! Digests are taken over the bytes exactly as stored on disk, not over the
//! decoded DER.

use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::io::{self, Read, Seek};
use tracing::trace;

use crate::error::CertificateError;

/// Lowercase hex digests of a certificate file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprints {
    pub sha256: String,
    pub sha1: String,
    pub md5: String,
}

impl Fingerprints {
    /// Compute all three digests, rewinding the source before each one
    pub fn compute<R: Read + Seek>(source: &mut R) -> Result<Self, CertificateError> {
        let sha256 = hex_digest::<Sha256, _>(source).map_err(|source| CertificateError::Hash {
            algorithm: "SHA256",
            source,
        })?;
        trace!(hash = %sha256, "hashed with SHA256");

        let sha1 = hex_digest::<Sha1, _>(source).map_err(|source| CertificateError::Hash {
            algorithm: "SHA1",
            source,
        })?;
        trace!(hash = %sha1, "hashed with SHA1");

        let md5 = hex_digest::<Md5, _>(source).map_err(|source| CertificateError::Hash {
            algorithm: "MD5",
            source,
        })?;
        trace!(hash = %md5, "hashed with MD5");

        Ok(Self { sha256, sha1, md5 })
    }
}

/// Hash the whole of `source` from its start
pub fn hex_digest<D, R>(source: &mut R) -> io::Result<String>
where
    D: Digest + io::Write,
    R: Read + Seek,
{
    source.rewind()?;

    let mut hasher = D::new();
    io::copy(source, &mut hasher)?;

    Ok(hex::encode(hasher.finalize()))
}
