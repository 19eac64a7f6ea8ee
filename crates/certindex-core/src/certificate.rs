//! Certificate processing
//!
//! Turns one [`CertificateSpec`] into a published file plus the metadata the
//! index shows for it: expiry, fingerprints and the download path.

use chrono::DateTime;
use std::fs::{self, File};
use std::io::{self, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

use crate::config::CertificateSpec;
use crate::error::CertificateError;
use crate::fingerprint::Fingerprints;

/// Extension appended to every published certificate
pub const CERTIFICATE_EXTENSION: &str = "crt";

/// Directory (under the output root and the site root) holding published files
pub const CERTIFICATES_DIR: &str = "certificates";

const EXPIRY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Metadata for a successfully published certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateResult {
    pub name: String,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Site-relative download path, e.g. `/certificates/Root CAs/Example.crt`
    pub file: String,
    /// `YYYY-MM-DD HH:MM:SS` in UTC
    pub expiry: String,
    /// Unix timestamp of "not valid after"
    pub expiry_timestamp: i64,
    pub sha256: String,
    pub sha1: String,
    pub md5: String,
}

/// Where a processed certificate is copied and how it is linked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Destination {
    dir: PathBuf,
    web_prefix: String,
}

impl Destination {
    /// `{output}/certificates/{group}`, linked as `/certificates/{group}/...`
    pub fn for_group(output: &Path, group: &str) -> Self {
        Self {
            dir: output.join(CERTIFICATES_DIR).join(group),
            web_prefix: format!("/{}/{}", CERTIFICATES_DIR, group),
        }
    }

    /// `{output}/certificates`, linked as `/certificates/...`
    pub fn flat(output: &Path) -> Self {
        Self {
            dir: output.join(CERTIFICATES_DIR),
            web_prefix: format!("/{}", CERTIFICATES_DIR),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn web_path(&self, basename: &str) -> String {
        format!("{}/{}", self.web_prefix, basename)
    }
}

/// Parsed expiry of a certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expiry {
    pub display: String,
    pub timestamp: i64,
}

impl Expiry {
    pub fn from_timestamp(timestamp: i64) -> Result<Self, CertificateError> {
        let datetime =
            DateTime::from_timestamp(timestamp, 0).ok_or(CertificateError::Expiry(timestamp))?;

        Ok(Self {
            display: datetime.format(EXPIRY_FORMAT).to_string(),
            timestamp,
        })
    }
}

/// Published basename: the explicit override, or the name with spaces and
/// dots replaced by underscores, plus the certificate extension.
pub fn output_basename(spec: &CertificateSpec) -> String {
    let stem = match &spec.file_name {
        Some(file_name) => file_name.clone(),
        None => spec.name.replace([' ', '.'], "_"),
    };

    format!("{}.{}", stem, CERTIFICATE_EXTENSION)
}

/// Decode the first PEM block in `raw` and return the certificate's expiry.
///
/// Anything other than whitespace after the first block is logged and
/// ignored.
pub fn read_expiry(raw: &[u8]) -> Result<Expiry, CertificateError> {
    let (rest, pem) =
        parse_x509_pem(raw).map_err(|e| CertificateError::Envelope(e.to_string()))?;

    if !rest.iter().all(u8::is_ascii_whitespace) {
        warn!(trailing_bytes = rest.len(), "certificate contains extra data");
    }

    let (_, cert) = parse_x509_certificate(&pem.contents)
        .map_err(|e| CertificateError::Parse(e.to_string()))?;

    Expiry::from_timestamp(cert.validity().not_after.timestamp())
}

/// Process one certificate: parse, fingerprint, and copy it into `destination`.
///
/// The source file is held open for the whole call and rewound before each
/// pass so every digest and the copy see the complete stored content.
pub fn process_certificate(
    spec: &CertificateSpec,
    destination: &Destination,
) -> Result<CertificateResult, CertificateError> {
    debug!(name = %spec.name, path = ?spec.path, "processing certificate");

    let mut file = File::open(&spec.path).map_err(|source| CertificateError::Open {
        path: spec.path.clone(),
        source,
    })?;

    let mut raw = Vec::new();
    file.read_to_end(&mut raw).map_err(CertificateError::Read)?;

    let expiry = read_expiry(&raw)?;
    trace!(expiry = %expiry.display, expiry_timestamp = expiry.timestamp, "read expiry");

    let fingerprints = Fingerprints::compute(&mut file)?;

    fs::create_dir_all(destination.dir()).map_err(|source| CertificateError::CreateDir {
        path: destination.dir().to_path_buf(),
        source,
    })?;
    debug!(dir = ?destination.dir(), "created folder structure");

    let basename = output_basename(spec);
    let target = destination.dir().join(&basename);
    copy_from_start(&mut file, &target).map_err(|source| CertificateError::Copy {
        path: target.clone(),
        source,
    })?;
    trace!(target = ?target, "copied certificate file");

    Ok(CertificateResult {
        name: spec.name.clone(),
        description: spec.description.clone(),
        deprecated: spec.deprecated,
        file: destination.web_path(&basename),
        expiry: expiry.display,
        expiry_timestamp: expiry.timestamp,
        sha256: fingerprints.sha256,
        sha1: fingerprints.sha1,
        md5: fingerprints.md5,
    })
}

fn copy_from_start<R: Read + Seek>(source: &mut R, target: &Path) -> io::Result<u64> {
    source.rewind()?;
    let mut out = File::create(target)?;
    io::copy(source, &mut out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output for assertions
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn logs_during<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::TRACE)
            .finish();

        let result = tracing::subscriber::with_default(subscriber, f);
        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (result, output)
    }

    fn mint_pem() -> String {
        let mut params = rcgen::CertificateParams::new(vec!["certindex.test".to_string()]).unwrap();
        params.not_after = rcgen::date_time_ymd(2025, 1, 1);
        let key = rcgen::KeyPair::generate().unwrap();
        params.self_signed(&key).unwrap().pem()
    }

    fn spec(name: &str, file_name: Option<&str>) -> CertificateSpec {
        CertificateSpec {
            name: name.to_string(),
            path: PathBuf::from("unused.pem"),
            file_name: file_name.map(str::to_string),
            description: None,
            deprecated: false,
        }
    }

    #[test]
    fn test_basename_sanitizes_name() {
        assert_eq!(output_basename(&spec("My Cert.v1", None)), "My_Cert_v1.crt");
        assert_eq!(output_basename(&spec("plain", None)), "plain.crt");
        assert_eq!(output_basename(&spec("a b.c d", None)), "a_b_c_d.crt");
    }

    #[test]
    fn test_basename_override_wins() {
        assert_eq!(
            output_basename(&spec("My Cert.v1", Some("custom"))),
            "custom.crt"
        );
        // An override is used verbatim, even when it would be sanitized
        assert_eq!(
            output_basename(&spec("ignored", Some("with space"))),
            "with space.crt"
        );
    }

    #[test]
    fn test_destination_for_group() {
        let dest = Destination::for_group(Path::new("out"), "Root CAs");
        assert_eq!(dest.dir(), Path::new("out/certificates/Root CAs"));
        assert_eq!(dest.web_path("a.crt"), "/certificates/Root CAs/a.crt");
    }

    #[test]
    fn test_destination_flat() {
        let dest = Destination::flat(Path::new("out"));
        assert_eq!(dest.dir(), Path::new("out/certificates"));
        assert_eq!(dest.web_path("a.crt"), "/certificates/a.crt");
    }

    #[test]
    fn test_expiry_formatting() {
        let expiry = Expiry::from_timestamp(1_735_689_600).unwrap();
        assert_eq!(expiry.display, "2025-01-01 00:00:00");
        assert_eq!(expiry.timestamp, 1_735_689_600);

        let expiry = Expiry::from_timestamp(0).unwrap();
        assert_eq!(expiry.display, "1970-01-01 00:00:00");
    }

    #[test]
    fn test_read_expiry_rejects_non_pem() {
        let err = read_expiry(b"this is not a certificate").unwrap_err();
        assert!(matches!(err, CertificateError::Envelope(_)));
    }

    #[test]
    fn test_read_expiry_rejects_bad_der() {
        let pem = b"-----BEGIN CERTIFICATE-----\nAAECAwQF\n-----END CERTIFICATE-----\n";
        let err = read_expiry(pem).unwrap_err();
        assert!(matches!(err, CertificateError::Parse(_)));
    }

    #[test]
    fn test_trailing_data_is_logged() {
        let mut raw = mint_pem().into_bytes();
        raw.extend_from_slice(b"\nsome trailing junk\n");

        let (expiry, logs) = logs_during(|| read_expiry(&raw));
        assert_eq!(expiry.unwrap().timestamp, 1_735_689_600);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("certificate contains extra data"));
    }

    #[test]
    fn test_trailing_whitespace_is_not_logged() {
        let mut raw = mint_pem().into_bytes();
        raw.extend_from_slice(b"\n\n  \n");

        let (expiry, logs) = logs_during(|| read_expiry(&raw));
        assert_eq!(expiry.unwrap().display, "2025-01-01 00:00:00");
        assert!(!logs.contains("certificate contains extra data"));
    }

    #[test]
    fn test_process_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut missing = spec("Missing", None);
        missing.path = dir.path().join("missing.pem");

        let dest = Destination::for_group(dir.path(), "Group");
        let err = process_certificate(&missing, &dest).unwrap_err();
        assert!(matches!(err, CertificateError::Open { .. }));
        assert!(!dest.dir().exists());
    }
}
