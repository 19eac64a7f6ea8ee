//! Directory-based certificate source
//!
//! Instead of a config file, each certificate lives in its own folder:
//!
//! ```text
//! {root}/{name}/certificate.crt
//! {root}/{name}/description.txt   (optional)
//! ```

use std::fs;
use std::io;
use std::path::Path;

use crate::config::CertificateSpec;
use crate::error::CertificateError;

pub const CERTIFICATE_FILE: &str = "certificate.crt";
pub const DESCRIPTION_FILE: &str = "description.txt";

/// Build a spec for `name` under `root`.
///
/// A missing description file is fine; any other read failure is an error.
/// The certificate file itself is only opened when the spec is processed.
pub fn load_spec(root: &Path, name: &str) -> Result<CertificateSpec, CertificateError> {
    let dir = root.join(name);
    let description_path = dir.join(DESCRIPTION_FILE);

    let description = match fs::read_to_string(&description_path) {
        Ok(text) => Some(text.trim().to_string()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => None,
        Err(source) => {
            return Err(CertificateError::Description {
                path: description_path,
                source,
            })
        }
    };

    Ok(CertificateSpec {
        name: name.to_string(),
        path: dir.join(CERTIFICATE_FILE),
        file_name: None,
        description,
        deprecated: false,
    })
}

/// Build specs for every name, in the order given
pub fn load_specs(
    root: &Path,
    names: &[String],
) -> Vec<(String, Result<CertificateSpec, CertificateError>)> {
    names
        .iter()
        .map(|name| (name.clone(), load_spec(root, name)))
        .collect()
}
