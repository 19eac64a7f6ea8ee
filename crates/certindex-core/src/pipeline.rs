//! Index build orchestration
//!
//! Load the certificate list, process every entry, and write `index.html`.
//! A certificate that fails is logged and left out of the page; anything
//! else that fails aborts the build.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

use crate::certificate::{process_certificate, CertificateResult, Destination};
use crate::config::{CertificateGroup, Config};
use crate::directory;
use crate::error::{CertificateError, Error, Result};
use crate::render::{render_flat_index, render_index, GroupView};

/// Name of the rendered page inside the output directory
pub const INDEX_FILE: &str = "index.html";

/// A certificate that was skipped
#[derive(Debug)]
pub struct Failure {
    /// Enclosing group, if the entry came from a config file
    pub group: Option<String>,
    pub name: String,
    pub error: CertificateError,
}

/// Outcome of a successful build
#[derive(Debug)]
pub struct BuildReport {
    pub index_path: PathBuf,
    pub processed: usize,
    pub failures: Vec<Failure>,
}

/// Build the grouped index described by the config file at `config_path`
pub fn build_index(config_path: &Path, output: &Path) -> Result<BuildReport> {
    let config = Config::load(config_path)?;
    debug!(
        path = ?config_path,
        groups = config.groups.len(),
        certificates = config.certificate_count(),
        "loaded configuration"
    );

    build_index_from_config(&config, output)
}

/// Build the grouped index for an already loaded config
pub fn build_index_from_config(config: &Config, output: &Path) -> Result<BuildReport> {
    create_output_dir(output)?;

    let mut failures = Vec::new();
    let mut processed = 0;
    let mut groups = Vec::with_capacity(config.groups.len());

    for group in &config.groups {
        let certificates = process_group(group, output, &mut failures);
        processed += certificates.len();

        groups.push(GroupView {
            name: group.name.clone(),
            description: group.description.clone(),
            deprecated: group.deprecated,
            certificates,
        });
    }

    let index_path = write_index(output, &render_index(&groups).into_string())?;

    Ok(BuildReport {
        index_path,
        processed,
        failures,
    })
}

/// Build a flat index from `{root}/{name}/certificate.crt` entries
pub fn build_directory_index(root: &Path, names: &[String], output: &Path) -> Result<BuildReport> {
    create_output_dir(output)?;

    let destination = Destination::flat(output);
    let mut failures = Vec::new();
    let mut certificates = Vec::with_capacity(names.len());

    for (name, spec) in directory::load_specs(root, names) {
        match spec.and_then(|spec| process_certificate(&spec, &destination)) {
            Ok(result) => certificates.push(result),
            Err(error) => failures.push(skip(None, name, error)),
        }
    }

    let processed = certificates.len();
    let index_path = write_index(output, &render_flat_index(&certificates).into_string())?;

    Ok(BuildReport {
        index_path,
        processed,
        failures,
    })
}

fn process_group(
    group: &CertificateGroup,
    output: &Path,
    failures: &mut Vec<Failure>,
) -> Vec<CertificateResult> {
    let destination = Destination::for_group(output, &group.name);
    let mut certificates = Vec::with_capacity(group.certificates.len());

    for spec in &group.certificates {
        match process_certificate(spec, &destination) {
            Ok(result) => certificates.push(result),
            Err(error) => failures.push(skip(Some(group.name.clone()), spec.name.clone(), error)),
        }
    }

    certificates
}

fn skip(group: Option<String>, name: String, error: CertificateError) -> Failure {
    error!(
        group = group.as_deref().unwrap_or(""),
        kind = ?error.kind(),
        error = %error,
        "failed to process {}",
        name
    );

    Failure { group, name, error }
}

fn create_output_dir(output: &Path) -> Result<()> {
    fs::create_dir_all(output).map_err(|source| Error::OutputDir {
        path: output.to_path_buf(),
        source,
    })
}

fn write_index(output: &Path, html: &str) -> Result<PathBuf> {
    let path = output.join(INDEX_FILE);
    fs::write(&path, html).map_err(|source| Error::Render {
        path: path.clone(),
        source,
    })?;

    info!(path = ?path, "wrote index");
    Ok(path)
}
