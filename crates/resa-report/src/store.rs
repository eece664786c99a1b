//! Reading and writing reports on disk.

use std::fs;
use std::path::{Path, PathBuf};

use resa_core::PreviousReportSnapshot;

use crate::error::ReportError;
use crate::parse::parse_report;
use crate::sidecar::{sidecar_path, ReportSidecar, SIDECAR_VERSION};

/// Write `markdown` to `path`, creating parent directories, and the sidecar
/// next to it when given.
///
/// Returns the sidecar path when one was written.
///
/// # Errors
///
/// Returns [`ReportError::Write`] if a directory or file cannot be written,
/// or [`ReportError::Sidecar`] if the sidecar cannot be serialized.
pub fn write_report(
    path: &Path,
    markdown: &str,
    sidecar: Option<&ReportSidecar>,
) -> Result<Option<PathBuf>, ReportError> {
    let write_err = |path: &Path| {
        let path = path.to_path_buf();
        move |source| ReportError::Write { path, source }
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err(parent))?;
    }
    fs::write(path, markdown).map_err(write_err(path))?;
    tracing::info!(path = %path.display(), "report written");

    let Some(sidecar) = sidecar else {
        return Ok(None);
    };
    let json_path = sidecar_path(path);
    let json = serde_json::to_string_pretty(sidecar).map_err(|source| ReportError::Sidecar {
        path: json_path.clone(),
        source,
    })?;
    fs::write(&json_path, json).map_err(write_err(&json_path))?;
    tracing::debug!(path = %json_path.display(), "report sidecar written");
    Ok(Some(json_path))
}

fn read_to_string(path: &Path) -> Result<String, ReportError> {
    fs::read_to_string(path).map_err(|source| ReportError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn read_sidecar(path: &Path) -> Result<ReportSidecar, ReportError> {
    let content = read_to_string(path)?;
    let sidecar: ReportSidecar =
        serde_json::from_str(&content).map_err(|source| ReportError::Sidecar {
            path: path.to_path_buf(),
            source,
        })?;
    if sidecar.version != SIDECAR_VERSION {
        return Err(ReportError::SidecarVersion {
            path: path.to_path_buf(),
            version: sidecar.version,
        });
    }
    Ok(sidecar)
}

/// Load a previous report for comparison.
///
/// A `.json` path is read as a sidecar. Anything else is parsed as Markdown,
/// then overlaid with its sidecar when one exists and is valid. A broken
/// sidecar is logged and ignored.
///
/// # Errors
///
/// Returns [`ReportError::Read`] if the report cannot be read, or a sidecar
/// error when a `.json` path was given and is invalid.
pub fn load_previous_report(path: &Path) -> Result<PreviousReportSnapshot, ReportError> {
    if path.extension().is_some_and(|ext| ext == "json") {
        return read_sidecar(path).map(ReportSidecar::into_snapshot);
    }

    let content = read_to_string(path)?;
    let mut snapshot = parse_report(&content);

    let json_path = sidecar_path(path);
    if json_path.is_file() {
        match read_sidecar(&json_path) {
            Ok(sidecar) => {
                tracing::debug!(path = %json_path.display(), "using report sidecar");
                sidecar.apply_to(&mut snapshot);
            }
            Err(e) => {
                tracing::warn!(
                    path = %json_path.display(),
                    error = %e,
                    "ignoring unreadable report sidecar"
                );
            }
        }
    }
    Ok(snapshot)
}
