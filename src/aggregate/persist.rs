use std::path::{Path, PathBuf};

use std::io::Write;

use tracing::debug;

use crate::error::PersistError;
use crate::report::AggregatedReport;

/// Writes `report` to `path` so readers only ever see a complete file.
///
/// # Errors
///
/// Returns an error if the report cannot be serialized or written. The
/// existing file at `path` is left untouched in that case.
pub async fn persist_report(path: &Path, report: &AggregatedReport) -> Result<(), PersistError> {
    let bytes = report
        .to_pretty_json()
        .map_err(|source| PersistError::Serialize { source })?;
    write_atomically(path, &bytes).await
}

/// Writes a temporary sibling of `path`, syncs it, then renames it into
/// place. The temporary file is deleted when any step fails.
///
/// # Errors
///
/// Returns an error if the directory, temporary file, or rename fails.
pub async fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), PersistError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| PersistError::InvalidPath {
            path: path.to_path_buf(),
        })?
        .to_string_lossy()
        .into_owned();
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| io_error("create directory", &dir, source))?;

    let target = path.to_path_buf();
    let bytes = bytes.to_vec();
    tokio::task::spawn_blocking(move || write_and_persist(&dir, &file_name, &target, &bytes))
        .await
        .map_err(|source| PersistError::Join { source })?
}

fn write_and_persist(
    dir: &Path,
    file_name: &str,
    path: &Path,
    bytes: &[u8],
) -> Result<(), PersistError> {
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| io_error("create temporary file in", dir, source))?;
    temp.as_file_mut()
        .write_all(bytes)
        .map_err(|source| io_error("write", temp.path(), source))?;
    temp.as_file()
        .sync_all()
        .map_err(|source| io_error("sync", temp.path(), source))?;

    temp.persist(path)
        .map_err(|err| io_error("rename into", path, err.error))?;
    debug!("Wrote {} bytes to '{}'", bytes.len(), path.display());
    Ok(())
}

fn io_error(context: &'static str, path: &Path, source: std::io::Error) -> PersistError {
    PersistError::Io {
        context,
        path: path.to_path_buf(),
        source,
    }
}
