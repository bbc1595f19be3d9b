use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{SyncError, SyncResult};

/// Move a fully uploaded file into `done_folder`, keeping its base name.
///
/// An existing file of the same name in `done_folder` is never overwritten;
/// the move fails and the source stays where it is.
pub fn archive_file(path: &Path, done_folder: &Path) -> SyncResult<PathBuf> {
    fs::create_dir_all(done_folder).map_err(|e| SyncError::io(done_folder, e))?;

    let file_name = path.file_name().ok_or_else(|| {
        SyncError::io(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let destination = done_folder.join(file_name);

    if destination.exists() {
        return Err(SyncError::io(
            &destination,
            std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                "an archived file with this name already exists",
            ),
        ));
    }

    fs::rename(path, &destination).map_err(|e| SyncError::io(path, e))?;
    info!(destination = %destination.display(), "File moved to: {}", destination.display());
    Ok(destination)
}
