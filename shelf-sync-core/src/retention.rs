use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use tracing::{debug, error, info};

/// Outcome of one retention sweep.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PurgeReport {
    pub deleted: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

/// Delete regular files directly under `done_folder` last modified strictly
/// before `now - window`. Best effort: a file that cannot be inspected or
/// removed is logged and skipped.
pub fn purge_expired(done_folder: &Path, window: Duration, now: SystemTime) -> PurgeReport {
    purge_with(done_folder, window, now, |path| fs::remove_file(path))
}

fn purge_with<F>(
    done_folder: &Path,
    window: Duration,
    now: SystemTime,
    mut remove: F,
) -> PurgeReport
where
    F: FnMut(&Path) -> io::Result<()>,
{
    let mut report = PurgeReport::default();

    if !done_folder.exists() {
        debug!(done_folder = %done_folder.display(), "No done folder yet, nothing to purge");
        return report;
    }

    let Some(cutoff) = now.checked_sub(window) else {
        return report;
    };

    let entries = match fs::read_dir(done_folder) {
        Ok(entries) => entries,
        Err(e) => {
            error!(error = %e, done_folder = %done_folder.display(), "Failed to list done folder");
            return report;
        }
    };

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                error!(error = %e, "Failed to read done folder entry");
                continue;
            }
        };
        let path = entry.path();

        let modified = match entry.metadata().and_then(|m| {
            if m.is_file() {
                m.modified().map(Some)
            } else {
                Ok(None)
            }
        }) {
            Ok(Some(modified)) => modified,
            Ok(None) => continue,
            Err(e) => {
                error!(error = %e, file = %path.display(), "Failed to inspect archived file");
                report.failed.push(path);
                continue;
            }
        };

        if modified >= cutoff {
            continue;
        }

        match remove(&path) {
            Ok(()) => {
                info!(file = %path.display(), "Deleted old processed file");
                report.deleted.push(path);
            }
            Err(e) => {
                error!(error = %e, file = %path.display(), "Failed to delete old file");
                report.failed.push(path);
            }
        }
    }

    report
}
