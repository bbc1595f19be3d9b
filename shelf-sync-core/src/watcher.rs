//! Polling orchestrator: discover → read → transform → authenticate → upload → archive.
//!
//! One cycle lists the watch folder, drives every candidate file through the
//! pipeline one at a time, then runs the retention sweep once. Failures are
//! contained at the file boundary: they are logged, recorded in the
//! [`CycleReport`] and the file is left in place to be picked up again on the
//! next cycle.
//!
//! # Navigation
//! - Single cycle: [`Watcher::run_cycle`]
//! - Long-running loop: [`Watcher::run_until`]
//! - One file: [`Watcher::process_file`]
//!
//! A file that fails after some batches were accepted is resent in full on its
//! next attempt; nothing here deduplicates against what the service already has.

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use tracing::{error, info, warn};

use crate::archive::archive_file;
use crate::auth::acquire_token;
use crate::config::SyncConfig;
use crate::contract::EslTransport;
use crate::error::{SyncError, SyncResult};
use crate::retention::{purge_expired, PurgeReport};
use crate::spreadsheet::{has_extension, read_rows};
use crate::transform::build_records;
use crate::upload::BatchUploader;

/// Last stage a file completed before it finished or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStage {
    Discovered,
    Read,
    Transformed,
    Authenticated,
    Uploaded,
    Archived,
}

#[derive(Debug)]
pub enum FileOutcome {
    Archived {
        destination: PathBuf,
        records: usize,
        batches: usize,
    },
    Failed {
        stage: FileStage,
        error: SyncError,
    },
}

#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn is_archived(&self) -> bool {
        matches!(self.outcome, FileOutcome::Archived { .. })
    }
}

#[derive(Debug, Default)]
pub struct CycleReport {
    pub files: Vec<FileReport>,
    pub purge: PurgeReport,
}

impl CycleReport {
    pub fn failed(&self) -> usize {
        self.files.iter().filter(|f| !f.is_archived()).count()
    }
}

pub struct Watcher<T> {
    config: SyncConfig,
    transport: T,
}

impl<T> Watcher<T>
where
    T: EslTransport,
{
    pub fn new(config: SyncConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Create the watch folder if it does not exist yet. Failure is logged;
    /// the following cycle then reports the folder as unreadable.
    pub fn prepare(&self) {
        info!(watch_folder = %self.config.watch_folder.display(), "Watching folder");
        if let Err(e) = fs::create_dir_all(&self.config.watch_folder) {
            error!(error = %e, watch_folder = %self.config.watch_folder.display(), "Failed to create watch folder");
        }
    }

    /// Poll until `stop` resolves. `stop` is only observed while waiting
    /// between cycles; a cycle in progress always runs to completion.
    /// Returns the number of completed cycles.
    pub async fn run_until<F>(&self, stop: F) -> usize
    where
        F: Future<Output = ()>,
    {
        self.prepare();

        tokio::pin!(stop);
        let mut cycles = 0;
        loop {
            let report = self.run_cycle().await;
            cycles += 1;
            info!(
                cycle = cycles,
                files = report.files.len(),
                failed = report.failed(),
                purged = report.purge.deleted.len(),
                "Cycle complete"
            );

            info!(seconds = self.config.poll_interval_secs, "Sleeping until next poll");
            tokio::select! {
                _ = tokio::time::sleep(self.config.poll_interval()) => {}
                _ = &mut stop => {
                    info!(cycles, "Stop requested, leaving watch loop");
                    return cycles;
                }
            }
        }
    }

    /// One poll: process every candidate file, then purge expired archives.
    pub async fn run_cycle(&self) -> CycleReport {
        let mut report = CycleReport::default();

        let candidates = match self.discover() {
            Ok(candidates) => candidates,
            Err(e) => {
                error!(error = %e, watch_folder = %self.config.watch_folder.display(), "Failed to list watch folder");
                Vec::new()
            }
        };

        for path in candidates {
            let outcome = self.process_file(&path).await;
            report.files.push(FileReport { path, outcome });
        }

        report.purge = purge_expired(
            &self.config.done_folder(),
            self.config.retention_window(),
            SystemTime::now(),
        );
        report
    }

    /// Regular files in the watch folder with the configured extension, by name.
    pub fn discover(&self) -> std::io::Result<Vec<PathBuf>> {
        let mut candidates = Vec::new();
        for entry in fs::read_dir(&self.config.watch_folder)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_file() && has_extension(&path, &self.config.file_extension) {
                candidates.push(path);
            }
        }
        candidates.sort();
        Ok(candidates)
    }

    /// Drive a single file through the pipeline. Never panics or propagates:
    /// any failure comes back as [`FileOutcome::Failed`].
    pub async fn process_file(&self, path: &Path) -> FileOutcome {
        let mut stage = FileStage::Discovered;
        match self.drive(path, &mut stage).await {
            Ok(outcome) => outcome,
            Err(error) => {
                if stage == FileStage::Uploaded {
                    warn!(
                        file = %path.display(),
                        "All batches were accepted but the file could not be archived; it will be sent again next cycle"
                    );
                }
                error!(
                    file = %path.display(),
                    stage = ?stage,
                    batches_sent = error.batches_sent(),
                    error = %error,
                    "Error processing file"
                );
                FileOutcome::Failed { stage, error }
            }
        }
    }

    async fn drive(&self, path: &Path, stage: &mut FileStage) -> SyncResult<FileOutcome> {
        info!(file = %path.display(), "Processing file");

        let rows = read_rows(path, &self.config.required_columns)?;
        *stage = FileStage::Read;

        let records = build_records(&rows);
        *stage = FileStage::Transformed;

        let token = acquire_token(&self.transport).await?;
        *stage = FileStage::Authenticated;

        let uploader = BatchUploader::new(&self.transport, &self.config.store, self.config.batch_size);
        let summary = uploader.upload(&token, &records).await?;
        *stage = FileStage::Uploaded;

        let destination = archive_file(path, &self.config.done_folder())?;
        *stage = FileStage::Archived;

        Ok(FileOutcome::Archived {
            destination,
            records: summary.records,
            batches: summary.batches,
        })
    }
}
