//! Sequential, fail-fast batch upload.
//!
//! Records are cut into contiguous chunks of at most `batch_size` and posted
//! one after another, numbered from 1. The first rejected batch stops the
//! file. Batches accepted before it stay applied on the service side; the
//! caller reports the whole file as failed and it will be sent again in full
//! on a later cycle.

use std::num::NonZeroUsize;

use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::config::StoreIdentity;
use crate::contract::{AuthToken, BatchPayload, EslTransport};
use crate::error::{SyncError, SyncResult};
use crate::transform::SyncRecord;

/// What a completed upload pushed to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadSummary {
    pub batches: usize,
    pub records: usize,
}

pub struct BatchUploader<'a, T: ?Sized> {
    transport: &'a T,
    store: &'a StoreIdentity,
    batch_size: NonZeroUsize,
}

impl<'a, T> BatchUploader<'a, T>
where
    T: EslTransport + ?Sized,
{
    pub fn new(transport: &'a T, store: &'a StoreIdentity, batch_size: NonZeroUsize) -> Self {
        Self {
            transport,
            store,
            batch_size,
        }
    }

    pub async fn upload(
        &self,
        token: &AuthToken,
        records: &[SyncRecord],
    ) -> SyncResult<UploadSummary> {
        info!(total = records.len(), "Total items to send");

        let mut batches = 0;
        for (batch_number, chunk) in partition(records, self.batch_size) {
            self.send_batch(token, batch_number, chunk).await?;
            batches = batch_number;
        }

        Ok(UploadSummary {
            batches,
            records: records.len(),
        })
    }

    async fn send_batch(
        &self,
        token: &AuthToken,
        batch_number: usize,
        chunk: &[SyncRecord],
    ) -> SyncResult<()> {
        let payload = BatchPayload {
            customer_store_code: self.store.customer_code.clone(),
            store_code: self.store.store_code.clone(),
            batch_no: batch_no(Local::now()),
            items: chunk.to_vec(),
        };

        info!(
            batch = batch_number,
            items = chunk.len(),
            batch_no = %payload.batch_no,
            "Sending batch {batch_number} ({} items)",
            chunk.len()
        );

        let reply = self
            .transport
            .post_batch(token, &payload)
            .await
            .map_err(|e| {
                error!(batch = batch_number, error = %e, "Batch {batch_number} request did not complete");
                SyncError::Upload {
                    batch: batch_number,
                    status: None,
                    reason: e.to_string(),
                }
            })?;

        info!(batch = batch_number, status = reply.status, "Batch {batch_number} HTTP Status: {}", reply.status);

        if !reply.is_success() {
            error!(
                batch = batch_number,
                status = reply.status,
                body = %reply.body,
                "Batch {batch_number} failed"
            );
            return Err(SyncError::Upload {
                batch: batch_number,
                status: Some(reply.status),
                reason: reply.body,
            });
        }

        Ok(())
    }
}

/// Contiguous chunks of at most `batch_size` records, numbered from 1.
pub fn partition(
    records: &[SyncRecord],
    batch_size: NonZeroUsize,
) -> impl Iterator<Item = (usize, &[SyncRecord])> {
    records
        .chunks(batch_size.get())
        .enumerate()
        .map(|(i, chunk)| (i + 1, chunk))
}

/// Batch identifier: local wall-clock time to the second. Two batches sent in
/// the same second share an identifier.
pub fn batch_no(now: DateTime<Local>) -> String {
    now.format("%Y%m%d%H%M%S").to_string()
}
