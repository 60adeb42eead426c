//! Chunked bulk operations and their partial-failure accounting.

use crate::client::QueueRef;
use crate::message::{DumpRecord, Message};
use crate::transport::QueueTransport;
use crate::MAX_BATCH;

/// One item the queue service rejected inside an otherwise accepted bulk
/// call. Surfaced to the operator, never retried automatically.
#[derive(Clone, Debug)]
pub struct BatchFailure {
    pub id: String,
    pub code: String,
    pub message: Option<String>,
    pub sender_fault: bool,
}

impl BatchFailure {
    pub(crate) fn from_sdk(entry: aws_sdk_sqs::types::BatchResultErrorEntry) -> Self {
        Self {
            id: entry.id,
            code: entry.code,
            message: entry.message,
            sender_fault: entry.sender_fault,
        }
    }
}

/// Outcome of a multi-chunk bulk operation.
///
/// Every input item is accounted for: `successes() + failures.len()` equals
/// the number of items submitted, and `failures` keeps submission order.
#[derive(Debug, Default)]
pub struct TransferReport {
    pub processed: usize,
    pub failures: Vec<BatchFailure>,
}

impl TransferReport {
    pub fn successes(&self) -> usize {
        self.processed - self.failures.len()
    }

    fn absorb(&mut self, chunk_len: usize, failures: Vec<BatchFailure>) {
        self.processed += chunk_len;
        self.failures.extend(failures);
    }
}

/// Deletes `messages` from `queue` in chunks of at most [`MAX_BATCH`],
/// in input order. A failed item never blocks its siblings or later chunks;
/// only a transport-level error on a whole call aborts.
pub async fn delete_in_chunks<T: QueueTransport>(
    transport: &T,
    queue: &QueueRef,
    messages: &[Message],
) -> anyhow::Result<TransferReport> {
    let mut report = TransferReport::default();

    for chunk in messages.chunks(MAX_BATCH) {
        log::debug!("deleting a chunk of {} messages from {queue}", chunk.len());
        let failed = transport.delete_chunk(queue, chunk).await?;
        report.absorb(chunk.len(), failed);
    }

    Ok(report)
}

/// Enqueues `records` onto `queue` in chunks of at most [`MAX_BATCH`],
/// in input order, with the same accounting as [`delete_in_chunks`].
pub async fn send_in_chunks<T: QueueTransport>(
    transport: &T,
    queue: &QueueRef,
    records: &[DumpRecord],
) -> anyhow::Result<TransferReport> {
    let mut report = TransferReport::default();

    for chunk in records.chunks(MAX_BATCH) {
        log::debug!("sending a chunk of {} messages to {queue}", chunk.len());
        let failed = transport.send_chunk(queue, chunk).await?;
        report.absorb(chunk.len(), failed);
    }

    Ok(report)
}
