//! Seam between the transfer engine and the SQS wire calls.

use crate::batch::BatchFailure;
use crate::client::QueueRef;
use crate::message::{DumpRecord, Message};

/// The three wire calls the transfer engine drives.
///
/// Implemented by [`crate::QueueClient`] against real SQS; the fetch loop and
/// the chunked batch operator are generic over this trait so their pagination
/// and accounting behavior can be exercised without a network.
#[allow(async_fn_in_trait)]
pub trait QueueTransport {
    /// One receive call for up to `max` messages, all attributes included.
    async fn receive_page(&self, queue: &QueueRef, max: usize) -> anyhow::Result<Vec<Message>>;

    /// One bulk delete call for `chunk`, returning the per-item failures.
    /// `chunk` is never larger than [`crate::MAX_BATCH`].
    async fn delete_chunk(
        &self,
        queue: &QueueRef,
        chunk: &[Message],
    ) -> anyhow::Result<Vec<BatchFailure>>;

    /// One bulk send call for `chunk`, returning the per-item failures.
    /// `chunk` is never larger than [`crate::MAX_BATCH`].
    async fn send_chunk(
        &self,
        queue: &QueueRef,
        chunk: &[DumpRecord],
    ) -> anyhow::Result<Vec<BatchFailure>>;
}
