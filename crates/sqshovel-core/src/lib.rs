//! # sqshovel-core
//!
//! Core library for bulk-migrating messages out of and back into AWS SQS
//! queues: resolving a queue from a name prefix, draining it page by page,
//! and applying bulk delete/send calls in service-sized chunks with
//! partial-failure accounting.
//!
//! ## Example
//!
//! ```no_run
//! use sqshovel::{fetch_up_to, QueueClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = aws_config::from_env().load().await;
//! let client = QueueClient::from_config(&config);
//!
//! let queue = client.resolve("orders").await?;
//! let count = fetch_up_to(&client, &queue, Some(100), |message| {
//!     println!("{}", serde_json::to_string(&message.dump_record())?);
//!     Ok(())
//! })
//! .await?;
//! println!("fetched {count} messages");
//! # Ok(())
//! # }
//! ```

mod batch;
mod client;
mod fetch;
mod message;
mod transport;

#[cfg(test)]
mod test_utils;

/// Upper bound the SQS bulk APIs put on a single call's entry count.
///
/// <https://docs.aws.amazon.com/AWSSimpleQueueService/latest/APIReference/API_SendMessageBatch.html>
pub const MAX_BATCH: usize = 10;

pub use batch::{delete_in_chunks, send_in_chunks, BatchFailure, TransferReport};
pub use client::{QueueClient, QueueRef, ResolveError};
pub use fetch::fetch_up_to;
pub use message::{AttributeValue, DumpRecord, Message};
pub use transport::QueueTransport;
