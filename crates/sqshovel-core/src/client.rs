//! SQS client wrapper: queue listing, name resolution, and the wire calls
//! backing the transfer engine.

use crate::batch::BatchFailure;
use crate::message::{DumpRecord, Message};
use crate::transport::QueueTransport;
use anyhow::Context;
use aws_config::SdkConfig;
use aws_sdk_sqs as sqs;
use sqs::types::{
    DeleteMessageBatchRequestEntry, MessageSystemAttributeName, QueueAttributeName,
    SendMessageBatchRequestEntry,
};
use std::collections::HashMap;

/// A resolved queue endpoint. Only the resolver hands these out, so any
/// `QueueRef` reaching the transfer engine names exactly one queue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueRef(String);

impl QueueRef {
    pub(crate) fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for QueueRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolution of a queue name prefix is a deterministic user-input step:
/// zero or multiple matches are fatal, never retried.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("no queue matching '{0}'")]
    NotFound(String),
    #[error("there's more than one queue starting with '{prefix}': {}", candidates.join(", "))]
    Ambiguous {
        prefix: String,
        candidates: Vec<String>,
    },
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Client for the SQS operations this tool needs.
///
/// Built once at startup from a loaded [`SdkConfig`] and passed by reference
/// into each command; there is no process-wide singleton.
///
/// # Example
///
/// ```no_run
/// use sqshovel::QueueClient;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = aws_config::from_env().load().await;
/// let client = QueueClient::from_config(&config);
///
/// let queue = client.resolve("orders").await?;
/// println!("resolved: {queue}");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct QueueClient {
    pub client: sqs::Client,
}

impl QueueClient {
    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            client: sqs::Client::new(config),
        }
    }

    /// Lists the URLs of every queue whose name starts with `prefix`,
    /// following pagination tokens. An empty prefix lists all queues.
    pub async fn list_queues(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let mut queues = Vec::new();
        let mut next_token = None;

        loop {
            let mut request = self.client.list_queues();
            if !prefix.is_empty() {
                request = request.queue_name_prefix(prefix);
            }

            let output = request
                .set_next_token(next_token)
                .send()
                .await
                .context("failed to list queues")?;

            if let Some(mut urls) = output.queue_urls {
                queues.append(&mut urls);
            }

            next_token = output.next_token;
            if next_token.is_none() {
                break;
            }
        }

        Ok(queues)
    }

    /// Maps a queue name or name prefix to exactly one queue.
    pub async fn resolve(&self, prefix: &str) -> Result<QueueRef, ResolveError> {
        let urls = self.list_queues(prefix).await?;
        pick_single(prefix, urls)
    }

    /// Reads the named attributes for a queue.
    pub async fn queue_attributes(
        &self,
        queue_url: &str,
        names: &[QueueAttributeName],
    ) -> anyhow::Result<HashMap<QueueAttributeName, String>> {
        let output = self
            .client
            .get_queue_attributes()
            .queue_url(queue_url)
            .set_attribute_names(Some(names.to_vec()))
            .send()
            .await
            .with_context(|| format!("failed to read attributes of {queue_url}"))?;

        Ok(output.attributes.unwrap_or_default())
    }
}

/// The match-selection half of resolution, split out from the listing call.
fn pick_single(prefix: &str, mut urls: Vec<String>) -> Result<QueueRef, ResolveError> {
    match urls.len() {
        0 => Err(ResolveError::NotFound(prefix.to_string())),
        1 => Ok(QueueRef::new(urls.remove(0))),
        _ => Err(ResolveError::Ambiguous {
            prefix: prefix.to_string(),
            candidates: urls,
        }),
    }
}

impl QueueTransport for QueueClient {
    async fn receive_page(&self, queue: &QueueRef, max: usize) -> anyhow::Result<Vec<Message>> {
        let output = self
            .client
            .receive_message()
            .queue_url(queue.as_str())
            .max_number_of_messages(max as i32)
            .message_system_attribute_names(MessageSystemAttributeName::All)
            .message_attribute_names("All")
            .send()
            .await
            .context("failed to receive messages")?;

        output
            .messages
            .unwrap_or_default()
            .into_iter()
            .map(Message::from_sdk)
            .collect()
    }

    async fn delete_chunk(
        &self,
        queue: &QueueRef,
        chunk: &[Message],
    ) -> anyhow::Result<Vec<BatchFailure>> {
        let entries = chunk
            .iter()
            .map(|message| {
                DeleteMessageBatchRequestEntry::builder()
                    .id(&message.id)
                    .receipt_handle(&message.receipt_handle)
                    .build()
                    .with_context(|| format!("failed to build delete entry for {}", message.id))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let output = self
            .client
            .delete_message_batch()
            .queue_url(queue.as_str())
            .set_entries(Some(entries))
            .send()
            .await
            .context("delete_message_batch failed")?;

        Ok(output.failed.into_iter().map(BatchFailure::from_sdk).collect())
    }

    async fn send_chunk(
        &self,
        queue: &QueueRef,
        chunk: &[DumpRecord],
    ) -> anyhow::Result<Vec<BatchFailure>> {
        let entries = chunk
            .iter()
            .map(|record| {
                // Batch entry ids must be unique per request; the original
                // message id satisfies that, records without one get a fresh
                // uuid.
                let id = record
                    .id
                    .clone()
                    .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

                let mut entry = SendMessageBatchRequestEntry::builder()
                    .id(&id)
                    .message_body(&record.message_body);

                for (name, value) in &record.message_attributes {
                    match value.to_sdk() {
                        Some(sdk_value) => {
                            entry = entry.message_attributes(name.clone(), sdk_value);
                        }
                        None => {
                            log::warn!("dropping binary-only attribute {name} on message {id}");
                        }
                    }
                }

                entry
                    .build()
                    .with_context(|| format!("failed to build send entry for {id}"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let output = self
            .client
            .send_message_batch()
            .queue_url(queue.as_str())
            .set_entries(Some(entries))
            .send()
            .await
            .context("send_message_batch failed")?;

        Ok(output.failed.into_iter().map(BatchFailure::from_sdk).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_matches_is_not_found() {
        let err = pick_single("orders", vec![]).unwrap_err();
        assert!(matches!(err, ResolveError::NotFound(prefix) if prefix == "orders"));
    }

    #[test]
    fn single_match_resolves() {
        let url = "https://sqs.us-east-1.amazonaws.com/123/orders".to_string();
        let queue = pick_single("orders", vec![url.clone()]).unwrap();
        assert_eq!(queue.as_str(), url);
    }

    #[test]
    fn multiple_matches_are_ambiguous_and_name_all_candidates() {
        let urls = vec![
            "https://sqs.us-east-1.amazonaws.com/123/orders".to_string(),
            "https://sqs.us-east-1.amazonaws.com/123/orders-dlq".to_string(),
        ];
        let err = pick_single("orders", urls.clone()).unwrap_err();
        match err {
            ResolveError::Ambiguous { prefix, candidates } => {
                assert_eq!(prefix, "orders");
                assert_eq!(candidates, urls);
            }
            other => panic!("expected Ambiguous, got {other:?}"),
        }
        let rendered = pick_single("orders", urls).unwrap_err().to_string();
        assert!(rendered.contains("orders-dlq"));
    }
}
