//! Message types and the dump-file projection.

use anyhow::Context;
use std::collections::BTreeMap;

/// A message pulled off a queue, still in flight.
///
/// The receipt handle is only valid until the queue's visibility timeout
/// elapses; it is required for deletion and must never end up in a dump file.
#[derive(Clone, Debug)]
pub struct Message {
    pub id: String,
    pub receipt_handle: String,
    pub body: String,
    /// System attributes (SentTimestamp, ApproximateReceiveCount, ...).
    pub attributes: BTreeMap<String, String>,
    /// Custom message attributes.
    pub message_attributes: BTreeMap<String, AttributeValue>,
}

/// Serde-friendly projection of an SQS message attribute value.
///
/// Binary payloads are not round-tripped; see [`AttributeValue::to_sdk`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AttributeValue {
    pub data_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub string_value: Option<String>,
}

impl AttributeValue {
    fn from_sdk(value: aws_sdk_sqs::types::MessageAttributeValue) -> Self {
        Self {
            data_type: value.data_type,
            string_value: value.string_value,
        }
    }

    /// Rebuilds the SDK value for a send entry. Returns `None` for attributes
    /// that carried only a binary payload, which this tool does not preserve.
    pub fn to_sdk(&self) -> Option<aws_sdk_sqs::types::MessageAttributeValue> {
        let string_value = self.string_value.clone()?;
        aws_sdk_sqs::types::MessageAttributeValue::builder()
            .data_type(self.data_type.clone())
            .string_value(string_value)
            .build()
            .ok()
    }
}

impl Message {
    /// Converts an AWS SDK message, failing on missing required fields.
    ///
    /// # See Also
    ///
    /// - [AWS SQS Message API Reference](https://docs.aws.amazon.com/AWSSimpleQueueService/latest/APIReference/API_Message.html)
    pub fn from_sdk(message: aws_sdk_sqs::types::Message) -> anyhow::Result<Self> {
        Ok(Self {
            id: message.message_id.context("message missing message_id")?,
            receipt_handle: message
                .receipt_handle
                .context("message missing receipt_handle")?,
            body: message.body.context("message missing body")?,
            attributes: message
                .attributes
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k.as_str().to_string(), v))
                .collect(),
            message_attributes: message
                .message_attributes
                .unwrap_or_default()
                .into_iter()
                .map(|(k, v)| (k, AttributeValue::from_sdk(v)))
                .collect(),
        })
    }

    /// The on-disk projection of this message: receipt handle and checksums
    /// stripped, field names normalized for replay.
    pub fn dump_record(&self) -> DumpRecord {
        DumpRecord {
            id: Some(self.id.clone()),
            message_body: self.body.clone(),
            attributes: self.attributes.clone(),
            message_attributes: self.message_attributes.clone(),
        }
    }
}

/// One line of a dump file.
///
/// Deserialization also accepts the raw SQS field names (`message_id`,
/// `body`) and silently drops `receipt_handle` and the md5 checksum fields,
/// so files captured by other tooling requeue cleanly.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct DumpRecord {
    #[serde(default, alias = "message_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(alias = "body")]
    pub message_body: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub message_attributes: BTreeMap<String, AttributeValue>,
}
