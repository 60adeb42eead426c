use crate::batch::BatchFailure;
use crate::client::QueueRef;
use crate::message::{DumpRecord, Message};
use crate::transport::QueueTransport;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::ops::Range;

pub fn queue() -> QueueRef {
    QueueRef::new("https://sqs.us-east-1.amazonaws.com/000000000000/test-queue")
}

pub fn messages(ids: Range<usize>) -> Vec<Message> {
    ids.map(|i| Message {
        id: format!("m-{i}"),
        receipt_handle: format!("rh-{i}"),
        body: format!("body-{i}"),
        attributes: BTreeMap::new(),
        message_attributes: BTreeMap::new(),
    })
    .collect()
}

pub fn records(ids: Range<usize>) -> Vec<DumpRecord> {
    ids.map(|i| DumpRecord {
        id: Some(format!("r-{i}")),
        message_body: format!("body-{i}"),
        attributes: BTreeMap::new(),
        message_attributes: BTreeMap::new(),
    })
    .collect()
}

/// In-memory transport with scripted receive pages and scripted per-item
/// failures, recording every call it sees.
#[derive(Default)]
pub struct ScriptedTransport {
    pages: RefCell<VecDeque<Vec<Message>>>,
    requested: RefCell<Vec<usize>>,
    deleted: RefCell<Vec<Vec<Message>>>,
    sent: RefCell<Vec<Vec<DumpRecord>>>,
    failures: HashMap<String, String>,
}

impl ScriptedTransport {
    pub fn with_pages(pages: Vec<Vec<Message>>) -> Self {
        Self {
            pages: RefCell::new(pages.into()),
            ..Self::default()
        }
    }

    /// Marks `id` as failing every bulk call with `code`.
    pub fn failing(mut self, id: &str, code: &str) -> Self {
        self.failures.insert(id.to_string(), code.to_string());
        self
    }

    pub fn requested_pages(&self) -> Vec<usize> {
        self.requested.borrow().clone()
    }

    pub fn delete_chunks(&self) -> Vec<Vec<Message>> {
        self.deleted.borrow().clone()
    }

    pub fn send_chunks(&self) -> Vec<Vec<DumpRecord>> {
        self.sent.borrow().clone()
    }

    fn failures_in<'a>(&self, ids: impl Iterator<Item = &'a str>) -> Vec<BatchFailure> {
        ids.filter_map(|id| {
            self.failures.get(id).map(|code| BatchFailure {
                id: id.to_string(),
                code: code.clone(),
                message: None,
                sender_fault: true,
            })
        })
        .collect()
    }
}

impl QueueTransport for ScriptedTransport {
    async fn receive_page(&self, _queue: &QueueRef, max: usize) -> anyhow::Result<Vec<Message>> {
        self.requested.borrow_mut().push(max);
        let mut page = self.pages.borrow_mut().pop_front().unwrap_or_default();
        page.truncate(max);
        Ok(page)
    }

    async fn delete_chunk(
        &self,
        _queue: &QueueRef,
        chunk: &[Message],
    ) -> anyhow::Result<Vec<BatchFailure>> {
        self.deleted.borrow_mut().push(chunk.to_vec());
        Ok(self.failures_in(chunk.iter().map(|m| m.id.as_str())))
    }

    async fn send_chunk(
        &self,
        _queue: &QueueRef,
        chunk: &[DumpRecord],
    ) -> anyhow::Result<Vec<BatchFailure>> {
        self.sent.borrow_mut().push(chunk.to_vec());
        Ok(self.failures_in(chunk.iter().filter_map(|r| r.id.as_deref())))
    }
}
