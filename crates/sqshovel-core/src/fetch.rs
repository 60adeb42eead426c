//! Bounded-pagination fetch loop.

use crate::client::QueueRef;
use crate::message::Message;
use crate::transport::QueueTransport;
use crate::MAX_BATCH;

/// Pulls up to `limit` messages from `queue`, handing each one to `sink`
/// as it arrives. `limit = None` drains until the queue reports an empty
/// page. Returns the number of messages fetched.
///
/// Each page requests at most `limit - count` messages, so the loop never
/// overshoots the budget. The page size only ever shrinks: after an
/// under-full page the next request stays at the reduced size even if a
/// full page might again be available.
///
/// A sink error aborts the loop; messages already handed over stay handed
/// over (at-least-once, as everywhere in this tool).
pub async fn fetch_up_to<T, F>(
    transport: &T,
    queue: &QueueRef,
    limit: Option<usize>,
    mut sink: F,
) -> anyhow::Result<usize>
where
    T: QueueTransport,
    F: FnMut(Message) -> anyhow::Result<()>,
{
    if limit == Some(0) {
        return Ok(0);
    }

    let mut count = 0usize;
    let mut page_size = match limit {
        Some(limit) => MAX_BATCH.min(limit),
        None => MAX_BATCH,
    };

    loop {
        if let Some(limit) = limit {
            let remaining = limit.saturating_sub(count);
            if remaining < page_size {
                page_size = remaining;
            }
        }

        let messages = transport.receive_page(queue, page_size).await?;
        let received = messages.len();
        log::debug!("received {received} messages from {queue} (asked for {page_size})");

        for message in messages {
            sink(message)?;
        }
        count += received;

        if let Some(limit) = limit {
            if count >= limit {
                break;
            }
        }
        if received == 0 {
            break;
        }
    }

    Ok(count)
}
