//! The `requeue` subcommand: replay a dump file into a queue.

use anyhow::{bail, Context};
use sqshovel::{send_in_chunks, DumpRecord, QueueClient};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub async fn run(client: &QueueClient, queue_name: &str, path: &Path) -> anyhow::Result<()> {
    if !path.exists() {
        bail!("Path {} not found", path.display());
    }

    let records = read_records(path)?;
    let queue = client.resolve(queue_name).await?;

    let report = send_in_chunks(client, &queue, &records).await?;
    for failure in &report.failures {
        log::warn!("could not requeue {}, code: {}", failure.id, failure.code);
    }

    if report.failures.is_empty() {
        println!("Requeued {} messages to {}", report.processed, queue_name);
    } else {
        println!(
            "Requeued {} of {} messages to {} ({} failed)",
            report.successes(),
            report.processed,
            queue_name,
            report.failures.len()
        );
    }

    Ok(())
}

/// Parses every line of the dump file up front; a malformed line is a fatal
/// input error reported with its line number, before anything is enqueued.
fn read_records(path: &Path) -> anyhow::Result<Vec<DumpRecord>> {
    let file =
        File::open(path).with_context(|| format!("failed to open {}", path.display()))?;

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.with_context(|| format!("failed to read {}", path.display()))?;
        if line.trim().is_empty() {
            continue;
        }

        let record: DumpRecord = serde_json::from_str(&line).with_context(|| {
            format!("{}:{} is not a valid dump record", path.display(), index + 1)
        })?;
        records.push(record);
    }

    Ok(records)
}
