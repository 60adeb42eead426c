//! The `dump` subcommand: drain a queue into a JSON lines file, then
//! optionally batch-delete what was captured.

use anyhow::{bail, Context};
use chrono::Local;
use sqshovel::{delete_in_chunks, fetch_up_to, Message, QueueClient};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct DumpOptions {
    pub queue_name: String,
    /// `None` drains the whole queue.
    pub number: Option<usize>,
    /// Directory the dump file lands in.
    pub path: PathBuf,
    pub delete: bool,
}

pub async fn run(client: &QueueClient, opts: DumpOptions) -> anyhow::Result<()> {
    let path = dump_file(&opts.path, &opts.queue_name);

    // Checked before any queue call: a prior dump is never overwritten.
    if path.exists() {
        bail!("File {} already exists", path.display());
    }

    let queue = client.resolve(&opts.queue_name).await?;

    // Opened lazily on the first message so an empty queue leaves no file.
    let mut file: Option<BufWriter<File>> = None;
    let mut fetched: Vec<Message> = Vec::new();

    let count = fetch_up_to(client, &queue, opts.number, |message| {
        if file.is_none() {
            let created = File::create_new(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            file = Some(BufWriter::new(created));
        }

        if let Some(writer) = file.as_mut() {
            serde_json::to_writer(&mut *writer, &message.dump_record())?;
            writer.write_all(b"\n")?;
        }

        if opts.delete {
            fetched.push(message);
        }

        Ok(())
    })
    .await;

    // Flushed before the fetch result is inspected, so a fatal mid-loop
    // error still leaves every captured line on disk.
    if let Some(mut writer) = file.take() {
        writer
            .flush()
            .with_context(|| format!("failed to flush {}", path.display()))?;
    }
    let count = count?;

    if opts.delete && !fetched.is_empty() {
        let report = delete_in_chunks(client, &queue, &fetched).await?;
        for failure in &report.failures {
            log::warn!("could not delete {}, code: {}", failure.id, failure.code);
        }
        if !report.failures.is_empty() {
            println!(
                "Removed {} of {} messages from {}",
                report.successes(),
                report.processed,
                opts.queue_name
            );
        }
    }

    if count == 0 {
        println!("Queue {} is empty", opts.queue_name);
    } else {
        println!("Dump saved in {} with {} messages", path.display(), count);
    }

    Ok(())
}

/// `DIR/QUEUE_NAME-YYYY-MM-DD.jsonl`, stamped with today's date.
pub fn dump_file(dir: &Path, queue_name: &str) -> PathBuf {
    dir.join(format!("{queue_name}-{}.jsonl", Local::now().date_naive()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_file_is_stamped_with_todays_date() {
        let path = dump_file(Path::new("/tmp/dumps"), "orders");
        let name = path.file_name().unwrap().to_str().unwrap();
        let today = Local::now().date_naive().to_string();
        assert_eq!(name, format!("orders-{today}.jsonl"));
        assert!(path.starts_with("/tmp/dumps"));
    }
}
