//! The `ls` subcommand: one row per queue with its backlog metrics.

use aws_sdk_sqs::types::QueueAttributeName;
use chrono::DateTime;
use sqshovel::QueueClient;

pub async fn run(client: &QueueClient, prefix: &str) -> anyhow::Result<()> {
    let names = [
        QueueAttributeName::QueueArn,
        QueueAttributeName::ApproximateNumberOfMessages,
        QueueAttributeName::ApproximateNumberOfMessagesNotVisible,
        QueueAttributeName::LastModifiedTimestamp,
    ];

    let urls = client.list_queues(prefix).await?;

    let mut rows = vec![[
        "Queue".to_string(),
        "Messages Available".to_string(),
        "Messages Inflight".to_string(),
        "Last Modified".to_string(),
    ]];

    for url in &urls {
        let attrs = client.queue_attributes(url, &names).await?;

        let attr = |name: &QueueAttributeName| attrs.get(name).cloned().unwrap_or_default();
        let queue = attrs
            .get(&QueueAttributeName::QueueArn)
            .map(|arn| arn_tail(arn).to_string())
            .unwrap_or_else(|| url.clone());

        rows.push([
            queue,
            attr(&QueueAttributeName::ApproximateNumberOfMessages),
            attr(&QueueAttributeName::ApproximateNumberOfMessagesNotVisible),
            format_timestamp(&attr(&QueueAttributeName::LastModifiedTimestamp)),
        ]);
    }

    for line in render_table(&rows) {
        println!("{line}");
    }

    Ok(())
}

/// The queue name is the last segment of its ARN.
fn arn_tail(arn: &str) -> &str {
    arn.rsplit(':').next().unwrap_or(arn)
}

/// `LastModifiedTimestamp` arrives as epoch seconds.
fn format_timestamp(seconds: &str) -> String {
    seconds
        .parse::<i64>()
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_default()
}

fn render_table(rows: &[[String; 4]]) -> Vec<String> {
    let mut widths = [0usize; 4];
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(widths)
                .map(|(cell, width)| format!("{cell:<width$}"))
                .collect::<Vec<_>>()
                .join("  ")
                .trim_end()
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arn_tail_takes_the_last_segment() {
        assert_eq!(arn_tail("arn:aws:sqs:us-east-1:123456789012:orders"), "orders");
        assert_eq!(arn_tail("orders"), "orders");
    }

    #[test]
    fn formats_epoch_seconds() {
        assert_eq!(format_timestamp("1700000000"), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_timestamp("not-a-number"), "");
    }

    #[test]
    fn table_columns_align_on_the_widest_cell() {
        let rows = [
            [
                "Queue".to_string(),
                "Messages Available".to_string(),
                "Messages Inflight".to_string(),
                "Last Modified".to_string(),
            ],
            [
                "orders-dead-letter".to_string(),
                "3".to_string(),
                "0".to_string(),
                "2023-11-14 22:13:20 UTC".to_string(),
            ],
        ];

        let lines = render_table(&rows);
        assert_eq!(lines[0], "Queue               Messages Available  Messages Inflight  Last Modified");
        assert_eq!(lines[1], "orders-dead-letter  3                   0                  2023-11-14 22:13:20 UTC");
    }
}
