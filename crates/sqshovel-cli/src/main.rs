mod dump;
mod ls;
mod requeue;

use clap::{Parser, Subcommand};
use sqshovel::QueueClient;
use std::path::PathBuf;

#[tokio::main]
pub async fn main() {
    env_logger::init();

    if let Err(e) = Cli::parse().run().await {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}

#[derive(Debug, Parser)]
#[command(name = "sqshovel")]
#[command(about = "bulk-migrate messages out of and into AWS SQS queues", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List queues with their backlog metrics
    Ls {
        /// Only show queues whose name starts with this prefix
        #[arg(default_value = "")]
        prefix: String,
    },
    /// Dump messages from a queue into a JSON lines file
    Dump {
        queue_name: String,
        /// Number of messages to dump; omit to drain the whole queue
        #[arg(short, long)]
        number: Option<usize>,
        /// Directory to save the dump file in
        #[arg(short, long, default_value = "./")]
        path: PathBuf,
        /// Delete the dumped messages from the queue
        #[arg(short, long, default_value_t = true, action = clap::ArgAction::Set)]
        delete: bool,
    },
    /// Requeue messages from a dump file
    Requeue { queue_name: String, path: PathBuf },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let config = aws_config::from_env().load().await;
        let client = QueueClient::from_config(&config);

        match self.command {
            Commands::Ls { prefix } => ls::run(&client, &prefix).await,
            Commands::Dump {
                queue_name,
                number,
                path,
                delete,
            } => {
                dump::run(
                    &client,
                    dump::DumpOptions {
                        queue_name,
                        number,
                        path,
                        delete,
                    },
                )
                .await
            }
            Commands::Requeue { queue_name, path } => {
                requeue::run(&client, &queue_name, &path).await
            }
        }
    }
}
