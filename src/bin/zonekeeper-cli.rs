//! Client CLI for the zonekeeper service directory.
//!
//! `register` announces once; `announce` keeps re-announcing on an
//! interval, which is how long-lived services are expected to stay listed.

use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "zonekeeper-cli")]
#[command(about = "Client for the zonekeeper service directory", long_about = None)]
struct Cli {
    /// Base URL of the directory.
    #[arg(short, long, default_value = "http://localhost:3353")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the directory itself is alive
    Health,
    /// Register once under a key
    Register {
        /// Registration key; becomes the hostname in the zone
        key: String,
        /// Health/service port to advertise (directory default if omitted)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Re-announce on an interval until interrupted
    Announce {
        /// Registration key; becomes the hostname in the zone
        key: String,
        /// Health/service port to advertise (directory default if omitted)
        #[arg(short, long)]
        port: Option<u16>,
        /// Seconds between announcements
        #[arg(short, long, default_value_t = 15)]
        interval_secs: u64,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Health => {
            let res = client
                .get(format!("{}/health", cli.url))
                .send()
                .await?;
            let status = res.status();
            let json: Value = res.json().await?;
            println!("{} {}", status, serde_json::to_string_pretty(&json)?);
        }
        Commands::Register { key, port } => {
            register(&client, &cli.url, &key, port).await?;
            println!("registered {key}");
        }
        Commands::Announce {
            key,
            port,
            interval_secs,
        } => loop {
            match register(&client, &cli.url, &key, port).await {
                Ok(()) => println!("announced {key}"),
                Err(error) => eprintln!("announce failed: {error}"),
            }
            tokio::time::sleep(Duration::from_secs(interval_secs)).await;
        },
    }

    Ok(())
}

async fn register(
    client: &reqwest::Client,
    url: &str,
    key: &str,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut query: Vec<(&str, String)> = vec![("key", key.to_string())];
    if let Some(port) = port {
        query.push(("port", port.to_string()));
    }

    let res = client
        .get(format!("{url}/register"))
        .query(&query)
        .send()
        .await?;

    if !res.status().is_success() {
        return Err(format!("directory returned status {}", res.status()).into());
    }
    Ok(())
}
