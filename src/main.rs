use anyhow::{anyhow, Context, Result};
use std::io::Read;
use std::sync::mpsc;
use tracing_subscriber::EnvFilter;

use facturia::config::load_settings;
use facturia::{GenAiClient, InvoiceFeed, SnapshotEvent, StoreValue};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info"))
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings();
    let arg = std::env::args().nth(1);

    match arg.as_deref() {
        Some("verify-key") => {
            let client = GenAiClient::connect(&settings).await?;
            let valid = client.verify_key().await?;
            println!("{}", if valid { "valid" } else { "invalid" });
            if !valid {
                return Err(anyhow!("AI API key rejected for model {}", client.model()));
            }
            Ok(())
        }
        path => {
            let raw = read_snapshot(path)?;
            let feed = InvoiceFeed::new(settings.language);
            let (tx, rx) = mpsc::channel();
            let listener = feed.listen(rx);
            tx.send(SnapshotEvent::Records(StoreValue::from(raw)))?;
            drop(tx);
            listener
                .join()
                .map_err(|_| anyhow!("Invoice feed thread panicked"))?;

            let state = feed.current()?;
            println!("{}", serde_json::to_string_pretty(&state.invoices)?);
            Ok(())
        }
    }
}

fn read_snapshot(path: Option<&str>) -> Result<serde_json::Value> {
    let text = match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Read snapshot {}", path))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    serde_json::from_str(&text).map_err(|e| anyhow!("Invalid JSON snapshot: {}", e))
}
