//! Volumes landing page watching an attachment settle
//!
//! Run with `RUST_LOG=landing=debug cargo run --example watch_volumes`.

use anyhow::Result;
use landing::prelude::*;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn volume(id: &str, name: &str, zone: &str, status: &str) -> Record {
    Record::new()
        .with("id", id)
        .with("name", name)
        .with("zone", zone)
        .with("status", status)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("landing=info")),
        )
        .init();

    println!("🚀 Landing Volumes Example\n");

    let config = ConsoleConfig::default_config();
    let volumes = config.resource("volumes")?.clone();

    let source = Arc::new(InMemoryRecordSource::new(vec![
        volume("vol-1a2b", "database", "us-east-1a", "in-use"),
        volume("vol-3c4d", "logs", "us-east-1b", "attaching"),
        volume("vol-5e6f", "scratch", "us-east-1a", "available"),
    ]));

    let events = EventBus::default();
    let mut rx = events.subscribe();
    tokio::spawn(async move {
        while let Ok(envelope) = rx.recv().await {
            println!("📣 {} {}", envelope.event.name(), serde_json::to_string(&envelope.event).unwrap_or_default());
        }
    });

    let mut page = LandingPage::open(
        volumes,
        source.clone(),
        Arc::new(InMemoryKeyValueStore::new()),
        events,
        QueryParams::parse("?zone=us-east-1a&zone=us-east-1b&filter=1"),
    );

    let summary = page.load().await?;
    println!(
        "\n📋 {} volumes, {} displayed, {} transitional\n",
        summary.total, summary.displayed, summary.transitional
    );

    page.set_sort_key("zone")?;
    for row in page.rows() {
        println!(
            "  {} {:<10} {}",
            row.get_str("id").unwrap_or_default(),
            ellipsis(row.get_str("name").unwrap_or_default(), 8),
            row.get_str("status").unwrap_or_default()
        );
    }

    println!("\n⏳ Waiting for vol-3c4d to attach...\n");
    tokio::time::sleep(Duration::from_secs(2)).await;
    source.set_records(vec![
        volume("vol-1a2b", "database", "us-east-1a", "in-use"),
        volume("vol-3c4d", "logs", "us-east-1b", "in-use"),
        volume("vol-5e6f", "scratch", "us-east-1a", "available"),
    ]);

    while page.list().is_polling() {
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    println!("\n✅ Polling stopped after {} fetches", source.fetch_count());

    let matches = page.search("DATA");
    println!("🔍 Search 'DATA': {} match(es)", matches.len());

    page.close();
    Ok(())
}
