/// pirstream usage demo
///
/// Builds a small stream database in a temporary directory, then:
/// - prints the verbose and compact catalogs
/// - reads a real and a fake stream
/// - reads an aggregated group
/// - prints statistics

use pirstream::core::config::Config;
use pirstream::core::database::{DatabaseHandler, StreamDatabase};
use pirstream::core::types::{CatalogMode, StreamId};
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("\n╔═══════════════════════════════════════════════╗");
    println!("║        pirstream - Stream Database Demo       ║");
    println!("╚═══════════════════════════════════════════════╝\n");

    // Step 1: Lay out the database directory
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("0"), b"AB\n")?;
    fs::write(dir.path().join("2"), b"")?;
    fs::write(dir.path().join("README"), b"not a stream")?;

    // Step 2: Open with 4 logical streams
    println!("Opening database at {}...", dir.path().display());
    let db = StreamDatabase::open(Config::new(dir.path(), 4))?;
    println!("Done!\n");

    // Step 3: Catalogs
    println!("Verbose catalog:\n{}", db.get_catalog(CatalogMode::Verbose));
    println!("Compact catalog:\n{}", db.get_catalog(CatalogMode::Compact));
    for anomaly in db.catalog().anomalies() {
        println!("  not served: {}", anomaly);
    }

    // Step 4: Single stream reads, always 8 bytes
    let real = db.read_stream_at(StreamId(0), 0, 8)?;
    let fake = db.read_stream_at(StreamId(1), 0, 8)?;
    println!("\nstream 0: {:?}", real);
    println!("stream 1: {:?}", fake);

    // Step 5: Aggregated read of streams 2 and 3
    let group = db.aggregated_reader().read_aggregated_stream_vec(1, 2, 0, 8)?;
    println!("group 1 (alpha=2): {:?}", group);

    // Step 6: Statistics
    println!("\nStats: {}", db.stats().to_json()?);

    Ok(())
}
