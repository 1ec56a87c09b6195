//! # Seed Data Loader
//!
//! Loads the twelve-item launch catalog into a database for development.
//!
//! ## Usage
//! ```bash
//! cargo run -p kaza-db --bin seed
//!
//! # Specify database path
//! cargo run -p kaza-db --bin seed -- --db ./data/kaza.db
//! ```

use kaza_core::{Catalog, CatalogQuery};
use kaza_db::{Database, DbConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kaza_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kaza Storefront Seed Loader");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kaza_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kaza Storefront Seed Loader");
    println!("==============================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let catalog = Catalog::sample();
    let inserted = db.products().insert_many(catalog.items()).await?;
    println!("✓ Inserted {} products", inserted);

    // Read back through the same path the storefront uses
    let stored = Catalog::new(db.products().list().await?)?;
    println!();
    println!("Categories: {}", stored.categories().join(", "));
    for item in stored.query(&CatalogQuery::default()) {
        println!("  {:>3}  {:<36} {}", item.id, item.name, item.price());
    }

    db.close().await;
    println!();
    println!("✓ Seed complete");
    Ok(())
}
