//! # Seed Data Generator
//!
//! Populates the database with a clothing catalog for development.
//!
//! ## Usage
//! ```bash
//! # Generate 200 products (default)
//! cargo run -p atelier-db --bin seed
//!
//! # Generate custom amount
//! cargo run -p atelier-db --bin seed -- --count 500
//!
//! # Specify database path
//! cargo run -p atelier-db --bin seed -- --db ./data/atelier.db
//! ```
//!
//! ## Generated Products
//! Creates realistic clothing data across categories (shirts, trousers,
//! dresses, outerwear, accessories). Each product gets a size/color variant
//! grid with SKUs of the form `{BARCODE}-{SIZE}-{COLOR}` and per-variant
//! stock levels.

use chrono::Utc;
use std::env;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use atelier_core::{Category, Product, ProductVariant};
use atelier_db::{Database, DbConfig};

/// Clothing categories with display colors and product names
const CATEGORIES: &[(&str, &str, &[&str])] = &[
    (
        "Shirts",
        "#2563eb",
        &[
            "Crew Neck Tee",
            "V-Neck Tee",
            "Oxford Shirt",
            "Linen Shirt",
            "Flannel Shirt",
            "Polo Shirt",
            "Henley",
            "Graphic Tee",
            "Striped Tee",
            "Chambray Shirt",
        ],
    ),
    (
        "Trousers",
        "#16a34a",
        &[
            "Slim Chinos",
            "Straight Jeans",
            "Relaxed Jeans",
            "Jogger Pants",
            "Cargo Pants",
            "Wool Trousers",
            "Linen Trousers",
            "Denim Shorts",
            "Chino Shorts",
            "Track Pants",
        ],
    ),
    (
        "Dresses",
        "#db2777",
        &[
            "Wrap Dress",
            "Shift Dress",
            "Maxi Dress",
            "Slip Dress",
            "Shirt Dress",
            "Sundress",
            "A-Line Dress",
            "Bodycon Dress",
            "Midi Dress",
            "Pleated Dress",
        ],
    ),
    (
        "Outerwear",
        "#ea580c",
        &[
            "Denim Jacket",
            "Bomber Jacket",
            "Trench Coat",
            "Puffer Jacket",
            "Wool Coat",
            "Rain Shell",
            "Hooded Parka",
            "Leather Jacket",
            "Fleece Zip-Up",
            "Windbreaker",
        ],
    ),
    (
        "Accessories",
        "#7c3aed",
        &[
            "Leather Belt",
            "Canvas Belt",
            "Wool Scarf",
            "Silk Scarf",
            "Baseball Cap",
            "Beanie",
            "Leather Gloves",
            "Tote Bag",
            "Crossbody Bag",
            "Knit Socks",
        ],
    ),
];

const SIZES: &[&str] = &["XS", "S", "M", "L", "XL"];

const COLORS: &[(&str, &str)] = &[
    ("Black", "BLK"),
    ("White", "WHT"),
    ("Navy", "NVY"),
    ("Olive", "OLV"),
    ("Beige", "BGE"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut count: usize = 200;
    let mut db_path = String::from("./atelier_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(200);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Atelier POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of products to generate (default: 200)");
                println!("  -d, --db <PATH>    Database file path (default: ./atelier_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Atelier POS Seed Data Generator");
    println!("==================================");
    println!("Database: {}", db_path);
    println!("Products: {}", count);
    println!();

    // Connect to database
    let config = DbConfig::new(&db_path);
    let db = Database::new(config).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // Check existing products
    let existing = db.catalog().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Insert categories first
    println!();
    println!("Creating categories...");
    let mut category_ids = Vec::new();
    for (name, color, _) in CATEGORIES {
        let category = Category {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            color: color.to_string(),
        };
        db.catalog().insert_category(&category).await?;
        category_ids.push(category.id);
    }
    println!("✓ Created {} categories", category_ids.len());

    // Generate products
    println!();
    println!("Generating products...");

    let mut generated = 0;
    let start = std::time::Instant::now();

    'outer: loop {
        for (category_idx, (_, _, names)) in CATEGORIES.iter().enumerate() {
            for (name_idx, name) in names.iter().enumerate() {
                if generated >= count {
                    break 'outer;
                }

                let seed = generated * 13 + category_idx * 3 + name_idx;
                let product = generate_product(&category_ids[category_idx], name, generated, seed);

                if let Err(e) = db.catalog().insert(&product).await {
                    eprintln!("Failed to insert {}: {}", product.name, e);
                    continue;
                }

                generated += 1;

                if generated % 50 == 0 {
                    println!("  Generated {} products...", generated);
                }
            }
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!("✓ Generated {} products in {:?}", generated, elapsed);
    println!(
        "  Rate: {:.0} products/second",
        generated as f64 / elapsed.as_secs_f64()
    );

    // Sanity-check the search path
    println!();
    println!("Verifying search...");
    let results = db.catalog().search("tee").await?;
    println!("  Search 'tee': {} results", results.len());

    println!();
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates a single clothing product with a size/color variant grid.
fn generate_product(category_id: &str, name: &str, index: usize, seed: usize) -> Product {
    let now = Utc::now();

    // 8-digit barcode, unique per product
    let barcode = format!("{:08}", 40000000 + index);

    // Base price $14.99 - $94.99 in 50-cent steps
    let price_cents = 1499 + ((seed * 37) % 160) as i64 * 50;

    // Cost 40-60% of price
    let cost_pct = 40 + (seed % 20) as i64;
    let cost_price_cents = price_cents * cost_pct / 100;

    // Variant grid: every size in two colors, rotating through the palette
    let mut variants = Vec::new();
    for (size_idx, size) in SIZES.iter().enumerate() {
        for color_offset in 0..2 {
            let (color, color_code) = COLORS[(seed + color_offset) % COLORS.len()];
            variants.push(ProductVariant {
                size: size.to_string(),
                color: color.to_string(),
                stock: ((seed + size_idx * 7 + color_offset * 3) % 25) as i64,
                sku: format!("{}-{}-{}", barcode, size, color_code),
            });
        }
    }

    Product {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        barcode,
        category_id: category_id.to_string(),
        price_cents,
        cost_price_cents,
        variants,
        created_at: now,
        updated_at: now,
    }
}
