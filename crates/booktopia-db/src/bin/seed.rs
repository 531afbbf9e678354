//! # Seed Data Generator
//!
//! Populates the database with a small bookstore for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./booktopia.db (default)
//! cargo run -p booktopia-db --bin seed
//!
//! # Specify database path
//! cargo run -p booktopia-db --bin seed -- --db ./data/booktopia.db
//! ```
//!
//! ## Generated Data
//! - A catalog of titles across a handful of genres
//! - A few customers
//! - One order per customer per month of 2018, each with line items,
//!   so the `/titles/top/...` reports have something to rank

use chrono::NaiveDate;
use std::env;

use booktopia_core::{Money, NewCustomer, NewOrder, NewOrderDetail, TitleInput};
use booktopia_db::{Database, DbConfig};

/// (title, author, publisher, genre, published, price in cents)
#[rustfmt::skip]
const CATALOG: &[(&str, &str, &str, Option<&str>, (i32, u32, u32), Option<i64>)] = &[
    ("The Murder of Roger Ackroyd", "Agatha Christie", "Collins", Some("Mystery"), (1926, 6, 1), Some(1499)),
    ("And Then There Were None", "Agatha Christie", "Collins", Some("Mystery"), (1939, 11, 6), Some(1299)),
    ("The Big Sleep", "Raymond Chandler", "Knopf", Some("Mystery"), (1939, 2, 6), Some(1150)),
    ("Dune", "Frank Herbert", "Chilton", Some("Science Fiction"), (1965, 8, 1), Some(1899)),
    ("The Left Hand of Darkness", "Ursula K. Le Guin", "Ace", Some("Science Fiction"), (1969, 3, 1), Some(1600)),
    ("The Dispossessed", "Ursula K. Le Guin", "Harper", Some("Science Fiction"), (1974, 5, 1), Some(1700)),
    ("Dracula", "Bram Stoker", "Constable", Some("Horror"), (1897, 5, 26), Some(899)),
    ("The Haunting of Hill House", "Shirley Jackson", "Viking", Some("Horror"), (1959, 10, 16), Some(1399)),
    ("Leaves of Grass", "Walt Whitman", "Self", Some("Poetry"), (1855, 7, 4), None),
    ("A Field Guide to Getting Lost", "Rebecca Solnit", "Viking", None, (2005, 7, 1), Some(2000)),
];

const CUSTOMERS: &[(&str, &str, &str)] = &[
    ("avid_reader", "Toronto", "ON"),
    ("bookworm", "Vancouver", "BC"),
    ("night_owl", "Halifax", "NS"),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./booktopia.db");

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
                println!("Booktopia Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./booktopia.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Booktopia Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    let (total, applied) = db.migration_status().await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied ({}/{})", applied, total);

    let existing = db.titles().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} titles", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    // Titles
    println!();
    println!("Adding titles...");
    let mut title_ids = Vec::with_capacity(CATALOG.len());
    for (idx, (title, author, publisher, genre, (y, m, d), price)) in CATALOG.iter().enumerate() {
        let pub_date = NaiveDate::from_ymd_opt(*y, *m, *d)
            .ok_or_else(|| format!("bad catalog date for {}", title))?;

        let created = db
            .titles()
            .insert(&TitleInput {
                title_id: None,
                title: title.to_string(),
                isbn: format!("978{:010}", 1_000_003 * (idx + 1)),
                author: author.to_string(),
                publisher: publisher.to_string(),
                genre: genre.map(str::to_string),
                pub_date,
                price: price.map(Money::from_cents),
                row_version: None,
            })
            .await?;
        title_ids.push(created.title_id);
    }
    println!("✓ Added {} titles", title_ids.len());

    // Customers
    let mut customer_ids = Vec::with_capacity(CUSTOMERS.len());
    for (user_name, city, province) in CUSTOMERS {
        let created = db
            .customers()
            .insert(&NewCustomer {
                user_name: user_name.to_string(),
                password: "changeme".to_string(),
                email: format!("{}@example.com", user_name),
                province: province.to_string(),
                city: city.to_string(),
                address: "100 Main St".to_string(),
                zip_code: "A1A1A1".to_string(),
                phone: "5555550100".to_string(),
            })
            .await?;
        customer_ids.push(created.customer_id);
    }
    println!("✓ Added {} customers", customer_ids.len());

    // Orders: skewed so the rankings aren't flat
    let mut orders = 0;
    let mut lines = 0;
    for month in 1..=12u32 {
        for (c_idx, customer_id) in customer_ids.iter().enumerate() {
            let order_date = NaiveDate::from_ymd_opt(2018, month, 1 + (c_idx as u32) * 7);
            let order = db
                .orders()
                .insert(&NewOrder {
                    customer_id: *customer_id,
                    order_date,
                    status: Some("Shipped".to_string()),
                })
                .await?;
            orders += 1;

            for (t_idx, title_id) in title_ids.iter().enumerate() {
                let seed = month as usize + c_idx * 3 + t_idx;
                if seed % 3 != 0 {
                    continue;
                }
                let count = 1 + ((t_idx * 7 + month as usize) % 5) as i64;

                if let Err(e) = db
                    .orders()
                    .add_detail(&NewOrderDetail {
                        order_id: order.order_id,
                        title_id: *title_id,
                        count,
                    })
                    .await
                {
                    eprintln!("Failed to add line item to order {}: {}", order.order_id, e);
                    continue;
                }
                lines += 1;
            }
        }
    }
    println!("✓ Added {} orders with {} line items", orders, lines);

    println!();
    println!("✓ Seed complete!");

    Ok(())
}
