//! # Seed Data Generator
//!
//! Populates the database with tables, staff and a menu for development.
//!
//! ## Usage
//! ```bash
//! # 12 tables (default)
//! cargo run -p comanda-db --bin seed
//!
//! # Custom table count and database path
//! cargo run -p comanda-db --bin seed -- --tables 20 --db ./data/comanda.db
//! ```
//!
//! Goes through the repositories, so every row passes the same validation
//! the front desk applies.

use clap::Parser;
use comanda_core::{NewMenuItem, NewStaff, NewTable, TableStatus};
use comanda_db::{Database, DbConfig};

/// Menu items: (description, sub-description, price in cents)
const MENU: &[(&str, Option<&str>, i64)] = &[
    ("Moqueca de peixe", Some("serve 2, com arroz e pirão"), 11_900),
    ("Bobó de camarão", Some("com arroz branco"), 8_900),
    ("Feijoada", Some("completa, com couve e farofa"), 6_500),
    ("Frango assado", Some("com batata frita"), 4_200),
    ("Picanha na chapa", Some("serve 2"), 12_900),
    ("Acarajé", Some("com vatapá e camarão"), 1_800),
    ("Pastel de queijo", None, 900),
    ("Caldo de sururu", None, 2_200),
    ("Arroz branco", Some("porção"), 1_200),
    ("Farofa de dendê", Some("porção"), 1_000),
    ("Água mineral", Some("500ml"), 500),
    ("Refrigerante", Some("lata"), 700),
    ("Suco de caju", Some("jarra"), 1_600),
    ("Cerveja", Some("600ml"), 1_400),
    ("Caipirinha", Some("limão"), 1_800),
    ("Cocada", None, 800),
];

/// Staff: (cpf, name)
const STAFF: &[(&str, &str)] = &[
    ("10000000001", "Ana Souza"),
    ("10000000002", "Bruno Lima"),
    ("10000000003", "Carla Santos"),
    ("10000000004", "Diego Alves"),
];

/// Seat counts cycled across generated tables.
const CAPACITIES: &[i64] = &[2, 4, 4, 6, 8];

#[derive(Parser, Debug)]
#[command(name = "seed", about = "Comanda development data generator")]
struct Args {
    /// Number of tables to create.
    #[arg(short, long, default_value_t = 12)]
    tables: usize,

    /// Database file path.
    #[arg(short, long, default_value = "./comanda_dev.db")]
    db: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("Comanda Seed Data Generator");
    println!("===========================");
    println!("Database: {}", args.db);
    println!("Tables:   {}", args.tables);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.tables().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} tables", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    for i in 0..args.tables {
        let capacity = CAPACITIES[i % CAPACITIES.len()];
        // Every fifth table starts reserved.
        let status = if i % 5 == 4 {
            TableStatus::Reserved
        } else {
            TableStatus::Free
        };
        db.tables().insert(&NewTable { capacity, status }).await?;
    }
    println!("✓ Created {} tables", args.tables);

    for (cpf, name) in STAFF {
        db.staff()
            .insert(&NewStaff {
                cpf: cpf.to_string(),
                name: name.to_string(),
            })
            .await?;
    }
    println!("✓ Created {} staff members", STAFF.len());

    for (description, sub_description, price_cents) in MENU {
        db.menu()
            .insert(&NewMenuItem {
                description: description.to_string(),
                sub_description: sub_description.map(str::to_string),
                price_cents: *price_cents,
            })
            .await?;
    }
    println!("✓ Created {} menu items", MENU.len());

    db.close().await;

    println!();
    println!("Done.");
    Ok(())
}
