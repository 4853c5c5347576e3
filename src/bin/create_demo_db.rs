use std::error::Error;
use std::path::Path;
use std::process::exit;

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use finanzas_rs::{CategoryName, Transaction, create_category, create_transaction, initialize_db};

/// A utility for creating a demo database for the REST API server of finanzas_rs.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

const DEMO_USER: &str = "demo";

const DEMO_CATEGORIES: [&str; 5] = ["Comida", "Transporte", "Servicios", "Salidas", "Sueldo"];

/// Descriptions and categories for the demo history, oldest first.
const DEMO_TRANSACTIONS: [(&str, f64, &str); 8] = [
    ("Sueldo octubre", 1_250_000.0, "Sueldo"),
    ("Almuerzo Don Pepe centro", -8_500.0, "Salidas"),
    ("ALMUERZO DON PEPE", -7_900.0, "Salidas"),
    ("Pago cuenta luz Enel", -32_000.0, "Servicios"),
    ("Supermercado Lider", -54_300.0, "Comida"),
    ("Carga tarjeta bip", -10_000.0, "uncategorized"),
    ("Almuerzo Don Pepe", -8_200.0, "uncategorized"),
    ("Uber a la oficina", -6_400.0, "uncategorized"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Creating categories for user {DEMO_USER:?}...");
    let user_id = DEMO_USER.to_owned();
    for name in DEMO_CATEGORIES {
        create_category(&user_id, CategoryName::new(name)?, &conn)?;
    }

    println!("Creating transactions...");
    let start = OffsetDateTime::now_utc() - Duration::days(DEMO_TRANSACTIONS.len() as i64);
    for (day, (description, amount, category)) in DEMO_TRANSACTIONS.into_iter().enumerate() {
        create_transaction(
            Transaction::build(DEMO_USER, amount, description)
                .category(category)
                .created_at(start + Duration::days(day as i64)),
            &conn,
        )?;
    }

    println!("Success!");

    Ok(())
}
