use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};

use gymdesk::{
    DEFAULT_CURRENCY, GymId, NewPayment, RecordStore, SQLitePaymentStore, UserId, create_profile,
    initialize_db,
};

/// A utility for creating a test database for the gymdesk API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,
}

/// (user ID, display name)
const MEMBERS: [(&str, Option<&str>); 4] = [
    ("user-asha", Some("Asha Patel")),
    ("user-ravi", Some("Ravi Kumar")),
    ("user-meera", Some("Meera Iyer")),
    ("user-no-name", None),
];

/// (member index, amount, status, method, plan, days ago)
const PAYMENTS: [(usize, f64, &str, Option<&str>, Option<&str>, i64); 7] = [
    (0, 1500.0, "success", Some("upi"), Some("Monthly"), 1),
    (1, 4000.0, "success", Some("card"), Some("Quarterly"), 3),
    (2, 15000.0, "pending", Some("netbanking"), Some("Annual + PT"), 6),
    (3, 200.0, "success", None, None, 10),
    (0, 1500.0, "failed", Some("card"), Some("Monthly"), 31),
    (1, 500.0, "refunded", Some("upi"), Some("Day Pass"), 45),
    (2, 1500.0, "completed", Some("cash"), Some("Monthly"), 60),
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

    println!("Creating test members...");
    let members: Vec<UserId> = MEMBERS.iter().map(|(id, _)| UserId::new(*id)).collect();
    for (user_id, (_, display_name)) in members.iter().zip(MEMBERS) {
        create_profile(user_id, display_name, &conn)?;
    }

    println!("Creating test payments...");
    let gym_id = GymId::new("gym-demo");
    let store = SQLitePaymentStore::new(Arc::new(Mutex::new(conn)));
    let now = OffsetDateTime::now_utc();

    for (member, amount, status, method, plan, days_ago) in PAYMENTS {
        store.insert_payment(NewPayment {
            gym_id: gym_id.clone(),
            user_id: members[member].clone(),
            amount,
            currency: DEFAULT_CURRENCY.to_owned(),
            status: status.to_owned(),
            payment_method: method.map(str::to_owned),
            description: plan.map(str::to_owned),
            transaction_date: now - Duration::days(days_ago),
        })?;
    }

    println!("Success! List the payments at /api/gyms/{gym_id}/transactions");

    Ok(())
}
