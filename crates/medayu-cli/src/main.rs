//! Medayu operator CLI.
//!
//! Provides the `medayu` binary for tasks that have no page in the manager
//! backend: creating manager accounts and inspecting carousel positions.
//! Both work directly on the SQLite database the server uses.

use std::process;

use clap::{Parser, Subcommand};

use medayu_core::{password, SlotMap, MAX_SLIDES};
use medayu_storage::{ContentStore, SqliteStore, StorageError};

/// Medayu site operator tools.
#[derive(Parser)]
#[command(name = "medayu", about = "Medayu site operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Register a manager account.
    CreateManager {
        /// Path to the site database file.
        #[arg(short, long)]
        db: String,

        /// Display name.
        #[arg(short, long)]
        name: String,

        /// Login email.
        #[arg(short, long)]
        email: String,

        /// Initial password (at least 6 characters with upper, lower and digit).
        #[arg(short, long)]
        password: String,
    },
    /// Print used and available carousel positions as JSON.
    Slots {
        /// Path to the site database file.
        #[arg(short, long)]
        db: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::CreateManager {
            db,
            name,
            email,
            password,
        } => run_create_manager(&db, &name, &email, &password),
        Commands::Slots { db } => run_slots(&db),
    };
    process::exit(exit_code);
}

fn open_store(db_path: &str) -> Result<SqliteStore, i32> {
    SqliteStore::new(db_path).map_err(|e| {
        eprintln!("Error: failed to open database '{}': {}", db_path, e);
        3
    })
}

/// Execute the create-manager subcommand.
///
/// Returns exit code: 0 = success, 1 = rejected input, 3 = database error.
fn run_create_manager(db_path: &str, name: &str, email: &str, plain_password: &str) -> i32 {
    if name.trim().is_empty() || email.trim().is_empty() {
        eprintln!("Error: name and email must not be blank");
        return 1;
    }
    if let Err(e) = password::check_policy(plain_password) {
        eprintln!("Error: {}", e);
        return 1;
    }
    let hash = match password::hash(plain_password) {
        Ok(hash) => hash,
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    let mut store = match open_store(db_path) {
        Ok(store) => store,
        Err(code) => return code,
    };
    match store.insert_manager(name.trim(), email.trim(), &hash) {
        Ok(id) => {
            println!("{}", serde_json::json!({ "id": id, "email": email.trim() }));
            0
        }
        Err(e @ StorageError::DuplicateEmail(_)) => {
            eprintln!("Error: {}", e);
            1
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            3
        }
    }
}

/// Execute the slots subcommand.
///
/// Returns exit code: 0 = success, 3 = database error.
fn run_slots(db_path: &str) -> i32 {
    let store = match open_store(db_path) {
        Ok(store) => store,
        Err(code) => return code,
    };
    let used = match store.used_ordinals() {
        Ok(used) => used,
        Err(e) => {
            eprintln!("Error: failed to read carousel: {}", e);
            return 3;
        }
    };
    let slots = SlotMap::from_used(used);
    let report = serde_json::json!({
        "capacity": MAX_SLIDES,
        "used": slots.used(),
        "available": slots.available(None),
        "full": slots.is_full(),
    });
    let json = serde_json::to_string_pretty(&report).unwrap_or_else(|e| {
        format!("{{\"error\": \"failed to serialize report: {}\"}}", e)
    });
    println!("{}", json);
    0
}
