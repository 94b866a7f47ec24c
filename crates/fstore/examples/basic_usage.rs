//! Basic Fstore Usage Example
//!
//! This example demonstrates:
//! - Opening a database
//! - Inserting, updating and deleting rows
//! - Listing ids with signed limits
//! - Filtering, time windows and id projection
//!
//! Run with: cargo run --example basic_usage

use fstore::prelude::*;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("fstore=debug,fstore_file=info")
        .init();

    let temp_dir = tempfile::tempdir()?;
    let db = Fstore::open(temp_dir.path())?;
    println!("Opened store at {}", db.dir().display());

    // 1. Insert rows
    let letters = db.table("letters")?;
    let mut ids = Vec::new();
    for c in 'a'..='z' {
        ids.push(letters.insert_serialize(&json!({ "letter": c.to_string() }))?);
    }
    println!("Inserted {} rows, first id {}", ids.len(), ids[0]);
    println!("First id was written at {}", db.date("%Y-%m-%d %H:%M:%S", ids[0])?);

    // 2. Update and delete
    letters.update_serialize(&json!({ "vowel": true }), ids[0])?;
    println!("Row a is now {}", Value::Object(letters.get(ids[0])?));
    letters.delete(ids[25])?;

    // 3. Bounded id listing
    println!("First three ids: {:?}", letters.ids(3)?);
    println!("Last three ids (newest first): {:?}", letters.ids(-3)?);

    // 4. Queries
    let vowels = letters
        .query()
        .filter(|row, _| {
            row.get("letter")
                .and_then(Value::as_str)
                .is_some_and(|l| "aeiou".contains(l))
        })
        .select_id_as("_id")
        .values("letter")?;
    for (id, letter) in vowels.iter() {
        println!("  {} -> {}", id, letter);
    }

    let today = letters.query().since("today")?.limit(5).ids()?;
    println!("Ids listed without filters: {}", today.len());

    Ok(())
}
