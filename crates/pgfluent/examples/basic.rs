//! Basic usage example for pgfluent
//!
//! Run with: cargo run --example basic -p pgfluent
//!
//! Set the connection config in .env or the environment:
//! DB_TYPE=postgres DB_HOST=localhost DB_NAME=pgfluent_example
//! DB_USER=postgres DB_PASSWORD=postgres DB_PREFIX=app_

use pgfluent::{Database, DatabaseConfig, FluentError, Statement};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), FluentError> {
    // Load .env file
    dotenvy::dotenv().ok();

    let config = DatabaseConfig::from_env()?;
    let db = Database::connect(&config).await?;

    // Setup: create the (prefixed) table and start clean
    let physical = format!("{}widgets", db.prefix());
    db.client()
        .execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {physical} (
                    id BIGSERIAL PRIMARY KEY,
                    name TEXT NOT NULL,
                    qty BIGINT
                )"
            ),
            &[],
        )
        .await?;
    db.client()
        .execute(&format!("DELETE FROM {physical}"), &[])
        .await?;

    // ============================================
    // INSERT
    // ============================================
    println!("=== INSERT ===");

    for (name, qty) in [("hammer", 3), ("wrench", 7), ("pliers", 1)] {
        let done = db
            .statement()
            .insert("widgets", [("name", json!(name)), ("qty", json!(qty))])?
            .execute(&db)
            .await?;
        println!("inserted {name}: {}", done.succeeded());
    }

    // ============================================
    // SELECT
    // ============================================
    println!("\n=== SELECT ===");

    let rows = db
        .statement()
        .select(["id", "name", "qty"])
        .from("widgets")
        .order_by("qty", Statement::DESC)?
        .limit(2)
        .execute(&db)
        .await?
        .into_rows()
        .expect("select returns rows");

    for row in &rows {
        let id: i64 = row.get("id");
        let name: String = row.get("name");
        let qty: i64 = row.get("qty");
        println!("#{id} {name} qty={qty}");
    }

    // ============================================
    // UPDATE
    // ============================================
    println!("\n=== UPDATE ===");

    db.statement()
        .update("widgets", [("qty", json!(10))])?
        .filter("name", "=", "pliers")
        .execute(&db)
        .await?;

    let rows = db
        .statement()
        .select(["qty"])
        .from("widgets")
        .filter("name", "=", "pliers")
        .execute(&db)
        .await?
        .into_rows()
        .expect("select returns rows");
    println!("pliers qty is now {}", rows[0].get::<_, i64>("qty"));

    // ============================================
    // DELETE
    // ============================================
    println!("\n=== DELETE ===");

    let done = db
        .statement()
        .delete()
        .from("widgets")
        .filter("qty", "<", 5i64)
        .execute(&db)
        .await?;
    println!("delete succeeded: {}", done.succeeded());

    Ok(())
}
