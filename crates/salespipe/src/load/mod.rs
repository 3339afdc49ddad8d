//! Load step: replace the reporting table contents in SQLite.

use log::info;
use sqlx::SqlitePool;

use crate::error::{Result, SalespipeError};
use crate::record::{REPORT_COLUMNS, ReportingRecord};

/// Reject table names that are not plain identifiers. Table names cannot
/// be bound as query parameters, so this gates the string interpolation
/// below.
pub(crate) fn validate_table_name(name: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => {
            (first.is_ascii_alphabetic() || first == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(SalespipeError::InvalidTableName(name.to_string()))
    }
}

/// Replace the contents of `table` with the given reporting rows.
///
/// Drop-and-recreate plus inserts run inside a single transaction, so a
/// failed load leaves the previous table intact. There is no append mode
/// and no migration; prior contents are always fully replaced.
pub async fn load(pool: &SqlitePool, table: &str, rows: &[ReportingRecord]) -> Result<usize> {
    validate_table_name(table)?;

    let mut tx = pool.begin().await?;

    sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
        .execute(&mut *tx)
        .await?;

    sqlx::query(&format!(
        "CREATE TABLE {table} (
            transaction_id INTEGER NOT NULL,
            full_name TEXT,
            product_name TEXT NOT NULL,
            date TEXT NOT NULL,
            final_price REAL NOT NULL,
            tax_amount REAL NOT NULL,
            city TEXT,
            registration_date TEXT
        )"
    ))
    .execute(&mut *tx)
    .await?;

    let insert = format!(
        "INSERT INTO {table} ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        REPORT_COLUMNS.join(", ")
    );

    for row in rows {
        sqlx::query(&insert)
            .bind(row.transaction_id)
            .bind(&row.full_name)
            .bind(&row.product_name)
            .bind(row.date)
            .bind(row.final_price)
            .bind(row.tax_amount)
            .bind(&row.city)
            .bind(row.registration_date)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;

    info!("loaded {} rows into '{}'", rows.len(), table);
    Ok(rows.len())
}
