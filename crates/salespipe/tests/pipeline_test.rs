//! End-to-end tests for the reporting pipeline.

use std::fs;
use std::path::PathBuf;

use sqlx::{Row, SqlitePool};
use tempfile::TempDir;

use salespipe::{Pipeline, PipelineConfig, SalespipeError};

const TRANSACTIONS_CSV: &str = "\
transaction_id,user_id,product_name,date,price,tax_rate
1,7,Widget,2024-01-01,100,0.08
2,8,Gadget,2024-01-02,50,0.05
3,99,Gizmo,2024-01-03,20,0.1
";

const CUSTOMERS_CSV: &str = "\
customer_id,full_name,city,registration_date
7,Ann Lee,NYC,2020-05-01
8,Bob Ray,Springfield,2021-06-15
";

/// Write both source files into a temp dir and return a config pointing
/// at them.
fn fixture(transactions: &str, customers: &str) -> (TempDir, PipelineConfig) {
    let dir = TempDir::new().unwrap();
    let transactions_path = dir.path().join("transactions.csv");
    let customers_path = dir.path().join("customers.csv");
    fs::write(&transactions_path, transactions).unwrap();
    fs::write(&customers_path, customers).unwrap();

    let config = PipelineConfig {
        transactions_path,
        customers_path,
        database_path: dir.path().join("sales_data.db"),
        reporting_table: "sales_report".to_string(),
        ..PipelineConfig::default()
    };

    (dir, config)
}

async fn open(path: &PathBuf) -> SqlitePool {
    SqlitePool::connect(&format!("sqlite:{}", path.display()))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_full_run_loads_every_transaction() {
    let (_dir, config) = fixture(TRANSACTIONS_CSV, CUSTOMERS_CSV);
    let database_path = config.database_path.clone();

    let summary = Pipeline::with_config(config).run().await.unwrap();

    assert_eq!(summary.transactions_read, 3);
    assert_eq!(summary.customers_read, 2);
    assert_eq!(summary.rows_loaded, 3);
    assert_eq!(summary.unmatched_transactions, 1);
    assert_eq!(summary.unmapped_cities.get("Springfield"), Some(&1));

    let pool = open(&database_path).await;
    let rows = sqlx::query("SELECT * FROM sales_report ORDER BY transaction_id")
        .fetch_all(&pool)
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    // Worked example from the data model: 100 @ 8% tax.
    let first = &rows[0];
    assert_eq!(first.get::<String, _>("full_name"), "Ann Lee");
    assert_eq!(first.get::<String, _>("city"), "New York");
    assert!((first.get::<f64, _>("final_price") - 108.0).abs() < 1e-9);
    assert!((first.get::<f64, _>("tax_amount") - 8.0).abs() < 1e-9);

    // Unmapped city passes through unchanged.
    let second = &rows[1];
    assert_eq!(second.get::<String, _>("city"), "Springfield");

    // Unmatched transaction is present with empty customer fields.
    let third = &rows[2];
    assert_eq!(third.get::<Option<String>, _>("full_name"), None);
    assert_eq!(third.get::<Option<String>, _>("city"), None);
    assert_eq!(third.get::<Option<String>, _>("registration_date"), None);
}

#[tokio::test]
async fn test_reporting_table_column_order() {
    let (_dir, config) = fixture(TRANSACTIONS_CSV, CUSTOMERS_CSV);
    let database_path = config.database_path.clone();

    Pipeline::with_config(config).run().await.unwrap();

    let pool = open(&database_path).await;
    let columns: Vec<String> = sqlx::query("SELECT name FROM pragma_table_info('sales_report') ORDER BY cid")
        .fetch_all(&pool)
        .await
        .unwrap()
        .iter()
        .map(|r| r.get("name"))
        .collect();

    assert_eq!(columns, salespipe::REPORT_COLUMNS);
}

#[tokio::test]
async fn test_rerun_replaces_table() {
    let (_dir, config) = fixture(TRANSACTIONS_CSV, CUSTOMERS_CSV);
    let database_path = config.database_path.clone();
    let pipeline = Pipeline::with_config(config);

    pipeline.run().await.unwrap();
    pipeline.run().await.unwrap();

    let pool = open(&database_path).await;
    let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM sales_report")
        .fetch_one(&pool)
        .await
        .unwrap()
        .get("n");
    assert_eq!(count, 3);
}

#[tokio::test]
async fn test_missing_source_aborts_before_load() {
    let (dir, mut config) = fixture(TRANSACTIONS_CSV, CUSTOMERS_CSV);
    config.customers_path = dir.path().join("absent.csv");
    let database_path = config.database_path.clone();

    let err = Pipeline::with_config(config).run().await.unwrap_err();
    assert!(matches!(err, SalespipeError::MissingSource { .. }));

    // The run never reached the load step.
    assert!(!database_path.exists());
}

#[tokio::test]
async fn test_malformed_row_aborts_run() {
    let bad_transactions = "\
transaction_id,user_id,product_name,date,price,tax_rate
1,7,Widget,2024-01-01,abc,0.08
";
    let (_dir, config) = fixture(bad_transactions, CUSTOMERS_CSV);

    let err = Pipeline::with_config(config).run().await.unwrap_err();
    assert!(matches!(err, SalespipeError::InvalidRow { row: 1, .. }));
}

#[tokio::test]
async fn test_runs_are_deterministic() {
    let (_dir, config) = fixture(TRANSACTIONS_CSV, CUSTOMERS_CSV);
    let database_path = config.database_path.clone();
    let pipeline = Pipeline::with_config(config);

    pipeline.run().await.unwrap();
    let pool = open(&database_path).await;
    let first: Vec<(i64, f64)> = sqlx::query("SELECT transaction_id, final_price FROM sales_report ORDER BY transaction_id")
        .fetch_all(&pool)
        .await
        .unwrap()
        .iter()
        .map(|r| (r.get("transaction_id"), r.get("final_price")))
        .collect();
    pool.close().await;

    pipeline.run().await.unwrap();
    let pool = open(&database_path).await;
    let second: Vec<(i64, f64)> = sqlx::query("SELECT transaction_id, final_price FROM sales_report ORDER BY transaction_id")
        .fetch_all(&pool)
        .await
        .unwrap()
        .iter()
        .map(|r| (r.get("transaction_id"), r.get("final_price")))
        .collect();

    assert_eq!(first, second);
}
