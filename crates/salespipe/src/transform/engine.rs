//! The pure reporting transform.
//!
//! Four steps, each total over well-typed input: city normalization,
//! price derivation, a left outer join, and projection into the fixed
//! reporting column order. No I/O, no failure path; the same inputs
//! always produce the same outputs.

use std::collections::HashMap;

use indexmap::IndexMap;
use log::warn;
use once_cell::sync::Lazy;

use super::report::TransformReport;
use crate::record::{CustomerRecord, ReportingRecord, TransactionRecord};

/// Canonical spellings for known city variants.
static CITY_NORMALIZATION: Lazy<IndexMap<&'static str, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        ("NewYork", "New York"),
        ("NYC", "New York"),
        ("Los Angeles", "Los Angeles"),
        ("LA", "Los Angeles"),
        ("Chicago", "Chicago"),
    ])
});

/// Look up the canonical form of a city value.
///
/// Returns `None` for values outside the normalization table; the
/// transform passes those through unchanged.
pub fn normalize_city(city: &str) -> Option<&'static str> {
    CITY_NORMALIZATION.get(city).copied()
}

/// A transaction with derived amounts; raw `price`/`tax_rate` dropped.
struct PricedTransaction {
    transaction_id: i64,
    user_id: i64,
    product_name: String,
    date: chrono::NaiveDate,
    final_price: f64,
    tax_amount: f64,
}

/// Map `(transactions, customers)` to the reporting rows.
///
/// Left-outer-join semantics: every transaction yields exactly one row,
/// and unmatched transactions keep `None` customer fields. Inputs are
/// never mutated; each step derives a new dataset from the previous one.
pub fn transform(
    transactions: &[TransactionRecord],
    customers: &[CustomerRecord],
) -> (Vec<ReportingRecord>, TransformReport) {
    let mut report = TransformReport::default();

    let customers = normalize_cities(customers, &mut report);
    let priced = derive_prices(transactions);
    let rows = join_and_project(&priced, &customers, &mut report);

    report.rows = rows.len();

    for (city, count) in &report.unmapped_cities {
        warn!("city '{}' not in normalization table ({} rows, passed through)", city, count);
    }
    if report.unmatched_transactions > 0 {
        warn!(
            "{} transactions matched no customer record",
            report.unmatched_transactions
        );
    }

    (rows, report)
}

/// Step 1: replace each city with its canonical form, recording values
/// the table does not cover.
fn normalize_cities(
    customers: &[CustomerRecord],
    report: &mut TransformReport,
) -> Vec<CustomerRecord> {
    customers
        .iter()
        .map(|customer| match normalize_city(&customer.city) {
            Some(canonical) => CustomerRecord {
                city: canonical.to_string(),
                ..customer.clone()
            },
            None => {
                report.record_unmapped_city(&customer.city);
                customer.clone()
            }
        })
        .collect()
}

/// Step 2: compute `tax_amount` and `final_price`, dropping the raw
/// `price` and `tax_rate` fields.
fn derive_prices(transactions: &[TransactionRecord]) -> Vec<PricedTransaction> {
    transactions
        .iter()
        .map(|tx| {
            let tax_amount = tx.price * tx.tax_rate;
            PricedTransaction {
                transaction_id: tx.transaction_id,
                user_id: tx.user_id,
                product_name: tx.product_name.clone(),
                date: tx.date,
                final_price: tx.price + tax_amount,
                tax_amount,
            }
        })
        .collect()
}

/// Steps 3 and 4: left-outer-join on `user_id = customer_id`, then
/// project into the reporting columns. Join keys are dropped.
///
/// At most one customer match is expected per id; if an id repeats, the
/// first occurrence wins.
fn join_and_project(
    transactions: &[PricedTransaction],
    customers: &[CustomerRecord],
    report: &mut TransformReport,
) -> Vec<ReportingRecord> {
    let mut by_id: HashMap<i64, &CustomerRecord> = HashMap::new();
    for customer in customers {
        by_id.entry(customer.customer_id).or_insert(customer);
    }

    transactions
        .iter()
        .map(|tx| {
            let customer = by_id.get(&tx.user_id).copied();
            if customer.is_none() {
                report.unmatched_transactions += 1;
            }

            ReportingRecord {
                transaction_id: tx.transaction_id,
                full_name: customer.map(|c| c.full_name.clone()),
                product_name: tx.product_name.clone(),
                date: tx.date,
                final_price: tx.final_price,
                tax_amount: tx.tax_amount,
                city: customer.map(|c| c.city.clone()),
                registration_date: customer.map(|c| c.registration_date),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn tx(id: i64, user: i64, product: &str, price: f64, tax_rate: f64) -> TransactionRecord {
        TransactionRecord {
            transaction_id: id,
            user_id: user,
            product_name: product.to_string(),
            date: date(2024, 1, 1),
            price,
            tax_rate,
        }
    }

    fn customer(id: i64, name: &str, city: &str) -> CustomerRecord {
        CustomerRecord {
            customer_id: id,
            full_name: name.to_string(),
            city: city.to_string(),
            registration_date: date(2020, 5, 1),
        }
    }

    #[test]
    fn test_worked_example() {
        let transactions = vec![tx(1, 7, "Widget", 100.0, 0.08)];
        let customers = vec![customer(7, "Ann Lee", "NYC")];

        let (rows, report) = transform(&transactions, &customers);

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.transaction_id, 1);
        assert_eq!(row.full_name.as_deref(), Some("Ann Lee"));
        assert_eq!(row.product_name, "Widget");
        assert_eq!(row.date, date(2024, 1, 1));
        assert!((row.final_price - 108.0).abs() < 1e-9);
        assert!((row.tax_amount - 8.0).abs() < 1e-9);
        assert_eq!(row.city.as_deref(), Some("New York"));
        assert_eq!(row.registration_date, Some(date(2020, 5, 1)));
        assert!(!report.has_gaps());
    }

    #[test]
    fn test_city_normalization_table() {
        assert_eq!(normalize_city("NewYork"), Some("New York"));
        assert_eq!(normalize_city("NYC"), Some("New York"));
        assert_eq!(normalize_city("LA"), Some("Los Angeles"));
        assert_eq!(normalize_city("Los Angeles"), Some("Los Angeles"));
        assert_eq!(normalize_city("Chicago"), Some("Chicago"));
        assert_eq!(normalize_city("Boston"), None);
    }

    #[test]
    fn test_unmapped_city_passes_through_and_is_reported() {
        let transactions = vec![tx(1, 7, "Widget", 10.0, 0.1)];
        let customers = vec![customer(7, "Ann Lee", "Springfield")];

        let (rows, report) = transform(&transactions, &customers);

        assert_eq!(rows[0].city.as_deref(), Some("Springfield"));
        assert_eq!(report.unmapped_cities.get("Springfield"), Some(&1));
        assert!(report.has_gaps());
    }

    #[test]
    fn test_left_join_preserves_cardinality() {
        let transactions = vec![
            tx(1, 7, "Widget", 10.0, 0.1),
            tx(2, 99, "Gadget", 20.0, 0.05),
            tx(3, 7, "Widget", 30.0, 0.0),
        ];
        let customers = vec![customer(7, "Ann Lee", "NYC")];

        let (rows, report) = transform(&transactions, &customers);

        assert_eq!(rows.len(), transactions.len());
        assert_eq!(report.rows, 3);
        assert_eq!(report.unmatched_transactions, 1);
    }

    #[test]
    fn test_unmatched_transaction_keeps_empty_customer_fields() {
        let transactions = vec![tx(2, 99, "Gadget", 20.0, 0.05)];
        let customers = vec![customer(7, "Ann Lee", "NYC")];

        let (rows, _) = transform(&transactions, &customers);

        let row = &rows[0];
        assert_eq!(row.transaction_id, 2);
        assert_eq!(row.full_name, None);
        assert_eq!(row.city, None);
        assert_eq!(row.registration_date, None);
        assert!((row.final_price - 21.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_customer_id_first_occurrence_wins() {
        let transactions = vec![tx(1, 7, "Widget", 10.0, 0.1)];
        let customers = vec![
            customer(7, "Ann Lee", "NYC"),
            customer(7, "Impostor", "Chicago"),
        ];

        let (rows, _) = transform(&transactions, &customers);

        assert_eq!(rows[0].full_name.as_deref(), Some("Ann Lee"));
        assert_eq!(rows[0].city.as_deref(), Some("New York"));
    }

    #[test]
    fn test_empty_inputs() {
        let (rows, report) = transform(&[], &[]);
        assert!(rows.is_empty());
        assert_eq!(report.rows, 0);
        assert!(!report.has_gaps());
    }

    #[test]
    fn test_deterministic() {
        let transactions = vec![
            tx(1, 7, "Widget", 100.0, 0.08),
            tx(2, 99, "Gadget", 20.0, 0.05),
        ];
        let customers = vec![customer(7, "Ann Lee", "LA")];

        let (first, _) = transform(&transactions, &customers);
        let (second, _) = transform(&transactions, &customers);
        assert_eq!(first, second);
    }

    #[test]
    fn test_final_price_formula() {
        let prices = [(100.0, 0.08), (0.0, 0.2), (19.99, 0.0), (42.5, 0.0825)];
        for (i, &(price, rate)) in prices.iter().enumerate() {
            let transactions = vec![tx(i as i64, 1, "Item", price, rate)];
            let (rows, _) = transform(&transactions, &[]);
            assert!((rows[0].tax_amount - price * rate).abs() < 1e-9);
            assert!((rows[0].final_price - price * (1.0 + rate)).abs() < 1e-9);
        }
    }
}
