//! Feature encoding for the churn classifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Feature columns, in model input order.
pub const CHURN_FEATURES: [&str; 4] = ["tenure", "MonthlyCharges", "TotalCharges", "Contract"];

/// Contract term of a customer.
///
/// Parsing is strict: an unrecognized string is an error, not a silent
/// month-to-month default, so "unknown" can never be conflated with a
/// valid category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractTerm {
    MonthToMonth,
    OneYear,
    TwoYear,
}

impl ContractTerm {
    /// Ordinal encoding used by the model.
    pub fn code(&self) -> f64 {
        match self {
            ContractTerm::MonthToMonth => 0.0,
            ContractTerm::OneYear => 1.0,
            ContractTerm::TwoYear => 2.0,
        }
    }
}

impl FromStr for ContractTerm {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "Month-to-month" => Ok(ContractTerm::MonthToMonth),
            "One year" => Ok(ContractTerm::OneYear),
            "Two year" => Ok(ContractTerm::TwoYear),
            other => Err(format!(
                "unknown contract term '{}'. Use: Month-to-month, One year, or Two year.",
                other
            )),
        }
    }
}

impl fmt::Display for ContractTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContractTerm::MonthToMonth => write!(f, "Month-to-month"),
            ContractTerm::OneYear => write!(f, "One year"),
            ContractTerm::TwoYear => write!(f, "Two year"),
        }
    }
}

/// One labeled training example read from the feature table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChurnObservation {
    /// Months the customer has been subscribed.
    pub tenure: f64,
    pub monthly_charges: f64,
    /// Arrives as text in the source data; coerced to a number with a
    /// 0.0 fallback at extraction.
    pub total_charges: f64,
    pub contract: ContractTerm,
    /// Label: whether the customer churned.
    pub churned: bool,
}

impl ChurnObservation {
    /// Model input vector, in [`CHURN_FEATURES`] order.
    pub fn features(&self) -> [f64; 4] {
        [
            self.tenure,
            self.monthly_charges,
            self.total_charges,
            self.contract.code(),
        ]
    }
}
