use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The kind of PT session a payment bought.
///
/// Free (event) sessions are settled at a fixed rate regardless of the
/// trainer's commission policy, so the distinction matters to the worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PtType {
    Regular,
    Free,
}

impl PtType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Regular => "regular",
            Self::Free => "free",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "regular" => Some(Self::Regular),
            "free" => Some(Self::Free),
            _ => None,
        }
    }
}

/// A single member payment, fetched for one trainer-month.
///
/// Read-only fact: the set of payments for a settlement period is treated as
/// immutable for the duration of one computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub member_name: String,
    pub pt_type: PtType,
    pub payment_amount: Decimal,
    pub payment_date: NaiveDate,
}
