//! Core data models: the records served by the remote endpoint and the joined view

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// Record identifier
///
/// The endpoint is not consistent about ids: the same customer may be `1` in one
/// array and `"1"` in another. Ids are kept in textual form so both compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        RecordId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId(value)
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        RecordId(value.to_string())
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId(value.to_string())
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Int(i64),
            UInt(u64),
            Float(f64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Int(n) => RecordId(n.to_string()),
            RawId::UInt(n) => RecordId(n.to_string()),
            RawId::Float(n) => RecordId(n.to_string()),
            RawId::Text(s) => RecordId(s.trim().to_string()),
        })
    }
}

/// Customer record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: RecordId,
    pub name: String,
}

impl Customer {
    pub fn new(id: impl Into<RecordId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Transaction record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: RecordId,
    /// Foreign key into the customers array
    pub customer_id: RecordId,
    pub amount: Decimal,
    /// Date as sent by the endpoint, kept verbatim for display
    pub date: String,
}

impl Transaction {
    pub fn new(
        id: impl Into<RecordId>,
        customer_id: impl Into<RecordId>,
        amount: Decimal,
        date: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            customer_id: customer_id.into(),
            amount,
            date: date.into(),
        }
    }

    /// Calendar date of the transaction
    ///
    /// Supports formats: "YYYY-MM-DD", RFC 3339 (converted to local time),
    /// "YYYY-MM-DDTHH:MM:SS[.fff]" and "YYYY-MM-DD HH:MM:SS".
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }
}

pub(crate) fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Some(instant.with_timezone(&Local).date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    None
}

/// A customer joined with its transactions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerSummary {
    pub id: RecordId,
    pub name: String,
    pub transactions: Vec<Transaction>,
    pub total_amount: Decimal,
}

impl CustomerSummary {
    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }
}

/// Sum of one customer's transactions on one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub amount: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_record_id_accepts_numbers_and_strings() {
        let from_number: RecordId = serde_json::from_str("1").unwrap();
        let from_string: RecordId = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "1");

        let float: RecordId = serde_json::from_str("2.0").unwrap();
        assert_eq!(float, RecordId::from(2));
    }

    #[test]
    fn test_deserialize_endpoint_records() {
        let customers: Vec<Customer> =
            serde_json::from_str(r#"[{"id": 1, "name": "Ahmed Ali"}, {"id": "2", "name": "Aya Elsayed"}]"#)
                .unwrap();
        assert_eq!(customers[0], Customer::new(1, "Ahmed Ali"));
        assert_eq!(customers[1].id, RecordId::from(2));

        let transactions: Vec<Transaction> = serde_json::from_str(
            r#"[{"id": 1, "customer_id": "1", "amount": 1000, "date": "2022-01-01"},
                {"id": 2, "customer_id": 1, "amount": 12.75, "date": "2022-01-02"}]"#,
        )
        .unwrap();
        assert_eq!(transactions[0].customer_id, RecordId::from(1));
        assert_eq!(transactions[0].amount, Decimal::from(1000));
        assert_eq!(transactions[1].amount, Decimal::from_str("12.75").unwrap());
    }

    #[test]
    fn test_calendar_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2022, 1, 2).unwrap();
        for date in ["2022-01-02", "2022-01-02T08:30:00", "2022-01-02 23:59:59"] {
            let tx = Transaction::new(1, 1, Decimal::ONE, date);
            assert_eq!(tx.calendar_date(), Some(expected), "format {}", date);
        }

        let instant = "2022-01-02T12:00:00Z";
        let local = DateTime::parse_from_rfc3339(instant).unwrap().with_timezone(&Local).date_naive();
        let tx = Transaction::new(1, 1, Decimal::ONE, instant);
        assert_eq!(tx.calendar_date(), Some(local));

        let bad = Transaction::new(1, 1, Decimal::ONE, "yesterday");
        assert_eq!(bad.calendar_date(), None);
    }
}
