//! Customer filters and per-view selection state

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::models::{CustomerSummary, RecordId};

/// The two filter inputs, kept as raw text
///
/// Both are optional: an empty input matches every customer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerFilter {
    /// Case-insensitive substring of the customer name
    #[serde(default)]
    pub name: String,
    /// Exact total amount, parsed leniently
    #[serde(default)]
    pub amount: String,
}

impl CustomerFilter {
    pub fn new(name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            amount: amount.into(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.name.is_empty() || !self.amount.trim().is_empty()
    }

    pub fn clear(&mut self) {
        self.name.clear();
        self.amount.clear();
    }

    /// Check whether a joined customer passes both filters
    pub fn matches(&self, summary: &CustomerSummary) -> bool {
        self.matches_amount(summary.total_amount) && self.matches_name(&summary.name)
    }

    fn matches_name(&self, name: &str) -> bool {
        self.name.is_empty() || name.to_lowercase().contains(&self.name.to_lowercase())
    }

    fn matches_amount(&self, total: Decimal) -> bool {
        if self.amount.trim().is_empty() {
            return true;
        }
        match parse_leading_decimal(&self.amount) {
            Some(wanted) => total == wanted,
            None => false,
        }
    }

    /// Keep the summaries that pass both filters, preserving order
    pub fn apply(&self, summaries: Vec<CustomerSummary>) -> Vec<CustomerSummary> {
        if !self.is_active() {
            return summaries;
        }
        summaries.into_iter().filter(|s| self.matches(s)).collect()
    }
}

/// Read the longest decimal number at the start of `input`
///
/// Leading whitespace, a sign, a fractional part and an exponent are
/// accepted; anything after the number is ignored ("12.5abc" reads as 12.5).
/// Returns `None` when no digits can be read or the value is out of range.
pub fn parse_leading_decimal(input: &str) -> Option<Decimal> {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &s[int_start..pos];

    let mut frac_digits = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut end = frac_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        frac_digits = &s[frac_start..end];
        pos = end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let mut exponent: Option<&str> = None;
    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut end = pos + 1;
        if end < bytes.len() && (bytes[end] == b'-' || bytes[end] == b'+') {
            end += 1;
        }
        let digits_start = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end > digits_start {
            exponent = Some(&s[pos + 1..end]);
        }
    }

    let mantissa = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if int_digits.is_empty() { "0" } else { int_digits },
        if frac_digits.is_empty() { "0" } else { frac_digits },
    );

    match exponent {
        Some(exp) => Decimal::from_scientific(&format!("{}e{}", mantissa, exp)).ok(),
        None => Decimal::from_str(&mantissa).ok(),
    }
}

/// Per-view state: the filter inputs and the customer whose chart is open
///
/// Changing a filter closes the chart.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    filter: CustomerFilter,
    selected: Option<RecordId>,
}

impl ViewState {
    pub fn new(filter: CustomerFilter) -> Self {
        Self { filter, selected: None }
    }

    pub fn filter(&self) -> &CustomerFilter {
        &self.filter
    }

    pub fn selected(&self) -> Option<&RecordId> {
        self.selected.as_ref()
    }

    pub fn set_name_filter(&mut self, value: impl Into<String>) {
        self.selected = None;
        self.filter.name = value.into();
    }

    pub fn set_amount_filter(&mut self, value: impl Into<String>) {
        self.selected = None;
        self.filter.amount = value.into();
    }

    pub fn clear_filters(&mut self) {
        self.selected = None;
        self.filter.clear();
    }

    pub fn select(&mut self, id: RecordId) {
        self.selected = Some(id);
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }
}
