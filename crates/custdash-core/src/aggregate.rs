//! Joining customers with their transactions and bucketing by date

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::models::{Customer, CustomerSummary, DailyTotal, RecordId, Transaction};

/// Join customers with their transactions and compute per-customer totals
///
/// One summary per customer, in customer order. Each summary holds the
/// customer's transactions in source order. Transactions pointing at an
/// unknown customer do not appear in the result.
pub fn organize_transactions(customers: &[Customer], transactions: &[Transaction]) -> Vec<CustomerSummary> {
    let mut by_customer: HashMap<&RecordId, Vec<&Transaction>> = HashMap::new();
    for tx in transactions {
        by_customer.entry(&tx.customer_id).or_default().push(tx);
    }

    let summaries: Vec<CustomerSummary> = customers
        .iter()
        .map(|customer| {
            let own: Vec<Transaction> = by_customer
                .get(&customer.id)
                .map(|txs| txs.iter().map(|tx| (*tx).clone()).collect())
                .unwrap_or_default();
            let total_amount = checked_total(&own);

            CustomerSummary {
                id: customer.id.clone(),
                name: customer.name.clone(),
                transactions: own,
                total_amount,
            }
        })
        .collect();

    let known: HashSet<&RecordId> = customers.iter().map(|c| &c.id).collect();
    let orphaned: usize = by_customer
        .iter()
        .filter(|(id, _)| !known.contains(*id))
        .map(|(_, txs)| txs.len())
        .sum();
    if orphaned > 0 {
        log::debug!("{} transactions reference unknown customers", orphaned);
    }

    summaries
}

/// Sum transactions per calendar date, oldest date first
///
/// Transactions with an unreadable date are skipped.
pub fn aggregate_by_date(transactions: &[Transaction]) -> Vec<DailyTotal> {
    let mut buckets: BTreeMap<chrono::NaiveDate, Decimal> = BTreeMap::new();

    for tx in transactions {
        match tx.calendar_date() {
            Some(date) => {
                let bucket = buckets.entry(date).or_insert(Decimal::ZERO);
                *bucket = add_amount(*bucket, tx);
            }
            None => log::warn!("Skipping transaction {} with unreadable date {:?}", tx.id, tx.date),
        }
    }

    buckets
        .into_iter()
        .map(|(date, amount)| DailyTotal { date, amount })
        .collect()
}

/// Sum of all transaction amounts
pub fn grand_total(transactions: &[Transaction]) -> Decimal {
    checked_total(transactions)
}

/// Sum amounts, leaving out any amount that would overflow the running total
fn checked_total(transactions: &[Transaction]) -> Decimal {
    transactions.iter().fold(Decimal::ZERO, add_amount)
}

fn add_amount(total: Decimal, tx: &Transaction) -> Decimal {
    match total.checked_add(tx.amount) {
        Some(sum) => sum,
        None => {
            log::warn!("Skipping amount {} of transaction {}: total would overflow", tx.amount, tx.id);
            total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample() -> (Vec<Customer>, Vec<Transaction>) {
        let customers = vec![
            Customer::new(1, "Ahmed Ali"),
            Customer::new(2, "Aya Elsayed"),
            Customer::new(3, "Mina Adel"),
        ];
        let transactions = vec![
            Transaction::new(1, 1, dec("1000"), "2022-01-01"),
            Transaction::new(2, 1, dec("2000"), "2022-01-02"),
            Transaction::new(3, 2, dec("550"), "2022-01-01"),
            Transaction::new(4, "1", dec("1500"), "2022-01-01"),
            Transaction::new(5, 99, dec("10"), "2022-01-03"),
        ];
        (customers, transactions)
    }

    #[test]
    fn test_organize_joins_and_sums() {
        let (customers, transactions) = sample();
        let summaries = organize_transactions(&customers, &transactions);

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].name, "Ahmed Ali");
        assert_eq!(summaries[0].transaction_count(), 3);
        assert_eq!(summaries[0].total_amount, dec("4500"));
        let ids: Vec<&str> = summaries[0].transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "4"]);

        assert_eq!(summaries[1].total_amount, dec("550"));
    }

    #[test]
    fn test_customer_without_transactions_totals_zero() {
        let (customers, transactions) = sample();
        let summaries = organize_transactions(&customers, &transactions);
        assert!(summaries[2].transactions.is_empty());
        assert_eq!(summaries[2].total_amount, Decimal::ZERO);
    }

    #[test]
    fn test_organize_with_empty_inputs() {
        let (customers, _) = sample();
        assert!(organize_transactions(&[], &[]).is_empty());
        let summaries = organize_transactions(&customers, &[]);
        assert!(summaries.iter().all(|s| s.total_amount.is_zero()));
    }

    #[test]
    fn test_decimal_sums_are_exact() {
        let customers = vec![Customer::new(1, "A")];
        let transactions = vec![
            Transaction::new(1, 1, dec("0.1"), "2022-01-01"),
            Transaction::new(2, 1, dec("0.2"), "2022-01-01"),
        ];
        let summaries = organize_transactions(&customers, &transactions);
        assert_eq!(summaries[0].total_amount, dec("0.3"));
    }

    #[test]
    fn test_aggregate_by_date_buckets_and_sorts() {
        let transactions = vec![
            Transaction::new(1, 1, dec("2000"), "2022-01-02"),
            Transaction::new(2, 1, dec("1000"), "2022-01-01"),
            Transaction::new(3, 1, dec("1500"), "2022-01-01T18:45:00"),
        ];
        let daily = aggregate_by_date(&transactions);

        assert_eq!(
            daily,
            vec![
                DailyTotal { date: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(), amount: dec("2500") },
                DailyTotal { date: NaiveDate::from_ymd_opt(2022, 1, 2).unwrap(), amount: dec("2000") },
            ]
        );
    }

    #[test]
    fn test_aggregate_skips_unreadable_dates() {
        let transactions = vec![
            Transaction::new(1, 1, dec("5"), "not a date"),
            Transaction::new(2, 1, dec("7"), "2022-03-04"),
        ];
        let daily = aggregate_by_date(&transactions);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].amount, dec("7"));
        assert!(aggregate_by_date(&[]).is_empty());
    }

    #[test]
    fn test_overflowing_amounts_are_skipped() {
        let huge = dec("50000000000000000000000000000");
        let customers = vec![Customer::new(1, "A")];
        let transactions = vec![
            Transaction::new(1, 1, huge, "2022-01-01"),
            Transaction::new(2, 1, huge, "2022-01-01"),
            Transaction::new(3, 1, dec("1"), "2022-01-02"),
        ];

        let summaries = organize_transactions(&customers, &transactions);
        assert_eq!(summaries[0].total_amount, huge + dec("1"));
        assert_eq!(grand_total(&transactions), huge + dec("1"));

        let daily = aggregate_by_date(&transactions);
        assert_eq!(daily[0].amount, huge);
        assert_eq!(daily[1].amount, dec("1"));
    }

    #[test]
    fn test_grand_total() {
        let (_, transactions) = sample();
        assert_eq!(grand_total(&transactions), dec("5060"));
    }
}
