// =====================================================================
// File: analysis.rs
//
// Description:
//   Queries over the customer index: lookup by id, filtering by churn
//   status and contract type, and per-status aggregates. Filters and
//   aggregates stream through `BTreeIndex::traverse_values` rather than
//   materializing the whole index first.
// =====================================================================
use crate::record::CustomerRecord;
use crate::CustomerIndex;

/// Looks up a single customer.
pub fn find<'a>(index: &'a CustomerIndex, customer_id: &str) -> Option<&'a CustomerRecord> {
    index.search(customer_id)
}


/// Every customer whose churn token and contract type both match exactly,
/// in ascending id order.
pub fn filter<'a>(index: &'a CustomerIndex, churned: &str, contract_type: &str) -> Vec<&'a CustomerRecord> {
    let mut matches = Vec::new();
    index.traverse_values(|record| {
        if record.churned == churned && record.contract_type == contract_type {
            matches.push(record);
        }
    });
    matches
}


/// Mean monthly charge of the customers with the given churn token, or
/// `0.0` when none match. Sentinel charges are averaged in as stored.
///
/// # Example
/// ```
/// use churnstore::{analysis, CustomerIndex, CustomerRecord};
///
/// let mut index = CustomerIndex::new(3).unwrap();
/// for (id, charge) in [("a", 10.0), ("b", 30.0)] {
///     index.insert(id.into(), CustomerRecord::new(id, "Male", "Yes", "One year", charge, 1));
/// }
/// assert_eq!(analysis::average_charge(&index, "Yes"), 20.0);
/// assert_eq!(analysis::average_charge(&index, "No"), 0.0);
/// ```
pub fn average_charge(index: &CustomerIndex, churned: &str) -> f64 {
    let mut sum = 0.0_f64;
    let mut count = 0_usize;
    index.traverse_values(|record| {
        if record.churned == churned {
            sum += f64::from(record.monthly_charge);
            count += 1;
        }
    });

    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}


/// Number of customers with the given churn token.
pub fn count_by_status(index: &CustomerIndex, churned: &str) -> usize {
    let mut count = 0;
    index.traverse_values(|record| {
        if record.churned == churned {
            count += 1;
        }
    });
    count
}
