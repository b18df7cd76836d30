// =====================================================================
// File: record.rs
//
// Description:
//   The customer record stored as the value of every index slot and
//   persisted through the fixed-width codec.
// =====================================================================
use std::fmt;

/// Charge recorded when the source value could not be parsed as a number.
pub const UNPARSED_CHARGE: f32 = -1.0;

/// Tenure recorded when the source value could not be parsed as a number.
pub const UNPARSED_TENURE: i32 = -1;

/// One customer row. Immutable once built; the index owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerRecord {
    pub customer_id: String,
    pub gender: String,
    /// Churn token as it appears in the source, `"Yes"` or `"No"`.
    pub churned: String,
    pub contract_type: String,
    pub monthly_charge: f32,
    pub tenure_months: i32,
    /// Only present for data loaded through a schema carrying an age column.
    pub age: Option<i32>,
}

impl CustomerRecord {
    pub fn new(
        customer_id: impl Into<String>,
        gender: impl Into<String>,
        churned: impl Into<String>,
        contract_type: impl Into<String>,
        monthly_charge: f32,
        tenure_months: i32,
    ) -> Self {
        Self {
            customer_id: customer_id.into(),
            gender: gender.into(),
            churned: churned.into(),
            contract_type: contract_type.into(),
            monthly_charge,
            tenure_months,
            age: None,
        }
    }

    pub fn with_age(mut self, age: i32) -> Self {
        self.age = Some(age);
        self
    }
}

impl fmt::Display for CustomerRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} | {} | ${:.2} | {} months | Churned: {}",
            self.customer_id,
            self.gender,
            self.contract_type,
            self.monthly_charge,
            self.tenure_months,
            self.churned
        )
    }
}
