// =====================================================================
// File: ingest.rs
//
// Description:
//   Loads customer rows from the Telco churn CSV export into the index.
//   Columns are matched by header name; anything not listed below is
//   ignored.
//
//     customerID      -> customer_id
//     gender          -> gender
//     Churn           -> churned
//     Contract        -> contract_type
//     MonthlyCharges  -> monthly_charge   (unparseable -> -1.0)
//     tenure          -> tenure_months    (unparseable -> -1)
//     age (optional)  -> age              (unparseable -> none)
// =====================================================================
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::record::{CustomerRecord, UNPARSED_CHARGE, UNPARSED_TENURE};
use crate::CustomerIndex;

/// One CSV row as it appears in the export. Numbers stay text here so a
/// bad cell turns into a sentinel instead of failing the whole load.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "customerID")]
    customer_id: String,
    gender: String,
    #[serde(rename = "Churn")]
    churn: String,
    #[serde(rename = "Contract")]
    contract: String,
    #[serde(rename = "MonthlyCharges")]
    monthly_charges: String,
    tenure: String,
    #[serde(default)]
    age: Option<String>,
}

impl CsvRow {
    fn into_record(self, line: u64) -> CustomerRecord {
        let monthly_charge = self.monthly_charges.trim().parse::<f32>().unwrap_or_else(|_| {
            warn!(line, value = %self.monthly_charges, "unparseable MonthlyCharges");
            UNPARSED_CHARGE
        });
        let tenure_months = self.tenure.trim().parse::<i32>().unwrap_or_else(|_| {
            warn!(line, value = %self.tenure, "unparseable tenure");
            UNPARSED_TENURE
        });

        let mut record = CustomerRecord::new(
            self.customer_id,
            self.gender,
            self.churn,
            self.contract,
            monthly_charge,
            tenure_months,
        );
        record.age = self.age.and_then(|age| age.trim().parse::<i32>().ok());
        record
    }
}


/// Reads every row from `source` and inserts it into `index` keyed by
/// customer id. Returns the number of rows inserted.
///
/// The whole input is parsed before the index is touched, so a malformed
/// row leaves `index` exactly as it was. A row with a repeated customer id
/// replaces the earlier one.
pub fn load_csv_from<R: Read>(source: R, index: &mut CustomerIndex) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::Headers).from_reader(source);

    let mut records = Vec::new();
    for row in reader.deserialize::<CsvRow>() {
        let line = records.len() as u64 + 2;
        records.push(row?.into_record(line));
    }

    let count = records.len();
    for record in records {
        let customer_id = record.customer_id.clone();
        if index.insert(customer_id.clone(), record).is_some() {
            debug!(%customer_id, "duplicate customer id replaced");
        }
    }
    Ok(count)
}


/// Opens the CSV at `path` and loads it into `index`.
pub fn load_csv(path: &Path, index: &mut CustomerIndex) -> Result<usize> {
    info!(path = %path.display(), "reading CSV into the index");
    let count = load_csv_from(File::open(path)?, index)?;
    info!(path = %path.display(), count, "CSV load finished");
    Ok(count)
}


// =================================================================
// ingest.rs Unit tests
// =================================================================
#[cfg(test)]
mod ingest_tests {
    use super::*;

    const SAMPLE: &str = "\
customerID,gender,SeniorCitizen,tenure,Contract,MonthlyCharges,TotalCharges,Churn
7590-VHVEG,Female,0,1,Month-to-month,29.85,29.85,No
5575-GNVDE,Male,0,34,One year,56.95,1889.5,No
3668-QPYBK,Male,0,2,Month-to-month,53.85,108.15,Yes
";

    #[test]
    fn loads_rows_by_header_name() {
        let mut index = CustomerIndex::new(3).unwrap();
        let count = load_csv_from(SAMPLE.as_bytes(), &mut index).unwrap();
        assert_eq!(count, 3);

        let record = index.search("5575-GNVDE").unwrap();
        assert_eq!(record.gender, "Male");
        assert_eq!(record.contract_type, "One year");
        assert_eq!(record.churned, "No");
        assert_eq!(record.monthly_charge, 56.95);
        assert_eq!(record.tenure_months, 34);
        assert_eq!(record.age, None);
    }

    #[test]
    fn index_orders_rows_by_id() {
        let mut index = CustomerIndex::new(3).unwrap();
        load_csv_from(SAMPLE.as_bytes(), &mut index).unwrap();

        let ids: Vec<&str> = index.collect_all().into_iter().map(|r| r.customer_id.as_str()).collect();
        assert_eq!(ids, vec!["3668-QPYBK", "5575-GNVDE", "7590-VHVEG"]);
    }

    #[test]
    fn bad_numbers_become_sentinels() {
        let csv = "\
customerID,gender,tenure,Contract,MonthlyCharges,Churn
A,Male,abc,One year,42.5,No
B,Female,12,Two year,oops,Yes
";
        let mut index = CustomerIndex::new(2).unwrap();
        load_csv_from(csv.as_bytes(), &mut index).unwrap();

        let a = index.search("A").unwrap();
        assert_eq!(a.tenure_months, UNPARSED_TENURE);
        // A bad tenure leaves the charge alone
        assert_eq!(a.monthly_charge, 42.5);

        let b = index.search("B").unwrap();
        assert_eq!(b.tenure_months, 12);
        assert_eq!(b.monthly_charge, UNPARSED_CHARGE);
    }

    #[test]
    fn optional_age_column_is_read() {
        let csv = "\
customerID,gender,age,tenure,Contract,MonthlyCharges,Churn
A,Male,41,3,One year,10.5,No
B,Female,n/a,3,One year,10.5,No
";
        let mut index = CustomerIndex::new(2).unwrap();
        load_csv_from(csv.as_bytes(), &mut index).unwrap();

        assert_eq!(index.search("A").unwrap().age, Some(41));
        assert_eq!(index.search("B").unwrap().age, None);
    }

    #[test]
    fn missing_required_column_fails() {
        let csv = "customerID,gender,tenure\nA,Male,3\n";
        let mut index = CustomerIndex::new(2).unwrap();
        let err = load_csv_from(csv.as_bytes(), &mut index).unwrap_err();
        assert!(matches!(err, crate::Error::Csv(_)));
    }

    #[test]
    fn ragged_row_leaves_index_untouched() {
        let csv = "\
customerID,gender,tenure,Contract,MonthlyCharges,Churn
A,Male,3,One year,10.5,No
B,Female,3
";
        let mut index = CustomerIndex::new(2).unwrap();
        index.insert("Z".into(), CustomerRecord::new("Z", "Male", "No", "Two year", 1.0, 1));

        let err = load_csv_from(csv.as_bytes(), &mut index).unwrap_err();
        assert!(matches!(err, crate::Error::Csv(_)));
        assert_eq!(index.len(), 1);
        assert!(index.search("A").is_none());
    }

    #[test]
    fn missing_file_is_io_error() {
        let mut index = CustomerIndex::new(2).unwrap();
        let err = load_csv(Path::new("definitely-not-here.csv"), &mut index).unwrap_err();
        assert!(matches!(err, crate::Error::Io(_)));
    }
}
