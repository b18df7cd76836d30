// =====================================================================
// File: integration_store.rs
//
// Description:
//   Integration tests for the churn index. These tests exercise the
//   full end-to-end flow of the system:
//
//   - Importing the CSV export into a B-tree index
//   - Writing the index to a fixed-width binary file
//   - Reloading that file into a fresh index (simulated restart)
//   - Running lookups, filters and averages on the result
// =====================================================================
use std::path::Path;

use churnstore::{
    analysis, ingest, storage, CodecError, Config, CustomerIndex, CustomerRecord, Error,
    RecordCodec, SchemaVersion, Session,
};
use tempfile::tempdir;

const TELCO_SAMPLE: &str = "\
customerID,gender,SeniorCitizen,Partner,Dependents,tenure,PhoneService,Contract,PaymentMethod,MonthlyCharges,TotalCharges,Churn
7590-VHVEG,Female,0,Yes,No,1,No,Month-to-month,Electronic check,29.85,29.85,No
5575-GNVDE,Male,0,No,No,34,Yes,One year,Mailed check,56.95,1889.5,No
3668-QPYBK,Male,0,No,No,2,Yes,Month-to-month,Mailed check,53.85,108.15,Yes
7795-CFOCW,Male,0,No,No,45,No,One year,Bank transfer (automatic),42.3,1840.75,No
9237-HQITU,Female,0,No,No,2,Yes,Month-to-month,Electronic check,70.7,151.65,Yes
9305-CDSKC,Female,0,No,No,8,Yes,Month-to-month,Electronic check,99.65,820.5,Yes
1452-KIOVK,Male,0,No,Yes,22,Yes,Month-to-month,Credit card (automatic),89.1,1949.4,No
6713-OKOMC,Female,0,No,No,10,No,Month-to-month,Mailed check,29.75,301.9,No
7892-POOKP,Female,0,Yes,No,28,Yes,Month-to-month,Electronic check,104.8,3046.05,Yes
4190-MFLUW,Female,0,Yes,Yes,,Yes,Month-to-month,Credit card (automatic),55.2,,No
";


/// Helper - import the sample CSV into a fresh index.
fn imported(dir: &Path, t: usize) -> CustomerIndex {
    let csv = dir.join("telco.csv");
    std::fs::write(&csv, TELCO_SAMPLE).unwrap();

    let mut index = CustomerIndex::new(t).unwrap();
    assert_eq!(ingest::load_csv(&csv, &mut index).unwrap(), 10);
    index
}


#[test]
fn test_csv_to_binary_and_back() {
    let dir = tempdir().unwrap();
    let index = imported(dir.path(), 3);
    let codec = RecordCodec::default();
    let file = dir.path().join("customers.db");

    assert_eq!(storage::save_index(&file, &codec, &index).unwrap(), 10);
    let size = std::fs::metadata(&file).unwrap().len() as usize;
    assert_eq!(size, 10 * codec.record_width());

    // Reload into a tree with a different degree to simulate restart
    let mut restored = CustomerIndex::new(2).unwrap();
    assert_eq!(storage::load_index(&file, &codec, &mut restored).unwrap(), 10);

    assert_eq!(index.collect_all(), restored.collect_all());
    assert_eq!(
        restored.search("9305-CDSKC").map(|r| r.monthly_charge),
        Some(99.65)
    );
}


#[test]
fn test_blank_tenure_uses_sentinel() {
    let dir = tempdir().unwrap();
    let index = imported(dir.path(), 3);

    let record = analysis::find(&index, "4190-MFLUW").unwrap();
    assert_eq!(record.tenure_months, -1);
    assert_eq!(record.monthly_charge, 55.2);
}


#[test]
fn test_filters_and_averages_after_reload() {
    let dir = tempdir().unwrap();
    let index = imported(dir.path(), 3);
    let codec = RecordCodec::default();
    let file = dir.path().join("customers.db");
    storage::save_index(&file, &codec, &index).unwrap();

    let mut restored = CustomerIndex::new(3).unwrap();
    storage::load_index(&file, &codec, &mut restored).unwrap();

    let churned_monthly: Vec<&str> = analysis::filter(&restored, "Yes", "Month-to-month")
        .into_iter()
        .map(|r| r.customer_id.as_str())
        .collect();
    assert_eq!(churned_monthly, vec!["3668-QPYBK", "7892-POOKP", "9237-HQITU", "9305-CDSKC"]);

    assert_eq!(analysis::count_by_status(&restored, "Yes"), 4);
    assert_eq!(analysis::count_by_status(&restored, "No"), 6);

    let expected = (53.85_f32 as f64 + 70.7_f32 as f64 + 99.65_f32 as f64 + 104.8_f32 as f64) / 4.0;
    assert!((analysis::average_charge(&restored, "Yes") - expected).abs() < 1e-9);
}


#[test]
fn test_schema_mismatch_is_detected() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("customers.db");

    // Three canonical records (180 bytes) are not a whole number of 64-byte blocks
    let records: Vec<CustomerRecord> = (0..3)
        .map(|i| CustomerRecord::new(format!("ID-{}", i), "Male", "No", "One year", 1.0, i))
        .collect();
    storage::write_records(&file, &RecordCodec::default(), &records).unwrap();

    let with_age = RecordCodec::for_version(SchemaVersion::WithAge);
    let err = storage::read_records(&file, &with_age).unwrap_err();
    assert!(matches!(err, Error::Codec(CodecError::WrongLength { expected: 64, .. })));
}


#[test]
fn test_session_end_to_end() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("telco.csv");
    std::fs::write(&csv, TELCO_SAMPLE).unwrap();

    let config = Config {
        csv_path: csv,
        data_file: dir.path().join("snapshot.db"),
        min_degree: 2,
        schema: SchemaVersion::Canonical,
    };

    // First run: no snapshot, so the CSV is imported and then saved
    let mut first = Session::new(config.clone()).unwrap();
    assert_eq!(first.load_startup_data().unwrap(), 10);
    first.save().unwrap();

    // Second run picks up the snapshot
    std::fs::remove_file(&config.csv_path).unwrap();
    let mut second = Session::new(config).unwrap();
    assert_eq!(second.load_startup_data().unwrap(), 10);
    assert_eq!(second.find("7590-VHVEG").unwrap().contract_type, "Month-to-month");
    assert!(second.find("0000-NOONE").is_none());
}
