// =====================================================================
// File: config.rs
//
// Description:
//   Startup configuration handed to the session. Every path the program
//   touches comes from here; nothing is read from a global constant.
// =====================================================================
use std::path::PathBuf;

use crate::codec::SchemaVersion;

/// CSV export looked for when no path is given.
pub const DEFAULT_CSV_FILE: &str = "WA_Fn-UseC_-Telco-Customer-Churn.csv";

/// Binary snapshot written by `SAVE` and read by `LOAD`.
pub const DEFAULT_DATA_FILE: &str = "customers.db";

pub const DEFAULT_MIN_DEGREE: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source CSV for the initial import.
    pub csv_path: PathBuf,
    /// Fixed-width binary snapshot file.
    pub data_file: PathBuf,
    /// B-tree minimum degree.
    pub min_degree: usize,
    /// Record layout used for the binary snapshot.
    pub schema: SchemaVersion,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_FILE),
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            min_degree: DEFAULT_MIN_DEGREE,
            schema: SchemaVersion::default(),
        }
    }
}
