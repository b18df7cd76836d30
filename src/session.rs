// =====================================================================
// File: session.rs
//
// Description:
// Defines the `Session` struct, which represents a running analysis
// context: the live customer index, the record codec chosen by the
// configuration, and the configuration itself.
//
// Responsibilities:
// - Own the single `CustomerIndex` the REPL queries.
// - Route imports (CSV) and snapshots (binary SAVE / LOAD) through the
//   configured paths and schema.
// - Expose the lookup / filter / aggregate queries.
// =====================================================================
use std::path::Path;

use tracing::info;

use crate::codec::RecordCodec;
use crate::config::Config;
use crate::error::Result;
use crate::record::CustomerRecord;
use crate::{analysis, ingest, storage, CustomerIndex};

/// Represents a single in-memory analysis session.
pub struct Session {
    /// Customer records keyed by customer id (B-tree).
    pub index: CustomerIndex,

    /// Encoder for the binary snapshot file.
    pub codec: RecordCodec,

    pub config: Config,
}


impl Session {
    /// Creates a new, empty session from `config`.
    ///
    /// # Example
    /// ```
    /// use churnstore::{Config, Session};
    /// let session = Session::new(Config::default()).unwrap();
    /// assert!(session.index.is_empty());
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        let index = CustomerIndex::new(config.min_degree)?;
        let codec = RecordCodec::for_version(config.schema);
        Ok(Self { index, codec, config })
    }

    /// Imports the configured CSV file.
    pub fn import_csv(&mut self) -> Result<usize> {
        let path = self.config.csv_path.clone();
        self.import_csv_from(&path)
    }

    /// Imports a CSV file at an explicit path.
    pub fn import_csv_from(&mut self, path: &Path) -> Result<usize> {
        ingest::load_csv(path, &mut self.index)
    }

    /// Writes the whole index to the configured binary file.
    pub fn save(&self) -> Result<usize> {
        storage::save_index(&self.config.data_file, &self.codec, &self.index)
    }

    /// Replaces the index with the contents of the configured binary file.
    ///
    /// The snapshot is replayed into a fresh index that is swapped in only
    /// on success; on error the current index is kept as is.
    pub fn load(&mut self) -> Result<usize> {
        let mut restored = CustomerIndex::new(self.config.min_degree)?;
        let count = storage::load_index(&self.config.data_file, &self.codec, &mut restored)?;
        self.index = restored;
        Ok(count)
    }

    /// Startup load: prefer the binary snapshot, fall back to the CSV.
    pub fn load_startup_data(&mut self) -> Result<usize> {
        if self.config.data_file.exists() {
            info!(path = %self.config.data_file.display(), "binary snapshot found");
            self.load()
        } else {
            self.import_csv()
        }
    }

    pub fn find(&self, customer_id: &str) -> Option<&CustomerRecord> {
        analysis::find(&self.index, customer_id)
    }

    pub fn filter(&self, churned: &str, contract_type: &str) -> Vec<&CustomerRecord> {
        analysis::filter(&self.index, churned, contract_type)
    }

    pub fn average_charge(&self, churned: &str) -> f64 {
        analysis::average_charge(&self.index, churned)
    }

    pub fn count(&self) -> usize {
        self.index.len()
    }
}


// =====================================================================
// Unit Tests for Session
// =====================================================================
