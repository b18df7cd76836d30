// =====================================================================
// File: codec/mod.rs
//
//! The `codec` module converts a [`CustomerRecord`] to and from a
//! fixed-size byte block laid out by a [`RecordSchema`].
//!
//! Structure:
//! - `schema.rs` : Field identifiers, widths and the built-in layouts.
//! - `mod.rs`    : [`RecordCodec`] encode / decode.
//! - `tests.rs`  : Unit tests (compiled only in test mode).
//!
//! Text fields are UTF-8, left-justified and zero padded. Over-length
//! text is rejected, never truncated. Numeric fields are little-endian.
// =====================================================================

pub mod schema;

pub use self::schema::{Field, FieldKind, FieldSpec, RecordSchema, SchemaVersion};

use byteorder::{ByteOrder, LittleEndian};

use crate::error::CodecError;
use crate::record::CustomerRecord;

/// Encoder / decoder bound to one record layout.
#[derive(Debug, Clone)]
pub struct RecordCodec {
    schema: RecordSchema,
    width: usize,
}

impl RecordCodec {
    pub fn new(schema: RecordSchema) -> Self {
        let width = schema.record_width();
        Self { schema, width }
    }

    pub fn for_version(version: SchemaVersion) -> Self {
        Self::new(RecordSchema::for_version(version))
    }

    pub fn schema(&self) -> &RecordSchema {
        &self.schema
    }

    /// Size in bytes of every encoded record.
    pub fn record_width(&self) -> usize {
        self.width
    }

    /// Encodes `record` into exactly [`record_width`](Self::record_width) bytes.
    ///
    /// # Errors
    /// - [`CodecError::FieldTooLong`] if a text value exceeds its width.
    /// - [`CodecError::EmbeddedNul`] if a text value contains a NUL byte.
    /// - [`CodecError::MissingField`] if the schema stores `age` and the record has none.
    /// - [`CodecError::UnstoredField`] if the record has an `age` and the schema has no slot for it.
    ///
    /// # Example
    /// ```
    /// use churnstore::{CustomerRecord, RecordCodec, SchemaVersion};
    ///
    /// let codec = RecordCodec::for_version(SchemaVersion::Canonical);
    /// let record = CustomerRecord::new("7590-VHVEG", "Female", "No", "Month-to-month", 29.85, 1);
    /// let block = codec.encode(&record).unwrap();
    /// assert_eq!(block.len(), codec.record_width());
    /// assert_eq!(codec.decode(&block).unwrap(), record);
    /// ```
    pub fn encode(&self, record: &CustomerRecord) -> Result<Vec<u8>, CodecError> {
        if record.age.is_some() && !self.schema.contains(Field::Age) {
            return Err(CodecError::UnstoredField { field: Field::Age.name() });
        }

        let mut block = vec![0u8; self.width];
        let mut offset = 0;

        for spec in self.schema.fields() {
            let width = spec.kind.width();
            let slot = &mut block[offset..offset + width];

            match spec.field {
                Field::CustomerId => write_text(slot, spec.field, &record.customer_id)?,
                Field::Gender => write_text(slot, spec.field, &record.gender)?,
                Field::Churned => write_text(slot, spec.field, &record.churned)?,
                Field::ContractType => write_text(slot, spec.field, &record.contract_type)?,
                Field::MonthlyCharge => LittleEndian::write_f32(slot, record.monthly_charge),
                Field::TenureMonths => LittleEndian::write_i32(slot, record.tenure_months),
                Field::Age => {
                    let age = record
                        .age
                        .ok_or(CodecError::MissingField { field: spec.field.name() })?;
                    LittleEndian::write_i32(slot, age);
                }
            }
            offset += width;
        }

        Ok(block)
    }

    /// Decodes one block produced by [`encode`](Self::encode).
    ///
    /// # Errors
    /// - [`CodecError::WrongLength`] if `block` is not exactly one record wide.
    /// - [`CodecError::InvalidUtf8`] if a text field does not hold UTF-8.
    pub fn decode(&self, block: &[u8]) -> Result<CustomerRecord, CodecError> {
        if block.len() != self.width {
            return Err(CodecError::WrongLength {
                expected: self.width,
                actual: block.len(),
            });
        }

        let mut record = CustomerRecord::new("", "", "", "", 0.0, 0);
        let mut offset = 0;

        for spec in self.schema.fields() {
            let width = spec.kind.width();
            let slot = &block[offset..offset + width];

            match spec.field {
                Field::CustomerId => record.customer_id = read_text(slot, spec.field)?,
                Field::Gender => record.gender = read_text(slot, spec.field)?,
                Field::Churned => record.churned = read_text(slot, spec.field)?,
                Field::ContractType => record.contract_type = read_text(slot, spec.field)?,
                Field::MonthlyCharge => record.monthly_charge = LittleEndian::read_f32(slot),
                Field::TenureMonths => record.tenure_months = LittleEndian::read_i32(slot),
                Field::Age => record.age = Some(LittleEndian::read_i32(slot)),
            }
            offset += width;
        }

        Ok(record)
    }

    /// Decodes a buffer of back-to-back records.
    ///
    /// # Errors
    /// [`CodecError::WrongLength`] when the buffer ends in a partial block;
    /// `actual` is the size of that trailing fragment.
    pub fn decode_all(&self, bytes: &[u8]) -> Result<Vec<CustomerRecord>, CodecError> {
        let chunks = bytes.chunks_exact(self.width);
        let remainder = chunks.remainder();
        if !remainder.is_empty() {
            return Err(CodecError::WrongLength {
                expected: self.width,
                actual: remainder.len(),
            });
        }
        chunks.map(|block| self.decode(block)).collect()
    }
}

impl Default for RecordCodec {
    fn default() -> Self {
        Self::new(RecordSchema::canonical())
    }
}


fn write_text(slot: &mut [u8], field: Field, value: &str) -> Result<(), CodecError> {
    let bytes = value.as_bytes();
    if bytes.len() > slot.len() {
        return Err(CodecError::FieldTooLong {
            field: field.name(),
            len: bytes.len(),
            width: slot.len(),
        });
    }
    if bytes.contains(&0) {
        return Err(CodecError::EmbeddedNul { field: field.name() });
    }
    slot[..bytes.len()].copy_from_slice(bytes);
    Ok(())
}


fn read_text(slot: &[u8], field: Field) -> Result<String, CodecError> {
    // Strip the zero padding
    let end = slot.iter().rposition(|&b| b != 0).map_or(0, |pos| pos + 1);
    std::str::from_utf8(&slot[..end])
        .map(str::to_owned)
        .map_err(|_| CodecError::InvalidUtf8 { field: field.name() })
}
