// =====================================================================
// File: codec/schema.rs
//
// Description:
//   Field layout of a persisted customer record. A schema is an ordered
//   list of fields, each with a fixed byte width, so that every record
//   encoded under it has the same size and per-field offsets.
//
//   Two layouts are built in:
//
//   Canonical (60 bytes)
//   ```text
//   [customer_id:    16 bytes UTF-8, zero padded]
//   [gender:          8 bytes UTF-8, zero padded]
//   [churned:         4 bytes UTF-8, zero padded]
//   [contract_type:  24 bytes UTF-8, zero padded]
//   [monthly_charge:  f32 LE]
//   [tenure_months:   i32 LE]
//   ```
//
//   WithAge (64 bytes): same as canonical with `[age: i32 LE]` between
//   `monthly_charge` and `tenure_months`.
//
//   Files carry no version tag; the caller picks the schema.
// =====================================================================
use std::collections::HashSet;

use crate::error::CodecError;

pub const CUSTOMER_ID_WIDTH: usize = 16;
pub const GENDER_WIDTH: usize = 8;
pub const CHURNED_WIDTH: usize = 4;
pub const CONTRACT_TYPE_WIDTH: usize = 24;

/// A record attribute that can appear in a schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    CustomerId,
    Gender,
    Churned,
    ContractType,
    MonthlyCharge,
    TenureMonths,
    Age,
}

impl Field {
    pub fn name(self) -> &'static str {
        match self {
            Field::CustomerId => "customer_id",
            Field::Gender => "gender",
            Field::Churned => "churned",
            Field::ContractType => "contract_type",
            Field::MonthlyCharge => "monthly_charge",
            Field::TenureMonths => "tenure_months",
            Field::Age => "age",
        }
    }

    fn accepts(self, kind: FieldKind) -> bool {
        match self {
            Field::CustomerId | Field::Gender | Field::Churned | Field::ContractType => {
                matches!(kind, FieldKind::Text { width } if width > 0)
            }
            Field::MonthlyCharge => kind == FieldKind::Float32,
            Field::TenureMonths | Field::Age => kind == FieldKind::Int32,
        }
    }
}

/// On-disk representation of a single field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// UTF-8, left-justified, zero padded to `width` bytes.
    Text { width: usize },
    /// IEEE-754 single precision, little-endian.
    Float32,
    /// Two's complement 32-bit, little-endian.
    Int32,
}

impl FieldKind {
    pub fn width(self) -> usize {
        match self {
            FieldKind::Text { width } => width,
            FieldKind::Float32 | FieldKind::Int32 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(field: Field, width: usize) -> Self {
        Self { field, kind: FieldKind::Text { width } }
    }

    pub const fn float32(field: Field) -> Self {
        Self { field, kind: FieldKind::Float32 }
    }

    pub const fn int32(field: Field) -> Self {
        Self { field, kind: FieldKind::Int32 }
    }
}

/// Built-in record layouts, selectable from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SchemaVersion {
    #[default]
    Canonical,
    WithAge,
}

/// Ordered, validated field layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSchema {
    fields: Vec<FieldSpec>,
}

impl RecordSchema {
    /// Builds a schema from an explicit field order.
    ///
    /// # Errors
    /// [`CodecError::InvalidSchema`] if a field repeats, a mandatory field
    /// is absent, or a field is given a representation it cannot hold.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, CodecError> {
        let mut seen = HashSet::new();
        for spec in &fields {
            if !seen.insert(spec.field) {
                return Err(CodecError::InvalidSchema(format!(
                    "field '{}' appears more than once",
                    spec.field.name()
                )));
            }
            if !spec.field.accepts(spec.kind) {
                return Err(CodecError::InvalidSchema(format!(
                    "field '{}' cannot be stored as {:?}",
                    spec.field.name(),
                    spec.kind
                )));
            }
        }

        let mandatory = [
            Field::CustomerId,
            Field::Gender,
            Field::Churned,
            Field::ContractType,
            Field::MonthlyCharge,
            Field::TenureMonths,
        ];
        if let Some(missing) = mandatory.iter().find(|f| !seen.contains(*f)) {
            return Err(CodecError::InvalidSchema(format!(
                "mandatory field '{}' is missing",
                missing.name()
            )));
        }

        Ok(Self { fields })
    }

    pub fn canonical() -> Self {
        Self {
            fields: vec![
                FieldSpec::text(Field::CustomerId, CUSTOMER_ID_WIDTH),
                FieldSpec::text(Field::Gender, GENDER_WIDTH),
                FieldSpec::text(Field::Churned, CHURNED_WIDTH),
                FieldSpec::text(Field::ContractType, CONTRACT_TYPE_WIDTH),
                FieldSpec::float32(Field::MonthlyCharge),
                FieldSpec::int32(Field::TenureMonths),
            ],
        }
    }

    /// Historical layout with an age column between charge and tenure.
    pub fn with_age() -> Self {
        let mut schema = Self::canonical();
        let tenure_at = schema.fields.len() - 1;
        schema.fields.insert(tenure_at, FieldSpec::int32(Field::Age));
        schema
    }

    pub fn for_version(version: SchemaVersion) -> Self {
        match version {
            SchemaVersion::Canonical => Self::canonical(),
            SchemaVersion::WithAge => Self::with_age(),
        }
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Total encoded size of one record.
    pub fn record_width(&self) -> usize {
        self.fields.iter().map(|spec| spec.kind.width()).sum()
    }

    pub fn contains(&self, field: Field) -> bool {
        self.fields.iter().any(|spec| spec.field == field)
    }
}

impl Default for RecordSchema {
    fn default() -> Self {
        Self::canonical()
    }
}
