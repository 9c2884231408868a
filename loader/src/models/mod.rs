//! Domain models for the product loader.
//!
//! - [`Row`] - One positional CSV record with its line number
//! - [`ProductRecord`] - The JSON payload created from a row
//!
//! Column layout of a row:
//!
//! | Index | Field          |
//! |-------|----------------|
//! | 0     | lot number     |
//! | 1     | label          |
//! | 2     | price          |
//! | 3     | kg             |
//! | 4     | unit           |
//! | 5     | price-by-weight flag (`Y` means true) |

use serde::{Deserialize, Serialize};

use crate::error::{RecordError, RecordResult};

/// Number of positional fields a product row must have.
pub const ROW_WIDTH: usize = 6;

/// Flag value that marks a product as priced by weight. Matched exactly.
pub const PRICE_BY_WEIGHT_FLAG: &str = "Y";

// =============================================================================
// Row
// =============================================================================

/// One record read from the CSV source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line in the source where the record starts.
    pub line: u64,
    /// Raw field values, untrimmed.
    pub fields: Vec<String>,
}

impl Row {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    /// Build a row from string slices. Mostly useful in tests.
    pub fn from_strs(line: u64, fields: &[&str]) -> Self {
        Self::new(line, fields.iter().map(|f| f.to_string()).collect())
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// A product as posted to the products collection.
///
/// Field order is the serialized key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    #[serde(rename = "lotNumber")]
    pub lot_number: String,
    pub label: String,
    /// Sent as text, exactly as it appears in the file.
    pub price: String,
    /// Sent as text, exactly as it appears in the file.
    pub kg: String,
    pub unit: String,
    pub is_active: bool,
    #[serde(rename = "priceByWeight")]
    pub price_by_weight: bool,
}

impl ProductRecord {
    /// Map a row to a record.
    ///
    /// Text fields are copied verbatim. `is_active` is always true.
    /// In a file whose rows are all wider than six fields, the extra fields
    /// are ignored.
    pub fn from_row(row: &Row) -> RecordResult<Self> {
        let [lot_number, label, price, kg, unit, flag] = match row.fields.get(..ROW_WIDTH) {
            Some([a, b, c, d, e, f]) => [a, b, c, d, e, f],
            _ => {
                return Err(RecordError::MissingField {
                    line: row.line,
                    found: row.fields.len(),
                    expected: ROW_WIDTH,
                })
            }
        };

        Ok(Self {
            lot_number: lot_number.clone(),
            label: label.clone(),
            price: price.clone(),
            kg: kg.clone(),
            unit: unit.clone(),
            is_active: true,
            price_by_weight: flag == PRICE_BY_WEIGHT_FLAG,
        })
    }

    /// Serialize to compact JSON.
    pub fn to_json(&self) -> RecordResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
