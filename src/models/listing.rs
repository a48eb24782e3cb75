//! Table listing model.

use crate::error::{GatewayError, GatewayResult};
use serde::Serialize;
use serde_json::{Map, Value as JsonValue};

/// Detection method reported for listings produced through the Management API.
pub const LISTING_METHOD: &str = "management_api_official";

/// Result of a table listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableListing {
    /// Table names, sorted. One entry per row; not de-duplicated across schemas.
    pub tables: Vec<String>,
    /// Raw rows as returned by the Management API (schema, name, id, comment)
    pub full_data: Vec<Map<String, JsonValue>>,
    pub method: &'static str,
    pub success: bool,
    pub note: String,
}

impl TableListing {
    /// Build a listing from the raw rows of the listing query.
    ///
    /// Every row must carry a string `name` field.
    pub fn from_rows(rows: Vec<Map<String, JsonValue>>) -> GatewayResult<Self> {
        let mut tables = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.get("name")
                    .and_then(JsonValue::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        GatewayError::decode(format!("row {i} has no string `name` field"))
                    })
            })
            .collect::<GatewayResult<Vec<_>>>()?;
        // Order by UTF-16 code units, matching JavaScript string comparison
        tables.sort_by(|a, b| a.encode_utf16().cmp(b.encode_utf16()));

        let note = format!(
            "Detected {} tables using the official Management API",
            tables.len()
        );
        Ok(Self {
            tables,
            full_data: rows,
            method: LISTING_METHOD,
            success: true,
            note,
        })
    }

    pub fn count(&self) -> usize {
        self.tables.len()
    }
}
