/*!
 * Field extraction: raw provider tables to canonical claim records
 *
 * Given a tabular source and a provider profile, produces one canonical
 * record per data row. Extraction is total over the row range the source
 * reports: blank rows still yield records, and the required-field filter
 * happens downstream, not here.
 */

use crate::data_types::{Cell, ClaimRecord};
use crate::error::{ClaimsError, ErrorContext, Result};
use crate::profiles::ProviderProfile;
use crate::reader::TabularSource;

/// Strip leading/trailing whitespace and embedded newlines from a raw
/// header. Provider exports sometimes carry stray formatting in headers.
pub fn clean_column_name(name: &str) -> String {
    name.trim().replace(['\n', '\r'], "")
}

/// The field extractor: applies a profile's mapping, constants, and
/// derived-field rules to every row of the selected sheet.
#[derive(Debug, Default)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract canonical records from `source` under `profile`.
    ///
    /// Record *i* of the output corresponds to data row *i* of the sheet,
    /// for every profile. File-shaped problems (missing sheet, missing
    /// mapped column, malformed name cell) surface as recoverable errors
    /// scoped to this file.
    pub fn extract(
        &self,
        source: &mut dyn TabularSource,
        profile: &ProviderProfile,
    ) -> Result<Vec<ClaimRecord>> {
        let mut table = source.read_sheet(&profile.sheet_name, profile.header_offset)?;

        if profile.clean_headers {
            for header in &mut table.headers {
                *header = clean_column_name(header);
            }
        }

        // Resolve the mapping against this sheet's headers up front so a
        // missing column fails the whole file, not some rows.
        let mut columns: Vec<(usize, crate::data_types::CanonicalField)> =
            Vec::with_capacity(profile.field_map.len());
        for (raw, field) in &profile.field_map {
            let index = table.column_index(raw).ok_or_else(|| {
                ClaimsError::missing_column(raw, &table.sheet_name, ErrorContext::default())
            })?;
            columns.push((index, *field));
        }

        // The cross-reference name read is constant across the file:
        // computed once and broadcast to every record.
        let broadcast_name = match profile.claimant_name_cell {
            Some((row, col)) => {
                let cell = source.read_cell(&profile.sheet_name, row, col)?;
                Some(split_full_name(&cell)?)
            }
            None => None,
        };

        let mut records = Vec::with_capacity(table.rows.len());
        for row in &table.rows {
            let mut record = ClaimRecord::default();

            for (index, field) in &columns {
                let cell = row.get(*index).cloned().unwrap_or(Cell::Empty);
                record.set(*field, &cell);
            }

            for (field, value) in &profile.constants {
                record.set(*field, &Cell::Text(value.clone()));
            }

            if let Some((first, last)) = &broadcast_name {
                record.claimant_first_name = Some(first.clone());
                record.claimant_last_name = Some(last.clone());
            }

            records.push(record);
        }

        Ok(records)
    }
}

/// Split a full-name cell into exactly (first, last)
fn split_full_name(cell: &Cell) -> Result<(String, String)> {
    let full_name = cell.as_text().unwrap_or_default();
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.as_slice() {
        [first, last] => Ok((first.to_string(), last.to_string())),
        _ => Err(ClaimsError::malformed_name_cell(
            &full_name,
            ErrorContext::default(),
        )),
    }
}
