/*!
 * Canonical output schema for normalized claim records
 *
 * Defines the fixed 15-column output layout and the coverage check every
 * provider profile must pass before any file is processed.
 */

use crate::data_types::CanonicalField;
use crate::error::ClaimsError;

/// The canonical claim output schema
pub struct CanonicalSchema;

impl CanonicalSchema {
    /// Get all output column names in the exact order they are written
    pub fn column_names() -> Vec<&'static str> {
        CanonicalField::ALL.iter().map(|f| f.as_header()).collect()
    }

    /// The number of output columns
    pub fn column_count() -> usize {
        CanonicalField::ALL.len()
    }

    /// Validate that a profile's declared targets cover every canonical
    /// field exactly once.
    ///
    /// `targets` is the union of the profile's mapping targets, constant
    /// assignments, and derived-field outputs. Duplicates and omissions are
    /// both configuration defects, reported against `profile_name`. This
    /// runs at registry-build time, never per row.
    pub fn validate_coverage<I>(profile_name: &str, targets: I) -> Result<(), ClaimsError>
    where
        I: IntoIterator<Item = CanonicalField>,
    {
        let mut seen: Vec<CanonicalField> = Vec::with_capacity(CanonicalField::ALL.len());

        for field in targets {
            if seen.contains(&field) {
                return Err(ClaimsError::profile_coverage(
                    profile_name,
                    format!("field '{}' is populated more than once", field),
                ));
            }
            seen.push(field);
        }

        for field in CanonicalField::ALL {
            if !seen.contains(&field) {
                return Err(ClaimsError::profile_coverage(
                    profile_name,
                    format!("field '{}' is never populated", field),
                ));
            }
        }

        Ok(())
    }
}
