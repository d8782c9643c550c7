/*!
 * Output rendering and the tabular sink boundary
 *
 * Turns finalized claimant groups into deterministically formatted tables:
 * fixed 15-column order, 2-decimal monetary values, ISO dates, and the
 * literal `NAN` token for absent cells. Writing mechanics live behind the
 * `TabularSink` trait; the shipped sink writes CSV. Column widths are part
 * of the sink contract (widest rendered value plus padding) even though a
 * CSV sink has no width concept to apply them to.
 */

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::constants::{NA_TOKEN, WIDTH_PADDING};
use crate::data_types::{CanonicalField, ClaimRecord, ClaimantIdentity};
use crate::error::{ClaimsError, Result};
use crate::schema::CanonicalSchema;

/// A fully rendered output table, ready for any sink
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub headers: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

/// Render one canonical field of one record to its output string
pub fn render_value(record: &ClaimRecord, field: CanonicalField) -> String {
    let rendered = match field {
        CanonicalField::Ssn => record.ssn.clone(),
        CanonicalField::ClaimantFirstName => record.claimant_first_name.clone(),
        CanonicalField::ClaimantLastName => record.claimant_last_name.clone(),
        CanonicalField::EmployeeCode => record.employee_code.map(|c| c.to_string()),
        CanonicalField::ProviderNo => record.provider_no.clone(),
        CanonicalField::ClaimNo => record.claim_no.clone(),
        CanonicalField::Provider => record.provider.clone(),
        CanonicalField::ServiceDate => {
            record.service_date.map(|d| d.format("%Y-%m-%d").to_string())
        }
        CanonicalField::ClaimReceiptDate => record
            .claim_receipt_date
            .map(|d| d.format("%Y-%m-%d").to_string()),
        CanonicalField::PaidDate => record.paid_date.map(|d| d.format("%Y-%m-%d").to_string()),
        CanonicalField::Icd9 => record.icd9.clone(),
        CanonicalField::BilledAmount => record.billed_amount.map(|v| format!("{:.2}", v)),
        CanonicalField::PaidAmount => record.paid_amount.map(|v| format!("{:.2}", v)),
        CanonicalField::CptCode => record.cpt_code.clone(),
        CanonicalField::CheckNo => record.check_no.clone(),
    };
    rendered.unwrap_or_else(|| NA_TOKEN.to_string())
}

/// Render records onto the fixed canonical column order
pub fn render_table(records: &[ClaimRecord]) -> RenderedTable {
    RenderedTable {
        headers: CanonicalField::ALL.iter().map(|f| f.as_header()).collect(),
        rows: records
            .iter()
            .map(|record| {
                CanonicalField::ALL
                    .iter()
                    .map(|field| render_value(record, *field))
                    .collect()
            })
            .collect(),
    }
}

/// Per-column width: the widest rendered value (header included) plus the
/// fixed padding
pub fn column_widths(table: &RenderedTable) -> Vec<usize> {
    table
        .headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            let widest = table
                .rows
                .iter()
                .map(|row| row.get(col).map(String::len).unwrap_or(0))
                .max()
                .unwrap_or(0)
                .max(header.len());
            widest + WIDTH_PADDING
        })
        .collect()
}

/// Write access to tabular output, independent of the storage format
pub trait TabularSink {
    /// Write one sheet of rendered data. `column_widths[i]` is the
    /// display width for column `i`; sinks without a width concept may
    /// ignore it.
    fn write_sheet(
        &self,
        path: &Path,
        sheet_name: &str,
        table: &RenderedTable,
        column_widths: &[usize],
    ) -> Result<()>;

    /// File extension this sink produces, without the dot
    fn extension(&self) -> &'static str;
}

/// CSV sink built on the csv crate
#[derive(Debug, Clone, Default)]
pub struct CsvSink;

impl CsvSink {
    pub fn new() -> Self {
        Self
    }
}

impl TabularSink for CsvSink {
    fn write_sheet(
        &self,
        path: &Path,
        _sheet_name: &str,
        table: &RenderedTable,
        _column_widths: &[usize],
    ) -> Result<()> {
        let file = File::create(path).map_err(|e| ClaimsError::SinkWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let mut writer = csv::WriterBuilder::new().from_writer(file);

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush().map_err(|e| ClaimsError::SinkWrite {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}

/// Emit one finalized group through `sink` into `output_dir`.
///
/// The file name is derived from the claimant identity; `sheet_name`
/// carries the provider's sheet label through to sheet-capable sinks.
/// Returns the path written.
pub fn emit(
    sink: &dyn TabularSink,
    output_dir: &Path,
    identity: &ClaimantIdentity,
    sheet_name: &str,
    records: &[ClaimRecord],
) -> Result<PathBuf> {
    let table = render_table(records);
    debug_assert_eq!(table.headers.len(), CanonicalSchema::column_count());
    let widths = column_widths(&table);

    let path = output_dir.join(format!("{}.{}", identity.file_stem(), sink.extension()));
    sink.write_sheet(&path, sheet_name, &table, &widths)?;
    Ok(path)
}
