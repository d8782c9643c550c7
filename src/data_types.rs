/*!
 * Data type definitions for canonical claim records
 *
 * This module contains the canonical 15-field claim schema that every
 * supported provider export is normalized into, plus the cell value type
 * produced by tabular sources.
 */

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The 15 canonical claim fields, in fixed output order.
///
/// Every provider profile must populate each of these exactly once,
/// regardless of how its raw export names or arranges its columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CanonicalField {
    Ssn,
    ClaimantFirstName,
    ClaimantLastName,
    EmployeeCode,
    ProviderNo,
    ClaimNo,
    Provider,
    ServiceDate,
    ClaimReceiptDate,
    PaidDate,
    Icd9,
    BilledAmount,
    PaidAmount,
    CptCode,
    CheckNo,
}

impl CanonicalField {
    /// All canonical fields in output column order
    pub const ALL: [CanonicalField; 15] = [
        CanonicalField::Ssn,
        CanonicalField::ClaimantFirstName,
        CanonicalField::ClaimantLastName,
        CanonicalField::EmployeeCode,
        CanonicalField::ProviderNo,
        CanonicalField::ClaimNo,
        CanonicalField::Provider,
        CanonicalField::ServiceDate,
        CanonicalField::ClaimReceiptDate,
        CanonicalField::PaidDate,
        CanonicalField::Icd9,
        CanonicalField::BilledAmount,
        CanonicalField::PaidAmount,
        CanonicalField::CptCode,
        CanonicalField::CheckNo,
    ];

    /// The output header string for this field
    pub fn as_header(&self) -> &'static str {
        match self {
            CanonicalField::Ssn => "SSN",
            CanonicalField::ClaimantFirstName => "ClaimantFirstName",
            CanonicalField::ClaimantLastName => "ClaimantLastName",
            CanonicalField::EmployeeCode => "EmployeeCode",
            CanonicalField::ProviderNo => "ProviderNo",
            CanonicalField::ClaimNo => "ClaimNo",
            CanonicalField::Provider => "Provider",
            CanonicalField::ServiceDate => "ServiceDate",
            CanonicalField::ClaimReceiptDate => "ClaimReceiptDate",
            CanonicalField::PaidDate => "PaidDate",
            CanonicalField::Icd9 => "ICD9",
            CanonicalField::BilledAmount => "BilledAmount",
            CanonicalField::PaidAmount => "PaidAmount",
            CanonicalField::CptCode => "CPTCode",
            CanonicalField::CheckNo => "CheckNo",
        }
    }

    /// Whether this field carries a monetary amount (2-decimal rendering)
    pub fn is_monetary(&self) -> bool {
        matches!(
            self,
            CanonicalField::BilledAmount | CanonicalField::PaidAmount
        )
    }

    /// Whether this field carries a date
    pub fn is_date(&self) -> bool {
        matches!(
            self,
            CanonicalField::ServiceDate
                | CanonicalField::ClaimReceiptDate
                | CanonicalField::PaidDate
        )
    }
}

impl std::fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_header())
    }
}

/// A single cell value as reported by a tabular source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
    Bool(bool),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// The cell as a string, or None if blank.
    ///
    /// Integer-valued numbers render without a fractional part so numeric
    /// claim and check numbers survive as plain digit strings.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(n.to_string())
                }
            }
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
            Cell::Bool(b) => Some(if *b { "TRUE" } else { "FALSE" }.to_string()),
        }
    }

    /// The cell as a number, parsing text with currency punctuation stripped
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => {
                let cleaned: String = s
                    .trim()
                    .chars()
                    .filter(|c| *c != '$' && *c != ',')
                    .collect();
                if cleaned.is_empty() {
                    None
                } else {
                    cleaned.parse().ok()
                }
            }
            _ => None,
        }
    }

    /// The cell as a date, accepting the formats seen in provider exports
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => {
                let trimmed = s.trim();
                for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y"] {
                    if let Ok(d) = NaiveDate::parse_from_str(trimmed, fmt) {
                        return Some(d);
                    }
                }
                None
            }
            _ => None,
        }
    }
}

/// A normalized claim record: one claim line in the canonical 15-field shape.
///
/// Created by the field extractor from one raw row plus profile-level
/// constants and derived values; immutable thereafter. A record missing
/// `claim_no` represents a header or blank artifact and is dropped by the
/// downstream filter, not here.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub ssn: Option<String>,
    pub claimant_first_name: Option<String>,
    pub claimant_last_name: Option<String>,
    pub employee_code: Option<char>,
    pub provider_no: Option<String>,
    pub claim_no: Option<String>,
    pub provider: Option<String>,
    pub service_date: Option<NaiveDate>,
    pub claim_receipt_date: Option<NaiveDate>,
    pub paid_date: Option<NaiveDate>,
    pub icd9: Option<String>,
    pub billed_amount: Option<f64>,
    pub paid_amount: Option<f64>,
    pub cpt_code: Option<String>,
    pub check_no: Option<String>,
}

impl ClaimRecord {
    /// Assign a raw cell value to a canonical field, parsing per field type
    pub fn set(&mut self, field: CanonicalField, cell: &Cell) {
        match field {
            CanonicalField::Ssn => self.ssn = cell.as_text(),
            CanonicalField::ClaimantFirstName => self.claimant_first_name = cell.as_text(),
            CanonicalField::ClaimantLastName => self.claimant_last_name = cell.as_text(),
            CanonicalField::EmployeeCode => {
                self.employee_code = cell.as_text().and_then(|s| s.chars().next())
            }
            CanonicalField::ProviderNo => self.provider_no = cell.as_text(),
            CanonicalField::ClaimNo => self.claim_no = cell.as_text(),
            CanonicalField::Provider => self.provider = cell.as_text(),
            CanonicalField::ServiceDate => self.service_date = cell.as_date(),
            CanonicalField::ClaimReceiptDate => self.claim_receipt_date = cell.as_date(),
            CanonicalField::PaidDate => self.paid_date = cell.as_date(),
            CanonicalField::Icd9 => self.icd9 = cell.as_text(),
            CanonicalField::BilledAmount => self.billed_amount = cell.as_number(),
            CanonicalField::PaidAmount => self.paid_amount = cell.as_number(),
            CanonicalField::CptCode => self.cpt_code = cell.as_text(),
            CanonicalField::CheckNo => self.check_no = cell.as_text(),
        }
    }

    /// Whether this record carries a real claim (ClaimNo present)
    pub fn has_claim_no(&self) -> bool {
        self.claim_no.is_some()
    }
}

/// Identity of one claimant within one provider batch: the output group key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimantIdentity {
    pub first_name: String,
    pub last_name: String,
    pub provider: String,
}

impl ClaimantIdentity {
    /// Build the identity from the first surviving record of a file.
    ///
    /// `provider_name` is the profile's provider label, not the record's
    /// rendering-provider column.
    pub fn from_record(record: &ClaimRecord, provider_name: &str) -> Self {
        Self {
            first_name: record.claimant_first_name.clone().unwrap_or_default(),
            last_name: record.claimant_last_name.clone().unwrap_or_default(),
            provider: provider_name.to_string(),
        }
    }

    /// The deterministic output file stem: `{Provider}_{First}_{Last}`
    pub fn file_stem(&self) -> String {
        format!("{}_{}_{}", self.provider, self.first_name, self.last_name)
    }
}

impl std::fmt::Display for ClaimantIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} ({})", self.first_name, self.last_name, self.provider)
    }
}
