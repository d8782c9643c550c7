/*!
 * Provider profile registry and classifier
 *
 * Each supported provider export format is described by a declarative
 * `ProviderProfile`: where its claim table lives, how its raw columns map
 * onto the canonical schema, which fields are fixed constants, and whether
 * the claimant name must be fetched from a fixed cell outside the grid.
 *
 * The registry evaluates profiles in a fixed priority order (first match
 * wins); that ordering is part of the contract since provider name
 * substrings could in principle overlap.
 */

use crate::data_types::CanonicalField;
use crate::error::Result;
use crate::schema::CanonicalSchema;

/// Declarative extraction rules for one provider export format
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    /// Provider label used for grouping and output file names
    pub provider_name: String,
    /// File-name substring that identifies this format
    pub match_token: String,
    /// Sheet holding the claim table
    pub sheet_name: String,
    /// Zero-based row of the populated sheet range holding the headers
    pub header_offset: usize,
    /// Strip whitespace and embedded newlines from headers before mapping
    pub clean_headers: bool,
    /// Raw column name to canonical field. One raw column may feed more
    /// than one canonical field (the BCBS FIRSTDOS duplication).
    pub field_map: Vec<(String, CanonicalField)>,
    /// Fixed literal assignments independent of row content
    pub constants: Vec<(CanonicalField, String)>,
    /// Fixed (row, col) cell holding the claimant's full name, read once
    /// per file and broadcast to every record
    pub claimant_name_cell: Option<(u32, u32)>,
}

impl ProviderProfile {
    /// Create a profile with an empty field map
    pub fn new(
        provider_name: &str,
        match_token: &str,
        sheet_name: &str,
        header_offset: usize,
    ) -> Self {
        Self {
            provider_name: provider_name.to_string(),
            match_token: match_token.to_string(),
            sheet_name: sheet_name.to_string(),
            header_offset,
            clean_headers: false,
            field_map: Vec::new(),
            constants: Vec::new(),
            claimant_name_cell: None,
        }
    }

    /// Map a raw column onto a canonical field
    pub fn map(mut self, raw_column: &str, field: CanonicalField) -> Self {
        self.field_map.push((raw_column.to_string(), field));
        self
    }

    /// Assign a fixed literal value to a canonical field
    pub fn constant(mut self, field: CanonicalField, value: &str) -> Self {
        self.constants.push((field, value.to_string()));
        self
    }

    /// Enable header whitespace/newline cleanup before mapping
    pub fn with_clean_headers(mut self) -> Self {
        self.clean_headers = true;
        self
    }

    /// Set the fixed claimant-name cell coordinate
    pub fn with_claimant_name_cell(mut self, row: u32, col: u32) -> Self {
        self.claimant_name_cell = Some((row, col));
        self
    }

    /// Every canonical field this profile populates, in declaration order
    pub fn coverage_targets(&self) -> Vec<CanonicalField> {
        let mut targets: Vec<CanonicalField> =
            self.field_map.iter().map(|(_, field)| *field).collect();
        targets.extend(self.constants.iter().map(|(field, _)| *field));
        if self.claimant_name_cell.is_some() {
            targets.push(CanonicalField::ClaimantFirstName);
            targets.push(CanonicalField::ClaimantLastName);
        }
        targets
    }

    /// Check the 15-field coverage invariant for this profile
    pub fn validate(&self) -> Result<()> {
        CanonicalSchema::validate_coverage(&self.provider_name, self.coverage_targets())
    }
}

/// Result of classifying an input file name
#[derive(Debug, Clone, Copy)]
pub enum Classification<'a> {
    /// The file follows a known provider format
    Matched(&'a ProviderProfile),
    /// No profile matched; the file is skipped, never a batch failure
    Skip,
}

/// Ordered table of provider profiles
#[derive(Debug, Clone)]
pub struct ProfileRegistry {
    profiles: Vec<ProviderProfile>,
}

impl ProfileRegistry {
    /// Build a registry from profiles in priority order, validating each
    /// profile's canonical coverage. A coverage defect aborts here, before
    /// any file is processed.
    pub fn new(profiles: Vec<ProviderProfile>) -> Result<Self> {
        for profile in &profiles {
            profile.validate()?;
        }
        Ok(Self { profiles })
    }

    /// The registry of shipped provider formats
    pub fn standard() -> Result<Self> {
        Self::new(vec![practice(), healthgram(), bcbs()])
    }

    /// Find the first profile whose match token appears in the file name
    pub fn lookup(&self, file_name: &str) -> Option<&ProviderProfile> {
        self.profiles
            .iter()
            .find(|p| file_name.contains(&p.match_token))
    }

    /// Classify a file name. Total and deterministic: always exactly one
    /// profile or `Skip`, and stable across repeated calls.
    pub fn classify(&self, file_name: &str) -> Classification<'_> {
        match self.lookup(file_name) {
            Some(profile) => Classification::Matched(profile),
            None => Classification::Skip,
        }
    }

    /// All registered profiles, in priority order
    pub fn profiles(&self) -> &[ProviderProfile] {
        &self.profiles
    }
}

/// The PRACTICE export: headers on the first row, per-row claimant names
fn practice() -> ProviderProfile {
    use CanonicalField::*;
    ProviderProfile::new("PRACTICE", "DOE", "MEDICAL", 0)
        .constant(EmployeeCode, "E")
        .map("MEMBER ID", Ssn)
        .map("FIRST NAME", ClaimantFirstName)
        .map("LAST NAME", ClaimantLastName)
        .map("CLAIM NUMBER", ClaimNo)
        .map("Dx Code", Icd9)
        .map("Procedure", CptCode)
        .map("CHECK NUMBER", CheckNo)
        .map("BEGINNING SERVICE", ServiceDate)
        .map("END SERVICE", ClaimReceiptDate)
        .map("DATE PAID", PaidDate)
        .map("Provider Name", Provider)
        .map("BILLED", BilledAmount)
        .map("PAID", PaidAmount)
        .map("PROVIDER TIN", ProviderNo)
}

/// The HEALTHGRAM export: one banner row above the headers
fn healthgram() -> ProviderProfile {
    use CanonicalField::*;
    ProviderProfile::new("HEALTHGRAM", "HEALTHGRAM", "SF_Claims Filing (Excel)", 1)
        .constant(EmployeeCode, "e")
        .map("membno", Ssn)
        .map("mfstnam", ClaimantFirstName)
        .map("mlstnam", ClaimantLastName)
        .map("claimno", ClaimNo)
        .map("diagn", Icd9)
        .map("svccod", CptCode)
        .map("chknum", CheckNo)
        .map("svcdat", ServiceDate)
        .map("enddat", ClaimReceiptDate)
        .map("pidate", PaidDate)
        .map("plstnam", Provider)
        .map("claamt", BilledAmount)
        .map("to pay", PaidAmount)
        .map("provno", ProviderNo)
}

/// The BCBS export: nine preamble rows, dirty headers, the claimant name in
/// a fixed cell above the grid, and a fixed provider number.
///
/// FIRSTDOS intentionally feeds both ServiceDate and ClaimReceiptDate: the
/// upstream format sources both canonical dates from that single raw
/// column. Preserved exactly as observed.
fn bcbs() -> ProviderProfile {
    use CanonicalField::*;
    ProviderProfile::new("BCBS", "BCBS", "Sheet1", 9)
        .with_clean_headers()
        .with_claimant_name_cell(3, 0)
        .constant(EmployeeCode, "E")
        .constant(ProviderNo, "22-2222222")
        .map("SUBSCRIBER#", Ssn)
        .map("CLAIM#", ClaimNo)
        .map("DIAGCODE", Icd9)
        .map("PROCEDURECODE", CptCode)
        .map("CHECK#", CheckNo)
        .map("FIRSTDOS", ServiceDate)
        .map("FIRSTDOS", ClaimReceiptDate)
        .map("PAIDDATE", PaidDate)
        .map("PROVIDER NAME / TYPE", Provider)
        .map("TOTALCHARGES", BilledAmount)
        .map("TOTALPAYMENT", PaidAmount)
}
