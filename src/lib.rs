/*!
 * # Claimnorm: Claim Spreadsheet Normalization Engine
 *
 * A Rust library for normalizing heterogeneous insurance provider claim
 * exports into a single canonical claim schema.
 *
 * ## Features
 *
 * - 🗂 **Profile-Driven**: Each provider format is a declarative profile,
 *   validated against the canonical schema before any file is touched
 * - 🔎 **Name-Based Classification**: Input files route to a profile by
 *   file-name substring; unknown files are skipped, never errors
 * - 📑 **Canonical Schema**: Every output carries the same 15 columns in
 *   the same order, whatever the source format looked like
 * - 👤 **Per-Claimant Output**: Records group by claimant and each group
 *   becomes one output spreadsheet
 * - 🛡 **Resilient Batches**: A malformed file skips with a notice; the
 *   rest of the batch keeps going
 *
 * ## Quick Start
 *
 * ```no_run
 * use claimnorm::prelude::*;
 *
 * # fn main() -> Result<()> {
 * // Normalize every provider export in a directory
 * let summary = ClaimsPipeline::new("./exports")?.run()?;
 *
 * println!(
 *     "{} file(s) in, {} claimant file(s) out",
 *     summary.files_processed,
 *     summary.outputs.len()
 * );
 * # Ok(())
 * # }
 * ```
 *
 * ## Custom Profiles
 *
 * ```no_run
 * # use claimnorm::prelude::*;
 * # fn main() -> Result<()> {
 * use claimnorm::data_types::CanonicalField::*;
 *
 * let acme = ProviderProfile::new("ACME", "ACME", "Claims", 0)
 *     .constant(EmployeeCode, "E")
 *     .map("ssn", Ssn)
 *     .map("first", ClaimantFirstName)
 *     .map("last", ClaimantLastName)
 *     .map("claim", ClaimNo)
 *     .map("dx", Icd9)
 *     .map("cpt", CptCode)
 *     .map("check", CheckNo)
 *     .map("from", ServiceDate)
 *     .map("received", ClaimReceiptDate)
 *     .map("paid on", PaidDate)
 *     .map("provider", Provider)
 *     .map("billed", BilledAmount)
 *     .map("paid", PaidAmount)
 *     .map("tin", ProviderNo);
 *
 * let registry = ProfileRegistry::new(vec![acme])?;
 * let summary = ClaimsPipeline::new("./exports")?
 *     .with_registry(registry)
 *     .run()?;
 * # Ok(())
 * # }
 * ```
 *
 * ## Configuration
 *
 * ```no_run
 * # use claimnorm::prelude::*;
 * # fn main() -> Result<()> {
 * let config = ConfigBuilder::new()
 *     .output_dir("Normalized")
 *     .progress_bar(false)
 *     .halt_on_file_error(true)
 *     .build();
 *
 * let summary = ClaimsPipeline::new("./exports")?
 *     .with_config(config)
 *     .run()?;
 * # Ok(())
 * # }
 * ```
 */

// Re-export error types from root
pub use error::{ClaimsError, ErrorContext, Result};

// Public modules
pub mod data_types;
pub mod schema;
pub mod profiles;
pub mod reader;
pub mod extract;
pub mod group;
pub mod export;
pub mod pipeline;
pub mod config;
pub mod error;

/// Prelude module for convenient imports
///
/// Import everything you need with:
/// ```
/// use claimnorm::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{ClaimsConfig, ConfigBuilder};
    pub use crate::data_types::{CanonicalField, Cell, ClaimRecord, ClaimantIdentity};
    pub use crate::error::{ClaimsError, Result};
    pub use crate::export::{CsvSink, TabularSink};
    pub use crate::extract::FieldExtractor;
    pub use crate::group::{filter_claims, group_by_claimant, ClaimantGroup};
    pub use crate::pipeline::{BatchSummary, ClaimsPipeline};
    pub use crate::profiles::{Classification, ProfileRegistry, ProviderProfile};
    pub use crate::reader::{TabularSource, VecSource, WorkbookSource};
    pub use crate::schema::CanonicalSchema;
}

/// Claim normalization constants
pub mod constants {
    /// Number of columns in the canonical claim schema
    pub const CANONICAL_COLUMN_COUNT: usize = 15;

    /// Directory created inside the input directory for outputs
    pub const OUTPUT_DIR_NAME: &str = "Output";

    /// Token written for absent cells in rendered output
    pub const NA_TOKEN: &str = "NAN";

    /// Padding added to the widest rendered value per column
    pub const WIDTH_PADDING: usize = 3;

    /// Input spreadsheet extension, without the dot
    pub const INPUT_EXTENSION: &str = "xlsx";

    /// Prefix of spreadsheet editor lock files, always ignored
    pub const TEMP_FILE_MARKER: &str = "~$";
}
