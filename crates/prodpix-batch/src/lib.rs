//! Bulk image collection from a spreadsheet of product identifiers.
//!
//! Reads a CSV, resolves one image per row through the shared search
//! pipeline, and writes every downloaded image into a single zip archive.
//! Per-row failures are logged and skipped; only input, configuration, and
//! archive-finalization failures abort the run.

pub mod archive;
pub mod error;
pub mod input;
pub mod naming;
pub mod run;
pub mod source;
pub mod status;

pub use archive::ImageArchive;
pub use error::{BatchError, RowError};
pub use input::{read_input, BatchInput, BatchRow};
pub use naming::EntryNamer;
pub use run::{
    plan_batch, run_batch, BatchOptions, BatchPlan, BatchSummary, PlannedRow, RowFailure,
};
pub use source::{ImageSource, LiveImageSource};
pub use status::{BatchState, ProcessingStatus, StatusReporter};
