use thiserror::Error;

/// Failures that abort a whole batch run.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("could not read input: {0}")]
    Csv(#[from] csv::Error),

    #[error("input has no \"{column}\" column (found: {found})")]
    MissingColumn { column: String, found: String },

    #[error("could not finalize archive: {0}")]
    Archive(#[from] zip::result::ZipError),
}

/// Failures scoped to a single row. These are logged and the row is skipped.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("search failed: {0}")]
    Search(#[from] prodpix_search::SearchError),

    #[error("download failed: {0}")]
    Download(#[from] prodpix_search::FetchError),

    #[error("archive write failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("archive write failed: {0}")]
    Io(#[from] std::io::Error),
}
