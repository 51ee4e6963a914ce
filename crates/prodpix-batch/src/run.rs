//! The batch loop: plan, resolve each row, archive, report.

use std::io::{Read, Seek, Write};

use futures::stream::{self, StreamExt};
use prodpix_core::RetailerProfile;

use crate::archive::ImageArchive;
use crate::error::{BatchError, RowError};
use crate::input::{read_input, BatchInput, BatchRow};
use crate::naming::EntryNamer;
use crate::source::ImageSource;
use crate::status::StatusReporter;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Overrides the retailer's identifier column.
    pub id_column: Option<String>,
    /// Rows in flight at once. `1` is strictly sequential.
    pub max_concurrent_rows: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            id_column: None,
            max_concurrent_rows: 1,
        }
    }
}

/// A row that will be processed.
#[derive(Debug, Clone)]
pub struct PlannedRow {
    /// 1-based data row number in the input, header excluded.
    pub row: usize,
    pub identifier: String,
    pub values: BatchRow,
}

/// Validated work for one run.
#[derive(Debug)]
pub struct BatchPlan {
    pub column: String,
    pub rows: Vec<PlannedRow>,
    /// Rows dropped because their identifier was missing or blank.
    pub skipped_blank: usize,
}

impl BatchPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.rows.len()
    }
}

#[derive(Debug)]
pub struct RowFailure {
    pub row: usize,
    pub identifier: String,
    pub error: RowError,
}

#[derive(Debug, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub archived: usize,
    pub not_found: usize,
    pub failures: Vec<RowFailure>,
}

impl BatchSummary {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "archived {} of {} images ({} not found, {} failed)",
            self.archived,
            self.total,
            self.not_found,
            self.failures.len()
        )
    }
}

enum RowOutcome {
    Image(Vec<u8>),
    NotFound,
}

/// Picks the identifier column and filters out rows without an identifier.
///
/// # Errors
///
/// Returns [`BatchError::MissingColumn`] if the header has no such column.
pub fn plan_batch(
    profile: &RetailerProfile,
    input: &BatchInput,
    id_column: Option<&str>,
) -> Result<BatchPlan, BatchError> {
    let column = id_column
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or(profile.batch_column);

    if !input.has_column(column) {
        return Err(BatchError::MissingColumn {
            column: column.to_string(),
            found: input.headers.join(", "),
        });
    }

    let mut rows = Vec::with_capacity(input.rows.len());
    let mut skipped_blank = 0;
    for (i, values) in input.rows.iter().enumerate() {
        match values.non_blank(column) {
            Some(identifier) => rows.push(PlannedRow {
                row: i + 1,
                identifier: identifier.to_string(),
                values: values.clone(),
            }),
            None => skipped_blank += 1,
        }
    }

    Ok(BatchPlan {
        column: column.to_string(),
        rows,
        skipped_blank,
    })
}

/// Runs a whole batch, writing one zip entry per resolved row into `output`.
///
/// Row-level failures are recorded in the summary and never abort the run.
/// `status` ends in `Complete` on `Ok` and `Error` on `Err`.
///
/// # Errors
///
/// - [`BatchError::Csv`] if the input cannot be parsed.
/// - [`BatchError::MissingColumn`] before any lookup is attempted.
/// - [`BatchError::Archive`] if the archive cannot be finalized.
pub async fn run_batch<S, R, W>(
    source: &S,
    profile: &RetailerProfile,
    input: R,
    output: W,
    options: &BatchOptions,
    status: &StatusReporter,
) -> Result<BatchSummary, BatchError>
where
    S: ImageSource,
    R: Read,
    W: Write + Seek,
{
    let plan = match read_input(input)
        .and_then(|input| plan_batch(profile, &input, options.id_column.as_deref()))
    {
        Ok(plan) => plan,
        Err(e) => {
            status.fail(e.to_string());
            return Err(e);
        }
    };

    let total = plan.total();
    status.start(total);
    tracing::info!(
        retailer = %profile.tag,
        column = %plan.column,
        total,
        skipped_blank = plan.skipped_blank,
        "batch started"
    );

    let mut archive = ImageArchive::new(output);
    let mut namer = EntryNamer::new(&plan.column);
    let mut summary = BatchSummary {
        total,
        ..BatchSummary::default()
    };

    let mut outcomes = stream::iter(plan.rows.iter())
        .map(|planned| async move {
            status.begin_row(&planned.identifier);
            let outcome = process_row(source, profile, &planned.identifier).await;
            (planned, outcome)
        })
        .buffered(options.max_concurrent_rows.max(1));

    while let Some((planned, outcome)) = outcomes.next().await {
        let result = outcome.and_then(|outcome| match outcome {
            RowOutcome::Image(bytes) => {
                let name = namer.next_name(&planned.values);
                archive.add(&name, &bytes)?;
                tracing::debug!(row = planned.row, entry = %name, "archived image");
                Ok(())
            }
            RowOutcome::NotFound => {
                tracing::warn!(
                    row = planned.row,
                    identifier = %planned.identifier,
                    "no image found"
                );
                summary.not_found += 1;
                Ok(())
            }
        });

        if let Err(error) = result {
            tracing::warn!(
                row = planned.row,
                identifier = %planned.identifier,
                error = %error,
                "row skipped"
            );
            summary.failures.push(RowFailure {
                row: planned.row,
                identifier: planned.identifier.clone(),
                error,
            });
        }
        status.finish_row();
    }

    summary.archived = archive.len();
    if let Err(e) = archive.finish() {
        let e = BatchError::from(e);
        tracing::error!(error = %e, "batch failed");
        status.fail(e.to_string());
        return Err(e);
    }

    let message = summary.message();
    tracing::info!(retailer = %profile.tag, "{message}");
    status.complete(message);
    Ok(summary)
}

async fn process_row<S: ImageSource>(
    source: &S,
    profile: &RetailerProfile,
    identifier: &str,
) -> Result<RowOutcome, RowError> {
    let Some(image) = source.lookup(profile, identifier).await? else {
        return Ok(RowOutcome::NotFound);
    };
    let bytes = source.download(&image).await?;
    Ok(RowOutcome::Image(bytes))
}
