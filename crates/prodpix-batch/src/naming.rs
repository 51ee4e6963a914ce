//! Archive entry names for downloaded images.
//!
//! A name is built from `Brand`, `Product Name`, `Size`, and the row's
//! identifier column, in that order. Each value is trimmed with underscores
//! turned into spaces, the values are joined with `_`, and `.jpg` is
//! appended. Path separators become `-` so every entry sits at the archive
//! root. Repeated names get ` (2)`, ` (3)`, ... before the extension.

use std::collections::HashSet;

use crate::input::BatchRow;

pub const NAME_FIELDS: [&str; 3] = ["Brand", "Product Name", "Size"];
pub const IMAGE_EXTENSION: &str = "jpg";

pub struct EntryNamer {
    id_column: String,
    used: HashSet<String>,
}

impl EntryNamer {
    #[must_use]
    pub fn new(id_column: &str) -> Self {
        Self {
            id_column: id_column.to_string(),
            used: HashSet::new(),
        }
    }

    /// The base name for `row`, without deduplication.
    #[must_use]
    pub fn base_name(&self, row: &BatchRow) -> String {
        NAME_FIELDS
            .iter()
            .copied()
            .chain(std::iter::once(self.id_column.as_str()))
            .map(|field| sanitize_segment(row.get(field).unwrap_or_default()))
            .collect::<Vec<_>>()
            .join("_")
    }

    /// Returns a name for `row` not handed out before by this namer.
    pub fn next_name(&mut self, row: &BatchRow) -> String {
        let base = self.base_name(row);
        let mut candidate = format!("{base}.{IMAGE_EXTENSION}");
        let mut n = 2_usize;
        while self.used.contains(&candidate) {
            candidate = format!("{base} ({n}).{IMAGE_EXTENSION}");
            n += 1;
        }
        self.used.insert(candidate.clone());
        candidate
    }
}

fn sanitize_segment(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| match c {
            '_' => ' ',
            '/' | '\\' => '-',
            c => c,
        })
        .collect()
}
