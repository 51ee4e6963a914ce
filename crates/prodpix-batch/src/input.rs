use std::collections::HashMap;
use std::io::Read;

use csv::{ReaderBuilder, Trim};

use crate::error::BatchError;

/// One data row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchRow {
    values: HashMap<String, String>,
}

impl BatchRow {
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }

    /// The trimmed value of `column`, or `None` if it is missing or blank.
    #[must_use]
    pub fn non_blank(&self, column: &str) -> Option<&str> {
        self.get(column).map(str::trim).filter(|v| !v.is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for BatchRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[derive(Debug)]
pub struct BatchInput {
    pub headers: Vec<String>,
    pub rows: Vec<BatchRow>,
}

impl BatchInput {
    #[must_use]
    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }
}

/// Parses a headered CSV. Short rows are allowed; their trailing columns are
/// simply absent.
///
/// # Errors
///
/// Returns [`BatchError::Csv`] if the input is not readable CSV.
pub fn read_input<R: Read>(input: R) -> Result<BatchInput, BatchError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(input);

    let headers: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        rows.push(
            headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h.clone(), v.to_string()))
                .collect(),
        );
    }

    Ok(BatchInput { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_headers_and_rows() {
        let csv = "UPC,Brand\n0123,Acme\n0456,Globex\n";
        let input = read_input(csv.as_bytes()).expect("parse");
        assert_eq!(input.headers, vec!["UPC", "Brand"]);
        assert_eq!(input.rows.len(), 2);
        assert_eq!(input.rows[1].get("Brand"), Some("Globex"));
    }

    #[test]
    fn trims_headers_and_strips_bom() {
        let csv = "\u{feff} Item Number , Brand \n42,Acme\n";
        let input = read_input(csv.as_bytes()).expect("parse");
        assert!(input.has_column("Item Number"));
        assert!(input.has_column("Brand"));
        assert_eq!(input.rows[0].get("Item Number"), Some("42"));
    }

    #[test]
    fn short_rows_leave_columns_absent() {
        let csv = "UPC,Brand,Size\n0123\n";
        let input = read_input(csv.as_bytes()).expect("parse");
        assert_eq!(input.rows[0].get("UPC"), Some("0123"));
        assert_eq!(input.rows[0].get("Size"), None);
    }

    #[test]
    fn non_blank_filters_whitespace() {
        let row: BatchRow = [("UPC", "   "), ("Brand", " Acme ")].into_iter().collect();
        assert_eq!(row.non_blank("UPC"), None);
        assert_eq!(row.non_blank("Brand"), Some("Acme"));
        assert_eq!(row.non_blank("Missing"), None);
    }

    #[test]
    fn invalid_utf8_is_an_error() {
        let bytes: &[u8] = b"UPC\n\xff\xfe\n";
        assert!(matches!(read_input(bytes), Err(BatchError::Csv(_))));
    }
}
