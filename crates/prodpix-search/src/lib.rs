//! Product image search for retailer-specific naming conventions.
//!
//! Builds a retailer-prefixed query, runs it against the external search
//! API, picks the best candidate image for the retailer, and normalizes its
//! URL. The same pipeline backs the interactive lookup and the batch run.

pub mod client;
pub mod error;
pub mod fetch;
pub mod lookup;
pub mod query;
pub mod resolve;
pub mod types;

pub use client::SearchClient;
pub use error::{FetchError, SearchError};
pub use fetch::{validate_target, ImageFetcher, UpstreamImage};
pub use lookup::{lookup_image, Lookup, LookupState};
pub use query::{build_query, validate_term};
pub use resolve::{resolve, ResolvedImage};
pub use types::{SearchItem, SearchResultSet};
