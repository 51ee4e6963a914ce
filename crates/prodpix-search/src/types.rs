//! Search API response types.
//!
//! Only the fields the resolver reads are modelled; everything else in the
//! response is ignored. A response without `items` (zero hits) deserializes
//! to an empty result set.

use serde::Deserialize;

/// Ordered search results for one query.
#[derive(Debug, Default, Deserialize)]
pub struct SearchResultSet {
    #[serde(default)]
    pub items: Vec<SearchItem>,
}

/// A single search hit.
#[derive(Debug, Default, Deserialize)]
pub struct SearchItem {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub pagemap: Option<PageMap>,
}

/// Structured data the search engine extracted from the hit's page.
#[derive(Debug, Default, Deserialize)]
pub struct PageMap {
    #[serde(default)]
    pub cse_image: Vec<CandidateImage>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CandidateImage {
    #[serde(default)]
    pub src: Option<String>,
}

impl SearchItem {
    /// The item's first candidate image URL. Later candidates are never consulted.
    #[must_use]
    pub fn first_image(&self) -> Option<&str> {
        self.pagemap
            .as_ref()?
            .cse_image
            .first()?
            .src
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

impl SearchResultSet {
    /// Builds a result set whose items each carry the given first-candidate URL.
    /// `None` produces an item with no candidate image.
    #[must_use]
    pub fn from_first_images<'a, I>(images: I) -> Self
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let items = images
            .into_iter()
            .map(|src| SearchItem {
                title: None,
                link: None,
                pagemap: src.map(|s| PageMap {
                    cse_image: vec![CandidateImage {
                        src: Some(s.to_string()),
                    }],
                }),
            })
            .collect();
        Self { items }
    }
}
