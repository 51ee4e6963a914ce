//! Candidate image selection and URL normalization.
//!
//! Selection inspects only the first candidate image of each search item:
//!
//! 1. the first candidate on one of the retailer's preferred CDN prefixes wins;
//! 2. otherwise, if the retailer allows it, the first item's candidate is used;
//! 3. otherwise there is no match.
//!
//! The chosen URL is upgraded to `https` where possible and then rewritten by
//! the retailer's [`PostProcess`] rule. Anything that does not end up as an
//! absolute `https` URL is dropped, so a [`ResolvedImage`] always is one.

use std::borrow::Cow;
use std::sync::LazyLock;

use prodpix_core::{PostProcess, RetailerProfile};
use regex::Regex;
use reqwest::Url;
use serde::{Serialize, Serializer};

use crate::types::{SearchItem, SearchResultSet};

static TRAILING_SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([?&]size=)[^&#]*$").expect("valid trailing size regex"));

/// An absolute `https` image URL chosen for a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedImage(Url);

impl ResolvedImage {
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.0
    }
}

impl std::fmt::Display for ResolvedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ResolvedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Picks and normalizes the best image for `profile` from `results`.
///
/// Returns `None` when nothing suitable was found; a miss is an expected
/// outcome, not an error.
#[must_use]
pub fn resolve(profile: &RetailerProfile, results: &SearchResultSet) -> Option<ResolvedImage> {
    let chosen = select_candidate(profile, results)?;
    let Some(url) = parse_https(&chosen) else {
        tracing::debug!(
            retailer = %profile.tag,
            candidate = %chosen,
            "chosen candidate is not an absolute https URL"
        );
        return None;
    };
    Some(ResolvedImage(apply_post_process(profile, url)))
}

fn select_candidate<'a>(
    profile: &RetailerProfile,
    results: &'a SearchResultSet,
) -> Option<Cow<'a, str>> {
    let preferred = results
        .items
        .iter()
        .filter_map(SearchItem::first_image)
        .map(upgrade_scheme)
        .find(|candidate| profile.is_preferred(candidate));

    if preferred.is_some() {
        return preferred;
    }

    if !profile.allow_fallback {
        return None;
    }

    results
        .items
        .first()
        .and_then(SearchItem::first_image)
        .map(upgrade_scheme)
}

/// Rewrites protocol-relative and plain-`http` URLs to `https`.
fn upgrade_scheme(raw: &str) -> Cow<'_, str> {
    if let Some(rest) = raw.strip_prefix("//") {
        return Cow::Owned(format!("https://{rest}"));
    }
    match raw.get(..7) {
        Some(scheme) if scheme.eq_ignore_ascii_case("http://") => {
            Cow::Owned(format!("https://{}", &raw[7..]))
        }
        _ => Cow::Borrowed(raw),
    }
}

fn parse_https(candidate: &str) -> Option<Url> {
    let url = Url::parse(candidate).ok()?;
    if url.scheme() != "https" || url.host_str().is_none_or(str::is_empty) {
        return None;
    }
    Some(url)
}

fn apply_post_process(profile: &RetailerProfile, url: Url) -> Url {
    match profile.post_process {
        PostProcess::None => url,
        PostProcess::SetParams(params) => set_query_params(url, params),
        PostProcess::RewriteTrailingSize(value) => {
            if profile.is_preferred(url.as_str()) {
                rewrite_trailing_size(url, value)
            } else {
                url
            }
        }
    }
}

/// Sets each parameter, replacing any existing one with the same key.
/// Unrelated query segments are kept byte for byte in their original order.
fn set_query_params(mut url: Url, params: &[(&str, &str)]) -> Url {
    let mut query: Vec<String> = url
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|segment| !segment.is_empty())
        .filter(|segment| {
            let key = segment.split_once('=').map_or(*segment, |(k, _)| k);
            !params.iter().any(|(k, _)| *k == key)
        })
        .map(str::to_string)
        .collect();
    query.extend(params.iter().map(|(k, v)| format!("{k}={v}")));

    url.set_query(Some(&query.join("&")));
    url
}

fn rewrite_trailing_size(url: Url, value: &str) -> Url {
    if !TRAILING_SIZE_RE.is_match(url.as_str()) {
        return url;
    }
    let rewritten = TRAILING_SIZE_RE
        .replace(url.as_str(), |caps: &regex::Captures<'_>| {
            format!("{}{value}", &caps[1])
        })
        .into_owned();
    Url::parse(&rewritten).unwrap_or(url)
}

#[cfg(test)]
#[path = "resolve_test.rs"]
mod tests;
