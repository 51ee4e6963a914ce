//! Static per-retailer resolution policy.
//!
//! Each retailer is one entry in [`PROFILES`]: the search prefix, the image
//! CDN prefixes to prefer, whether the first result may be used when no CDN
//! image is found, the URL rewrite to apply afterwards, and the spreadsheet
//! column holding the retailer's product identifier.

use std::str::FromStr;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RetailerTag {
    Target,
    Walmart,
    HomeDepot,
    Lowes,
}

/// URL rewrite applied to the chosen image URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostProcess {
    None,
    /// Set each `(key, value)` query parameter, replacing an existing
    /// parameter with the same key.
    SetParams(&'static [(&'static str, &'static str)]),
    /// Replace the value of a trailing `size=` parameter. Only applied when
    /// the URL is on one of the retailer's preferred prefixes.
    RewriteTrailingSize(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetailerProfile {
    pub tag: RetailerTag,
    pub name: &'static str,
    pub query_prefix: &'static str,
    pub preferred_url_prefixes: &'static [&'static str],
    pub allow_fallback: bool,
    pub post_process: PostProcess,
    pub batch_column: &'static str,
}

static PROFILES: [RetailerProfile; 4] = [
    RetailerProfile {
        tag: RetailerTag::Target,
        name: "Target",
        query_prefix: "Target",
        preferred_url_prefixes: &["https://target.scene7.com/"],
        allow_fallback: false,
        post_process: PostProcess::SetParams(&[
            ("qlt", "85"),
            ("fmt", "webp"),
            ("hei", "1200"),
            ("wid", "1200"),
        ]),
        batch_column: "TCIN",
    },
    RetailerProfile {
        tag: RetailerTag::Walmart,
        name: "Walmart",
        query_prefix: "Walmart",
        preferred_url_prefixes: &[],
        allow_fallback: true,
        post_process: PostProcess::None,
        batch_column: "UPC",
    },
    RetailerProfile {
        tag: RetailerTag::HomeDepot,
        name: "The Home Depot",
        query_prefix: "Home Depot",
        preferred_url_prefixes: &["https://images.thdstatic.com/"],
        allow_fallback: true,
        post_process: PostProcess::None,
        batch_column: "OMSID",
    },
    RetailerProfile {
        tag: RetailerTag::Lowes,
        name: "Lowe's",
        query_prefix: "Lowes",
        preferred_url_prefixes: &["https://mobileimages.lowes.com/"],
        allow_fallback: true,
        post_process: PostProcess::RewriteTrailingSize("full"),
        batch_column: "Item Number",
    },
];

impl RetailerTag {
    pub const ALL: [RetailerTag; 4] = [
        RetailerTag::Target,
        RetailerTag::Walmart,
        RetailerTag::HomeDepot,
        RetailerTag::Lowes,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RetailerTag::Target => "target",
            RetailerTag::Walmart => "walmart",
            RetailerTag::HomeDepot => "homedepot",
            RetailerTag::Lowes => "lowes",
        }
    }

    #[must_use]
    pub fn profile(self) -> &'static RetailerProfile {
        match self {
            RetailerTag::Target => &PROFILES[0],
            RetailerTag::Walmart => &PROFILES[1],
            RetailerTag::HomeDepot => &PROFILES[2],
            RetailerTag::Lowes => &PROFILES[3],
        }
    }
}

impl std::fmt::Display for RetailerTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown retailer '{0}'; expected one of: target, walmart, homedepot, lowes")]
pub struct ParseRetailerError(pub String);

impl FromStr for RetailerTag {
    type Err = ParseRetailerError;

    /// Case-insensitive; spaces, dashes, and underscores are ignored so
    /// `home-depot` and `Home Depot` both parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        RetailerTag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == key)
            .ok_or_else(|| ParseRetailerError(s.trim().to_string()))
    }
}

impl RetailerProfile {
    /// Returns `true` if `url` starts with any of this retailer's preferred prefixes.
    #[must_use]
    pub fn is_preferred(&self, url: &str) -> bool {
        self.preferred_url_prefixes
            .iter()
            .any(|prefix| url.starts_with(prefix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_table_is_keyed_by_tag() {
        for tag in RetailerTag::ALL {
            assert_eq!(tag.profile().tag, tag, "profile for {tag} has wrong tag");
        }
    }

    #[test]
    fn parses_known_tags_case_insensitively() {
        assert_eq!("Target".parse::<RetailerTag>(), Ok(RetailerTag::Target));
        assert_eq!("LOWES".parse::<RetailerTag>(), Ok(RetailerTag::Lowes));
        assert_eq!("home-depot".parse::<RetailerTag>(), Ok(RetailerTag::HomeDepot));
        assert_eq!(" Home Depot ".parse::<RetailerTag>(), Ok(RetailerTag::HomeDepot));
    }

    #[test]
    fn rejects_unknown_tag() {
        let err = "costco".parse::<RetailerTag>().unwrap_err();
        assert_eq!(err, ParseRetailerError("costco".to_string()));
        assert!(err.to_string().contains("costco"));
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for tag in RetailerTag::ALL {
            assert_eq!(tag.to_string().parse::<RetailerTag>(), Ok(tag));
        }
    }

    #[test]
    fn serializes_as_slug() {
        let json = serde_json::to_string(&RetailerTag::HomeDepot).expect("serialize");
        assert_eq!(json, "\"homedepot\"");
    }

    #[test]
    fn only_target_disallows_fallback() {
        let strict: Vec<RetailerTag> = RetailerTag::ALL
            .into_iter()
            .filter(|t| !t.profile().allow_fallback)
            .collect();
        assert_eq!(strict, vec![RetailerTag::Target]);
    }

    #[test]
    fn is_preferred_matches_prefix_only() {
        let lowes = RetailerTag::Lowes.profile();
        assert!(lowes.is_preferred("https://mobileimages.lowes.com/productimages/a.jpg"));
        assert!(!lowes.is_preferred("https://cdn.example.com/mobileimages.lowes.com/a.jpg"));
        assert!(!RetailerTag::Walmart.profile().is_preferred("https://anything/z.png"));
    }
}
