use prodpix_core::RetailerTag;

use super::*;

const TARGET_PARAMS: &str = "qlt=85&fmt=webp&hei=1200&wid=1200";

fn results(images: &[Option<&str>]) -> SearchResultSet {
    SearchResultSet::from_first_images(images.iter().copied())
}

fn resolved(tag: RetailerTag, images: &[Option<&str>]) -> Option<String> {
    resolve(tag.profile(), &results(images)).map(|img| img.as_str().to_string())
}

#[test]
fn empty_result_set_is_a_miss_for_every_retailer() {
    for tag in RetailerTag::ALL {
        assert_eq!(resolved(tag, &[]), None, "{tag} should miss on empty results");
    }
}

#[test]
fn items_without_images_are_a_miss_for_every_retailer() {
    for tag in RetailerTag::ALL {
        assert_eq!(resolved(tag, &[None, None]), None, "{tag}");
    }
}

#[test]
fn target_prefers_cdn_image_and_sets_quality_params() {
    let got = resolved(
        RetailerTag::Target,
        &[
            Some("https://other.cdn/x.jpg"),
            Some("https://target.scene7.com/is/image/Target/y.jpg"),
        ],
    );
    assert_eq!(
        got.as_deref(),
        Some(format!("https://target.scene7.com/is/image/Target/y.jpg?{TARGET_PARAMS}").as_str())
    );
}

#[test]
fn target_without_cdn_match_is_a_miss() {
    let got = resolved(
        RetailerTag::Target,
        &[
            Some("https://other.cdn/x.jpg"),
            Some("https://images.example.com/y.jpg"),
        ],
    );
    assert_eq!(got, None);
}

#[test]
fn target_replaces_existing_size_params_and_keeps_others() {
    let got = resolved(
        RetailerTag::Target,
        &[Some(
            "https://target.scene7.com/is/image/Target/GUEST_1?wid=325&token=abc&hei=325",
        )],
    );
    assert_eq!(
        got.as_deref(),
        Some(
            format!("https://target.scene7.com/is/image/Target/GUEST_1?token=abc&{TARGET_PARAMS}")
                .as_str()
        )
    );
}

#[test]
fn target_keeps_unrelated_query_bytes_verbatim() {
    let preset = resolved(
        RetailerTag::Target,
        &[Some("https://target.scene7.com/is/image/Target/GUEST_1?$pdp$")],
    );
    assert_eq!(
        preset.as_deref(),
        Some(format!("https://target.scene7.com/is/image/Target/GUEST_1?$pdp$&{TARGET_PARAMS}").as_str())
    );

    let encoded = resolved(
        RetailerTag::Target,
        &[Some("https://target.scene7.com/is/image/a%20b?x=a%20b&wid=50")],
    );
    assert_eq!(
        encoded.as_deref(),
        Some(format!("https://target.scene7.com/is/image/a%20b?x=a%20b&{TARGET_PARAMS}").as_str())
    );
}

#[test]
fn target_post_process_is_idempotent() {
    let profile = RetailerTag::Target.profile();
    let once = resolve(
        profile,
        &results(&[Some("https://target.scene7.com/is/image/Target/z")]),
    )
    .expect("resolves");
    let twice = apply_post_process(profile, once.url().clone());
    assert_eq!(twice.as_str(), once.as_str());
}

#[test]
fn walmart_falls_back_to_first_image_unchanged() {
    let got = resolved(RetailerTag::Walmart, &[Some("https://anything/z.png")]);
    assert_eq!(got.as_deref(), Some("https://anything/z.png"));
}

#[test]
fn walmart_fallback_uses_first_item_only() {
    let got = resolved(
        RetailerTag::Walmart,
        &[None, Some("https://i5.walmartimages.com/asr/a.jpeg")],
    );
    assert_eq!(got, None);
}

#[test]
fn fallback_upgrades_protocol_relative_and_http_urls() {
    assert_eq!(
        resolved(RetailerTag::Walmart, &[Some("//i5.walmartimages.com/asr/a.jpeg")]).as_deref(),
        Some("https://i5.walmartimages.com/asr/a.jpeg")
    );
    assert_eq!(
        resolved(RetailerTag::Walmart, &[Some("HTTP://i5.walmartimages.com/asr/b.jpeg")])
            .as_deref(),
        Some("https://i5.walmartimages.com/asr/b.jpeg")
    );
}

#[test]
fn fallback_rejects_relative_and_non_http_candidates() {
    for bad in ["/images/a.jpg", "data:image/png;base64,AAAA", "not a url", "ftp://x/y.png"] {
        assert_eq!(resolved(RetailerTag::Walmart, &[Some(bad)]), None, "{bad}");
    }
}

#[test]
fn home_depot_prefers_cdn_over_first_item() {
    let got = resolved(
        RetailerTag::HomeDepot,
        &[
            Some("https://www.example.com/drill.jpg"),
            None,
            Some("https://images.thdstatic.com/productImages/abc/svn/drill-64_600.jpg"),
        ],
    );
    assert_eq!(
        got.as_deref(),
        Some("https://images.thdstatic.com/productImages/abc/svn/drill-64_600.jpg")
    );
}

#[test]
fn home_depot_falls_back_when_no_cdn_image() {
    let got = resolved(
        RetailerTag::HomeDepot,
        &[Some("https://www.example.com/drill.jpg")],
    );
    assert_eq!(got.as_deref(), Some("https://www.example.com/drill.jpg"));
}

#[test]
fn preferred_scan_matches_upgraded_http_candidate() {
    let got = resolved(
        RetailerTag::HomeDepot,
        &[
            Some("https://www.example.com/drill.jpg"),
            Some("http://images.thdstatic.com/productImages/x.jpg"),
        ],
    );
    assert_eq!(
        got.as_deref(),
        Some("https://images.thdstatic.com/productImages/x.jpg")
    );
}

#[test]
fn lowes_rewrites_trailing_size_to_full() {
    let got = resolved(
        RetailerTag::Lowes,
        &[Some(
            "https://mobileimages.lowes.com/productimages/1a2b/3c4d.jpg?size=thumbnail",
        )],
    );
    assert_eq!(
        got.as_deref(),
        Some("https://mobileimages.lowes.com/productimages/1a2b/3c4d.jpg?size=full")
    );
}

#[test]
fn lowes_rewrites_size_when_it_is_the_last_of_several_params() {
    let got = resolved(
        RetailerTag::Lowes,
        &[Some(
            "https://mobileimages.lowes.com/productimages/x.jpg?v=2&size=pdhism",
        )],
    );
    assert_eq!(
        got.as_deref(),
        Some("https://mobileimages.lowes.com/productimages/x.jpg?v=2&size=full")
    );
}

#[test]
fn lowes_without_size_param_is_unchanged() {
    let url = "https://mobileimages.lowes.com/productimages/x.jpg";
    assert_eq!(resolved(RetailerTag::Lowes, &[Some(url)]).as_deref(), Some(url));
}

#[test]
fn lowes_non_trailing_size_is_unchanged() {
    let url = "https://mobileimages.lowes.com/productimages/x.jpg?size=xl&v=2";
    assert_eq!(resolved(RetailerTag::Lowes, &[Some(url)]).as_deref(), Some(url));
}

#[test]
fn lowes_fallback_off_cdn_is_not_rewritten() {
    let url = "https://cdn.example.com/lowes/x.jpg?size=thumbnail";
    assert_eq!(resolved(RetailerTag::Lowes, &[Some(url)]).as_deref(), Some(url));
}

#[test]
fn resolved_image_serializes_as_string() {
    let img = resolve(
        RetailerTag::Walmart.profile(),
        &results(&[Some("https://anything/z.png")]),
    )
    .expect("resolves");
    assert_eq!(
        serde_json::to_string(&img).expect("serialize"),
        "\"https://anything/z.png\""
    );
}
