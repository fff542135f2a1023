//! Carries ad-click and UTM parameters from the landing URL onto outbound
//! storefront links.

use url::Url;

use crate::config::LandingConfig;
use crate::dom;
use crate::error::Result;

pub const OUTBOUND_SELECTOR: &str = "a[data-out]";

/// Tracked parameters present on the page URL, in URL order.
pub fn tracking_params(page_url: &str, tracked: &[String]) -> Vec<(String, String)> {
    let Ok(url) = Url::parse(page_url) else {
        return Vec::new();
    };
    url.query_pairs()
        .filter(|(key, value)| !value.is_empty() && tracked.iter().any(|t| t == key))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect()
}

fn is_partner(url: &Url, domain: &str) -> bool {
    url.host_str().map_or(false, |host| host.contains(domain))
}

fn upsert(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter_mut().find(|(k, _)| k == key) {
        Some(pair) => pair.1 = value.to_string(),
        None => pairs.push((key.to_string(), value.to_string())),
    }
}

/// Rewritten destination for a partner link, or `None` when `href` is not a
/// storefront URL. Page parameters override the link's own; with no page
/// parameters the default UTM triple fills in whatever the link lacks.
pub fn tag_destination(
    href: &str,
    page_params: &[(String, String)],
    config: &LandingConfig,
) -> Option<String> {
    let mut url = Url::parse(href).ok()?;
    if !is_partner(&url, &config.storefront_domain) {
        return None;
    }

    let mut pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if page_params.is_empty() {
        let defaults = &config.default_utm;
        for (key, value) in [
            ("utm_source", &defaults.source),
            ("utm_medium", &defaults.medium),
            ("utm_campaign", &defaults.campaign),
        ] {
            if !pairs.iter().any(|(k, _)| k == key) {
                pairs.push((key.to_string(), value.clone()));
            }
        }
    } else {
        for (key, value) in page_params {
            upsert(&mut pairs, key, value);
        }
    }

    url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    Some(url.to_string())
}

/// `rel` value guaranteed to carry `token`, keeping existing tokens.
pub fn ensure_rel(existing: Option<&str>, token: &str) -> String {
    let mut tokens: Vec<&str> = existing
        .unwrap_or_default()
        .split_whitespace()
        .collect();
    if !tokens.iter().any(|t| t.eq_ignore_ascii_case(token)) {
        tokens.push(token);
    }
    tokens.join(" ")
}

/// One-shot pass over every tracked outbound link. Returns how many were
/// rewritten.
pub fn tag_outbound_links(config: &LandingConfig) -> Result<usize> {
    let window = dom::window()?;
    let document = dom::document()?;
    let page_url = window.location().href()?;
    let params = tracking_params(&page_url, &config.tracked_params);

    let mut tagged = 0;
    for link in dom::query_all(&document, OUTBOUND_SELECTOR) {
        let Some(href) = link.get_attribute("href") else {
            continue;
        };
        let Some(destination) = tag_destination(&href, &params, config) else {
            continue;
        };
        link.set_attribute("href", &destination)?;
        let rel = ensure_rel(link.get_attribute("rel").as_deref(), "noopener");
        link.set_attribute("rel", &rel)?;
        tagged += 1;
    }
    log::debug!("tagged {} outbound links ({} page params)", tagged, params.len());
    Ok(tagged)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> LandingConfig {
        LandingConfig::default()
    }

    fn page(query: &str) -> Vec<(String, String)> {
        tracking_params(
            &format!("https://landing.example/offer{}", query),
            &config().tracked_params,
        )
    }

    #[test]
    fn page_params_merge_with_link_params() {
        let params = page("?utm_campaign=summer");
        let tagged =
            tag_destination("https://rqgstore.com/x?utm_source=google", &params, &config()).unwrap();
        assert!(tagged.contains("utm_campaign=summer"));
        assert!(tagged.contains("utm_source=google"));
        assert!(!tagged.contains("utm_medium"));
    }

    #[test]
    fn defaults_fill_missing_utm_when_page_has_none() {
        let tagged = tag_destination("https://rqgstore.com/checkout", &page(""), &config()).unwrap();
        assert_eq!(
            tagged,
            "https://rqgstore.com/checkout?utm_source=landing&utm_medium=cta&utm_campaign=iptv_sa"
        );
    }

    #[test]
    fn defaults_do_not_clobber_link_values() {
        let tagged =
            tag_destination("https://rqgstore.com/x?utm_source=google", &page(""), &config()).unwrap();
        assert!(tagged.contains("utm_source=google"));
        assert!(!tagged.contains("utm_source=landing"));
        assert!(tagged.contains("utm_campaign=iptv_sa"));
    }

    #[test]
    fn page_value_overrides_link_value() {
        let tagged = tag_destination(
            "https://www.rqgstore.com/x?utm_source=google&plan=12m",
            &page("?utm_source=tiktok&gclid=abc"),
            &config(),
        )
        .unwrap();
        assert!(tagged.contains("utm_source=tiktok"));
        assert!(tagged.contains("plan=12m"));
        assert!(tagged.contains("gclid=abc"));
    }

    #[test]
    fn other_domains_are_left_alone() {
        assert_eq!(tag_destination("https://example.com/?q=1", &page(""), &config()), None);
        assert_eq!(tag_destination("/relative/path", &page(""), &config()), None);
    }

    #[test]
    fn untracked_and_empty_page_params_are_dropped() {
        let params = page("?utm_term=&fbclid=zz&wbraid=w1");
        assert_eq!(params, vec![("wbraid".to_string(), "w1".to_string())]);
    }

    #[test]
    fn rel_gains_noopener_once() {
        assert_eq!(ensure_rel(None, "noopener"), "noopener");
        assert_eq!(ensure_rel(Some("nofollow"), "noopener"), "nofollow noopener");
        assert_eq!(ensure_rel(Some("noopener noreferrer"), "noopener"), "noopener noreferrer");
    }
}
