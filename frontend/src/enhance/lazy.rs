//! Deferred image sources and scroll-in reveal animations, both driven by
//! one-shot visibility.

use web_sys::Element;

use crate::config::LandingConfig;
use crate::dom;
use crate::enhance::visibility::{ObserverOptions, VisibilityObserver};
use crate::error::{report, EnhanceError, Result};

const LAZY_SELECTOR: &str = "img[data-src], img[data-srcset], source[data-srcset]";
const REVEAL_SELECTOR: &str = "[data-aos]";

/// Parses a millisecond hint such as `data-aos-delay="200"`.
pub fn parse_ms(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse().ok()
}

fn load_media(element: &Element) -> Result<()> {
    if let Some(src) = element.get_attribute("data-src") {
        element.set_attribute("src", &src)?;
        element.remove_attribute("data-src")?;
    }
    if let Some(srcset) = element.get_attribute("data-srcset") {
        element.set_attribute("srcset", &srcset)?;
        element.remove_attribute("data-srcset")?;
    }
    dom::set_class(element, "lazy-loaded", true)
}

fn reveal(element: &Element) -> Result<()> {
    if let Some(delay) = parse_ms(element.get_attribute("data-aos-delay").as_deref()) {
        dom::set_style(element, "transition-delay", &format!("{}ms", delay))?;
    }
    if let Some(duration) = parse_ms(element.get_attribute("data-aos-duration").as_deref()) {
        dom::set_style(element, "transition-duration", &format!("{}ms", duration))?;
    }
    dom::set_class(element, "aos-animate", true)
}

/// Watches one group of elements; without observer support every element is
/// handled on the spot.
fn watch_group(
    selector: &str,
    options: ObserverOptions,
    label: &'static str,
    action: fn(&Element) -> Result<()>,
) -> Result<Option<VisibilityObserver>> {
    let document = dom::document()?;
    let elements = dom::query_all(&document, selector);
    if elements.is_empty() {
        return Ok(None);
    }

    match VisibilityObserver::new(&options) {
        Ok(observer) => {
            for element in &elements {
                observer.register(element, move |el| report(label, action(el)));
            }
            log::debug!("{}: watching {} elements", label, observer.pending());
            Ok(Some(observer))
        }
        Err(EnhanceError::Unsupported(what)) => {
            log::debug!("{}: {} unavailable, handling all elements now", label, what);
            for element in &elements {
                report(label, action(element));
            }
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

pub fn watch_lazy_media(config: &LandingConfig) -> Result<Option<VisibilityObserver>> {
    watch_group(
        LAZY_SELECTOR,
        ObserverOptions {
            root_margin: config.lazy_root_margin.clone(),
            threshold: 0.0,
        },
        "lazy media",
        load_media,
    )
}

pub fn watch_reveals(config: &LandingConfig) -> Result<Option<VisibilityObserver>> {
    watch_group(
        REVEAL_SELECTOR,
        ObserverOptions {
            root_margin: config.reveal_root_margin.clone(),
            threshold: config.reveal_threshold,
        },
        "reveal",
        reveal,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ms_hints() {
        assert_eq!(parse_ms(Some("200")), Some(200));
        assert_eq!(parse_ms(Some(" 600 ")), Some(600));
        assert_eq!(parse_ms(Some("fast")), None);
        assert_eq!(parse_ms(Some("-5")), None);
        assert_eq!(parse_ms(None), None);
    }
}
