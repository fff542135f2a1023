use gloo_events::{EventListener, EventListenerOptions};
use web_sys::Window;

use crate::dom;
use crate::enhance::mobile_nav;
use crate::error::{report, Result};

/// Target id of an in-page anchor; bare `#` has none.
pub fn anchor_target(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|id| !id.is_empty())
}

/// Document offset to scroll to so the target clears the fixed header.
pub fn scroll_destination(target_top_in_viewport: f64, scroll_y: f64, header_height: f64) -> f64 {
    (target_top_in_viewport + scroll_y - header_height).max(0.0)
}

pub struct SmoothAnchors {
    _listeners: Vec<EventListener>,
}

impl SmoothAnchors {
    pub fn install() -> Result<Option<Self>> {
        let window = dom::window()?;
        let document = dom::document()?;
        let anchors = dom::query_all(&document, "a[href^='#']");
        if anchors.is_empty() {
            return Ok(None);
        }

        let listeners = anchors
            .into_iter()
            .map(|anchor| {
                let window = window.clone();
                let href = anchor.get_attribute("href").unwrap_or_default();
                EventListener::new_with_options(
                    &anchor,
                    "click",
                    EventListenerOptions::enable_prevent_default(),
                    move |event| {
                        let Some(id) = anchor_target(&href) else {
                            return;
                        };
                        match jump_to(&window, id) {
                            Ok(true) => event.prevent_default(),
                            Ok(false) => {}
                            Err(e) => report("smooth anchors", Err(e)),
                        }
                    },
                )
            })
            .collect();

        Ok(Some(Self {
            _listeners: listeners,
        }))
    }
}

/// Returns false when the id is not on the page, leaving the browser's
/// default navigation in place.
fn jump_to(window: &Window, id: &str) -> Result<bool> {
    let document = dom::document()?;
    let Some(target) = document.get_element_by_id(id) else {
        return Ok(false);
    };
    let header_height = dom::query(&document, "#header")
        .map(|header| dom::offset_height(&header))
        .unwrap_or(0.0);
    let top = scroll_destination(
        target.get_bounding_client_rect().top(),
        dom::scroll_y(window)?,
        header_height,
    );
    dom::smooth_scroll_to(window, top);
    mobile_nav::close(&document)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_hash_has_no_target() {
        assert_eq!(anchor_target("#"), None);
        assert_eq!(anchor_target("#faq"), Some("faq"));
        assert_eq!(anchor_target("/privacy"), None);
    }

    #[test]
    fn destination_clears_header_and_never_goes_negative() {
        assert_eq!(scroll_destination(400.0, 1000.0, 80.0), 1320.0);
        assert_eq!(scroll_destination(20.0, 0.0, 80.0), 0.0);
    }
}
