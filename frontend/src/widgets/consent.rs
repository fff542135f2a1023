use gloo_events::EventListener;
use web_sys::Element;

use crate::dom;
use crate::error::{report, Result};

/// Dismisses the cookie banner for the current page view.
pub struct ConsentBanner {
    _listener: EventListener,
}

impl ConsentBanner {
    pub fn install() -> Result<Option<Self>> {
        let document = dom::document()?;
        let Some(banner) = dom::query(&document, ".cookie-banner") else {
            return Ok(None);
        };
        let Some(accept) = dom::query_all_in(&banner, ".cookie-accept").into_iter().next() else {
            return Ok(None);
        };

        let listener = EventListener::new(&accept, "click", move |_| {
            report("cookie banner", dismiss(&banner));
        });
        Ok(Some(Self {
            _listener: listener,
        }))
    }
}

fn dismiss(banner: &Element) -> Result<()> {
    dom::set_class(banner, "is-hidden", true)?;
    banner.set_attribute("aria-hidden", "true")?;
    Ok(())
}
