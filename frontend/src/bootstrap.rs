//! Wires every landing-page controller to the page lifecycle. Dropping
//! [`Enhancements`] detaches all of them.

use gloo_events::EventListener;

use crate::config::LandingConfig;
use crate::dom;
use crate::enhance::anchors::SmoothAnchors;
use crate::enhance::lazy;
use crate::enhance::mobile_nav::MobileNav;
use crate::enhance::scroll::ScrollCoordinator;
use crate::enhance::visibility::VisibilityObserver;
use crate::error::Result;
use crate::widgets::accordion::AccordionController;
use crate::widgets::back_to_top::BackToTop;
use crate::widgets::consent::ConsentBanner;
use crate::widgets::countdown::CountdownTimer;
use crate::widgets::outbound;
use crate::widgets::pricing::PricingHover;
use crate::widgets::slider::HeroSlider;

/// Missing markup and failed installs both yield `None`; neither stops the
/// remaining controllers.
fn start<T>(name: &str, installed: Result<Option<T>>) -> Option<T> {
    match installed {
        Ok(Some(controller)) => {
            log::debug!("{} ready", name);
            Some(controller)
        }
        Ok(None) => {
            log::debug!("{}: no markup on this page, skipping", name);
            None
        }
        Err(e) => {
            log::warn!("{} failed to start: {}", name, e);
            None
        }
    }
}

pub struct Enhancements {
    _observers: Vec<VisibilityObserver>,
    _scroll: Option<ScrollCoordinator>,
    _mobile_nav: Option<MobileNav>,
    _anchors: Option<SmoothAnchors>,
    _slider: Option<HeroSlider>,
    _accordion: Option<AccordionController>,
    _pricing: Option<PricingHover>,
    _countdown: Option<CountdownTimer>,
    _back_to_top: Option<BackToTop>,
    _consent: Option<ConsentBanner>,
    _on_load: Option<EventListener>,
}

impl Enhancements {
    /// Runs on content-ready; full-load work is deferred to the window `load`
    /// event unless the document has already finished loading.
    pub fn install() -> Result<Self> {
        let window = dom::window()?;
        let document = dom::document()?;
        let config = LandingConfig::load(&document);

        let observers = [
            start("lazy media", lazy::watch_lazy_media(&config)),
            start("reveal", lazy::watch_reveals(&config)),
        ]
        .into_iter()
        .flatten()
        .collect();

        let back_to_top = start("back-to-top", BackToTop::install(config.back_to_top_padding_px));
        let spacing = back_to_top.as_ref().map(BackToTop::handle);

        let load_config = config.clone();
        let on_full_load = move || {
            match outbound::tag_outbound_links(&load_config) {
                Ok(count) => log::debug!("outbound tagging done ({} links)", count),
                Err(e) => log::warn!("outbound tagging failed: {}", e),
            }
            if let Some(spacing) = &spacing {
                spacing.refresh();
            }
        };

        let on_load = if document.ready_state() == "complete" {
            on_full_load();
            None
        } else {
            Some(EventListener::once(&window, "load", move |_| on_full_load()))
        };

        let enhancements = Self {
            _observers: observers,
            _scroll: start("scroll coordinator", ScrollCoordinator::install(&config.scroll)),
            _mobile_nav: start("mobile nav", MobileNav::install()),
            _anchors: start("smooth anchors", SmoothAnchors::install()),
            _slider: start("hero slider", HeroSlider::install(config.slider_interval_ms)),
            _accordion: start("accordion", AccordionController::install()),
            _pricing: start("pricing hover", PricingHover::install()),
            _countdown: start("countdown", CountdownTimer::install(&config.countdown)),
            _back_to_top: back_to_top,
            _consent: start("cookie banner", ConsentBanner::install()),
            _on_load: on_load,
        };
        log::info!("Landing enhancements installed");
        Ok(enhancements)
    }
}

impl Drop for Enhancements {
    fn drop(&mut self) {
        log::info!("Landing enhancements removed");
    }
}
