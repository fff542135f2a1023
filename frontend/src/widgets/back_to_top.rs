//! Back-to-top button: click scrolls home, and its footprint (plus any
//! bottom banner) is published as `--back-to-top-height` on the root element.

use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MutationObserver, MutationObserverInit, ResizeObserver, Window};

use crate::dom;
use crate::enhance::frame::FrameBatcher;
use crate::error::Result;

pub const HEIGHT_PROPERTY: &str = "--back-to-top-height";
const BANNER_SELECTOR: &str = ".cookie-banner";

/// Vertical extent of a banner in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BannerBox {
    pub top: f64,
    pub bottom: f64,
    pub displayed: bool,
}

/// Space the banner takes out of the bottom of the viewport, if any.
pub fn banner_clearance(banner: Option<BannerBox>, viewport_height: f64) -> f64 {
    match banner {
        Some(b) if b.displayed && b.bottom > b.top && b.top < viewport_height && b.bottom > 0.0 => {
            (viewport_height - b.top).max(0.0)
        }
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationScope {
    pub child_list: bool,
    pub subtree: bool,
}

/// Only the banner arriving or leaving its container matters; text churn
/// deeper in the page (the countdown ticks every second) must not trigger a
/// layout read.
pub const SPACING_MUTATIONS: MutationScope = MutationScope {
    child_list: true,
    subtree: false,
};

/// Node whose direct children are watched: the banner's container when there
/// is a banner, otherwise `<body>`.
pub fn mutation_root<T>(banner_parent: Option<T>, body: Option<T>) -> Option<T> {
    banner_parent.or(body)
}

pub fn spacing_px(button_height: f64, padding: f64, clearance: f64) -> f64 {
    button_height + padding + clearance
}

struct Spacing {
    window: Window,
    document: Document,
    button: Element,
    padding: f64,
}

impl Spacing {
    fn banner(&self) -> Option<BannerBox> {
        let banner = dom::query(&self.document, BANNER_SELECTOR)?;
        let rect = banner.get_bounding_client_rect();
        Some(BannerBox {
            top: rect.top(),
            bottom: rect.bottom(),
            displayed: !dom::has_class(&banner, "is-hidden") && rect.height() > 0.0,
        })
    }

    fn recompute(&self) -> Result<()> {
        let clearance = banner_clearance(self.banner(), dom::viewport_height(&self.window)?);
        let value = spacing_px(dom::offset_height(&self.button), self.padding, clearance);
        if let Some(root) = self.document.document_element() {
            dom::set_style(&root, HEIGHT_PROPERTY, &format!("{}px", value))?;
        }
        Ok(())
    }
}

/// Cloneable trigger for a coalesced recomputation.
#[derive(Clone)]
pub struct SpacingHandle(Rc<FrameBatcher>);

impl SpacingHandle {
    pub fn refresh(&self) {
        self.0.request();
    }
}

pub struct BackToTop {
    batcher: Rc<FrameBatcher>,
    resize_observer: Option<ResizeObserver>,
    mutation_observer: Option<MutationObserver>,
    _observer_callback: Closure<dyn FnMut()>,
    _listeners: Vec<EventListener>,
}

impl BackToTop {
    pub fn install(padding: f64) -> Result<Option<Self>> {
        let window = dom::window()?;
        let document = dom::document()?;
        let Some(button) = dom::query(&document, "#back-to-top") else {
            return Ok(None);
        };

        let spacing = Spacing {
            window: window.clone(),
            document: document.clone(),
            button: button.clone(),
            padding,
        };
        let batcher = Rc::new(FrameBatcher::new("back-to-top spacing", move |_| {
            spacing.recompute()
        }));

        let mut listeners = Vec::new();
        let scroll_window = window.clone();
        listeners.push(EventListener::new(&button, "click", move |_| {
            dom::smooth_scroll_to(&scroll_window, 0.0);
        }));
        let on_resize = Rc::clone(&batcher);
        listeners.push(EventListener::new(&window, "resize", move |_| on_resize.request()));

        let on_observe = Rc::clone(&batcher);
        let observer_callback =
            Closure::wrap(Box::new(move || on_observe.request()) as Box<dyn FnMut()>);

        // Older browsers lack one or both observers; resize and load still refresh.
        let resize_observer = ResizeObserver::new(observer_callback.as_ref().unchecked_ref())
            .ok()
            .map(|observer| {
                observer.observe(&button);
                if let Some(banner) = dom::query(&document, BANNER_SELECTOR) {
                    observer.observe(&banner);
                }
                observer
            });

        let banner_parent = dom::query(&document, BANNER_SELECTOR).and_then(|b| b.parent_element());
        let body: Option<Element> = document.body().map(Into::into);
        let mutation_observer = match (
            MutationObserver::new(observer_callback.as_ref().unchecked_ref()),
            mutation_root(banner_parent, body),
        ) {
            (Ok(observer), Some(root)) => {
                let init = MutationObserverInit::new();
                // Attribute changes on the banner show up as resizes above.
                init.set_child_list(SPACING_MUTATIONS.child_list);
                init.set_subtree(SPACING_MUTATIONS.subtree);
                observer.observe_with_options(&root, &init)?;
                Some(observer)
            }
            _ => None,
        };

        batcher.run_now();

        Ok(Some(Self {
            batcher,
            resize_observer,
            mutation_observer,
            _observer_callback: observer_callback,
            _listeners: listeners,
        }))
    }

    pub fn handle(&self) -> SpacingHandle {
        SpacingHandle(Rc::clone(&self.batcher))
    }
}

impl Drop for BackToTop {
    fn drop(&mut self) {
        if let Some(observer) = self.resize_observer.take() {
            observer.disconnect();
        }
        if let Some(observer) = self.mutation_observer.take() {
            observer.disconnect();
        }
    }
}
