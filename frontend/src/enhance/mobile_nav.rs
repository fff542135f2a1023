use std::rc::Rc;

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, KeyboardEvent};

use crate::dom;
use crate::error::{report, Result};

const OPEN_CLASS: &str = "nav-open";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Toggle,
    Close,
}

pub fn next_open(open: bool, action: NavAction) -> bool {
    match action {
        NavAction::Toggle => !open,
        NavAction::Close => false,
    }
}

/// The overlay state lives on `<body>` so other controllers can read it.
pub fn is_open(document: &Document) -> bool {
    document
        .body()
        .map(|body| dom::has_class(&body, OPEN_CLASS))
        .unwrap_or(false)
}

struct Parts {
    document: Document,
    toggle: Element,
    menu: Option<Element>,
}

impl Parts {
    fn apply(&self, action: NavAction) -> Result<()> {
        let open = next_open(is_open(&self.document), action);
        if let Some(body) = self.document.body() {
            dom::set_class(&body, OPEN_CLASS, open)?;
        }
        if let Some(menu) = &self.menu {
            dom::set_class(menu, "active", open)?;
        }
        self.toggle
            .set_attribute("aria-expanded", if open { "true" } else { "false" })?;
        Ok(())
    }
}

/// Closes the overlay from outside the controller (e.g. after an anchor jump).
pub fn close(document: &Document) -> Result<()> {
    if !is_open(document) {
        return Ok(());
    }
    if let Some(body) = document.body() {
        dom::set_class(&body, OPEN_CLASS, false)?;
    }
    if let Some(menu) = dom::query(document, "#nav-menu") {
        dom::set_class(&menu, "active", false)?;
    }
    if let Some(toggle) = dom::query(document, "#menu-toggle") {
        toggle.set_attribute("aria-expanded", "false")?;
    }
    Ok(())
}

pub struct MobileNav {
    _listeners: Vec<EventListener>,
}

impl MobileNav {
    pub fn install() -> Result<Option<Self>> {
        let document = dom::document()?;
        let Some(toggle) = dom::query(&document, "#menu-toggle") else {
            return Ok(None);
        };
        let parts = Rc::new(Parts {
            menu: dom::query(&document, "#nav-menu"),
            toggle: toggle.clone(),
            document: document.clone(),
        });

        let mut listeners = Vec::new();

        let on_toggle = Rc::clone(&parts);
        listeners.push(EventListener::new(&toggle, "click", move |_| {
            report("mobile nav", on_toggle.apply(NavAction::Toggle));
        }));

        let on_key = Rc::clone(&parts);
        listeners.push(EventListener::new(&document, "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if event.key() == "Escape" && is_open(&on_key.document) {
                report("mobile nav", on_key.apply(NavAction::Close));
            }
        }));

        for link in dom::query_all(&document, ".nav-link") {
            let on_link = Rc::clone(&parts);
            listeners.push(EventListener::new(&link, "click", move |_| {
                report("mobile nav", on_link.apply(NavAction::Close));
            }));
        }

        Ok(Some(Self {
            _listeners: listeners,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_and_close_always_closes() {
        assert!(next_open(false, NavAction::Toggle));
        assert!(!next_open(true, NavAction::Toggle));
        assert!(!next_open(true, NavAction::Close));
        assert!(!next_open(false, NavAction::Close));
    }
}
