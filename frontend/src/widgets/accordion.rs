use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use web_sys::{Element, KeyboardEvent};

use crate::dom;
use crate::error::{report, Result};

/// Single-open group: opening one item closes the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccordionGroup {
    len: usize,
    open: Option<usize>,
}

impl AccordionGroup {
    pub fn new(len: usize, open: Option<usize>) -> Self {
        Self {
            len,
            open: open.filter(|i| *i < len),
        }
    }

    pub fn open(&self) -> Option<usize> {
        self.open
    }

    pub fn is_open(&self, index: usize) -> bool {
        self.open == Some(index)
    }

    pub fn toggle(&mut self, index: usize) -> Option<usize> {
        if index >= self.len {
            return self.open;
        }
        self.open = if self.open == Some(index) { None } else { Some(index) };
        self.open
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelHeight {
    /// Inline `max-height` set to the content's natural height.
    Expanded(String),
    /// Inline `max-height` removed; the stylesheet collapses the panel.
    Cleared,
}

pub fn panel_height(open: bool, natural_height: i32) -> PanelHeight {
    if open {
        PanelHeight::Expanded(format!("{}px", natural_height))
    } else {
        PanelHeight::Cleared
    }
}

pub fn is_activation_key(key: &str) -> bool {
    matches!(key, "Enter" | " " | "Spacebar")
}

struct Item {
    root: Element,
    header: Element,
    panel: Option<Element>,
}

struct Accordion {
    items: Vec<Item>,
    group: RefCell<AccordionGroup>,
}

impl Accordion {
    fn toggle(&self, index: usize) -> Result<()> {
        self.group.borrow_mut().toggle(index);
        self.render()
    }

    fn render(&self) -> Result<()> {
        let group = self.group.borrow();
        for (i, item) in self.items.iter().enumerate() {
            let open = group.is_open(i);
            dom::set_class(&item.root, "active", open)?;
            item.header
                .set_attribute("aria-expanded", if open { "true" } else { "false" })?;
            if let Some(panel) = &item.panel {
                match panel_height(open, panel.scroll_height()) {
                    PanelHeight::Expanded(px) => dom::set_style(panel, "max-height", &px)?,
                    PanelHeight::Cleared => dom::clear_style(panel, "max-height")?,
                }
            }
        }
        Ok(())
    }
}

pub struct AccordionController {
    _listeners: Vec<EventListener>,
}

impl AccordionController {
    pub fn install() -> Result<Option<Self>> {
        let document = dom::document()?;
        let items: Vec<Item> = dom::query_all(&document, ".accordion-item")
            .into_iter()
            .filter_map(|root| {
                let header = dom::query_all_in(&root, ".accordion-header").into_iter().next()?;
                let panel = dom::query_all_in(&root, ".accordion-content").into_iter().next();
                Some(Item { root, header, panel })
            })
            .collect();
        if items.is_empty() {
            return Ok(None);
        }

        let initially_open = items.iter().position(|item| dom::has_class(&item.root, "active"));
        let accordion = Rc::new(Accordion {
            group: RefCell::new(AccordionGroup::new(items.len(), initially_open)),
            items,
        });
        accordion.render()?;

        let mut listeners = Vec::new();
        for (index, item) in accordion.items.iter().enumerate() {
            let on_click = Rc::clone(&accordion);
            listeners.push(EventListener::new(&item.header, "click", move |_| {
                report("accordion", on_click.toggle(index));
            }));

            let on_key = Rc::clone(&accordion);
            listeners.push(EventListener::new_with_options(
                &item.header,
                "keydown",
                EventListenerOptions::enable_prevent_default(),
                move |event| {
                    let Some(key_event) = event.dyn_ref::<KeyboardEvent>() else {
                        return;
                    };
                    if is_activation_key(&key_event.key()) {
                        event.prevent_default();
                        report("accordion", on_key.toggle(index));
                    }
                },
            ));
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
    fn opening_b_closes_a() {
        let mut group = AccordionGroup::new(3, None);
        group.toggle(0);
        assert_eq!(group.toggle(1), Some(1));
        assert!(!group.is_open(0));
        assert_eq!((0..3).filter(|i| group.is_open(*i)).count(), 1);
    }

    #[test]
    fn switching_items_clears_the_previous_panel() {
        let mut group = AccordionGroup::new(2, None);
        group.toggle(0);
        group.toggle(1);
        let heights = [120, 340];
        let plan: Vec<PanelHeight> = (0..2)
            .map(|i| panel_height(group.is_open(i), heights[i]))
            .collect();
        assert_eq!(
            plan,
            vec![PanelHeight::Cleared, PanelHeight::Expanded("340px".to_string())]
        );
    }

    #[test]
    fn toggling_open_item_closes_it() {
        let mut group = AccordionGroup::new(2, Some(1));
        assert_eq!(group.toggle(1), None);
        assert_eq!(group.open(), None);
    }

    #[test]
    fn out_of_range_toggle_is_ignored() {
        let mut group = AccordionGroup::new(2, Some(0));
        assert_eq!(group.toggle(5), Some(0));
        assert_eq!(AccordionGroup::new(2, Some(9)).open(), None);
    }

    #[test]
    fn enter_and_space_activate() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
    }
}
