use std::cell::Cell;
use std::rc::Rc;

use gloo_events::EventListener;
use web_sys::Element;

use crate::dom;
use crate::error::{report, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLook {
    Resting,
    Hovered,
    Dimmed,
}

/// How card `index` should look while `hovered` is under the pointer.
pub fn card_look(index: usize, hovered: Option<usize>) -> CardLook {
    match hovered {
        None => CardLook::Resting,
        Some(h) if h == index => CardLook::Hovered,
        Some(_) => CardLook::Dimmed,
    }
}

struct Cards {
    cards: Vec<Element>,
    hovered: Cell<Option<usize>>,
}

impl Cards {
    fn set_hovered(&self, hovered: Option<usize>) -> Result<()> {
        if self.hovered.replace(hovered) == hovered {
            return Ok(());
        }
        for (i, card) in self.cards.iter().enumerate() {
            let look = card_look(i, hovered);
            dom::set_class(card, "is-hovered", look == CardLook::Hovered)?;
            dom::set_class(card, "is-dimmed", look == CardLook::Dimmed)?;
        }
        Ok(())
    }
}

pub struct PricingHover {
    _listeners: Vec<EventListener>,
}

impl PricingHover {
    pub fn install() -> Result<Option<Self>> {
        let document = dom::document()?;
        let cards = dom::query_all(&document, ".pricing-card");
        if cards.is_empty() {
            return Ok(None);
        }
        let cards = Rc::new(Cards {
            cards,
            hovered: Cell::new(None),
        });

        let mut listeners = Vec::new();
        for (index, card) in cards.cards.iter().enumerate() {
            for event in ["mouseenter", "focusin"] {
                let c = Rc::clone(&cards);
                listeners.push(EventListener::new(card, event, move |_| {
                    report("pricing hover", c.set_hovered(Some(index)));
                }));
            }
            for event in ["mouseleave", "focusout"] {
                let c = Rc::clone(&cards);
                listeners.push(EventListener::new(card, event, move |_| {
                    report("pricing hover", c.set_hovered(None));
                }));
            }
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
    fn hovered_card_dims_siblings() {
        assert_eq!(card_look(1, Some(1)), CardLook::Hovered);
        assert_eq!(card_look(0, Some(1)), CardLook::Dimmed);
        assert_eq!(card_look(2, Some(1)), CardLook::Dimmed);
    }

    #[test]
    fn nothing_hovered_rests_all() {
        assert!((0..3).all(|i| card_look(i, None) == CardLook::Resting));
    }
}
