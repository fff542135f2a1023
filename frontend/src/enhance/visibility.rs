//! One-shot viewport visibility detection on top of `IntersectionObserver`.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{Array, Reflect};
use web_sys::{Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom;
use crate::error::{EnhanceError, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub root_margin: String,
    pub threshold: f64,
}

/// An entry only counts once the platform reports it intersecting at or above
/// the group's threshold.
pub fn has_crossed(is_intersecting: bool, ratio: f64, threshold: f64) -> bool {
    is_intersecting && ratio >= threshold
}

/// Registration bookkeeping, independent of the browser primitive. Settled
/// targets leave `pending` (handler included) and are only remembered so a
/// later `register` stays a no-op.
pub struct WatchSet<T, H> {
    pending: Vec<(T, H)>,
    settled: Vec<T>,
}

impl<T: PartialEq, H> Default for WatchSet<T, H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialEq, H> WatchSet<T, H> {
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
            settled: Vec::new(),
        }
    }

    /// Adds `target` to the set. Returns false (and drops `on_visible`) when
    /// the target is already watched or has already settled.
    pub fn register(&mut self, target: T, on_visible: H) -> bool {
        if self.is_settled(&target) || self.pending.iter().any(|(t, _)| *t == target) {
            return false;
        }
        self.pending.push((target, on_visible));
        true
    }

    /// Moves `target` out of the watch set and hands back its handler,
    /// exactly once.
    pub fn settle(&mut self, target: &T) -> Option<H> {
        let index = self.pending.iter().position(|(t, _)| t == target)?;
        let (target, handler) = self.pending.swap_remove(index);
        self.settled.push(target);
        Some(handler)
    }

    pub fn is_settled(&self, target: &T) -> bool {
        self.settled.iter().any(|t| t == target)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}

type Handler = Box<dyn FnOnce(&Element)>;
type EntriesCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

pub struct VisibilityObserver {
    observer: IntersectionObserver,
    watched: Rc<RefCell<WatchSet<Element, Handler>>>,
    _callback: EntriesCallback,
}

impl VisibilityObserver {
    /// Fails with `Unsupported` when the browser has no IntersectionObserver;
    /// callers then treat their elements as visible right away.
    pub fn new(options: &ObserverOptions) -> Result<Self> {
        let window = dom::window()?;
        let supported = Reflect::has(&window, &JsValue::from_str("IntersectionObserver"))
            .unwrap_or(false);
        if !supported {
            return Err(EnhanceError::Unsupported("IntersectionObserver"));
        }

        let watched: Rc<RefCell<WatchSet<Element, Handler>>> =
            Rc::new(RefCell::new(WatchSet::new()));
        let threshold = options.threshold;

        let callback = {
            let watched = Rc::clone(&watched);
            Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
                let mut ready = Vec::new();
                {
                    let mut set = watched.borrow_mut();
                    for entry in entries.iter() {
                        let entry: IntersectionObserverEntry = entry.unchecked_into();
                        if !has_crossed(entry.is_intersecting(), entry.intersection_ratio(), threshold) {
                            continue;
                        }
                        let target = entry.target();
                        if let Some(handler) = set.settle(&target) {
                            observer.unobserve(&target);
                            ready.push((target, handler));
                        }
                    }
                }
                // Handlers run with the set released so they may register more
                // elements.
                for (target, handler) in ready {
                    handler(&target);
                }
            }) as Box<dyn FnMut(Array, IntersectionObserver)>)
        };

        let init = IntersectionObserverInit::new();
        init.set_root_margin(&options.root_margin);
        init.set_threshold(&JsValue::from_f64(options.threshold));
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        Ok(Self {
            observer,
            watched,
            _callback: callback,
        })
    }

    pub fn register<F>(&self, element: &Element, on_visible: F)
    where
        F: FnOnce(&Element) + 'static,
    {
        let added = self
            .watched
            .borrow_mut()
            .register(element.clone(), Box::new(on_visible));
        if added {
            self.observer.observe(element);
        }
    }

    pub fn pending(&self) -> usize {
        self.watched.borrow().pending()
    }
}

impl Drop for VisibilityObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_is_released_once() {
        let mut set: WatchSet<&str, u32> = WatchSet::new();
        assert!(set.register("hero-img", 7));
        assert_eq!(set.settle(&"hero-img"), Some(7));
        assert_eq!(set.settle(&"hero-img"), None);
        assert!(set.is_settled(&"hero-img"));
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut set: WatchSet<&str, u32> = WatchSet::new();
        assert!(set.register("card", 1));
        assert!(!set.register("card", 2));
        assert_eq!(set.pending(), 1);
        assert_eq!(set.settle(&"card"), Some(1));
    }

    #[test]
    fn settled_target_cannot_be_rewatched() {
        let mut set: WatchSet<&str, u32> = WatchSet::new();
        set.register("card", 1);
        set.settle(&"card");
        assert!(!set.register("card", 3));
        assert_eq!(set.settle(&"card"), None);
        assert_eq!(set.pending(), 0);
    }

    #[test]
    fn unsettled_targets_stay_watched() {
        let mut set: WatchSet<&str, u32> = WatchSet::new();
        set.register("a", 1);
        set.register("b", 2);
        set.settle(&"a");
        assert_eq!(set.pending(), 1);
        assert!(!set.is_settled(&"b"));
    }

    #[test]
    fn settling_shrinks_the_watch_set() {
        let mut set: WatchSet<u32, &str> = WatchSet::new();
        for id in 0..5 {
            set.register(id, "load");
        }
        for id in [4, 0, 2] {
            assert_eq!(set.settle(&id), Some("load"));
        }
        assert_eq!(set.pending(), 2);
        assert!(set.is_settled(&0));
        assert_eq!(set.settle(&1), Some("load"));
        assert_eq!(set.settle(&3), Some("load"));
        assert_eq!(set.pending(), 0);
    }

    #[test]
    fn unknown_target_settles_nothing() {
        let mut set: WatchSet<&str, u32> = WatchSet::new();
        assert_eq!(set.settle(&"ghost"), None);
    }

    #[test]
    fn threshold_must_be_reached() {
        assert!(!has_crossed(false, 0.0, 0.0));
        assert!(!has_crossed(true, 0.05, 0.1));
        assert!(has_crossed(true, 0.1, 0.1));
        assert!(has_crossed(true, 0.0, 0.0));
    }
}
