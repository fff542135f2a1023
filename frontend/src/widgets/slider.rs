use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo_events::EventListener;
use gloo_timers::callback::Interval;
use web_sys::{Document, Element};

use crate::dom;
use crate::error::{report, Result};

/// Cyclic position over a fixed number of slides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlideCursor {
    index: usize,
    count: usize,
}

impl SlideCursor {
    pub fn new(count: usize) -> Self {
        Self {
            index: 0,
            count: count.max(1),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn advance(&mut self) -> usize {
        self.index = (self.index + 1) % self.count;
        self.index
    }

    pub fn retreat(&mut self) -> usize {
        self.index = (self.index + self.count - 1) % self.count;
        self.index
    }

    /// Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index < self.count {
            self.index = index;
            true
        } else {
            false
        }
    }
}

/// Autoplay runs only while the pointer is off the slider and the page is
/// visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Autoplay {
    pub hovered: bool,
    pub page_hidden: bool,
}

impl Autoplay {
    pub fn should_run(&self) -> bool {
        !self.hovered && !self.page_hidden
    }
}

struct Slider {
    document: Document,
    slides: Vec<Element>,
    dots: Vec<Element>,
    cursor: RefCell<SlideCursor>,
    autoplay: RefCell<Autoplay>,
    timer: RefCell<Option<Interval>>,
    interval_ms: u32,
}

impl Slider {
    fn show(&self) -> Result<()> {
        let active = self.cursor.borrow().index();
        for (i, slide) in self.slides.iter().enumerate() {
            dom::set_class(slide, "active", i == active)?;
            slide.set_attribute("aria-hidden", if i == active { "false" } else { "true" })?;
        }
        for dot in &self.dots {
            let target = dot
                .get_attribute("data-slide")
                .and_then(|raw| raw.parse::<usize>().ok());
            dom::set_class(dot, "active", target == Some(active))?;
        }
        Ok(())
    }

    fn step(&self, movement: impl FnOnce(&mut SlideCursor)) -> Result<()> {
        movement(&mut *self.cursor.borrow_mut());
        self.show()
    }

    /// Clears any live timer before deciding whether to start a new one.
    fn restart_timer(self: &Rc<Self>) {
        self.timer.borrow_mut().take();
        if self.slides.len() < 2 || !self.autoplay.borrow().should_run() {
            return;
        }
        let weak: Weak<Self> = Rc::downgrade(self);
        let interval = Interval::new(self.interval_ms, move || {
            if let Some(slider) = weak.upgrade() {
                report("hero slider", slider.step(|c| {
                    c.advance();
                }));
            }
        });
        *self.timer.borrow_mut() = Some(interval);
    }

    fn update_autoplay(self: &Rc<Self>, change: impl FnOnce(&mut Autoplay)) {
        change(&mut *self.autoplay.borrow_mut());
        self.restart_timer();
    }
}

pub struct HeroSlider {
    slider: Rc<Slider>,
    _listeners: Vec<EventListener>,
}

impl HeroSlider {
    pub fn install(interval_ms: u32) -> Result<Option<Self>> {
        let document = dom::document()?;
        let Some(root) = dom::query(&document, ".hero-slider") else {
            return Ok(None);
        };
        let slides = dom::query_all_in(&root, ".hero-slide");
        if slides.is_empty() {
            return Ok(None);
        }

        let slider = Rc::new(Slider {
            cursor: RefCell::new(SlideCursor::new(slides.len())),
            dots: dom::query_all_in(&root, ".slider-dot[data-slide]"),
            slides,
            document: document.clone(),
            autoplay: RefCell::new(Autoplay {
                hovered: false,
                page_hidden: document.hidden(),
            }),
            timer: RefCell::new(None),
            interval_ms,
        });
        slider.show()?;

        let mut listeners = Vec::new();
        if slider.slides.len() >= 2 {
            let s = Rc::clone(&slider);
            listeners.push(EventListener::new(&root, "mouseenter", move |_| {
                s.update_autoplay(|a| a.hovered = true);
            }));
            let s = Rc::clone(&slider);
            listeners.push(EventListener::new(&root, "mouseleave", move |_| {
                s.update_autoplay(|a| a.hovered = false);
            }));
            let s = Rc::clone(&slider);
            listeners.push(EventListener::new(&document, "visibilitychange", move |_| {
                let hidden = s.document.hidden();
                s.update_autoplay(|a| a.page_hidden = hidden);
            }));

            if let Some(prev) = dom::query_all_in(&root, ".slider-prev").into_iter().next() {
                let s = Rc::clone(&slider);
                listeners.push(EventListener::new(&prev, "click", move |_| {
                    report("hero slider", s.step(|c| {
                        c.retreat();
                    }));
                    s.restart_timer();
                }));
            }
            if let Some(next) = dom::query_all_in(&root, ".slider-next").into_iter().next() {
                let s = Rc::clone(&slider);
                listeners.push(EventListener::new(&next, "click", move |_| {
                    report("hero slider", s.step(|c| {
                        c.advance();
                    }));
                    s.restart_timer();
                }));
            }
            for dot in &slider.dots {
                let Some(target) = dot
                    .get_attribute("data-slide")
                    .and_then(|raw| raw.parse::<usize>().ok())
                else {
                    continue;
                };
                let s = Rc::clone(&slider);
                listeners.push(EventListener::new(dot, "click", move |_| {
                    report("hero slider", s.step(|c| {
                        c.go_to(target);
                    }));
                    s.restart_timer();
                }));
            }

            slider.restart_timer();
        }

        Ok(Some(Self {
            slider,
            _listeners: listeners,
        }))
    }
}

impl Drop for HeroSlider {
    fn drop(&mut self) {
        self.slider.timer.borrow_mut().take();
    }
}
