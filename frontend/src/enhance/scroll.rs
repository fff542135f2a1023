//! Scroll-driven header, back-to-top and nav-link state, applied once per
//! animation frame from a single scroll sample.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use web_sys::{Document, Element, Window};

use crate::config::ScrollConfig;
use crate::dom;
use crate::enhance::frame::FrameBatcher;
use crate::enhance::mobile_nav;
use crate::error::{EnhanceError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollSample {
    pub vertical_offset: f64,
    pub timestamp: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionBox {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

/// Layout reads taken in the same frame as the sample.
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    pub header_height: f64,
    pub nav_open: bool,
    pub sections: Vec<SectionBox>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ScrollDerivedState {
    pub is_past_threshold: bool,
    pub is_scrolling_down: bool,
    pub header_hidden: bool,
    pub back_to_top_visible: bool,
    pub active_section_id: Option<String>,
}

pub struct ScrollTracker {
    config: ScrollConfig,
    previous_offset: f64,
    state: ScrollDerivedState,
}

impl ScrollTracker {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config,
            previous_offset: 0.0,
            state: ScrollDerivedState::default(),
        }
    }

    pub fn advance(&mut self, sample: ScrollSample, layout: &PageLayout) -> &ScrollDerivedState {
        let offset = sample.vertical_offset;
        log::trace!("scroll sample at {:.1}ms: offset {}", sample.timestamp, offset);
        let is_scrolling_down = offset > self.previous_offset;

        let header_hidden = if layout.nav_open {
            false
        } else {
            is_scrolling_down && offset > layout.header_height
        };

        let probe = offset + self.config.section_offset;
        let active = layout
            .sections
            .iter()
            .filter(|s| probe >= s.top && probe < s.top + s.height)
            .last()
            .map(|s| s.id.clone());

        self.state = ScrollDerivedState {
            is_past_threshold: offset > self.config.scrolled_threshold,
            is_scrolling_down,
            header_hidden,
            back_to_top_visible: offset > self.config.back_to_top_threshold,
            // No match leaves the last active section in place.
            active_section_id: active.or_else(|| self.state.active_section_id.take()),
        };
        self.previous_offset = offset.max(0.0);
        &self.state
    }
}

/// Whether a nav link's `href` points at the section `id`.
pub fn link_targets(href: &str, id: &str) -> bool {
    href.strip_prefix('#').map_or(false, |target| target == id)
}

struct Targets {
    window: Window,
    document: Document,
    header: Option<Element>,
    back_to_top: Option<Element>,
}

impl Targets {
    fn layout(&self) -> PageLayout {
        let sections = dom::query_all(&self.document, "section[id]")
            .iter()
            .filter_map(|section| {
                let html = dom::as_html(section)?;
                Some(SectionBox {
                    id: section.id(),
                    top: html.offset_top() as f64,
                    height: html.offset_height() as f64,
                })
            })
            .collect();

        PageLayout {
            header_height: self.header.as_ref().map(dom::offset_height).unwrap_or(0.0),
            nav_open: mobile_nav::is_open(&self.document),
            sections,
        }
    }

    fn element(&self, target: ProjectionTarget, links: &[Element]) -> Option<Element> {
        match target {
            ProjectionTarget::BackToTop => self.back_to_top.clone(),
            ProjectionTarget::NavLink(i) => links.get(i).cloned(),
            ProjectionTarget::Header => self.header.clone(),
        }
    }

    /// Applies every write in the plan; the first failure is reported after
    /// the rest have still been attempted.
    fn apply(&self, state: &ScrollDerivedState) -> Result<()> {
        let links = dom::query_all(&self.document, ".nav-link");
        let hrefs: Vec<String> = links
            .iter()
            .map(|link| link.get_attribute("href").unwrap_or_default())
            .collect();
        let plan = projection(
            state,
            self.back_to_top.is_some(),
            &hrefs,
            self.header.is_some(),
        );

        let mut failure = None;
        for change in plan {
            let Some(element) = self.element(change.target, &links) else {
                continue;
            };
            let outcome = if element.is_connected() {
                dom::set_class(&element, change.class, change.on)
            } else {
                Err(EnhanceError::Detached(change.target.selector().to_string()))
            };
            if let Err(e) = outcome {
                failure.get_or_insert(e);
            }
        }
        failure.map_or(Ok(()), Err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectionTarget {
    BackToTop,
    NavLink(usize),
    Header,
}

impl ProjectionTarget {
    fn selector(&self) -> &'static str {
        match self {
            ProjectionTarget::BackToTop => "#back-to-top",
            ProjectionTarget::NavLink(_) => ".nav-link",
            ProjectionTarget::Header => "#header",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassChange {
    pub target: ProjectionTarget,
    pub class: &'static str,
    pub on: bool,
}

/// Class writes implied by `state`, header last. Nav links are only touched
/// once some section is active.
pub fn projection(
    state: &ScrollDerivedState,
    has_back_to_top: bool,
    link_hrefs: &[String],
    has_header: bool,
) -> Vec<ClassChange> {
    let mut plan = Vec::new();
    if has_back_to_top {
        plan.push(ClassChange {
            target: ProjectionTarget::BackToTop,
            class: "visible",
            on: state.back_to_top_visible,
        });
    }
    if let Some(id) = &state.active_section_id {
        plan.extend(link_hrefs.iter().enumerate().map(|(i, href)| ClassChange {
            target: ProjectionTarget::NavLink(i),
            class: "active",
            on: link_targets(href, id),
        }));
    }
    if has_header {
        plan.push(ClassChange {
            target: ProjectionTarget::Header,
            class: "scrolled",
            on: state.is_past_threshold,
        });
        plan.push(ClassChange {
            target: ProjectionTarget::Header,
            class: "header-hidden",
            on: state.header_hidden,
        });
    }
    plan
}

/// The coordinator has something to drive when any of its targets exist.
pub fn has_targets(header: bool, back_to_top: bool, nav_links: usize) -> bool {
    header || back_to_top || nav_links > 0
}

pub struct ScrollCoordinator {
    _batcher: Rc<FrameBatcher>,
    _listeners: Vec<EventListener>,
}

impl ScrollCoordinator {
    pub fn install(config: &ScrollConfig) -> Result<Option<Self>> {
        let window = dom::window()?;
        let document = dom::document()?;
        let targets = Targets {
            header: dom::query(&document, "#header"),
            back_to_top: dom::query(&document, "#back-to-top"),
            window: window.clone(),
            document,
        };
        let nav_links = dom::query_all(&targets.document, ".nav-link").len();
        if !has_targets(targets.header.is_some(), targets.back_to_top.is_some(), nav_links) {
            return Ok(None);
        }

        let tracker = RefCell::new(ScrollTracker::new(config.clone()));
        let batcher = Rc::new(FrameBatcher::new("scroll coordinator", move |timestamp| {
            let sample = ScrollSample {
                vertical_offset: dom::scroll_y(&targets.window)?,
                timestamp,
            };
            let layout = targets.layout();
            let mut tracker = tracker.borrow_mut();
            let state = tracker.advance(sample, &layout);
            targets.apply(state)
        }));

        let listeners = ["scroll", "resize"]
            .iter()
            .map(|event| {
                let batcher = Rc::clone(&batcher);
                EventListener::new(&window, *event, move |_| batcher.request())
            })
            .collect();

        // Page may load already scrolled.
        batcher.run_now();

        Ok(Some(Self {
            _batcher: batcher,
            _listeners: listeners,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(offset: f64) -> ScrollSample {
        ScrollSample {
            vertical_offset: offset,
            timestamp: 0.0,
        }
    }

    fn layout(header_height: f64, nav_open: bool) -> PageLayout {
        PageLayout {
            header_height,
            nav_open,
            sections: vec![
                SectionBox { id: "home".into(), top: 0.0, height: 800.0 },
                SectionBox { id: "pricing".into(), top: 800.0, height: 600.0 },
                SectionBox { id: "faq".into(), top: 1400.0, height: 400.0 },
            ],
        }
    }

    fn tracker() -> ScrollTracker {
        ScrollTracker::new(ScrollConfig::default())
    }

    #[test]
    fn scrolled_state_is_strictly_above_fifty() {
        let mut t = tracker();
        assert!(!t.advance(sample(50.0), &layout(80.0, false)).is_past_threshold);
        assert!(t.advance(sample(51.0), &layout(80.0, false)).is_past_threshold);
    }

    #[test]
    fn back_to_top_boundary() {
        let mut t = tracker();
        assert!(!t.advance(sample(300.0), &layout(80.0, false)).back_to_top_visible);
        assert!(t.advance(sample(301.0), &layout(80.0, false)).back_to_top_visible);
        assert!(!t.advance(sample(12.0), &layout(80.0, false)).back_to_top_visible);
    }

    #[test]
    fn header_hides_only_when_scrolling_down_past_its_height() {
        let mut t = tracker();
        // Down but still within the header's own height.
        assert!(!t.advance(sample(60.0), &layout(80.0, false)).header_hidden);
        // Down and past it.
        let state = t.advance(sample(200.0), &layout(80.0, false));
        assert!(state.is_scrolling_down);
        assert!(state.header_hidden);
        // Up again.
        let state = t.advance(sample(150.0), &layout(80.0, false));
        assert!(!state.is_scrolling_down);
        assert!(!state.header_hidden);
    }

    #[test]
    fn open_mobile_nav_keeps_header_visible() {
        let mut t = tracker();
        for offset in [100.0, 400.0, 900.0, 2000.0] {
            let state = t.advance(sample(offset), &layout(80.0, true));
            assert!(state.is_scrolling_down);
            assert!(!state.header_hidden);
        }
    }

    #[test]
    fn overscroll_is_clamped_to_zero() {
        let mut t = tracker();
        t.advance(sample(-40.0), &layout(0.0, false));
        // From a clamped 0, a move to 10 counts as downward.
        let state = t.advance(sample(10.0), &layout(0.0, false));
        assert!(state.is_scrolling_down);
        assert!(state.header_hidden);
    }

    #[test]
    fn previous_offset_updates_even_when_nav_is_open() {
        let mut t = tracker();
        t.advance(sample(900.0), &layout(80.0, true));
        // Compared against 900, not 0.
        let state = t.advance(sample(500.0), &layout(80.0, false));
        assert!(!state.is_scrolling_down);
        assert!(!state.header_hidden);
    }

    #[test]
    fn active_section_uses_hundred_pixel_probe() {
        let mut t = tracker();
        assert_eq!(
            t.advance(sample(699.0), &layout(80.0, false)).active_section_id.as_deref(),
            Some("home")
        );
        assert_eq!(
            t.advance(sample(700.0), &layout(80.0, false)).active_section_id.as_deref(),
            Some("pricing")
        );
        assert_eq!(
            t.advance(sample(1300.0), &layout(80.0, false)).active_section_id.as_deref(),
            Some("faq")
        );
    }

    #[test]
    fn no_matching_section_keeps_previous_active() {
        let mut t = tracker();
        t.advance(sample(1300.0), &layout(80.0, false));
        // Beyond the last section's bottom edge.
        let state = t.advance(sample(5000.0), &layout(80.0, false));
        assert_eq!(state.active_section_id.as_deref(), Some("faq"));
    }

    #[test]
    fn nothing_active_before_any_match() {
        let mut t = tracker();
        let empty = PageLayout::default();
        assert_eq!(t.advance(sample(0.0), &empty).active_section_id, None);
    }

    fn hrefs() -> Vec<String> {
        ["#home", "#pricing", "#faq", "/privacy"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    #[test]
    fn exactly_one_nav_link_goes_active() {
        let mut t = tracker();
        let state = t.advance(sample(900.0), &layout(80.0, false)).clone();
        let plan = projection(&state, true, &hrefs(), true);
        let active: Vec<_> = plan
            .iter()
            .filter(|c| matches!(c.target, ProjectionTarget::NavLink(_)) && c.on)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].target, ProjectionTarget::NavLink(1));
        let links = plan
            .iter()
            .filter(|c| matches!(c.target, ProjectionTarget::NavLink(_)))
            .count();
        assert_eq!(links, 4);
    }

    #[test]
    fn header_writes_come_after_the_rest() {
        let state = ScrollDerivedState {
            active_section_id: Some("faq".into()),
            back_to_top_visible: true,
            ..Default::default()
        };
        let plan = projection(&state, true, &hrefs(), true);
        let first_header = plan
            .iter()
            .position(|c| c.target == ProjectionTarget::Header)
            .unwrap();
        assert!(plan[first_header..]
            .iter()
            .all(|c| c.target == ProjectionTarget::Header));
        assert_eq!(plan[0].target, ProjectionTarget::BackToTop);
        assert!(plan[0].on);
    }

    #[test]
    fn no_active_section_leaves_links_untouched() {
        let plan = projection(&ScrollDerivedState::default(), false, &hrefs(), false);
        assert!(plan.is_empty());
    }

    #[test]
    fn nav_links_alone_are_enough_to_install() {
        assert!(has_targets(false, false, 3));
        assert!(has_targets(true, false, 0));
        assert!(!has_targets(false, false, 0));
    }

    #[test]
    fn link_matching() {
        assert!(link_targets("#pricing", "pricing"));
        assert!(!link_targets("#pricing-table", "pricing"));
        assert!(!link_targets("/privacy", "privacy"));
        assert!(!link_targets("#", "pricing"));
    }
}
