use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

use crate::error::{EnhanceError, Result};

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(EnhanceError::NoWindow)
}

pub fn document() -> Result<Document> {
    window()?.document().ok_or(EnhanceError::NoDocument)
}

/// First match for `selector`, or `None` when nothing (or an invalid
/// selector) matches.
pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    document
        .query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

pub fn query_all_in(root: &Element, selector: &str) -> Vec<Element> {
    root.query_selector_all(selector)
        .map(|list| elements(&list))
        .unwrap_or_default()
}

fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_class(element: &Element, class: &str, on: bool) -> Result<()> {
    element.class_list().toggle_with_force(class, on)?;
    Ok(())
}

pub fn has_class(element: &Element, class: &str) -> bool {
    element.class_list().contains(class)
}

pub fn as_html(element: &Element) -> Option<&HtmlElement> {
    element.dyn_ref::<HtmlElement>()
}

pub fn set_style(element: &Element, property: &str, value: &str) -> Result<()> {
    if let Some(html) = as_html(element) {
        html.style().set_property(property, value)?;
    }
    Ok(())
}

pub fn clear_style(element: &Element, property: &str) -> Result<()> {
    if let Some(html) = as_html(element) {
        html.style().remove_property(property)?;
    }
    Ok(())
}

/// Layout height in CSS pixels; zero for non-HTML elements.
pub fn offset_height(element: &Element) -> f64 {
    as_html(element)
        .map(|html| html.offset_height() as f64)
        .unwrap_or(0.0)
}

pub fn scroll_y(window: &Window) -> Result<f64> {
    Ok(window.scroll_y()?)
}

pub fn viewport_height(window: &Window) -> Result<f64> {
    window
        .inner_height()?
        .as_f64()
        .ok_or_else(|| EnhanceError::Js("innerHeight is not a number".to_string()))
}

pub fn smooth_scroll_to(window: &Window, top: f64) {
    let options = web_sys::ScrollToOptions::new();
    options.set_top(top);
    options.set_behavior(web_sys::ScrollBehavior::Smooth);
    window.scroll_to_with_scroll_to_options(&options);
}
