use log::debug;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{Date, Math};
use web_sys::{Document, Element, HtmlElement, Window};

use crate::error::{Result, SiteError};

/// Anything carrying a set of marker classes.
pub trait ClassTarget {
    fn has_class(&self, class: &str) -> bool;
    fn set_class(&self, class: &str, present: bool);

    /// Flips `class` and returns whether it is now present.
    fn toggle_class(&self, class: &str) -> bool {
        let present = !self.has_class(class);
        self.set_class(class, present);
        present
    }
}

impl ClassTarget for Element {
    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn set_class(&self, class: &str, present: bool) {
        if let Err(e) = self.class_list().toggle_with_force(class, present) {
            debug!("Failed to set class {:?}: {:?}", class, e);
        }
    }
}

pub fn window() -> Result<Window> {
    web_sys::window().ok_or(SiteError::Unavailable("window"))
}

pub fn document() -> Result<Document> {
    window()?
        .document()
        .ok_or(SiteError::Unavailable("document"))
}

pub fn body(document: &Document) -> Result<HtmlElement> {
    document.body().ok_or(SiteError::Unavailable("document.body"))
}

/// First element matching `selector`, or `MissingElement`.
pub fn query(document: &Document, selector: &str) -> Result<Element> {
    document
        .query_selector(selector)?
        .ok_or_else(|| SiteError::missing(selector))
}

pub fn query_all(document: &Document, selector: &str) -> Result<Vec<Element>> {
    let nodes = document.query_selector_all(selector)?;
    Ok((0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Like `query_all`, but an empty match is reported as `MissingElement`.
pub fn query_some(document: &Document, selector: &str) -> Result<Vec<Element>> {
    let elements = query_all(document, selector)?;
    if elements.is_empty() {
        return Err(SiteError::missing(selector));
    }
    Ok(elements)
}

/// Inner viewport size in CSS pixels.
pub fn viewport_size(window: &Window) -> (f64, f64) {
    let width = window
        .inner_width()
        .ok()
        .and_then(|w| w.as_f64())
        .unwrap_or(0.0);
    let height = window
        .inner_height()
        .ok()
        .and_then(|h| h.as_f64())
        .unwrap_or(0.0);
    (width, height)
}

/// Seed for the non-cryptographic RNGs driving the decorative effects.
pub fn entropy_seed() -> u64 {
    let noise = (Math::random() * f64::from(u32::MAX)) as u64;
    (noise << 32) ^ Date::now() as u64
}

pub fn set_style(element: &Element, property: &str, value: &str) {
    if let Some(html) = element.dyn_ref::<HtmlElement>() {
        if let Err(e) = html.style().set_property(property, value) {
            debug!("Failed to set {} to {:?}: {:?}", property, value, e);
        }
    }
}
