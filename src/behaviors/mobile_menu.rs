use std::rc::Rc;

use gloo_events::EventListener;
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Node};

use crate::config::MenuConfig;
use crate::dom::{self, ClassTarget};
use crate::error::Result;

/// The three markers that together describe whether the menu is open.
pub struct MenuMarkers<T> {
    nav: T,
    button: T,
    body: T,
    nav_class: String,
    button_class: String,
    body_class: String,
}

impl<T: ClassTarget> MenuMarkers<T> {
    pub fn new(nav: T, button: T, body: T, config: &MenuConfig) -> Self {
        Self {
            nav,
            button,
            body,
            nav_class: config.nav_class.clone(),
            button_class: config.button_class.clone(),
            body_class: config.body_class.clone(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.nav.has_class(&self.nav_class)
    }

    pub fn set_open(&self, open: bool) {
        self.nav.set_class(&self.nav_class, open);
        self.button.set_class(&self.button_class, open);
        self.body.set_class(&self.body_class, open);
    }

    pub fn toggle(&self) -> bool {
        let open = !self.is_open();
        self.set_open(open);
        open
    }

    pub fn close(&self) {
        self.set_open(false);
    }
}

/// A document click closes the menu unless it landed on the nav or the button.
pub fn is_outside_click(inside_nav: bool, inside_button: bool) -> bool {
    !inside_nav && !inside_button
}

pub struct MobileMenu {
    _listeners: Vec<EventListener>,
}

impl MobileMenu {
    pub fn attach(document: &Document, config: &MenuConfig) -> Result<Self> {
        let button = dom::query(document, &config.button_selector)?;
        let nav = dom::query(document, &config.nav_selector)?;
        let links = dom::query_all(document, &config.link_selector)?;
        let body: Element = dom::body(document)?.into();

        let markers = Rc::new(MenuMarkers::new(nav.clone(), button.clone(), body, config));
        let mut listeners = Vec::with_capacity(links.len() + 2);

        {
            let markers = markers.clone();
            listeners.push(EventListener::new(&button, "click", move |event| {
                event.stop_propagation();
                let open = markers.toggle();
                debug!("Mobile menu {}", if open { "opened" } else { "closed" });
            }));
        }

        for link in &links {
            let markers = markers.clone();
            listeners.push(EventListener::new(link, "click", move |_| markers.close()));
        }

        {
            let markers = markers.clone();
            listeners.push(EventListener::new(document, "click", move |event| {
                let target = event.target().and_then(|t| t.dyn_into::<Node>().ok());
                let inside_nav = nav.contains(target.as_ref());
                let inside_button = button.contains(target.as_ref());
                if is_outside_click(inside_nav, inside_button) {
                    markers.close();
                }
            }));
        }

        Ok(Self {
            _listeners: listeners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::testing::FakeNode;

    enum Click {
        Button,
        Link,
        Outside,
        Inside,
    }

    fn markers() -> MenuMarkers<FakeNode> {
        MenuMarkers::new(
            FakeNode::default(),
            FakeNode::default(),
            FakeNode::default(),
            &MenuConfig::default(),
        )
    }

    fn apply(menu: &MenuMarkers<FakeNode>, click: &Click) {
        match click {
            Click::Button => {
                menu.toggle();
            }
            Click::Link => menu.close(),
            Click::Outside => {
                if is_outside_click(false, false) {
                    menu.close();
                }
            }
            Click::Inside => {
                if is_outside_click(true, false) {
                    menu.close();
                }
            }
        }
    }

    fn assert_consistent(menu: &MenuMarkers<FakeNode>) {
        let open = menu.nav.has_class("active");
        assert_eq!(menu.button.has_class("open"), open);
        assert_eq!(menu.body.has_class("menu-open"), open);
    }

    #[test]
    fn button_toggles_all_three_markers() {
        let menu = markers();
        assert!(menu.toggle());
        assert!(menu.nav.has_class("active"));
        assert!(menu.button.has_class("open"));
        assert!(menu.body.has_class("menu-open"));

        assert!(!menu.toggle());
        assert_consistent(&menu);
        assert!(!menu.is_open());
    }

    #[test]
    fn close_is_idempotent() {
        let menu = markers();
        menu.close();
        menu.close();
        assert!(!menu.is_open());
        assert_consistent(&menu);
    }

    #[test]
    fn outside_click_detection() {
        assert!(is_outside_click(false, false));
        assert!(!is_outside_click(true, false));
        assert!(!is_outside_click(false, true));
    }

    #[test]
    fn markers_stay_in_sync_across_event_sequences() {
        let sequences = [
            vec![Click::Button, Click::Link, Click::Button],
            vec![Click::Button, Click::Inside, Click::Outside],
            vec![Click::Outside, Click::Button, Click::Button, Click::Button],
            vec![Click::Link, Click::Link, Click::Button, Click::Inside],
        ];

        for sequence in &sequences {
            let menu = markers();
            for click in sequence {
                apply(&menu, click);
                assert_consistent(&menu);
            }
        }
    }

    #[test]
    fn toggle_repairs_partially_marked_state() {
        let menu = markers();
        menu.body.set_class("menu-open", true);

        assert!(menu.toggle());
        assert_consistent(&menu);
    }
}
