use gloo_events::EventListener;
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, MouseEvent};

use crate::config::TiltConfig;
use crate::dom;
use crate::error::Result;

pub const NEUTRAL_SHIMMER: &str = "linear-gradient(135deg, rgba(255, 255, 255, 0) 0%, \
    rgba(255, 255, 255, 0.05) 50%, rgba(255, 255, 255, 0) 100%)";

/// Rotation in degrees plus where the highlight sits, as percentages of the
/// container size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
    pub shimmer_x: f64,
    pub shimmer_y: f64,
}

impl Tilt {
    pub const NEUTRAL: Tilt = Tilt {
        rotate_x: 0.0,
        rotate_y: 0.0,
        shimmer_x: 50.0,
        shimmer_y: 50.0,
    };

    /// `x`/`y` are pointer coordinates relative to the container's top-left.
    pub fn from_pointer(x: f64, y: f64, width: f64, height: f64, damping: f64) -> Self {
        if width <= 0.0 || height <= 0.0 || damping == 0.0 {
            return Self::NEUTRAL;
        }
        let center_x = width / 2.0;
        let center_y = height / 2.0;
        Self {
            rotate_x: (y - center_y) / damping,
            rotate_y: (center_x - x) / damping,
            shimmer_x: x / width * 100.0,
            shimmer_y: y / height * 100.0,
        }
    }

    pub fn transform(&self) -> String {
        format!("rotateX({}deg) rotateY({}deg)", self.rotate_x, self.rotate_y)
    }

    pub fn shimmer(&self) -> String {
        format!(
            "radial-gradient(circle at {}% {}%, rgba(255, 255, 255, 0.15) 0%, transparent 60%)",
            self.shimmer_x, self.shimmer_y
        )
    }
}

fn apply(container: &Element, shimmer_selector: &str, transform: &str, background: &str) {
    dom::set_style(container, "transform", transform);
    if let Ok(Some(shimmer)) = container.query_selector(shimmer_selector) {
        dom::set_style(&shimmer, "background", background);
    }
}

pub struct TiltEffect {
    _listeners: Vec<EventListener>,
}

impl TiltEffect {
    pub fn attach(document: &Document, config: &TiltConfig) -> Result<Self> {
        let containers = dom::query_some(document, &config.selector)?;
        let mut listeners = Vec::with_capacity(containers.len() * 2);

        for container in &containers {
            let on_move = {
                let element = container.clone();
                let config = config.clone();
                EventListener::new(container, "mousemove", move |event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let rect = element.get_bounding_client_rect();
                    let tilt = Tilt::from_pointer(
                        f64::from(event.client_x()) - rect.left(),
                        f64::from(event.client_y()) - rect.top(),
                        rect.width(),
                        rect.height(),
                        config.damping,
                    );
                    apply(
                        &element,
                        &config.shimmer_selector,
                        &tilt.transform(),
                        &tilt.shimmer(),
                    );
                })
            };

            let on_leave = {
                let element = container.clone();
                let shimmer_selector = config.shimmer_selector.clone();
                EventListener::new(container, "mouseleave", move |_| {
                    apply(
                        &element,
                        &shimmer_selector,
                        &Tilt::NEUTRAL.transform(),
                        NEUTRAL_SHIMMER,
                    );
                })
            };

            listeners.push(on_move);
            listeners.push(on_leave);
        }

        debug!("Tilt attached to {} containers", containers.len());
        Ok(Self {
            _listeners: listeners,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_is_flat() {
        let tilt = Tilt::from_pointer(200.0, 150.0, 400.0, 300.0, 20.0);
        assert_eq!(tilt.rotate_x, 0.0);
        assert_eq!(tilt.rotate_y, 0.0);
        assert_eq!(tilt.shimmer_x, 50.0);
        assert_eq!(tilt.shimmer_y, 50.0);
    }

    #[test]
    fn corners_tilt_towards_pointer() {
        // Top-left: negative X rotation, positive Y rotation.
        let tilt = Tilt::from_pointer(0.0, 0.0, 400.0, 300.0, 20.0);
        assert_eq!(tilt.rotate_x, -7.5);
        assert_eq!(tilt.rotate_y, 10.0);
        assert_eq!(tilt.shimmer_x, 0.0);
        assert_eq!(tilt.shimmer_y, 0.0);

        let tilt = Tilt::from_pointer(400.0, 300.0, 400.0, 300.0, 20.0);
        assert_eq!(tilt.rotate_x, 7.5);
        assert_eq!(tilt.rotate_y, -10.0);
        assert_eq!(tilt.shimmer_x, 100.0);
        assert_eq!(tilt.shimmer_y, 100.0);
    }

    #[test]
    fn damping_scales_rotation() {
        let soft = Tilt::from_pointer(0.0, 0.0, 400.0, 300.0, 40.0);
        assert_eq!(soft.rotate_x, -3.75);
        assert_eq!(soft.rotate_y, 5.0);
    }

    #[test]
    fn degenerate_container_is_neutral() {
        assert_eq!(Tilt::from_pointer(10.0, 10.0, 0.0, 300.0, 20.0), Tilt::NEUTRAL);
        assert_eq!(Tilt::from_pointer(10.0, 10.0, 400.0, 0.0, 20.0), Tilt::NEUTRAL);
    }

    #[test]
    fn css_strings() {
        let tilt = Tilt::from_pointer(100.0, 75.0, 400.0, 300.0, 20.0);
        assert_eq!(tilt.transform(), "rotateX(-3.75deg) rotateY(5deg)");
        assert_eq!(
            tilt.shimmer(),
            "radial-gradient(circle at 25% 25%, rgba(255, 255, 255, 0.15) 0%, transparent 60%)"
        );
        assert_eq!(Tilt::NEUTRAL.transform(), "rotateX(0deg) rotateY(0deg)");
    }
}
