use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::Array;
use web_sys::{
    Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::config::RevealConfig;
use crate::dom::{self, ClassTarget};
use crate::error::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub root_margin: String,
    /// Stop watching an element after it has been revealed once.
    pub once: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Ignored,
    Revealed { unobserve: bool },
}

/// Decides what a single intersection notification means for its target.
pub fn classify_entry(is_intersecting: bool, once: bool) -> EntryOutcome {
    if is_intersecting {
        EntryOutcome::Revealed { unobserve: once }
    } else {
        EntryOutcome::Ignored
    }
}

/// Runs `on_reveal` for an intersecting target and reports whether the
/// target should stop being observed.
pub fn dispatch_entry<T, F>(
    target: &T,
    is_intersecting: bool,
    once: bool,
    on_reveal: &mut F,
) -> bool
where
    F: FnMut(&T),
{
    match classify_entry(is_intersecting, once) {
        EntryOutcome::Revealed { unobserve } => {
            on_reveal(target);
            unobserve
        }
        EntryOutcome::Ignored => false,
    }
}

/// Adds the visible marker; leaving the viewport never takes it away.
pub fn reveal<T: ClassTarget>(target: &T, visible_class: &str) {
    target.set_class(visible_class, true);
}

type EntryCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

/// An `IntersectionObserver` together with the closure it calls back into.
/// Dropping it disconnects the observer.
pub struct RevealObserver {
    observer: IntersectionObserver,
    _callback: EntryCallback,
}

impl RevealObserver {
    pub fn new<F>(options: &ObserverOptions, mut on_reveal: F) -> Result<Self>
    where
        F: FnMut(&Element) + 'static,
    {
        let once = options.once;
        let callback: EntryCallback =
            Closure::new(move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    let target = entry.target();
                    if dispatch_entry(&target, entry.is_intersecting(), once, &mut on_reveal) {
                        observer.unobserve(&target);
                    }
                }
            });

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin);

        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;

        Ok(Self {
            observer,
            _callback: callback,
        })
    }

    pub fn observe(&self, element: &Element) {
        self.observer.observe(element);
    }
}

impl Drop for RevealObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

pub struct ScrollReveal {
    _observer: RevealObserver,
}

impl ScrollReveal {
    pub fn attach(document: &Document, config: &RevealConfig) -> Result<Self> {
        let elements = dom::query_some(document, &config.selector)?;

        let options = ObserverOptions {
            threshold: config.threshold,
            root_margin: config.root_margin.clone(),
            once: config.unobserve_after_reveal,
        };
        let visible_class = config.visible_class.clone();
        let observer = RevealObserver::new(&options, move |target: &Element| {
            reveal(target, &visible_class);
        })?;

        for element in &elements {
            observer.observe(element);
        }
        debug!("Watching {} reveal targets", elements.len());

        Ok(Self {
            _observer: observer,
        })
    }
}
