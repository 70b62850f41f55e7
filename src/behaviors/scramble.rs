use std::cell::RefCell;
use std::rc::{Rc, Weak};

use fastrand::Rng;
use gloo_events::EventListener;
use gloo_timers::callback::Interval;
use log::debug;
use web_sys::{Document, Element};

use crate::behaviors::scroll_reveal::{ObserverOptions, RevealObserver};
use crate::config::ScrambleConfig;
use crate::dom::{self, ClassTarget};
use crate::error::Result;

/// Ticks needed to lock in one more character of the target.
pub const TICKS_PER_CHAR: u32 = 3;

const FALLBACK_GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

#[derive(Debug, Clone)]
pub struct Glyphs(Vec<char>);

impl Glyphs {
    pub fn new(set: &str) -> Self {
        let chars: Vec<char> = set.chars().collect();
        if chars.is_empty() {
            Self(FALLBACK_GLYPHS.chars().collect())
        } else {
            Self(chars)
        }
    }

    pub fn pick(&self, rng: &mut Rng) -> char {
        self.0[rng.usize(..self.0.len())]
    }

    pub fn contains(&self, c: char) -> bool {
        self.0.contains(&c)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    Running,
    Finished,
}

/// Progress of one element converging on its final text.
#[derive(Debug, Clone)]
pub struct ScrambleState {
    target: Vec<char>,
    displayed: Vec<char>,
    ticks: u32,
}

impl ScrambleState {
    pub fn new(target: &str) -> Self {
        let target: Vec<char> = target.chars().collect();
        Self {
            displayed: target.clone(),
            target,
            ticks: 0,
        }
    }

    /// Rewinds progress and replaces the displayed text with noise of the
    /// target's length, whatever a previous run left behind.
    pub fn restart(&mut self, glyphs: &Glyphs, rng: &mut Rng) {
        self.ticks = 0;
        self.displayed = self.target.iter().map(|_| glyphs.pick(rng)).collect();
    }

    pub fn progress(&self) -> f64 {
        f64::from(self.ticks) / f64::from(TICKS_PER_CHAR)
    }

    /// Number of leading positions already showing the target.
    pub fn locked(&self) -> usize {
        (self.ticks / TICKS_PER_CHAR) as usize
    }

    pub fn tick(&mut self, glyphs: &Glyphs, rng: &mut Rng) -> Tick {
        let locked = self.locked();
        for (i, slot) in self.displayed.iter_mut().enumerate() {
            *slot = match self.target.get(i) {
                Some(&c) if i < locked => c,
                _ => glyphs.pick(rng),
            };
        }

        if self.progress() >= self.target.len() as f64 {
            Tick::Finished
        } else {
            self.ticks += 1;
            Tick::Running
        }
    }

    pub fn text(&self) -> String {
        self.displayed.iter().collect()
    }

    pub fn target(&self) -> String {
        self.target.iter().collect()
    }
}

struct ScrambleTarget {
    element: Element,
    state: RefCell<ScrambleState>,
    timer: RefCell<Option<Interval>>,
    glyphs: Rc<Glyphs>,
    rng: Rc<RefCell<Rng>>,
    tick_ms: u32,
}

impl ScrambleTarget {
    fn start(self: &Rc<Self>) {
        // At most one run per element: drop the old interval before scheduling.
        self.timer.borrow_mut().take();

        let text = {
            let mut state = self.state.borrow_mut();
            state.restart(&self.glyphs, &mut self.rng.borrow_mut());
            state.text()
        };
        self.element.set_text_content(Some(&text));

        let weak: Weak<Self> = Rc::downgrade(self);
        let interval = Interval::new(self.tick_ms, move || {
            if let Some(target) = weak.upgrade() {
                target.on_tick();
            }
        });
        *self.timer.borrow_mut() = Some(interval);
    }

    fn on_tick(&self) {
        let (text, tick) = {
            let mut state = self.state.borrow_mut();
            let tick = state.tick(&self.glyphs, &mut self.rng.borrow_mut());
            (state.text(), tick)
        };
        self.element.set_text_content(Some(&text));

        if tick == Tick::Finished {
            // Freed by wasm-bindgen once this callback returns.
            self.timer.borrow_mut().take();
        }
    }
}

/// Watches for a target's first appearance. Later appearances are left to hover.
pub fn reveal_trigger(config: &ScrambleConfig) -> ObserverOptions {
    ObserverOptions {
        threshold: config.reveal_threshold,
        root_margin: "0px".to_string(),
        once: true,
    }
}

/// Whether `element` also replays its scramble when first scrolled into view.
pub fn replays_on_reveal<T: ClassTarget>(element: &T, config: &ScrambleConfig) -> bool {
    element.has_class(&config.reveal_class)
}

pub struct TextScramble {
    _listeners: Vec<EventListener>,
    observers: Vec<RevealObserver>,
    _targets: Vec<Rc<ScrambleTarget>>,
}

impl TextScramble {
    pub fn attach(document: &Document, config: &ScrambleConfig) -> Result<Self> {
        let elements = dom::query_some(document, &config.selector)?;
        let glyphs = Rc::new(Glyphs::new(&config.glyphs));
        let rng = Rc::new(RefCell::new(Rng::with_seed(dom::entropy_seed())));

        let reveal_options = reveal_trigger(config);

        let mut listeners = Vec::with_capacity(elements.len());
        let mut observers = Vec::new();
        let mut targets = Vec::with_capacity(elements.len());

        for element in elements {
            let final_text = element
                .get_attribute("data-value")
                .or_else(|| element.text_content())
                .unwrap_or_default();

            let target = Rc::new(ScrambleTarget {
                element: element.clone(),
                state: RefCell::new(ScrambleState::new(&final_text)),
                timer: RefCell::new(None),
                glyphs: glyphs.clone(),
                rng: rng.clone(),
                tick_ms: config.tick_ms,
            });

            {
                let target = target.clone();
                listeners.push(EventListener::new(&element, "mouseover", move |_| {
                    target.start();
                }));
            }

            if replays_on_reveal(&element, config) {
                let weak = Rc::downgrade(&target);
                let observer = RevealObserver::new(&reveal_options, move |_: &Element| {
                    if let Some(target) = weak.upgrade() {
                        target.start();
                    }
                })?;
                observer.observe(&element);
                observers.push(observer);
            }

            targets.push(target);
        }

        debug!(
            "Scramble attached to {} elements ({} replay on reveal)",
            targets.len(),
            observers.len()
        );

        Ok(Self {
            _listeners: listeners,
            observers,
            _targets: targets,
        })
    }

    /// Number of targets watched for their first reveal.
    pub fn reveal_watched(&self) -> usize {
        self.observers.len()
    }
}
