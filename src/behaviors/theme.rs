use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use gloo_events::EventListener;
use log::{debug, info, warn};
use web_sys::{Document, Element, Storage, Window};

use crate::config::ThemeConfig;
use crate::dom::{self, ClassTarget};
use crate::error::{Result, SiteError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Only an explicit "light" selects light mode; everything else is dark.
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("light") => Self::Light,
            _ => Self::Dark,
        }
    }
}

/// Key/value store the theme preference is persisted in.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

pub struct LocalStore {
    storage: Storage,
}

impl LocalStore {
    pub fn open(window: &Window) -> Result<Self> {
        let storage = window
            .local_storage()?
            .ok_or(SiteError::Unavailable("localStorage"))?;
        Ok(Self { storage })
    }
}

impl PreferenceStore for LocalStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage.set_item(key, value)?;
        Ok(())
    }
}

/// Session-only store used when `localStorage` is blocked.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// The dark-mode class on `root` plus the store mirroring it.
pub struct ThemeSwitch<T, S> {
    root: T,
    store: S,
    dark_class: String,
    storage_key: String,
}

impl<T: ClassTarget, S: PreferenceStore> ThemeSwitch<T, S> {
    pub fn new(root: T, store: S, config: &ThemeConfig) -> Self {
        Self {
            root,
            store,
            dark_class: config.dark_class.clone(),
            storage_key: config.storage_key.clone(),
        }
    }

    pub fn current(&self) -> Theme {
        if self.root.has_class(&self.dark_class) {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Applies the saved preference without writing it back.
    pub fn restore(&self) -> Theme {
        let saved = self.store.get(&self.storage_key);
        let theme = Theme::from_stored(saved.as_deref());
        self.root.set_class(&self.dark_class, theme == Theme::Dark);
        theme
    }

    pub fn toggle(&self) -> Theme {
        let dark = self.root.toggle_class(&self.dark_class);
        let theme = if dark { Theme::Dark } else { Theme::Light };
        if let Err(e) = self.store.set(&self.storage_key, theme.as_str()) {
            warn!("Failed to persist theme: {}", e);
        }
        theme
    }
}

pub struct ThemeToggle {
    _click: EventListener,
}

impl ThemeToggle {
    pub fn attach(window: &Window, document: &Document, config: &ThemeConfig) -> Result<Self> {
        let button = dom::query(document, &config.toggle_selector)?;
        let body: Element = dom::body(document)?.into();

        let store: Box<dyn PreferenceStore> = match LocalStore::open(window) {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!("Theme preference will not survive reloads: {}", e);
                Box::new(MemoryStore::default())
            }
        };

        let switch = Rc::new(ThemeSwitch::new(body, store, config));
        let initial = switch.restore();
        debug!("Restored {} theme", initial.as_str());

        let click = {
            let switch = switch.clone();
            EventListener::new(&button, "click", move |_| {
                let theme = switch.toggle();
                info!("Switched to {} theme", theme.as_str());
            })
        };

        Ok(Self { _click: click })
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
