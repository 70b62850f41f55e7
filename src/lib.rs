//! Client-side behaviors for the DECRYPTC marketing site, compiled to
//! WebAssembly and attached to the static markup in `index.html`.

pub mod app;
pub mod config;
pub mod dom;
pub mod error;
pub mod render;

pub mod behaviors {
    pub mod icons;
    pub mod mobile_menu;
    pub mod particles;
    pub mod scramble;
    pub mod scroll_reveal;
    pub mod sticky_header;
    pub mod theme;
    pub mod tilt;
}

pub use app::{App, Site};
pub use config::SiteConfig;
pub use error::{Result, SiteError};
