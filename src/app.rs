use log::{debug, info, warn};
use yew::prelude::*;

use crate::behaviors::{
    icons, mobile_menu::MobileMenu, particles::ParticleBackground, scramble::TextScramble,
    scroll_reveal::ScrollReveal, sticky_header::StickyHeader, theme::ThemeToggle,
    tilt::TiltEffect,
};
use crate::config::SiteConfig;
use crate::dom;
use crate::error::Result;

/// Every behavior attached to the page. Dropping it detaches them all.
#[derive(Default)]
pub struct Site {
    pub header: Option<StickyHeader>,
    pub reveal: Option<ScrollReveal>,
    pub theme: Option<ThemeToggle>,
    pub menu: Option<MobileMenu>,
    pub scramble: Option<TextScramble>,
    pub particles: Option<ParticleBackground>,
    pub tilt: Option<TiltEffect>,
    pub icons_rendered: bool,
}

impl Site {
    pub fn attach() -> Result<Self> {
        let window = dom::window()?;
        let document = dom::document()?;
        let config = SiteConfig::from_document(&document);

        let site = Self {
            header: settle(
                "sticky header",
                StickyHeader::attach(&window, &document, &config.header),
            ),
            reveal: settle(
                "scroll reveal",
                ScrollReveal::attach(&document, &config.reveal),
            ),
            theme: settle(
                "theme toggle",
                ThemeToggle::attach(&window, &document, &config.theme),
            ),
            menu: settle("mobile menu", MobileMenu::attach(&document, &config.menu)),
            scramble: settle(
                "text scramble",
                TextScramble::attach(&document, &config.scramble),
            ),
            particles: settle(
                "particle background",
                ParticleBackground::attach(&window, &document, &config.particles),
            ),
            icons_rendered: icons::materialize_icons(),
            tilt: settle("tilt", TiltEffect::attach(&document, &config.tilt)),
        };

        info!("Site behaviors attached ({} active)", site.active());
        Ok(site)
    }

    pub fn active(&self) -> usize {
        [
            self.header.is_some(),
            self.reveal.is_some(),
            self.theme.is_some(),
            self.menu.is_some(),
            self.scramble.is_some(),
            self.particles.is_some(),
            self.tilt.is_some(),
            self.icons_rendered,
        ]
        .iter()
        .filter(|on| **on)
        .count()
    }
}

/// Missing markup just leaves a behavior off; anything else is worth a warning.
fn settle<T>(name: &str, attached: Result<T>) -> Option<T> {
    match attached {
        Ok(behavior) => Some(behavior),
        Err(e) if e.is_missing_element() => {
            debug!("Skipping {}: {}", name, e);
            None
        }
        Err(e) => {
            warn!("Skipping {}: {}", name, e);
            None
        }
    }
}

#[function_component(App)]
pub fn app() -> Html {
    use_effect_with_deps(
        move |_| {
            let site = match Site::attach() {
                Ok(site) => Some(site),
                Err(e) => {
                    warn!("Site behaviors unavailable: {}", e);
                    None
                }
            };
            move || drop(site)
        },
        (),
    );

    html! {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SiteError;

    #[test]
    fn missing_markup_leaves_behavior_off() {
        assert!(settle::<()>("header", Err(SiteError::missing(".site-header"))).is_none());
        assert!(settle::<()>("theme", Err(SiteError::Unavailable("localStorage"))).is_none());
        assert_eq!(settle("tilt", Ok(3)), Some(3));
    }

    #[test]
    fn empty_site_counts_nothing() {
        let site = Site::default();
        assert_eq!(site.active(), 0);

        let site = Site {
            icons_rendered: true,
            ..Site::default()
        };
        assert_eq!(site.active(), 1);
    }
}
