use decryptc_web::{config, dom, App};
use log::{debug, info};

/// Id of the node the behavior component mounts on; it never renders content.
const MOUNT_ID: &str = "site-behaviors";

fn mount_root() -> Option<web_sys::Element> {
    let document = dom::document().ok()?;
    if let Some(existing) = document.get_element_by_id(MOUNT_ID) {
        return Some(existing);
    }
    let root = document.create_element("div").ok()?;
    root.set_id(MOUNT_ID);
    if let Err(e) = root.set_attribute("hidden", "") {
        debug!("Failed to hide mount node: {:?}", e);
    }
    dom::body(&document).ok()?.append_child(&root).ok()?;
    Some(root)
}

fn main() {
    // Initialize console error panic hook for better error messages
    console_error_panic_hook::set_once();

    // Initialize logging
    console_log::init_with_level(config::log_level()).expect("error initializing log");

    info!("Starting site behaviors");
    match mount_root() {
        Some(root) => {
            yew::Renderer::<App>::with_root(root).render();
        }
        None => log::error!("No document to attach to"),
    }
}
