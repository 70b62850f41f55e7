use log::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::js_sys::{global, Function, Reflect};

pub const ICON_GLOBAL: &str = "lucide";
pub const CREATE_ICONS: &str = "createIcons";

/// Asks the icon library, when the page loaded one, to replace
/// `<i data-lucide="..">` placeholders with inline SVG. Returns whether it ran.
pub fn materialize_icons() -> bool {
    let Some((library, create)) = lookup(ICON_GLOBAL, CREATE_ICONS) else {
        debug!("No {} global; skipping icon rendering", ICON_GLOBAL);
        return false;
    };

    match create.call0(&library) {
        Ok(_) => true,
        Err(e) => {
            warn!("{}.{} failed: {:?}", ICON_GLOBAL, CREATE_ICONS, e);
            false
        }
    }
}

fn lookup(object: &str, method: &str) -> Option<(JsValue, Function)> {
    let library = Reflect::get(&global(), &JsValue::from_str(object)).ok()?;
    if library.is_undefined() || library.is_null() {
        return None;
    }
    let create = Reflect::get(&library, &JsValue::from_str(method))
        .ok()?
        .dyn_into::<Function>()
        .ok()?;
    Some((library, create))
}
