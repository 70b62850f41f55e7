use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SiteError {
    /// A selector matched nothing; the owning behavior stays inert.
    #[error("no element matches `{0}`")]
    MissingElement(String),

    #[error("browser API unavailable: {0}")]
    Unavailable(&'static str),

    #[error("javascript error: {0}")]
    Js(String),

    #[error("invalid site config: {0}")]
    Config(#[from] serde_json::Error),
}

impl SiteError {
    pub fn missing(selector: &str) -> Self {
        SiteError::MissingElement(selector.to_string())
    }

    pub fn is_missing_element(&self) -> bool {
        matches!(self, SiteError::MissingElement(_))
    }
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        SiteError::Js(message)
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
