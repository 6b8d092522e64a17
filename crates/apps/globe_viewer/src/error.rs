use wasm_bindgen::JsValue;

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("browser window is not available")]
    WindowUnavailable,
    #[error("element `{0}` not found")]
    ElementMissing(String),
    #[error("surface error: {0}")]
    Surface(String),
    #[error("adapter error: {0}")]
    Adapter(String),
    #[error("device error: {0}")]
    Device(String),
    #[error("fetch of `{url}` failed: {reason}")]
    Fetch { url: String, reason: String },
    #[error("texture decode failed: {0}")]
    Texture(#[from] image::ImageError),
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("viewer is not initialized")]
    NotInitialized,
}

impl ViewerError {
    pub fn fetch(url: &str, reason: impl std::fmt::Display) -> Self {
        ViewerError::Fetch {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}

impl From<ViewerError> for JsValue {
    fn from(err: ViewerError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::ViewerError;

    #[test]
    fn messages_name_the_failure() {
        assert_eq!(
            ViewerError::ElementMissing("three".to_string()).to_string(),
            "element `three` not found"
        );
        assert_eq!(
            ViewerError::fetch("./cfg.json", "404").to_string(),
            "fetch of `./cfg.json` failed: 404"
        );
    }

    #[test]
    fn json_errors_convert() {
        let err: ViewerError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ViewerError::ConfigParse(_)));
    }
}
