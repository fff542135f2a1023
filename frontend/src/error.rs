use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("no browser window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("{0} is not supported by this browser")]
    Unsupported(&'static str),
    #[error("element `{0}` is no longer attached to the document")]
    Detached(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for EnhanceError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        EnhanceError::Js(message)
    }
}

pub type Result<T> = std::result::Result<T, EnhanceError>;

/// Logs a failed handler run without letting it escape the event loop.
pub fn report(component: &str, result: Result<()>) {
    if let Err(e) = result {
        log::warn!("{}: {}", component, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_names_the_capability() {
        let err = EnhanceError::Unsupported("IntersectionObserver");
        assert_eq!(err.to_string(), "IntersectionObserver is not supported by this browser");
    }

    #[test]
    fn detached_names_the_element() {
        let err = EnhanceError::Detached("#header".to_string());
        assert!(err.to_string().contains("#header"));
    }
}
