use wasm_bindgen::{JsCast, JsValue};

#[derive(Debug, thiserror::Error)]
pub enum ElementError {
    #[error("window unavailable")]
    NoWindow,
    #[error("document unavailable")]
    NoDocument,
    #[error("expected a <{expected}> host, got <{found}>")]
    WrongTag { expected: &'static str, found: String },
    #[error("shadow root unavailable: {0}")]
    Shadow(String),
    #[error("shadow template is missing {0}")]
    MissingPart(&'static str),
    #[error("invalid timing: {0}")]
    Timing(#[from] course_clear_core::TimingError),
    #[error("dom call failed: {0}")]
    Js(String),
}

impl From<JsValue> for ElementError {
    fn from(value: JsValue) -> Self {
        ElementError::Js(js_err(value))
    }
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}
