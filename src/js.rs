use js_sys::{Array, Object, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Window};

use crate::error::ElementError;

pub(crate) fn window() -> Result<Window, ElementError> {
    web_sys::window().ok_or(ElementError::NoWindow)
}

pub(crate) fn document() -> Result<Document, ElementError> {
    window()?.document().ok_or(ElementError::NoDocument)
}

/// Plain object from key/value pairs, for dictionary arguments whose
/// generated setters vary between web-sys releases.
pub(crate) fn dict(entries: &[(&str, JsValue)]) -> Object {
    let object = Object::new();
    for (key, value) in entries {
        let _ = Reflect::set(&object, &JsValue::from_str(key), value);
    }
    object
}

pub(crate) fn dict_as<T: JsCast>(entries: &[(&str, JsValue)]) -> T {
    dict(entries).unchecked_into::<T>()
}

/// Keyframe list where every frame sets a single CSS property.
pub(crate) fn keyframes<I, V>(property: &str, values: I) -> Object
where
    I: IntoIterator<Item = V>,
    V: Into<JsValue>,
{
    let frames = Array::new();
    for value in values {
        frames.push(&dict(&[(property, value.into())]));
    }
    frames.unchecked_into::<Object>()
}

pub(crate) fn viewport_width() -> f64 {
    web_sys::window()
        .and_then(|window| window.inner_width().ok())
        .and_then(|width| width.as_f64())
        .unwrap_or(0.0)
}
