//! Browser side of the `<course-clear>` reveal dialog.
//!
//! The state machine lives in `course-clear-core`; this crate renders the
//! shadow template, runs the curtain/wave/fade animations and keeps
//! upgraded hosts in sync with the document.

mod error;
mod js;
mod motion;
mod shadow;
mod stage;
mod styles;

pub mod element;
pub mod registry;
pub mod yew_host;

use wasm_bindgen::prelude::*;

pub use course_clear_core as reveal;
pub use element::CourseClearElement;
pub use error::ElementError;
pub use motion::set_reduced_motion_override;
pub use registry::{find, release, shutdown, upgrade, upgrade_all};
pub use yew_host::{CourseClearDialog, CourseClearDialogProps};

/// Upgrades every `<course-clear>` on the page for hosts that do not use
/// yew. Returns the number of newly upgraded elements.
#[wasm_bindgen(js_name = upgradeCourseClear)]
pub fn upgrade_course_clear() -> Result<u32, JsValue> {
    let upgraded = upgrade_all().map_err(|err| JsValue::from_str(&err.to_string()))?;
    Ok(u32::try_from(upgraded).unwrap_or(u32::MAX))
}
