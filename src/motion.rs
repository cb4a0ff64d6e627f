use std::cell::Cell;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

thread_local! {
    static OVERRIDE: Cell<Option<bool>> = const { Cell::new(None) };
}

/// Whether entrances should skip straight to the revealed state.
pub(crate) fn prefers_reduced_motion() -> bool {
    if let Some(forced) = OVERRIDE.with(Cell::get) {
        return forced;
    }
    let Some(window) = web_sys::window() else {
        return false;
    };
    match window.match_media(REDUCED_MOTION_QUERY) {
        Ok(Some(query)) => query.matches(),
        _ => false,
    }
}

/// Pins the reduced-motion preference for every element on the page;
/// `None` goes back to the media query.
pub fn set_reduced_motion_override(forced: Option<bool>) {
    OVERRIDE.with(|slot| slot.set(forced));
}
