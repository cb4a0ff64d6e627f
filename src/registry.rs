//! Page-wide bookkeeping for upgraded `<course-clear>` hosts.
//!
//! Browsers only call lifecycle hooks on elements defined from script, so the
//! registry watches the document instead. New hosts are upgraded, and hosts
//! that leave the document are detached and dropped from the registry so
//! their controllers can be freed. A host that comes back is upgraded afresh.

use std::cell::RefCell;

use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement, MutationObserver, MutationObserverInit};

use course_clear_core::TAG_NAME;

use crate::element::CourseClearElement;
use crate::error::ElementError;
use crate::js;

struct DocumentWatch {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

thread_local! {
    static ELEMENTS: RefCell<Vec<CourseClearElement>> = RefCell::new(Vec::new());
    static WATCH: RefCell<Option<DocumentWatch>> = RefCell::new(None);
}

/// Upgrades every `<course-clear>` in the document that is not managed yet
/// and starts watching for hosts added later. Returns how many were upgraded.
pub fn upgrade_all() -> Result<usize, ElementError> {
    watch_document()?;
    upgrade_pending()
}

/// Controller for an upgraded host.
pub fn find(host: &Element) -> Option<CourseClearElement> {
    ELEMENTS.with(|elements| {
        elements
            .borrow()
            .iter()
            .find(|element| element.is_host(host))
            .cloned()
    })
}

/// Upgrades a single host, or returns its existing controller.
pub fn upgrade(host: HtmlElement) -> Result<CourseClearElement, ElementError> {
    if let Some(existing) = find(&host) {
        return Ok(existing);
    }
    let element = CourseClearElement::attach(host)?;
    ELEMENTS.with(|elements| elements.borrow_mut().push(element.clone()));
    Ok(element)
}

/// Disconnects and forgets the controller of `host`.
pub fn release(host: &Element) {
    let removed = ELEMENTS.with(|elements| {
        let mut elements = elements.borrow_mut();
        let index = elements.iter().position(|element| element.is_host(host))?;
        Some(elements.remove(index))
    });
    if let Some(element) = removed {
        element.detach();
    }
}

/// Stops watching the document and disconnects every managed host.
pub fn shutdown() {
    WATCH.with(|watch| {
        if let Some(watch) = watch.borrow_mut().take() {
            watch.observer.disconnect();
        }
    });
    let elements = ELEMENTS.with(|elements| std::mem::take(&mut *elements.borrow_mut()));
    for element in elements {
        element.detach();
    }
}

fn upgrade_pending() -> Result<usize, ElementError> {
    let document = js::document()?;
    let nodes = document.query_selector_all(TAG_NAME)?;
    let mut upgraded = 0;
    for index in 0..nodes.length() {
        let Some(host) = nodes
            .item(index)
            .and_then(|node| node.dyn_into::<HtmlElement>().ok())
        else {
            continue;
        };
        if find(&host).is_some() {
            continue;
        }
        match upgrade(host) {
            Ok(_) => upgraded += 1,
            Err(err) => gloo::console::warn!(format!("course-clear: upgrade failed: {err}")),
        }
    }
    Ok(upgraded)
}

/// Detaches and forgets hosts that left the document, and reattaches
/// managed hosts that are still in it. A forgotten host that is reinserted later is
/// upgraded again by the rescan, which replays its entrance when `open`.
fn sync_connections() {
    let removed = ELEMENTS.with(|elements| {
        let mut elements = elements.borrow_mut();
        let (kept, removed): (Vec<_>, Vec<_>) = std::mem::take(&mut *elements)
            .into_iter()
            .partition(|element| element.host().is_connected());
        *elements = kept;
        removed
    });
    // detach/reattach outside the borrow: both may dispatch events into user code
    for element in removed {
        element.detach();
    }
    let elements = ELEMENTS.with(|elements| elements.borrow().clone());
    for element in elements {
        if !element.is_attached() {
            element.reattach();
        }
    }
}

fn watch_document() -> Result<(), ElementError> {
    if WATCH.with(|watch| watch.borrow().is_some()) {
        return Ok(());
    }
    let document = js::document()?;
    let Some(root) = document.document_element() else {
        return Err(ElementError::NoDocument);
    };
    let callback = Closure::wrap(Box::new(move |_records: Array, _observer: MutationObserver| {
        sync_connections();
        if let Err(err) = upgrade_pending() {
            gloo::console::warn!(format!("course-clear: rescan failed: {err}"));
        }
    }) as Box<dyn FnMut(Array, MutationObserver)>);
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init: MutationObserverInit =
        js::dict_as(&[("childList", true.into()), ("subtree", true.into())]);
    observer.observe_with_options(&root, &init)?;
    WATCH.with(|watch| {
        *watch.borrow_mut() = Some(DocumentWatch {
            observer,
            _callback: callback,
        });
    });
    Ok(())
}
