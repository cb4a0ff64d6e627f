//! `<course-clear>` controller.
//!
//! A [`CourseClearElement`] upgrades an existing host element: it renders the
//! shadow template, listens to the dialog and mirrors the host's `open`
//! attribute into a [`RevealMachine`]. Effects returned by the machine are
//! applied to the [`Stage`], after which the stage is reconciled against the
//! machine's view. Events are dispatched with no borrows held, so listeners
//! may call back into the element.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use js_sys::Array;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Event, EventInit, HtmlElement, KeyboardEvent, MutationObserver, MutationObserverInit,
    ShadowRoot,
};

use course_clear_core::attrs::{
    ATTR_CLOSE_ON_ESC, ATTR_CLOSE_ON_OUTSIDE, ATTR_GREETING, ATTR_OPEN, EVENT_CLOSED, EVENT_OPENED,
};
use course_clear_core::{
    normalize_greeting, CancelGesture, DialogFlags, Effect, OpenRequest, RevealMachine,
    RevealPhase, RevealTiming, RevealView, TAG_NAME,
};

use crate::error::{js_err, ElementError};
use crate::js;
use crate::motion;
use crate::shadow::{self, ShadowParts};
use crate::stage::{Completion, Stage};

/// Handle to an upgraded `<course-clear>` host. Clones share the same state.
#[derive(Clone)]
pub struct CourseClearElement {
    inner: Rc<ElementInner>,
}

struct ElementInner {
    host: HtmlElement,
    parts: ShadowParts,
    machine: RefCell<RevealMachine>,
    stage: RefCell<Stage>,
    listeners: RefCell<Vec<EventListener>>,
    observer: RefCell<Option<AttributeObserver>>,
    label: String,
}

struct AttributeObserver {
    observer: MutationObserver,
    _callback: Closure<dyn FnMut(Array, MutationObserver)>,
}

impl Drop for AttributeObserver {
    fn drop(&mut self) {
        self.observer.disconnect();
    }
}

impl CourseClearElement {
    pub fn attach(host: HtmlElement) -> Result<Self, ElementError> {
        Self::attach_with_timing(host, RevealTiming::default())
    }

    pub fn attach_with_timing(
        host: HtmlElement,
        timing: RevealTiming,
    ) -> Result<Self, ElementError> {
        timing.validate()?;
        let tag = host.tag_name().to_ascii_lowercase();
        if tag != TAG_NAME {
            return Err(ElementError::WrongTag {
                expected: TAG_NAME,
                found: tag,
            });
        }
        let parts = shadow::render(&host, &timing)?;
        let label = match host.id() {
            id if id.is_empty() => TAG_NAME.to_string(),
            id => format!("{TAG_NAME}#{id}"),
        };
        let inner = Rc::new(ElementInner {
            host,
            parts,
            machine: RefCell::new(RevealMachine::new(timing)),
            stage: RefCell::new(Stage::default()),
            listeners: RefCell::new(Vec::new()),
            observer: RefCell::new(None),
            label,
        });
        ElementInner::wire_listeners(&inner);
        ElementInner::observe_attributes(&inner)?;

        let open = inner.host.has_attribute(ATTR_OPEN);
        gloo::console::log!(format!("course-clear: attach {} (open={open})", inner.label));
        inner.step(|machine, request| machine.attach(open, request));
        Ok(Self { inner })
    }

    pub fn host(&self) -> &HtmlElement {
        &self.inner.host
    }

    pub fn shadow_root(&self) -> &ShadowRoot {
        &self.inner.parts.root
    }

    pub fn open(&self) -> bool {
        self.inner.host.has_attribute(ATTR_OPEN)
    }

    /// Reflects `open` onto the host and drives the dialog right away; the
    /// attribute observer then sees a value that already matches.
    pub fn set_open(&self, open: bool) {
        set_flag(&self.inner.host, ATTR_OPEN, open);
        self.inner.sync_open();
    }

    pub fn greeting(&self) -> String {
        normalize_greeting(self.inner.host.get_attribute(ATTR_GREETING).as_deref())
    }

    /// Takes effect on the next open.
    pub fn set_greeting(&self, greeting: &str) {
        if let Err(err) = self.inner.host.set_attribute(ATTR_GREETING, greeting) {
            gloo::console::warn!("course-clear: greeting not set", js_err(err));
        }
    }

    pub fn close_on_escape(&self) -> bool {
        self.flags().close_on_escape
    }

    pub fn set_close_on_escape(&self, enabled: bool) {
        set_flag(&self.inner.host, ATTR_CLOSE_ON_ESC, enabled);
    }

    pub fn close_on_outside_click(&self) -> bool {
        self.flags().close_on_outside_click
    }

    pub fn set_close_on_outside_click(&self, enabled: bool) {
        set_flag(&self.inner.host, ATTR_CLOSE_ON_OUTSIDE, enabled);
    }

    pub fn flags(&self) -> DialogFlags {
        self.inner.flags()
    }

    pub fn phase(&self) -> RevealPhase {
        self.inner.machine.borrow().phase()
    }

    pub fn view(&self) -> RevealView {
        self.inner.machine.borrow().view()
    }

    pub fn is_attached(&self) -> bool {
        self.inner.machine.borrow().is_attached()
    }

    /// Whether the wave is still starting bars.
    pub fn is_wave_ticking(&self) -> bool {
        self.inner.stage.borrow().wave_ticking()
    }

    /// Number of curtain and bar nodes currently in the shadow tree.
    pub fn decoration_count(&self) -> usize {
        self.inner.stage.borrow().decoration_count()
    }

    /// Host left the document: cancel everything and hide without `closed`.
    pub fn detach(&self) {
        gloo::console::log!(format!("course-clear: detach {}", self.inner.label));
        self.inner.step(|machine, _| machine.detach());
    }

    /// Host came back; an `open` host replays its entrance from the start.
    pub fn reattach(&self) {
        let open = self.open();
        self.inner.step(|machine, request| machine.attach(open, request));
    }

    pub(crate) fn is_host(&self, host: &web_sys::Element) -> bool {
        let own: &JsValue = self.inner.host.as_ref();
        let other: &JsValue = host.as_ref();
        own == other
    }
}

impl ElementInner {
    fn flags(&self) -> DialogFlags {
        DialogFlags::from_attributes(|name| self.host.has_attribute(name))
    }

    fn open_request(&self) -> OpenRequest {
        OpenRequest {
            greeting: normalize_greeting(self.host.get_attribute(ATTR_GREETING).as_deref()),
            viewport_width: js::viewport_width(),
        }
    }

    fn sync_open(self: &Rc<Self>) {
        let open = self.host.has_attribute(ATTR_OPEN);
        self.step(|machine, request| machine.set_open(open, request));
    }

    fn step<F>(self: &Rc<Self>, input: F)
    where
        F: FnOnce(&mut RevealMachine, &OpenRequest) -> Vec<Effect>,
    {
        let request = self.open_request();
        let effects = {
            let mut machine = self.machine.borrow_mut();
            machine.set_reduced_motion(motion::prefers_reduced_motion());
            input(&mut machine, &request)
        };
        self.run(effects);
    }

    fn run(self: &Rc<Self>, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowModal => self.stage.borrow_mut().show_modal(&self.parts),
                Effect::SetGreeting(text) => self.parts.greeting.set_text_content(Some(&text)),
                Effect::PlayCurtains(ticket) => {
                    let done = {
                        let ticket = ticket.clone();
                        self.completion(move |inner| {
                            inner.step(|machine, _| machine.curtains_finished(&ticket))
                        })
                    };
                    self.stage
                        .borrow_mut()
                        .play_curtains(&self.parts, &ticket, done);
                }
                Effect::PlayWave { ticket, bars } => {
                    let done = {
                        let ticket = ticket.clone();
                        self.completion(move |inner| {
                            inner.step(|machine, _| machine.wave_finished(&ticket))
                        })
                    };
                    let settled = self.completion(|inner| {
                        inner.step(|machine, _| machine.content_settled())
                    });
                    let timing = self.machine.borrow().timing().clone();
                    let mut stage = self.stage.borrow_mut();
                    stage.play_wave(&self.parts, &timing, &ticket, bars, done);
                    stage.watch_content(&timing, &ticket, settled);
                }
                Effect::CancelEntrance => self.stage.borrow_mut().cancel_entrance(),
                Effect::PlayFade(ticket) => {
                    let done = {
                        let ticket = ticket.clone();
                        self.completion(move |inner| {
                            inner.step(|machine, _| machine.fade_finished(&ticket))
                        })
                    };
                    let timing = self.machine.borrow().timing().clone();
                    self.stage
                        .borrow_mut()
                        .play_fade(&self.parts, &timing, &ticket, done);
                }
                Effect::CancelFade => self.stage.borrow_mut().cancel_fade(),
                Effect::CloseModal => self.stage.borrow_mut().close_modal(&self.parts),
                Effect::ReflectOpen(open) => set_flag(&self.host, ATTR_OPEN, open),
                Effect::EmitOpened => self.emit(EVENT_OPENED),
                Effect::EmitClosed => self.emit(EVENT_CLOSED),
            }
        }
        let view = self.machine.borrow().view();
        self.stage.borrow_mut().reconcile(&self.parts, &view);
    }

    fn completion<F>(self: &Rc<Self>, on_done: F) -> Completion
    where
        F: FnOnce(&Rc<Self>) + 'static,
    {
        let weak: Weak<Self> = Rc::downgrade(self);
        Box::new(move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            on_done(&inner);
        })
    }

    fn emit(&self, name: &str) {
        let init: EventInit =
            js::dict_as(&[("bubbles", true.into()), ("composed", true.into())]);
        match Event::new_with_event_init_dict(name, &init) {
            Ok(event) => {
                gloo::console::log!(format!("course-clear: {name} {}", self.label));
                if let Err(err) = self.parts.dialog.dispatch_event(&event) {
                    gloo::console::warn!("course-clear: dispatch failed", js_err(err));
                }
            }
            Err(err) => gloo::console::warn!("course-clear: event not created", js_err(err)),
        }
    }

    fn gesture(self: &Rc<Self>, gesture: CancelGesture) {
        let flags = self.flags();
        self.step(|machine, _| machine.cancel_gesture(gesture, flags));
    }

    fn native_closed(self: &Rc<Self>) {
        // a close event queued before a synchronous reopen belongs to the
        // previous cycle
        if self.parts.dialog.open() {
            self.emit(EVENT_CLOSED);
            return;
        }
        self.step(|machine, _| machine.native_closed());
    }

    fn wire_listeners(inner: &Rc<Self>) {
        let dialog = inner.parts.dialog.clone();
        let mut listeners = Vec::new();

        let weak = Rc::downgrade(inner);
        listeners.push(EventListener::new_with_options(
            &dialog,
            "cancel",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                event.prevent_default();
                if let Some(inner) = weak.upgrade() {
                    inner.gesture(CancelGesture::Escape);
                }
            },
        ));

        let weak = Rc::downgrade(inner);
        listeners.push(EventListener::new_with_options(
            &dialog,
            "keydown",
            EventListenerOptions::enable_prevent_default(),
            move |event| {
                let Some(key) = event.dyn_ref::<KeyboardEvent>() else {
                    return;
                };
                if key.key() != "Escape" {
                    return;
                }
                event.prevent_default();
                if let Some(inner) = weak.upgrade() {
                    inner.gesture(CancelGesture::Escape);
                }
            },
        ));

        let weak = Rc::downgrade(inner);
        let backdrop: JsValue = dialog.clone().into();
        listeners.push(EventListener::new(&dialog, "click", move |event| {
            let target: Option<JsValue> = event.target().map(Into::into);
            if target.as_ref() != Some(&backdrop) {
                return;
            }
            if let Some(inner) = weak.upgrade() {
                inner.gesture(CancelGesture::Backdrop);
            }
        }));

        let weak = Rc::downgrade(inner);
        listeners.push(EventListener::new(&dialog, "close", move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.native_closed();
            }
        }));

        // a reopen that lands on already revealed content cancels the
        // pending reverse transition instead of ending one
        for event_type in ["transitionend", "transitioncancel"] {
            let weak = Rc::downgrade(inner);
            let children: JsValue = inner.parts.children.clone().into();
            listeners.push(EventListener::new(
                &inner.parts.children,
                event_type,
                move |event| {
                    // transitions of slotted descendants bubble through here too
                    let target: Option<JsValue> = event.target().map(Into::into);
                    if target.as_ref() != Some(&children) {
                        return;
                    }
                    if let Some(inner) = weak.upgrade() {
                        inner.step(|machine, _| machine.content_settled());
                    }
                },
            ));
        }

        *inner.listeners.borrow_mut() = listeners;
    }

    fn observe_attributes(inner: &Rc<Self>) -> Result<(), ElementError> {
        let weak = Rc::downgrade(inner);
        let callback = Closure::wrap(Box::new(move |_records: Array, _observer: MutationObserver| {
            if let Some(inner) = weak.upgrade() {
                inner.sync_open();
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>);
        let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
        let filter = Array::of1(&JsValue::from_str(ATTR_OPEN));
        let init: MutationObserverInit =
            js::dict_as(&[("attributes", true.into()), ("attributeFilter", filter.into())]);
        observer.observe_with_options(&inner.host, &init)?;
        *inner.observer.borrow_mut() = Some(AttributeObserver {
            observer,
            _callback: callback,
        });
        Ok(())
    }
}

impl Drop for ElementInner {
    fn drop(&mut self) {
        self.observer.get_mut().take();
        self.listeners.get_mut().clear();
        self.stage.get_mut().teardown();
    }
}

fn set_flag(host: &HtmlElement, name: &str, enabled: bool) {
    let result = if enabled {
        host.set_attribute(name, "")
    } else {
        host.remove_attribute(name)
    };
    if let Err(err) = result {
        gloo::console::warn!(format!("course-clear: {name} not reflected"), js_err(err));
    }
}
