//! DOM side of a reveal run: curtains, wave bars and the close fade.
//!
//! The stage owns every decorative node and every timer it starts, so
//! canceling a run is a matter of dropping handles and removing nodes.
//! Completion callbacks are only invoked while the run's ticket is live.

use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::EventListener;
use gloo::render::{request_animation_frame, AnimationFrame};
use gloo::timers::callback::{Interval, Timeout};
use js_sys::Promise;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{Animation, HtmlElement, KeyframeAnimationOptions};

use course_clear_core::wave::WAVE_EASING;
use course_clear_core::{bar_slices, wave_keyframes, AnimationTicket, RevealTiming, RevealView};

use crate::error::js_err;
use crate::js;
use crate::shadow::ShadowParts;
use crate::styles::{
    BAR_CLASS, CURTAINS_FINISHED_MARKER, CURTAIN_BOTTOM_CLASS, CURTAIN_CLASS, CURTAIN_TOP_CLASS,
    SHRINK_MARKER, WAVE_FINISHED_MARKER,
};

pub(crate) type Completion = Box<dyn FnOnce()>;

#[derive(Default)]
pub(crate) struct Stage {
    curtains: Vec<HtmlElement>,
    curtain_frames: Rc<RefCell<Vec<AnimationFrame>>>,
    curtain_listener: Option<EventListener>,
    bars: Vec<HtmlElement>,
    bar_animations: Rc<RefCell<Vec<Animation>>>,
    wave_interval: Rc<RefCell<Option<Interval>>>,
    content_watch: Option<Timeout>,
    fade: Option<Animation>,
}

impl Stage {
    pub(crate) fn show_modal(&mut self, parts: &ShadowParts) {
        let _ = parts.dialog.style().set_property("display", "");
        if parts.dialog.open() {
            return;
        }
        if let Err(err) = parts.dialog.show_modal() {
            gloo::console::warn!("course-clear: showModal failed", js_err(err));
        }
    }

    pub(crate) fn close_modal(&mut self, parts: &ShadowParts) {
        self.fade = None;
        if parts.dialog.open() {
            parts.dialog.close();
        }
    }

    pub(crate) fn play_curtains(
        &mut self,
        parts: &ShadowParts,
        ticket: &AnimationTicket,
        done: Completion,
    ) {
        self.clear_curtains();
        let (top, bottom) = match (
            decoration(&[CURTAIN_CLASS, CURTAIN_TOP_CLASS]),
            decoration(&[CURTAIN_CLASS, CURTAIN_BOTTOM_CLASS]),
        ) {
            (Some(top), Some(bottom)) => (top, bottom),
            _ => {
                gloo::console::warn!("course-clear: curtains unavailable, skipping");
                defer(ticket, done);
                return;
            }
        };
        for curtain in [&top, &bottom] {
            if let Err(err) = parts.dialog.append_child(curtain) {
                gloo::console::warn!("course-clear: curtain append failed", js_err(err));
            }
        }

        // two frames so the unshrunk state is painted before the transition
        let frames = self.curtain_frames.clone();
        let curtains = vec![top.clone(), bottom.clone()];
        let token = ticket.token().clone();
        let first = request_animation_frame(move |_| {
            if token.is_canceled() {
                return;
            }
            let second = request_animation_frame(move |_| {
                for curtain in &curtains {
                    let _ = curtain.class_list().add_1(SHRINK_MARKER);
                }
            });
            frames.borrow_mut().push(second);
        });
        self.curtain_frames.borrow_mut().push(first);

        let ticket = ticket.clone();
        self.curtain_listener = Some(EventListener::once(&bottom, "transitionend", move |_| {
            if ticket.is_live() {
                done();
            }
        }));
        self.curtains = vec![top, bottom];
    }

    pub(crate) fn play_wave(
        &mut self,
        parts: &ShadowParts,
        timing: &RevealTiming,
        ticket: &AnimationTicket,
        bars: usize,
        done: Completion,
    ) {
        self.clear_bars();
        let mut nodes = Vec::with_capacity(bars);
        for slice in bar_slices(bars) {
            let Some(bar) = decoration(&[BAR_CLASS]) else {
                continue;
            };
            let style = bar.style();
            let _ = style.set_property("inset-inline-start", &slice.inset_inline_start());
            let _ = style.set_property("width", &slice.width());
            if let Err(err) = parts.dialog.append_child(&bar) {
                gloo::console::warn!("course-clear: bar append failed", js_err(err));
                continue;
            }
            nodes.push(bar);
        }
        if nodes.is_empty() {
            defer(ticket, done);
            return;
        }

        let keyframes = js::keyframes("scale", wave_keyframes());
        let options: KeyframeAnimationOptions = js::dict_as(&[
            ("easing", WAVE_EASING.into()),
            ("duration", f64::from(timing.bar_ms).into()),
            ("fill", "forwards".into()),
        ]);
        let animations = self.bar_animations.clone();
        let interval_for_tick = self.wave_interval.clone();
        let pending = nodes.clone();
        let ticket = ticket.clone();
        let mut done = Some(done);
        let mut next = 0usize;
        let interval = Interval::new(timing.bar_stagger_ms, move || {
            let Some(bar) = pending.get(next) else {
                interval_for_tick.borrow_mut().take();
                return;
            };
            next += 1;
            if !ticket.is_live() {
                return;
            }
            let animation = bar.animate_with_keyframe_animation_options(Some(&keyframes), &options);
            animations.borrow_mut().push(animation.clone());
            if next < pending.len() {
                return;
            }
            interval_for_tick.borrow_mut().take();
            let Some(done) = done.take() else {
                return;
            };
            match animation.finished() {
                Ok(finished) => settle(finished, ticket.clone(), done),
                Err(err) => {
                    gloo::console::warn!("course-clear: wave promise unavailable", js_err(err));
                    defer(&ticket, done);
                }
            }
        });
        *self.wave_interval.borrow_mut() = Some(interval);
        self.bars = nodes;
    }

    /// Settles the slotted content after its reveal budget even when no
    /// transition event arrives, e.g. when a reopen lands on a wrapper that
    /// is already at its revealed values.
    pub(crate) fn watch_content(
        &mut self,
        timing: &RevealTiming,
        ticket: &AnimationTicket,
        done: Completion,
    ) {
        let ticket = ticket.clone();
        self.content_watch = Some(Timeout::new(timing.content_ms(), move || {
            if ticket.is_live() {
                done();
            }
        }));
    }

    pub(crate) fn play_fade(
        &mut self,
        parts: &ShadowParts,
        timing: &RevealTiming,
        ticket: &AnimationTicket,
        done: Completion,
    ) {
        self.cancel_fade();
        let keyframes = js::keyframes("opacity", [1.0_f64, 0.0_f64]);
        let options: KeyframeAnimationOptions =
            js::dict_as(&[("duration", f64::from(timing.close_fade_ms).into())]);
        let animation = parts
            .dialog
            .animate_with_keyframe_animation_options(Some(&keyframes), &options);
        match animation.finished() {
            Ok(finished) => settle(finished, ticket.clone(), done),
            Err(err) => {
                gloo::console::warn!("course-clear: fade promise unavailable", js_err(err));
                defer(ticket, done);
            }
        }
        self.fade = Some(animation);
    }

    pub(crate) fn cancel_fade(&mut self) {
        if let Some(fade) = self.fade.take() {
            fade.cancel();
        }
    }

    /// Stops the entrance synchronously: timers and frames are dropped,
    /// started bar animations are finished and every node is removed.
    pub(crate) fn cancel_entrance(&mut self) {
        self.wave_interval.borrow_mut().take();
        self.content_watch = None;
        for animation in self.bar_animations.borrow_mut().drain(..) {
            let _ = animation.finish();
        }
        self.clear_curtains();
        self.clear_bars();
    }

    pub(crate) fn teardown(&mut self) {
        self.cancel_entrance();
        self.cancel_fade();
    }

    /// Brings classes, visibility and decorations in line with `view`.
    pub(crate) fn reconcile(&mut self, parts: &ShadowParts, view: &RevealView) {
        let display = if view.dialog_visible { "" } else { "none" };
        let _ = parts.dialog.style().set_property("display", display);
        let classes = parts.dialog.class_list();
        let _ = classes.toggle_with_force(CURTAINS_FINISHED_MARKER, view.curtains_finished);
        let _ = classes.toggle_with_force(WAVE_FINISHED_MARKER, view.wave_finished);
        let greeting_display = if view.greeting_visible { "" } else { "none" };
        let _ = parts.greeting.style().set_property("display", greeting_display);
        if !view.curtains {
            self.clear_curtains();
        }
        if view.bars == 0 {
            self.clear_bars();
        }
        if !view.curtains_finished {
            self.content_watch = None;
        }
    }

    pub(crate) fn wave_ticking(&self) -> bool {
        self.wave_interval.borrow().is_some()
    }

    pub(crate) fn decoration_count(&self) -> usize {
        self.curtains.len() + self.bars.len()
    }

    fn clear_curtains(&mut self) {
        self.curtain_frames.borrow_mut().clear();
        self.curtain_listener = None;
        for curtain in self.curtains.drain(..) {
            curtain.remove();
        }
    }

    fn clear_bars(&mut self) {
        self.wave_interval.borrow_mut().take();
        self.bar_animations.borrow_mut().clear();
        for bar in self.bars.drain(..) {
            bar.remove();
        }
    }
}

fn decoration(classes: &[&str]) -> Option<HtmlElement> {
    let document = js::document().ok()?;
    let element = document.create_element("div").ok()?;
    element.set_class_name(&classes.join(" "));
    element.dyn_into::<HtmlElement>().ok()
}

fn settle(finished: Promise, ticket: AnimationTicket, done: Completion) {
    spawn_local(async move {
        // rejects with AbortError when canceled; the ticket decides either way
        let _ = JsFuture::from(finished).await;
        if ticket.is_live() {
            done();
        }
    });
}

/// Completes on a microtask so callers never re-enter the element while
/// it is applying effects.
fn defer(ticket: &AnimationTicket, done: Completion) {
    settle(Promise::resolve(&wasm_bindgen::JsValue::UNDEFINED), ticket.clone(), done);
}
