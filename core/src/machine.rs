//! Open/close state machine for the reveal dialog.
//!
//! The machine never touches the DOM. Every input returns the ordered
//! [`Effect`]s the host must perform, and [`RevealMachine::view`] describes
//! what the dialog should look like once those effects ran.
//!
//! Phases: `Closed → CurtainsRunning → WaveRunning → Revealing → Open`, and
//! `Open/Revealing → Closing → Closed` for the fade. Closing while an
//! entrance handle is live skips the fade entirely.
//!
//! Completions carry the [`AnimationTicket`] they were started with; tickets
//! from a superseded or canceled run produce no effects.

use crate::attrs::DialogFlags;
use crate::cancel::{AnimationHandle, AnimationTicket, EntranceStage};
use crate::timing::RevealTiming;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RevealPhase {
    #[default]
    Closed,
    CurtainsRunning,
    WaveRunning,
    /// Wave done, waiting for the slotted content to finish its transition.
    Revealing,
    Open,
    Closing,
}

impl RevealPhase {
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }

    pub fn is_entering(self) -> bool {
        matches!(
            self,
            Self::CurtainsRunning | Self::WaveRunning | Self::Revealing
        )
    }
}

/// Host-side inputs read at the moment an open sequence starts.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenRequest {
    pub greeting: String,
    pub viewport_width: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CancelGesture {
    Escape,
    Backdrop,
}

#[derive(Clone, Debug)]
pub enum Effect {
    /// Make the dialog displayable and show it modally.
    ShowModal,
    SetGreeting(String),
    PlayCurtains(AnimationTicket),
    PlayWave { ticket: AnimationTicket, bars: usize },
    /// Stop timers and native animations of the entrance and drop its nodes.
    CancelEntrance,
    PlayFade(AnimationTicket),
    CancelFade,
    CloseModal,
    /// Write the `open` attribute back to the host.
    ReflectOpen(bool),
    EmitOpened,
    EmitClosed,
}

/// What the dialog subtree should look like for the current state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RevealView {
    pub dialog_visible: bool,
    pub curtains_finished: bool,
    pub wave_finished: bool,
    pub greeting_visible: bool,
    pub curtains: bool,
    pub bars: usize,
}

#[derive(Debug, Default)]
pub struct RevealMachine {
    timing: RevealTiming,
    phase: RevealPhase,
    open: bool,
    attached: bool,
    reduced_motion: bool,
    generation: u64,
    active: Option<AnimationHandle>,
    fade: Option<AnimationTicket>,
    greeting: String,
    bars: usize,
    curtains_finished: bool,
    wave_finished: bool,
    content_settled: bool,
    greeting_hidden: bool,
}

impl RevealMachine {
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            timing,
            ..Self::default()
        }
    }

    pub fn timing(&self) -> &RevealTiming {
        &self.timing
    }

    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn greeting(&self) -> &str {
        &self.greeting
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn active(&self) -> Option<&AnimationHandle> {
        self.active.as_ref()
    }

    /// Bar count chosen for the current run, if one is entering.
    pub fn bar_count(&self) -> Option<usize> {
        if self.phase.is_entering() {
            Some(self.bars)
        } else {
            None
        }
    }

    pub fn set_reduced_motion(&mut self, enabled: bool) {
        self.reduced_motion = enabled;
    }

    pub fn view(&self) -> RevealView {
        RevealView {
            dialog_visible: self.phase.is_visible(),
            curtains_finished: self.curtains_finished,
            wave_finished: self.wave_finished,
            greeting_visible: !self.greeting_hidden,
            curtains: self.phase == RevealPhase::CurtainsRunning,
            bars: if self.phase == RevealPhase::WaveRunning {
                self.bars
            } else {
                0
            },
        }
    }

    pub fn attach(&mut self, open: bool, request: &OpenRequest) -> Vec<Effect> {
        if self.attached {
            return Vec::new();
        }
        self.attached = true;
        self.open = open;
        if open {
            self.begin_open(request)
        } else {
            Vec::new()
        }
    }

    pub fn detach(&mut self) -> Vec<Effect> {
        if !self.attached {
            return Vec::new();
        }
        self.attached = false;
        let mut effects = Vec::new();
        self.cancel_running(&mut effects);
        if self.phase.is_visible() {
            effects.push(Effect::CloseModal);
        }
        self.settle_closed();
        effects
    }

    /// Setting the current value is a no-op. While detached the value is
    /// only recorded; `attach` replays it.
    pub fn set_open(&mut self, open: bool, request: &OpenRequest) -> Vec<Effect> {
        if open == self.open {
            return Vec::new();
        }
        self.open = open;
        if !self.attached {
            return Vec::new();
        }
        if open {
            self.begin_open(request)
        } else {
            self.begin_close()
        }
    }

    pub fn curtains_finished(&mut self, ticket: &AnimationTicket) -> Vec<Effect> {
        if !self.attached {
            return Vec::new();
        }
        let Some(handle) = self.active.as_mut() else {
            return Vec::new();
        };
        if !handle.accepts(ticket, EntranceStage::Curtains) {
            return Vec::new();
        }
        handle.advance_to(EntranceStage::Wave);
        let ticket = handle.ticket();
        self.phase = RevealPhase::WaveRunning;
        self.curtains_finished = true;
        vec![Effect::PlayWave {
            ticket,
            bars: self.bars,
        }]
    }

    pub fn wave_finished(&mut self, ticket: &AnimationTicket) -> Vec<Effect> {
        if !self.attached {
            return Vec::new();
        }
        let accepted = self
            .active
            .as_ref()
            .is_some_and(|handle| handle.accepts(ticket, EntranceStage::Wave));
        if !accepted {
            return Vec::new();
        }
        self.active = None;
        self.wave_finished = true;
        self.phase = RevealPhase::Revealing;
        if self.content_settled {
            self.finish_open()
        } else {
            Vec::new()
        }
    }

    /// The slotted content finished sliding in. Only counts while the
    /// curtains marker is set, which is when the content transitions towards
    /// visible.
    pub fn content_settled(&mut self) -> Vec<Effect> {
        if !self.attached || !self.curtains_finished || self.content_settled {
            return Vec::new();
        }
        if !matches!(
            self.phase,
            RevealPhase::WaveRunning | RevealPhase::Revealing
        ) {
            return Vec::new();
        }
        self.content_settled = true;
        self.greeting_hidden = true;
        if self.phase == RevealPhase::Revealing {
            self.finish_open()
        } else {
            Vec::new()
        }
    }

    pub fn fade_finished(&mut self, ticket: &AnimationTicket) -> Vec<Effect> {
        if !self.attached || self.phase != RevealPhase::Closing {
            return Vec::new();
        }
        let matches = self.fade.as_ref().is_some_and(|fade| {
            fade.generation() == ticket.generation() && fade.is_live() && ticket.is_live()
        });
        if !matches {
            return Vec::new();
        }
        self.fade = None;
        self.settle_closed();
        vec![Effect::CloseModal]
    }

    /// The native dialog finished closing.
    pub fn native_closed(&mut self) -> Vec<Effect> {
        if !self.attached {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.phase.is_visible() {
            // closed by something other than this machine
            self.cancel_running(&mut effects);
            self.settle_closed();
            if self.open {
                self.open = false;
                effects.push(Effect::ReflectOpen(false));
            }
        }
        effects.push(Effect::EmitClosed);
        effects
    }

    /// Escape and backdrop clicks never dismiss on their own; they only
    /// become a close request when the matching flag is set.
    pub fn cancel_gesture(&mut self, gesture: CancelGesture, flags: DialogFlags) -> Vec<Effect> {
        if !self.attached || !self.open {
            return Vec::new();
        }
        let honoured = match gesture {
            CancelGesture::Escape => flags.close_on_escape,
            CancelGesture::Backdrop => flags.close_on_outside_click && self.active.is_none(),
        };
        if !honoured {
            return Vec::new();
        }
        self.open = false;
        let mut effects = vec![Effect::ReflectOpen(false)];
        effects.extend(self.begin_close());
        effects
    }

    fn begin_open(&mut self, request: &OpenRequest) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.cancel_running(&mut effects);
        self.generation = self.generation.wrapping_add(1);
        self.greeting = request.greeting.clone();
        self.bars = self.timing.bar_count(request.viewport_width);
        self.curtains_finished = false;
        self.wave_finished = false;
        self.content_settled = false;
        self.greeting_hidden = false;
        effects.push(Effect::SetGreeting(self.greeting.clone()));
        effects.push(Effect::ShowModal);
        if self.reduced_motion {
            self.curtains_finished = true;
            self.wave_finished = true;
            self.content_settled = true;
            self.phase = RevealPhase::Open;
            effects.push(Effect::EmitOpened);
            return effects;
        }
        let handle = AnimationHandle::start(self.generation);
        effects.push(Effect::PlayCurtains(handle.ticket()));
        self.active = Some(handle);
        self.phase = RevealPhase::CurtainsRunning;
        effects
    }

    fn begin_close(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.phase {
            RevealPhase::Closed | RevealPhase::Closing => {}
            _ if self.active.is_some() || self.reduced_motion => {
                self.cancel_running(&mut effects);
                self.settle_closed();
                effects.push(Effect::CloseModal);
            }
            _ => {
                self.generation = self.generation.wrapping_add(1);
                let ticket = AnimationTicket::new(self.generation);
                self.fade = Some(ticket.clone());
                self.phase = RevealPhase::Closing;
                self.curtains_finished = false;
                effects.push(Effect::PlayFade(ticket));
            }
        }
        effects
    }

    fn finish_open(&mut self) -> Vec<Effect> {
        self.phase = RevealPhase::Open;
        vec![Effect::EmitOpened]
    }

    fn cancel_running(&mut self, effects: &mut Vec<Effect>) {
        if let Some(handle) = self.active.take() {
            handle.cancel();
            effects.push(Effect::CancelEntrance);
        }
        if let Some(fade) = self.fade.take() {
            fade.cancel();
            effects.push(Effect::CancelFade);
        }
    }

    fn settle_closed(&mut self) {
        self.phase = RevealPhase::Closed;
        self.curtains_finished = false;
        self.wave_finished = false;
        self.content_settled = false;
        self.greeting_hidden = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> OpenRequest {
        OpenRequest {
            greeting: "Hello World!".to_string(),
            viewport_width: 1024.0,
        }
    }

    fn attached() -> RevealMachine {
        let mut machine = RevealMachine::default();
        assert!(machine.attach(false, &request()).is_empty());
        machine
    }

    fn curtains_ticket(effects: &[Effect]) -> AnimationTicket {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::PlayCurtains(ticket) => Some(ticket.clone()),
                _ => None,
            })
            .expect("curtains started")
    }

    fn wave_ticket(effects: &[Effect]) -> (AnimationTicket, usize) {
        effects
            .iter()
            .find_map(|effect| match effect {
                Effect::PlayWave { ticket, bars } => Some((ticket.clone(), *bars)),
                _ => None,
            })
            .expect("wave started")
    }

    fn has(effects: &[Effect], pred: fn(&Effect) -> bool) -> bool {
        effects.iter().any(pred)
    }

    #[test]
    fn open_starts_with_curtains() {
        let mut machine = attached();
        let effects = machine.set_open(true, &request());
        assert!(matches!(effects[0], Effect::SetGreeting(ref text) if text == "Hello World!"));
        assert!(matches!(effects[1], Effect::ShowModal));
        assert!(matches!(effects[2], Effect::PlayCurtains(_)));
        assert_eq!(machine.phase(), RevealPhase::CurtainsRunning);
        assert!(machine.active().is_some());
        assert_eq!(machine.bar_count(), Some(22));
        let view = machine.view();
        assert!(view.dialog_visible && view.curtains);
        assert_eq!(view.bars, 0);
    }

    #[test]
    fn redundant_open_is_noop() {
        let mut machine = attached();
        machine.set_open(true, &request());
        let generation = machine.generation();
        assert!(machine.set_open(true, &request()).is_empty());
        assert_eq!(machine.generation(), generation);
        let mut closed = attached();
        assert!(closed.set_open(false, &request()).is_empty());
    }

    #[test]
    fn phases_advance_in_order() {
        let mut machine = attached();
        let ticket = curtains_ticket(&machine.set_open(true, &request()));
        let effects = machine.curtains_finished(&ticket);
        let (wave, bars) = wave_ticket(&effects);
        assert_eq!(bars, 22);
        assert_eq!(machine.phase(), RevealPhase::WaveRunning);
        assert!(machine.view().curtains_finished);
        assert_eq!(machine.view().bars, 22);
        assert!(!machine.view().curtains);

        assert!(machine.wave_finished(&wave).is_empty());
        assert_eq!(machine.phase(), RevealPhase::Revealing);
        assert!(machine.active().is_none());
        assert!(machine.view().wave_finished);

        let effects = machine.content_settled();
        assert!(matches!(effects.as_slice(), [Effect::EmitOpened]));
        assert_eq!(machine.phase(), RevealPhase::Open);
        assert!(!machine.view().greeting_visible);
        assert!(machine.content_settled().is_empty());
    }

    #[test]
    fn content_settling_before_wave_defers_opened() {
        let mut machine = attached();
        let ticket = curtains_ticket(&machine.set_open(true, &request()));
        let (wave, _) = wave_ticket(&machine.curtains_finished(&ticket));
        assert!(machine.content_settled().is_empty());
        assert_eq!(machine.phase(), RevealPhase::WaveRunning);
        let effects = machine.wave_finished(&wave);
        assert!(matches!(effects.as_slice(), [Effect::EmitOpened]));
    }

    #[test]
    fn content_transition_ignored_before_curtains() {
        let mut machine = attached();
        machine.set_open(true, &request());
        assert!(machine.content_settled().is_empty());
        assert!(machine.view().greeting_visible);
    }

    #[test]
    fn close_during_entrance_skips_fade() {
        let mut machine = attached();
        let ticket = curtains_ticket(&machine.set_open(true, &request()));
        let effects = machine.set_open(false, &request());
        assert!(matches!(
            effects.as_slice(),
            [Effect::CancelEntrance, Effect::CloseModal]
        ));
        assert!(!ticket.is_live());
        assert_eq!(machine.phase(), RevealPhase::Closed);
        assert_eq!(machine.view(), RevealView {
            greeting_visible: true,
            ..RevealView::default()
        });
        assert!(machine.curtains_finished(&ticket).is_empty());
    }

    #[test]
    fn close_after_entrance_fades() {
        let mut machine = attached();
        let ticket = curtains_ticket(&machine.set_open(true, &request()));
        let (wave, _) = wave_ticket(&machine.curtains_finished(&ticket));
        machine.wave_finished(&wave);
        machine.content_settled();

        let effects = machine.set_open(false, &request());
        let fade = match effects.as_slice() {
            [Effect::PlayFade(fade)] => fade.clone(),
            other => panic!("expected fade, got {other:?}"),
        };
        assert_eq!(machine.phase(), RevealPhase::Closing);
        assert!(!machine.view().curtains_finished);
        assert!(machine.view().wave_finished);
        assert!(machine.view().dialog_visible);

        let effects = machine.fade_finished(&fade);
        assert!(matches!(effects.as_slice(), [Effect::CloseModal]));
        assert!(!machine.view().dialog_visible);
        assert!(!machine.view().wave_finished);

        let effects = machine.native_closed();
        assert!(matches!(effects.as_slice(), [Effect::EmitClosed]));
    }

    #[test]
    fn reopen_during_fade_cancels_it() {
        let mut machine = attached();
        let ticket = curtains_ticket(&machine.set_open(true, &request()));
        let (wave, _) = wave_ticket(&machine.curtains_finished(&ticket));
        machine.wave_finished(&wave);
        let fade = match machine.set_open(false, &request()).as_slice() {
            [Effect::PlayFade(fade)] => fade.clone(),
            other => panic!("expected fade, got {other:?}"),
        };
        let effects = machine.set_open(true, &request());
        assert!(matches!(effects[0], Effect::CancelFade));
        assert!(!fade.is_live());
        assert!(machine.fade_finished(&fade).is_empty());
        assert_eq!(machine.phase(), RevealPhase::CurtainsRunning);
    }

    #[test]
    fn escape_respects_flag() {
        let mut machine = attached();
        machine.set_open(true, &request());
        let flags = DialogFlags::default();
        assert!(machine.cancel_gesture(CancelGesture::Escape, flags).is_empty());
        assert!(machine.is_open());

        let flags = DialogFlags {
            close_on_escape: true,
            close_on_outside_click: false,
        };
        let effects = machine.cancel_gesture(CancelGesture::Escape, flags);
        assert!(matches!(effects[0], Effect::ReflectOpen(false)));
        assert!(has(&effects, |effect| matches!(effect, Effect::CloseModal)));
        assert!(!machine.is_open());
    }

    #[test]
    fn backdrop_ignored_while_entering() {
        let mut machine = attached();
        let ticket = curtains_ticket(&machine.set_open(true, &request()));
        let flags = DialogFlags {
            close_on_escape: false,
            close_on_outside_click: true,
        };
        assert!(machine.cancel_gesture(CancelGesture::Backdrop, flags).is_empty());
        let (wave, _) = wave_ticket(&machine.curtains_finished(&ticket));
        machine.wave_finished(&wave);
        let effects = machine.cancel_gesture(CancelGesture::Backdrop, flags);
        assert!(has(&effects, |effect| matches!(effect, Effect::PlayFade(_))));
    }

    #[test]
    fn detach_cancels_and_guards_callbacks() {
        let mut machine = attached();
        let ticket = curtains_ticket(&machine.set_open(true, &request()));
        let effects = machine.detach();
        assert!(matches!(
            effects.as_slice(),
            [Effect::CancelEntrance, Effect::CloseModal]
        ));
        assert!(machine.curtains_finished(&ticket).is_empty());
        assert!(machine.native_closed().is_empty());
        assert!(machine.is_open());

        let effects = machine.attach(true, &request());
        assert!(has(&effects, |effect| matches!(effect, Effect::PlayCurtains(_))));
    }

    #[test]
    fn open_while_detached_is_replayed() {
        let mut machine = RevealMachine::default();
        assert!(machine.set_open(true, &request()).is_empty());
        let effects = machine.attach(true, &request());
        assert!(has(&effects, |effect| matches!(effect, Effect::ShowModal)));
    }

    #[test]
    fn native_close_resyncs_open() {
        let mut machine = attached();
        let ticket = curtains_ticket(&machine.set_open(true, &request()));
        let effects = machine.native_closed();
        assert!(matches!(
            effects.as_slice(),
            [Effect::CancelEntrance, Effect::ReflectOpen(false), Effect::EmitClosed]
        ));
        assert!(!ticket.is_live());
        assert!(!machine.is_open());
        assert_eq!(machine.phase(), RevealPhase::Closed);
    }

    #[test]
    fn reduced_motion_opens_and_closes_instantly() {
        let mut machine = attached();
        machine.set_reduced_motion(true);
        let effects = machine.set_open(true, &request());
        assert!(matches!(effects.last(), Some(Effect::EmitOpened)));
        assert!(machine.active().is_none());
        let view = machine.view();
        assert!(view.curtains_finished && view.wave_finished);
        let effects = machine.set_open(false, &request());
        assert!(matches!(effects.as_slice(), [Effect::CloseModal]));
    }

    #[test]
    fn narrow_viewport_uses_fewer_bars() {
        let mut machine = attached();
        let narrow = OpenRequest {
            viewport_width: 375.0,
            ..request()
        };
        let ticket = curtains_ticket(&machine.set_open(true, &narrow));
        let (_, bars) = wave_ticket(&machine.curtains_finished(&ticket));
        assert_eq!(bars, 11);
    }
}
