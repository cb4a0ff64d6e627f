use course_clear_core::{
    AnimationTicket, CancelGesture, DialogFlags, Effect, OpenRequest, RevealMachine, RevealPhase,
};

/// Headless stand-in for the DOM stage: applies effects the way the browser
/// layer does and queues completions so tests can fire them in order.
#[derive(Default)]
struct Scene {
    modal_open: bool,
    attr_open: bool,
    greeting: String,
    curtains: usize,
    bars: usize,
    fading: bool,
    native_close_pending: bool,
    curtain_done: Option<AnimationTicket>,
    wave_done: Option<AnimationTicket>,
    fade_done: Option<AnimationTicket>,
    events: Vec<&'static str>,
}

impl Scene {
    fn apply(&mut self, machine: &RevealMachine, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ShowModal => self.modal_open = true,
                Effect::SetGreeting(text) => self.greeting = text,
                Effect::PlayCurtains(ticket) => {
                    self.curtains = 2;
                    self.curtain_done = Some(ticket);
                }
                Effect::PlayWave { ticket, bars } => {
                    self.bars = bars;
                    self.wave_done = Some(ticket);
                }
                Effect::CancelEntrance => {
                    self.curtains = 0;
                    self.bars = 0;
                    self.curtain_done = None;
                    self.wave_done = None;
                }
                Effect::PlayFade(ticket) => {
                    self.fading = true;
                    self.fade_done = Some(ticket);
                }
                Effect::CancelFade => {
                    self.fading = false;
                    self.fade_done = None;
                }
                Effect::CloseModal => {
                    if self.modal_open {
                        self.modal_open = false;
                        self.native_close_pending = true;
                    }
                }
                Effect::ReflectOpen(open) => self.attr_open = open,
                Effect::EmitOpened => self.events.push("opened"),
                Effect::EmitClosed => self.events.push("closed"),
            }
        }
        let view = machine.view();
        if !view.curtains {
            self.curtains = 0;
        }
        if view.bars == 0 {
            self.bars = 0;
        }
    }

    fn decorations(&self) -> usize {
        self.curtains + self.bars
    }
}

struct Harness {
    machine: RevealMachine,
    scene: Scene,
    flags: DialogFlags,
}

impl Harness {
    fn new() -> Self {
        let mut harness = Self {
            machine: RevealMachine::default(),
            scene: Scene::default(),
            flags: DialogFlags::default(),
        };
        let effects = harness.machine.attach(false, &request("Hello World!"));
        harness.scene.apply(&harness.machine, effects);
        harness
    }

    fn set_open(&mut self, open: bool) {
        self.scene.attr_open = open;
        let effects = self.machine.set_open(open, &request("Hello World!"));
        self.scene.apply(&self.machine, effects);
    }

    fn finish_curtains(&mut self) {
        if let Some(ticket) = self.scene.curtain_done.take() {
            let effects = self.machine.curtains_finished(&ticket);
            self.scene.apply(&self.machine, effects);
        }
    }

    fn finish_wave(&mut self) {
        if let Some(ticket) = self.scene.wave_done.take() {
            let effects = self.machine.wave_finished(&ticket);
            self.scene.apply(&self.machine, effects);
        }
    }

    fn settle_content(&mut self) {
        let effects = self.machine.content_settled();
        self.scene.apply(&self.machine, effects);
    }

    fn finish_fade(&mut self) {
        if let Some(ticket) = self.scene.fade_done.take() {
            self.scene.fading = false;
            let effects = self.machine.fade_finished(&ticket);
            self.scene.apply(&self.machine, effects);
        }
    }

    fn flush_native_close(&mut self) {
        if std::mem::take(&mut self.scene.native_close_pending) {
            let effects = self.machine.native_closed();
            self.scene.apply(&self.machine, effects);
        }
    }

    fn run_entrance(&mut self) {
        self.finish_curtains();
        self.settle_content();
        self.finish_wave();
    }

    fn gesture(&mut self, gesture: CancelGesture) {
        let effects = self.machine.cancel_gesture(gesture, self.flags);
        self.scene.apply(&self.machine, effects);
    }
}

fn request(greeting: &str) -> OpenRequest {
    OpenRequest {
        greeting: greeting.to_string(),
        viewport_width: 1280.0,
    }
}

#[test]
fn open_then_immediate_close_leaves_nothing_behind() {
    let mut harness = Harness::new();
    harness.set_open(true);
    assert_eq!(harness.scene.curtains, 2);
    harness.set_open(false);
    harness.flush_native_close();

    assert_eq!(harness.machine.phase(), RevealPhase::Closed);
    assert!(!harness.scene.modal_open);
    assert_eq!(harness.scene.decorations(), 0);
    assert!(harness.machine.active().is_none());
    assert_eq!(harness.scene.events, vec!["closed"]);
}

#[test]
fn close_mid_wave_removes_bars() {
    let mut harness = Harness::new();
    harness.set_open(true);
    harness.finish_curtains();
    assert_eq!(harness.scene.bars, 22);
    let stale = harness.scene.wave_done.clone();
    harness.set_open(false);
    assert_eq!(harness.scene.decorations(), 0);

    // a late completion from the canceled run must not resurrect anything
    if let Some(ticket) = stale {
        assert!(harness.machine.wave_finished(&ticket).is_empty());
    }
    harness.flush_native_close();
    assert_eq!(harness.scene.events, vec!["closed"]);
}

#[test]
fn full_entrance_emits_opened_once() {
    let mut harness = Harness::new();
    harness.set_open(true);
    harness.run_entrance();
    harness.settle_content();

    let view = harness.machine.view();
    assert_eq!(harness.machine.phase(), RevealPhase::Open);
    assert!(view.curtains_finished);
    assert!(view.wave_finished);
    assert!(!view.greeting_visible);
    assert_eq!(harness.scene.greeting, "Hello World!");
    assert_eq!(harness.scene.decorations(), 0);
    assert_eq!(harness.scene.events, vec!["opened"]);
}

#[test]
fn repeated_cycles_end_like_a_single_cycle() {
    let mut single = Harness::new();
    single.set_open(true);
    single.run_entrance();

    let mut cycled = Harness::new();
    for _ in 0..3 {
        cycled.set_open(true);
        cycled.run_entrance();
        cycled.set_open(false);
        cycled.finish_fade();
        cycled.flush_native_close();
        assert_eq!(cycled.machine.phase(), RevealPhase::Closed);
        assert_eq!(cycled.scene.decorations(), 0);
    }
    cycled.set_open(true);
    cycled.run_entrance();

    assert_eq!(cycled.machine.phase(), single.machine.phase());
    assert_eq!(cycled.machine.view(), single.machine.view());
    assert_eq!(cycled.scene.decorations(), 0);
    assert!(cycled.scene.modal_open);
    assert_eq!(
        cycled.scene.events,
        vec!["opened", "closed", "opened", "closed", "opened", "closed", "opened"]
    );
}

#[test]
fn rapid_toggling_never_runs_two_entrances() {
    let mut harness = Harness::new();
    let mut tickets = Vec::new();
    for _ in 0..5 {
        harness.set_open(true);
        tickets.extend(harness.scene.curtain_done.clone());
        harness.set_open(false);
    }
    harness.set_open(true);
    let live: Vec<_> = tickets.iter().filter(|ticket| ticket.is_live()).collect();
    assert!(live.is_empty());
    assert!(harness.scene.curtain_done.as_ref().is_some_and(|ticket| ticket.is_live()));
    assert_eq!(harness.scene.curtains, 2);
}

#[test]
fn escape_without_flag_keeps_dialog_open() {
    let mut harness = Harness::new();
    harness.set_open(true);
    harness.run_entrance();
    harness.gesture(CancelGesture::Escape);
    assert!(harness.machine.is_open());
    assert!(harness.scene.modal_open);
    assert!(harness.scene.attr_open);
}

#[test]
fn backdrop_click_with_flag_eventually_closes() {
    let mut harness = Harness::new();
    harness.flags.close_on_outside_click = true;
    harness.set_open(true);
    harness.run_entrance();
    harness.gesture(CancelGesture::Backdrop);
    assert!(!harness.scene.attr_open);
    assert!(harness.scene.fading);
    harness.finish_fade();
    harness.flush_native_close();
    assert_eq!(harness.scene.events, vec!["opened", "closed"]);
    assert!(!harness.scene.modal_open);
}

#[test]
fn redundant_set_open_emits_nothing() {
    let mut harness = Harness::new();
    harness.set_open(false);
    assert!(harness.scene.events.is_empty());
    assert_eq!(harness.machine.generation(), 0);
    harness.set_open(true);
    harness.run_entrance();
    let generation = harness.machine.generation();
    harness.set_open(true);
    assert_eq!(harness.machine.generation(), generation);
    assert_eq!(harness.scene.events, vec!["opened"]);
}
