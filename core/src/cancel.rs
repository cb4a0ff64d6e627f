use std::cell::Cell;
use std::rc::Rc;

/// Shared cancellation flag for one run; clones observe the same state.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_canceled(&self) -> bool {
        self.0.get()
    }
}

/// What a completion callback carries back to the machine.
#[derive(Clone, Debug)]
pub struct AnimationTicket {
    generation: u64,
    token: CancelToken,
}

impl AnimationTicket {
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            token: CancelToken::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_live(&self) -> bool {
        !self.token.is_canceled()
    }

    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntranceStage {
    Curtains,
    Wave,
}

/// The in-flight entrance sequence. Owned by the machine only.
#[derive(Debug)]
pub struct AnimationHandle {
    ticket: AnimationTicket,
    stage: EntranceStage,
}

impl AnimationHandle {
    pub(crate) fn start(generation: u64) -> Self {
        Self {
            ticket: AnimationTicket::new(generation),
            stage: EntranceStage::Curtains,
        }
    }

    pub fn ticket(&self) -> AnimationTicket {
        self.ticket.clone()
    }

    pub fn generation(&self) -> u64 {
        self.ticket.generation
    }

    pub fn stage(&self) -> EntranceStage {
        self.stage
    }

    pub(crate) fn advance_to(&mut self, stage: EntranceStage) {
        self.stage = stage;
    }

    /// Accepts a completion only from this run and only while it is live.
    pub(crate) fn accepts(&self, ticket: &AnimationTicket, stage: EntranceStage) -> bool {
        ticket.generation == self.ticket.generation
            && ticket.is_live()
            && self.ticket.is_live()
            && self.stage == stage
    }

    pub(crate) fn cancel(self) {
        self.ticket.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceling_the_handle_kills_every_ticket() {
        let handle = AnimationHandle::start(4);
        let first = handle.ticket();
        let second = handle.ticket();
        assert!(first.is_live() && second.is_live());
        handle.cancel();
        assert!(!first.is_live());
        assert!(!second.is_live());
        assert_eq!(first.generation(), 4);
    }

    #[test]
    fn handle_rejects_other_generations_and_stages() {
        let mut handle = AnimationHandle::start(2);
        let stale = AnimationTicket::new(1);
        assert!(!handle.accepts(&stale, EntranceStage::Curtains));
        let ticket = handle.ticket();
        assert!(handle.accepts(&ticket, EntranceStage::Curtains));
        assert!(!handle.accepts(&ticket, EntranceStage::Wave));
        handle.advance_to(EntranceStage::Wave);
        assert!(handle.accepts(&ticket, EntranceStage::Wave));
    }

    #[test]
    fn cancel_is_idempotent() {
        let token = CancelToken::new();
        token.cancel();
        token.cancel();
        assert!(token.is_canceled());
    }
}
