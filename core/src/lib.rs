pub mod attrs;
pub mod cancel;
pub mod machine;
pub mod timing;
pub mod wave;

pub use attrs::{normalize_greeting, DialogFlags, DEFAULT_GREETING, TAG_NAME};
pub use cancel::{AnimationHandle, AnimationTicket, CancelToken, EntranceStage};
pub use machine::{
    CancelGesture, Effect, OpenRequest, RevealMachine, RevealPhase, RevealView,
};
pub use timing::{RevealTiming, TimingError};
pub use wave::{bar_slices, stagger_offset_ms, wave_keyframes, BarSlice, WAVE_SCALE_Y};
