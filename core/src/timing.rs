use std::fmt;

pub const CURTAIN_MS: u32 = 300;
pub const BAR_MS: u32 = 1000;
pub const BAR_STAGGER_MS: u32 = 30;
pub const WIDE_VIEWPORT_PX: f64 = 768.0;
pub const WIDE_BAR_COUNT: usize = 22;
pub const NARROW_BAR_COUNT: usize = 11;
pub const GREETING_BOUNCE_MS: u32 = 2000;
pub const CONTENT_DELAY_MS: u32 = 1800;
pub const CONTENT_FADE_MS: u32 = 300;
pub const CLOSE_FADE_MS: u32 = 200;
pub const BACKDROP_FADE_MS: u32 = 200;
pub const SETTLE_SHADOW_MS: u32 = 1000;

/// Durations and tiers used by one reveal run.
///
/// The defaults reproduce the shipped component; hosts only override them in
/// tests or when they restyle the stylesheet to match.
#[derive(Clone, Debug, PartialEq)]
pub struct RevealTiming {
    pub curtain_ms: u32,
    pub bar_ms: u32,
    pub bar_stagger_ms: u32,
    /// Viewports strictly wider than this use the wide bar tier.
    pub wide_viewport_px: f64,
    pub wide_bar_count: usize,
    pub narrow_bar_count: usize,
    pub greeting_bounce_ms: u32,
    pub content_delay_ms: u32,
    pub content_fade_ms: u32,
    pub close_fade_ms: u32,
    pub backdrop_fade_ms: u32,
    pub settle_shadow_ms: u32,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            curtain_ms: CURTAIN_MS,
            bar_ms: BAR_MS,
            bar_stagger_ms: BAR_STAGGER_MS,
            wide_viewport_px: WIDE_VIEWPORT_PX,
            wide_bar_count: WIDE_BAR_COUNT,
            narrow_bar_count: NARROW_BAR_COUNT,
            greeting_bounce_ms: GREETING_BOUNCE_MS,
            content_delay_ms: CONTENT_DELAY_MS,
            content_fade_ms: CONTENT_FADE_MS,
            close_fade_ms: CLOSE_FADE_MS,
            backdrop_fade_ms: BACKDROP_FADE_MS,
            settle_shadow_ms: SETTLE_SHADOW_MS,
        }
    }
}

impl RevealTiming {
    pub fn bar_count(&self, viewport_width: f64) -> usize {
        if viewport_width > self.wide_viewport_px {
            self.wide_bar_count
        } else {
            self.narrow_bar_count
        }
    }

    /// Time from the first bar starting until the last bar settles.
    pub fn wave_ms(&self, bars: usize) -> u32 {
        if bars == 0 {
            return 0;
        }
        let trailing = u32::try_from(bars - 1).unwrap_or(u32::MAX);
        self.bar_stagger_ms
            .saturating_mul(trailing)
            .saturating_add(self.bar_ms)
    }

    /// Content reveal measured from the moment the curtains finish.
    pub fn content_ms(&self) -> u32 {
        self.content_delay_ms.saturating_add(self.content_fade_ms)
    }

    pub fn entrance_ms(&self, viewport_width: f64) -> u32 {
        let wave = self.wave_ms(self.bar_count(viewport_width));
        self.curtain_ms.saturating_add(wave.max(self.content_ms()))
    }

    pub fn validate(&self) -> Result<(), TimingError> {
        if self.wide_bar_count == 0 || self.narrow_bar_count == 0 {
            return Err(TimingError::NoBars);
        }
        if self.curtain_ms == 0 {
            return Err(TimingError::ZeroDuration { field: "curtain_ms" });
        }
        if self.bar_ms == 0 {
            return Err(TimingError::ZeroDuration { field: "bar_ms" });
        }
        if self.bar_stagger_ms > self.bar_ms {
            return Err(TimingError::StaggerTooLong {
                stagger_ms: self.bar_stagger_ms,
                bar_ms: self.bar_ms,
            });
        }
        if !self.wide_viewport_px.is_finite() || self.wide_viewport_px < 0.0 {
            return Err(TimingError::InvalidBreakpoint(self.wide_viewport_px));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimingError {
    NoBars,
    ZeroDuration { field: &'static str },
    StaggerTooLong { stagger_ms: u32, bar_ms: u32 },
    InvalidBreakpoint(f64),
}

impl fmt::Display for TimingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingError::NoBars => write!(f, "both bar tiers need at least one bar"),
            TimingError::ZeroDuration { field } => write!(f, "{field} must be non-zero"),
            TimingError::StaggerTooLong { stagger_ms, bar_ms } => {
                write!(f, "stagger {stagger_ms}ms exceeds bar duration {bar_ms}ms")
            }
            TimingError::InvalidBreakpoint(value) => {
                write!(f, "invalid viewport breakpoint {value}")
            }
        }
    }
}

impl std::error::Error for TimingError {}
