use crate::timing::RevealTiming;

/// Vertical scale of a bar at each evenly spaced keyframe.
pub const WAVE_SCALE_Y: [f64; 10] = [1.0, 0.65, 0.37, 0.45, 0.53, 0.57, 0.54, 0.5, 0.47, 0.50];

pub const WAVE_EASING: &str = "ease-out";

/// CSS `scale` values for the wave keyframes, X fixed at 1.
pub fn wave_keyframes() -> Vec<String> {
    WAVE_SCALE_Y
        .iter()
        .map(|scale_y| format!("1 {scale_y}"))
        .collect()
}

/// Horizontal slice of the viewport covered by one bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BarSlice {
    pub index: usize,
    pub count: usize,
}

impl BarSlice {
    pub fn inset_inline_start(&self) -> String {
        format!("calc(100% / {} * {})", self.count, self.index)
    }

    /// One pixel wider than the slice so neighbouring bars never show a seam.
    pub fn width(&self) -> String {
        format!("calc(100% / {} + 1px)", self.count)
    }

    pub fn is_last(&self) -> bool {
        self.index + 1 == self.count
    }
}

pub fn bar_slices(count: usize) -> impl Iterator<Item = BarSlice> {
    (0..count).map(move |index| BarSlice { index, count })
}

pub fn stagger_offset_ms(timing: &RevealTiming, index: usize) -> u32 {
    let index = u32::try_from(index).unwrap_or(u32::MAX);
    timing.bar_stagger_ms.saturating_mul(index)
}
