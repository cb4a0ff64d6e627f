use course_clear_core::attrs::{BG_COLOR_PROPERTY, COLOR_PROPERTY, DEFAULT_BG_COLOR, DEFAULT_COLOR};
use course_clear_core::RevealTiming;

pub(crate) const DIALOG_CLASS: &str = "CourseClear";
pub(crate) const CONTENT_CLASS: &str = "CourseClear__content";
pub(crate) const GREETING_CLASS: &str = "CourseClear__greeting";
pub(crate) const CHILDREN_CLASS: &str = "CourseClear__children";
pub(crate) const BAR_CLASS: &str = "CourseClear__bar";
pub(crate) const CURTAIN_CLASS: &str = "CourseClear__curtain";
pub(crate) const CURTAIN_TOP_CLASS: &str = "CourseClear__curtain--top";
pub(crate) const CURTAIN_BOTTOM_CLASS: &str = "CourseClear__curtain--bottom";

pub(crate) const SHRINK_MARKER: &str = "is-shrink";
pub(crate) const CURTAINS_FINISHED_MARKER: &str = "is-curtains-finished";
pub(crate) const WAVE_FINISHED_MARKER: &str = "is-wave-finished";

/// Stylesheet for the shadow tree. Durations come from `timing` so the CSS
/// transitions and the stage's timers agree.
pub(crate) fn stylesheet(timing: &RevealTiming) -> String {
    format!(
        r#"
:host {{
  position: absolute;
}}

.{dialog} {{
  --cc-bg-color: var({bg_prop}, {bg_default});
  --cc-color: var({color_prop}, {color_default});
  position: fixed;
  inset: 0;
  display: grid;
  place-items: center;
  height: auto;
  max-width: unset;
  width: auto;
  max-height: unset;
  border: none;
  margin: 0;
  padding: 0;
  background-color: transparent;
  box-sizing: border-box;
}}

.{dialog}::backdrop {{
  transition: background-color {backdrop}ms;
  background-color: rgba(0 0 0 / 0);
}}

.{dialog}.{curtains_done}::backdrop {{
  background-color: rgb(0 0 0 / 0.75);
  backdrop-filter: blur(10px);
}}

.{content} {{
  box-sizing: border-box;
  width: 100%;
  min-height: 50%;
  padding: 1rem;
  display: grid;
  place-items: center;
  z-index: 1;
  overflow: clip;
  color: var(--cc-color);
  box-shadow: 0 0.2rem 1rem rgba(0 0 0 / 0);
}}

.{content} > * {{
  grid-area: 1 / 1;
}}

.{wave_done} > .{content} {{
  background-color: var(--cc-bg-color);
  transition: box-shadow ease {settle}ms;
  box-shadow: 0 0.25rem 1rem rgba(0 0 0 / 0.2);
}}

@keyframes cc-bounce {{
  0% {{ opacity: 0; translate: 0 100%; }}
  8% {{ translate: 0 -40%; }}
  10% {{ opacity: 1; translate: 0 -50%; }}
  12% {{ translate: 0 -40%; }}
  20% {{ translate: 0 0; }}
  28% {{ translate: 0 -20%; }}
  30% {{ translate: 0 -25%; }}
  32% {{ translate: 0 -20%; }}
  40% {{ translate: 0 0; }}
  50% {{ translate: 0 0; opacity: 1; }}
  80% {{ translate: 0 0; opacity: 1; }}
  100% {{ translate: -150% 0; opacity: 0; }}
}}

.{greeting} {{
  font-size: min(10vw, 5rem);
  font-family: "Super Mario Maker 2", "Gill Sans", "Gill Sans MT", Calibri, "Trebuchet MS", sans-serif;
  opacity: 0;
  translate: 0 100%;
  text-align: center;
}}

.{dialog}.{curtains_done} .{greeting} {{
  animation: cc-bounce {bounce}ms ease-in-out forwards;
}}

.{children} {{
  opacity: 0;
  translate: 100% 0;
  transition: all {content_fade}ms {content_delay}ms ease-out;
}}

.{dialog}.{curtains_done} .{children} {{
  opacity: 1;
  translate: 0 0;
}}

.{bar} {{
  position: fixed;
  top: 0;
  background-color: var(--cc-bg-color);
  height: 100dvh;
}}

.{curtain} {{
  position: fixed;
  background-color: var(--cc-bg-color);
  height: 50vh;
  inset-inline: 0;
  scale: 1 0;
  transition: scale {curtain_ms}ms ease;
}}

.{curtain}.{curtain_top} {{
  top: 0;
  transform-origin: top;
}}

.{curtain}.{curtain_bottom} {{
  bottom: 0;
  transform-origin: bottom;
}}

.{curtain}.{shrink} {{
  scale: 1 1;
}}

@media (prefers-reduced-motion: reduce) {{
  .{dialog}.{curtains_done} .{greeting} {{
    animation: none;
    opacity: 1;
    translate: 0 0;
  }}
  .{children} {{
    transition: none;
  }}
}}
"#,
        dialog = DIALOG_CLASS,
        content = CONTENT_CLASS,
        greeting = GREETING_CLASS,
        children = CHILDREN_CLASS,
        bar = BAR_CLASS,
        curtain = CURTAIN_CLASS,
        curtain_top = CURTAIN_TOP_CLASS,
        curtain_bottom = CURTAIN_BOTTOM_CLASS,
        shrink = SHRINK_MARKER,
        curtains_done = CURTAINS_FINISHED_MARKER,
        wave_done = WAVE_FINISHED_MARKER,
        bg_prop = BG_COLOR_PROPERTY,
        bg_default = DEFAULT_BG_COLOR,
        color_prop = COLOR_PROPERTY,
        color_default = DEFAULT_COLOR,
        backdrop = timing.backdrop_fade_ms,
        settle = timing.settle_shadow_ms,
        bounce = timing.greeting_bounce_ms,
        content_fade = timing.content_fade_ms,
        content_delay = timing.content_delay_ms,
        curtain_ms = timing.curtain_ms,
    )
}
