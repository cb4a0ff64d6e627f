use gloo::timers::callback::Timeout;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use course_clear::CourseClearDialog;

const DEFAULT_GREETING: &str = "Hello World!";
const REPLAY_DELAY_MS: u32 = 300;
const STATUS_LOG_LEN: usize = 6;

#[derive(Clone, Copy, PartialEq)]
struct ColorChoice {
    label: &'static str,
    bg: &'static str,
    /// Text colour override for backgrounds the default ink can't sit on.
    color: Option<&'static str>,
}

const COLOR_CHOICES: &[ColorChoice] = &[
    ColorChoice {
        label: "Gold",
        bg: "#f3d41a",
        color: None,
    },
    ColorChoice {
        label: "Red",
        bg: "#e52521",
        color: None,
    },
    ColorChoice {
        label: "Green",
        bg: "#43b047",
        color: None,
    },
    ColorChoice {
        label: "Lemon",
        bg: "#fff59d",
        color: Some("#5d4037"),
    },
];

fn greeting_or_default(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        DEFAULT_GREETING.to_string()
    } else {
        trimmed.to_string()
    }
}

fn push_status(log: &UseStateHandle<Vec<String>>, line: &str) {
    let mut next = (**log).clone();
    next.push(line.to_string());
    if next.len() > STATUS_LOG_LEN {
        next.remove(0);
    }
    log.set(next);
}

#[function_component(App)]
fn app() -> Html {
    let open = use_state(|| false);
    let greeting = use_state(|| AttrValue::from(DEFAULT_GREETING));
    let color_index = use_state(|| 0usize);
    let status = use_state(Vec::<String>::new);
    let greeting_ref = use_node_ref();
    let focus_greeting = use_mut_ref(|| false);
    let replay = use_mut_ref(|| None::<Timeout>);

    let on_submit = {
        let open = open.clone();
        let greeting = greeting.clone();
        let greeting_ref = greeting_ref.clone();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let raw = greeting_ref
                .cast::<HtmlInputElement>()
                .map(|input| input.value())
                .unwrap_or_default();
            greeting.set(AttrValue::from(greeting_or_default(&raw)));
            open.set(true);
        })
    };

    let on_close = {
        let open = open.clone();
        let replay = replay.clone();
        Callback::from(move |_: MouseEvent| {
            replay.borrow_mut().take();
            open.set(false);
        })
    };

    let on_replay = {
        let open = open.clone();
        let replay = replay.clone();
        Callback::from(move |_: MouseEvent| {
            open.set(false);
            let reopen = open.clone();
            *replay.borrow_mut() = Some(Timeout::new(REPLAY_DELAY_MS, move || reopen.set(true)));
        })
    };

    let on_edit = {
        let open = open.clone();
        let replay = replay.clone();
        let focus_greeting = focus_greeting.clone();
        Callback::from(move |event: MouseEvent| {
            event.prevent_default();
            replay.borrow_mut().take();
            *focus_greeting.borrow_mut() = true;
            open.set(false);
        })
    };

    let on_opened = {
        let status = status.clone();
        Callback::from(move |_: ()| push_status(&status, "opened"))
    };

    let on_closed = {
        let open = open.clone();
        let status = status.clone();
        let greeting_ref = greeting_ref.clone();
        let focus_greeting = focus_greeting.clone();
        Callback::from(move |_: ()| {
            open.set(false);
            push_status(&status, "closed");
            if std::mem::take(&mut *focus_greeting.borrow_mut()) {
                if let Some(input) = greeting_ref.cast::<HtmlInputElement>() {
                    let _ = input.focus();
                    input.select();
                }
            }
        })
    };

    let choice = COLOR_CHOICES
        .get(*color_index)
        .copied()
        .unwrap_or(COLOR_CHOICES[0]);
    let color_radios: Html = COLOR_CHOICES
        .iter()
        .enumerate()
        .map(|(index, option)| {
            let setter = color_index.clone();
            let onchange = Callback::from(move |_: Event| setter.set(index));
            html! {
                <label class="color-radio" style={format!("--swatch: {}", option.bg)}>
                    <input
                        type="radio"
                        name="cc-color"
                        value={option.bg}
                        checked={index == *color_index}
                        {onchange}
                    />
                    { option.label }
                </label>
            }
        })
        .collect();

    let status_lines: Html = status
        .iter()
        .map(|line| html! { <li>{ line.clone() }</li> })
        .collect();

    html! {
        <main id="course-clear">
            <form class="cc-form" onsubmit={on_submit}>
                <label for="cc-greeting">{ "Greeting" }</label>
                <input
                    id="cc-greeting"
                    ref={greeting_ref}
                    type="text"
                    placeholder={DEFAULT_GREETING}
                    value={(*greeting).clone()}
                />
                <fieldset class="cc-colors">
                    <legend>{ "Colour" }</legend>
                    { color_radios }
                </fieldset>
                <button type="submit">{ "Clear the course" }</button>
            </form>
            <ul class="cc-status">{ status_lines }</ul>
            <CourseClearDialog
                open={*open}
                greeting={Some((*greeting).clone())}
                close_on_escape={true}
                close_on_outside_click={true}
                bg_color={Some(AttrValue::from(choice.bg))}
                color={choice.color.map(AttrValue::from)}
                {on_opened}
                {on_closed}
            >
                <div class="cc-actions">
                    <button type="button" onclick={on_close}>{ "Close" }</button>
                    <button type="button" onclick={on_replay}>{ "Replay" }</button>
                    <a href="#course-clear" onclick={on_edit}>{ "Change greeting" }</a>
                </div>
            </CourseClearDialog>
        </main>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_greeting_falls_back_to_demo_default() {
        assert_eq!(greeting_or_default("   "), DEFAULT_GREETING);
        assert_eq!(greeting_or_default(" Thanks Mario! "), "Thanks Mario!");
    }

    #[test]
    fn lemon_is_the_only_choice_with_custom_ink() {
        let custom: Vec<_> = COLOR_CHOICES
            .iter()
            .filter(|choice| choice.color.is_some())
            .map(|choice| choice.label)
            .collect();
        assert_eq!(custom, vec!["Lemon"]);
    }
}
