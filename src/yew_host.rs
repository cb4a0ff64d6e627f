use gloo::events::EventListener;
use web_sys::HtmlElement;
use yew::prelude::*;

use course_clear_core::attrs::{
    ATTR_GREETING, BG_COLOR_PROPERTY, COLOR_PROPERTY, EVENT_CLOSED, EVENT_OPENED,
};

use crate::element::CourseClearElement;
use crate::registry;

#[derive(Properties, PartialEq)]
pub struct CourseClearDialogProps {
    pub open: bool,
    #[prop_or_default]
    pub greeting: Option<AttrValue>,
    #[prop_or_default]
    pub close_on_escape: bool,
    #[prop_or_default]
    pub close_on_outside_click: bool,
    /// Overrides `--cc-custom-bg-color`.
    #[prop_or_default]
    pub bg_color: Option<AttrValue>,
    /// Overrides `--cc-custom-color`.
    #[prop_or_default]
    pub color: Option<AttrValue>,
    #[prop_or_default]
    pub on_opened: Callback<()>,
    /// Fires for every close, including Escape and backdrop dismissals; the
    /// parent should treat it as `open = false`.
    #[prop_or_default]
    pub on_closed: Callback<()>,
    #[prop_or_default]
    pub children: Html,
}

/// `<course-clear>` wrapped as a yew component. The host element is upgraded
/// on mount and released on unmount.
#[function_component(CourseClearDialog)]
pub fn course_clear_dialog(props: &CourseClearDialogProps) -> Html {
    let host_ref = use_node_ref();
    let element = use_mut_ref(|| None::<CourseClearElement>);

    {
        let host_ref = host_ref.clone();
        let element = element.clone();
        use_effect_with((), move |_| {
            let host = host_ref.cast::<HtmlElement>();
            if let Some(host) = host.clone() {
                match registry::upgrade(host) {
                    Ok(upgraded) => *element.borrow_mut() = Some(upgraded),
                    Err(err) => {
                        gloo::console::warn!(format!("course-clear: upgrade failed: {err}"))
                    }
                }
            }
            move || {
                element.borrow_mut().take();
                if let Some(host) = host {
                    registry::release(&host);
                }
            }
        });
    }

    {
        let host_ref = host_ref.clone();
        let on_opened = props.on_opened.clone();
        let on_closed = props.on_closed.clone();
        use_effect_with((on_opened, on_closed), move |(on_opened, on_closed)| {
            let mut listeners = Vec::new();
            if let Some(host) = host_ref.cast::<HtmlElement>() {
                let on_opened = on_opened.clone();
                listeners.push(EventListener::new(&host, EVENT_OPENED, move |_| {
                    on_opened.emit(())
                }));
                let on_closed = on_closed.clone();
                listeners.push(EventListener::new(&host, EVENT_CLOSED, move |_| {
                    on_closed.emit(())
                }));
            }
            move || drop(listeners)
        });
    }

    {
        let element = element.clone();
        let greeting = props.greeting.clone();
        let flags = (props.close_on_escape, props.close_on_outside_click);
        use_effect_with((greeting, flags), move |(greeting, (escape, outside))| {
            if let Some(element) = element.borrow().as_ref() {
                match greeting {
                    Some(greeting) => element.set_greeting(greeting),
                    None => {
                        let _ = element.host().remove_attribute(ATTR_GREETING);
                    }
                }
                element.set_close_on_escape(*escape);
                element.set_close_on_outside_click(*outside);
            }
            || ()
        });
    }

    {
        let element = element.clone();
        use_effect_with(props.open, move |open| {
            // clone out of the cell: set_open may emit into parent callbacks
            let current = element.borrow().clone();
            if let Some(element) = current {
                element.set_open(*open);
            }
            || ()
        });
    }

    let style = theme_style(props.bg_color.as_deref(), props.color.as_deref());
    html! {
        <course-clear ref={host_ref} style={style}>
            { props.children.clone() }
        </course-clear>
    }
}

fn theme_style(bg_color: Option<&str>, color: Option<&str>) -> Option<AttrValue> {
    let mut style = String::new();
    if let Some(bg_color) = bg_color {
        style.push_str(&format!("{BG_COLOR_PROPERTY}: {bg_color};"));
    }
    if let Some(color) = color {
        style.push_str(&format!("{COLOR_PROPERTY}: {color};"));
    }
    if style.is_empty() {
        None
    } else {
        Some(AttrValue::from(style))
    }
}
