use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlDialogElement, HtmlElement, ShadowRoot, ShadowRootInit, ShadowRootMode};

use course_clear_core::RevealTiming;

use crate::error::ElementError;
use crate::styles::{self, CHILDREN_CLASS, CONTENT_CLASS, DIALOG_CLASS, GREETING_CLASS};

/// Nodes of the shadow template the stage drives.
pub(crate) struct ShadowParts {
    pub(crate) root: ShadowRoot,
    pub(crate) dialog: HtmlDialogElement,
    pub(crate) greeting: HtmlElement,
    pub(crate) children: HtmlElement,
}

pub(crate) fn render(host: &Element, timing: &RevealTiming) -> Result<ShadowParts, ElementError> {
    let root = match host.shadow_root() {
        Some(root) => root,
        None => host
            .attach_shadow(&ShadowRootInit::new(ShadowRootMode::Open))
            .map_err(|err| ElementError::Shadow(crate::error::js_err(err)))?,
    };
    root.set_inner_html(&template(timing));
    let dialog = find::<HtmlDialogElement>(&root, DIALOG_CLASS, "dialog")?;
    let greeting = find::<HtmlElement>(&root, GREETING_CLASS, "greeting")?;
    let children = find::<HtmlElement>(&root, CHILDREN_CLASS, "children")?;
    Ok(ShadowParts {
        root,
        dialog,
        greeting,
        children,
    })
}

fn template(timing: &RevealTiming) -> String {
    format!(
        r#"<dialog class="{DIALOG_CLASS}" style="display: none">
  <style>{css}</style>
  <div class="{CONTENT_CLASS}">
    <div class="{GREETING_CLASS}"></div>
    <div class="{CHILDREN_CLASS}"><slot></slot></div>
  </div>
</dialog>"#,
        css = styles::stylesheet(timing),
    )
}

fn find<T: JsCast>(root: &ShadowRoot, class: &str, label: &'static str) -> Result<T, ElementError> {
    root.query_selector(&format!(".{class}"))?
        .and_then(|node| node.dyn_into::<T>().ok())
        .ok_or(ElementError::MissingPart(label))
}
