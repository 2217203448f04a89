/// Reusable UI components

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct SpinnerProps {
    #[prop_or_default]
    pub id: Option<AttrValue>,
    #[prop_or(false)]
    pub small: bool,
    #[prop_or_default]
    pub class: AttrValue,
}

#[function_component(Spinner)]
pub fn spinner(props: &SpinnerProps) -> Html {
    let mut class = classes!("spinner-border");
    if props.small {
        class.push("spinner-border-sm");
    }
    class.push(props.class.to_string());

    html! {
        <span id={props.id.clone()} class={class} role="status" aria-label="Loading"></span>
    }
}

#[derive(Properties, PartialEq)]
pub struct IconButtonProps {
    pub onclick: Callback<MouseEvent>,
    pub children: Children,
    #[prop_or_default]
    pub id: Option<AttrValue>,
    #[prop_or_default]
    pub class: AttrValue,
    #[prop_or(false)]
    pub disabled: bool,
}

#[function_component(IconButton)]
pub fn icon_button(props: &IconButtonProps) -> Html {
    html! {
        <button
            id={props.id.clone()}
            class={props.class.clone()}
            onclick={props.onclick.clone()}
            disabled={props.disabled}
        >
            {props.children.clone()}
        </button>
    }
}

#[derive(Properties, PartialEq)]
pub struct ErrorAlertProps {
    pub message: AttrValue,
}

#[function_component(ErrorAlert)]
pub fn error_alert(props: &ErrorAlertProps) -> Html {
    html! {
        <div class="alert alert-danger d-flex align-items-center gap-2" role="alert">
            <i class="bi bi-exclamation-triangle-fill"></i>
            <span>{props.message.clone()}</span>
        </div>
    }
}

/// Dim a button label while an extraction is running
pub fn label_style(loading: bool) -> &'static str {
    if loading { "opacity: 0.6;" } else { "opacity: 1;" }
}
