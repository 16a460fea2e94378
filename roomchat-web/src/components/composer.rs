use web_sys::HtmlInputElement;
use yew::{Callback, Html, Properties, TargetCast, function_component, html};

#[derive(Properties, PartialEq, Clone)]
pub struct ComposerProps {
    pub text: String,
    pub on_text_change: Callback<String>,
    pub on_submit: Callback<()>,
    #[prop_or(false)]
    pub disabled: bool,
}

/// Single-line input; Enter sends.
#[function_component(Composer)]
pub fn composer(props: &ComposerProps) -> Html {
    let on_input = {
        let on_text_change = props.on_text_change.clone();
        Callback::from(move |event: yew::events::InputEvent| {
            let target: HtmlInputElement = event.target_unchecked_into();
            on_text_change.emit(target.value());
        })
    };

    let on_keydown = {
        let on_submit = props.on_submit.clone();
        let disabled = props.disabled;
        Callback::from(move |event: yew::events::KeyboardEvent| {
            if event.key() == "Enter" && !disabled {
                event.prevent_default();
                on_submit.emit(());
            }
        })
    };

    let on_submit = {
        let on_submit = props.on_submit.clone();
        Callback::from(move |event: yew::events::SubmitEvent| {
            event.prevent_default();
            on_submit.emit(());
        })
    };

    html! {
        <form class="flex items-center gap-2" onsubmit={on_submit}>
            <input
                class="input input-bordered flex-1"
                type="text"
                placeholder="Type a message"
                value={props.text.clone()}
                oninput={on_input}
                onkeydown={on_keydown}
                disabled={props.disabled}
            />
            <button
                class="btn btn-primary"
                type="submit"
                disabled={props.disabled || props.text.is_empty()}
            >
                {"Send"}
            </button>
        </form>
    }
}
