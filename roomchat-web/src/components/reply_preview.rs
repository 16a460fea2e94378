use shared::chat::reply_banner;
use shared::models::Message;
use yew::{Callback, Html, Properties, function_component, html};

#[derive(Properties, PartialEq, Clone)]
pub struct ReplyPreviewProps {
    pub target: Message,
    pub on_cancel: Callback<()>,
}

#[function_component(ReplyPreview)]
pub fn reply_preview(props: &ReplyPreviewProps) -> Html {
    let on_cancel = {
        let on_cancel = props.on_cancel.clone();
        Callback::from(move |_| on_cancel.emit(()))
    };

    html! {
        <div class="flex items-center justify-between gap-2 px-3 py-2 mb-2 rounded bg-base-300 text-sm">
            <span class="truncate">{ reply_banner(&props.target) }</span>
            <button class="btn btn-ghost btn-xs" type="button" onclick={on_cancel}>{"✕"}</button>
        </div>
    }
}
