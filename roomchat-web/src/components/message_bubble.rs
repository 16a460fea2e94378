use chrono::Local;
use shared::chat::display::excerpt;
use shared::chat::{avatar_initial, avatar_url, display_name, format_time};
use shared::models::Message;
use yew::{Callback, Html, Properties, classes, function_component, html};

const QUOTE_CHARS: usize = 80;

#[derive(Properties, PartialEq, Clone)]
pub struct MessageBubbleProps {
    pub message: Message,
    /// Loaded message this one replies to; absent parents render no quote.
    #[prop_or_default]
    pub parent: Option<Message>,
    /// Sent by the signed-in viewer.
    pub own: bool,
    pub on_select: Callback<Message>,
}

fn avatar(message: &Message) -> Html {
    avatar_url(&message.user).map_or_else(
        || {
            html! {
                <div class="avatar placeholder">
                    <div class="bg-neutral text-neutral-content w-8 rounded-full">
                        <span>{ avatar_initial(&message.user) }</span>
                    </div>
                </div>
            }
        },
        |url| {
            html! {
                <div class="avatar">
                    <div class="w-8 rounded-full">
                        <img src={url.to_string()} alt={display_name(&message.user).to_string()} />
                    </div>
                </div>
            }
        },
    )
}

#[function_component(MessageBubble)]
pub fn message_bubble(props: &MessageBubbleProps) -> Html {
    let onclick = {
        let message = props.message.clone();
        let on_select = props.on_select.clone();
        Callback::from(move |_| on_select.emit(message.clone()))
    };

    let message = &props.message;
    let side = if props.own { "chat-end" } else { "chat-start" };
    let bubble = classes!(
        "chat-bubble",
        "cursor-pointer",
        props.own.then_some("chat-bubble-primary")
    );

    html! {
        <div class={classes!("chat", side)} {onclick}>
            <div class="chat-image">{ avatar(message) }</div>
            if !props.own {
                <div class="chat-header text-xs">{ display_name(&message.user) }</div>
            }
            <div class={bubble}>
                if let Some(parent) = &props.parent {
                    <div class="border-l-2 border-base-content/30 pl-2 mb-1 text-xs opacity-70">
                        <span class="font-semibold">{ display_name(&parent.user) }</span>
                        <span>{ ": " }{ excerpt(&parent.content, QUOTE_CHARS) }</span>
                    </div>
                }
                { message.content.clone() }
            </div>
            <div class="chat-footer text-xs opacity-50">
                { format_time(&message.created_at, &Local) }
            </div>
        </div>
    }
}
