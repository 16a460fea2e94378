use chrono::Local;
use futures::future::abortable;
use futures_util::StreamExt;
use shared::chat::{find_parent, group_by_day, is_own};
use shared::conversation::{self, SendOutcome};
use shared::models::{Message, Timestamp};
use shared::session::{self, SessionState};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Element, ScrollBehavior, ScrollIntoViewOptions};
use yew::prelude::*;
use yew_hooks::use_interval;

use crate::api::log_error;
use crate::app::Services;
use crate::components::{Composer, DaySeparator, MessageBubble, ReplyPreview};

/// Day labels are recomputed on this tick so they roll over at midnight.
const CLOCK_TICK_MS: u32 = 60_000;

#[function_component(ChatPage)]
pub fn chat_page() -> Html {
    let session = use_context::<SessionState>().unwrap_or_default();
    let services = use_context::<Services>();
    let messages = use_state(Vec::<Message>::new);
    let text = use_state(String::new);
    let reply_to = use_state(|| None::<Message>);
    let now = use_state(Local::now);
    let bottom = use_node_ref();

    {
        let now = now.clone();
        use_interval(move || now.set(Local::now()), CLOCK_TICK_MS);
    }

    // Live query, open only while someone is signed in
    {
        let messages = messages.clone();
        let signed_in = session.identity().is_some();
        use_effect_with((services.clone(), signed_in), move |(services, signed_in)| {
            let subscription = services.as_ref().filter(|_| *signed_in).map(|services| {
                let mut snapshots =
                    conversation::subscribe(&*services.store, &services.config.collection);
                let (task, handle) = abortable(async move {
                    while let Some(snapshot) = snapshots.next().await {
                        match snapshot {
                            Ok(list) => messages.set(list),
                            Err(err) => log_error("Live query failed", &err),
                        }
                    }
                });
                spawn_local(async move {
                    let _ = task.await;
                });
                handle
            });

            move || {
                if let Some(handle) = subscription {
                    handle.abort();
                }
            }
        });
    }

    {
        let bottom = bottom.clone();
        use_effect_with((*messages).clone(), move |_| {
            if let Some(element) = bottom.cast::<Element>() {
                let options = ScrollIntoViewOptions::new();
                options.set_behavior(ScrollBehavior::Smooth);
                element.scroll_into_view_with_scroll_into_view_options(&options);
            }
            || ()
        });
    }

    let on_text = {
        let text = text.clone();
        Callback::from(move |value: String| text.set(value))
    };

    let on_select = {
        let reply_to = reply_to.clone();
        Callback::from(move |message: Message| reply_to.set(Some(message)))
    };

    let on_cancel_reply = {
        let reply_to = reply_to.clone();
        Callback::from(move |()| reply_to.set(None))
    };

    let on_submit = {
        let services = services.clone();
        let viewer = session.identity().cloned();
        let text = text.clone();
        let reply_to = reply_to.clone();
        Callback::from(move |()| {
            let Some(services) = services.clone() else {
                return;
            };
            let viewer = viewer.clone();
            let draft = (*text).clone();
            let target = (*reply_to).clone();
            let text = text.clone();
            let reply_to = reply_to.clone();
            spawn_local(async move {
                let outcome = conversation::submit(
                    &*services.store,
                    &services.config.collection,
                    &draft,
                    target.as_ref(),
                    viewer.as_ref(),
                    Timestamp::now(),
                )
                .await;
                match outcome {
                    Ok(SendOutcome::Sent { .. }) => {
                        text.set(String::new());
                        reply_to.set(None);
                    }
                    Ok(SendOutcome::Skipped) => {}
                    Err(err) => log_error("Send failed", &err),
                }
            });
        })
    };

    let on_sign_out = {
        let services = services.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(services) = services.clone() else {
                return;
            };
            spawn_local(async move {
                if let Err(err) = session::sign_out(&*services.auth).await {
                    log_error("Sign-out failed", &err);
                }
            });
        })
    };

    let Some(viewer) = session.identity() else {
        return html! {};
    };

    let loaded: &[Message] = &messages;
    let groups = group_by_day(loaded, &*now);

    html! {
        <div class="flex flex-col h-screen">
            <header class="navbar bg-base-200 border-b border-base-300">
                <div class="flex-1 px-2 font-semibold">{"Roomchat"}</div>
                <div class="flex-none flex items-center gap-2">
                    <span class="text-sm">{ viewer.label() }</span>
                    <button class="btn btn-ghost btn-sm" type="button" onclick={on_sign_out}>
                        {"Sign out"}
                    </button>
                </div>
            </header>
            <main class="flex-1 overflow-y-auto p-4">
                { for groups.iter().map(|group| html! {
                    <>
                        <DaySeparator label={group.label} />
                        { for group.messages.iter().map(|message| html! {
                            <MessageBubble
                                key={message.id.clone()}
                                message={(*message).clone()}
                                parent={find_parent(loaded, message).cloned()}
                                own={is_own(message, viewer)}
                                on_select={on_select.clone()}
                            />
                        }) }
                    </>
                }) }
                <div ref={bottom}></div>
            </main>
            <footer class="border-t border-base-300 p-4 bg-base-200">
                if let Some(target) = &*reply_to {
                    <ReplyPreview target={target.clone()} on_cancel={on_cancel_reply} />
                }
                <Composer text={(*text).clone()} on_text_change={on_text} {on_submit} />
            </footer>
        </div>
    }
}
