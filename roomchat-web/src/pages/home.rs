use shared::session::{self, SessionState};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::api::log_error;
use crate::app::Services;
use crate::components::Loading;

fn provider_label(provider: &str) -> String {
    let mut chars = provider.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

/// Sign-in screen. Signed-in viewers are moved on by the session gate.
#[function_component(HomePage)]
pub fn home_page() -> Html {
    let session = use_context::<SessionState>().unwrap_or_default();
    let services = use_context::<Services>();
    let busy = use_state(|| false);

    let onclick = {
        let services = services.clone();
        let busy = busy.clone();
        Callback::from(move |_: MouseEvent| {
            let Some(services) = services.clone() else {
                return;
            };
            let busy = busy.clone();
            busy.set(true);
            spawn_local(async move {
                if let Err(err) = session::sign_in(&*services.auth).await {
                    log_error("Sign-in failed", &err);
                }
                busy.set(false);
            });
        })
    };

    let provider = services
        .as_ref()
        .map(|services| provider_label(&services.config.provider))
        .unwrap_or_default();

    match session {
        SessionState::Pending => html! { <Loading /> },
        SessionState::SignedIn(_) => html! {},
        SessionState::SignedOut => html! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="card w-full max-w-sm shadow-lg bg-base-100">
                    <div class="card-body items-center text-center">
                        <h2 class="card-title text-2xl">{"Roomchat"}</h2>
                        <button class="btn btn-primary mt-4" type="button" {onclick} disabled={*busy}>
                            { format!("Sign in with {provider}") }
                        </button>
                    </div>
                </div>
            </div>
        },
    }
}
