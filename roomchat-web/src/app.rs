use std::rc::Rc;

use futures::future::abortable;
use shared::collab::Navigator;
use shared::session::{SessionGate, SessionState};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;
use yew_router::prelude::{BrowserRouter, Routable, Switch, use_navigator};

use crate::api::{HttpAuth, HttpStore};
use crate::config::FrontendConfig;
use crate::routes::{Route, switch};

/// Collaborators shared by every page.
#[derive(Debug, Clone)]
pub struct Services {
    pub auth: Rc<HttpAuth>,
    pub store: Rc<HttpStore>,
    pub config: Rc<FrontendConfig>,
}

impl Services {
    pub fn new(config: FrontendConfig) -> Self {
        Self {
            auth: Rc::new(HttpAuth::new(&config)),
            store: Rc::new(HttpStore::new(&config)),
            config: Rc::new(config),
        }
    }
}

impl PartialEq for Services {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.auth, &other.auth) && Rc::ptr_eq(&self.store, &other.store)
    }
}

/// Redirects through the router so history stays consistent.
struct RouterNavigator(yew_router::navigator::Navigator);

impl Navigator for RouterNavigator {
    fn redirect(&self, path: &str) {
        self.0.replace(&Route::recognize(path).unwrap_or(Route::Home));
    }
}

fn current_path() -> String {
    web_sys::window()
        .and_then(|window| window.location().pathname().ok())
        .unwrap_or_default()
}

#[derive(Properties, PartialEq)]
pub struct SessionGateProviderProps {
    pub children: Children,
}

/// Follows the auth session for the lifetime of the app and exposes the
/// gate's state to every page through a context.
#[function_component(SessionGateProvider)]
pub fn session_gate_provider(props: &SessionGateProviderProps) -> Html {
    let services = use_context::<Services>();
    let session = use_state(SessionState::default);
    let navigator = use_navigator();

    {
        let session = session.clone();
        use_effect_with(services, move |services| {
            let follower = services.as_ref().zip(navigator).map(|(services, navigator)| {
                let auth = Rc::clone(&services.auth);
                let navigator = RouterNavigator(navigator);
                let (task, handle) = abortable(async move {
                    let mut gate = SessionGate::new();
                    gate.follow(&*auth, &navigator, current_path, |state| {
                        session.set(state.clone());
                    })
                    .await;
                });
                spawn_local(async move {
                    let _ = task.await;
                });
                handle
            });

            move || {
                if let Some(handle) = follower {
                    handle.abort();
                }
            }
        });
    }

    html! {
        <ContextProvider<SessionState> context={(*session).clone()}>
            { props.children.clone() }
        </ContextProvider<SessionState>>
    }
}

#[function_component(App)]
pub fn app() -> Html {
    let services = use_memo((), |_| Services::new(FrontendConfig::new()));

    {
        let auth = Rc::clone(&services.auth);
        use_effect_with((), move |_| {
            spawn_local(async move { auth.restore().await });
            || ()
        });
    }

    html! {
        <ContextProvider<Services> context={(*services).clone()}>
            <BrowserRouter>
                <SessionGateProvider>
                    <Switch<Route> render={switch} />
                </SessionGateProvider>
            </BrowserRouter>
        </ContextProvider<Services>>
    }
}
