use yew::{Html, html};
use yew_router::prelude::*;

use crate::pages::{ChatPage, HomePage};

/// Application routes. Paths match the session gate's sign-in and chat routes.
#[derive(Debug, Clone, PartialEq, Eq, Routable)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/chat")]
    Chat,
    #[not_found]
    #[at("/404")]
    NotFound,
}

/// Switch function for the application routes.
pub fn switch(route: Route) -> Html {
    web_sys::console::debug_1(&format!("Switching to route: {route:?}").into());
    match route {
        Route::Home => html! { <HomePage /> },
        Route::Chat => html! { <ChatPage /> },
        Route::NotFound => html! { <Redirect<Route> to={Route::Home} /> },
    }
}
