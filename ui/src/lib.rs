use payloads::APIClient;
use yew::prelude::*;
use yew_router::prelude::*;

mod components;
pub mod config;
mod contexts;
mod hooks;
mod logs;
mod pages;
mod state;
mod utils;

use components::Header;
use contexts::ApiProvider;
use hooks::use_authentication;
pub use state::{AuthState, State};

/// The REST client, pointed at `BACKEND_URL` when it was set at build
/// time and at the page's own origin otherwise.
pub fn get_api_client() -> APIClient {
    let address = config::UiConfig::get()
        .backend_url
        .clone()
        .unwrap_or_else(|| {
            web_sys::window()
                .and_then(|window| window.location().origin().ok())
                .unwrap_or_default()
        });

    APIClient::new(address)
}

#[function_component]
pub fn App() -> Html {
    use_memo((), |_| logs::init_logging());

    html! {
        <ApiProvider>
            <BrowserRouter>
                <Shell />
            </BrowserRouter>
        </ApiProvider>
    }
}

/// Everything below the providers, so hooks here can reach them.
#[function_component]
fn Shell() -> Html {
    use_authentication();

    html! {
        <div class="min-h-screen bg-white dark:bg-gray-900 text-gray-900 dark:text-gray-100 transition-colors">
            <Header />
            <main class="max-w-3xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
                <Switch<Route> render={switch} />
            </main>
        </div>
    }
}

#[derive(Clone, Routable, PartialEq)]
pub enum Route {
    #[at("/")]
    Home,
    #[at("/articles/:id")]
    Article { id: i64 },
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <pages::HomePage /> },
        Route::Article { id } => html! { <pages::ArticlePage {id} /> },
        Route::NotFound => html! { <pages::NotFoundPage /> },
    }
}
