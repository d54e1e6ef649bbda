use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_logout;
use crate::{Route, State};

#[function_component]
pub fn Header() -> Html {
    let (state, _) = use_store::<State>();
    let logout = use_logout();

    let session = match state.current_user() {
        Some(user) => html! {
            <>
                <span class="text-sm text-gray-600 dark:text-gray-400">
                    {"Signed in as "}
                    <span class="font-medium text-gray-900 dark:text-white">
                        {&user.username}
                    </span>
                </span>
                <button
                    onclick={logout}
                    class="text-sm font-medium text-gray-700 dark:text-gray-300 \
                           hover:text-gray-900 dark:hover:text-white"
                >
                    {"Log out"}
                </button>
            </>
        },
        None => html! {},
    };

    html! {
        <header class="bg-white dark:bg-gray-800 border-b border-gray-200 dark:border-gray-700">
            <div class="max-w-3xl mx-auto px-4 sm:px-6 lg:px-8">
                <div class="flex justify-between items-center h-16">
                    <div class="flex-shrink-0">
                        <Link<Route> to={Route::Home}>
                            <h1 class="text-xl font-semibold text-gray-900 dark:text-white">
                                {"Articles"}
                            </h1>
                        </Link<Route>>
                    </div>
                    <div class="flex items-center space-x-4">
                        {session}
                    </div>
                </div>
            </div>
        </header>
    }
}
