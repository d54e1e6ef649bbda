use fetch_state::MutationOptions;
use payloads::requests::SubscribeNewsletter;
use serde_json::Value;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::hooks::{use_api, use_mutation};

#[function_component]
pub fn NewsletterForm() -> Html {
    let api = use_api();
    let email = use_state(String::new);

    let subscription = {
        let email = email.clone();
        use_mutation(
            move |details: SubscribeNewsletter| {
                let api = api.clone();
                async move { api.subscribe_newsletter(&details).await }
            },
            MutationOptions::<Value>::default()
                .on_success(move |_| email.set(String::new())),
        )
    };

    let on_input = {
        let email = email.clone();
        let reset = subscription.reset.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            email.set(input.value());
            reset.emit(());
        })
    };

    let on_submit = {
        let email = email.clone();
        let mutate = subscription.mutate.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let address = email.trim().to_string();
            if address.is_empty() {
                return;
            }
            mutate.emit(SubscribeNewsletter { email: address });
        })
    };

    html! {
        <div class="mt-12 p-6 rounded-lg border border-neutral-200 dark:border-neutral-700">
            <h3 class="text-lg font-semibold text-neutral-900 dark:text-neutral-100">
                {"Subscribe to the newsletter"}
            </h3>
            <form onsubmit={on_submit} class="mt-4 flex gap-2">
                <input
                    type="email"
                    value={(*email).clone()}
                    oninput={on_input}
                    placeholder="you@example.com"
                    disabled={subscription.is_loading}
                    class="flex-1 px-3 py-2 border border-neutral-300 \
                           dark:border-neutral-600 rounded-md bg-white \
                           dark:bg-neutral-700"
                />
                <button
                    type="submit"
                    disabled={subscription.is_loading}
                    class="px-4 py-2 text-sm font-medium rounded-md \
                           bg-neutral-900 dark:bg-white text-white \
                           dark:text-neutral-900 disabled:opacity-50"
                >
                    {if subscription.is_loading { "Subscribing..." } else { "Subscribe" }}
                </button>
            </form>
            if subscription.success {
                <p class="mt-2 text-sm text-green-700 dark:text-green-400">
                    {"Thanks for subscribing!"}
                </p>
            }
            if let Some(error) = &subscription.error {
                <p class="mt-2 text-sm text-red-600 dark:text-red-400">
                    {&error.message}
                </p>
            }
        </div>
    }
}
