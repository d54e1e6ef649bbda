use std::future::Future;

use fetch_state::{FetchOptions, FetchState, Resource, producer};
use payloads::{ClientError, Envelope, ErrorInfo};
use serde::de::DeserializeOwned;
use yew::platform::spawn_local;
use yew::prelude::*;

use crate::components::LoadError;

/// Generic fetch hook return type
pub struct FetchHookReturn<A: 'static, T> {
    pub data: FetchState<T>,
    pub is_loading: bool,
    pub error: Option<ErrorInfo>,
    /// Fetch with explicit arguments.
    pub execute: Callback<A>,
    /// Fetch again with default arguments.
    pub refetch: Callback<()>,
    pub reset: Callback<()>,
}

impl<A: 'static, T: Clone> FetchHookReturn<A, T> {
    /// Returns true if this is the initial load (data not yet fetched,
    /// currently loading, and no error).
    pub fn is_initial_loading(&self) -> bool {
        self.is_loading && !self.data.is_fetched() && self.error.is_none()
    }

    /// Render based on fetch state with contextual loading/error messages.
    ///
    /// Without data this shows "Loading {context}..." or the error with a
    /// retry button. With data, `render_fn` receives the data, whether a
    /// refetch is in progress, and the error of a failed refetch (the
    /// previous data is still shown).
    pub fn render<F>(&self, context: &str, render_fn: F) -> Html
    where
        F: Fn(&T, bool, Option<&ErrorInfo>) -> Html,
    {
        match self.data.as_ref() {
            None if self.is_loading => html! {
                <div class="text-center py-12">
                    <p class="text-neutral-600 dark:text-neutral-400">
                        {format!("Loading {}...", context)}
                    </p>
                </div>
            },
            None => match &self.error {
                Some(error) => html! {
                    <LoadError
                        message={format!("Error loading {}: {}", context, error)}
                        on_retry={self.refetch.clone()}
                    />
                },
                None => html! {
                    <div class="text-center py-12">
                        <p class="text-neutral-600 dark:text-neutral-400">
                            {format!("No {} found", context)}
                        </p>
                    </div>
                },
            },
            Some(data) => render_fn(data, self.is_loading, self.error.as_ref()),
        }
    }
}

/// Single-resource fetch over a [`Resource`].
///
/// `fetch_fn` and `options` may change between renders; the latest ones
/// are used for the next request. When `options.immediate` is set the
/// resource is loaded with `A::default()` on mount and whenever `deps`
/// changes. Results that settle after unmount are dropped.
///
/// # Example
///
/// ```rust,ignore
/// let api = use_api();
/// let article = use_fetch(
///     id,
///     move |_: ()| {
///         let api = api.clone();
///         async move { api.get_article(ArticleId(id)).await }
///     },
///     FetchOptions::default(),
/// );
/// ```
#[hook]
pub fn use_fetch<A, T, D, F, Fut>(
    deps: D,
    fetch_fn: F,
    options: FetchOptions<T>,
) -> FetchHookReturn<A, T>
where
    A: Default + 'static,
    T: Clone + DeserializeOwned + 'static,
    D: PartialEq + 'static,
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
{
    let update = use_force_update();
    let fetch_fn = producer(fetch_fn);

    let resource = {
        let fetch_fn = fetch_fn.clone();
        use_memo((), move |_| {
            let resource = Resource::new(fetch_fn);
            resource.subscribe(move || update.force_update());
            resource
        })
    };
    resource.set_producer(fetch_fn);
    resource.set_options(options);

    // Stop writing to state once unmounted
    {
        let resource = resource.clone();
        use_effect_with((), move |_| move || resource.dispose());
    }

    // Load on mount and when deps change
    {
        let resource = resource.clone();
        use_effect_with(deps, move |_| {
            if resource.is_immediate() {
                spawn_local(async move {
                    let _ = resource.refetch().await;
                });
            }
        });
    }

    let state = resource.snapshot();
    FetchHookReturn {
        data: state.data,
        is_loading: state.loading,
        error: state.error,
        execute: {
            let resource = resource.clone();
            Callback::from(move |args: A| {
                let resource = resource.clone();
                spawn_local(async move {
                    let _ = resource.execute(args).await;
                });
            })
        },
        refetch: {
            let resource = resource.clone();
            Callback::from(move |_| {
                let resource = resource.clone();
                spawn_local(async move {
                    let _ = resource.refetch().await;
                });
            })
        },
        reset: Callback::from(move |_| resource.reset()),
    }
}
