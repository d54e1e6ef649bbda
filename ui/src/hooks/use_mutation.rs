use std::future::Future;

use fetch_state::{Mutation, MutationOptions, producer};
use payloads::{ClientError, Envelope, ErrorInfo};
use serde::de::DeserializeOwned;
use yew::platform::spawn_local;
use yew::prelude::*;

pub struct MutationHookReturn<A: 'static> {
    pub is_loading: bool,
    pub error: Option<ErrorInfo>,
    pub success: bool,
    pub mutate: Callback<A>,
    pub reset: Callback<()>,
}

/// Mutation hook over a [`Mutation`]. Never runs on its own; `mutate`
/// starts a call and its outcome arrives through the returned state and
/// the `options` callbacks.
#[hook]
pub fn use_mutation<A, T, F, Fut>(
    mutate_fn: F,
    options: MutationOptions<T>,
) -> MutationHookReturn<A>
where
    A: 'static,
    T: DeserializeOwned + 'static,
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<Envelope<T>, ClientError>> + 'static,
{
    let update = use_force_update();
    let mutate_fn = producer(mutate_fn);

    let mutation = {
        let mutate_fn = mutate_fn.clone();
        use_memo((), move |_| {
            let mutation = Mutation::new(mutate_fn);
            mutation.subscribe(move || update.force_update());
            mutation
        })
    };
    mutation.set_producer(mutate_fn);
    mutation.set_options(options);

    {
        let mutation = mutation.clone();
        use_effect_with((), move |_| move || mutation.dispose());
    }

    let state = mutation.snapshot();
    MutationHookReturn {
        is_loading: state.loading,
        error: state.error,
        success: state.success,
        mutate: {
            let mutation = mutation.clone();
            Callback::from(move |args: A| {
                let mutation = mutation.clone();
                spawn_local(async move {
                    let _ = mutation.mutate(args).await;
                });
            })
        },
        reset: Callback::from(move |_| mutation.reset()),
    }
}
