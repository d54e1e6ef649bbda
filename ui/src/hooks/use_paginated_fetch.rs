use std::collections::BTreeMap;
use std::future::Future;
use std::rc::Rc;

use fetch_state::{PaginatedState, Pager, PagerOptions, ParamsPatch, producer};
use payloads::requests::PageQuery;
use payloads::{ClientError, Envelope};
use serde::de::DeserializeOwned;
use serde_json::Value;
use yew::platform::spawn_local;
use yew::prelude::*;

pub struct PaginatedHookReturn<T> {
    pub state: PaginatedState<T>,
    pub params: PageQuery,
    /// Merge a patch over the current params and fetch.
    pub execute: Callback<Option<ParamsPatch>>,
    pub change_page: Callback<u32>,
    /// Also returns to page 1.
    pub change_limit: Callback<u32>,
    /// Also returns to page 1. An empty value clears that filter.
    pub update_filters: Callback<BTreeMap<String, String>>,
    /// Restore the initial params and fetch.
    pub reset: Callback<()>,
    pub refetch: Callback<()>,
}

/// Run `f` against the pager in the background, dropping its result; the
/// outcome lands in the pager's state.
fn spawn_with<T, A, F, Fut>(pager: &Rc<Pager<T>>, f: F) -> Callback<A>
where
    T: Clone + DeserializeOwned + 'static,
    A: 'static,
    F: Fn(Rc<Pager<T>>, A) -> Fut + 'static,
    Fut: Future + 'static,
{
    let pager = pager.clone();
    Callback::from(move |args: A| {
        let future = f(pager.clone(), args);
        spawn_local(async move {
            future.await;
        });
    })
}

/// Paginated-collection fetch over a [`Pager`].
///
/// Params are seeded once from `{page: 1, limit: 10}` overlaid with
/// `initial`. Replies are normalized whether the items arrive as a flat
/// array or nested under `data`, `articles` and similar keys. When
/// `options.immediate` is set the current page is loaded on mount; a later
/// change of `deps` restores the initial params and loads page 1 again.
#[hook]
pub fn use_paginated_fetch<T, D, F, Fut>(
    deps: D,
    initial: PageQuery,
    fetch_fn: F,
    options: PagerOptions<T>,
) -> PaginatedHookReturn<T>
where
    T: Clone + DeserializeOwned + 'static,
    D: PartialEq + 'static,
    F: Fn(PageQuery) -> Fut + 'static,
    Fut: Future<Output = Result<Envelope<Value>, ClientError>> + 'static,
{
    let update = use_force_update();
    let fetch_fn = producer(fetch_fn);

    let pager = {
        let fetch_fn = fetch_fn.clone();
        use_memo((), move |_| {
            let pager = Pager::new(fetch_fn, initial);
            pager.subscribe(move || update.force_update());
            pager
        })
    };
    pager.set_producer(fetch_fn);
    pager.set_options(options);

    {
        let pager = pager.clone();
        use_effect_with((), move |_| move || pager.dispose());
    }

    {
        let pager = pager.clone();
        use_effect_with(deps, move |_| {
            if pager.is_immediate() {
                spawn_local(async move {
                    let _ = pager.load().await;
                });
            }
        });
    }

    PaginatedHookReturn {
        state: pager.snapshot(),
        params: pager.params(),
        execute: spawn_with(&pager, |pager, patch| async move {
            let _ = pager.execute(patch).await;
        }),
        change_page: spawn_with(&pager, |pager, page| async move {
            let _ = pager.change_page(page).await;
        }),
        change_limit: spawn_with(&pager, |pager, limit| async move {
            let _ = pager.change_limit(limit).await;
        }),
        update_filters: spawn_with(&pager, |pager, filters| async move {
            let _ = pager.update_filters(filters).await;
        }),
        reset: spawn_with(&pager, |pager, ()| async move {
            let _ = pager.reset().await;
        }),
        refetch: spawn_with(&pager, |pager, ()| async move {
            let _ = pager.refetch().await;
        }),
    }
}
