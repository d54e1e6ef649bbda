use yew::prelude::*;
use yew_router::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_api;
use crate::{Route, State};

#[hook]
pub fn use_logout() -> Callback<MouseEvent> {
    let (_, dispatch) = use_store::<State>();
    let navigator = use_navigator();
    let api = use_api();

    Callback::from(move |_| {
        let dispatch = dispatch.clone();
        let navigator = navigator.clone();
        let api = api.clone();

        yew::platform::spawn_local(async move {
            if let Err(e) = api.logout().await {
                tracing::warn!("logout request failed: {e}");
            }

            dispatch.reduce_mut(|state| state.logout());

            if let Some(navigator) = navigator {
                navigator.push(&Route::Home);
            }
        });
    })
}
