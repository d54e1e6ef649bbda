use yew::prelude::*;
use yewdux::prelude::*;

use crate::hooks::use_api;
use crate::{AuthState, State};

/// Hook to check the session once on startup.
#[hook]
pub fn use_authentication() {
    let (_state, dispatch) = use_store::<State>();
    let api = use_api();

    use_effect_with((), move |_| {
        yew::platform::spawn_local(async move {
            let user = match api.current_user().await {
                Ok(envelope) => envelope.into_result(),
                Err(e) => Err(e.into()),
            };

            match user {
                Ok(Some(user)) => {
                    tracing::debug!(username = %user.username, "session found");
                    dispatch.reduce_mut(|state| {
                        state.auth_state = AuthState::LoggedIn(user);
                    });
                }
                Ok(None) => {
                    dispatch.reduce_mut(|state| state.logout());
                }
                Err(error) => {
                    // Network error or other issue, assume logged out
                    tracing::warn!(kind = %error.kind, "session check failed: {error}");
                    dispatch.reduce_mut(|state| state.logout());
                }
            }
        });
    });
}
