use std::rc::Rc;

use payloads::Backend;
use yew::prelude::*;

use crate::get_api_client;

/// The backend every hook talks to, handed down through context instead
/// of being created at each call site.
#[derive(Clone)]
pub struct ApiContext(pub Rc<dyn Backend>);

impl PartialEq for ApiContext {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Properties, PartialEq)]
pub struct ApiProviderProps {
    pub children: Children,
    /// Defaults to the REST client from [`get_api_client`].
    #[prop_or_default]
    pub backend: Option<ApiContext>,
}

#[function_component]
pub fn ApiProvider(props: &ApiProviderProps) -> Html {
    let fallback = use_memo((), |_| {
        ApiContext(Rc::new(get_api_client()) as Rc<dyn Backend>)
    });
    let context = props
        .backend
        .clone()
        .unwrap_or_else(|| (*fallback).clone());

    html! {
        <ContextProvider<ApiContext> {context}>
            {props.children.clone()}
        </ContextProvider<ApiContext>>
    }
}

/// The backend from the nearest [`ApiProvider`], or a default REST
/// client when rendered outside one.
#[hook]
pub fn use_api() -> Rc<dyn Backend> {
    let context = use_context::<ApiContext>();
    let fallback = use_memo((), |_| Rc::new(get_api_client()) as Rc<dyn Backend>);
    match context {
        Some(ApiContext(backend)) => backend,
        None => {
            tracing::debug!("use_api outside ApiProvider, using default client");
            (*fallback).clone()
        }
    }
}
