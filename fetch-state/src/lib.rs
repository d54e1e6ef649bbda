//! State containers and controllers for data fetching.
//!
//! Each controller owns its state behind interior mutability, is shared as
//! an `Rc`, and notifies a single listener whenever that state changes.
//! The ui crate wraps them in hooks; tests drive them directly.

mod mutation;
mod pager;
mod resource;
mod state;
mod tracker;

pub use mutation::{Mutation, MutationOptions};
pub use pager::{PageProducer, Pager, PagerOptions, ParamsPatch};
pub use resource::{FetchOptions, Resource};
pub use state::{FetchState, MutationState, PaginatedState, ResourceState};
pub use tracker::{RequestTracker, Ticket};

/// Page, limit and filters sent by a [`Pager`].
pub use payloads::requests::PageQuery as PageParams;

use std::future::Future;
use std::rc::Rc;

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use payloads::ClientError;

/// Hooks may not hold `Send` futures in the browser, so producers are
/// boxed as local futures.
pub type Producer<A, R> =
    Rc<dyn Fn(A) -> LocalBoxFuture<'static, Result<R, ClientError>>>;

/// Box an async closure into a [`Producer`].
pub fn producer<A, R, F, Fut>(f: F) -> Producer<A, R>
where
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Result<R, ClientError>> + 'static,
{
    Rc::new(move |args| f(args).boxed_local())
}

/// Called after every state change.
pub(crate) type Listener = Rc<dyn Fn()>;

pub(crate) fn notify(listener: &std::cell::RefCell<Option<Listener>>) {
    let listener = listener.borrow().clone();
    if let Some(listener) = listener {
        listener();
    }
}
