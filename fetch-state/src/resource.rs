use std::cell::RefCell;
use std::rc::Rc;

use payloads::{Envelope, ErrorInfo};
use serde::de::DeserializeOwned;

use crate::{
    FetchState, Listener, Producer, RequestTracker, ResourceState, notify,
};

/// Options for a [`Resource`].
pub struct FetchOptions<T> {
    /// Load as soon as the owner mounts (default `true`).
    pub immediate: bool,
    pub transform: Option<Rc<dyn Fn(T) -> T>>,
    pub on_success: Option<Rc<dyn Fn(&T)>>,
    pub on_error: Option<Rc<dyn Fn(&ErrorInfo)>>,
}

impl<T> Default for FetchOptions<T> {
    fn default() -> Self {
        Self {
            immediate: true,
            transform: None,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> Clone for FetchOptions<T> {
    fn clone(&self) -> Self {
        Self {
            immediate: self.immediate,
            transform: self.transform.clone(),
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> FetchOptions<T> {
    /// Do not load on mount; wait for an explicit `execute`.
    pub fn lazy() -> Self {
        Self {
            immediate: false,
            ..Self::default()
        }
    }

    pub fn transform(mut self, f: impl Fn(T) -> T + 'static) -> Self {
        self.transform = Some(Rc::new(f));
        self
    }

    pub fn on_success(mut self, f: impl Fn(&T) + 'static) -> Self {
        self.on_success = Some(Rc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ErrorInfo) + 'static) -> Self {
        self.on_error = Some(Rc::new(f));
        self
    }
}

/// A single remote resource: `{data, loading, error}` plus `execute` and
/// `reset`.
///
/// Calls may overlap. Only the most recently started call writes to
/// state; an older call that settles later is returned to its caller and
/// otherwise ignored, callbacks included.
pub struct Resource<A, T> {
    producer: RefCell<Producer<A, Envelope<T>>>,
    options: RefCell<FetchOptions<T>>,
    state: RefCell<ResourceState<T>>,
    tracker: RequestTracker,
    listener: RefCell<Option<Listener>>,
}

impl<A, T> Resource<A, T>
where
    A: 'static,
    T: Clone + DeserializeOwned + 'static,
{
    pub fn new(producer: Producer<A, Envelope<T>>) -> Self {
        Self {
            producer: RefCell::new(producer),
            options: RefCell::new(FetchOptions::default()),
            state: RefCell::new(ResourceState::default()),
            tracker: RequestTracker::new(),
            listener: RefCell::new(None),
        }
    }

    pub fn with_options(self, options: FetchOptions<T>) -> Self {
        self.set_options(options);
        self
    }

    /// Swap the producer, e.g. when the closure captured new inputs.
    /// In-flight calls keep the producer they started with.
    pub fn set_producer(&self, producer: Producer<A, Envelope<T>>) {
        *self.producer.borrow_mut() = producer;
    }

    pub fn set_options(&self, options: FetchOptions<T>) {
        *self.options.borrow_mut() = options;
    }

    pub fn is_immediate(&self) -> bool {
        self.options.borrow().immediate
    }

    /// Register the single state-change listener, replacing any previous.
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn snapshot(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Run the producer and fold its outcome into state. Never panics and
    /// never lets an error escape other than as the returned `Err`.
    pub async fn execute(&self, args: A) -> Result<T, ErrorInfo> {
        let ticket = self.tracker.begin();
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });

        let producer = self.producer.borrow().clone();
        let outcome = match producer(args).await {
            Ok(envelope) => envelope.into_result(),
            Err(e) => Err(ErrorInfo::from(e)),
        };
        let options = self.options.borrow().clone();
        let outcome = match (outcome, &options.transform) {
            (Ok(data), Some(transform)) => Ok(transform(data)),
            (outcome, _) => outcome,
        };

        if !self.tracker.is_current(ticket) {
            tracing::debug!("discarding superseded or unmounted fetch result");
            return outcome;
        }

        match &outcome {
            Ok(data) => {
                self.update(|state| {
                    state.data = FetchState::Fetched(data.clone());
                    state.loading = false;
                    state.error = None;
                });
                if let Some(on_success) = &options.on_success {
                    on_success(data);
                }
            }
            Err(error) => {
                tracing::warn!(kind = %error.kind, "fetch failed: {error}");
                self.update(|state| {
                    state.loading = false;
                    state.error = Some(error.clone());
                });
                if let Some(on_error) = &options.on_error {
                    on_error(error);
                }
            }
        }
        outcome
    }

    /// Return to the initial `{NotFetched, false, None}` state. Calls still
    /// in flight will not write back.
    pub fn reset(&self) {
        self.tracker.invalidate();
        self.update(|state| *state = ResourceState::default());
    }

    /// Stop applying results; called when the owner unmounts.
    pub fn dispose(&self) {
        self.tracker.dispose();
    }

    fn update(&self, f: impl FnOnce(&mut ResourceState<T>)) {
        if !self.tracker.is_live() {
            return;
        }
        f(&mut self.state.borrow_mut());
        notify(&self.listener);
    }
}

impl<A, T> Resource<A, T>
where
    A: Default + 'static,
    T: Clone + DeserializeOwned + 'static,
{
    /// Run the producer with default arguments, as the mount-time load
    /// does.
    pub async fn refetch(&self) -> Result<T, ErrorInfo> {
        self.execute(A::default()).await
    }
}
