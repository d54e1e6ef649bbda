use std::cell::{Cell, RefCell};
use std::rc::Rc;

use payloads::{Envelope, ErrorInfo};
use serde::de::DeserializeOwned;

use crate::{Listener, MutationState, Producer, RequestTracker, notify};

pub struct MutationOptions<T> {
    pub on_success: Option<Rc<dyn Fn(&T)>>,
    pub on_error: Option<Rc<dyn Fn(&ErrorInfo)>>,
}

impl<T> Default for MutationOptions<T> {
    fn default() -> Self {
        Self {
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> Clone for MutationOptions<T> {
    fn clone(&self) -> Self {
        Self {
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> MutationOptions<T> {
    pub fn on_success(mut self, f: impl Fn(&T) + 'static) -> Self {
        self.on_success = Some(Rc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ErrorInfo) + 'static) -> Self {
        self.on_error = Some(Rc::new(f));
        self
    }
}

/// A write operation: `{loading, error, success}` plus `mutate`.
///
/// Never runs on its own. Overlapping calls are not superseded; each one
/// applies its outcome when it settles, so the last to resolve wins.
/// `loading` stays set while any call is outstanding.
pub struct Mutation<A, T> {
    producer: RefCell<Producer<A, Envelope<T>>>,
    options: RefCell<MutationOptions<T>>,
    state: RefCell<MutationState>,
    in_flight: Cell<usize>,
    tracker: RequestTracker,
    listener: RefCell<Option<Listener>>,
}

impl<A, T> Mutation<A, T>
where
    A: 'static,
    T: DeserializeOwned + 'static,
{
    pub fn new(producer: Producer<A, Envelope<T>>) -> Self {
        Self {
            producer: RefCell::new(producer),
            options: RefCell::new(MutationOptions::default()),
            state: RefCell::new(MutationState::default()),
            in_flight: Cell::new(0),
            tracker: RequestTracker::new(),
            listener: RefCell::new(None),
        }
    }

    pub fn with_options(self, options: MutationOptions<T>) -> Self {
        self.set_options(options);
        self
    }

    pub fn set_producer(&self, producer: Producer<A, Envelope<T>>) {
        *self.producer.borrow_mut() = producer;
    }

    pub fn set_options(&self, options: MutationOptions<T>) {
        *self.options.borrow_mut() = options;
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn snapshot(&self) -> MutationState {
        self.state.borrow().clone()
    }

    pub async fn mutate(&self, args: A) -> Result<T, ErrorInfo> {
        self.in_flight.set(self.in_flight.get() + 1);
        self.update(|state| {
            state.loading = true;
            state.error = None;
            state.success = false;
        });

        let producer = self.producer.borrow().clone();
        let outcome = match producer(args).await {
            Ok(envelope) => envelope.into_result(),
            Err(e) => Err(ErrorInfo::from(e)),
        };

        self.in_flight.set(self.in_flight.get().saturating_sub(1));
        if !self.tracker.is_live() {
            tracing::debug!("discarding mutation result after dispose");
            return outcome;
        }

        let still_loading = self.in_flight.get() > 0;
        let options = self.options.borrow().clone();
        match &outcome {
            Ok(data) => {
                self.update(|state| {
                    state.loading = still_loading;
                    state.error = None;
                    state.success = true;
                });
                if let Some(on_success) = &options.on_success {
                    on_success(data);
                }
            }
            Err(error) => {
                tracing::warn!(kind = %error.kind, "mutation failed: {error}");
                self.update(|state| {
                    state.loading = still_loading;
                    state.error = Some(error.clone());
                    state.success = false;
                });
                if let Some(on_error) = &options.on_error {
                    on_error(error);
                }
            }
        }
        outcome
    }

    pub fn reset(&self) {
        self.update(|state| *state = MutationState::default());
    }

    pub fn dispose(&self) {
        self.tracker.dispose();
    }

    fn update(&self, f: impl FnOnce(&mut MutationState)) {
        if !self.tracker.is_live() {
            return;
        }
        f(&mut self.state.borrow_mut());
        notify(&self.listener);
    }
}
