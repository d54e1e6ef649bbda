use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use payloads::requests::PageQuery;
use payloads::{Envelope, ErrorInfo, Page};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    FetchState, Listener, PaginatedState, Producer, RequestTracker, notify,
};

/// Collection endpoints reply with a loosely shaped payload that is
/// normalized after the fact.
pub type PageProducer = Producer<PageQuery, Envelope<Value>>;

/// Changes merged over the current params by [`Pager::execute`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamsPatch {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub filters: BTreeMap<String, String>,
}

impl ParamsPatch {
    pub fn page(page: u32) -> Self {
        Self {
            page: Some(page),
            ..Self::default()
        }
    }

    fn apply(self, params: &mut PageQuery) {
        if let Some(page) = self.page {
            params.page = page.max(1);
        }
        if let Some(limit) = self.limit {
            params.limit = limit.max(1);
        }
        for (key, value) in self.filters {
            params.set_filter(key, value);
        }
    }
}

pub struct PagerOptions<T> {
    pub immediate: bool,
    pub on_success: Option<Rc<dyn Fn(&[T])>>,
    pub on_error: Option<Rc<dyn Fn(&ErrorInfo)>>,
}

impl<T> Default for PagerOptions<T> {
    fn default() -> Self {
        Self {
            immediate: true,
            on_success: None,
            on_error: None,
        }
    }
}

impl<T> Clone for PagerOptions<T> {
    fn clone(&self) -> Self {
        Self {
            immediate: self.immediate,
            on_success: self.on_success.clone(),
            on_error: self.on_error.clone(),
        }
    }
}

impl<T> PagerOptions<T> {
    pub fn lazy() -> Self {
        Self {
            immediate: false,
            ..Self::default()
        }
    }

    pub fn on_success(mut self, f: impl Fn(&[T]) + 'static) -> Self {
        self.on_success = Some(Rc::new(f));
        self
    }

    pub fn on_error(mut self, f: impl Fn(&ErrorInfo) + 'static) -> Self {
        self.on_error = Some(Rc::new(f));
        self
    }
}

/// A paginated collection: params, the current page and how to move
/// between pages.
///
/// Params are seeded from `{page: 1, limit: 10}` overlaid with the initial
/// query. Changing the page size or the filters always lands on page 1.
pub struct Pager<T> {
    producer: RefCell<PageProducer>,
    options: RefCell<PagerOptions<T>>,
    initial: PageQuery,
    params: RefCell<PageQuery>,
    state: RefCell<PaginatedState<T>>,
    tracker: RequestTracker,
    loaded: Cell<bool>,
    listener: RefCell<Option<Listener>>,
}

impl<T> Pager<T>
where
    T: Clone + DeserializeOwned + 'static,
{
    pub fn new(producer: PageProducer, initial: PageQuery) -> Self {
        let mut seeded = PageQuery::default();
        ParamsPatch {
            page: Some(initial.page),
            limit: Some(initial.limit),
            filters: initial.filters,
        }
        .apply(&mut seeded);

        Self {
            producer: RefCell::new(producer),
            options: RefCell::new(PagerOptions::default()),
            state: RefCell::new(PaginatedState::new(
                seeded.page,
                seeded.limit,
            )),
            params: RefCell::new(seeded.clone()),
            initial: seeded,
            tracker: RequestTracker::new(),
            loaded: Cell::new(false),
            listener: RefCell::new(None),
        }
    }

    pub fn with_options(self, options: PagerOptions<T>) -> Self {
        self.set_options(options);
        self
    }

    pub fn set_producer(&self, producer: PageProducer) {
        *self.producer.borrow_mut() = producer;
    }

    pub fn set_options(&self, options: PagerOptions<T>) {
        *self.options.borrow_mut() = options;
    }

    pub fn is_immediate(&self) -> bool {
        self.options.borrow().immediate
    }

    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        *self.listener.borrow_mut() = Some(Rc::new(listener));
    }

    pub fn params(&self) -> PageQuery {
        self.params.borrow().clone()
    }

    pub fn snapshot(&self) -> PaginatedState<T> {
        self.state.borrow().clone()
    }

    /// Merge `patch` over the current params and fetch that page.
    pub async fn execute(
        &self,
        patch: Option<ParamsPatch>,
    ) -> Result<Vec<T>, ErrorInfo> {
        let params = {
            let mut params = self.params.borrow_mut();
            if let Some(patch) = patch {
                patch.apply(&mut params);
            }
            params.clone()
        };
        self.fetch(params).await
    }

    pub async fn change_page(&self, page: u32) -> Result<Vec<T>, ErrorInfo> {
        self.execute(Some(ParamsPatch::page(page))).await
    }

    /// New page size; always returns to page 1.
    pub async fn change_limit(&self, limit: u32) -> Result<Vec<T>, ErrorInfo> {
        self.execute(Some(ParamsPatch {
            page: Some(1),
            limit: Some(limit),
            filters: BTreeMap::new(),
        }))
        .await
    }

    /// Merge filters (an empty value clears one); always returns to page 1.
    pub async fn update_filters(
        &self,
        filters: BTreeMap<String, String>,
    ) -> Result<Vec<T>, ErrorInfo> {
        self.execute(Some(ParamsPatch {
            page: Some(1),
            limit: None,
            filters,
        }))
        .await
    }

    pub async fn refetch(&self) -> Result<Vec<T>, ErrorInfo> {
        self.execute(None).await
    }

    /// Restore the seeded params and fetch again.
    pub async fn reset(&self) -> Result<Vec<T>, ErrorInfo> {
        let initial = self.initial.clone();
        *self.params.borrow_mut() = initial.clone();
        self.tracker.invalidate();
        self.update(|state| {
            *state = PaginatedState::new(initial.page, initial.limit)
        });
        self.fetch(initial).await
    }

    /// Load for the owner's current dependencies. The first load fetches
    /// the current params; any later load means the dependencies changed,
    /// so the page and filters start over from the seed.
    pub async fn load(&self) -> Result<Vec<T>, ErrorInfo> {
        if self.loaded.replace(true) {
            self.reset().await
        } else {
            self.refetch().await
        }
    }

    pub fn dispose(&self) {
        self.tracker.dispose();
    }

    async fn fetch(&self, params: PageQuery) -> Result<Vec<T>, ErrorInfo> {
        let ticket = self.tracker.begin();
        self.update(|state| {
            state.loading = true;
            state.error = None;
        });
        tracing::debug!(
            page = params.page,
            limit = params.limit,
            "fetching page"
        );

        let (page, limit) = (params.page, params.limit);
        let producer = self.producer.borrow().clone();
        let outcome: Result<Page<T>, ErrorInfo> = match producer(params).await
        {
            Ok(envelope) => envelope.into_page(page, limit),
            Err(e) => Err(ErrorInfo::from(e)),
        };

        if !self.tracker.is_current(ticket) {
            tracing::debug!("discarding superseded or unmounted page result");
            return outcome.map(|page| page.items);
        }

        let options = self.options.borrow().clone();
        match outcome {
            Ok(Page { items, pagination }) => {
                self.update(|state| {
                    state.items = FetchState::Fetched(items.clone());
                    state.pagination = pagination;
                    state.loading = false;
                    state.error = None;
                });
                if let Some(on_success) = &options.on_success {
                    on_success(&items);
                }
                Ok(items)
            }
            Err(error) => {
                tracing::warn!(kind = %error.kind, "page fetch failed: {error}");
                self.update(|state| {
                    state.loading = false;
                    state.error = Some(error.clone());
                });
                if let Some(on_error) = &options.on_error {
                    on_error(&error);
                }
                Err(error)
            }
        }
    }

    fn update(&self, f: impl FnOnce(&mut PaginatedState<T>)) {
        if !self.tracker.is_live() {
            return;
        }
        f(&mut self.state.borrow_mut());
        notify(&self.listener);
    }
}
