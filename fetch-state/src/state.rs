use payloads::{ErrorInfo, Pagination};

/// Distinguishes "not fetched yet" from "fetched, possibly empty".
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    NotFetched,
    Fetched(T),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::NotFetched
    }
}

impl<T> FetchState<T> {
    pub fn is_fetched(&self) -> bool {
        matches!(self, Self::Fetched(_))
    }

    pub fn as_ref(&self) -> Option<&T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(data) => Some(data),
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Self::NotFetched => None,
            Self::Fetched(data) => Some(data),
        }
    }
}

/// `{data, loading, error}` for a single resource.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: FetchState<T>,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: FetchState::NotFetched,
            loading: false,
            error: None,
        }
    }
}

impl<T> ResourceState<T> {
    /// Loading with nothing to show yet.
    pub fn is_initial_loading(&self) -> bool {
        self.loading && !self.data.is_fetched() && self.error.is_none()
    }
}

/// [`ResourceState`] over a page of items, plus where that page sits.
///
/// `pagination` is whatever the server supplied, or one derived from the
/// item count; either way `total_pages` is never negative.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginatedState<T> {
    pub items: FetchState<Vec<T>>,
    pub loading: bool,
    pub error: Option<ErrorInfo>,
    pub pagination: Pagination,
}

impl<T> PaginatedState<T> {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            items: FetchState::NotFetched,
            loading: false,
            error: None,
            pagination: Pagination::from_total(page, limit, 0),
        }
    }

    pub fn page(&self) -> u32 {
        self.pagination.page
    }

    pub fn limit(&self) -> u32 {
        self.pagination.limit
    }

    pub fn total_pages(&self) -> u32 {
        self.pagination.total_pages
    }

    pub fn total(&self) -> u64 {
        self.pagination.total
    }

    /// Items fetched so far, empty before the first success.
    pub fn items(&self) -> &[T] {
        self.items.as_ref().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_initial_loading(&self) -> bool {
        self.loading && !self.items.is_fetched() && self.error.is_none()
    }
}

/// `{loading, error, success}` for a mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationState {
    pub loading: bool,
    pub error: Option<ErrorInfo>,
    pub success: bool,
}
