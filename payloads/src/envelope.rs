//! The `{success, data, error, pagination}` wrapper every REST reply uses,
//! and the defensive unwrapping callers rely on when a reply strays from it.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ErrorInfo, ErrorKind};

/// Keys probed, in order, when a collection payload is an object rather
/// than a flat array.
const COLLECTION_KEYS: [&str; 5] =
    ["data", "articles", "comments", "items", "results"];

/// How many object levels the probe descends before giving up.
const MAX_PROBE_DEPTH: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<EnvelopeError>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeError {
    pub message: String,
    #[serde(default, rename = "type")]
    pub kind: Option<ErrorKind>,
    #[serde(default, alias = "errors")]
    pub details: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PaginationWire")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub total: u64,
}

/// Pagination as servers actually send it: any field may be missing, and
/// `totalPages` is derived from `total` when absent.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaginationWire {
    page: Option<u32>,
    limit: Option<u32>,
    #[serde(alias = "total_pages")]
    total_pages: Option<u32>,
    total: Option<u64>,
}

impl From<PaginationWire> for Pagination {
    fn from(wire: PaginationWire) -> Self {
        let defaults = Pagination::default();
        let derived = Pagination::from_total(
            wire.page.unwrap_or(defaults.page),
            wire.limit.unwrap_or(defaults.limit),
            wire.total.unwrap_or(defaults.total),
        );
        Self {
            total_pages: wire.total_pages.unwrap_or(derived.total_pages),
            ..derived
        }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 10,
            total_pages: 0,
            total: 0,
        }
    }
}

impl Pagination {
    /// Pagination derived from a total count: `total_pages = ceil(total /
    /// limit)`. A zero limit yields a single page when anything exists.
    pub fn from_total(page: u32, limit: u32, total: u64) -> Self {
        let total_pages = if limit == 0 {
            u32::from(total > 0)
        } else {
            u32::try_from(total.div_ceil(u64::from(limit))).unwrap_or(u32::MAX)
        };
        Self {
            page,
            limit,
            total_pages,
            total,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// One page of a collection after normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            pagination: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(EnvelopeError {
                message: message.into(),
                kind: None,
                details: None,
            }),
            pagination: None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Envelope<U> {
        Envelope {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
            pagination: self.pagination,
        }
    }

    /// The error a `success: false` envelope stands for.
    fn failure_info(error: Option<EnvelopeError>) -> ErrorInfo {
        match error {
            Some(EnvelopeError {
                message,
                kind,
                details,
            }) => ErrorInfo {
                kind: kind.unwrap_or(ErrorKind::UnknownError),
                message,
                status: None,
                data: details,
            },
            None => ErrorInfo::of_kind(ErrorKind::UnknownError),
        }
    }
}

impl<T: DeserializeOwned> Envelope<T> {
    /// Convert the envelope into its payload or the error it carries.
    ///
    /// A successful envelope without `data` is accepted when `T` can be
    /// read from `null` (unit-like acknowledgements, `Option`, `Value`).
    pub fn into_result(self) -> Result<T, ErrorInfo> {
        if !self.success {
            return Err(Self::failure_info(self.error));
        }
        match self.data {
            Some(data) => Ok(data),
            None => serde_json::from_value(Value::Null).map_err(|_| {
                ErrorInfo::new(
                    ErrorKind::UnknownError,
                    "Response did not include any data.",
                )
            }),
        }
    }
}

impl Envelope<Value> {
    /// Normalize a collection reply into a [`Page`].
    ///
    /// The payload may be a flat array or an object wrapping one
    /// (`{data: [...]}`, `{articles: [...]}`, `{data: {comments: [...]}}`).
    /// Anything unrecognisable yields an empty page. Items that fail to
    /// decode are skipped. Pagination supplied by the envelope wins over
    /// pagination nested in the payload, which wins over a count derived
    /// from the items.
    pub fn into_page<T: DeserializeOwned>(
        self,
        page: u32,
        limit: u32,
    ) -> Result<Page<T>, ErrorInfo> {
        if !self.success {
            return Err(Self::failure_info(self.error));
        }
        let data = self.data.unwrap_or(Value::Null);

        let raw_items = probe_items(&data, 0).cloned().unwrap_or_else(|| {
            if !data.is_null() {
                tracing::warn!(
                    "collection payload has no recognisable item list"
                );
            }
            Vec::new()
        });

        let items: Vec<T> = raw_items
            .into_iter()
            .filter_map(|raw| match serde_json::from_value(raw) {
                Ok(item) => Some(item),
                Err(e) => {
                    tracing::warn!("skipping undecodable item: {e}");
                    None
                }
            })
            .collect();

        let pagination = self
            .pagination
            .or_else(|| probe_pagination(&data))
            .unwrap_or_else(|| {
                Pagination::from_total(page, limit, items.len() as u64)
            });

        Ok(Page { items, pagination })
    }
}

fn probe_items(value: &Value, depth: usize) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(map) if depth < MAX_PROBE_DEPTH => {
            COLLECTION_KEYS.iter().find_map(|key| match map.get(*key) {
                Some(inner) => probe_items(inner, depth + 1),
                None => None,
            })
        }
        _ => None,
    }
}

fn probe_pagination(value: &Value) -> Option<Pagination> {
    let Value::Object(map) = value else {
        return None;
    };
    if let Some(found) = map
        .get("pagination")
        .and_then(|p| serde_json::from_value(p.clone()).ok())
    {
        return Some(found);
    }
    match map.get("data") {
        Some(inner @ Value::Object(_)) => probe_pagination(inner),
        _ => None,
    }
}
