use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ArticleId, CommentId, CommentStatus, VoteDirection};

pub const COMMENT_MAX_LEN: usize = 5000;
pub const REPORT_REASON_MAX_LEN: usize = 500;

/// Page selection plus free-form filters for collection endpoints.
///
/// Filters with an empty value are treated as cleared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
    #[serde(flatten)]
    pub filters: BTreeMap<String, String>,
}

impl PageQuery {
    pub const DEFAULT_LIMIT: u32 = 10;

    pub fn with_filter(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.set_filter(key, value);
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if value.is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
    }

    /// Query-string pairs, page and limit first.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        pairs.extend(
            self.filters
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        pairs
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: Self::DEFAULT_LIMIT,
            filters: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateComment {
    pub article_id: ArticleId,
    pub content: String,
    pub parent_id: Option<CommentId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateComment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<CommentStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteComment {
    pub comment_id: CommentId,
    pub vote_type: VoteDirection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportComment {
    pub comment_id: CommentId,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerateComment {
    pub comment_id: CommentId,
    pub status: CommentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscribeNewsletter {
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filter_value_clears_the_filter() {
        let mut query = PageQuery::default().with_filter("status", "approved");
        assert_eq!(query.filters.get("status").map(String::as_str), Some("approved"));
        query.set_filter("status", "");
        assert!(query.filters.is_empty());
    }

    #[test]
    fn pairs_lead_with_page_and_limit() {
        let query = PageQuery::default().with_limit(25).with_filter("tag", "rust");
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("limit".to_string(), "25".to_string()),
                ("tag".to_string(), "rust".to_string()),
            ]
        );
    }
}
