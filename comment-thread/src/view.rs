//! The top-level list as displayed: filtered by status, then sorted.
//!
//! Replies are neither filtered nor re-sorted; they follow whichever
//! parent is visible, in collection order.

use derive_more::Display;
use payloads::{Comment, CommentStatus};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    #[display("newest")]
    Newest,
    #[display("oldest")]
    Oldest,
    #[display("popular")]
    Popular,
}

impl SortOrder {
    pub const ALL: [Self; 3] = [Self::Newest, Self::Oldest, Self::Popular];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Newest => "Newest first",
            Self::Oldest => "Oldest first",
            Self::Popular => "Most popular",
        }
    }

    /// Inverse of `Display`, for `<select>` values.
    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|order| order.to_string() == value)
    }
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Display,
    Serialize,
    Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    #[display("all")]
    All,
    #[display("approved")]
    Approved,
    #[display("pending")]
    Pending,
}

impl StatusFilter {
    pub const ALL: [Self; 3] = [Self::All, Self::Approved, Self::Pending];

    pub fn label(&self) -> &'static str {
        match self {
            Self::All => "All comments",
            Self::Approved => "Approved",
            Self::Pending => "Pending review",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|filter| filter.to_string() == value)
    }

    pub fn matches(&self, status: CommentStatus) -> bool {
        match self {
            Self::All => true,
            Self::Approved => status == CommentStatus::Approved,
            Self::Pending => status == CommentStatus::Pending,
        }
    }
}

/// Root comments passing `filter`, ordered by `sort`.
///
/// The sort is stable, so ties keep collection order and repeated calls
/// on the same collection return the same sequence.
pub fn top_level(
    comments: &[Comment],
    filter: StatusFilter,
    sort: SortOrder,
) -> Vec<&Comment> {
    let mut roots: Vec<&Comment> = comments
        .iter()
        .filter(|c| c.is_root() && filter.matches(c.status))
        .collect();

    match sort {
        SortOrder::Newest => {
            roots.sort_by(|a, b| b.created_at.cmp(&a.created_at))
        }
        SortOrder::Oldest => {
            roots.sort_by(|a, b| a.created_at.cmp(&b.created_at))
        }
        SortOrder::Popular => roots.sort_by_key(|c| std::cmp::Reverse(c.score())),
    }
    roots
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_helpers::fixtures::{comment, timestamp};

    fn sample() -> Vec<Comment> {
        let mut comments = vec![
            comment(1, None),
            comment(2, None),
            comment(3, Some(1)),
            comment(4, None),
        ];
        comments[0].upvotes = 5;
        comments[1].status = CommentStatus::Pending;
        comments[1].upvotes = 2;
        comments[3].downvotes = 1;
        comments
    }

    fn ids(comments: Vec<&Comment>) -> Vec<i64> {
        comments.into_iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn orders() {
        let comments = sample();
        let all = StatusFilter::All;

        assert_eq!(ids(top_level(&comments, all, SortOrder::Newest)), vec![4, 2, 1]);
        assert_eq!(ids(top_level(&comments, all, SortOrder::Oldest)), vec![1, 2, 4]);
        assert_eq!(ids(top_level(&comments, all, SortOrder::Popular)), vec![1, 2, 4]);
    }

    #[test]
    fn filter_is_status_exact_and_skips_replies() {
        let comments = sample();

        assert_eq!(
            ids(top_level(&comments, StatusFilter::Pending, SortOrder::Newest)),
            vec![2]
        );
        assert_eq!(
            ids(top_level(&comments, StatusFilter::Approved, SortOrder::Oldest)),
            vec![1, 4]
        );
    }

    #[test]
    fn reapplying_is_idempotent() {
        let mut comments = sample();
        // Equal scores and timestamps everywhere.
        for c in &mut comments {
            c.upvotes = 0;
            c.downvotes = 0;
            c.created_at = timestamp(0);
        }
        for sort in SortOrder::ALL {
            for filter in StatusFilter::ALL {
                let first = ids(top_level(&comments, filter, sort));
                let second = ids(top_level(&comments, filter, sort));
                assert_eq!(first, second);
            }
        }
    }

    #[test]
    fn select_values_round_trip() {
        assert_eq!(SortOrder::from_value("popular"), Some(SortOrder::Popular));
        assert_eq!(StatusFilter::from_value("pending"), Some(StatusFilter::Pending));
        assert_eq!(SortOrder::from_value("random"), None);
    }
}
