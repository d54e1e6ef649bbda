//! Builders for the records tests keep needing.

use jiff::Timestamp;
use payloads::{
    ArticleId, Author, Comment, CommentId, CommentStatus, CurrentUser, Role,
    UserId,
};
use serde_json::{Value, json};

pub const ARTICLE: ArticleId = ArticleId(1);

/// Base instant for fixture timestamps (2024-01-01T00:00:00Z).
const EPOCH: i64 = 1_704_067_200;

pub fn timestamp(offset_secs: i64) -> Timestamp {
    Timestamp::from_second(EPOCH + offset_secs)
        .expect("fixture timestamp in range")
}

pub fn user(id: i64, role: Role) -> CurrentUser {
    CurrentUser {
        id: UserId(id),
        username: format!("user{id}"),
        role,
        first_name: None,
        last_name: None,
        avatar: None,
    }
}

pub fn author(id: i64) -> Author {
    user(id, Role::User).as_author()
}

/// An approved comment by user 1, created `id` seconds after the epoch.
pub fn comment(id: i64, parent: Option<i64>) -> Comment {
    comment_by(id, parent, 1)
}

pub fn comment_by(id: i64, parent: Option<i64>, author_id: i64) -> Comment {
    Comment {
        id: CommentId(id),
        content: format!("comment {id}"),
        article_id: ARTICLE,
        user_id: UserId(author_id),
        parent_id: parent.map(CommentId),
        status: CommentStatus::Approved,
        created_at: timestamp(id),
        updated_at: timestamp(id),
        author: author(author_id),
        upvotes: 0,
        downvotes: 0,
        user_vote: None,
        replies: Vec::new(),
    }
}

/// A single thread `1 <- 2 <- ... <- depth + 1`; the last comment sits at
/// `depth` (roots are depth 0).
pub fn chain(depth: usize) -> Vec<Comment> {
    let depth = depth as i64;
    (1..=depth + 1)
        .map(|id| comment(id, (id > 1).then_some(id - 1)))
        .collect()
}

/// A successful envelope around `data`.
pub fn ok(data: Value) -> Value {
    json!({"success": true, "data": data})
}

/// A `success: false` envelope.
pub fn failed(message: &str, kind: &str) -> Value {
    json!({"success": false, "error": {"message": message, "type": kind}})
}
