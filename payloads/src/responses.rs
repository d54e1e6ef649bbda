use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use crate::{
    ArticleId, CommentId, CommentStatus, Role, UserId, VoteDirection,
};

/// Public profile attached to authored content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub role: Role,
}

impl Author {
    /// Full name when both parts are present, otherwise the username.
    pub fn display_name(&self) -> String {
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last))
                if !first.is_empty() && !last.is_empty() =>
            {
                format!("{first} {last}")
            }
            _ => self.username.clone(),
        }
    }

    pub fn initial(&self) -> char {
        self.display_name()
            .chars()
            .next()
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or('?')
    }
}

/// The signed-in account, as read from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: UserId,
    pub username: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl CurrentUser {
    /// The author record new comments by this user are attributed to.
    pub fn as_author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            avatar: self.avatar.clone(),
            role: self.role,
        }
    }
}

/// A comment as stored in a flat, per-article collection. Threading is
/// expressed only through `parent_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub article_id: ArticleId,
    pub user_id: UserId,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    #[serde(default)]
    pub status: CommentStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub author: Author,
    #[serde(default)]
    pub upvotes: u32,
    #[serde(default)]
    pub downvotes: u32,
    #[serde(default)]
    pub user_vote: Option<VoteDirection>,
    /// Always empty in the flat collection; kept for wire compatibility
    /// with endpoints that pre-nest replies.
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Net score used by the `popular` ordering.
    pub fn score(&self) -> i64 {
        i64::from(self.upvotes) - i64::from(self.downvotes)
    }

    pub fn is_edited(&self) -> bool {
        self.updated_at > self.created_at
    }
}

/// What a create or update endpoint hands back. Servers vary in how much
/// of the record they echo, so every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatedComment {
    #[serde(default)]
    pub id: Option<CommentId>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub article_id: Option<ArticleId>,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub parent_id: Option<CommentId>,
    #[serde(default)]
    pub status: Option<CommentStatus>,
    #[serde(default)]
    pub created_at: Option<Timestamp>,
    #[serde(default)]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub author: Option<Author>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub comment_count: u32,
}
