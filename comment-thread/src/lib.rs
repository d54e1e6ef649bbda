//! Threaded comments over a flat, per-article collection.
//!
//! The collection is the only source of truth: threading is derived from
//! `parent_id` on every read, and every write goes through
//! [`CommentSection`], which patches the collection with the functions in
//! [`reducer`] once the backend has accepted the change.

pub mod config;
pub mod permissions;
pub mod reducer;
mod section;
pub mod tree;
pub mod validate;
pub mod view;
pub mod vote;

pub use config::{CascadePolicy, ParseCascadePolicyError, ThreadConfig};
pub use section::CommentSection;
pub use view::{SortOrder, StatusFilter};
