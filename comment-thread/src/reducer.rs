//! Pure patches applied to the collection after the backend accepts a
//! write. Each one mirrors what the next full fetch would show, so the
//! section can skip that fetch.

use std::collections::HashSet;

use jiff::Timestamp;
use payloads::requests::UpdateComment;
use payloads::{
    ArticleId, Author, Comment, CommentId, CreatedComment, VoteDirection,
};

use crate::{CascadePolicy, tree, vote};

/// What the client knows about a comment it just posted, used wherever
/// the server's reply leaves a field out.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDefaults {
    pub article_id: ArticleId,
    pub author: Author,
    pub content: String,
    pub parent_id: Option<CommentId>,
    pub now: Timestamp,
}

/// Build a full record from a create reply. The server wins for every
/// field it sends, except `parent_id`, which is always the comment that
/// was replied to.
pub fn synthesize(server: CreatedComment, defaults: &CreateDefaults) -> Comment {
    let created_at = server.created_at.unwrap_or(defaults.now);
    Comment {
        id: server
            .id
            .unwrap_or(CommentId(defaults.now.as_millisecond())),
        content: server
            .content
            .filter(|content| !content.is_empty())
            .unwrap_or_else(|| defaults.content.clone()),
        article_id: server.article_id.unwrap_or(defaults.article_id),
        user_id: server.user_id.unwrap_or(defaults.author.id),
        parent_id: defaults.parent_id,
        status: server.status.unwrap_or_default(),
        created_at,
        updated_at: server.updated_at.unwrap_or(created_at),
        author: server.author.unwrap_or_else(|| defaults.author.clone()),
        upvotes: 0,
        downvotes: 0,
        user_vote: None,
        replies: Vec::new(),
    }
}

/// Insert a newly created comment: roots at the front, replies at the
/// end. A record already holding the same id is replaced.
pub fn apply_optimistic_create(
    mut collection: Vec<Comment>,
    server: CreatedComment,
    defaults: &CreateDefaults,
) -> Vec<Comment> {
    let comment = synthesize(server, defaults);
    collection.retain(|c| c.id != comment.id);
    if comment.is_root() {
        collection.insert(0, comment);
    } else {
        collection.push(comment);
    }
    collection
}

/// Merge `changes` into comment `id` and stamp `updated_at`. Returns
/// false when the comment is not in the collection.
pub fn apply_edit(
    collection: &mut [Comment],
    id: CommentId,
    changes: &UpdateComment,
    now: Timestamp,
) -> bool {
    let Some(comment) = collection.iter_mut().find(|c| c.id == id) else {
        return false;
    };
    if let Some(content) = &changes.content {
        comment.content.clone_from(content);
    }
    if let Some(status) = changes.status {
        comment.status = status;
    }
    comment.updated_at = now;
    true
}

/// Remove comment `id` and the replies `policy` takes with it. Returns
/// how many comments were removed.
pub fn apply_delete(
    collection: &mut Vec<Comment>,
    id: CommentId,
    policy: CascadePolicy,
) -> usize {
    let before = collection.len();
    match policy {
        CascadePolicy::Shallow => {
            collection.retain(|c| c.id != id && c.parent_id != Some(id));
        }
        CascadePolicy::Recursive => {
            let mut doomed: HashSet<CommentId> =
                tree::descendants(collection, id);
            doomed.insert(id);
            collection.retain(|c| !doomed.contains(&c.id));
        }
    }
    before - collection.len()
}

/// Toggle the viewer's vote on comment `id`. `None` when the comment is
/// not in the collection, otherwise the resulting `user_vote`.
pub fn apply_vote(
    collection: &mut [Comment],
    id: CommentId,
    direction: VoteDirection,
) -> Option<Option<VoteDirection>> {
    collection
        .iter_mut()
        .find(|c| c.id == id)
        .map(|comment| vote::toggle(comment, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::CommentStatus;
    use test_helpers::fixtures::{ARTICLE, author, chain, comment, timestamp};

    fn defaults(parent_id: Option<i64>) -> CreateDefaults {
        CreateDefaults {
            article_id: ARTICLE,
            author: author(7),
            content: "typed text".into(),
            parent_id: parent_id.map(CommentId),
            now: timestamp(500),
        }
    }

    fn ids(collection: &[Comment]) -> Vec<i64> {
        collection.iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn create_uses_server_fields_where_present() {
        let server = CreatedComment {
            id: Some(CommentId(5)),
            content: Some("Hi".into()),
            status: Some(CommentStatus::Pending),
            created_at: Some(timestamp(0)),
            ..Default::default()
        };

        let collection =
            apply_optimistic_create(Vec::new(), server, &defaults(None));

        assert_eq!(collection.len(), 1);
        let created = &collection[0];
        assert_eq!(created.id, CommentId(5));
        assert_eq!(created.content, "Hi");
        assert_eq!(created.parent_id, None);
        assert!(created.replies.is_empty());
        assert_eq!(created.updated_at, timestamp(0));
        assert_eq!(created.author, author(7));
    }

    #[test]
    fn create_falls_back_to_client_defaults() {
        let created = synthesize(CreatedComment::default(), &defaults(None));

        assert_eq!(created.id, CommentId(timestamp(500).as_millisecond()));
        assert_eq!(created.status, CommentStatus::Pending);
        assert_eq!(created.content, "typed text");
        assert_eq!((created.upvotes, created.downvotes), (0, 0));
        assert_eq!(created.user_vote, None);
    }

    #[test]
    fn roots_are_prepended_and_replies_appended() {
        let collection = vec![comment(1, None), comment(2, None)];
        let reply = CreatedComment {
            id: Some(CommentId(3)),
            ..Default::default()
        };
        let root = CreatedComment {
            id: Some(CommentId(4)),
            ..Default::default()
        };

        let collection = apply_optimistic_create(collection, reply, &defaults(Some(1)));
        let collection = apply_optimistic_create(collection, root, &defaults(None));

        assert_eq!(ids(&collection), vec![4, 1, 2, 3]);
        assert_eq!(collection[3].parent_id, Some(CommentId(1)));
    }

    #[test]
    fn create_replaces_an_existing_id() {
        let collection = vec![comment(1, None), comment(5, None)];
        let server = CreatedComment {
            id: Some(CommentId(5)),
            ..Default::default()
        };

        let collection = apply_optimistic_create(collection, server, &defaults(None));

        assert_eq!(ids(&collection), vec![5, 1]);
    }

    #[test]
    fn edit_merges_and_stamps() {
        let mut collection = vec![comment(1, None), comment(2, Some(1))];
        let changes = UpdateComment {
            content: Some("edited".into()),
            status: None,
        };

        assert!(apply_edit(&mut collection, CommentId(2), &changes, timestamp(900)));
        assert!(!apply_edit(&mut collection, CommentId(9), &changes, timestamp(900)));

        assert_eq!(collection[1].content, "edited");
        assert_eq!(collection[1].status, CommentStatus::Approved);
        assert_eq!(collection[1].updated_at, timestamp(900));
        assert_eq!(collection[1].parent_id, Some(CommentId(1)));
    }

    #[test]
    fn shallow_delete_orphans_grandchildren() {
        let mut collection = chain(3);
        collection.push(comment(9, None));

        let removed = apply_delete(&mut collection, CommentId(2), CascadePolicy::Shallow);

        assert_eq!(removed, 2);
        assert_eq!(ids(&collection), vec![1, 4, 9]);
        assert!(collection.iter().all(|c| c.parent_id != Some(CommentId(2))));
    }

    #[test]
    fn recursive_delete_takes_every_descendant() {
        let mut collection = chain(3);
        collection.push(comment(9, None));

        let removed =
            apply_delete(&mut collection, CommentId(2), CascadePolicy::Recursive);

        assert_eq!(removed, 3);
        assert_eq!(ids(&collection), vec![1, 9]);
    }

    #[test]
    fn vote_on_missing_comment_is_none() {
        let mut collection = vec![comment(1, None)];
        assert_eq!(apply_vote(&mut collection, CommentId(2), VoteDirection::Up), None);
        assert_eq!(
            apply_vote(&mut collection, CommentId(1), VoteDirection::Up),
            Some(Some(VoteDirection::Up))
        );
    }
}
