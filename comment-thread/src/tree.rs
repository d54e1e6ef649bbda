//! Threading derived from `parent_id`.
//!
//! Nothing here caches an adjacency index: every query walks the flat
//! collection, so the answers always match the collection as it is now.
//! Dangling parents and cycles terminate walks instead of looping.

use std::collections::{HashSet, VecDeque};

use payloads::{Comment, CommentId};

pub fn find(comments: &[Comment], id: CommentId) -> Option<&Comment> {
    comments.iter().find(|c| c.id == id)
}

/// Direct replies to `id`, in collection order.
pub fn replies_of(
    comments: &[Comment],
    id: CommentId,
) -> impl Iterator<Item = &Comment> {
    comments.iter().filter(move |c| c.parent_id == Some(id))
}

/// Number of ancestors present in the collection. Roots are 0.
pub fn depth_of(comments: &[Comment], id: CommentId) -> usize {
    let mut seen = HashSet::from([id]);
    let mut depth = 0;
    let mut next = find(comments, id).and_then(|c| c.parent_id);

    while let Some(parent_id) = next {
        if !seen.insert(parent_id) {
            break;
        }
        let Some(parent) = find(comments, parent_id) else {
            break;
        };
        depth += 1;
        next = parent.parent_id;
    }
    depth
}

/// Every transitive reply to `id`, excluding `id` itself.
pub fn descendants(comments: &[Comment], id: CommentId) -> HashSet<CommentId> {
    let mut found = HashSet::new();
    let mut queue = VecDeque::from([id]);

    while let Some(current) = queue.pop_front() {
        for reply in replies_of(comments, current) {
            if reply.id != id && found.insert(reply.id) {
                queue.push_back(reply.id);
            }
        }
    }
    found
}

/// Roots and every transitive reply to one. Replies stranded under a
/// parent that left the collection are not reachable.
pub fn reachable(comments: &[Comment]) -> HashSet<CommentId> {
    let mut found = HashSet::new();
    let mut queue: VecDeque<CommentId> = comments
        .iter()
        .filter(|c| c.is_root())
        .map(|c| c.id)
        .collect();

    while let Some(current) = queue.pop_front() {
        if found.insert(current) {
            queue.extend(replies_of(comments, current).map(|c| c.id));
        }
    }
    found
}

/// Flatten replies some endpoints pre-nest under `replies` into the
/// collection, filling in `parent_id` where the nested record omits it.
pub fn flatten(comments: Vec<Comment>) -> Vec<Comment> {
    let mut flat = Vec::with_capacity(comments.len());
    let mut stack: Vec<Comment> = comments.into_iter().rev().collect();

    while let Some(mut comment) = stack.pop() {
        let replies = std::mem::take(&mut comment.replies);
        let parent = comment.id;
        flat.push(comment);
        stack.extend(replies.into_iter().rev().map(|mut reply| {
            reply.parent_id.get_or_insert(parent);
            reply
        }));
    }
    flat
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_helpers::fixtures::{chain, comment};

    fn ids<'a>(it: impl IntoIterator<Item = &'a Comment>) -> Vec<i64> {
        it.into_iter().map(|c| c.id.0).collect()
    }

    #[test]
    fn replies_are_exactly_the_matching_parent_ids() {
        let comments = vec![
            comment(1, None),
            comment(2, Some(1)),
            comment(3, None),
            comment(4, Some(1)),
            comment(5, Some(2)),
        ];

        assert_eq!(ids(replies_of(&comments, CommentId(1))), vec![2, 4]);
        assert_eq!(ids(replies_of(&comments, CommentId(3))), Vec::<i64>::new());
    }

    #[test]
    fn depth_counts_ancestors() {
        let comments = chain(3);
        assert_eq!(depth_of(&comments, CommentId(1)), 0);
        assert_eq!(depth_of(&comments, CommentId(4)), 3);
    }

    #[test]
    fn depth_stops_at_dangling_parent_and_cycles() {
        let comments = vec![
            comment(2, Some(99)),
            comment(10, Some(11)),
            comment(11, Some(10)),
        ];
        assert_eq!(depth_of(&comments, CommentId(2)), 0);
        assert_eq!(depth_of(&comments, CommentId(10)), 1);
    }

    #[test]
    fn descendants_are_transitive() {
        let mut comments = chain(3);
        comments.push(comment(9, None));

        let mut found: Vec<i64> =
            descendants(&comments, CommentId(2)).into_iter().map(|id| id.0).collect();
        found.sort();
        assert_eq!(found, vec![3, 4]);
    }

    #[test]
    fn stranded_replies_are_not_reachable() {
        // 1 <- 2 <- 3, and 5 hangs off a parent that is gone
        let comments =
            vec![comment(1, None), comment(3, Some(2)), comment(5, Some(4))];
        assert_eq!(reachable(&comments), HashSet::from([CommentId(1)]));

        let mut whole = chain(2);
        whole.push(comment(9, None));
        assert_eq!(reachable(&whole).len(), 4);
    }

    #[test]
    fn flatten_lifts_nested_replies() {
        let mut root = comment(1, None);
        let mut reply = comment(2, None);
        reply.replies = vec![comment(3, Some(2))];
        root.replies = vec![reply];

        let flat = flatten(vec![root, comment(4, None)]);

        assert_eq!(ids(&flat), vec![1, 2, 3, 4]);
        assert_eq!(flat[1].parent_id, Some(CommentId(1)));
        assert!(flat.iter().all(|c| c.replies.is_empty()));
    }
}
