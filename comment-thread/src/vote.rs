use payloads::{Comment, VoteDirection};

/// Apply a vote with toggle semantics and return the resulting
/// `user_vote`.
///
/// Repeating the current vote retracts it; voting the other way moves the
/// vote across. Counters never drop below zero.
pub fn toggle(
    comment: &mut Comment,
    direction: VoteDirection,
) -> Option<VoteDirection> {
    match comment.user_vote {
        Some(current) if current == direction => {
            decrement(counter(comment, current));
            comment.user_vote = None;
        }
        Some(current) => {
            decrement(counter(comment, current));
            *counter(comment, direction) += 1;
            comment.user_vote = Some(direction);
        }
        None => {
            *counter(comment, direction) += 1;
            comment.user_vote = Some(direction);
        }
    }
    comment.user_vote
}

fn counter(comment: &mut Comment, direction: VoteDirection) -> &mut u32 {
    match direction {
        VoteDirection::Up => &mut comment.upvotes,
        VoteDirection::Down => &mut comment.downvotes,
    }
}

fn decrement(count: &mut u32) {
    *count = count.saturating_sub(1);
}
