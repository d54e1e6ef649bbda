//! Which actions the viewer may take on a comment.
//!
//! These gate both what the ui offers and what `CommentSection` will
//! attempt, so a rejected precondition never reaches the backend.

use payloads::{Comment, CurrentUser};

use crate::ThreadConfig;

#[derive(Debug, Clone, Copy)]
pub struct Permissions<'a> {
    user: Option<&'a CurrentUser>,
    config: &'a ThreadConfig,
}

impl<'a> Permissions<'a> {
    pub fn new(user: Option<&'a CurrentUser>, config: &'a ThreadConfig) -> Self {
        Self { user, config }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    fn is_owner(&self, comment: &Comment) -> bool {
        self.user.is_some_and(|user| user.id == comment.author.id)
    }

    fn is_elevated(&self) -> bool {
        self.user.is_some_and(|user| self.config.is_elevated(user.role))
    }

    pub fn can_edit(&self, comment: &Comment) -> bool {
        self.is_owner(comment) || self.is_elevated()
    }

    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.can_edit(comment)
    }

    /// `depth` is the depth of the comment being replied to.
    pub fn can_reply(&self, depth: usize) -> bool {
        self.is_authenticated() && depth < self.config.max_depth
    }

    /// Hidden for anonymous viewers and on the viewer's own comments.
    pub fn can_report(&self, comment: &Comment) -> bool {
        self.is_authenticated() && !self.is_owner(comment)
    }

    pub fn can_vote(&self) -> bool {
        self.is_authenticated()
    }

    pub fn can_moderate(&self) -> bool {
        self.is_elevated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::Role;
    use test_helpers::fixtures::{comment_by, user};

    #[test]
    fn owner_and_elevated_may_edit() {
        let config = ThreadConfig::default();
        let theirs = comment_by(1, None, 2);
        let owner = user(2, Role::User);
        let stranger = user(3, Role::User);
        let admin = user(4, Role::Admin);

        assert!(Permissions::new(Some(&owner), &config).can_delete(&theirs));
        assert!(!Permissions::new(Some(&stranger), &config).can_edit(&theirs));
        assert!(Permissions::new(Some(&admin), &config).can_edit(&theirs));
        assert!(!Permissions::new(None, &config).can_edit(&theirs));
    }

    #[test]
    fn reply_needs_auth_and_headroom() {
        let config = ThreadConfig::default();
        let viewer = user(1, Role::User);
        let signed_in = Permissions::new(Some(&viewer), &config);

        assert!(signed_in.can_reply(2));
        assert!(!signed_in.can_reply(3));
        assert!(!Permissions::new(None, &config).can_reply(0));
    }

    #[test]
    fn report_hidden_on_own_comment() {
        let config = ThreadConfig::default();
        let viewer = user(1, Role::User);
        let permissions = Permissions::new(Some(&viewer), &config);

        assert!(!permissions.can_report(&comment_by(1, None, 1)));
        assert!(permissions.can_report(&comment_by(2, None, 5)));
        assert!(!permissions.can_moderate());
    }
}
