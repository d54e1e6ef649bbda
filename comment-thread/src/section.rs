use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

use fetch_state::{
    Mutation, MutationState, Producer, RequestTracker, producer,
};
use jiff::Timestamp;
use payloads::requests::{
    CreateComment, ModerateComment, ReportComment, UpdateComment,
    VoteComment,
};
use payloads::{
    ArticleId, Backend, ClientError, Comment, CommentId, CommentStatus,
    CreatedComment, CurrentUser, ErrorInfo, ErrorKind, VoteDirection,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::permissions::Permissions;
use crate::reducer::{self, CreateDefaults};
use crate::{SortOrder, StatusFilter, ThreadConfig, tree, validate, view};

type Listener = Rc<dyn Fn()>;

/// Wrap a backend call as a mutation producer.
fn bind<A, R, F, Fut>(backend: &Rc<dyn Backend>, call: F) -> Producer<A, R>
where
    F: Fn(Rc<dyn Backend>, A) -> Fut + 'static,
    Fut: Future<Output = Result<R, ClientError>> + 'static,
{
    let backend = backend.clone();
    producer(move |args: A| call(backend.clone(), args))
}

fn not_found() -> ErrorInfo {
    ErrorInfo::new(ErrorKind::NotFoundError, "That comment no longer exists.")
}

/// The comments of one article and every write made to them.
///
/// The section is the only writer of its collection. Each write checks
/// its local preconditions, goes through its own [`Mutation`], and on
/// success patches the collection with the matching [`reducer`] function
/// instead of refetching.
///
/// Content-bearing writes (create, reply, edit, report) hand failures
/// back to the form that issued them so the message can sit beside the
/// input. Delete, vote and moderate failures become the dismissible
/// [`action_error`](Self::action_error).
///
/// A server 401 on any write signs the section out and fires the
/// [`on_session_expired`](Self::on_session_expired) hook.
pub struct CommentSection {
    article_id: ArticleId,
    config: ThreadConfig,
    user: RefCell<Option<CurrentUser>>,
    comments: RefCell<Vec<Comment>>,
    sort: Cell<SortOrder>,
    filter: Cell<StatusFilter>,
    action_error: RefCell<Option<ErrorInfo>>,
    create: Mutation<CreateComment, Option<CreatedComment>>,
    edit: Mutation<(CommentId, UpdateComment), Option<CreatedComment>>,
    delete: Mutation<CommentId, Value>,
    vote: Mutation<VoteComment, Value>,
    report: Mutation<ReportComment, Value>,
    moderate: Mutation<ModerateComment, Value>,
    tracker: RequestTracker,
    listener: RefCell<Option<Listener>>,
    session_expired: RefCell<Option<Listener>>,
}

impl CommentSection {
    pub fn new(
        backend: Rc<dyn Backend>,
        article_id: ArticleId,
        user: Option<CurrentUser>,
        config: ThreadConfig,
    ) -> Self {
        Self {
            article_id,
            config,
            user: RefCell::new(user),
            comments: RefCell::new(Vec::new()),
            sort: Cell::new(SortOrder::default()),
            filter: Cell::new(StatusFilter::default()),
            action_error: RefCell::new(None),
            create: Mutation::new(bind(&backend, |api, details: CreateComment| {
                async move {
                    api.create_comment(&details).await.map(|e| e.map(Some))
                }
            })),
            edit: Mutation::new(bind(
                &backend,
                |api, (id, details): (CommentId, UpdateComment)| async move {
                    api.update_comment(id, &details).await.map(|e| e.map(Some))
                },
            )),
            delete: Mutation::new(bind(&backend, |api, id: CommentId| {
                async move { api.delete_comment(id).await }
            })),
            vote: Mutation::new(bind(&backend, |api, details: VoteComment| {
                async move { api.vote_comment(&details).await }
            })),
            report: Mutation::new(bind(
                &backend,
                |api, details: ReportComment| async move {
                    api.report_comment(&details).await
                },
            )),
            moderate: Mutation::new(bind(
                &backend,
                |api, details: ModerateComment| async move {
                    api.moderate_comment(&details).await
                },
            )),
            tracker: RequestTracker::new(),
            listener: RefCell::new(None),
            session_expired: RefCell::new(None),
        }
    }

    /// Called after any change to the collection, the view settings, the
    /// action error or a mutation's state.
    pub fn subscribe(&self, listener: impl Fn() + 'static) {
        let listener: Listener = Rc::new(listener);
        let forward = |listener: &Listener| {
            let listener = listener.clone();
            move || listener()
        };
        self.create.subscribe(forward(&listener));
        self.edit.subscribe(forward(&listener));
        self.delete.subscribe(forward(&listener));
        self.vote.subscribe(forward(&listener));
        self.report.subscribe(forward(&listener));
        self.moderate.subscribe(forward(&listener));
        *self.listener.borrow_mut() = Some(listener);
    }

    /// Called when the server rejects the session with a 401.
    pub fn on_session_expired(&self, f: impl Fn() + 'static) {
        *self.session_expired.borrow_mut() = Some(Rc::new(f));
    }

    pub fn article_id(&self) -> ArticleId {
        self.article_id
    }

    pub fn config(&self) -> &ThreadConfig {
        &self.config
    }

    pub fn user(&self) -> Option<CurrentUser> {
        self.user.borrow().clone()
    }

    pub fn set_user(&self, user: Option<CurrentUser>) {
        if *self.user.borrow() == user {
            return;
        }
        *self.user.borrow_mut() = user;
        self.notify();
    }

    /// Swap in a freshly loaded collection.
    pub fn replace_comments(&self, comments: Vec<Comment>) {
        let comments = tree::flatten(comments);
        if *self.comments.borrow() == comments {
            return;
        }
        self.patch(|current| *current = comments);
    }

    pub fn comments(&self) -> Vec<Comment> {
        self.comments.borrow().clone()
    }

    /// Root comments under the current filter and sort.
    pub fn top_level(&self) -> Vec<Comment> {
        let comments = self.comments.borrow();
        view::top_level(&comments, self.filter.get(), self.sort.get())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Direct replies to `id`, in collection order.
    pub fn replies(&self, id: CommentId) -> Vec<Comment> {
        tree::replies_of(&self.comments.borrow(), id).cloned().collect()
    }

    pub fn depth_of(&self, id: CommentId) -> usize {
        tree::depth_of(&self.comments.borrow(), id)
    }

    /// Comments the thread can render: roots of any status and every reply
    /// under one. Replies stranded by a shallow delete are not counted.
    pub fn visible_count(&self) -> usize {
        tree::reachable(&self.comments.borrow()).len()
    }

    pub fn top_level_count(&self) -> usize {
        let comments = self.comments.borrow();
        view::top_level(&comments, self.filter.get(), self.sort.get()).len()
    }

    pub fn sort(&self) -> SortOrder {
        self.sort.get()
    }

    pub fn set_sort(&self, sort: SortOrder) {
        if self.sort.replace(sort) != sort {
            self.notify();
        }
    }

    pub fn filter(&self) -> StatusFilter {
        self.filter.get()
    }

    pub fn set_filter(&self, filter: StatusFilter) {
        if self.filter.replace(filter) != filter {
            self.notify();
        }
    }

    pub fn action_error(&self) -> Option<ErrorInfo> {
        self.action_error.borrow().clone()
    }

    pub fn dismiss_error(&self) {
        if self.action_error.borrow_mut().take().is_some() {
            self.notify();
        }
    }

    pub fn create_state(&self) -> MutationState {
        self.create.snapshot()
    }

    pub fn edit_state(&self) -> MutationState {
        self.edit.snapshot()
    }

    pub fn report_state(&self) -> MutationState {
        self.report.snapshot()
    }

    /// Whether any write is in flight.
    pub fn is_busy(&self) -> bool {
        [
            self.create.snapshot(),
            self.edit.snapshot(),
            self.delete.snapshot(),
            self.vote.snapshot(),
            self.report.snapshot(),
            self.moderate.snapshot(),
        ]
        .iter()
        .any(|state| state.loading)
    }

    pub fn can_edit(&self, comment: &Comment) -> bool {
        self.with_permissions(|p| p.can_edit(comment))
    }

    pub fn can_delete(&self, comment: &Comment) -> bool {
        self.with_permissions(|p| p.can_delete(comment))
    }

    pub fn can_reply(&self, id: CommentId) -> bool {
        let depth = self.depth_of(id);
        self.with_permissions(|p| p.can_reply(depth))
    }

    pub fn can_report(&self, comment: &Comment) -> bool {
        self.with_permissions(|p| p.can_report(comment))
    }

    pub fn can_vote(&self) -> bool {
        self.with_permissions(|p| p.can_vote())
    }

    pub fn can_moderate(&self) -> bool {
        self.with_permissions(|p| p.can_moderate())
    }

    /// Post a new root comment. It is placed first until the next sort.
    pub async fn create(&self, content: &str) -> Result<Comment, ErrorInfo> {
        self.post(None, content).await
    }

    /// Reply to `parent_id`. The reply is appended to the collection.
    pub async fn reply(
        &self,
        parent_id: CommentId,
        content: &str,
    ) -> Result<Comment, ErrorInfo> {
        self.require_user("Please log in to reply.")?;
        if self.find(parent_id).is_none() {
            return Err(not_found());
        }
        if !self.can_reply(parent_id) {
            tracing::debug!(%parent_id, "reply rejected: thread too deep");
            return Err(ErrorInfo::validation(
                "This thread is too deep to reply to.",
            ));
        }
        self.post(Some(parent_id), content).await
    }

    async fn post(
        &self,
        parent_id: Option<CommentId>,
        content: &str,
    ) -> Result<Comment, ErrorInfo> {
        let author = self.require_user("Please log in to comment.")?.as_author();
        let content = validate::content(content)?;

        let created = self
            .send(&self.create, CreateComment {
                article_id: self.article_id,
                content: content.clone(),
                parent_id,
            })
            .await?
            .unwrap_or_default();

        let defaults = CreateDefaults {
            article_id: self.article_id,
            author,
            content,
            parent_id,
            now: Timestamp::now(),
        };
        self.patch(|comments| {
            let current = std::mem::take(comments);
            *comments = reducer::apply_optimistic_create(
                current,
                created.clone(),
                &defaults,
            );
        });
        let comment = reducer::synthesize(created, &defaults);
        tracing::debug!(id = %comment.id, "comment added");
        Ok(comment)
    }

    /// Replace the body of comment `id`.
    pub async fn edit(
        &self,
        id: CommentId,
        content: &str,
    ) -> Result<(), ErrorInfo> {
        self.require_user("Please log in to edit comments.")?;
        let comment = self.find(id).ok_or_else(not_found)?;
        if !self.can_edit(&comment) {
            return Err(ErrorInfo::permission(
                "You can only edit your own comments.",
            ));
        }
        let changes = UpdateComment {
            content: Some(validate::content(content)?),
            status: None,
        };

        self.send(&self.edit, (id, changes.clone())).await?;
        self.patch(|comments| {
            reducer::apply_edit(comments, id, &changes, Timestamp::now())
        });
        Ok(())
    }

    /// Delete comment `id` along with the replies the configured cascade
    /// takes. Returns how many comments left the collection.
    pub async fn delete(&self, id: CommentId) -> Result<usize, ErrorInfo> {
        let result = self.try_delete(id).await;
        self.record(result)
    }

    async fn try_delete(&self, id: CommentId) -> Result<usize, ErrorInfo> {
        self.require_user("Please log in to delete comments.")?;
        let comment = self.find(id).ok_or_else(not_found)?;
        if !self.can_delete(&comment) {
            return Err(ErrorInfo::permission(
                "You can only delete your own comments.",
            ));
        }

        self.send(&self.delete, id).await?;
        let cascade = self.config.cascade;
        let removed = self
            .patch(|comments| reducer::apply_delete(comments, id, cascade))
            .unwrap_or_default();
        tracing::debug!(%id, %cascade, removed, "comment deleted");
        Ok(removed)
    }

    /// Vote on comment `id`; repeating the current vote retracts it.
    /// Returns the viewer's vote afterwards.
    pub async fn vote(
        &self,
        id: CommentId,
        direction: VoteDirection,
    ) -> Result<Option<VoteDirection>, ErrorInfo> {
        let result = self.try_vote(id, direction).await;
        self.record(result)
    }

    async fn try_vote(
        &self,
        id: CommentId,
        direction: VoteDirection,
    ) -> Result<Option<VoteDirection>, ErrorInfo> {
        self.require_user("Please log in to vote.")?;
        let comment = self.find(id).ok_or_else(not_found)?;

        self.send(&self.vote, VoteComment {
            comment_id: id,
            vote_type: direction,
        })
        .await?;
        let user_vote = self
            .patch(|comments| reducer::apply_vote(comments, id, direction))
            .flatten()
            // Gone or disposed meanwhile; report what the toggle implies.
            .unwrap_or_else(|| {
                let mut comment = comment;
                crate::vote::toggle(&mut comment, direction)
            });
        Ok(user_vote)
    }

    /// Report comment `id` for moderation.
    pub async fn report(
        &self,
        id: CommentId,
        reason: &str,
    ) -> Result<(), ErrorInfo> {
        self.require_user("Please log in to report comments.")?;
        let comment = self.find(id).ok_or_else(not_found)?;
        if !self.can_report(&comment) {
            return Err(ErrorInfo::permission(
                "You cannot report your own comment.",
            ));
        }
        let reason = validate::report_reason(reason)?;

        self.send(&self.report, ReportComment {
            comment_id: id,
            reason,
        })
        .await?;
        tracing::debug!(%id, "comment reported");
        Ok(())
    }

    /// Set the moderation status of comment `id`. Elevated users only.
    pub async fn moderate(
        &self,
        id: CommentId,
        status: CommentStatus,
    ) -> Result<(), ErrorInfo> {
        let result = self.try_moderate(id, status).await;
        self.record(result)
    }

    async fn try_moderate(
        &self,
        id: CommentId,
        status: CommentStatus,
    ) -> Result<(), ErrorInfo> {
        self.require_user("Please log in to moderate comments.")?;
        if !self.can_moderate() {
            return Err(ErrorInfo::permission(
                "Only moderators can change a comment's status.",
            ));
        }
        self.find(id).ok_or_else(not_found)?;

        self.send(&self.moderate, ModerateComment {
            comment_id: id,
            status,
        })
        .await?;
        let changes = UpdateComment {
            content: None,
            status: Some(status),
        };
        self.patch(|comments| {
            reducer::apply_edit(comments, id, &changes, Timestamp::now())
        });
        tracing::debug!(%id, %status, "comment moderated");
        Ok(())
    }

    /// Stop applying results. Requests already in flight still settle
    /// for their callers but no longer touch the collection.
    pub fn dispose(&self) {
        self.tracker.dispose();
        self.create.dispose();
        self.edit.dispose();
        self.delete.dispose();
        self.vote.dispose();
        self.report.dispose();
        self.moderate.dispose();
    }

    fn find(&self, id: CommentId) -> Option<Comment> {
        tree::find(&self.comments.borrow(), id).cloned()
    }

    fn with_permissions<R>(&self, f: impl FnOnce(Permissions<'_>) -> R) -> R {
        let user = self.user.borrow();
        f(Permissions::new(user.as_ref(), &self.config))
    }

    fn require_user(&self, message: &str) -> Result<CurrentUser, ErrorInfo> {
        self.user().ok_or_else(|| {
            tracing::debug!("rejected locally: not signed in");
            ErrorInfo::auth(message)
        })
    }

    /// Run `mutation`, signing out when the server rejects the session.
    async fn send<A, T>(
        &self,
        mutation: &Mutation<A, T>,
        args: A,
    ) -> Result<T, ErrorInfo>
    where
        A: 'static,
        T: DeserializeOwned + 'static,
    {
        let result = mutation.mutate(args).await;
        if let Err(error) = &result
            && error.is_session_expired()
        {
            self.expire_session();
        }
        result
    }

    fn expire_session(&self) {
        tracing::warn!("session rejected by the server, signing out");
        if self.tracker.is_live() {
            self.set_user(None);
        }
        let hook = self.session_expired.borrow().clone();
        if let Some(hook) = hook {
            hook();
        }
    }

    /// Surface a failure as the section's action error.
    fn record<T>(
        &self,
        result: Result<T, ErrorInfo>,
    ) -> Result<T, ErrorInfo> {
        if let Err(error) = &result
            && self.tracker.is_live()
        {
            *self.action_error.borrow_mut() = Some(error.clone());
            self.notify();
        }
        result
    }

    /// Mutate the collection unless the section has been disposed.
    fn patch<R>(&self, f: impl FnOnce(&mut Vec<Comment>) -> R) -> Option<R> {
        if !self.tracker.is_live() {
            tracing::debug!("section disposed, dropping update");
            return None;
        }
        let result = f(&mut self.comments.borrow_mut());
        self.notify();
        Some(result)
    }

    fn notify(&self) {
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}
