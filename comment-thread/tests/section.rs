use std::cell::Cell;
use std::rc::Rc;

use comment_thread::{
    CascadePolicy, CommentSection, SortOrder, StatusFilter, ThreadConfig,
};
use payloads::{CommentId, CommentStatus, ErrorKind, Role, VoteDirection};
use serde_json::json;
use test_helpers::fixtures::{ARTICLE, chain, comment, comment_by, timestamp, user};
use test_helpers::{MockBackend, Operation, init_test_tracing};

fn section_for(
    role: Option<Role>,
    config: ThreadConfig,
) -> (CommentSection, Rc<MockBackend>) {
    init_test_tracing();
    let backend = Rc::new(MockBackend::new());
    let section = CommentSection::new(
        backend.clone(),
        ARTICLE,
        role.map(|role| user(1, role)),
        config,
    );
    (section, backend)
}

fn signed_in() -> (CommentSection, Rc<MockBackend>) {
    section_for(Some(Role::User), ThreadConfig::default())
}

fn ids(comments: &[payloads::Comment]) -> Vec<i64> {
    comments.iter().map(|c| c.id.0).collect()
}

#[tokio::test]
async fn create_top_level_comment() -> anyhow::Result<()> {
    let (section, backend) = signed_in();
    backend.reply_ok(
        Operation::CreateComment,
        json!({
            "id": 5,
            "content": "Hi",
            "status": "pending",
            "created_at": "2024-01-01T00:00:00Z"
        }),
    );

    section.create("Hi").await?;

    let top = section.top_level();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].id, CommentId(5));
    assert_eq!(top[0].parent_id, None);
    assert!(top[0].replies.is_empty());
    assert_eq!(top[0].status, CommentStatus::Pending);
    assert_eq!(top[0].created_at, timestamp(0));
    assert_eq!(
        backend.last_request(Operation::CreateComment),
        Some(json!({"article_id": 1, "content": "Hi", "parent_id": null}))
    );
    Ok(())
}

#[tokio::test]
async fn create_without_server_fields_uses_defaults() -> anyhow::Result<()> {
    let (section, _backend) = signed_in();
    section.replace_comments(vec![comment(1, None)]);

    let created = section.create("  Fresh take  ").await?;

    assert_eq!(created.content, "Fresh take");
    assert_eq!(created.status, CommentStatus::Pending);
    assert_eq!(created.author.id, user(1, Role::User).id);
    // Prepended regardless of the current sort.
    assert_eq!(ids(&section.comments()), vec![created.id.0, 1]);
    Ok(())
}

#[tokio::test]
async fn blank_content_is_rejected_before_sending() {
    let (section, backend) = signed_in();

    let error = section.create(" \n ").await.unwrap_err();

    assert_eq!(error.kind, ErrorKind::ValidationError);
    assert_eq!(backend.total_calls(), 0);
    assert!(section.action_error().is_none());
}

#[tokio::test]
async fn reply_is_rejected_at_max_depth() {
    let (section, backend) = signed_in();
    section.replace_comments(chain(3));

    assert!(section.can_reply(CommentId(3)));
    assert!(!section.can_reply(CommentId(4)));

    let error = section.reply(CommentId(4), "too deep").await.unwrap_err();

    assert_eq!(error.kind, ErrorKind::ValidationError);
    assert_eq!(backend.calls(Operation::CreateComment), 0);
}

#[tokio::test]
async fn reply_is_appended_under_its_parent() -> anyhow::Result<()> {
    let (section, backend) = signed_in();
    section.replace_comments(vec![comment(1, None), comment(2, None)]);
    backend.reply_ok(Operation::CreateComment, json!({"id": 30}));

    section.reply(CommentId(1), "agreed").await?;

    assert_eq!(ids(&section.comments()), vec![1, 2, 30]);
    assert_eq!(ids(&section.replies(CommentId(1))), vec![30]);
    assert_eq!(section.depth_of(CommentId(30)), 1);
    Ok(())
}

#[tokio::test]
async fn unauthenticated_vote_makes_no_call() {
    let (section, backend) = section_for(None, ThreadConfig::default());
    section.replace_comments(vec![comment(1, None)]);

    let error = section
        .vote(CommentId(1), VoteDirection::Up)
        .await
        .unwrap_err();

    assert_eq!(error.kind, ErrorKind::AuthError);
    assert_eq!(backend.total_calls(), 0);
    assert_eq!(section.action_error(), Some(error));

    section.dismiss_error();
    assert!(section.action_error().is_none());
}

#[tokio::test]
async fn voting_up_twice_restores_the_comment() -> anyhow::Result<()> {
    let (section, backend) = signed_in();
    let mut original = comment(1, None);
    original.upvotes = 3;
    section.replace_comments(vec![original.clone()]);

    assert_eq!(
        section.vote(CommentId(1), VoteDirection::Up).await?,
        Some(VoteDirection::Up)
    );
    assert_eq!(section.comments()[0].upvotes, 4);
    assert_eq!(section.vote(CommentId(1), VoteDirection::Up).await?, None);

    assert_eq!(section.comments(), vec![original]);
    assert_eq!(backend.calls(Operation::VoteComment), 2);
    Ok(())
}

#[tokio::test]
async fn shallow_delete_removes_direct_replies_only() -> anyhow::Result<()> {
    let (section, _backend) = signed_in();
    section.replace_comments(chain(3));

    let removed = section.delete(CommentId(2)).await?;

    assert_eq!(removed, 2);
    let remaining = section.comments();
    assert_eq!(ids(&remaining), vec![1, 4]);
    assert!(remaining.iter().all(|c| c.id != CommentId(2)
        && c.parent_id != Some(CommentId(2))));
    // 4 still points at the removed 3, so only the root is shown and counted
    assert_eq!(section.visible_count(), 1);
    Ok(())
}

#[tokio::test]
async fn server_401_signs_the_section_out() {
    let (section, backend) = signed_in();
    section.replace_comments(vec![comment(1, None)]);
    let expired = Rc::new(Cell::new(0));
    section.on_session_expired({
        let expired = expired.clone();
        move || expired.set(expired.get() + 1)
    });
    backend.fail(Operation::DeleteComment, 401, "session expired");

    let error = section.delete(CommentId(1)).await.unwrap_err();

    assert_eq!(error.kind, ErrorKind::AuthError);
    assert_eq!(expired.get(), 1);
    assert!(section.user().is_none());
    assert!(!section.can_vote());
    assert_eq!(section.visible_count(), 1);
    assert_eq!(section.action_error().map(|e| e.kind), Some(ErrorKind::AuthError));

    // Signed out now, so the next write is refused without a call
    let error = section.create("Hello again").await.unwrap_err();
    assert_eq!(error.kind, ErrorKind::AuthError);
    assert_eq!(expired.get(), 1);
    assert_eq!(backend.calls(Operation::CreateComment), 0);
}

#[tokio::test]
async fn forbidden_write_keeps_the_session() {
    let (section, backend) = signed_in();
    section.replace_comments(vec![comment(1, None)]);
    let expired = Rc::new(Cell::new(0));
    section.on_session_expired({
        let expired = expired.clone();
        move || expired.set(expired.get() + 1)
    });
    backend.fail(Operation::VoteComment, 403, "not allowed");

    let error = section.vote(CommentId(1), VoteDirection::Up).await.unwrap_err();

    assert_eq!(error.kind, ErrorKind::PermissionError);
    assert_eq!(expired.get(), 0);
    assert!(section.user().is_some());
}

#[tokio::test]
async fn recursive_delete_removes_the_whole_subtree() -> anyhow::Result<()> {
    let config = ThreadConfig {
        cascade: CascadePolicy::Recursive,
        ..ThreadConfig::default()
    };
    let (section, _backend) = section_for(Some(Role::User), config);
    section.replace_comments(chain(3));

    assert_eq!(section.delete(CommentId(2)).await?, 3);
    assert_eq!(ids(&section.comments()), vec![1]);
    Ok(())
}

#[tokio::test]
async fn failed_delete_keeps_the_comment_and_sets_action_error() {
    let (section, backend) = signed_in();
    section.replace_comments(vec![comment(1, None)]);
    backend.fail(Operation::DeleteComment, 500, "database unavailable");

    let error = section.delete(CommentId(1)).await.unwrap_err();

    assert_eq!(error.kind, ErrorKind::ServerError);
    assert!(error.is_transient());
    assert_eq!(section.visible_count(), 1);
    assert_eq!(
        section.action_error().map(|e| e.message),
        Some("database unavailable".to_string())
    );
}

#[tokio::test]
async fn only_owner_or_elevated_may_edit_and_delete() -> anyhow::Result<()> {
    let (section, backend) = signed_in();
    section.replace_comments(vec![comment_by(1, None, 2), comment(2, None)]);

    let error = section.edit(CommentId(1), "mine now").await.unwrap_err();
    assert_eq!(error.kind, ErrorKind::PermissionError);
    let error = section.delete(CommentId(1)).await.unwrap_err();
    assert_eq!(error.kind, ErrorKind::PermissionError);
    assert_eq!(backend.total_calls(), 0);

    section.edit(CommentId(2), "reworded").await?;

    let edited = &section.comments()[1];
    assert_eq!(edited.content, "reworded");
    assert!(edited.is_edited());
    assert_eq!(
        backend.last_request(Operation::UpdateComment),
        Some(json!({"comment_id": 2, "details": {"content": "reworded"}}))
    );
    Ok(())
}

#[tokio::test]
async fn admin_may_edit_anyone() -> anyhow::Result<()> {
    let (section, _backend) =
        section_for(Some(Role::Admin), ThreadConfig::default());
    section.replace_comments(vec![comment_by(1, None, 2)]);

    section.edit(CommentId(1), "moderated wording").await?;

    assert_eq!(section.comments()[0].content, "moderated wording");
    Ok(())
}

#[tokio::test]
async fn report_validates_reason_and_ownership() -> anyhow::Result<()> {
    let (section, backend) = signed_in();
    section.replace_comments(vec![comment(1, None), comment_by(2, None, 5)]);

    let error = section.report(CommentId(2), "   ").await.unwrap_err();
    assert_eq!(error.kind, ErrorKind::ValidationError);
    let error = section.report(CommentId(1), "spam").await.unwrap_err();
    assert_eq!(error.kind, ErrorKind::PermissionError);
    assert_eq!(backend.total_calls(), 0);
    assert!(!section.can_report(&section.comments()[0]));

    section.report(CommentId(2), "  spam  ").await?;

    assert_eq!(
        backend.last_request(Operation::ReportComment),
        Some(json!({"comment_id": 2, "reason": "spam"}))
    );
    assert!(section.report_state().success);
    Ok(())
}

#[tokio::test]
async fn moderation_requires_an_elevated_role() -> anyhow::Result<()> {
    let (section, backend) = signed_in();
    section.replace_comments(vec![comment(1, None)]);

    let error = section
        .moderate(CommentId(1), CommentStatus::Rejected)
        .await
        .unwrap_err();
    assert_eq!(error.kind, ErrorKind::PermissionError);
    assert_eq!(backend.total_calls(), 0);

    let (section, backend) =
        section_for(Some(Role::Moderator), ThreadConfig::default());
    section.replace_comments(vec![comment(1, None)]);

    section.moderate(CommentId(1), CommentStatus::Rejected).await?;

    assert_eq!(section.comments()[0].status, CommentStatus::Rejected);
    assert_eq!(
        backend.last_request(Operation::ModerateComment),
        Some(json!({"comment_id": 1, "status": "rejected"}))
    );
    Ok(())
}

#[tokio::test]
async fn filter_and_sort_apply_to_top_level_only() {
    let (section, _backend) = signed_in();
    let mut pending_root = comment(3, None);
    pending_root.status = CommentStatus::Pending;
    let mut pending_reply = comment(4, Some(1));
    pending_reply.status = CommentStatus::Pending;
    section.replace_comments(vec![
        comment(1, None),
        comment(2, None),
        pending_root,
        pending_reply,
    ]);

    section.set_filter(StatusFilter::Approved);
    section.set_sort(SortOrder::Oldest);

    assert_eq!(ids(&section.top_level()), vec![1, 2]);
    assert_eq!(section.top_level(), section.top_level());
    assert_eq!(section.top_level_count(), 2);
    assert_eq!(section.visible_count(), 4);
    // Replies follow a visible parent whatever their own status.
    assert_eq!(ids(&section.replies(CommentId(1))), vec![4]);
}

#[tokio::test]
async fn listener_hears_changes() {
    let (section, _backend) = signed_in();
    let notified = Rc::new(Cell::new(0));
    section.subscribe({
        let notified = notified.clone();
        move || notified.set(notified.get() + 1)
    });

    section.replace_comments(vec![comment(1, None)]);
    section.set_sort(SortOrder::Popular);
    section.set_sort(SortOrder::Popular);

    assert_eq!(notified.get(), 2);
}

#[tokio::test]
async fn user_changes_notify_only_when_the_user_differs() {
    let (section, _backend) = signed_in();
    let notified = Rc::new(Cell::new(0));
    section.subscribe({
        let notified = notified.clone();
        move || notified.set(notified.get() + 1)
    });

    section.set_user(Some(user(1, Role::User)));
    assert_eq!(notified.get(), 0);

    section.set_user(None);
    assert_eq!(notified.get(), 1);
    assert!(!section.can_vote());

    section.set_user(Some(user(2, Role::Admin)));
    assert_eq!(notified.get(), 2);
    assert!(section.can_moderate());
}

#[tokio::test]
async fn nothing_is_patched_after_dispose() -> anyhow::Result<()> {
    let (section, backend) = signed_in();
    section.replace_comments(vec![comment(1, None)]);
    section.dispose();

    section.create("late").await?;

    assert_eq!(backend.calls(Operation::CreateComment), 1);
    assert_eq!(ids(&section.comments()), vec![1]);
    Ok(())
}
