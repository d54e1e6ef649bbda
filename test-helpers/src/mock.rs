//! An in-memory [`Backend`] that replays scripted replies and records
//! every call it receives.
//!
//! Replies are queued per operation and consumed in order. An operation
//! with nothing queued answers `{"success": true, "data": null}`.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use async_trait::async_trait;
use payloads::{
    ArticleId, Backend, ClientError, CommentId, Envelope, requests,
    responses,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Operation {
    CurrentUser,
    Logout,
    ListArticles,
    GetArticle,
    ListComments,
    CreateComment,
    UpdateComment,
    DeleteComment,
    VoteComment,
    ReportComment,
    ModerateComment,
    SubscribeNewsletter,
}

#[derive(Debug, Clone)]
enum Scripted {
    Reply(Value),
    Status(u16, String),
}

#[derive(Debug, Default)]
pub struct MockBackend {
    calls: RefCell<Vec<(Operation, Value)>>,
    scripted: RefCell<HashMap<Operation, VecDeque<Scripted>>>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a raw envelope for `operation`.
    pub fn reply(&self, operation: Operation, envelope: Value) -> &Self {
        self.push(operation, Scripted::Reply(envelope));
        self
    }

    /// Queue `{"success": true, "data": data}` for `operation`.
    pub fn reply_ok(&self, operation: Operation, data: Value) -> &Self {
        self.reply(operation, json!({"success": true, "data": data}))
    }

    /// Queue an HTTP failure for `operation`.
    pub fn fail(
        &self,
        operation: Operation,
        status: u16,
        message: &str,
    ) -> &Self {
        self.push(operation, Scripted::Status(status, message.to_string()));
        self
    }

    pub fn calls(&self, operation: Operation) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|(op, _)| *op == operation)
            .count()
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().len()
    }

    /// The request body (or path arguments) of the latest `operation` call.
    pub fn last_request(&self, operation: Operation) -> Option<Value> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|(op, _)| *op == operation)
            .map(|(_, request)| request.clone())
    }

    fn push(&self, operation: Operation, scripted: Scripted) {
        self.scripted
            .borrow_mut()
            .entry(operation)
            .or_default()
            .push_back(scripted);
    }

    fn respond<T: DeserializeOwned>(
        &self,
        operation: Operation,
        request: impl Serialize,
    ) -> Result<Envelope<T>, ClientError> {
        let request = serde_json::to_value(request)?;
        self.calls.borrow_mut().push((operation, request));

        let next = self
            .scripted
            .borrow_mut()
            .get_mut(&operation)
            .and_then(VecDeque::pop_front);

        match next {
            Some(Scripted::Reply(envelope)) => {
                Ok(serde_json::from_value(envelope)?)
            }
            Some(Scripted::Status(status, message)) => {
                Err(ClientError::APIError {
                    status: StatusCode::from_u16(status)
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    message,
                    data: None,
                })
            }
            None => Ok(serde_json::from_value(
                json!({"success": true, "data": null}),
            )?),
        }
    }
}

#[async_trait(?Send)]
impl Backend for MockBackend {
    async fn current_user(
        &self,
    ) -> Result<Envelope<Option<responses::CurrentUser>>, ClientError> {
        self.respond(Operation::CurrentUser, ())
    }

    async fn logout(&self) -> Result<Envelope<Value>, ClientError> {
        self.respond(Operation::Logout, ())
    }

    async fn list_articles(
        &self,
        query: &requests::PageQuery,
    ) -> Result<Envelope<Value>, ClientError> {
        self.respond(Operation::ListArticles, query)
    }

    async fn get_article(
        &self,
        article_id: ArticleId,
    ) -> Result<Envelope<responses::Article>, ClientError> {
        self.respond(Operation::GetArticle, article_id)
    }

    async fn list_comments(
        &self,
        article_id: ArticleId,
        query: &requests::PageQuery,
    ) -> Result<Envelope<Value>, ClientError> {
        self.respond(
            Operation::ListComments,
            json!({"article_id": article_id, "query": query}),
        )
    }

    async fn create_comment(
        &self,
        details: &requests::CreateComment,
    ) -> Result<Envelope<responses::CreatedComment>, ClientError> {
        self.respond(Operation::CreateComment, details)
    }

    async fn update_comment(
        &self,
        comment_id: CommentId,
        details: &requests::UpdateComment,
    ) -> Result<Envelope<responses::CreatedComment>, ClientError> {
        self.respond(
            Operation::UpdateComment,
            json!({"comment_id": comment_id, "details": details}),
        )
    }

    async fn delete_comment(
        &self,
        comment_id: CommentId,
    ) -> Result<Envelope<Value>, ClientError> {
        self.respond(Operation::DeleteComment, comment_id)
    }

    async fn vote_comment(
        &self,
        details: &requests::VoteComment,
    ) -> Result<Envelope<Value>, ClientError> {
        self.respond(Operation::VoteComment, details)
    }

    async fn report_comment(
        &self,
        details: &requests::ReportComment,
    ) -> Result<Envelope<Value>, ClientError> {
        self.respond(Operation::ReportComment, details)
    }

    async fn moderate_comment(
        &self,
        details: &requests::ModerateComment,
    ) -> Result<Envelope<Value>, ClientError> {
        self.respond(Operation::ModerateComment, details)
    }

    async fn subscribe_newsletter(
        &self,
        details: &requests::SubscribeNewsletter,
    ) -> Result<Envelope<Value>, ClientError> {
        self.respond(Operation::SubscribeNewsletter, details)
    }
}
