use async_trait::async_trait;
use serde_json::Value;

use crate::{
    APIClient, ArticleId, ClientError, CommentId, Envelope, requests,
    responses,
};

/// The operations the frontend core performs against the REST backend.
///
/// Hooks and the comment section hold an `Rc<dyn Backend>` rather than
/// reaching for a shared client, so tests can substitute a double.
/// Implementations translate HTTP failures into [`ClientError`] and never
/// panic.
#[async_trait(?Send)]
pub trait Backend {
    async fn current_user(
        &self,
    ) -> Result<Envelope<Option<responses::CurrentUser>>, ClientError>;

    async fn logout(&self) -> Result<Envelope<Value>, ClientError>;

    async fn list_articles(
        &self,
        query: &requests::PageQuery,
    ) -> Result<Envelope<Value>, ClientError>;

    async fn get_article(
        &self,
        article_id: ArticleId,
    ) -> Result<Envelope<responses::Article>, ClientError>;

    async fn list_comments(
        &self,
        article_id: ArticleId,
        query: &requests::PageQuery,
    ) -> Result<Envelope<Value>, ClientError>;

    async fn create_comment(
        &self,
        details: &requests::CreateComment,
    ) -> Result<Envelope<responses::CreatedComment>, ClientError>;

    async fn update_comment(
        &self,
        comment_id: CommentId,
        details: &requests::UpdateComment,
    ) -> Result<Envelope<responses::CreatedComment>, ClientError>;

    async fn delete_comment(
        &self,
        comment_id: CommentId,
    ) -> Result<Envelope<Value>, ClientError>;

    async fn vote_comment(
        &self,
        details: &requests::VoteComment,
    ) -> Result<Envelope<Value>, ClientError>;

    async fn report_comment(
        &self,
        details: &requests::ReportComment,
    ) -> Result<Envelope<Value>, ClientError>;

    async fn moderate_comment(
        &self,
        details: &requests::ModerateComment,
    ) -> Result<Envelope<Value>, ClientError>;

    async fn subscribe_newsletter(
        &self,
        details: &requests::SubscribeNewsletter,
    ) -> Result<Envelope<Value>, ClientError>;
}

#[async_trait(?Send)]
impl Backend for APIClient {
    async fn current_user(
        &self,
    ) -> Result<Envelope<Option<responses::CurrentUser>>, ClientError> {
        APIClient::current_user(self).await
    }

    async fn logout(&self) -> Result<Envelope<Value>, ClientError> {
        APIClient::logout(self).await
    }

    async fn list_articles(
        &self,
        query: &requests::PageQuery,
    ) -> Result<Envelope<Value>, ClientError> {
        self.get_articles(query).await
    }

    async fn get_article(
        &self,
        article_id: ArticleId,
    ) -> Result<Envelope<responses::Article>, ClientError> {
        APIClient::get_article(self, article_id).await
    }

    async fn list_comments(
        &self,
        article_id: ArticleId,
        query: &requests::PageQuery,
    ) -> Result<Envelope<Value>, ClientError> {
        self.get_article_comments(article_id, query).await
    }

    async fn create_comment(
        &self,
        details: &requests::CreateComment,
    ) -> Result<Envelope<responses::CreatedComment>, ClientError> {
        APIClient::create_comment(self, details).await
    }

    async fn update_comment(
        &self,
        comment_id: CommentId,
        details: &requests::UpdateComment,
    ) -> Result<Envelope<responses::CreatedComment>, ClientError> {
        APIClient::update_comment(self, comment_id, details).await
    }

    async fn delete_comment(
        &self,
        comment_id: CommentId,
    ) -> Result<Envelope<Value>, ClientError> {
        APIClient::delete_comment(self, comment_id).await
    }

    async fn vote_comment(
        &self,
        details: &requests::VoteComment,
    ) -> Result<Envelope<Value>, ClientError> {
        APIClient::vote_comment(self, details).await
    }

    async fn report_comment(
        &self,
        details: &requests::ReportComment,
    ) -> Result<Envelope<Value>, ClientError> {
        APIClient::report_comment(self, details).await
    }

    async fn moderate_comment(
        &self,
        details: &requests::ModerateComment,
    ) -> Result<Envelope<Value>, ClientError> {
        APIClient::moderate_comment(self, details).await
    }

    async fn subscribe_newsletter(
        &self,
        details: &requests::SubscribeNewsletter,
    ) -> Result<Envelope<Value>, ClientError> {
        APIClient::subscribe_newsletter(self, details).await
    }
}
