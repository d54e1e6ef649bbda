use crate::{
    ArticleId, CommentId, Envelope, requests, responses,
};
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// An API client for interfacing with the backend.
///
/// Constructed explicitly and handed to whatever needs it; there is no
/// process-wide instance.
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl APIClient {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            inner_client: reqwest::Client::new(),
        }
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}/api/{path}", &self.address)
    }

    async fn get(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> ReqwestResult {
        let request =
            self.inner_client.get(self.format_url(path)).query(query);

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }

    async fn post(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request = self.inner_client.post(self.format_url(path)).json(body);

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }

    async fn put(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request = self.inner_client.put(self.format_url(path)).json(body);

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }

    async fn patch(&self, path: &str, body: &impl Serialize) -> ReqwestResult {
        let request =
            self.inner_client.patch(self.format_url(path)).json(body);

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }

    async fn delete(&self, path: &str) -> ReqwestResult {
        let request = self.inner_client.delete(self.format_url(path));

        #[cfg(target_arch = "wasm32")]
        let request = request.fetch_credentials_include();

        request.send().await
    }
}

/// Methods on the backend API, grouped by resource.
impl APIClient {
    // Session

    /// The signed-in user, or `data: null` when there is no session.
    pub async fn current_user(
        &self,
    ) -> Result<Envelope<Option<responses::CurrentUser>>, ClientError> {
        let response = self.get("auth/me", &[]).await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            return Ok(Envelope::ok(None));
        }
        ok_envelope(response).await
    }

    pub async fn logout(&self) -> Result<Envelope<Value>, ClientError> {
        let response = self.post("auth/logout", &()).await?;
        ok_envelope(response).await
    }

    // Articles

    /// List articles. The articles endpoint wraps its items as
    /// `{articles: [...]}`, so callers normalize with
    /// [`Envelope::into_page`].
    pub async fn get_articles(
        &self,
        query: &requests::PageQuery,
    ) -> Result<Envelope<Value>, ClientError> {
        let response = self.get("articles", &query.to_pairs()).await?;
        ok_envelope(response).await
    }

    pub async fn get_article(
        &self,
        article_id: ArticleId,
    ) -> Result<Envelope<responses::Article>, ClientError> {
        let response = self.get(&format!("articles/{article_id}"), &[]).await?;
        ok_envelope(response).await
    }

    // Comments

    pub async fn get_article_comments(
        &self,
        article_id: ArticleId,
        query: &requests::PageQuery,
    ) -> Result<Envelope<Value>, ClientError> {
        let response = self
            .get(&format!("comments/article/{article_id}"), &query.to_pairs())
            .await?;
        ok_envelope(response).await
    }

    pub async fn create_comment(
        &self,
        details: &requests::CreateComment,
    ) -> Result<Envelope<responses::CreatedComment>, ClientError> {
        let response = self.post("comments", details).await?;
        ok_envelope(response).await
    }

    pub async fn update_comment(
        &self,
        comment_id: CommentId,
        details: &requests::UpdateComment,
    ) -> Result<Envelope<responses::CreatedComment>, ClientError> {
        let response =
            self.put(&format!("comments/{comment_id}"), details).await?;
        ok_envelope(response).await
    }

    pub async fn delete_comment(
        &self,
        comment_id: CommentId,
    ) -> Result<Envelope<Value>, ClientError> {
        let response = self.delete(&format!("comments/{comment_id}")).await?;
        ok_envelope(response).await
    }

    pub async fn vote_comment(
        &self,
        details: &requests::VoteComment,
    ) -> Result<Envelope<Value>, ClientError> {
        let response = self
            .post(&format!("comments/{}/vote", details.comment_id), details)
            .await?;
        ok_envelope(response).await
    }

    pub async fn report_comment(
        &self,
        details: &requests::ReportComment,
    ) -> Result<Envelope<Value>, ClientError> {
        let response = self
            .post(&format!("comments/{}/report", details.comment_id), details)
            .await?;
        ok_envelope(response).await
    }

    // Admin

    /// Approve, reject or re-queue a comment. Moderators and admins only.
    pub async fn moderate_comment(
        &self,
        details: &requests::ModerateComment,
    ) -> Result<Envelope<Value>, ClientError> {
        let response = self
            .patch(
                &format!("admin/comments/{}/status", details.comment_id),
                details,
            )
            .await?;
        ok_envelope(response).await
    }

    // Newsletter

    pub async fn subscribe_newsletter(
        &self,
        details: &requests::SubscribeNewsletter,
    ) -> Result<Envelope<Value>, ClientError> {
        let response = self.post("newsletter/subscribe", details).await?;
        ok_envelope(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// A non-2xx reply. `message` is the envelope's error message when the
    /// body parses as one, otherwise the raw response text.
    #[error("{message}")]
    APIError {
        status: StatusCode,
        message: String,
        data: Option<Value>,
    },
    #[error("Network error. Please check your connection.")]
    Network(#[from] reqwest::Error),
    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Deserialize a successful reply into an envelope, or return an
/// appropriate error.
pub async fn ok_envelope<T: DeserializeOwned>(
    response: reqwest::Response,
) -> Result<Envelope<T>, ClientError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        let (message, data) = match serde_json::from_str::<Envelope<Value>>(
            &text,
        ) {
            Ok(Envelope {
                error: Some(error),
                ..
            }) => (error.message, error.details),
            _ => (text, None),
        };
        return Err(ClientError::APIError {
            status,
            message,
            data,
        });
    }

    Ok(serde_json::from_str(&text)?)
}
