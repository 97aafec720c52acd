mod http;

#[cfg(test)]
pub mod fake;

pub use http::HttpBackend;

use std::{future::Future, sync::Arc, time::Duration};

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use tokio::sync::{Semaphore, SemaphorePermit};

use crate::{
    config::Config,
    error::ApiResult,
    model::{
        ChatMessage, Comment, Conversation, MediaUpload, Notification, Post, Reel, SentMessage,
        SignUp, Story, User,
    },
};

/// The Socialgram backend as seen by the client.
pub trait Backend: Send + Sync {
    fn home_feed(&self) -> impl Future<Output = ApiResult<Vec<Post>>> + Send;
    fn explore_feed(&self) -> impl Future<Output = ApiResult<Vec<Post>>> + Send;
    fn user(&self, username: &str) -> impl Future<Output = ApiResult<User>> + Send;
    fn user_posts(&self, username: &str) -> impl Future<Output = ApiResult<Vec<Post>>> + Send;
    fn stories(&self) -> impl Future<Output = ApiResult<Vec<Story>>> + Send;
    fn reels(&self) -> impl Future<Output = ApiResult<Vec<Reel>>> + Send;
    fn notifications(&self) -> impl Future<Output = ApiResult<Vec<Notification>>> + Send;
    fn suggestions(&self) -> impl Future<Output = ApiResult<Vec<User>>> + Send;
    fn conversations(&self) -> impl Future<Output = ApiResult<Vec<Conversation>>> + Send;

    fn like_post(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn unlike_post(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn like_reel(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn unlike_reel(&self, id: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn comment_post(&self, id: &str, text: &str)
        -> impl Future<Output = ApiResult<Comment>> + Send;
    fn comment_reel(&self, id: &str, text: &str)
        -> impl Future<Output = ApiResult<Comment>> + Send;
    fn follow(&self, username: &str) -> impl Future<Output = ApiResult<()>> + Send;
    fn unfollow(&self, username: &str) -> impl Future<Output = ApiResult<()>> + Send;

    fn create_post(
        &self,
        media: &MediaUpload,
        caption: &str,
    ) -> impl Future<Output = ApiResult<Post>> + Send;
    fn repost(&self, original_id: &str, comment: &str)
        -> impl Future<Output = ApiResult<Post>> + Send;
    fn create_story(&self, media: &MediaUpload) -> impl Future<Output = ApiResult<Story>> + Send;
    fn send_message(
        &self,
        recipient: &str,
        text: &str,
    ) -> impl Future<Output = ApiResult<SentMessage>> + Send;

    fn generate_caption(&self, media: &MediaUpload)
        -> impl Future<Output = ApiResult<String>> + Send;
    fn chatbot(&self, history: &[ChatMessage]) -> impl Future<Output = ApiResult<String>> + Send;

    fn login(&self, username: &str, password: &str)
        -> impl Future<Output = ApiResult<User>> + Send;
    fn signup(&self, details: &SignUp) -> impl Future<Output = ApiResult<User>> + Send;
}

/// Shared HTTP plumbing: one connection pool, a concurrency cap, and an
/// optional retry policy for reads.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    semaphore: Arc<Semaphore>,
    retries: u32,
}

impl ApiClient {
    pub fn new(config: &Config) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout()))
            .build()?;
        Ok(Self {
            client,
            semaphore: Arc::new(Semaphore::new(config.limit())),
            retries: config.retries(),
        })
    }

    /// Client for idempotent reads, retrying transient failures if configured.
    pub async fn reader(&self) -> ApiResult<(ClientWithMiddleware, SemaphorePermit<'_>)> {
        let permit = self.semaphore.acquire().await?;
        let mut builder = ClientBuilder::new(self.client.clone());
        if self.retries > 0 {
            let retry_policy = ExponentialBackoff::builder().build_with_max_retries(self.retries);
            builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
        }
        Ok((builder.build(), permit))
    }

    /// Client for mutations. These are never retried.
    pub async fn writer(&self) -> ApiResult<(Client, SemaphorePermit<'_>)> {
        let permit = self.semaphore.acquire().await?;
        Ok((self.client.clone(), permit))
    }
}
