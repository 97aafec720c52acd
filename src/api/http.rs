use log::{debug, log_enabled, trace};
use reqwest::{
    header,
    multipart::{Form, Part},
    Method, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use url::Url;

use super::{ApiClient, Backend};
use crate::{
    config::Config,
    error::{ApiError, ApiResult},
    model::{
        ChatMessage, Comment, Conversation, MediaUpload, Notification, Post, Reel, SentMessage,
        SignUp, Story, User,
    },
};

const USER_AGENT: &str = concat!("socialgram/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpBackend {
    inner: ApiClient,
    base: Url,
    token: Option<String>,
}

impl HttpBackend {
    pub fn new(config: &Config) -> ApiResult<Self> {
        Ok(Self {
            inner: ApiClient::new(config)?,
            base: config.api().clone(),
            token: config.token().map(str::to_string),
        })
    }

    /// Joins path segments onto the API base, percent-encoding each one.
    pub fn endpoint(&self, segments: &[&str]) -> ApiResult<Url> {
        let path = segments
            .iter()
            .map(|segment| urlencoding::encode(segment))
            .collect::<Vec<_>>()
            .join("/");
        let base = self.base.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    fn wrap_request<B: RequestHeaders>(&self, builder: B) -> B {
        let builder = builder.with_header(header::USER_AGENT.as_str(), USER_AGENT);
        match &self.token {
            Some(token) => builder.with_header(
                header::AUTHORIZATION.as_str(),
                &format!("Bearer {}", token),
            ),
            None => builder,
        }
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> ApiResult<T> {
        let url = self.endpoint(segments)?;
        let (client, _permit) = self.inner.reader().await?;
        debug!("GET {}", url);
        let response = self.wrap_request(client.get(url.clone())).send().await?;
        decode(check(Method::GET, url, response)?).await
    }

    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<Value>,
    ) -> ApiResult<Response> {
        let url = self.endpoint(segments)?;
        let (client, _permit) = self.inner.writer().await?;
        debug!("{} {}", method, url);
        let mut request = self.wrap_request(client.request(method.clone(), url.clone()));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        check(method, url, response)
    }

    async fn upload(&self, segments: &[&str], form: Form) -> ApiResult<Response> {
        let url = self.endpoint(segments)?;
        let (client, _permit) = self.inner.writer().await?;
        debug!("POST {} (multipart)", url);
        let request = self.wrap_request(client.post(url.clone())).multipart(form);
        let response = request.send().await?;
        check(Method::POST, url, response)
    }
}

fn media_part(media: &MediaUpload) -> ApiResult<Part> {
    Ok(Part::bytes(media.bytes.clone())
        .file_name(media.file_name.clone())
        .mime_str(&media.mime)?)
}

fn check(method: Method, url: Url, response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ApiError::Status {
            method,
            url,
            status,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    let bytes = response.bytes().await?;
    if log_enabled!(log::Level::Trace) {
        if let Ok(value) = serde_json::from_slice::<Value>(&bytes) {
            trace!("{}", serde_json::to_string_pretty(&value)?);
        }
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Header injection shared by plain and middleware request builders.
trait RequestHeaders {
    fn with_header(self, name: &str, value: &str) -> Self;
}

impl RequestHeaders for reqwest::RequestBuilder {
    fn with_header(self, name: &str, value: &str) -> Self {
        self.header(name, value)
    }
}

impl RequestHeaders for reqwest_middleware::RequestBuilder {
    fn with_header(self, name: &str, value: &str) -> Self {
        self.header(name, value)
    }
}

#[derive(Deserialize)]
struct CaptionResponse {
    caption: String,
}

#[derive(Deserialize)]
struct ChatbotResponse {
    reply: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChatbotRequest<'a> {
    history: &'a [ChatMessage],
}

impl Backend for HttpBackend {
    async fn home_feed(&self) -> ApiResult<Vec<Post>> {
        self.get(&["posts"]).await
    }

    async fn explore_feed(&self) -> ApiResult<Vec<Post>> {
        self.get(&["posts", "explore"]).await
    }

    async fn user(&self, username: &str) -> ApiResult<User> {
        self.get(&["users", username]).await
    }

    async fn user_posts(&self, username: &str) -> ApiResult<Vec<Post>> {
        self.get(&["users", username, "posts"]).await
    }

    async fn stories(&self) -> ApiResult<Vec<Story>> {
        self.get(&["stories"]).await
    }

    async fn reels(&self) -> ApiResult<Vec<Reel>> {
        self.get(&["reels"]).await
    }

    async fn notifications(&self) -> ApiResult<Vec<Notification>> {
        self.get(&["notifications"]).await
    }

    async fn suggestions(&self) -> ApiResult<Vec<User>> {
        self.get(&["users", "suggestions"]).await
    }

    async fn conversations(&self) -> ApiResult<Vec<Conversation>> {
        self.get(&["conversations"]).await
    }

    async fn like_post(&self, id: &str) -> ApiResult<()> {
        self.send(Method::POST, &["posts", id, "like"], None).await?;
        Ok(())
    }

    async fn unlike_post(&self, id: &str) -> ApiResult<()> {
        self.send(Method::DELETE, &["posts", id, "like"], None).await?;
        Ok(())
    }

    async fn like_reel(&self, id: &str) -> ApiResult<()> {
        self.send(Method::POST, &["reels", id, "like"], None).await?;
        Ok(())
    }

    async fn unlike_reel(&self, id: &str) -> ApiResult<()> {
        self.send(Method::DELETE, &["reels", id, "like"], None).await?;
        Ok(())
    }

    async fn comment_post(&self, id: &str, text: &str) -> ApiResult<Comment> {
        let body = json!({ "text": text });
        let response = self
            .send(Method::POST, &["posts", id, "comments"], Some(body))
            .await?;
        decode(response).await
    }

    async fn comment_reel(&self, id: &str, text: &str) -> ApiResult<Comment> {
        let body = json!({ "text": text });
        let response = self
            .send(Method::POST, &["reels", id, "comments"], Some(body))
            .await?;
        decode(response).await
    }

    async fn follow(&self, username: &str) -> ApiResult<()> {
        self.send(Method::POST, &["users", username, "follow"], None)
            .await?;
        Ok(())
    }

    async fn unfollow(&self, username: &str) -> ApiResult<()> {
        self.send(Method::DELETE, &["users", username, "follow"], None)
            .await?;
        Ok(())
    }

    async fn create_post(&self, media: &MediaUpload, caption: &str) -> ApiResult<Post> {
        let form = Form::new()
            .part("media", media_part(media)?)
            .text("caption", caption.to_string());
        let response = self.upload(&["posts"], form).await?;
        decode(response).await
    }

    async fn repost(&self, original_id: &str, comment: &str) -> ApiResult<Post> {
        let body = json!({ "comment": comment });
        let response = self
            .send(Method::POST, &["posts", original_id, "reposts"], Some(body))
            .await?;
        decode(response).await
    }

    async fn create_story(&self, media: &MediaUpload) -> ApiResult<Story> {
        let form = Form::new().part("media", media_part(media)?);
        let response = self.upload(&["stories"], form).await?;
        decode(response).await
    }

    async fn send_message(&self, recipient: &str, text: &str) -> ApiResult<SentMessage> {
        let body = json!({ "recipientUsername": recipient, "text": text });
        let response = self.send(Method::POST, &["messages"], Some(body)).await?;
        decode(response).await
    }

    async fn generate_caption(&self, media: &MediaUpload) -> ApiResult<String> {
        let form = Form::new().part("media", media_part(media)?);
        let response = self.upload(&["generate-caption"], form).await?;
        let CaptionResponse { caption } = decode(response).await?;
        Ok(caption)
    }

    async fn chatbot(&self, history: &[ChatMessage]) -> ApiResult<String> {
        let body = serde_json::to_value(ChatbotRequest { history })?;
        let response = self.send(Method::POST, &["chatbot"], Some(body)).await?;
        let ChatbotResponse { reply } = decode(response).await?;
        Ok(reply)
    }

    async fn login(&self, username: &str, password: &str) -> ApiResult<User> {
        let body = json!({ "username": username, "password": password });
        let response = self
            .send(Method::POST, &["auth", "login"], Some(body))
            .await?;
        decode(response).await
    }

    async fn signup(&self, details: &SignUp) -> ApiResult<User> {
        let body = serde_json::to_value(details)?;
        let response = self
            .send(Method::POST, &["auth", "signup"], Some(body))
            .await?;
        decode(response).await
    }
}
