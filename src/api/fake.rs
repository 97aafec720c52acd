//! Scripted in-memory backend for tests.

use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};

use chrono::Utc;
use reqwest::{Method, StatusCode};
use tokio::sync::Semaphore;
use url::Url;

use super::Backend;
use crate::{
    error::{ApiError, ApiResult},
    model::{
        ChatMessage, Comment, Conversation, MediaUpload, Message, Notification, Post, Reel,
        SentMessage, SignUp, Story, User,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    HomeFeed,
    ExploreFeed,
    User,
    UserPosts,
    Stories,
    Reels,
    Notifications,
    Suggestions,
    Conversations,
    LikePost,
    UnlikePost,
    LikeReel,
    UnlikeReel,
    CommentPost,
    CommentReel,
    Follow,
    Unfollow,
    CreatePost,
    Repost,
    CreateStory,
    SendMessage,
    GenerateCaption,
    Chatbot,
    Login,
    Signup,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub endpoint: Endpoint,
    pub target: String,
}

#[derive(Debug, Default)]
pub struct FakeBackend {
    pub home: Vec<Post>,
    pub explore: Vec<Post>,
    pub profiles: Vec<(User, Vec<Post>)>,
    pub stories: Vec<Story>,
    pub reels: Vec<Reel>,
    pub notifications: Vec<Notification>,
    pub suggestions: Vec<User>,
    pub conversations: Vec<Conversation>,
    pub viewer: Option<User>,
    pub(crate) failing: Mutex<HashSet<Endpoint>>,
    pub(crate) calls: Mutex<Vec<Call>>,
    pub(crate) gate: Option<Arc<Semaphore>>,
}

impl FakeBackend {
    pub fn fail(self, endpoint: Endpoint) -> Self {
        self.set_failing(endpoint, true);
        self
    }

    pub fn set_failing(&self, endpoint: Endpoint, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(endpoint);
        } else {
            set.remove(&endpoint);
        }
    }

    /// Holds every mutating request until the returned semaphore gets a permit.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, endpoint: Endpoint) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|call| call.endpoint == endpoint)
            .map(|call| call.target)
            .collect()
    }

    fn respond<T>(
        &self,
        endpoint: Endpoint,
        target: &str,
        value: impl FnOnce() -> T,
    ) -> ApiResult<T> {
        self.calls.lock().unwrap().push(Call {
            endpoint,
            target: target.to_string(),
        });
        if self.failing.lock().unwrap().contains(&endpoint) {
            return Err(ApiError::Status {
                method: Method::POST,
                url: Url::parse("http://fake.invalid/").unwrap(),
                status: StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(value())
    }

    async fn mutate<T>(
        &self,
        endpoint: Endpoint,
        target: &str,
        value: impl FnOnce() -> T,
    ) -> ApiResult<T> {
        if let Some(gate) = &self.gate {
            gate.acquire().await.unwrap().forget();
        }
        self.respond(endpoint, target, value)
    }

    fn viewer(&self) -> User {
        self.viewer
            .clone()
            .unwrap_or_else(|| User::new("currentUser"))
    }

    fn profile(&self, username: &str) -> Option<&(User, Vec<Post>)> {
        self.profiles.iter().find(|(user, _)| user.username == username)
    }
}

fn message(id: &str, sender: User, text: &str) -> Message {
    Message {
        id: id.to_string(),
        sender,
        text: text.to_string(),
        timestamp: Utc::now(),
    }
}

impl Backend for FakeBackend {
    async fn home_feed(&self) -> ApiResult<Vec<Post>> {
        self.respond(Endpoint::HomeFeed, "", || self.home.clone())
    }

    async fn explore_feed(&self) -> ApiResult<Vec<Post>> {
        self.respond(Endpoint::ExploreFeed, "", || self.explore.clone())
    }

    async fn user(&self, username: &str) -> ApiResult<User> {
        self.respond(Endpoint::User, username, || {
            self.profile(username)
                .map(|(user, _)| user.clone())
                .unwrap_or_else(|| User::new(username))
        })
    }

    async fn user_posts(&self, username: &str) -> ApiResult<Vec<Post>> {
        self.respond(Endpoint::UserPosts, username, || {
            self.profile(username)
                .map(|(_, posts)| posts.clone())
                .unwrap_or_default()
        })
    }

    async fn stories(&self) -> ApiResult<Vec<Story>> {
        self.respond(Endpoint::Stories, "", || self.stories.clone())
    }

    async fn reels(&self) -> ApiResult<Vec<Reel>> {
        self.respond(Endpoint::Reels, "", || self.reels.clone())
    }

    async fn notifications(&self) -> ApiResult<Vec<Notification>> {
        self.respond(Endpoint::Notifications, "", || self.notifications.clone())
    }

    async fn suggestions(&self) -> ApiResult<Vec<User>> {
        self.respond(Endpoint::Suggestions, "", || self.suggestions.clone())
    }

    async fn conversations(&self) -> ApiResult<Vec<Conversation>> {
        self.respond(Endpoint::Conversations, "", || self.conversations.clone())
    }

    async fn like_post(&self, id: &str) -> ApiResult<()> {
        self.mutate(Endpoint::LikePost, id, || ()).await
    }

    async fn unlike_post(&self, id: &str) -> ApiResult<()> {
        self.mutate(Endpoint::UnlikePost, id, || ()).await
    }

    async fn like_reel(&self, id: &str) -> ApiResult<()> {
        self.mutate(Endpoint::LikeReel, id, || ()).await
    }

    async fn unlike_reel(&self, id: &str) -> ApiResult<()> {
        self.mutate(Endpoint::UnlikeReel, id, || ()).await
    }

    async fn comment_post(&self, id: &str, text: &str) -> ApiResult<Comment> {
        let count = self.calls_to(Endpoint::CommentPost).len();
        self.mutate(Endpoint::CommentPost, id, || Comment {
            id: format!("comment-{}-{}", id, count),
            user: self.viewer(),
            text: text.to_string(),
            is_new: false,
        })
        .await
    }

    async fn comment_reel(&self, id: &str, text: &str) -> ApiResult<Comment> {
        let count = self.calls_to(Endpoint::CommentReel).len();
        self.mutate(Endpoint::CommentReel, id, || Comment {
            id: format!("reel-comment-{}-{}", id, count),
            user: self.viewer(),
            text: text.to_string(),
            is_new: false,
        })
        .await
    }

    async fn follow(&self, username: &str) -> ApiResult<()> {
        self.mutate(Endpoint::Follow, username, || ()).await
    }

    async fn unfollow(&self, username: &str) -> ApiResult<()> {
        self.mutate(Endpoint::Unfollow, username, || ()).await
    }

    async fn create_post(&self, media: &MediaUpload, caption: &str) -> ApiResult<Post> {
        self.mutate(Endpoint::CreatePost, &media.file_name, || Post {
            id: format!("post-{}", media.file_name),
            user: self.viewer(),
            media_url: format!("https://cdn.invalid/{}", media.file_name),
            media_type: media.kind(),
            caption: caption.to_string(),
            likes: 0,
            comments: vec![],
            is_liked: false,
            repost_of: None,
        })
        .await
    }

    async fn repost(&self, original_id: &str, comment: &str) -> ApiResult<Post> {
        let original = self
            .home
            .iter()
            .chain(&self.explore)
            .find(|post| post.id == original_id)
            .cloned();
        self.mutate(Endpoint::Repost, original_id, || Post {
            id: format!("repost-{}", original_id),
            user: self.viewer(),
            media_url: String::new(),
            media_type: Default::default(),
            caption: comment.to_string(),
            likes: 0,
            comments: vec![],
            is_liked: false,
            repost_of: original.map(Box::new),
        })
        .await
    }

    async fn create_story(&self, media: &MediaUpload) -> ApiResult<Story> {
        self.mutate(Endpoint::CreateStory, &media.file_name, || Story {
            id: format!("story-{}", media.file_name),
            user: self.viewer(),
            image_url: format!("https://cdn.invalid/{}", media.file_name),
            seen: false,
        })
        .await
    }

    async fn send_message(&self, recipient: &str, text: &str) -> ApiResult<SentMessage> {
        let count = self.calls_to(Endpoint::SendMessage).len();
        self.mutate(Endpoint::SendMessage, recipient, || SentMessage {
            user_message: message(&format!("msg-{}", count), self.viewer(), text),
            reply_message: message(
                &format!("reply-{}", count),
                User::new(recipient),
                "That's cool!",
            ),
        })
        .await
    }

    async fn generate_caption(&self, media: &MediaUpload) -> ApiResult<String> {
        self.mutate(Endpoint::GenerateCaption, &media.file_name, || {
            "Golden hour #sunset #nofilter".to_string()
        })
        .await
    }

    async fn chatbot(&self, history: &[ChatMessage]) -> ApiResult<String> {
        let last = history.last().map(|m| m.text.clone()).unwrap_or_default();
        self.mutate(Endpoint::Chatbot, &last, || format!("You said: {}", last))
            .await
    }

    async fn login(&self, username: &str, _password: &str) -> ApiResult<User> {
        self.mutate(Endpoint::Login, username, || User::new(username))
            .await
    }

    async fn signup(&self, details: &SignUp) -> ApiResult<User> {
        self.mutate(Endpoint::Signup, &details.username, || User {
            full_name: Some(details.full_name.clone()),
            ..User::new(details.username.as_str())
        })
        .await
    }
}
