use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MediaKind, User};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    Comment,
    Follow,
    Repost,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPost {
    pub id: String,
    pub media_url: String,
    #[serde(default)]
    pub media_type: MediaKind,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<NotificationPost>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_text: Option<String>,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl Notification {
    pub fn summary(&self) -> String {
        let who = &self.user.username;
        match self.kind {
            NotificationKind::Like => format!("{} liked your post", who),
            NotificationKind::Comment => match &self.comment_text {
                Some(text) => format!("{} commented: {}", who, text),
                None => format!("{} commented on your post", who),
            },
            NotificationKind::Follow => format!("{} started following you", who),
            NotificationKind::Repost => format!("{} reposted your post", who),
        }
    }
}
