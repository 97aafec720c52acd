use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub username: String,
    pub avatar_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub posts_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub following: Option<u32>,
    /// Relationship of the acting viewer to this user
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
}

impl User {
    pub fn new(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            avatar_url: format!("https://i.pravatar.cc/150?u={}", username),
            username,
            ..Default::default()
        }
    }

    pub fn is_following(&self) -> bool {
        self.is_following.unwrap_or(false)
    }

    pub fn followers(&self) -> u32 {
        self.followers.unwrap_or_default()
    }

    /// Moves the relationship to `following`, adjusting the follower count
    /// only when the flag actually changes. Returns whether it changed.
    pub fn set_following(&mut self, following: bool) -> bool {
        if self.is_following() == following {
            return false;
        }
        let followers = self.followers();
        self.followers = Some(if following {
            followers.saturating_add(1)
        } else {
            followers.saturating_sub(1)
        });
        self.is_following = Some(following);
        true
    }
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignUp {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}
