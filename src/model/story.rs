use serde::{Deserialize, Serialize};

use super::{Comment, User};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Story {
    pub id: String,
    pub user: User,
    pub image_url: String,
    #[serde(default)]
    pub seen: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Reel {
    pub id: String,
    pub user: User,
    pub video_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub is_liked: bool,
}

impl Reel {
    pub fn set_liked(&mut self, liked: bool) -> bool {
        if self.is_liked == liked {
            return false;
        }
        self.likes = if liked {
            self.likes.saturating_add(1)
        } else {
            self.likes.saturating_sub(1)
        };
        self.is_liked = liked;
        true
    }
}
