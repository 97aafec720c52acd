use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use super::User;

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}

impl Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MediaKind::Image => write!(f, "image"),
            MediaKind::Video => write!(f, "video"),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub user: User,
    pub text: String,
    /// Set while the comment is freshly inserted on this client
    #[serde(skip)]
    pub is_new: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user: User,
    pub media_url: String,
    #[serde(default)]
    pub media_type: MediaKind,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub likes: u32,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub is_liked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repost_of: Option<Box<Post>>,
}

impl Post {
    /// The post a repost points at, or the post itself.
    pub fn canonical(&self) -> &Post {
        self.repost_of.as_deref().unwrap_or(self)
    }

    /// Copy of `id` held by this post: the post itself, or its embedded original.
    pub fn copy_of(&self, id: &str) -> Option<&Post> {
        if self.id == id {
            return Some(self);
        }
        self.repost_of.as_deref().filter(|original| original.id == id)
    }

    pub fn copy_of_mut(&mut self, id: &str) -> Option<&mut Post> {
        if self.id == id {
            return Some(self);
        }
        self.repost_of
            .as_deref_mut()
            .filter(|original| original.id == id)
    }

    /// Collapses reposts of reposts so `repost_of` is always one level deep.
    pub fn normalized(mut self) -> Self {
        if let Some(original) = self.repost_of.take() {
            let mut original = *original;
            while let Some(inner) = original.repost_of.take() {
                original = *inner;
            }
            self.repost_of = Some(Box::new(original));
        }
        self
    }

    /// Sets the viewer's like, moving `likes` only when the flag changes.
    /// Returns whether it changed.
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

    /// Author copies held by this post, the embedded original's author included.
    pub fn authors_mut(&mut self) -> impl Iterator<Item = &mut User> {
        let original = self.repost_of.as_deref_mut().map(|p| &mut p.user);
        std::iter::once(&mut self.user).chain(original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::post;

    #[test]
    fn decodes_backend_shape() {
        let json = r#"{
            "id": "r1",
            "user": {"username": "travelExplorer", "avatarUrl": "t.png"},
            "mediaUrl": "",
            "mediaType": "video",
            "caption": "look at this",
            "likes": 0,
            "comments": [
                {"id": "c1", "user": {"username": "artLover", "avatarUrl": "a.png"}, "text": "wow"}
            ],
            "isLiked": false,
            "repostOf": {
                "id": "p1",
                "user": {"username": "foodieAdventures", "avatarUrl": "f.png", "isFollowing": true},
                "mediaUrl": "p1.mp4",
                "mediaType": "video",
                "caption": "ramen",
                "likes": 5,
                "comments": [],
                "isLiked": true
            }
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert_eq!(post.media_type, MediaKind::Video);
        assert!(!post.comments[0].is_new);
        let original = post.repost_of.as_deref().unwrap();
        assert_eq!(original.likes, 5);
        assert!(original.user.is_following());
        assert_eq!(post.canonical().id, "p1");
    }

    #[test]
    fn is_new_is_never_serialized() {
        let comment = Comment {
            id: "c1".into(),
            user: User::new("debugBot"),
            text: "hello".into(),
            is_new: true,
        };
        let value = serde_json::to_value(&comment).unwrap();
        assert!(value.get("isNew").is_none());
    }

    #[test]
    fn like_count_follows_flag_transitions() {
        let mut p = post("p1", 10);
        p.set_liked(true);
        assert_eq!((p.likes, p.is_liked), (11, true));
        p.set_liked(true);
        assert_eq!(p.likes, 11);
        p.set_liked(false);
        assert_eq!((p.likes, p.is_liked), (10, false));
    }

    #[test]
    fn like_count_saturates() {
        let mut p = post("p1", u32::MAX);
        assert!(p.set_liked(true));
        assert_eq!((p.likes, p.is_liked), (u32::MAX, true));
        assert!(!p.set_liked(true));
    }

    #[test]
    fn copy_of_reaches_only_the_embedded_original() {
        let mut repost = post("r1", 0);
        repost.repost_of = Some(Box::new(post("p1", 5)));

        repost.copy_of_mut("p1").unwrap().set_liked(true);
        assert_eq!(repost.likes, 0);
        assert!(!repost.is_liked);
        assert_eq!(repost.repost_of.as_ref().unwrap().likes, 6);

        assert!(repost.copy_of("r1").is_some());
        assert!(repost.copy_of("p2").is_none());
    }

    #[test]
    fn normalized_flattens_nested_reposts() {
        let mut middle = post("r1", 0);
        middle.repost_of = Some(Box::new(post("p1", 3)));
        let mut outer = post("r2", 0);
        outer.repost_of = Some(Box::new(middle));

        let outer = outer.normalized();
        let original = outer.repost_of.as_deref().unwrap();
        assert_eq!(original.id, "p1");
        assert!(original.repost_of.is_none());
    }

    #[test]
    fn authors_include_embedded_original() {
        let mut repost = post("r1", 0);
        let mut original = post("p1", 1);
        original.user = User::new("styleMaven");
        repost.repost_of = Some(Box::new(original));

        let names: Vec<_> = repost.authors_mut().map(|u| u.username.clone()).collect();
        assert_eq!(names, vec!["photoFanatic", "styleMaven"]);
    }
}
