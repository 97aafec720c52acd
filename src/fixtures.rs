use chrono::{TimeZone, Utc};

use crate::model::{Comment, MediaKind, Message, Post, Reel, Story, User};

pub fn post(id: &str, likes: u32) -> Post {
    Post {
        id: id.to_string(),
        user: User::new("photoFanatic"),
        media_url: format!("https://picsum.photos/600/600?random={}", id),
        media_type: MediaKind::Image,
        caption: String::new(),
        likes,
        comments: vec![],
        is_liked: false,
        repost_of: None,
    }
}

pub fn repost(id: &str, original: Post) -> Post {
    Post {
        user: User::new("travelExplorer"),
        caption: "had to share".to_string(),
        repost_of: Some(Box::new(original)),
        ..post(id, 0)
    }
}

pub fn authored(mut post: Post, username: &str, followers: u32) -> Post {
    post.user = User::new(username);
    post.user.followers = Some(followers);
    post.user.is_following = Some(false);
    post
}

pub fn comment(id: &str, text: &str) -> Comment {
    Comment {
        id: id.to_string(),
        user: User::new("currentUser"),
        text: text.to_string(),
        is_new: false,
    }
}

pub fn story(id: &str) -> Story {
    Story {
        id: id.to_string(),
        user: User::new(format!("author-{}", id)),
        image_url: format!("https://picsum.photos/1080/1920?random={}", id),
        seen: false,
    }
}

pub fn reel(id: &str, likes: u32) -> Reel {
    Reel {
        id: id.to_string(),
        user: User::new("fitnessFreak"),
        video_url: format!("{}.mp4", id),
        caption: String::new(),
        likes,
        comments: vec![],
        is_liked: false,
    }
}

pub fn message(id: &str, sender: &str, text: &str) -> Message {
    Message {
        id: id.to_string(),
        sender: User::new(sender),
        text: text.to_string(),
        timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
    }
}
