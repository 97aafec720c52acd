mod message;
mod notification;
mod post;
mod story;
mod upload;
mod user;

pub use message::{ChatMessage, ChatSender, Conversation, Message, SentMessage};
pub use notification::{Notification, NotificationKind, NotificationPost};
pub use post::{Comment, MediaKind, Post};
pub use story::{Reel, Story};
pub use upload::MediaUpload;
pub use user::{SignUp, User};
