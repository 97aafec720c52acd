use std::time::Duration;

use log::{debug, info};

use super::{Outcome, Reconciler, Store};
use crate::{api::Backend, model::Comment, notice::COMMENT_FAILED};

/// How long a freshly appended comment keeps its `is_new` highlight.
pub const NEW_COMMENT_HIGHLIGHT: Duration = Duration::from_millis(1500);

impl<B: Backend> Reconciler<B> {
    /// Posts a comment and appends it once the backend confirms it. Nothing
    /// is shown before confirmation, so a failure leaves no ghost entry.
    pub async fn add_comment(&self, post_id: &str, text: &str) -> Outcome {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty comment on {}", post_id);
            return Outcome::Rejected;
        }

        let result = self.backend.comment_post(post_id, text).await;
        let Some(comment) = self.report(result, COMMENT_FAILED) else {
            return Outcome::Failed;
        };

        let comment_id = comment.id.clone();
        let comment = Comment {
            is_new: true,
            ..comment
        };
        let touched = self.apply_to_entity(post_id, |post| post.comments.push(comment.clone()));
        info!("Commented on {} ({} copies)", post_id, touched);

        expire_post_highlight(self.store.clone(), post_id.to_string(), comment_id);
        Outcome::Confirmed
    }

    pub async fn add_reel_comment(&self, reel_id: &str, text: &str) -> Outcome {
        let text = text.trim();
        if text.is_empty() {
            debug!("Ignoring empty comment on {}", reel_id);
            return Outcome::Rejected;
        }

        let result = self.backend.comment_reel(reel_id, text).await;
        let Some(comment) = self.report(result, COMMENT_FAILED) else {
            return Outcome::Failed;
        };

        let comment_id = comment.id.clone();
        self.store.update(|state| {
            for reel in state.reels.iter_mut().filter(|reel| reel.id == reel_id) {
                reel.comments.push(Comment {
                    is_new: true,
                    ..comment.clone()
                });
            }
        });

        expire_reel_highlight(self.store.clone(), reel_id.to_string(), comment_id);
        Outcome::Confirmed
    }
}

fn expire_post_highlight(store: Store, post_id: String, comment_id: String) {
    tokio::spawn(async move {
        tokio::time::sleep(NEW_COMMENT_HIGHLIGHT).await;
        store.update(|state| {
            state.apply_to_post(&post_id, |post| clear_highlight(&mut post.comments, &comment_id))
        });
    });
}

fn expire_reel_highlight(store: Store, reel_id: String, comment_id: String) {
    tokio::spawn(async move {
        tokio::time::sleep(NEW_COMMENT_HIGHLIGHT).await;
        store.update(|state| {
            for reel in state.reels.iter_mut().filter(|reel| reel.id == reel_id) {
                clear_highlight(&mut reel.comments, &comment_id);
            }
        });
    });
}

fn clear_highlight(comments: &mut [Comment], comment_id: &str) {
    for comment in comments.iter_mut().filter(|c| c.id == comment_id) {
        comment.is_new = false;
    }
}
