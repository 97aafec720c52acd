use log::info;

use super::{ClientState, Outcome, Reconciler};
use crate::{
    api::Backend,
    model::{MediaUpload, Post},
    notice::{POST_FAILED, REPOST_FAILED, STORY_FAILED},
};

impl<B: Backend> Reconciler<B> {
    /// Reposts `original_id`. Reposting a repost points at the post it wraps,
    /// so nesting never grows past one level.
    pub async fn repost(&self, original_id: &str, comment: &str) -> Outcome {
        let canonical_id = self
            .store
            .read(|state| {
                state
                    .find_post(original_id)
                    .map(|post| post.canonical().id.clone())
            })
            .unwrap_or_else(|| original_id.to_string());

        let result = self.backend.repost(&canonical_id, comment.trim()).await;
        let Some(repost) = self.report(result, REPOST_FAILED) else {
            return Outcome::Failed;
        };

        let repost = repost.normalized();
        info!("Reposted {} as {}", canonical_id, repost.id);
        self.store.update(|state| {
            state.explore.insert(0, repost.clone());
            prepend_to_feeds(state, repost);
        });
        Outcome::Confirmed
    }

    pub async fn create_post(&self, media: &MediaUpload, caption: &str) -> Outcome {
        let result = self.backend.create_post(media, caption.trim()).await;
        let Some(post) = self.report(result, POST_FAILED) else {
            return Outcome::Failed;
        };

        info!("Shared {} ({})", post.id, post.media_type);
        self.store
            .update(|state| prepend_to_feeds(state, post.normalized()));
        Outcome::Confirmed
    }

    pub async fn create_story(&self, media: &MediaUpload) -> Outcome {
        let result = self.backend.create_story(media).await;
        let Some(story) = self.report(result, STORY_FAILED) else {
            return Outcome::Failed;
        };

        info!("Shared story {}", story.id);
        self.store.update(|state| {
            state.stories.insert(0, story);
            if let Some(active) = state.active_story.as_mut() {
                active.index += 1;
            }
        });
        Outcome::Confirmed
    }
}

/// New posts lead the home feed, and the profile feed when it belongs to
/// their author.
fn prepend_to_feeds(state: &mut ClientState, post: Post) {
    let own_profile = state
        .profile_user
        .as_ref()
        .is_some_and(|user| user.username == post.user.username);
    if own_profile {
        state.profile.insert(0, post.clone());
    }
    state.home.insert(0, post);
}
