use log::{debug, warn};

use super::{EntityKey, Outcome, Reconciler, UndoLog};
use crate::{api::Backend, notice::LIKE_FAILED};

impl<B: Backend> Reconciler<B> {
    /// Flips the viewer's like on a post everywhere it appears, then confirms
    /// it with the backend. A refused request restores the previous state.
    pub async fn toggle_like(&self, post_id: &str) -> Outcome {
        let Some(was_liked) = self
            .store
            .read(|state| state.find_post(post_id).map(|post| post.is_liked))
        else {
            warn!("Post {} is not loaded", post_id);
            return Outcome::NotFound;
        };

        let ticket = self.sequencer.begin(EntityKey::Post(post_id.to_string()));
        let mut undo = UndoLog::default();
        self.apply_to_entity(post_id, |post| {
            let prior = (post.likes, post.is_liked);
            undo.record(prior, post.set_liked(!was_liked));
        });
        debug!(
            "{} {} ({} copies)",
            if was_liked { "Unliking" } else { "Liking" },
            post_id,
            undo.changed()
        );

        let result = if was_liked {
            self.backend.unlike_post(post_id).await
        } else {
            self.backend.like_post(post_id).await
        };

        self.settle(ticket, result, LIKE_FAILED, || {
            let mut replay = undo.replay();
            self.apply_to_entity(post_id, |post| {
                if let Some((likes, is_liked)) = replay.next_prior() {
                    if post.is_liked != was_liked {
                        post.likes = likes;
                        post.is_liked = is_liked;
                    }
                }
            });
        })
    }

    pub async fn toggle_reel_like(&self, reel_id: &str) -> Outcome {
        let Some(was_liked) = self
            .store
            .read(|state| state.find_reel(reel_id).map(|reel| reel.is_liked))
        else {
            warn!("Reel {} is not loaded", reel_id);
            return Outcome::NotFound;
        };

        let ticket = self.sequencer.begin(EntityKey::Reel(reel_id.to_string()));
        let mut undo = UndoLog::default();
        self.store.update(|state| {
            for reel in state.reels.iter_mut().filter(|reel| reel.id == reel_id) {
                let prior = (reel.likes, reel.is_liked);
                undo.record(prior, reel.set_liked(!was_liked));
            }
        });

        let result = if was_liked {
            self.backend.unlike_reel(reel_id).await
        } else {
            self.backend.like_reel(reel_id).await
        };

        self.settle(ticket, result, LIKE_FAILED, || {
            let mut replay = undo.replay();
            self.store.update(|state| {
                for reel in state.reels.iter_mut().filter(|reel| reel.id == reel_id) {
                    if let Some((likes, is_liked)) = replay.next_prior() {
                        if reel.is_liked != was_liked {
                            reel.likes = likes;
                            reel.is_liked = is_liked;
                        }
                    }
                }
            });
        })
    }
}
