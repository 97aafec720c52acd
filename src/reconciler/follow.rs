use log::debug;

use super::{EntityKey, Outcome, Reconciler, UndoLog};
use crate::{api::Backend, notice::FOLLOW_FAILED};

impl<B: Backend> Reconciler<B> {
    /// Flips the viewer's relationship with `username` on every copy of that
    /// user, then confirms it. A refused request restores exactly the copies
    /// it changed.
    pub async fn toggle_follow(&self, username: &str, was_following: bool) -> Outcome {
        let ticket = self.sequencer.begin(EntityKey::User(username.to_string()));
        let mut undo = UndoLog::default();
        self.store.update(|state| {
            state.apply_to_user(username, |user| {
                let prior = (user.followers, user.is_following);
                undo.record(prior, user.set_following(!was_following));
            })
        });
        debug!(
            "{} {} ({} copies)",
            if was_following { "Unfollowing" } else { "Following" },
            username,
            undo.changed()
        );

        let result = if was_following {
            self.backend.unfollow(username).await
        } else {
            self.backend.follow(username).await
        };

        self.settle(ticket, result, FOLLOW_FAILED, || {
            let mut replay = undo.replay();
            self.store.update(|state| {
                state.apply_to_user(username, |user| {
                    let prior = replay.next_prior();
                    if let Some((followers, is_following)) = prior {
                        if user.is_following() != was_following {
                            user.followers = followers;
                            user.is_following = is_following;
                        }
                    }
                })
            });
        })
    }

    /// Current relationship with `username` as held locally.
    pub fn is_following(&self, username: &str) -> Option<bool> {
        self.store
            .read(|state| state.find_user(username).map(|user| user.is_following()))
    }

    /// Relationship with `username`, loading their profile when no local
    /// copy of the user is held.
    pub async fn relationship(&self, username: &str) -> Option<bool> {
        if let Some(following) = self.is_following(username) {
            return Some(following);
        }
        if !self.open_profile(username).await.is_success() {
            return None;
        }
        self.is_following(username)
    }
}
