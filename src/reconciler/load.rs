use log::{error, info};

use super::{Outcome, Reconciler};
use crate::{api::Backend, error::ApiResult, model::Post, notice::LOAD_FAILED};

impl<B: Backend> Reconciler<B> {
    /// Reloads every collection at once. A collection whose fetch fails keeps
    /// what it held before.
    pub async fn refresh(&self) -> Outcome {
        let (home, explore, stories, reels, notifications, suggestions, conversations) =
            futures::join!(
                self.backend.home_feed(),
                self.backend.explore_feed(),
                self.backend.stories(),
                self.backend.reels(),
                self.backend.notifications(),
                self.backend.suggestions(),
                self.backend.conversations(),
            );

        let failed = self.store.update(|state| {
            let mut failed = 0;
            failed += replace(&mut state.home, home.map(normalize), "home feed");
            failed += replace(&mut state.explore, explore.map(normalize), "explore feed");
            failed += replace(&mut state.stories, stories, "stories");
            failed += replace(&mut state.reels, reels, "reels");
            failed += replace(&mut state.notifications, notifications, "notifications");
            failed += replace(&mut state.suggestions, suggestions, "suggestions");
            failed += replace(&mut state.conversations, conversations, "conversations");

            let stories = state.stories.len();
            if state.active_story.is_some_and(|active| active.index >= stories) {
                state.active_story = None;
            }
            failed
        });

        if failed > 0 {
            self.notices.show(LOAD_FAILED);
            Outcome::Failed
        } else {
            Outcome::Confirmed
        }
    }

    /// Loads `username` and their posts into the profile view.
    pub async fn open_profile(&self, username: &str) -> Outcome {
        let result = futures::try_join!(
            self.backend.user(username),
            self.backend.user_posts(username)
        );
        let Some((user, posts)) = self.report(result, LOAD_FAILED) else {
            return Outcome::Failed;
        };

        info!("{}: {} posts", user.username, posts.len());
        self.store.update(|state| {
            state.profile_user = Some(user);
            state.profile = normalize(posts);
        });
        Outcome::Confirmed
    }
}

fn normalize(posts: Vec<Post>) -> Vec<Post> {
    posts.into_iter().map(Post::normalized).collect()
}

fn replace<T>(slot: &mut Vec<T>, result: ApiResult<Vec<T>>, what: &str) -> usize {
    match result {
        Ok(items) => {
            info!("Loaded {} {}", items.len(), what);
            *slot = items;
            0
        }
        Err(e) => {
            error!("Could not load {}: {}", what, e);
            1
        }
    }
}
