use std::time::Duration;

use log::debug;
use tokio::time::Instant;

use crate::{
    api::Backend,
    reconciler::{ActiveStory, Reconciler, Store},
    timer::TimerSlot,
};

pub const STORY_DURATION: Duration = Duration::from_secs(5);

/// Story viewer. Each story is shown for [`STORY_DURATION`] before the
/// viewer moves on by itself.
///
/// The auto-advance runs on the tokio runtime, so opening or moving between
/// stories must happen from within one.
#[derive(Debug, Clone)]
pub struct StoryPlayer {
    store: Store,
    advance: TimerSlot,
}

impl StoryPlayer {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            advance: TimerSlot::default(),
        }
    }

    pub fn open(&self, index: usize) -> bool {
        let opened = self.store.update(|state| {
            let Some(story) = state.stories.get_mut(index) else {
                return false;
            };
            story.seen = true;
            debug!("Showing story {} by {}", story.id, story.user.username);
            state.active_story = Some(ActiveStory {
                index,
                started: Instant::now(),
            });
            true
        });
        if opened {
            self.schedule_advance();
        }
        opened
    }

    /// Moves to the next story, closing the viewer after the last one.
    pub fn next(&self) {
        let position = self.store.read(|state| {
            state
                .active_story
                .map(|active| (active.index, state.stories.len()))
        });
        match position {
            None => {}
            Some((index, len)) if index + 1 < len => {
                self.open(index + 1);
            }
            Some(_) => self.close(),
        }
    }

    pub fn prev(&self) {
        let moved = self.store.update(|state| match state.active_story {
            Some(active) if active.index > 0 => {
                state.active_story = Some(ActiveStory {
                    index: active.index - 1,
                    started: Instant::now(),
                });
                true
            }
            _ => false,
        });
        if moved {
            self.schedule_advance();
        }
    }

    pub fn close(&self) {
        self.advance.cancel();
        self.store.update(|state| state.active_story = None);
    }

    pub fn active(&self) -> Option<usize> {
        self.store
            .read(|state| state.active_story.map(|active| active.index))
    }

    /// Share of the current story's display time already elapsed.
    pub fn progress(&self) -> Option<f32> {
        self.store.read(|state| {
            state.active_story.map(|active| {
                let elapsed = active.started.elapsed().as_secs_f32();
                (elapsed / STORY_DURATION.as_secs_f32()).min(1.0)
            })
        })
    }

    fn schedule_advance(&self) {
        let player = self.clone();
        self.advance.schedule(STORY_DURATION, move || player.next());
    }
}

impl<B: Backend> Reconciler<B> {
    /// Opens story `index` and starts its auto-advance. Must be called from
    /// within a tokio runtime.
    pub fn open_story(&self, index: usize) -> bool {
        self.stories().open(index)
    }

    pub fn next_story(&self) {
        self.stories().next()
    }

    pub fn prev_story(&self) {
        self.stories().prev()
    }

    pub fn close_story(&self) {
        self.stories().close()
    }

    pub fn story_progress(&self) -> Option<f32> {
        self.stories().progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures::story, reconciler::ClientState};

    fn player(count: usize) -> StoryPlayer {
        let stories = (0..count).map(|i| story(&format!("s{}", i))).collect();
        StoryPlayer::new(Store::new(ClientState {
            stories,
            ..Default::default()
        }))
    }

    fn seen(player: &StoryPlayer) -> Vec<bool> {
        player
            .store
            .read(|state| state.stories.iter().map(|s| s.seen).collect())
    }

    #[tokio::test(start_paused = true)]
    async fn advances_by_itself_and_closes_after_the_last() {
        let player = player(2);
        assert!(player.open(0));
        assert_eq!(seen(&player), vec![true, false]);

        tokio::time::sleep(STORY_DURATION + Duration::from_millis(10)).await;
        assert_eq!(player.active(), Some(1));
        assert_eq!(seen(&player), vec![true, true]);

        tokio::time::sleep(STORY_DURATION).await;
        assert_eq!(player.active(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn manual_navigation_restarts_the_timer() {
        let player = player(3);
        player.open(0);
        tokio::time::sleep(Duration::from_secs(4)).await;
        player.next();
        assert_eq!(player.active(), Some(1));

        // the first story's timer must not fire a second advance
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(player.active(), Some(1));

        player.prev();
        assert_eq!(player.active(), Some(0));
        player.prev();
        assert_eq!(player.active(), Some(0));
    }

    #[tokio::test(start_paused = true)]
    async fn close_cancels_auto_advance() {
        let player = player(2);
        player.open(0);
        player.close();
        tokio::time::sleep(STORY_DURATION * 2).await;
        assert_eq!(player.active(), None);
        assert_eq!(seen(&player), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn progress_tracks_elapsed_time() {
        let player = player(1);
        assert_eq!(player.progress(), None);
        player.open(0);
        tokio::time::advance(Duration::from_millis(2500)).await;
        let progress = player.progress().unwrap();
        assert!((progress - 0.5).abs() < 0.01);
    }

    #[tokio::test]
    async fn out_of_range_index_is_ignored() {
        let player = player(1);
        assert!(!player.open(3));
        assert_eq!(player.active(), None);
    }
}
