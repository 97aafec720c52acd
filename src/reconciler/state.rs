use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::{sync::watch, time::Instant};

use crate::model::{ChatMessage, Conversation, Notification, Post, Reel, Story, User};

/// Every collection the client holds. Posts are denormalized: the same
/// logical post may sit in several feeds and inside reposts.
#[derive(Debug, Clone, Default)]
pub struct ClientState {
    pub viewer: Option<User>,
    pub home: Vec<Post>,
    pub explore: Vec<Post>,
    pub profile_user: Option<User>,
    pub profile: Vec<Post>,
    pub selected: Option<Post>,
    pub suggestions: Vec<User>,
    pub stories: Vec<Story>,
    pub active_story: Option<ActiveStory>,
    pub reels: Vec<Reel>,
    pub notifications: Vec<Notification>,
    pub conversations: Vec<Conversation>,
    pub chat: Vec<ChatMessage>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActiveStory {
    pub index: usize,
    pub started: Instant,
}

impl ClientState {
    /// First copy of post `id`, searching home, explore, the selected view, then the profile.
    pub fn find_post(&self, id: &str) -> Option<&Post> {
        self.home
            .iter()
            .chain(&self.explore)
            .chain(&self.selected)
            .chain(&self.profile)
            .find_map(|post| post.copy_of(id))
    }

    pub fn posts_mut(&mut self) -> impl Iterator<Item = &mut Post> {
        self.home
            .iter_mut()
            .chain(self.explore.iter_mut())
            .chain(self.selected.iter_mut())
            .chain(self.profile.iter_mut())
    }

    /// Runs `transform` on every copy of post `id`. A repost wrapping `id`
    /// only has its embedded original transformed.
    pub fn apply_to_post(&mut self, id: &str, mut transform: impl FnMut(&mut Post)) -> usize {
        let mut touched = 0;
        for post in self.posts_mut() {
            if let Some(copy) = post.copy_of_mut(id) {
                transform(copy);
                touched += 1;
            }
        }
        touched
    }

    /// Runs `transform` on every embedded copy of user `username`.
    pub fn apply_to_user(&mut self, username: &str, mut transform: impl FnMut(&mut User)) -> usize {
        let mut touched = 0;
        let ClientState {
            home,
            explore,
            selected,
            profile,
            profile_user,
            suggestions,
            ..
        } = self;

        let authors = home
            .iter_mut()
            .chain(explore.iter_mut())
            .chain(selected.iter_mut())
            .chain(profile.iter_mut())
            .flat_map(Post::authors_mut);
        for user in authors
            .chain(profile_user.iter_mut())
            .chain(suggestions.iter_mut())
        {
            if user.username == username {
                transform(user);
                touched += 1;
            }
        }
        touched
    }

    pub fn find_user(&self, username: &str) -> Option<&User> {
        let authors = self
            .home
            .iter()
            .chain(&self.explore)
            .chain(&self.selected)
            .chain(&self.profile)
            .flat_map(|post| {
                let original = post.repost_of.as_deref().map(|p| &p.user);
                std::iter::once(&post.user).chain(original)
            });
        authors
            .chain(&self.profile_user)
            .chain(&self.suggestions)
            .find(|user| user.username == username)
    }

    pub fn find_reel(&self, id: &str) -> Option<&Reel> {
        self.reels.iter().find(|reel| reel.id == id)
    }

    pub fn viewer_owns_profile(&self) -> bool {
        match (&self.viewer, &self.profile_user) {
            (Some(viewer), Some(profile)) => viewer.username == profile.username,
            _ => false,
        }
    }
}

/// Owner of the canonical [`ClientState`]. Every update bumps a revision
/// that subscribers use as their re-render trigger.
#[derive(Debug, Clone)]
pub struct Store {
    state: Arc<Mutex<ClientState>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(ClientState::default())
    }
}

impl Store {
    pub fn new(state: ClientState) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            state: Arc::new(Mutex::new(state)),
            revision: Arc::new(revision),
        }
    }

    pub fn read<R>(&self, f: impl FnOnce(&ClientState) -> R) -> R {
        f(&self.lock())
    }

    pub fn update<R>(&self, f: impl FnOnce(&mut ClientState) -> R) -> R {
        let result = f(&mut self.lock());
        self.revision.send_modify(|revision| *revision += 1);
        result
    }

    pub fn snapshot(&self) -> ClientState {
        self.lock().clone()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Resolves once `done` holds for the current state.
    pub async fn wait_until(&self, done: impl Fn(&ClientState) -> bool) {
        let mut revisions = self.subscribe();
        while !self.read(&done) {
            if revisions.changed().await.is_err() {
                return;
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ClientState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
