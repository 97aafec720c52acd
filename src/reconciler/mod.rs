mod comment;
mod follow;
mod like;
mod load;
mod publish;
mod sequence;
mod session;
mod state;
mod undo;


pub use sequence::{EntityKey, Sequencer, Ticket};
pub use state::{ActiveStory, ClientState, Store};
pub use undo::{Replay, UndoLog};

use log::{error, warn};
use tokio::sync::watch;

use crate::{
    api::Backend,
    error::ApiResult,
    messages::ReplyQueue,
    model::Post,
    notice::NoticeBoard,
    stories::StoryPlayer,
};

/// What became of a requested mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The backend accepted it.
    Confirmed,
    /// The backend refused it and the optimistic change was undone.
    RolledBack,
    /// The backend refused it; nothing had been applied locally.
    Failed,
    /// A newer mutation of the same entity superseded this one before it failed.
    Stale,
    /// Rejected locally without contacting the backend.
    Rejected,
    /// The target is not held by any collection.
    NotFound,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Confirmed
    }
}

/// Owns the client's collections and keeps every copy of an entity in step
/// while backend calls are in flight.
pub struct Reconciler<B> {
    backend: B,
    store: Store,
    sequencer: Sequencer,
    notices: NoticeBoard,
    stories: StoryPlayer,
    replies: ReplyQueue,
}

impl<B: Backend> Reconciler<B> {
    pub fn new(backend: B) -> Self {
        Self::with_state(backend, ClientState::default())
    }

    pub fn with_state(backend: B, state: ClientState) -> Self {
        let store = Store::new(state);
        Self {
            backend,
            stories: StoryPlayer::new(store.clone()),
            replies: ReplyQueue::new(store.clone()),
            store,
            sequencer: Sequencer::default(),
            notices: NoticeBoard::default(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn notices(&self) -> &NoticeBoard {
        &self.notices
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub(crate) fn stories(&self) -> &StoryPlayer {
        &self.stories
    }

    pub(crate) fn replies(&self) -> &ReplyQueue {
        &self.replies
    }

    pub fn snapshot(&self) -> ClientState {
        self.store.snapshot()
    }

    pub fn read<R>(&self, f: impl FnOnce(&ClientState) -> R) -> R {
        self.store.read(f)
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }

    /// Applies `transform` to every copy of post `entity_id` in the home,
    /// explore and profile feeds and the selected view. Reposts wrapping the
    /// post only have their embedded original transformed.
    pub fn apply_to_entity(&self, entity_id: &str, transform: impl FnMut(&mut Post)) -> usize {
        self.store
            .update(|state| state.apply_to_post(entity_id, transform))
    }

    pub fn select_post(&self, id: &str) -> bool {
        self.store.update(|state| {
            state.selected = state.find_post(id).cloned();
            state.selected.is_some()
        })
    }

    pub fn close_selected(&self) {
        self.store.update(|state| state.selected = None);
    }

    pub fn mark_notifications_read(&self) -> usize {
        self.store.update(|state| {
            let mut marked = 0;
            for notification in state.notifications.iter_mut().filter(|n| !n.is_read) {
                notification.is_read = true;
                marked += 1;
            }
            marked
        })
    }

    /// Retires `ticket` and resolves the response. A failure undoes the
    /// optimistic change with `rollback`, unless a newer mutation of the same
    /// entity has been issued since.
    fn settle<T>(
        &self,
        ticket: Ticket,
        result: ApiResult<T>,
        notice: &str,
        rollback: impl FnOnce(),
    ) -> Outcome {
        let current = self.sequencer.settle(ticket);
        match result {
            Ok(_) => Outcome::Confirmed,
            Err(e) => {
                error!("{}", e);
                self.notices.show(notice);
                if current {
                    rollback();
                    Outcome::RolledBack
                } else {
                    warn!("Discarding rollback superseded by a newer change");
                    Outcome::Stale
                }
            }
        }
    }

    /// Resolves an append-only request, where failure has nothing to undo.
    pub(crate) fn report<T>(&self, result: ApiResult<T>, notice: &str) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                error!("{}", e);
                self.notices.show(notice);
                None
            }
        }
    }
}
