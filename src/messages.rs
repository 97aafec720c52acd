use std::{
    mem,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use log::{debug, info};
use tokio::sync::Notify;

use crate::{
    api::Backend,
    model::{Conversation, Message, SentMessage},
    notice::MESSAGE_FAILED,
    reconciler::{Outcome, Reconciler, Store},
    timer::TimerSlot,
};

/// Delay before a reply shows up, so the other side appears to be typing.
pub const REPLY_DELAY: Duration = Duration::from_millis(600);

/// Replies waiting to be shown. Each new reply restarts the delay; when it
/// elapses every queued reply is appended at once.
#[derive(Debug, Clone)]
pub struct ReplyQueue {
    store: Store,
    timer: TimerSlot,
    pending: Arc<Mutex<Vec<(String, Message)>>>,
    delivered: Arc<Notify>,
}

impl ReplyQueue {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            timer: TimerSlot::default(),
            pending: Arc::default(),
            delivered: Arc::default(),
        }
    }

    pub fn push(&self, conversation_id: String, reply: Message) {
        self.lock().push((conversation_id, reply));
        let queue = self.clone();
        self.timer.schedule(REPLY_DELAY, move || {
            queue.flush();
        });
    }

    pub fn flush(&self) -> usize {
        // held until the replies are in the store so `drained` never sees an
        // empty queue ahead of them
        let mut pending = self.lock();
        let replies = mem::take(&mut *pending);
        let count = replies.len();
        if count == 0 {
            return 0;
        }
        self.store.update(|state| {
            for (conversation_id, reply) in replies {
                if let Some(conversation) = state
                    .conversations
                    .iter_mut()
                    .find(|c| c.id == conversation_id)
                {
                    conversation.messages.push(reply);
                }
            }
        });
        drop(pending);
        debug!("Delivered {} replies", count);
        self.delivered.notify_waiters();
        count
    }

    /// Resolves once the queue is empty.
    pub async fn drained(&self) {
        loop {
            let delivered = self.delivered.notified();
            if self.pending() == 0 {
                return;
            }
            delivered.await;
        }
    }

    pub fn pending(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, Message)>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B: Backend> Reconciler<B> {
    /// Sends a direct message. The sent message is appended once the backend
    /// accepts it and the reply follows after [`REPLY_DELAY`], on a timer
    /// driven by the tokio runtime.
    pub async fn send_message(&self, recipient: &str, text: &str) -> Outcome {
        let text = text.trim();
        if text.is_empty() {
            return Outcome::Rejected;
        }

        let result = self.backend().send_message(recipient, text).await;
        let Some(SentMessage {
            user_message,
            reply_message,
        }) = self.report(result, MESSAGE_FAILED)
        else {
            return Outcome::Failed;
        };

        let conversation_id = self.store().update(|state| {
            let index = match state
                .conversations
                .iter()
                .position(|c| c.has_participant(recipient))
            {
                Some(index) => index,
                None => {
                    info!("Starting a conversation with {}", recipient);
                    state.conversations.insert(
                        0,
                        Conversation {
                            id: format!("conversation-{}", recipient),
                            participants: vec![
                                user_message.sender.clone(),
                                reply_message.sender.clone(),
                            ],
                            messages: vec![],
                        },
                    );
                    0
                }
            };
            let conversation = &mut state.conversations[index];
            conversation.messages.push(user_message);
            conversation.id.clone()
        });

        self.replies().push(conversation_id, reply_message);
        Outcome::Confirmed
    }

    /// Resolves once no reply is waiting to be shown.
    pub async fn replies_delivered(&self) {
        self.replies().drained().await
    }
}
