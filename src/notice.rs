use std::{
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::Duration,
};

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::timer::TimerSlot;

const NOTICE_DURATION: Duration = Duration::from_secs(3);

pub const LIKE_FAILED: &str = "Couldn't update like status. Please try again.";
pub const COMMENT_FAILED: &str = "Couldn't post comment. Please try again.";
pub const FOLLOW_FAILED: &str = "Couldn't update follow status. Please try again.";
pub const REPOST_FAILED: &str = "Couldn't repost. Please try again.";
pub const POST_FAILED: &str = "Couldn't share post. Please try again.";
pub const STORY_FAILED: &str = "Couldn't share story. Please try again.";
pub const MESSAGE_FAILED: &str = "Couldn't send message. Please try again.";
pub const LOAD_FAILED: &str = "Couldn't load content. Please try again.";
pub const LOGIN_FAILED: &str = "Failed to log in. Please try again.";
pub const SIGNUP_FAILED: &str = "Failed to sign up. Please try again.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub raised_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Board {
    current: Option<Notice>,
    history: Vec<Notice>,
    shown: u64,
}

impl Board {
    /// Clears the current notice if it is still the `shown`-th one raised.
    fn expire(&mut self, shown: u64) {
        if self.shown != shown {
            return;
        }
        if let Some(notice) = self.current.take() {
            debug!("Dismissed notice: {}", notice.message);
        }
    }
}

/// Transient toast notices. Only one is shown at a time.
///
/// Showing a notice schedules its dismissal on the tokio runtime, so
/// [`NoticeBoard::show`] must be called from within one.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    board: Arc<Mutex<Board>>,
    dismiss: TimerSlot,
}

impl NoticeBoard {
    pub fn show(&self, message: impl Into<String>) {
        let notice = Notice {
            message: message.into(),
            raised_at: Utc::now(),
        };
        info!("{}", notice.message);
        let shown = {
            let mut board = self.lock();
            board.shown += 1;
            board.history.push(notice.clone());
            board.current = Some(notice);
            board.shown
        };

        let board = self.board.clone();
        self.dismiss.schedule(NOTICE_DURATION, move || {
            board
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .expire(shown);
        });
    }

    pub fn dismiss(&self) {
        self.dismiss.cancel();
        self.lock().current = None;
    }

    pub fn current(&self) -> Option<Notice> {
        self.lock().current.clone()
    }

    /// Every notice raised so far, oldest first.
    pub fn history(&self) -> Vec<Notice> {
        self.lock().history.clone()
    }

    pub fn contains(&self, message: &str) -> bool {
        self.lock().history.iter().any(|n| n.message == message)
    }

    fn lock(&self) -> MutexGuard<'_, Board> {
        self.board.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
