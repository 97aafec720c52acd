use std::vec;

/// Prior values of the copies an optimistic change visited, in visiting
/// order. Copies that already held the new value are recorded as untouched,
/// so undoing the change leaves them as they were.
#[derive(Debug)]
pub struct UndoLog<T> {
    entries: Vec<Option<T>>,
}

impl<T> Default for UndoLog<T> {
    fn default() -> Self {
        Self { entries: vec![] }
    }
}

impl<T> UndoLog<T> {
    pub fn record(&mut self, prior: T, changed: bool) {
        self.entries.push(changed.then_some(prior));
    }

    /// Number of copies the change actually altered.
    pub fn changed(&self) -> usize {
        self.entries.iter().flatten().count()
    }

    /// Replays the log against the same copies, visited in the same order.
    pub fn replay(self) -> Replay<T> {
        Replay {
            entries: self.entries.into_iter(),
        }
    }
}

pub struct Replay<T> {
    entries: vec::IntoIter<Option<T>>,
}

impl<T> Replay<T> {
    /// Prior value of the next visited copy, if the change altered it.
    pub fn next_prior(&mut self) -> Option<T> {
        self.entries.next().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replay_skips_untouched_copies() {
        let mut log = UndoLog::default();
        log.record((4, false), true);
        log.record((5, true), false);
        log.record((4, false), true);
        assert_eq!(log.changed(), 2);

        let mut replay = log.replay();
        assert_eq!(replay.next_prior(), Some((4, false)));
        assert_eq!(replay.next_prior(), None);
        assert_eq!(replay.next_prior(), Some((4, false)));
        assert_eq!(replay.next_prior(), None);
    }
}
