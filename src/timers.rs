//! Deferred actions. Each entry records the session it was scheduled in;
//! the dispatcher in `compute` drops entries whose session has ended.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerAction {
    /// Move rounds from reserve into the magazine and clear `is_reloading`.
    ReloadComplete,
    /// The wave-clear debounce elapsed.
    WaveClear,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DueTimer {
    pub id: TimerId,
    pub session: u64,
    pub action: TimerAction,
}

#[derive(Clone, Debug)]
struct Entry {
    id: TimerId,
    due_at: u64,
    session: u64,
    action: TimerAction,
}

#[derive(Clone, Debug, Default)]
pub struct Scheduler {
    entries: Vec<Entry>,
    next_id: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due_at: u64, session: u64, action: TimerAction) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.entries.push(Entry { id, due_at, session, action });
        id
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove and return every entry due at or before `now`, earliest first.
    pub fn take_due(&mut self, now: u64) -> Vec<DueTimer> {
        let mut due: Vec<Entry> = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            if self.entries[i].due_at <= now {
                due.push(self.entries.remove(i));
            } else {
                i += 1;
            }
        }
        due.sort_by_key(|e| (e.due_at, e.id.0));
        due.into_iter()
            .map(|e| DueTimer { id: e.id, session: e.session, action: e.action })
            .collect()
    }
}
