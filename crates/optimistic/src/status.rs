//! Save badges shown next to inline-edited fields

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

use crate::key::MutationKey;

/// Visible save state of a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveStatus {
    /// A request is in flight
    Saving,
    /// The last request succeeded; shown for the saved window
    Saved,
    /// The last request failed and was rolled back; shown for the failed window
    Failed,
}

/// How long terminal badges stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayWindows {
    pub saved: Duration,
    pub failed: Duration,
}

impl Default for DisplayWindows {
    fn default() -> Self {
        Self {
            saved: Duration::from_secs(2),
            failed: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Badge {
    status: SaveStatus,
    until: Option<Instant>,
}

impl Badge {
    fn is_live(&self, now: Instant) -> bool {
        self.until.map_or(true, |until| now < until)
    }
}

/// Per-key badge table.
///
/// A key holds at most one badge, so a field can never be "saved" and
/// "failed" at the same time. Terminal badges expire lazily: reads compare
/// against the tokio clock instead of scheduling a timer per badge.
#[derive(Debug, Default)]
pub struct StatusBoard {
    windows: DisplayWindows,
    badges: HashMap<MutationKey, Badge>,
}

impl StatusBoard {
    pub fn new(windows: DisplayWindows) -> Self {
        Self {
            windows,
            badges: HashMap::new(),
        }
    }

    pub fn windows(&self) -> DisplayWindows {
        self.windows
    }

    /// Marks the key in flight, replacing any earlier badge.
    pub fn mark_saving(&mut self, key: &MutationKey) {
        self.set(key, SaveStatus::Saving, None);
    }

    pub fn mark_saved(&mut self, key: &MutationKey) {
        let until = Instant::now() + self.windows.saved;
        self.set(key, SaveStatus::Saved, Some(until));
    }

    pub fn mark_failed(&mut self, key: &MutationKey) {
        let until = Instant::now() + self.windows.failed;
        self.set(key, SaveStatus::Failed, Some(until));
    }

    /// Current badge for the key, if any is still visible.
    pub fn status(&self, key: &MutationKey) -> Option<SaveStatus> {
        let now = Instant::now();
        self.badges
            .get(key)
            .filter(|badge| badge.is_live(now))
            .map(|badge| badge.status)
    }

    pub fn is_saving(&self, key: &MutationKey) -> bool {
        self.status(key) == Some(SaveStatus::Saving)
    }

    /// Every visible badge, sorted by key.
    pub fn snapshot(&self) -> Vec<(MutationKey, SaveStatus)> {
        let now = Instant::now();
        let mut visible: Vec<_> = self
            .badges
            .iter()
            .filter(|(_, badge)| badge.is_live(now))
            .map(|(key, badge)| (key.clone(), badge.status))
            .collect();
        visible.sort_by(|a, b| a.0.cmp(&b.0));
        visible
    }

    /// Drops expired badges. Returns how many were removed.
    pub fn purge_expired(&mut self) -> usize {
        let now = Instant::now();
        let before = self.badges.len();
        self.badges.retain(|_, badge| badge.is_live(now));
        before - self.badges.len()
    }

    fn set(&mut self, key: &MutationKey, status: SaveStatus, until: Option<Instant>) {
        self.badges.insert(key.clone(), Badge { status, until });
    }
}
