//! In-memory record of the scenarios evaluated during one session.
//!
//! Nothing here is persisted; the history lives as long as the process.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use iit_core::{ScenarioParameters, ScenarioResult};

/// One evaluated scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    /// Starts at 1 and increases by one per recorded scenario, including
    /// evicted ones.
    pub id: u64,
    pub recorded_at: DateTime<Local>,
    pub label: Option<String>,
    pub parameters: ScenarioParameters,
    pub result: ScenarioResult,
}

/// Bounded history that drops the oldest entry once full.
#[derive(Debug, Clone)]
pub struct ScenarioHistory {
    capacity: usize,
    next_id: u64,
    entries: VecDeque<HistoryEntry>,
}

impl Default for ScenarioHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ScenarioHistory {
    /// A capacity of 0 is treated as 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            next_id: 1,
            entries: VecDeque::new(),
        }
    }

    /// Appends a scenario and returns the new entry.
    pub fn record(
        &mut self,
        label: Option<String>,
        parameters: ScenarioParameters,
        result: ScenarioResult,
    ) -> &HistoryEntry {
        if self.entries.len() == self.capacity {
            if let Some(evicted) = self.entries.pop_front() {
                tracing::debug!(id = evicted.id, "evicted oldest history entry");
            }
        }

        let id = self.next_id;
        self.next_id += 1;
        self.entries.push_back(HistoryEntry {
            id,
            recorded_at: Local::now(),
            label,
            parameters,
            result,
        });

        &self.entries[self.entries.len() - 1]
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes all entries. Ids keep counting from where they were.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
