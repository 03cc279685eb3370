use std::collections::VecDeque;

use serde::Serialize;

use crate::error::QueueFull;
use crate::host::TextureHandle;

/// Number of unlocks that may wait for display at once.
pub const CHEEVO_QUEUE_SIZE: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopupRecord {
    pub title: String,
    pub badge: Option<TextureHandle>,
}

impl PopupRecord {
    pub fn new(title: &str, badge: Option<TextureHandle>) -> Self {
        Self {
            title: title.to_string(),
            badge,
        }
    }
}

/// Bounded FIFO of pending popups. The front record is the one on screen.
#[derive(Debug, Clone)]
pub struct PopupQueue {
    records: VecDeque<PopupRecord>,
    capacity: usize,
}

impl Default for PopupQueue {
    fn default() -> Self {
        Self::with_capacity(CHEEVO_QUEUE_SIZE)
    }
}

impl PopupQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Appends `record` and returns its position; position 0 means the queue
    /// was empty and the record should be shown right away.
    pub fn push(&mut self, record: PopupRecord) -> Result<usize, QueueFull> {
        if self.is_full() {
            return Err(QueueFull {
                capacity: self.capacity,
                rejected: record,
            });
        }
        self.records.push_back(record);
        Ok(self.records.len() - 1)
    }

    pub fn pop_front(&mut self) -> Option<PopupRecord> {
        self.records.pop_front()
    }

    pub fn front(&self) -> Option<&PopupRecord> {
        self.records.front()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.records.len() >= self.capacity
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &PopupRecord> {
        self.records.iter()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = PopupRecord> + '_ {
        self.records.drain(..)
    }
}
