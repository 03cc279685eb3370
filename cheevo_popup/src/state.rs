use serde::Serialize;

use crate::animator::{AnimationState, Animator, Phase};
use crate::config::PopupConfig;
use crate::host::TextureManager;
use crate::queue::{PopupQueue, PopupRecord};

/// Everything guarded by the widget lock: the pending records and the
/// animation of the front one.
#[derive(Debug, Clone)]
pub struct PopupState {
    queue: PopupQueue,
    animator: Animator,
}

/// Copy of the observable state, for hosts and tests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupSnapshot {
    pub phase: Phase,
    pub sequence: u64,
    pub animation: AnimationState,
    pub pending: Vec<String>,
}

impl PopupState {
    pub fn new(config: &PopupConfig) -> Self {
        Self {
            queue: PopupQueue::with_capacity(config.queue_capacity),
            animator: Animator::new(config.timing()),
        }
    }

    pub fn queue(&self) -> &PopupQueue {
        &self.queue
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub(crate) fn queue_mut(&mut self) -> &mut PopupQueue {
        &mut self.queue
    }

    pub(crate) fn animator_mut(&mut self) -> &mut Animator {
        &mut self.animator
    }

    pub fn current(&self) -> Option<&PopupRecord> {
        self.queue.front()
    }

    /// Drops the front record and unloads its badge. Returns false when the
    /// queue was already empty.
    pub fn dequeue_current<T>(&mut self, textures: &T) -> bool
    where
        T: TextureManager + ?Sized,
    {
        match self.queue.pop_front() {
            Some(record) => {
                release_record(record, textures);
                true
            }
            None => false,
        }
    }

    /// Stops the animation and releases every pending record without running
    /// any of the remaining phases.
    pub fn release_all<T>(&mut self, textures: &T) -> usize
    where
        T: TextureManager + ?Sized,
    {
        self.animator.stop();
        let mut released = 0;
        for record in self.queue.drain() {
            release_record(record, textures);
            released += 1;
        }
        released
    }

    pub fn snapshot(&self) -> PopupSnapshot {
        PopupSnapshot {
            phase: self.animator.phase(),
            sequence: self.animator.sequence(),
            animation: *self.animator.state(),
            pending: self.queue.iter().map(|record| record.title.clone()).collect(),
        }
    }
}

pub(crate) fn release_record<T>(record: PopupRecord, textures: &T)
where
    T: TextureManager + ?Sized,
{
    if let Some(handle) = record.badge {
        textures.unload(handle);
    }
}
