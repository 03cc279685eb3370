use thiserror::Error;

use crate::queue::PopupRecord;

/// Returned by [`crate::PopupQueue::push`] when every slot is taken. Hands
/// the record back so its badge can still be released.
#[derive(Debug, Error)]
#[error("popup queue full ({capacity} pending), rejecting {:?}", .rejected.title)]
pub struct QueueFull {
    pub capacity: usize,
    pub rejected: PopupRecord,
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum PopupError {
    #[error("invalid popup config: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::QueueFull;
    use crate::queue::PopupRecord;

    #[test]
    fn queue_full_names_the_rejected_title() {
        let err = QueueFull {
            capacity: 8,
            rejected: PopupRecord::new("Late Bloomer", None),
        };
        assert_eq!(
            err.to_string(),
            "popup queue full (8 pending), rejecting \"Late Bloomer\""
        );
    }
}
