use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animator::{Easing, Timing};
use crate::error::PopupError;
use crate::queue::CHEEVO_QUEUE_SIZE;

const DEFAULT_ANIMATION_DURATION_MS: u64 = 330;
const DEFAULT_DISPLAY_DURATION_MS: u64 = 4000;
const DEFAULT_MARGIN_FRACTION: f32 = 0.075;
const DEFAULT_PADDING_PX: u32 = 16;

/// Tunables for the popup. Every field has a default, so hosts can load a
/// partial JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    pub queue_capacity: usize,
    pub animation_duration_ms: u64,
    pub display_duration_ms: u64,
    /// Distance from the top-right corner as a fraction of the video size.
    pub margin_fraction: f32,
    pub padding_px: u32,
    pub easing: Easing,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            queue_capacity: CHEEVO_QUEUE_SIZE,
            animation_duration_ms: DEFAULT_ANIMATION_DURATION_MS,
            display_duration_ms: DEFAULT_DISPLAY_DURATION_MS,
            margin_fraction: DEFAULT_MARGIN_FRACTION,
            padding_px: DEFAULT_PADDING_PX,
            easing: Easing::default(),
        }
    }
}

impl PopupConfig {
    pub fn validate(&self) -> Result<(), PopupError> {
        if self.queue_capacity == 0 {
            return Err(PopupError::InvalidConfig(
                "queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.animation_duration_ms == 0 {
            return Err(PopupError::InvalidConfig(
                "animation_duration_ms must be positive".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&self.margin_fraction) {
            return Err(PopupError::InvalidConfig(format!(
                "margin_fraction must be in [0, 0.5) (got {})",
                self.margin_fraction
            )));
        }
        Ok(())
    }

    pub fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    pub fn display_duration(&self) -> Duration {
        Duration::from_millis(self.display_duration_ms)
    }

    pub fn timing(&self) -> Timing {
        Timing {
            animation: self.animation_duration(),
            display: self.display_duration(),
            easing: self.easing,
        }
    }
}
