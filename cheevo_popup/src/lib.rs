//! "Achievement unlocked" popup widget for an emulator front-end overlay.
//!
//! Unlock events land in a small bounded queue. The front record is shown as a
//! banner that slides in, unfolds, holds, folds and slides out again, after
//! which the next record takes over. Everything that touches the screen or the
//! clock (tweens, timers, textures, fonts, draw calls) is reached through the
//! traits in [`host`], so the widget itself owns no thread and never blocks.

pub mod animator;
pub mod config;
pub mod error;
pub mod host;
pub mod layout;
pub mod queue;
pub mod state;
pub mod sync;
pub mod widget;

pub use animator::{AnimationEvent, AnimationState, Completion, Easing, Phase, Subject, Tween};
pub use config::PopupConfig;
pub use error::{PopupError, QueueFull};
pub use host::{
    AnimationDriver, DisplayContext, FontMetrics, FrameInfo, Localizer, MessageId, PopupHost,
    TextureHandle, TextureManager, WidgetIcon,
};
pub use layout::{DrawCommand, IconDraw, PopupDrawList, TextAlign, TextDraw};
pub use queue::{CHEEVO_QUEUE_SIZE, PopupQueue, PopupRecord};
pub use state::{PopupSnapshot, PopupState};
pub use sync::StateLock;
pub use widget::{AchievementPopup, GfxWidget, LocalPopup, PushOutcome, ThreadedPopup};
