//! Seams to the host render engine.
//!
//! Every method takes `&self`: the widget may call into the host from
//! whichever thread pushed an achievement, so implementations keep their own
//! interior synchronisation. Hosts must not call back into the widget from
//! inside these methods; animation results are delivered later through
//! [`crate::AchievementPopup::on_animation_event`].

use std::borrow::Cow;
use std::num::NonZeroU64;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::animator::{Completion, Tween};
use crate::layout::{IconDraw, TextDraw};

/// Opaque texture id owned by the host. Zero is never a valid handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TextureHandle(NonZeroU64);

impl TextureHandle {
    pub fn new(raw: u64) -> Option<Self> {
        NonZeroU64::new(raw).map(Self)
    }

    pub fn get(self) -> u64 {
        self.0.get()
    }
}

/// Shared widget textures the popup draws besides the per-record badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetIcon {
    Background,
    LeftEdge,
    RightEdge,
    Achievement,
}

/// Localised strings the popup asks the host for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageId {
    AchievementUnlocked,
}

impl MessageId {
    pub fn default_text(self) -> &'static str {
        match self {
            MessageId::AchievementUnlocked => "Achievement Unlocked",
        }
    }
}

/// Video dimensions for the frame being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInfo {
    pub width: u32,
    pub height: u32,
}

impl FrameInfo {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

pub trait AnimationDriver {
    /// Starts interpolating `tween.subject`. When it reaches the target the
    /// host reports `tween.on_complete` back to the widget, if set.
    fn push_tween(&self, tween: Tween);

    /// Reports `on_complete` back to the widget once `duration` has elapsed.
    fn start_timer(&self, duration: Duration, on_complete: Completion);
}

pub trait TextureManager {
    /// Resolves a badge name to a loaded texture. May block on the video
    /// thread, so the widget never calls it while holding its lock.
    fn badge_texture(&self, badge: &str) -> Option<TextureHandle>;

    fn unload(&self, handle: TextureHandle);

    fn icon(&self, icon: WidgetIcon) -> Option<TextureHandle>;
}

pub trait FontMetrics {
    fn line_height(&self) -> u32;
    fn ascender(&self) -> i32;
    fn descender(&self) -> i32;
    fn text_width(&self, text: &str) -> u32;
}

pub trait Localizer {
    fn localize(&self, id: MessageId) -> Cow<'_, str> {
        Cow::Borrowed(id.default_text())
    }
}

pub trait DisplayContext {
    fn blend_begin(&self);
    fn blend_end(&self);
    fn draw_icon(&self, icon: &IconDraw);
    fn draw_text(&self, text: &TextDraw<'_>);
}

/// Everything the popup needs from its host in one bound.
pub trait PopupHost: AnimationDriver + TextureManager + FontMetrics + Localizer + DisplayContext {}

impl<T> PopupHost for T where
    T: AnimationDriver + TextureManager + FontMetrics + Localizer + DisplayContext + ?Sized
{
}
