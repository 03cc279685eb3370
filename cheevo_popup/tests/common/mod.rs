#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use cheevo_popup::{
    AchievementPopup, AnimationDriver, AnimationEvent, Completion, DisplayContext, FontMetrics,
    IconDraw, Localizer, Phase, PopupState, StateLock, TextDraw, TextureHandle, TextureManager,
    Tween, WidgetIcon,
};

/// Host double that records every call and lets tests deliver animation
/// completions one at a time.
#[derive(Default)]
pub struct RecordingHost {
    next_handle: AtomicU64,
    pending: Mutex<VecDeque<Pending>>,
    pub tweens: Mutex<Vec<Tween>>,
    pub unloads: Mutex<Vec<u64>>,
    pub texts: Mutex<Vec<String>>,
    pub icons: Mutex<Vec<IconDraw>>,
    pub blends: Mutex<i32>,
}

#[derive(Debug, Clone, Copy)]
enum Pending {
    Tween(Tween),
    Timer(Completion),
}

impl RecordingHost {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            ..Self::default()
        }
    }

    pub fn tween_count(&self) -> usize {
        self.tweens.lock().expect("tweens").len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending.lock().expect("pending").len()
    }

    pub fn unloaded(&self) -> Vec<u64> {
        self.unloads.lock().expect("unloads").clone()
    }

    /// Completes the oldest outstanding tween or timer. Returns the phase it
    /// reported, if it carried a completion.
    pub fn complete_next<L>(&self, popup: &AchievementPopup<L>) -> Option<Phase>
    where
        L: StateLock<PopupState>,
    {
        let next = self.pending.lock().expect("pending").pop_front()?;
        let done = match next {
            Pending::Tween(tween) => {
                popup.on_animation_event(
                    AnimationEvent::Apply {
                        subject: tween.subject,
                        value: tween.to,
                        sequence: tween.sequence,
                    },
                    self,
                );
                tween.on_complete
            }
            Pending::Timer(done) => Some(done),
        };
        let done = done?;
        popup.on_animation_event(AnimationEvent::Complete(done), self);
        Some(done.phase)
    }

    /// Delivers completions until nothing is outstanding; returns them in order.
    pub fn run_until_idle<L>(&self, popup: &AchievementPopup<L>) -> Vec<Phase>
    where
        L: StateLock<PopupState>,
    {
        let mut phases = Vec::new();
        while self.pending_count() > 0 {
            if let Some(phase) = self.complete_next(popup) {
                phases.push(phase);
            }
        }
        phases
    }
}

impl AnimationDriver for RecordingHost {
    fn push_tween(&self, tween: Tween) {
        self.tweens.lock().expect("tweens").push(tween);
        self.pending
            .lock()
            .expect("pending")
            .push_back(Pending::Tween(tween));
    }

    fn start_timer(&self, _duration: Duration, on_complete: Completion) {
        self.pending
            .lock()
            .expect("pending")
            .push_back(Pending::Timer(on_complete));
    }
}

impl TextureManager for RecordingHost {
    fn badge_texture(&self, badge: &str) -> Option<TextureHandle> {
        if badge.starts_with("missing") {
            return None;
        }
        TextureHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }

    fn unload(&self, handle: TextureHandle) {
        self.unloads.lock().expect("unloads").push(handle.get());
    }

    fn icon(&self, icon: WidgetIcon) -> Option<TextureHandle> {
        let raw = match icon {
            WidgetIcon::Background => 900,
            WidgetIcon::LeftEdge => 901,
            WidgetIcon::RightEdge => 902,
            WidgetIcon::Achievement => 903,
        };
        TextureHandle::new(raw)
    }
}

impl FontMetrics for RecordingHost {
    fn line_height(&self) -> u32 {
        20
    }

    fn ascender(&self) -> i32 {
        15
    }

    fn descender(&self) -> i32 {
        5
    }

    fn text_width(&self, text: &str) -> u32 {
        text.chars().count() as u32 * 10
    }
}

impl Localizer for RecordingHost {}

impl DisplayContext for RecordingHost {
    fn blend_begin(&self) {
        *self.blends.lock().expect("blends") += 1;
    }

    fn blend_end(&self) {
        *self.blends.lock().expect("blends") -= 1;
    }

    fn draw_icon(&self, icon: &IconDraw) {
        self.icons.lock().expect("icons").push(*icon);
    }

    fn draw_text(&self, text: &TextDraw<'_>) {
        self.texts
            .lock()
            .expect("texts")
            .push(text.text.to_string());
    }
}
