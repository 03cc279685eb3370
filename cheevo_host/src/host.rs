use std::borrow::Cow;
use std::time::Duration;

use cheevo_popup::{
    AnimationDriver, Completion, DisplayContext, FontMetrics, IconDraw, Localizer, MessageId,
    TextDraw, TextureHandle, TextureManager, Tween, WidgetIcon,
};

use crate::badges::BadgeCache;
use crate::display::RecordingDisplay;
use crate::engine::TweenEngine;
use crate::fonts::HostFont;
use crate::locale::{self, Language};

/// Everything the popup widget needs from a frontend, without a GPU.
pub struct HeadlessHost {
    pub engine: TweenEngine,
    pub badges: BadgeCache,
    pub font: HostFont,
    pub display: RecordingDisplay,
    pub language: Language,
}

impl HeadlessHost {
    pub fn new(badges: BadgeCache, font: HostFont, language: Language) -> Self {
        Self {
            engine: TweenEngine::new(),
            badges,
            font,
            display: RecordingDisplay::new(),
            language,
        }
    }
}

impl AnimationDriver for HeadlessHost {
    fn push_tween(&self, tween: Tween) {
        self.engine.push_tween(tween);
    }

    fn start_timer(&self, duration: Duration, on_complete: Completion) {
        self.engine.start_timer(duration, on_complete);
    }
}

impl TextureManager for HeadlessHost {
    fn badge_texture(&self, badge: &str) -> Option<TextureHandle> {
        self.badges.badge_texture(badge)
    }

    fn unload(&self, handle: TextureHandle) {
        self.badges.unload(handle);
    }

    fn icon(&self, icon: WidgetIcon) -> Option<TextureHandle> {
        self.badges.icon(icon)
    }
}

impl FontMetrics for HeadlessHost {
    fn line_height(&self) -> u32 {
        self.font.line_height()
    }

    fn ascender(&self) -> i32 {
        self.font.ascender()
    }

    fn descender(&self) -> i32 {
        self.font.descender()
    }

    fn text_width(&self, text: &str) -> u32 {
        self.font.text_width(text)
    }
}

impl Localizer for HeadlessHost {
    fn localize(&self, id: MessageId) -> Cow<'_, str> {
        Cow::Borrowed(locale::message(self.language, id))
    }
}

impl DisplayContext for HeadlessHost {
    fn blend_begin(&self) {
        self.display.blend_begin();
    }

    fn blend_end(&self) {
        self.display.blend_end();
    }

    fn draw_icon(&self, icon: &IconDraw) {
        self.display.draw_icon(icon);
    }

    fn draw_text(&self, text: &TextDraw<'_>) {
        self.display.draw_text(text);
    }
}
