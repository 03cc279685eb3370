//! Per-frame draw data for the popup.
//!
//! [`build_draw_list`] is a pure read of the popup state; the widget issues the
//! resulting commands to the host display while it still holds the lock.

use std::borrow::Cow;

use serde::Serialize;

use crate::host::{
    DisplayContext, FontMetrics, FrameInfo, Localizer, MessageId, TextureHandle, TextureManager,
    WidgetIcon,
};
use crate::state::PopupState;

pub const PURE_WHITE: u32 = 0xFFFF_FFFF;
pub const TEXT_COLOR_FAINT: u32 = 0x8787_87FF;
pub const TEXT_COLOR_INFO: u32 = 0xD8EE_FFFF;

/// Popup height in font lines.
const POPUP_LINES: u32 = 4;
const BADGE_SCALE: f32 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IconDraw {
    pub texture: TextureHandle,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextDraw<'a> {
    pub text: Cow<'a, str>,
    pub x: f32,
    pub y: f32,
    pub color: u32,
    pub align: TextAlign,
    pub shadow: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand<'a> {
    BlendBegin,
    BlendEnd,
    Icon(IconDraw),
    Text(TextDraw<'a>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupDrawList<'a> {
    pub commands: Vec<DrawCommand<'a>>,
    pub unfold: f32,
}

impl PopupDrawList<'_> {
    pub fn issue<D>(&self, display: &D)
    where
        D: DisplayContext + ?Sized,
    {
        for command in &self.commands {
            match command {
                DrawCommand::BlendBegin => display.blend_begin(),
                DrawCommand::BlendEnd => display.blend_end(),
                DrawCommand::Icon(icon) => display.draw_icon(icon),
                DrawCommand::Text(text) => display.draw_text(text),
            }
        }
    }

    pub fn icons(&self) -> impl Iterator<Item = &IconDraw> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Icon(icon) => Some(icon),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextDraw<'_>> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }
}

/// Width and height of the popup for `title`: four lines tall, wide enough
/// for the longer of the label and the title plus padding on both sides.
pub fn measure<M>(metrics: &M, label: &str, title: &str, padding: u32) -> (u32, u32)
where
    M: FontMetrics + ?Sized,
{
    let height = metrics.line_height() * POPUP_LINES;
    let text_width = metrics.text_width(label).max(metrics.text_width(title));
    (text_width + padding * 2, height)
}

pub fn build_draw_list<'a, H>(
    state: &'a PopupState,
    frame: &FrameInfo,
    host: &'a H,
    margin_fraction: f32,
) -> Option<PopupDrawList<'a>>
where
    H: TextureManager + FontMetrics + Localizer + ?Sized,
{
    let record = state.current()?;
    let anim = state.animator().state();

    let video_w = frame.width as f32;
    let margin_x = video_w * margin_fraction;
    let margin_y = frame.height as f32 * margin_fraction;
    let width = anim.width as f32;
    let height = anim.height as f32;

    let origin_x = video_w - margin_x - width;
    let top = anim.y + margin_y;
    let left_edge_x = origin_x - height;

    let mut commands = Vec::with_capacity(10);

    commands.push(DrawCommand::BlendBegin);
    let frame_pieces = [
        (
            WidgetIcon::Background,
            origin_x,
            anim.width.saturating_sub(anim.height) as f32,
        ),
        (WidgetIcon::LeftEdge, left_edge_x, height),
        (WidgetIcon::RightEdge, video_w - margin_x - height, height),
    ];
    for (icon, x, piece_width) in frame_pieces {
        match host.icon(icon) {
            Some(texture) => commands.push(DrawCommand::Icon(IconDraw {
                texture,
                x,
                y: top,
                width: piece_width,
                height,
                color: PURE_WHITE,
            })),
            None => log::debug!("[cheevo_popup] no {icon:?} texture, skipping"),
        }
    }
    commands.push(DrawCommand::BlendEnd);

    let inset = (anim.height / 8) as f32;
    let badge_side = BADGE_SCALE * height;
    let badge_at = |texture| IconDraw {
        texture,
        x: left_edge_x + inset,
        y: top + inset,
        width: badge_side,
        height: badge_side,
        color: PURE_WHITE,
    };
    match record.badge {
        Some(badge) => commands.push(DrawCommand::Icon(badge_at(badge))),
        None => match host.icon(WidgetIcon::Achievement) {
            Some(texture) => {
                commands.push(DrawCommand::BlendBegin);
                commands.push(DrawCommand::Icon(badge_at(texture)));
                commands.push(DrawCommand::BlendEnd);
            }
            None => log::debug!("[cheevo_popup] no default achievement icon, skipping"),
        },
    }

    let line_height = host.line_height() as f32;
    commands.push(DrawCommand::Text(TextDraw {
        text: host.localize(MessageId::AchievementUnlocked),
        x: origin_x,
        y: anim.y + line_height + host.ascender() as f32 + margin_y,
        color: TEXT_COLOR_FAINT,
        align: TextAlign::Left,
        shadow: true,
    }));
    commands.push(DrawCommand::Text(TextDraw {
        text: Cow::Borrowed(record.title.as_str()),
        x: origin_x,
        y: anim.y + height - line_height - host.descender() as f32 + margin_y,
        color: TEXT_COLOR_INFO,
        align: TextAlign::Left,
        shadow: true,
    }));

    Some(PopupDrawList {
        commands,
        unfold: anim.unfold,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::config::PopupConfig;
    use crate::queue::PopupRecord;

    struct FixedHost {
        icons: HashMap<WidgetIcon, TextureHandle>,
    }

    impl FixedHost {
        fn with_icons(icons: &[WidgetIcon]) -> Self {
            let icons = icons
                .iter()
                .enumerate()
                .map(|(idx, icon)| (*icon, TextureHandle::new(100 + idx as u64).expect("id")))
                .collect();
            Self { icons }
        }
    }

    impl TextureManager for FixedHost {
        fn badge_texture(&self, _badge: &str) -> Option<TextureHandle> {
            None
        }

        fn unload(&self, _handle: TextureHandle) {}

        fn icon(&self, icon: WidgetIcon) -> Option<TextureHandle> {
            self.icons.get(&icon).copied()
        }
    }

    impl FontMetrics for FixedHost {
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

    impl Localizer for FixedHost {}

    const ALL_ICONS: [WidgetIcon; 4] = [
        WidgetIcon::Background,
        WidgetIcon::LeftEdge,
        WidgetIcon::RightEdge,
        WidgetIcon::Achievement,
    ];

    fn showing(title: &str, badge: Option<TextureHandle>, host: &FixedHost) -> PopupState {
        let mut state = PopupState::new(&PopupConfig::default());
        state
            .queue_mut()
            .push(PopupRecord::new(title, badge))
            .expect("push");
        let (width, height) = measure(host, "Achievement Unlocked", title, 16);
        state.animator_mut().start(width, height);
        state
    }

    #[test]
    fn measure_uses_four_lines_and_widest_text() {
        let host = FixedHost::with_icons(&[]);
        let (width, height) = measure(&host, "Achievement Unlocked", "Speedrunner", 16);
        assert_eq!(height, 80);
        assert_eq!(width, 200 + 32);

        let (width, _) = measure(&host, "Achievement Unlocked", "A Very Long Achievement Title", 16);
        assert_eq!(width, 290 + 32);
    }

    #[test]
    fn empty_queue_draws_nothing() {
        let host = FixedHost::with_icons(&ALL_ICONS);
        let state = PopupState::new(&PopupConfig::default());
        assert!(build_draw_list(&state, &FrameInfo::new(1280, 720), &host, 0.075).is_none());
    }

    #[test]
    fn positions_follow_top_right_anchor() {
        let host = FixedHost::with_icons(&ALL_ICONS);
        let state = showing("Speedrunner", None, &host);
        let list = build_draw_list(&state, &FrameInfo::new(1000, 800), &host, 0.1)
            .expect("popup visible");

        let icons: Vec<&IconDraw> = list.icons().collect();
        assert_eq!(icons.len(), 4);
        // width 232, height 80, margins 100 x 80, y starts at -80.
        assert_eq!((icons[0].x, icons[0].y), (668.0, 0.0));
        assert_eq!((icons[0].width, icons[0].height), (152.0, 80.0));
        assert_eq!(icons[1].x, 588.0);
        assert_eq!(icons[2].x, 820.0);
        assert_eq!((icons[3].x, icons[3].y), (598.0, 10.0));
        assert_eq!(icons[3].width, 60.0);

        let texts: Vec<&TextDraw<'_>> = list.texts().collect();
        assert_eq!(texts[0].text, "Achievement Unlocked");
        assert_eq!(texts[0].color, TEXT_COLOR_FAINT);
        assert_eq!(texts[0].y, -80.0 + 20.0 + 15.0 + 80.0);
        assert_eq!(texts[1].text, "Speedrunner");
        assert_eq!(texts[1].color, TEXT_COLOR_INFO);
        assert_eq!(texts[1].y, -80.0 + 80.0 - 20.0 - 5.0 + 80.0);
    }

    #[test]
    fn default_icon_gets_its_own_blend_pass() {
        let host = FixedHost::with_icons(&ALL_ICONS);
        let state = showing("Speedrunner", None, &host);
        let list = build_draw_list(&state, &FrameInfo::new(1280, 720), &host, 0.075)
            .expect("popup visible");
        let kinds: Vec<&str> = list
            .commands
            .iter()
            .map(|command| match command {
                DrawCommand::BlendBegin => "begin",
                DrawCommand::BlendEnd => "end",
                DrawCommand::Icon(_) => "icon",
                DrawCommand::Text(_) => "text",
            })
            .collect();
        assert_eq!(
            kinds,
            vec![
                "begin", "icon", "icon", "icon", "end", "begin", "icon", "end", "text", "text"
            ]
        );
    }

    #[test]
    fn badge_replaces_default_icon() {
        let host = FixedHost::with_icons(&ALL_ICONS);
        let badge = TextureHandle::new(9);
        let state = showing("Speedrunner", badge, &host);
        let list = build_draw_list(&state, &FrameInfo::new(1280, 720), &host, 0.075)
            .expect("popup visible");
        let last_icon = list.icons().last().expect("badge icon");
        assert_eq!(Some(last_icon.texture), badge);
        assert_eq!(list.commands.len(), 8);
    }

    #[test]
    fn missing_icons_are_skipped() {
        let host = FixedHost::with_icons(&[]);
        let state = showing("Speedrunner", None, &host);
        let list = build_draw_list(&state, &FrameInfo::new(1280, 720), &host, 0.075)
            .expect("popup still described");
        assert_eq!(list.icons().count(), 0);
        assert_eq!(list.texts().count(), 2);
    }
}
