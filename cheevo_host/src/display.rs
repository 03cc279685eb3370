use std::borrow::Cow;
use std::sync::{Mutex, MutexGuard, PoisonError};

use cheevo_popup::{DisplayContext, DrawCommand, IconDraw, Phase, TextDraw};
use serde::Serialize;

/// Draw calls issued during one simulated frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time_ms: u64,
    pub phase: Phase,
    pub draws: Vec<DrawCommand<'static>>,
}

#[derive(Debug, Default)]
struct Recorder {
    current: Option<FrameRecord>,
    frames: Vec<FrameRecord>,
    blend_depth: i32,
    unbalanced_blends: usize,
}

/// Display backend that records draw calls instead of rasterising them.
/// Frames with no draws are not kept.
#[derive(Debug, Default)]
pub struct RecordingDisplay {
    recorder: Mutex<Recorder>,
}

impl RecordingDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn recorder(&self) -> MutexGuard<'_, Recorder> {
        self.recorder.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn begin_frame(&self, frame: u64, time_ms: u64, phase: Phase) {
        self.recorder().current = Some(FrameRecord {
            frame,
            time_ms,
            phase,
            draws: Vec::new(),
        });
    }

    pub fn end_frame(&self) {
        let mut recorder = self.recorder();
        if recorder.blend_depth != 0 {
            log::warn!(
                "[cheevo_host] frame ended with blend depth {}",
                recorder.blend_depth
            );
            recorder.unbalanced_blends += 1;
            recorder.blend_depth = 0;
        }
        if let Some(record) = recorder.current.take() {
            if !record.draws.is_empty() {
                recorder.frames.push(record);
            }
        }
    }

    pub fn unbalanced_blends(&self) -> usize {
        self.recorder().unbalanced_blends
    }

    pub fn into_frames(self) -> Vec<FrameRecord> {
        self.recorder
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
            .frames
    }

    fn record(&self, command: DrawCommand<'static>) {
        let mut recorder = self.recorder();
        match recorder.current.as_mut() {
            Some(record) => record.draws.push(command),
            None => log::warn!("[cheevo_host] draw call outside a frame: {command:?}"),
        }
    }
}

impl DisplayContext for RecordingDisplay {
    fn blend_begin(&self) {
        self.recorder().blend_depth += 1;
        self.record(DrawCommand::BlendBegin);
    }

    fn blend_end(&self) {
        self.recorder().blend_depth -= 1;
        self.record(DrawCommand::BlendEnd);
    }

    fn draw_icon(&self, icon: &IconDraw) {
        self.record(DrawCommand::Icon(*icon));
    }

    fn draw_text(&self, text: &TextDraw<'_>) {
        self.record(DrawCommand::Text(TextDraw {
            text: Cow::Owned(text.text.clone().into_owned()),
            x: text.x,
            y: text.y,
            color: text.color,
            align: text.align,
            shadow: text.shadow,
        }));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cheevo_popup::{TextAlign, TextureHandle};

    #[test]
    fn only_frames_with_draws_are_kept() {
        let display = RecordingDisplay::new();
        display.begin_frame(0, 0, Phase::Idle);
        display.end_frame();

        display.begin_frame(1, 16, Phase::SlidingIn);
        display.blend_begin();
        display.draw_icon(&IconDraw {
            texture: TextureHandle::new(1).expect("handle"),
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            color: 0xFFFF_FFFF,
        });
        display.draw_text(&TextDraw {
            text: Cow::Borrowed("Speedrunner"),
            x: 4.0,
            y: 8.0,
            color: 0xD8EE_FFFF,
            align: TextAlign::Left,
            shadow: false,
        });
        display.blend_end();
        display.end_frame();

        assert_eq!(display.unbalanced_blends(), 0);
        let frames = display.into_frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].frame, 1);
        assert_eq!(frames[0].draws.len(), 4);
        assert!(matches!(
            &frames[0].draws[2],
            DrawCommand::Text(text) if text.text == "Speedrunner"
        ));
    }

    #[test]
    fn unbalanced_blend_is_counted() {
        let display = RecordingDisplay::new();
        display.begin_frame(0, 0, Phase::Holding);
        display.blend_begin();
        display.end_frame();
        assert_eq!(display.unbalanced_blends(), 1);
    }
}
