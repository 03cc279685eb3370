use std::{fs, path::Path};

use anyhow::{Context, Result, anyhow};
use cheevo_popup::FontMetrics;
use fontdue::{Font, FontSettings};

/// Text metrics for the headless host: a real font through fontdue, or a
/// fixed-cell grid when no font file is supplied.
pub enum HostFont {
    Fontdue {
        font: Font,
        size: f32,
        layout: LineLayout,
    },
    Fixed(LineLayout),
}

/// Vertical metrics shared by both font sources. `descent` is the distance
/// below the baseline and is positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineLayout {
    pub line_height: u32,
    pub ascent: i32,
    pub descent: i32,
    pub cell_advance: u32,
}

impl LineLayout {
    /// Grid used without a font file, sized like an 18px monospace face.
    pub const FIXED: LineLayout = LineLayout {
        line_height: 22,
        ascent: 17,
        descent: 5,
        cell_advance: 11,
    };

    fn from_font(font: &Font, size: f32) -> Self {
        let advance = (32u8..=126)
            .map(|b| font.metrics(b as char, size).advance_width)
            .fold(0.0f32, f32::max)
            .ceil() as u32;
        match font.horizontal_line_metrics(size) {
            Some(lines) => {
                let ascent = lines.ascent.ceil() as i32;
                let descent = (-lines.descent).ceil().max(0.0) as i32;
                let line_height = lines
                    .new_line_size
                    .ceil()
                    .max((ascent + descent) as f32)
                    .max(1.0) as u32;
                LineLayout {
                    line_height,
                    ascent,
                    descent,
                    cell_advance: advance.max(1),
                }
            }
            None => {
                // No hhea table: fall back to the extents of the printable range.
                let (mut top, mut bottom) = (0i32, 0i32);
                for b in 32u8..=126 {
                    let metrics = font.metrics(b as char, size);
                    if metrics.width == 0 && metrics.height == 0 {
                        continue;
                    }
                    top = top.max(metrics.ymin + metrics.height as i32);
                    bottom = bottom.min(metrics.ymin);
                }
                let descent = -bottom;
                LineLayout {
                    line_height: (top + descent).max(1) as u32,
                    ascent: top,
                    descent,
                    cell_advance: advance.max(1),
                }
            }
        }
    }
}

impl HostFont {
    pub fn load(path: &Path, size: f32) -> Result<Self> {
        let data = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        let font = Font::from_bytes(data, FontSettings::default())
            .map_err(|err| anyhow!("parsing font {}: {err}", path.display()))?;
        let layout = LineLayout::from_font(&font, size);
        log::debug!(
            "[cheevo_host] font {} at {size}px: line height {}, ascent {}, descent {}",
            path.display(),
            layout.line_height,
            layout.ascent,
            layout.descent
        );
        Ok(HostFont::Fontdue { font, size, layout })
    }

    pub fn fixed() -> Self {
        HostFont::Fixed(LineLayout::FIXED)
    }

    pub fn layout(&self) -> LineLayout {
        match self {
            HostFont::Fontdue { layout, .. } | HostFont::Fixed(layout) => *layout,
        }
    }
}

impl FontMetrics for HostFont {
    fn line_height(&self) -> u32 {
        self.layout().line_height
    }

    fn ascender(&self) -> i32 {
        self.layout().ascent
    }

    fn descender(&self) -> i32 {
        self.layout().descent
    }

    fn text_width(&self, text: &str) -> u32 {
        match self {
            HostFont::Fontdue { font, size, .. } => text
                .chars()
                .map(|ch| font.metrics(ch, *size).advance_width)
                .sum::<f32>()
                .ceil() as u32,
            HostFont::Fixed(layout) => u32::try_from(text.chars().count())
                .unwrap_or(u32::MAX)
                .saturating_mul(layout.cell_advance),
        }
    }
}
