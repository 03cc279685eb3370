use std::path::PathBuf;

use clap::Parser;

use crate::locale::Language;

#[derive(Parser, Debug)]
#[command(
    about = "Headless host that replays achievement unlocks through the popup widget",
    version
)]
pub struct Args {
    /// JSON array of unlock events: {"at_ms": 0, "title": "...", "badge": "..."}
    #[arg(long)]
    pub script: PathBuf,

    /// Directory searched recursively for <badge>.png files
    #[arg(long)]
    pub badge_dir: Option<PathBuf>,

    /// TTF/OTF font used for text metrics (fixed-cell metrics when omitted)
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Pixel size used with --font
    #[arg(long, default_value_t = 18.0)]
    pub font_size: f32,

    /// Optional popup config JSON (queue size, durations, margins)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Push unlocks from a producer thread against the mutex-guarded popup
    #[arg(long)]
    pub threaded: bool,

    /// Video width in pixels
    #[arg(long, default_value_t = 1280)]
    pub width: u32,

    /// Video height in pixels
    #[arg(long, default_value_t = 720)]
    pub height: u32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Stop after this many frames even if popups are still showing
    #[arg(long)]
    pub max_frames: Option<u64>,

    /// Language for the popup label
    #[arg(long, value_enum, default_value_t = Language::English)]
    pub language: Language,

    /// Path to write every frame's draw calls as JSON
    #[arg(long)]
    pub frame_log_json: Option<PathBuf>,
}
