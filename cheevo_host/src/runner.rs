use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, ensure};
use cheevo_popup::{
    AchievementPopup, FrameInfo, LocalPopup, PopupConfig, PopupState, PushOutcome, StateLock,
    ThreadedPopup,
};
use serde::Serialize;

use crate::badges::{BadgeCache, BadgeStats};
use crate::cli::Args;
use crate::display::FrameRecord;
use crate::fonts::HostFont;
use crate::host::HeadlessHost;
use crate::script::{self, UnlockEvent};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PushTally {
    pub started: usize,
    pub queued: usize,
    pub dropped: usize,
}

impl PushTally {
    fn record(&mut self, outcome: PushOutcome) {
        match outcome {
            PushOutcome::Started => self.started += 1,
            PushOutcome::Queued { .. } => self.queued += 1,
            PushOutcome::Dropped => self.dropped += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub threaded: bool,
    pub unlocks: usize,
    pub pushes: PushTally,
    pub frames: u64,
    pub simulated_ms: u64,
    pub drawn_frames: usize,
    pub finished_idle: bool,
    pub pending_animations: usize,
    pub unbalanced_blends: usize,
    pub badges: BadgeStats,
}

#[derive(Debug, Serialize)]
struct FrameLog<'a> {
    report: &'a RunReport,
    frames: &'a [FrameRecord],
}

struct Schedule {
    frame: FrameInfo,
    step: Duration,
    frame_limit: u64,
}

pub fn load_config(path: Option<&Path>) -> Result<PopupConfig> {
    let config: PopupConfig = match path {
        Some(path) => {
            let data = fs::read_to_string(path)
                .with_context(|| format!("reading popup config {}", path.display()))?;
            serde_json::from_str(&data)
                .with_context(|| format!("parsing popup config {}", path.display()))?
        }
        None => PopupConfig::default(),
    };
    config.validate().context("validating popup config")?;
    Ok(config)
}

pub fn run(args: &Args) -> Result<RunReport> {
    ensure!(args.fps > 0, "fps must be positive");
    ensure!(
        args.width > 0 && args.height > 0,
        "video size must be non-zero (got {}x{})",
        args.width,
        args.height
    );

    let config = load_config(args.config.as_deref())?;
    let events = script::load_script(&args.script)?;
    let badges = match &args.badge_dir {
        Some(dir) => BadgeCache::from_root(dir)
            .with_context(|| format!("indexing badges under {}", dir.display()))?,
        None => BadgeCache::default(),
    };
    let font = match &args.font {
        Some(path) => HostFont::load(path, args.font_size)?,
        None => HostFont::fixed(),
    };
    let host = HeadlessHost::new(badges, font, args.language);

    let schedule = Schedule {
        frame: FrameInfo::new(args.width, args.height),
        step: Duration::from_secs_f64(1.0 / f64::from(args.fps)),
        frame_limit: args
            .max_frames
            .unwrap_or_else(|| default_frame_limit(&events, &config, args.fps)),
    };

    log::info!(
        "[cheevo_host] replaying {} unlocks ({} mode, up to {} frames)",
        events.len(),
        if args.threaded { "threaded" } else { "local" },
        schedule.frame_limit
    );

    let (frames, pushes, finished_idle) = if args.threaded {
        let popup = ThreadedPopup::new(config);
        popup.init(true, false);
        let (frames, pushes) = run_threaded(&popup, &host, &events, &schedule)?;
        let idle = popup.is_idle();
        popup.free(&host);
        (frames, pushes, idle)
    } else {
        let popup = LocalPopup::new(config);
        popup.init(false, false);
        let (frames, pushes) = run_local(&popup, &host, &events, &schedule);
        let idle = popup.is_idle();
        popup.free(&host);
        (frames, pushes, idle)
    };

    if !finished_idle {
        log::warn!("[cheevo_host] frame limit reached with popups still showing");
    }

    let simulated_ms = host.engine.now().as_millis() as u64;
    let badges = host.badges.stats();
    let unbalanced_blends = host.display.unbalanced_blends();
    let recorded = host.display.into_frames();

    let report = RunReport {
        threaded: args.threaded,
        unlocks: events.len(),
        pushes,
        frames,
        simulated_ms,
        drawn_frames: recorded.len(),
        finished_idle,
        pending_animations: host.engine.active(),
        unbalanced_blends,
        badges,
    };

    if let Some(path) = &args.frame_log_json {
        let log = FrameLog {
            report: &report,
            frames: &recorded,
        };
        let json = serde_json::to_string_pretty(&log).context("serializing frame log")?;
        fs::write(path, json)
            .with_context(|| format!("writing frame log to {}", path.display()))?;
        println!("Saved frame log to {}", path.display());
    }

    Ok(report)
}

fn run_local(
    popup: &LocalPopup,
    host: &HeadlessHost,
    events: &[UnlockEvent],
    schedule: &Schedule,
) -> (u64, PushTally) {
    let mut tally = PushTally::default();
    let mut next = 0;
    let frames = drive(popup, host, schedule, |now| {
        while let Some(event) = events.get(next).filter(|event| event.at() <= now) {
            tally.record(popup.push_achievement(&event.title, event.badge.as_deref(), host));
            next += 1;
        }
        next == events.len()
    });
    (frames, tally)
}

/// Pushes unlocks from a producer thread while this thread renders. The
/// producer follows the simulated clock, and the render loop waits for it to
/// catch up before advancing so runs stay reproducible.
fn run_threaded(
    popup: &ThreadedPopup,
    host: &HeadlessHost,
    events: &[UnlockEvent],
    schedule: &Schedule,
) -> Result<(u64, PushTally)> {
    let clock_ms = AtomicU64::new(0);
    let pushed = AtomicUsize::new(0);
    let stop = AtomicBool::new(false);

    thread::scope(|scope| -> Result<(u64, PushTally)> {
        let producer = scope.spawn(|| {
            let mut tally = PushTally::default();
            for event in events {
                while clock_ms.load(Ordering::Acquire) < event.at_ms {
                    if stop.load(Ordering::Acquire) {
                        return tally;
                    }
                    thread::yield_now();
                }
                tally.record(popup.push_achievement(&event.title, event.badge.as_deref(), host));
                pushed.fetch_add(1, Ordering::Release);
            }
            tally
        });

        let frames = drive(popup, host, schedule, |now| {
            let now_ms = now.as_millis() as u64;
            clock_ms.store(now_ms, Ordering::Release);
            let due = events.partition_point(|event| event.at_ms <= now_ms);
            while pushed.load(Ordering::Acquire) < due && !producer.is_finished() {
                thread::yield_now();
            }
            due == events.len()
        });

        stop.store(true, Ordering::Release);
        let tally = producer
            .join()
            .map_err(|_| anyhow!("unlock producer thread panicked"))?;
        Ok((frames, tally))
    })
}

/// Runs the frame loop until the script is exhausted and the popup is idle,
/// or the frame limit is hit. `pump` is called at the top of every frame with
/// the simulated time and reports whether every unlock has been pushed.
fn drive<L, F>(
    popup: &AchievementPopup<L>,
    host: &HeadlessHost,
    schedule: &Schedule,
    mut pump: F,
) -> u64
where
    L: StateLock<PopupState>,
    F: FnMut(Duration) -> bool,
{
    for frame in 0..schedule.frame_limit {
        let now = host.engine.now();
        let exhausted = pump(now);

        host.display
            .begin_frame(frame, now.as_millis() as u64, popup.snapshot().phase);
        popup.frame(&schedule.frame, host);
        host.display.end_frame();

        if exhausted && popup.is_idle() {
            return frame + 1;
        }

        for event in host.engine.advance(schedule.step) {
            popup.on_animation_event(event, host);
        }
    }
    schedule.frame_limit
}

/// Enough frames for every unlock to run its full sequence back to back
/// after the last one is pushed, plus a second of slack. Saturates for
/// far-future scripts.
fn default_frame_limit(events: &[UnlockEvent], config: &PopupConfig, fps: u32) -> u64 {
    let per_popup = config
        .animation_duration_ms
        .saturating_mul(4)
        .saturating_add(config.display_duration_ms);
    let last = events.last().map_or(0, |event| event.at_ms);
    let total_ms = last
        .saturating_add(per_popup.saturating_mul(events.len() as u64))
        .saturating_add(1000);
    (total_ms / 1000)
        .saturating_mul(u64::from(fps))
        .saturating_add(total_ms % 1000 * u64::from(fps) / 1000)
        .saturating_add(1)
}
