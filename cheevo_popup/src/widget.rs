use std::cell::RefCell;
use std::sync::Mutex;

use crate::animator::{AnimationEvent, HostRequest, Transition};
use crate::config::PopupConfig;
use crate::error::QueueFull;
use crate::host::{AnimationDriver, FontMetrics, FrameInfo, Localizer, MessageId, PopupHost};
use crate::layout;
use crate::queue::PopupRecord;
use crate::state::{PopupSnapshot, PopupState, release_record};
use crate::sync::StateLock;

/// Popup for hosts whose video driver runs on its own thread.
pub type ThreadedPopup = AchievementPopup<Mutex<PopupState>>;

/// Popup for hosts that push unlocks and draw frames from one thread.
pub type LocalPopup = AchievementPopup<RefCell<PopupState>>;

/// Lifecycle hooks the host calls from its widget table.
pub trait GfxWidget<H: ?Sized> {
    fn init(&self, video_is_threaded: bool, fullscreen: bool) -> bool;
    fn free(&self, host: &H);
    fn frame(&self, frame: &FrameInfo, host: &H);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// The queue was empty; the slide-in has been requested.
    Started,
    /// Waiting behind `position` records.
    Queued { position: usize },
    /// Queue full; the unlock was discarded.
    Dropped,
}

pub struct AchievementPopup<L> {
    state: L,
    config: PopupConfig,
}

impl<L> AchievementPopup<L>
where
    L: StateLock<PopupState>,
{
    pub fn new(config: PopupConfig) -> Self {
        let state = PopupState::new(&config);
        Self {
            state: L::wrap(state),
            config,
        }
    }

    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    pub fn snapshot(&self) -> PopupSnapshot {
        self.state.acquire().snapshot()
    }

    pub fn is_idle(&self) -> bool {
        let state = self.state.acquire();
        state.queue().is_empty() && state.animator().is_idle()
    }

    /// Queues an unlock. The badge is resolved before the lock is taken since
    /// the lookup may wait on the video thread, which may itself be waiting
    /// on this lock to draw.
    pub fn push_achievement<H>(&self, title: &str, badge: Option<&str>, host: &H) -> PushOutcome
    where
        H: PopupHost + ?Sized,
    {
        let badge = badge.and_then(|name| host.badge_texture(name));

        let mut state = self.state.acquire();
        match state.queue_mut().push(PopupRecord::new(title, badge)) {
            Ok(0) => {
                start_current(&mut *state, host, self.config.padding_px);
                PushOutcome::Started
            }
            Ok(position) => PushOutcome::Queued { position },
            Err(QueueFull { capacity, rejected }) => {
                log::debug!(
                    "[cheevo_popup] queue full ({capacity}), dropping {:?}",
                    rejected.title
                );
                release_record(rejected, host);
                PushOutcome::Dropped
            }
        }
    }

    /// Entry point for the host animation engine.
    pub fn on_animation_event<H>(&self, event: AnimationEvent, host: &H)
    where
        H: PopupHost + ?Sized,
    {
        let mut state = self.state.acquire();
        match event {
            AnimationEvent::Apply {
                subject,
                value,
                sequence,
            } => {
                state.animator_mut().apply(subject, value, sequence);
            }
            AnimationEvent::Complete(done) => match state.animator_mut().complete(done) {
                Transition::Stale => {
                    log::debug!("[cheevo_popup] ignoring stale completion {done:?}");
                }
                Transition::Continue(requests) => issue(requests, host),
                Transition::Finished => {
                    state.dequeue_current(host);
                    if state.current().is_some() {
                        start_current(&mut *state, host, self.config.padding_px);
                    }
                }
            },
        }
    }

    /// Resets the widget to an empty queue. Always succeeds.
    pub fn init(&self, video_is_threaded: bool, fullscreen: bool) -> bool {
        let mut state = self.state.acquire();
        if !state.queue().is_empty() {
            log::warn!(
                "[cheevo_popup] init with {} popups still queued; their textures are not released",
                state.queue().len()
            );
        }
        *state = PopupState::new(&self.config);
        log::debug!(
            "[cheevo_popup] init (threaded video: {video_is_threaded}, fullscreen: {fullscreen})"
        );
        true
    }

    /// Releases every queued popup without running the remaining phases.
    pub fn free<H>(&self, host: &H)
    where
        H: PopupHost + ?Sized,
    {
        let released = self.state.acquire().release_all(host);
        if released > 0 {
            log::debug!("[cheevo_popup] free released {released} pending popups");
        }
    }

    pub fn frame<H>(&self, frame: &FrameInfo, host: &H)
    where
        H: PopupHost + ?Sized,
    {
        let state = self.state.acquire();
        if let Some(list) =
            layout::build_draw_list(&*state, frame, host, self.config.margin_fraction)
        {
            list.issue(host);
        }
    }
}

impl<L, H> GfxWidget<H> for AchievementPopup<L>
where
    L: StateLock<PopupState>,
    H: PopupHost + ?Sized,
{
    fn init(&self, video_is_threaded: bool, fullscreen: bool) -> bool {
        AchievementPopup::init(self, video_is_threaded, fullscreen)
    }

    fn free(&self, host: &H) {
        AchievementPopup::free(self, host);
    }

    fn frame(&self, frame: &FrameInfo, host: &H) {
        AchievementPopup::frame(self, frame, host);
    }
}

/// Sizes the popup for the front record and requests its slide-in.
fn start_current<H>(state: &mut PopupState, host: &H, padding: u32)
where
    H: AnimationDriver + FontMetrics + Localizer + ?Sized,
{
    let Some(record) = state.current() else {
        return;
    };
    let label = host.localize(MessageId::AchievementUnlocked);
    let (width, height) = layout::measure(host, &label, &record.title, padding);
    log::info!(
        "[cheevo_popup] showing {:?} ({width}x{height})",
        record.title
    );
    let tween = state.animator_mut().start(width, height);
    host.push_tween(tween);
}

fn issue<H>(requests: Vec<HostRequest>, host: &H)
where
    H: AnimationDriver + ?Sized,
{
    for request in requests {
        match request {
            HostRequest::Tween(tween) => host.push_tween(tween),
            HostRequest::Timer {
                duration,
                on_complete,
            } => host.start_timer(duration, on_complete),
        }
    }
}
