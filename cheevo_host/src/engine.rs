use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cheevo_popup::{AnimationDriver, AnimationEvent, Completion, Tween};

#[derive(Debug, Clone, Copy)]
struct ActiveTween {
    tween: Tween,
    started: Duration,
}

#[derive(Debug, Clone, Copy)]
struct ActiveTimer {
    deadline: Duration,
    on_complete: Completion,
}

#[derive(Debug, Default)]
struct EngineState {
    now: Duration,
    tweens: Vec<ActiveTween>,
    timers: Vec<ActiveTimer>,
}

/// Fixed-step tween and timer engine.
///
/// Requests arrive through [`AnimationDriver`]; [`TweenEngine::advance`]
/// moves the clock and hands back the resulting events. Events are returned
/// rather than delivered so the caller can dispatch them to the widget
/// without this engine's lock held, since the widget pushes new tweens while
/// handling a completion.
#[derive(Debug, Default)]
pub struct TweenEngine {
    state: Mutex<EngineState>,
}

impl TweenEngine {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, EngineState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn now(&self) -> Duration {
        self.lock().now
    }

    pub fn active(&self) -> usize {
        let state = self.lock();
        state.tweens.len() + state.timers.len()
    }

    /// Advances the clock by `step`. Every running tween reports its current
    /// value; finished tweens report their end value and then their
    /// completion, followed by any timers that fell due.
    pub fn advance(&self, step: Duration) -> Vec<AnimationEvent> {
        let mut state = self.lock();
        state.now += step;
        let now = state.now;
        let mut events = Vec::new();

        state.tweens.retain(|active| {
            let elapsed = now.saturating_sub(active.started);
            let tween = &active.tween;
            events.push(AnimationEvent::Apply {
                subject: tween.subject,
                value: tween.value_at(elapsed),
                sequence: tween.sequence,
            });
            if !tween.is_finished(elapsed) {
                return true;
            }
            if let Some(done) = tween.on_complete {
                events.push(AnimationEvent::Complete(done));
            }
            false
        });

        let mut due: Vec<ActiveTimer> = Vec::new();
        state.timers.retain(|timer| {
            if timer.deadline <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| timer.deadline);
        events.extend(
            due.into_iter()
                .map(|timer| AnimationEvent::Complete(timer.on_complete)),
        );
        events
    }
}

impl AnimationDriver for TweenEngine {
    fn push_tween(&self, tween: Tween) {
        let mut state = self.lock();
        let started = state.now;
        // A subject is driven by one tween at a time; the newest wins.
        state.tweens.retain(|active| active.tween.subject != tween.subject);
        log::trace!(
            "[cheevo_host] tween {:?} {} -> {} over {:?}",
            tween.subject,
            tween.from,
            tween.to,
            tween.duration
        );
        state.tweens.push(ActiveTween { tween, started });
    }

    fn start_timer(&self, duration: Duration, on_complete: Completion) {
        let mut state = self.lock();
        let deadline = state.now + duration;
        state.timers.push(ActiveTimer {
            deadline,
            on_complete,
        });
    }
}
