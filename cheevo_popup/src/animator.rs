//! Popup animation state machine.
//!
//! The animator never waits on anything itself. Each transition hands back the
//! tweens and timers the host should run; the host reports their completion
//! through [`AnimationEvent::Complete`] and the next transition fires.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Display phases of the popup at the front of the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    SlidingIn,
    Unfolding,
    Holding,
    Folding,
    SlidingOut,
}

impl Phase {
    /// Phase entered once `self` has run to completion.
    ///
    /// `SlidingOut` falls back to `Idle`; the widget immediately restarts the
    /// cycle when another record is waiting.
    pub fn advance(self) -> Phase {
        match self {
            Phase::Idle => Phase::Idle,
            Phase::SlidingIn => Phase::Unfolding,
            Phase::Unfolding => Phase::Holding,
            Phase::Holding => Phase::Folding,
            Phase::Folding => Phase::SlidingOut,
            Phase::SlidingOut => Phase::Idle,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    #[default]
    OutQuad,
}

impl Easing {
    /// Maps normalised progress `t` in `[0, 1]` onto the easing curve.
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// Animated popup property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subject {
    OffsetY,
    Unfold,
}

/// Token the host hands back when a tween or timer finishes. `sequence`
/// identifies the popup display that armed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Completion {
    pub phase: Phase,
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub subject: Subject,
    pub from: f32,
    pub to: f32,
    pub duration: Duration,
    pub easing: Easing,
    pub sequence: u64,
    pub on_complete: Option<Completion>,
}

impl Tween {
    pub fn value_at(&self, elapsed: Duration) -> f32 {
        let progress = if self.duration.is_zero() {
            1.0
        } else {
            (elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
        };
        self.from + (self.to - self.from) * self.easing.apply(progress)
    }

    pub fn is_finished(&self, elapsed: Duration) -> bool {
        elapsed >= self.duration
    }
}

/// Messages the host animation engine feeds back into the widget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnimationEvent {
    Apply {
        subject: Subject,
        value: f32,
        sequence: u64,
    },
    Complete(Completion),
}

/// Animated extents of the popup currently on screen.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimationState {
    pub unfold: f32,
    pub y: f32,
    pub width: u32,
    pub height: u32,
}

impl AnimationState {
    fn value(&self, subject: Subject) -> f32 {
        match subject {
            Subject::OffsetY => self.y,
            Subject::Unfold => self.unfold,
        }
    }

    fn set(&mut self, subject: Subject, value: f32) {
        match subject {
            Subject::OffsetY => self.y = value,
            Subject::Unfold => self.unfold = value.clamp(0.0, 1.0),
        }
    }

    fn hidden_offset(&self) -> f32 {
        -(self.height as f32)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub animation: Duration,
    pub display: Duration,
    pub easing: Easing,
}

impl Timing {
    /// Time from the end of the slide-in to the start of the fold.
    pub fn hold(&self) -> Duration {
        self.animation + self.display
    }
}

/// Work the host has to schedule after a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostRequest {
    Tween(Tween),
    Timer {
        duration: Duration,
        on_complete: Completion,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    /// The completion belongs to an older display or an already-left phase.
    Stale,
    Continue(Vec<HostRequest>),
    /// Slide-out finished; the front record can be released.
    Finished,
}

#[derive(Debug, Clone)]
pub struct Animator {
    phase: Phase,
    sequence: u64,
    state: AnimationState,
    timing: Timing,
}

impl Animator {
    pub fn new(timing: Timing) -> Self {
        Self {
            phase: Phase::Idle,
            sequence: 0,
            state: AnimationState::default(),
            timing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Begins a new display with the given extents and returns the slide-in
    /// tween.
    pub fn start(&mut self, width: u32, height: u32) -> Tween {
        self.sequence = self.sequence.wrapping_add(1);
        self.state = AnimationState {
            unfold: 0.0,
            y: -(height as f32),
            width,
            height,
        };
        self.phase = Phase::SlidingIn;
        self.tween(Subject::OffsetY, 0.0)
    }

    pub fn complete(&mut self, done: Completion) -> Transition {
        if done.sequence != self.sequence || !self.accepts(done.phase) {
            return Transition::Stale;
        }

        let next = done.phase.advance();
        log::debug!(
            "[cheevo_popup] popup #{} {:?} -> {:?}",
            self.sequence,
            self.phase,
            next
        );
        self.phase = next;

        match next {
            Phase::Unfolding => Transition::Continue(vec![
                HostRequest::Tween(self.tween(Subject::Unfold, 1.0)),
                HostRequest::Timer {
                    duration: self.timing.hold(),
                    on_complete: Completion {
                        phase: Phase::Holding,
                        sequence: self.sequence,
                    },
                },
            ]),
            Phase::Folding => {
                Transition::Continue(vec![HostRequest::Tween(self.tween(Subject::Unfold, 0.0))])
            }
            Phase::SlidingOut => {
                let hidden = self.state.hidden_offset();
                Transition::Continue(vec![HostRequest::Tween(
                    self.tween(Subject::OffsetY, hidden),
                )])
            }
            Phase::SlidingIn | Phase::Holding => Transition::Continue(Vec::new()),
            Phase::Idle => Transition::Finished,
        }
    }

    /// Applies an interpolated value; returns false when it belongs to an
    /// older display.
    pub fn apply(&mut self, subject: Subject, value: f32, sequence: u64) -> bool {
        if sequence != self.sequence || self.is_idle() {
            return false;
        }
        self.state.set(subject, value);
        true
    }

    /// Drops to idle and invalidates every tween or timer still in flight.
    pub fn stop(&mut self) {
        self.phase = Phase::Idle;
        self.sequence = self.sequence.wrapping_add(1);
    }

    fn accepts(&self, finished: Phase) -> bool {
        // The hold timer outlives the unfold tween, but a host may deliver it
        // first; treat the unfold as done in that case.
        self.phase == finished || (self.phase == Phase::Unfolding && finished == Phase::Holding)
    }

    fn tween(&self, subject: Subject, to: f32) -> Tween {
        Tween {
            subject,
            from: self.state.value(subject),
            to,
            duration: self.timing.animation,
            easing: self.timing.easing,
            sequence: self.sequence,
            on_complete: Some(Completion {
                phase: self.phase,
                sequence: self.sequence,
            }),
        }
    }
}
