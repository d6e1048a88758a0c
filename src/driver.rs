// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use crate::canvas::Canvas;

/// Monotonic clock, as time elapsed since some fixed origin.
pub trait TimeSource {
    fn now(&self) -> Duration;
}

#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// One animation frame: play time so far and time since the previous frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub total: Duration,
    pub delta: Duration,
}

/// Free-running frame timer.
///
/// The first tick after `start` has a zero delta. While paused no ticks are
/// produced.
#[derive(Clone, Debug, Default)]
pub struct TimeAnimator {
    start_time: Duration,
    previous_total: Option<Duration>,
    paused_play_time: Duration,
    running: bool,
    paused: bool,
}

impl TimeAnimator {
    pub fn start(&mut self, now: Duration) {
        self.start_time = now;
        self.previous_total = None;
        self.running = true;
        self.paused = false;
    }

    pub fn pause(&mut self, now: Duration) {
        if self.running && !self.paused {
            self.paused_play_time = self.current_play_time(now);
            self.paused = true;
        }
    }

    pub fn cancel(&mut self) {
        self.running = false;
        self.paused = false;
        self.previous_total = None;
    }

    pub fn is_running(&self) -> bool {
        self.running && !self.paused
    }

    pub fn current_play_time(&self, now: Duration) -> Duration {
        if self.paused {
            self.paused_play_time
        } else {
            now.saturating_sub(self.start_time)
        }
    }

    /// Rebase the timeline so that `now` is `play_time` into the animation.
    /// The next tick's delta is measured from `play_time`.
    pub fn set_current_play_time(&mut self, play_time: Duration, now: Duration) {
        self.start_time = now.saturating_sub(play_time);
        self.previous_total = Some(play_time);
        if self.paused {
            self.paused_play_time = play_time;
        }
    }

    pub fn tick(&mut self, now: Duration) -> Option<Tick> {
        if !self.is_running() {
            return None;
        }
        let total = now.saturating_sub(self.start_time);
        let delta = self
            .previous_total
            .map(|p| total.saturating_sub(p))
            .unwrap_or(Duration::ZERO);
        self.previous_total = Some(total);
        Some(Tick { total, delta })
    }
}

/// Something the driver can advance and draw each tick.
pub trait Scene {
    /// False until the scene knows a non-empty surface size.
    fn is_laid_out(&self) -> bool;
    fn update(&mut self, delta: Duration);
    fn draw(&mut self, canvas: &mut dyn Canvas);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Detached,
    Running,
    Paused,
}

/// Lifecycle state machine that feeds clock ticks to a scene.
///
/// `Detached -> Running <-> Paused -> Detached`. Calls made in the wrong
/// state are ignored.
pub struct AnimationDriver<C: TimeSource> {
    clock: C,
    animator: Option<TimeAnimator>,
    state: DriverState,
    current_play_time: Duration,
    dropped_ticks: u64,
}

impl<C: TimeSource> AnimationDriver<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            animator: None,
            state: DriverState::Detached,
            current_play_time: Duration::ZERO,
            dropped_ticks: 0,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Ticks delivered before the scene was laid out.
    pub fn dropped_ticks(&self) -> u64 {
        self.dropped_ticks
    }

    pub fn play_time(&self) -> Duration {
        let now = self.clock.now();
        self.animator
            .as_ref()
            .map(|a| a.current_play_time(now))
            .unwrap_or(Duration::ZERO)
    }

    pub fn attach(&mut self) {
        if self.state != DriverState::Detached {
            return;
        }
        let mut animator = TimeAnimator::default();
        animator.start(self.clock.now());
        self.animator = Some(animator);
        self.current_play_time = Duration::ZERO;
        self.state = DriverState::Running;
    }

    pub fn detach(&mut self) {
        if let Some(mut a) = self.animator.take() {
            a.cancel();
        }
        self.state = DriverState::Detached;
    }

    /// Pause if running. Returns whether anything changed.
    pub fn pause(&mut self) -> bool {
        if self.state != DriverState::Running {
            return false;
        }
        let now = self.clock.now();
        if let Some(a) = self.animator.as_mut() {
            self.current_play_time = a.current_play_time(now);
            a.pause(now);
        }
        self.state = DriverState::Paused;
        true
    }

    /// Resume if paused, picking up at the play time recorded by `pause`.
    /// Returns whether anything changed.
    pub fn resume(&mut self) -> bool {
        if self.state != DriverState::Paused {
            return false;
        }
        let now = self.clock.now();
        if let Some(a) = self.animator.as_mut() {
            a.start(now);
            // Without this the first delta would span the whole pause.
            a.set_current_play_time(self.current_play_time, now);
        }
        self.state = DriverState::Running;
        true
    }

    /// Deliver one frame: update then draw the scene.
    ///
    /// Returns the tick when the scene was advanced. Ticks that arrive
    /// before the scene is laid out are consumed and ignored.
    pub fn on_frame<S: Scene + ?Sized>(
        &mut self,
        scene: &mut S,
        canvas: &mut dyn Canvas,
    ) -> Option<Tick> {
        if self.state != DriverState::Running {
            return None;
        }
        let now = self.clock.now();
        let tick = self.animator.as_mut()?.tick(now)?;
        if !scene.is_laid_out() {
            self.dropped_ticks += 1;
            return None;
        }
        scene.update(tick.delta);
        scene.draw(canvas);
        Some(tick)
    }
}

/// Who asked for the current pause: the user, losing focus, or both.
///
/// Regaining focus only resumes a pause that focus loss caused.
#[derive(Clone, Copy, Debug, Default)]
pub struct PauseControl {
    user_paused: bool,
    focus_paused: bool,
}

impl PauseControl {
    /// Pause key. Returns true when this press paused the driver.
    pub fn toggle<C: TimeSource>(&mut self, driver: &mut AnimationDriver<C>) -> bool {
        if driver.state() == DriverState::Paused {
            self.user_paused = false;
            self.focus_paused = false;
            driver.resume();
            return false;
        }
        if driver.pause() {
            self.user_paused = true;
            return true;
        }
        false
    }

    /// Returns true when losing focus paused the driver.
    pub fn focus_lost<C: TimeSource>(&mut self, driver: &mut AnimationDriver<C>) -> bool {
        if driver.pause() {
            self.focus_paused = true;
            return true;
        }
        false
    }

    pub fn focus_gained<C: TimeSource>(&mut self, driver: &mut AnimationDriver<C>) {
        if !self.focus_paused {
            return;
        }
        self.focus_paused = false;
        if !self.user_paused {
            driver.resume();
        }
    }
}
