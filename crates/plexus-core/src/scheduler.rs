//! Frame gating for one scene.
//!
//! The host's frame callback fires on its own cadence (requestAnimationFrame,
//! a winit redraw); the scheduler decides per callback whether the frame body
//! runs and with which delta. It never replays missed steps: after any gap the
//! next frame advances by a single delta clamped to [`MAX_STEP_SEC`].

use crate::constants::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Suspended,
    Disposed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceTier {
    /// Narrow or struggling devices, ~30 fps.
    Low,
    /// ~60 fps.
    High,
}

impl DeviceTier {
    pub fn for_width(css_width: f32) -> Self {
        if css_width < NARROW_VIEWPORT_CSS_PX {
            DeviceTier::Low
        } else {
            DeviceTier::High
        }
    }

    pub fn interval_ms(self) -> f64 {
        match self {
            DeviceTier::Low => LOW_TIER_INTERVAL_MS,
            DeviceTier::High => HIGH_TIER_INTERVAL_MS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameDecision {
    /// Callback fired but there is nothing to do this time.
    Skip,
    /// Run the frame body advancing the simulation by `dt` seconds.
    Run { dt: f32 },
    /// Scene is gone; stop requesting frames.
    Halt,
}

pub struct FrameScheduler {
    state: SchedulerState,
    tier: DeviceTier,
    degraded: bool,
    last_frame_ms: Option<f64>,
    cost_ema_ms: f64,
    over_budget_streak: u32,
}

impl FrameScheduler {
    pub fn new(tier: DeviceTier) -> Self {
        Self {
            state: SchedulerState::Idle,
            tier,
            degraded: false,
            last_frame_ms: None,
            cost_ema_ms: 0.0,
            over_budget_streak: 0,
        }
    }

    /// Idle -> Running once the host surface is ready. False in any other state.
    pub fn attach(&mut self) -> bool {
        if self.state != SchedulerState::Idle {
            return false;
        }
        self.state = SchedulerState::Running;
        self.last_frame_ms = None;
        log::debug!("scheduler running at {:?} tier", self.tier);
        true
    }

    pub fn set_visible(&mut self, visible: bool) {
        match (self.state, visible) {
            (SchedulerState::Running, false) => {
                self.state = SchedulerState::Suspended;
                log::debug!("scheduler suspended");
            }
            (SchedulerState::Suspended, true) => {
                self.state = SchedulerState::Running;
                // fresh baseline: the first frame back renders without advancing
                self.last_frame_ms = None;
                log::debug!("scheduler resumed");
            }
            _ => {}
        }
    }

    /// Irreversible.
    pub fn dispose(&mut self) {
        self.state = SchedulerState::Disposed;
    }

    pub fn tick(&mut self, now_ms: f64) -> FrameDecision {
        match self.state {
            SchedulerState::Disposed => return FrameDecision::Halt,
            SchedulerState::Idle | SchedulerState::Suspended => return FrameDecision::Skip,
            SchedulerState::Running => {}
        }
        if !now_ms.is_finite() {
            return FrameDecision::Skip;
        }
        let Some(last) = self.last_frame_ms else {
            self.last_frame_ms = Some(now_ms);
            return FrameDecision::Run { dt: 0.0 };
        };
        let elapsed = now_ms - last;
        if elapsed < 0.0 {
            // clock went backwards; rebase without advancing
            self.last_frame_ms = Some(now_ms);
            return FrameDecision::Skip;
        }
        if elapsed + FRAME_SLACK_MS < self.interval_ms() {
            return FrameDecision::Skip;
        }
        self.last_frame_ms = Some(now_ms);
        let dt = ((elapsed / 1000.0) as f32).min(MAX_STEP_SEC);
        FrameDecision::Run { dt }
    }

    /// Feed the wall-clock cost of a frame body; sustained overruns on the
    /// high tier demote the scene to the low tier for the rest of its life.
    pub fn record_cost(&mut self, cost_ms: f64) {
        if self.state == SchedulerState::Disposed || !cost_ms.is_finite() {
            return;
        }
        self.cost_ema_ms = COST_EMA_ALPHA * cost_ms + (1.0 - COST_EMA_ALPHA) * self.cost_ema_ms;
        if self.tier != DeviceTier::High {
            self.over_budget_streak = 0;
            return;
        }
        if self.cost_ema_ms > self.interval_ms() * COST_BUDGET_FRACTION {
            self.over_budget_streak += 1;
            if self.over_budget_streak >= DEGRADE_STREAK_FRAMES {
                self.tier = DeviceTier::Low;
                self.degraded = true;
                self.over_budget_streak = 0;
                log::info!(
                    "frame cost {:.1}ms over budget, dropping to low tier",
                    self.cost_ema_ms
                );
            }
        } else {
            self.over_budget_streak = 0;
        }
    }

    /// Re-evaluate the width-based tier; a cost demotion is never undone.
    pub fn set_viewport_width(&mut self, css_width: f32) {
        if self.state == SchedulerState::Disposed {
            return;
        }
        let tier = if self.degraded {
            DeviceTier::Low
        } else {
            DeviceTier::for_width(css_width)
        };
        if tier != self.tier {
            log::debug!("device tier {:?} -> {:?}", self.tier, tier);
            self.tier = tier;
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn tier(&self) -> DeviceTier {
        self.tier
    }

    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    pub fn interval_ms(&self) -> f64 {
        self.tier.interval_ms()
    }

    pub fn cost_ema_ms(&self) -> f64 {
        self.cost_ema_ms
    }
}
