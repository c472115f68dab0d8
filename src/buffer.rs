// Single-action buffering state machine
//
// Two countdown-style trackers compose into one fire decision: an activation
// is "live" while its timer is within the pre-window, permission is "live"
// while its timer is within the post-window, and a step fires iff both are
// live after that step's edges are applied. The same predicate covers a
// buffered press waiting for permission and a late press after permission
// lapsed (coyote time).

use super::config::BufferConfig;
use super::outcome::BufferOutcome;

/// Sentinel for a timer with no unconsumed edge
const EXPIRED: f32 = f32::INFINITY;

/// Buffers one action's activation and permission edges across short timing gaps
///
/// Ensures an input arriving slightly too early, or a permitting condition
/// ending slightly too soon, still produces the intended action. Drive it
/// with exactly one `update` per simulation step, then read `should_fire`.
///
/// All time is caller-supplied, so a buffer is deterministic and replayable
/// from a recorded sequence of `(activation, permission, elapsed)` triples.
#[derive(Debug, Clone)]
pub struct ActionBuffer {
    /// Window configuration
    config: BufferConfig,

    /// Seconds since the most recent activation edge (EXPIRED when none pending)
    time_since_activation: f32,

    /// Seconds since permission was last observed true (EXPIRED when lapsed)
    time_since_permission: f32,

    /// Deferred flush scheduled by a fire under the autoflush policy
    pending_autoflush: bool,

    /// Outcome of the most recent update
    outcome: BufferOutcome,
}

impl ActionBuffer {
    /// Create a new action buffer
    pub fn new(pre_window: f32, post_window: f32, autoflush_on_success: bool) -> Self {
        Self::from_config(BufferConfig::new(pre_window, post_window, autoflush_on_success))
    }

    /// Create a new action buffer from a configuration
    pub fn from_config(config: BufferConfig) -> Self {
        Self {
            config,
            time_since_activation: EXPIRED,
            time_since_permission: EXPIRED,
            pending_autoflush: false,
            outcome: BufferOutcome::NoFire,
        }
    }

    /// Advance the buffer by one simulation step
    ///
    /// `activation` is the step's "input just occurred" edge, `permission` is
    /// the step's "action is allowed" condition, `elapsed` is the step
    /// duration in seconds (trusted to be non-negative).
    ///
    /// Order of effects: a flush deferred from the previous step's fire is
    /// applied first, then both edges, then the fire decision is recomputed.
    pub fn update(&mut self, activation: bool, permission: bool, elapsed: f32) {
        if self.pending_autoflush {
            self.time_since_activation = EXPIRED;
            self.time_since_permission = EXPIRED;
            self.pending_autoflush = false;
        }

        self.time_since_activation = Self::advance(
            self.time_since_activation,
            activation,
            elapsed,
            self.config.pre_window,
        );
        self.time_since_permission = Self::advance(
            self.time_since_permission,
            permission,
            elapsed,
            self.config.post_window,
        );

        let fire = self.activation_live() && self.permission_live();
        self.outcome = if fire {
            BufferOutcome::Fire
        } else {
            BufferOutcome::NoFire
        };

        if fire && self.config.autoflush_on_success {
            self.pending_autoflush = true;
        }
    }

    /// Step a single tracker: reset on a fresh edge, otherwise age it,
    /// saturating to expired once it leaves its window
    fn advance(timer: f32, edge: bool, elapsed: f32, window: f32) -> f32 {
        if edge {
            0.0
        } else if timer.is_finite() && timer + elapsed <= window {
            timer + elapsed
        } else {
            EXPIRED
        }
    }

    /// Check if the action should run this step
    pub fn should_fire(&self) -> bool {
        self.outcome.is_fire()
    }

    /// Get the outcome of the most recent update
    pub fn outcome(&self) -> BufferOutcome {
        self.outcome
    }

    /// Check if a fire in the current step scheduled an automatic flush
    ///
    /// Lets a caller distinguish a one-shot success (the buffer clears itself
    /// next step) from a success that persists until an explicit `flush`.
    pub fn will_autoflush_next_step(&self) -> bool {
        self.pending_autoflush
    }

    /// Discard any buffered activation and permission immediately
    ///
    /// Both timers read as fully elapsed afterwards and the outcome is reset.
    /// Flushing an already-empty buffer is a no-op.
    pub fn flush(&mut self) {
        self.time_since_activation = EXPIRED;
        self.time_since_permission = EXPIRED;
        self.pending_autoflush = false;
        self.outcome = BufferOutcome::NoFire;
    }

    /// Time left in the pre-window before the buffered activation lapses
    pub fn activation_time_remaining(&self) -> f32 {
        Self::remaining(self.time_since_activation, self.config.pre_window)
    }

    /// Time since the most recent activation edge, capped at the pre-window
    pub fn activation_time_passed(&self) -> f32 {
        Self::passed(self.time_since_activation, self.config.pre_window)
    }

    /// Time left in the post-window before the buffered permission lapses
    pub fn permission_time_remaining(&self) -> f32 {
        Self::remaining(self.time_since_permission, self.config.post_window)
    }

    /// Time since permission was last observed, capped at the post-window
    pub fn permission_time_passed(&self) -> f32 {
        Self::passed(self.time_since_permission, self.config.post_window)
    }

    /// Get the pre-window duration
    pub fn pre_window(&self) -> f32 {
        self.config.pre_window
    }

    /// Get the post-window duration
    pub fn post_window(&self) -> f32 {
        self.config.post_window
    }

    /// Check if a fire schedules an automatic flush
    pub fn autoflush_on_success(&self) -> bool {
        self.config.autoflush_on_success
    }

    /// Get the full configuration
    pub fn config(&self) -> BufferConfig {
        self.config
    }

    /// Set the pre-window duration (effective from the next update)
    pub fn set_pre_window(&mut self, pre_window: f32) {
        self.config.pre_window = pre_window;
    }

    /// Set the post-window duration (effective from the next update)
    pub fn set_post_window(&mut self, post_window: f32) {
        self.config.post_window = post_window;
    }

    /// Set the autoflush policy (effective from the next update)
    pub fn set_autoflush_on_success(&mut self, autoflush_on_success: bool) {
        self.config.autoflush_on_success = autoflush_on_success;
    }

    /// Replace the full configuration (effective from the next update)
    pub fn set_config(&mut self, config: BufferConfig) {
        self.config = config;
    }

    fn activation_live(&self) -> bool {
        self.time_since_activation <= self.config.pre_window
    }

    fn permission_live(&self) -> bool {
        self.time_since_permission <= self.config.post_window
    }

    fn remaining(timer: f32, window: f32) -> f32 {
        if timer.is_finite() {
            (window - timer).max(0.0)
        } else {
            0.0
        }
    }

    fn passed(timer: f32, window: f32) -> f32 {
        if timer.is_finite() {
            timer
        } else {
            window
        }
    }
}

impl Default for ActionBuffer {
    fn default() -> Self {
        Self::from_config(BufferConfig::default())
    }
}
