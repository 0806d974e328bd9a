//! Tension engine implementation.
//!
//! The tension engine is a session-time state machine. It does not use
//! internal threads - the caller advances the clock with `advance_to()` and
//! the engine runs every wakeup that has come due, one at a time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Armed <-> Disarmed
//!           \
//!            -> Dead   (terminal, from any state via force_death)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TensionEngine::new(TensionConfig::default(), sink)?;
//! engine.arm();
//! // In a loop:
//! let events = engine.advance_to(elapsed_ms);
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::config::TensionConfig;
use super::queue::{TimerId, TimerQueue, Wakeup};
use super::sink::TensionSink;
use super::visual::VisualFilter;
use crate::error::{Result, SinkError};
use crate::events::{DeathCause, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensionState {
    Idle,
    Armed,
    Disarmed,
    Dead,
}

/// Point-in-time view of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TensionSnapshot {
    pub state: TensionState,
    pub degradation_level: u32,
    pub max_degradation: u32,
    pub intensity: f64,
    pub loop_generation: u64,
    pub now_ms: u64,
    /// Armed time left before death.
    pub remaining_ms: u64,
    pub filter: String,
}

/// Degradation counter, ambience loop and death transition.
///
/// Intensity is derived from the level alone, so the deadline is exactly
/// `max_degradation * tick_period_ms` of armed time whatever the player does.
#[derive(Debug)]
pub struct TensionEngine<S> {
    config: TensionConfig,
    sink: S,
    queue: TimerQueue,
    now_ms: u64,
    state: TensionState,
    degradation_level: u32,
    loop_generation: u64,
    tick_handle: Option<TimerId>,
}

impl<S: TensionSink> TensionEngine<S> {
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate.
    pub fn new(config: TensionConfig, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config, sink))
    }

    /// Engine with the reference timings (600 ms tick, 100 steps).
    pub fn with_defaults(sink: S) -> Self {
        Self::build(TensionConfig::default(), sink)
    }

    fn build(config: TensionConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            queue: TimerQueue::new(),
            now_ms: 0,
            state: TensionState::Idle,
            degradation_level: 0,
            loop_generation: 0,
            tick_handle: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &TensionConfig {
        &self.config
    }

    pub fn degradation_level(&self) -> u32 {
        self.degradation_level
    }

    /// `degradation_level / max_degradation`, in `[0.0, 1.0]`.
    pub fn intensity(&self) -> f64 {
        f64::from(self.degradation_level) / f64::from(self.config.max_degradation)
    }

    pub fn visual_filter(&self) -> VisualFilter {
        VisualFilter::from_intensity(self.intensity())
    }

    pub fn is_armed(&self) -> bool {
        self.state == TensionState::Armed
    }

    pub fn is_dead(&self) -> bool {
        self.state == TensionState::Dead
    }

    pub fn state(&self) -> TensionState {
        self.state
    }

    pub fn loop_generation(&self) -> u64 {
        self.loop_generation
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn deadline_ms(&self) -> u64 {
        self.config.deadline_ms()
    }

    /// Armed time left before the counter runs out.
    pub fn remaining_ms(&self) -> u64 {
        u64::from(self.config.max_degradation - self.degradation_level)
            .saturating_mul(self.config.tick_period_ms)
    }

    /// Earliest pending wakeup, stale ones included.
    pub fn next_deadline(&self) -> Option<u64> {
        self.queue.next_deadline()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn snapshot(&self) -> TensionSnapshot {
        TensionSnapshot {
            state: self.state(),
            degradation_level: self.degradation_level,
            max_degradation: self.config.max_degradation,
            intensity: self.intensity(),
            loop_generation: self.loop_generation,
            now_ms: self.now_ms,
            remaining_ms: self.remaining_ms(),
            filter: self.visual_filter().css(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start ticking and start the ambience loop. No-op when armed or dead.
    ///
    /// Re-arming after `disarm()` keeps the current level.
    pub fn arm(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if matches!(self.state, TensionState::Armed | TensionState::Dead) {
            return events;
        }
        self.state = TensionState::Armed;
        let first_tick = self.now_ms.saturating_add(self.config.tick_period_ms);
        self.tick_handle = Some(self.queue.schedule_at(first_tick, Wakeup::Tick));
        info!(
            level = self.degradation_level,
            at_ms = self.now_ms,
            deadline_ms = self.now_ms.saturating_add(self.remaining_ms()),
            "tension armed"
        );
        events.push(Event::Armed {
            level: self.degradation_level,
            at_ms: self.now_ms,
        });
        self.start_ambience_iteration(&mut events);
        events
    }

    /// One degradation step. No-op unless armed and alive.
    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.state != TensionState::Armed {
            return events;
        }
        self.degradation_level = (self.degradation_level + 1).min(self.config.max_degradation);
        let intensity = self.intensity();

        self.sink.apply_visual_intensity(intensity);
        if let Err(e) = self.sink.set_ambience_gain(intensity) {
            events.push(self.sink_failed("set_ambience_gain", e));
        }
        debug!(level = self.degradation_level, intensity, "degradation advanced");
        events.push(Event::Degraded {
            level: self.degradation_level,
            intensity,
            at_ms: self.now_ms,
        });

        if self.degradation_level == self.config.max_degradation {
            events.extend(self.die(DeathCause::Exhausted));
        }
        events
    }

    /// Stop ticking and silence the ambience loop. Idempotent.
    pub fn disarm(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.state != TensionState::Armed {
            return events;
        }
        self.state = TensionState::Disarmed;
        self.cancel_tick();
        self.loop_generation += 1;
        if let Err(e) = self.sink.stop_ambience_loop() {
            events.push(self.sink_failed("stop_ambience_loop", e));
        }
        info!(level = self.degradation_level, at_ms = self.now_ms, "tension disarmed");
        events.push(Event::Disarmed {
            level: self.degradation_level,
            at_ms: self.now_ms,
        });
        events
    }

    /// Kill the player now, whatever the counter says.
    pub fn force_death(&mut self) -> Vec<Event> {
        self.die(DeathCause::Forced)
    }

    /// Run every wakeup due at or before `now_ms`, in order.
    ///
    /// Time never goes backwards; an earlier `now_ms` only drains wakeups
    /// that are already due.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        while let Some((at_ms, wakeup)) = self.queue.pop_due(now_ms) {
            self.now_ms = self.now_ms.max(at_ms);
            match wakeup {
                Wakeup::Tick => {
                    self.tick_handle = None;
                    if self.state == TensionState::Armed {
                        // Next tick is fixed to the previous deadline so drift
                        // cannot accumulate.
                        let next = at_ms.saturating_add(self.config.tick_period_ms);
                        self.tick_handle = Some(self.queue.schedule_at(next, Wakeup::Tick));
                        events.extend(self.tick());
                    }
                }
                Wakeup::AmbienceLoop { generation } => {
                    if generation == self.loop_generation && self.state == TensionState::Armed {
                        self.start_ambience_iteration(&mut events);
                    } else {
                        debug!(generation, current = self.loop_generation, "stale ambience continuation");
                    }
                }
            }
        }
        self.now_ms = self.now_ms.max(now_ms);
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Terminal transition. The ambience cue is left to the death sink
    /// rather than stopped here; bumping the generation ends the loop.
    fn die(&mut self, cause: DeathCause) -> Vec<Event> {
        if self.state == TensionState::Dead {
            return Vec::new();
        }
        self.state = TensionState::Dead;
        self.cancel_tick();
        self.loop_generation += 1;
        info!(?cause, level = self.degradation_level, at_ms = self.now_ms, "player died");
        self.sink.on_death(cause);
        vec![Event::Died {
            cause,
            level: self.degradation_level,
            at_ms: self.now_ms,
        }]
    }

    fn cancel_tick(&mut self) {
        if let Some(id) = self.tick_handle.take() {
            self.queue.cancel(id);
        }
    }

    fn start_ambience_iteration(&mut self, events: &mut Vec<Event>) {
        let gain = self.intensity();
        if let Err(e) = self.sink.play_ambience_loop(gain) {
            events.push(self.sink_failed("play_ambience_loop", e));
        }
        let generation = self.loop_generation;
        let next = self.now_ms.saturating_add(self.config.ambience_interval_ms());
        self.queue.schedule_at(next, Wakeup::AmbienceLoop { generation });
        events.push(Event::AmbienceLooped {
            generation,
            gain,
            at_ms: self.now_ms,
        });
    }

    fn sink_failed(&self, operation: &str, err: SinkError) -> Event {
        warn!(operation, error = %err, "sink failed; tension continues");
        Event::SinkFailed {
            operation: operation.into(),
            message: err.to_string(),
            at_ms: self.now_ms,
        }
    }
}
