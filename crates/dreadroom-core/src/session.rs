//! One play-through of the room.
//!
//! A `Session` owns the tension engine and every puzzle. Any accepted player
//! action other than a manual disarm counts as the first interaction and
//! arms the engine; entering the exit code disarms it. All times are session milliseconds supplied by the
//! caller.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::countdown::Countdown;
use crate::dialogue::{DialogueOutcome, DialogueSequencer, Typewriter};
use crate::error::Result;
use crate::events::Event;
use crate::puzzle::{CodeLock, Keypad, KeypadOutcome};
use crate::storage::Config;
use crate::tension::{TensionEngine, TensionSink, TensionSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Nothing has happened yet.
    Waiting,
    Playing,
    Dead,
    Escaped,
}

/// A player action, for drivers that queue input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Interact,
    Dialogue,
    TurnLock { wheel: usize },
    PressKey { key: char },
    /// Re-arm the engine after a manual disarm.
    Arm,
    /// Pause the tension engine without escaping.
    Disarm,
    ForceDeath,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub outcome: Outcome,
    pub tension: TensionSnapshot,
    pub countdown: String,
    pub countdown_remaining_ms: u64,
    pub dialogue: Option<String>,
    pub dialogue_lines_left: usize,
    pub lock_wheels: Vec<u8>,
    pub lock_solved: bool,
    pub keypad: String,
}

#[derive(Debug)]
pub struct Session<S> {
    engine: TensionEngine<S>,
    dialogue: DialogueSequencer,
    typewriter: Option<Typewriter>,
    char_interval_ms: u64,
    close_delay_ms: u64,
    lock: CodeLock,
    keypad: Keypad,
    countdown: Countdown,
    started: bool,
    escaped: bool,
}

impl<S: TensionSink> Session<S> {
    /// # Errors
    ///
    /// Returns an error if the configuration does not validate.
    pub fn new(config: &Config, sink: S) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            engine: TensionEngine::new(config.tension.clone(), sink)?,
            dialogue: DialogueSequencer::new(config.dialogue.lines.clone()),
            typewriter: None,
            char_interval_ms: config.dialogue.char_interval_ms,
            close_delay_ms: config.dialogue.close_delay_ms,
            lock: CodeLock::new(config.puzzles.lock_combination.clone())?,
            keypad: Keypad::new(config.puzzles.keypad_code.clone())?,
            countdown: Countdown::new(config.countdown.duration_ms),
            started: false,
            escaped: false,
        })
    }

    pub fn engine(&self) -> &TensionEngine<S> {
        &self.engine
    }

    pub fn now_ms(&self) -> u64 {
        self.engine.now_ms()
    }

    pub fn outcome(&self) -> Outcome {
        if self.escaped {
            Outcome::Escaped
        } else if self.engine.is_dead() {
            Outcome::Dead
        } else if self.started {
            Outcome::Playing
        } else {
            Outcome::Waiting
        }
    }

    pub fn is_over(&self) -> bool {
        matches!(self.outcome(), Outcome::Dead | Outcome::Escaped)
    }

    /// Earliest moment something will happen without player input.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.engine.next_deadline(), self.pending_close()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let now = self.now_ms();
        SessionSnapshot {
            outcome: self.outcome(),
            tension: self.engine.snapshot(),
            countdown: self.countdown.display(now),
            countdown_remaining_ms: self.countdown.remaining_ms(now),
            dialogue: self.typewriter.as_ref().map(|t| t.visible(now).to_string()),
            dialogue_lines_left: self.dialogue.remaining(),
            lock_wheels: self.lock.wheels().to_vec(),
            lock_solved: self.lock.is_solved(),
            keypad: self.keypad.display(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Run everything due up to `now_ms`, in time order.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            let close = self.pending_close().filter(|c| *c <= now_ms);
            let wakeup = self.engine.next_deadline().filter(|t| *t <= now_ms);
            match (close, wakeup) {
                (Some(c), t) if t.map_or(true, |t| c <= t) => {
                    events.extend(self.engine.advance_to(c));
                    if self.pending_close() == Some(c) {
                        self.typewriter = None;
                        events.push(Event::DialogueClosed { at_ms: c });
                    }
                }
                (_, Some(t)) => events.extend(self.engine.advance_to(t)),
                _ => break,
            }
        }
        events.extend(self.engine.advance_to(now_ms));
        events
    }

    /// A click anywhere. The first one arms the engine.
    pub fn interact(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        self.begin(&mut events);
        events
    }

    pub fn request_dialogue(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.interact(now_ms);
        if self.escaped {
            return events;
        }
        match self.dialogue.request(&mut self.engine) {
            DialogueOutcome::Line { index, text } => {
                self.typewriter = Some(Typewriter::start(
                    text.clone(),
                    self.char_interval_ms,
                    self.close_delay_ms,
                    self.now_ms(),
                ));
                events.push(Event::DialogueShown {
                    index,
                    text,
                    at_ms: self.now_ms(),
                });
            }
            DialogueOutcome::Death { events: death } => events.extend(death),
        }
        events
    }

    /// # Errors
    ///
    /// Returns a validation error for a wheel the lock does not have. A
    /// rejected turn changes nothing, not even the first-interaction state.
    pub fn turn_lock(&mut self, wheel: usize, now_ms: u64) -> Result<Vec<Event>> {
        self.lock.check_wheel(wheel)?;
        let mut events = self.interact(now_ms);
        if self.is_over() {
            return Ok(events);
        }
        let turn = self.lock.turn(wheel)?;
        let at_ms = self.now_ms();
        events.push(Event::LockWheelTurned {
            wheel: turn.wheel,
            digit: turn.digit,
            at_ms,
        });
        if turn.just_solved {
            info!(at_ms, "lock box opened");
            events.push(Event::LockSolved { at_ms });
        }
        Ok(events)
    }

    /// # Errors
    ///
    /// Returns a validation error for a key the keypad does not have. A
    /// rejected key changes nothing.
    pub fn press_key(&mut self, key: char, now_ms: u64) -> Result<Vec<Event>> {
        Keypad::check_key(key)?;
        let mut events = self.interact(now_ms);
        if self.is_over() {
            return Ok(events);
        }
        let at_ms = self.now_ms();
        match self.keypad.press(key)? {
            KeypadOutcome::Changed(display) => events.push(Event::KeypadChanged { display, at_ms }),
            KeypadOutcome::Full => {}
            KeypadOutcome::Rejected => events.push(Event::KeypadRejected { at_ms }),
            KeypadOutcome::Accepted => {
                self.escaped = true;
                events.extend(self.engine.disarm());
                let level = self.engine.degradation_level();
                info!(level, at_ms, "player escaped");
                events.push(Event::Escaped { level, at_ms });
            }
        }
        Ok(events)
    }

    /// # Errors
    ///
    /// Propagates puzzle validation errors.
    pub fn apply(&mut self, action: Action, now_ms: u64) -> Result<Vec<Event>> {
        match action {
            Action::Interact => Ok(self.interact(now_ms)),
            Action::Dialogue => Ok(self.request_dialogue(now_ms)),
            Action::TurnLock { wheel } => self.turn_lock(wheel, now_ms),
            Action::PressKey { key } => self.press_key(key, now_ms),
            Action::Arm => Ok(self.arm(now_ms)),
            Action::Disarm => Ok(self.disarm(now_ms)),
            Action::ForceDeath => Ok(self.force_death(now_ms)),
        }
    }

    /// Arm the engine, starting the session if needed. Ignored after escape.
    pub fn arm(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.interact(now_ms);
        if !self.escaped {
            events.extend(self.engine.arm());
        }
        events
    }

    /// Stop the engine without ending the session. Does not count as the
    /// first interaction.
    pub fn disarm(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        events.extend(self.engine.disarm());
        events
    }

    /// Instant death. Ignored once the player is out.
    pub fn force_death(&mut self, now_ms: u64) -> Vec<Event> {
        let mut events = self.advance_to(now_ms);
        if !self.escaped {
            events.extend(self.engine.force_death());
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn begin(&mut self, events: &mut Vec<Event>) {
        if self.started {
            return;
        }
        self.started = true;
        self.countdown.start(self.now_ms());
        events.extend(self.engine.arm());
    }

    fn pending_close(&self) -> Option<u64> {
        self.typewriter
            .as_ref()
            .and_then(|t| t.close_at(self.engine.is_dead()))
    }
}
