use serde::{Deserialize, Serialize};

/// Why the player died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// The degradation counter reached its budget.
    Exhausted,
    /// External override (debug trigger, exhausted dialogue).
    Forced,
}

/// Every state change in a session produces an Event.
///
/// `at_ms` is session time in milliseconds, not wall-clock time; the
/// runtime driver stamps wall-clock time separately.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    Armed {
        level: u32,
        at_ms: u64,
    },
    Disarmed {
        level: u32,
        at_ms: u64,
    },
    Degraded {
        level: u32,
        intensity: f64,
        at_ms: u64,
    },
    /// One iteration of the ambience loop started.
    AmbienceLooped {
        generation: u64,
        gain: f64,
        at_ms: u64,
    },
    /// An audio sink refused an operation. Play continues.
    SinkFailed {
        operation: String,
        message: String,
        at_ms: u64,
    },
    Died {
        cause: DeathCause,
        level: u32,
        at_ms: u64,
    },
    DialogueShown {
        index: usize,
        text: String,
        at_ms: u64,
    },
    DialogueClosed {
        at_ms: u64,
    },
    LockWheelTurned {
        wheel: usize,
        digit: u8,
        at_ms: u64,
    },
    LockSolved {
        at_ms: u64,
    },
    KeypadChanged {
        display: String,
        at_ms: u64,
    },
    KeypadRejected {
        at_ms: u64,
    },
    Escaped {
        level: u32,
        at_ms: u64,
    },
}

impl Event {
    /// Session time at which the event happened.
    pub fn at_ms(&self) -> u64 {
        match self {
            Event::Armed { at_ms, .. }
            | Event::Disarmed { at_ms, .. }
            | Event::Degraded { at_ms, .. }
            | Event::AmbienceLooped { at_ms, .. }
            | Event::SinkFailed { at_ms, .. }
            | Event::Died { at_ms, .. }
            | Event::DialogueShown { at_ms, .. }
            | Event::DialogueClosed { at_ms }
            | Event::LockWheelTurned { at_ms, .. }
            | Event::LockSolved { at_ms }
            | Event::KeypadChanged { at_ms, .. }
            | Event::KeypadRejected { at_ms }
            | Event::Escaped { at_ms, .. } => *at_ms,
        }
    }

    pub fn is_death(&self) -> bool {
        matches!(self, Event::Died { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_serialize_with_type_tag() {
        let ev = Event::Died {
            cause: DeathCause::Exhausted,
            level: 100,
            at_ms: 60_000,
        };
        let json = serde_json::to_value(&ev).unwrap();
        assert_eq!(json["type"], "Died");
        assert_eq!(json["cause"], "exhausted");
        assert_eq!(json["at_ms"], 60_000);
    }

    #[test]
    fn at_ms_reads_every_variant() {
        assert_eq!(Event::DialogueClosed { at_ms: 5 }.at_ms(), 5);
        assert_eq!(Event::Armed { level: 0, at_ms: 9 }.at_ms(), 9);
        assert!(!Event::LockSolved { at_ms: 1 }.is_death());
    }
}
