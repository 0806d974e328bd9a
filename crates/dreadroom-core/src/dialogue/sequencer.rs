use serde::{Deserialize, Serialize};
use tracing::info;

use crate::events::Event;
use crate::tension::{TensionEngine, TensionSink};

/// Result of asking the guide to speak.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DialogueOutcome {
    Line { index: usize, text: String },
    /// No text is shown. `events` holds the death, if this request caused it.
    Death { events: Vec<Event> },
}

/// Hands out hint lines in order until they run out.
///
/// Asking once more after the last line kills the player; once dead,
/// nothing more is ever said.
#[derive(Debug, Clone)]
pub struct DialogueSequencer {
    lines: Vec<String>,
    next_index: usize,
}

impl DialogueSequencer {
    pub fn new(lines: Vec<String>) -> Self {
        Self {
            lines,
            next_index: 0,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn remaining(&self) -> usize {
        self.lines.len().saturating_sub(self.next_index)
    }

    pub fn request<S: TensionSink>(&mut self, engine: &mut TensionEngine<S>) -> DialogueOutcome {
        if engine.is_dead() {
            return DialogueOutcome::Death { events: Vec::new() };
        }
        match self.lines.get(self.next_index) {
            Some(text) => {
                let index = self.next_index;
                self.next_index += 1;
                DialogueOutcome::Line {
                    index,
                    text: text.clone(),
                }
            }
            None => {
                info!(asked = self.next_index, "guide ran out of patience");
                DialogueOutcome::Death {
                    events: engine.force_death(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DeathCause;
    use crate::tension::RecordingSink;

    fn lines() -> Vec<String> {
        vec!["first".into(), "second".into()]
    }

    #[test]
    fn hands_out_lines_in_order() {
        let mut engine = TensionEngine::with_defaults(RecordingSink::new());
        let mut seq = DialogueSequencer::new(lines());
        assert_eq!(
            seq.request(&mut engine),
            DialogueOutcome::Line {
                index: 0,
                text: "first".into()
            }
        );
        assert_eq!(seq.remaining(), 1);
        assert!(matches!(
            seq.request(&mut engine),
            DialogueOutcome::Line { index: 1, .. }
        ));
        assert!(!engine.is_dead());
    }

    #[test]
    fn asking_past_the_end_kills() {
        let mut engine = TensionEngine::with_defaults(RecordingSink::new());
        let mut seq = DialogueSequencer::new(lines());
        seq.request(&mut engine);
        seq.request(&mut engine);

        let DialogueOutcome::Death { events } = seq.request(&mut engine) else {
            panic!("expected death");
        };
        assert_eq!(events.len(), 1);
        assert!(engine.is_dead());
        assert_eq!(engine.sink().deaths, vec![DeathCause::Forced]);
    }

    #[test]
    fn dead_player_hears_nothing() {
        let mut engine = TensionEngine::with_defaults(RecordingSink::new());
        engine.force_death();
        let mut seq = DialogueSequencer::new(lines());
        assert_eq!(
            seq.request(&mut engine),
            DialogueOutcome::Death { events: vec![] }
        );
        assert_eq!(seq.remaining(), 2);
        assert_eq!(engine.sink().deaths.len(), 1);
    }
}
