mod sequencer;
mod typewriter;

pub use sequencer::{DialogueOutcome, DialogueSequencer};
pub use typewriter::Typewriter;
