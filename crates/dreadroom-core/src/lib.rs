//! # Dreadroom Core Library
//!
//! This library provides the game logic for Dreadroom, a single-room escape
//! game with a hidden deadline. Presentation (images, audio playback, input
//! widgets) lives outside; the core only decides what happens and when.
//!
//! ## Architecture
//!
//! - **Tension Engine**: A session-time state machine that escalates ambience
//!   and kills the player when its degradation budget runs out. The caller
//!   advances the clock with `advance_to()`.
//! - **Puzzles**: Combination lock and exit keypad
//! - **Dialogue**: Hint lines with a typewriter reveal, gated by death
//! - **Runtime**: tokio actor that drives a session on the wall clock
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`TensionEngine`]: Degradation counter and death transition
//! - [`Session`]: One play-through composing every component
//! - [`Config`]: Game configuration management
//! - [`TensionSink`]: Trait for the audio/visual layer

pub mod countdown;
pub mod dialogue;
pub mod error;
pub mod events;
pub mod puzzle;
pub mod runtime;
pub mod session;
pub mod storage;
pub mod tension;

pub use countdown::Countdown;
pub use dialogue::{DialogueOutcome, DialogueSequencer, Typewriter};
pub use error::{ConfigError, CoreError, SinkError, ValidationError};
pub use events::{DeathCause, Event};
pub use puzzle::{CodeLock, Keypad, KeypadOutcome};
pub use runtime::{spawn_session, SessionHandle, StampedEvent};
pub use session::{Action, Outcome, Session, SessionSnapshot};
pub use storage::Config;
pub use tension::{
    NullSink, RecordingSink, TensionConfig, TensionEngine, TensionSink, TensionSnapshot,
    TensionState, TracingSink, VisualFilter,
};
