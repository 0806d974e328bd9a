mod config;
mod engine;
mod queue;
mod sink;
mod visual;

pub use config::TensionConfig;
pub use engine::{TensionEngine, TensionSnapshot, TensionState};
pub use queue::{TimerId, TimerQueue, Wakeup};
pub use sink::{NullSink, RecordingSink, TensionSink, TracingSink};
pub use visual::VisualFilter;
