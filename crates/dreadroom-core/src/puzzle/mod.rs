mod keypad;
mod lock;

pub use keypad::{Keypad, KeypadOutcome};
pub use lock::{CodeLock, LockTurn};
