use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Result of turning one wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockTurn {
    pub wheel: usize,
    pub digit: u8,
    /// True only on the turn that first opens the lock.
    pub just_solved: bool,
}

/// Combination lock with one 0-9 wheel per digit.
///
/// Wheels only turn forward and wrap from 9 to 0. Once open it stays open.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeLock {
    combination: Vec<u8>,
    wheels: Vec<u8>,
    solved: bool,
}

impl CodeLock {
    /// # Errors
    ///
    /// Rejects an empty combination or any digit above 9.
    pub fn new(combination: Vec<u8>) -> Result<Self, ValidationError> {
        if combination.is_empty() {
            return Err(ValidationError::InvalidValue {
                field: "lock_combination".into(),
                message: "must have at least one digit".into(),
            });
        }
        if let Some(d) = combination.iter().find(|d| **d > 9) {
            return Err(ValidationError::InvalidValue {
                field: "lock_combination".into(),
                message: format!("{d} is not a single digit"),
            });
        }
        let wheels = vec![0; combination.len()];
        let solved = wheels == combination;
        Ok(Self {
            combination,
            wheels,
            solved,
        })
    }

    pub fn wheels(&self) -> &[u8] {
        &self.wheels
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// # Errors
    ///
    /// Returns `ValidationError::OutOfBounds` for a wheel the lock does not have.
    pub fn check_wheel(&self, wheel: usize) -> Result<(), ValidationError> {
        if wheel < self.wheels.len() {
            Ok(())
        } else {
            Err(ValidationError::OutOfBounds {
                collection: "lock wheels".into(),
                index: wheel,
                len: self.wheels.len(),
            })
        }
    }

    pub fn turn(&mut self, wheel: usize) -> Result<LockTurn, ValidationError> {
        self.check_wheel(wheel)?;
        let digit = &mut self.wheels[wheel];
        *digit = (*digit + 1) % 10;
        let digit = *digit;

        let just_solved = !self.solved && self.wheels == self.combination;
        if just_solved {
            self.solved = true;
        }
        Ok(LockTurn {
            wheel,
            digit,
            just_solved,
        })
    }
}
