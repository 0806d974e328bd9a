use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeypadOutcome {
    /// Entry changed; carries the new display.
    Changed(String),
    /// Digit ignored because the entry is full.
    Full,
    Accepted,
    Rejected,
}

/// Exit keypad: digits, `C` to clear, `E` to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keypad {
    code: String,
    entered: String,
}

impl Keypad {
    /// # Errors
    ///
    /// The code must be a non-empty string of ASCII digits.
    pub fn new(code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_digit()) {
            return Err(ValidationError::InvalidValue {
                field: "keypad_code".into(),
                message: format!("'{code}' is not a digit string"),
            });
        }
        Ok(Self {
            code,
            entered: String::new(),
        })
    }

    pub fn entered(&self) -> &str {
        &self.entered
    }

    /// Entry padded with `-` up to the code length.
    pub fn display(&self) -> String {
        let pad = self.code.len().saturating_sub(self.entered.len());
        format!("{}{}", self.entered, "-".repeat(pad))
    }

    /// # Errors
    ///
    /// Returns `ValidationError::InvalidValue` for anything but a digit, `C` or `E`.
    pub fn check_key(key: char) -> Result<(), ValidationError> {
        match key.to_ascii_uppercase() {
            'C' | 'E' | '0'..='9' => Ok(()),
            other => Err(ValidationError::InvalidValue {
                field: "key".into(),
                message: format!("'{other}' is not a keypad key"),
            }),
        }
    }

    pub fn press(&mut self, key: char) -> Result<KeypadOutcome, ValidationError> {
        Self::check_key(key)?;
        match key.to_ascii_uppercase() {
            'C' => {
                self.entered.clear();
                Ok(KeypadOutcome::Changed(self.display()))
            }
            'E' => {
                if self.entered == self.code {
                    Ok(KeypadOutcome::Accepted)
                } else {
                    Ok(KeypadOutcome::Rejected)
                }
            }
            digit if self.entered.len() < self.code.len() => {
                self.entered.push(digit);
                Ok(KeypadOutcome::Changed(self.display()))
            }
            _ => Ok(KeypadOutcome::Full),
        }
    }
}
