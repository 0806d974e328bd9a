use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Timing constants for the tension engine.
///
/// The two cadences are independent: the tick drives degradation, the
/// ambience loop only re-triggers the heartbeat cue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TensionConfig {
    #[serde(default = "default_tick_period_ms")]
    pub tick_period_ms: u64,
    #[serde(default = "default_max_degradation")]
    pub max_degradation: u32,
    /// Nominal length of the heartbeat cue.
    #[serde(default = "default_ambience_loop_ms")]
    pub ambience_loop_ms: u64,
    /// How long before the nominal end the next iteration starts.
    #[serde(default = "default_ambience_retrigger_margin_ms")]
    pub ambience_retrigger_margin_ms: u64,
}

fn default_tick_period_ms() -> u64 {
    600
}
fn default_max_degradation() -> u32 {
    100
}
fn default_ambience_loop_ms() -> u64 {
    20_000
}
fn default_ambience_retrigger_margin_ms() -> u64 {
    50
}

impl Default for TensionConfig {
    fn default() -> Self {
        Self {
            tick_period_ms: default_tick_period_ms(),
            max_degradation: default_max_degradation(),
            ambience_loop_ms: default_ambience_loop_ms(),
            ambience_retrigger_margin_ms: default_ambience_retrigger_margin_ms(),
        }
    }
}

impl TensionConfig {
    /// Armed time after which the engine dies if never disarmed.
    pub fn deadline_ms(&self) -> u64 {
        u64::from(self.max_degradation).saturating_mul(self.tick_period_ms)
    }

    /// Delay between one ambience iteration and the next.
    pub fn ambience_interval_ms(&self) -> u64 {
        self.ambience_loop_ms
            .saturating_sub(self.ambience_retrigger_margin_ms)
    }

    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_period_ms == 0 {
            return Err(invalid("tension.tick_period_ms", "must be greater than 0"));
        }
        if self.max_degradation == 0 {
            return Err(invalid("tension.max_degradation", "must be greater than 0"));
        }
        if u64::from(self.max_degradation)
            .checked_mul(self.tick_period_ms)
            .is_none()
        {
            return Err(invalid(
                "tension.tick_period_ms",
                "tick_period_ms * max_degradation does not fit in u64",
            ));
        }
        if self.ambience_loop_ms == 0 {
            return Err(invalid("tension.ambience_loop_ms", "must be greater than 0"));
        }
        if self.ambience_retrigger_margin_ms >= self.ambience_loop_ms {
            return Err(invalid(
                "tension.ambience_retrigger_margin_ms",
                "must be shorter than the ambience loop",
            ));
        }
        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        message: message.into(),
    }
}
