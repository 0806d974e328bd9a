//! Boundary between the tension engine and the presentation layer.

use tracing::{debug, info};

use crate::error::SinkError;
use crate::events::DeathCause;

/// Capabilities the engine consumes from the audio/visual layer.
///
/// Audio operations may fail (blocked autoplay, missing device); the engine
/// logs those and keeps counting. Visual updates and the death
/// notification are infallible from the engine's point of view.
pub trait TensionSink {
    /// Restart the heartbeat cue from the beginning at `gain`.
    fn play_ambience_loop(&mut self, gain: f64) -> Result<(), SinkError>;

    /// Adjust the gain of the playing cue.
    fn set_ambience_gain(&mut self, gain: f64) -> Result<(), SinkError>;

    /// Silence the cue.
    fn stop_ambience_loop(&mut self) -> Result<(), SinkError>;

    /// `intensity` is in `[0.0, 1.0]`.
    fn apply_visual_intensity(&mut self, intensity: f64);

    /// Called exactly once per engine.
    fn on_death(&mut self, cause: DeathCause);
}

impl<T: TensionSink + ?Sized> TensionSink for Box<T> {
    fn play_ambience_loop(&mut self, gain: f64) -> Result<(), SinkError> {
        (**self).play_ambience_loop(gain)
    }

    fn set_ambience_gain(&mut self, gain: f64) -> Result<(), SinkError> {
        (**self).set_ambience_gain(gain)
    }

    fn stop_ambience_loop(&mut self) -> Result<(), SinkError> {
        (**self).stop_ambience_loop()
    }

    fn apply_visual_intensity(&mut self, intensity: f64) {
        (**self).apply_visual_intensity(intensity)
    }

    fn on_death(&mut self, cause: DeathCause) {
        (**self).on_death(cause)
    }
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl TensionSink for NullSink {
    fn play_ambience_loop(&mut self, _gain: f64) -> Result<(), SinkError> {
        Ok(())
    }

    fn set_ambience_gain(&mut self, _gain: f64) -> Result<(), SinkError> {
        Ok(())
    }

    fn stop_ambience_loop(&mut self) -> Result<(), SinkError> {
        Ok(())
    }

    fn apply_visual_intensity(&mut self, _intensity: f64) {}

    fn on_death(&mut self, _cause: DeathCause) {}
}

/// Headless sink that reports every call through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl TensionSink for TracingSink {
    fn play_ambience_loop(&mut self, gain: f64) -> Result<(), SinkError> {
        debug!(gain, "ambience loop restarted");
        Ok(())
    }

    fn set_ambience_gain(&mut self, gain: f64) -> Result<(), SinkError> {
        debug!(gain, "ambience gain");
        Ok(())
    }

    fn stop_ambience_loop(&mut self) -> Result<(), SinkError> {
        debug!("ambience loop stopped");
        Ok(())
    }

    fn apply_visual_intensity(&mut self, intensity: f64) {
        debug!(filter = %super::VisualFilter::from_intensity(intensity), "visual filter");
    }

    fn on_death(&mut self, cause: DeathCause) {
        info!(?cause, "jumpscare");
    }
}

/// Records every call. Set `audio_blocked` to make audio operations fail.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub audio_blocked: bool,
    pub loops_started: Vec<f64>,
    pub gains: Vec<f64>,
    pub stops: usize,
    pub intensities: Vec<f64>,
    pub deaths: Vec<DeathCause>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink whose audio calls are all rejected.
    pub fn blocked() -> Self {
        Self {
            audio_blocked: true,
            ..Self::default()
        }
    }

    fn audio(&self) -> Result<(), SinkError> {
        if self.audio_blocked {
            Err(SinkError::Blocked("autoplay refused".into()))
        } else {
            Ok(())
        }
    }
}

impl TensionSink for RecordingSink {
    fn play_ambience_loop(&mut self, gain: f64) -> Result<(), SinkError> {
        self.audio()?;
        self.loops_started.push(gain);
        Ok(())
    }

    fn set_ambience_gain(&mut self, gain: f64) -> Result<(), SinkError> {
        self.audio()?;
        self.gains.push(gain);
        Ok(())
    }

    fn stop_ambience_loop(&mut self) -> Result<(), SinkError> {
        self.audio()?;
        self.stops += 1;
        Ok(())
    }

    fn apply_visual_intensity(&mut self, intensity: f64) {
        self.intensities.push(intensity);
    }

    fn on_death(&mut self, cause: DeathCause) {
        self.deaths.push(cause);
    }
}
