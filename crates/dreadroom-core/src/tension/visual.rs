use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum sepia strength at full intensity.
const MAX_SEPIA: f64 = 0.5;
/// Maximum hue rotation in degrees at full intensity.
const MAX_HUE_ROTATE_DEG: f64 = 36.0;

/// CSS-style filter derived from tension intensity.
///
/// Grayscale is always full; sepia and hue rotation scale linearly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualFilter {
    pub sepia: f64,
    pub hue_rotate_deg: f64,
}

impl VisualFilter {
    pub fn from_intensity(intensity: f64) -> Self {
        let x = intensity.clamp(0.0, 1.0);
        Self {
            sepia: x * MAX_SEPIA,
            hue_rotate_deg: x * MAX_HUE_ROTATE_DEG,
        }
    }

    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VisualFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "grayscale(100%) sepia({}) hue-rotate({}deg)",
            self.sepia, self.hue_rotate_deg
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_intensity_is_plain_grayscale() {
        let f = VisualFilter::from_intensity(0.0);
        assert_eq!(f.css(), "grayscale(100%) sepia(0) hue-rotate(0deg)");
    }

    #[test]
    fn full_intensity_hits_caps() {
        let f = VisualFilter::from_intensity(1.0);
        assert_eq!(f.sepia, 0.5);
        assert_eq!(f.hue_rotate_deg, 36.0);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(
            VisualFilter::from_intensity(3.0),
            VisualFilter::from_intensity(1.0)
        );
        assert_eq!(
            VisualFilter::from_intensity(-1.0),
            VisualFilter::from_intensity(0.0)
        );
    }
}
