//! Editor tuning constants.

/// Zoom limits and step sizes for the stage and toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EditorConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Scale multiplier per wheel notch.
    pub wheel_zoom_factor: f64,
    /// Scale multiplier per toolbar zoom click.
    pub button_zoom_step: f64,
    /// Canvas size assumed until the host reports one.
    pub default_width: f64,
    pub default_height: f64,
    /// Pointer travel (screen px) below which a press-release is a click.
    pub click_tolerance: f64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            min_scale: 0.1,
            max_scale: 5.0,
            wheel_zoom_factor: 1.08,
            button_zoom_step: 1.2,
            default_width: 800.0,
            default_height: 600.0,
            click_tolerance: 3.0,
        }
    }
}

impl EditorConfig {
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.clamp(self.min_scale, self.max_scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_scale_bounds() {
        let config = EditorConfig::default();
        assert_eq!(config.clamp_scale(0.01), 0.1);
        assert_eq!(config.clamp_scale(9.0), 5.0);
        assert_eq!(config.clamp_scale(1.5), 1.5);
    }
}
