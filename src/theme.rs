//! Theme system

use crate::metrics::PainBand;
use ratatui::style::Color;

/// Complete color palette for TUI rendering
#[derive(Debug, Clone, Copy)]
pub struct ThemeColors {
    // Backgrounds
    pub bg_primary: Color,
    pub bg_highlight: Color,
    pub bg_status_bar: Color,

    // Borders
    pub border_default: Color,
    pub border_focus: Color,
    pub border_muted: Color,

    // Text
    pub text_primary: Color,
    pub text_secondary: Color,
    pub text_muted: Color,

    // Status
    pub success: Color,
    pub warning: Color,
    pub error: Color,

    // Metric accents
    pub sleep_quality: Color,
    pub sleep_hours: Color,
    pub stress: Color,
    pub headache: Color,
    pub pain: Color,
    pub gauge_track: Color,
}

impl ThemeColors {
    /// Default theme
    pub const DEFAULT: Self = Self {
        // Backgrounds
        bg_primary: Color::Rgb(22, 24, 38),
        bg_highlight: Color::Rgb(50, 54, 72),
        bg_status_bar: Color::Rgb(15, 15, 25),

        // Borders
        border_default: Color::Rgb(130, 135, 160),
        border_focus: Color::Rgb(120, 220, 170),
        border_muted: Color::Rgb(90, 95, 115),

        // Text
        text_primary: Color::Rgb(230, 233, 248),
        text_secondary: Color::Rgb(185, 190, 210),
        text_muted: Color::Rgb(140, 145, 168),

        // Status
        success: Color::Rgb(110, 220, 120),
        warning: Color::Rgb(235, 195, 100),
        error: Color::Rgb(250, 120, 130),

        // Metric accents
        sleep_quality: Color::Rgb(120, 170, 250),
        sleep_hours: Color::Rgb(210, 150, 235),
        stress: Color::Rgb(245, 175, 100),
        headache: Color::Rgb(240, 145, 180),
        pain: Color::Rgb(250, 120, 130),
        gauge_track: Color::Rgb(50, 54, 72),
    };

    /// Headache count colour: alert when any were logged
    #[inline]
    pub const fn headache_count(&self, count: u32) -> Color {
        if count > 0 {
            self.error
        } else {
            self.success
        }
    }

    /// Pain level colour by severity band
    #[inline]
    pub fn pain_level(&self, level: f64) -> Color {
        match PainBand::of(level) {
            PainBand::Low => self.success,
            PainBand::Moderate => self.warning,
            PainBand::High => self.error,
        }
    }
}

/// Theme container providing access to color palette
#[derive(Debug, Clone, Copy, Default)]
pub struct Theme;

impl Theme {
    #[inline]
    pub const fn colors(&self) -> ThemeColors {
        ThemeColors::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_background() {
        let colors = ThemeColors::DEFAULT;
        assert_eq!(colors.bg_primary, Color::Rgb(22, 24, 38));
    }

    #[test]
    fn test_conditional_metric_colors() {
        let colors = Theme.colors();
        assert_eq!(colors.headache_count(0), colors.success);
        assert_eq!(colors.headache_count(2), colors.error);
        assert_eq!(colors.pain_level(2.0), colors.success);
        assert_eq!(colors.pain_level(5.0), colors.warning);
        assert_eq!(colors.pain_level(9.0), colors.error);
    }
}
