//! Helper functions and shared types for UI rendering

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Dashboard region under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    StatusDismiss,
    MetricsPrev,
    MetricsNext,
    Metrics,
    QuickActionsHeader,
    QuickAction(usize),
    Weekly,
    Prodrome,
}

/// Cached panel rectangles for mouse hit-testing.
/// Updated during render to match exactly what's displayed.
#[derive(Default, Clone)]
pub struct PanelRects {
    pub status_dismiss: Vec<Rect>,
    pub metrics: Option<Rect>,
    pub metrics_prev: Option<Rect>,
    pub metrics_next: Option<Rect>,
    pub quick_actions_header: Option<Rect>,
    pub quick_action_rows: Vec<Rect>,
    pub weekly: Option<Rect>,
    pub prodrome: Option<Rect>,
}

impl PanelRects {
    /// Hit-test with the smallest targets first so buttons win over their panel
    pub fn find_panel(&self, x: u16, y: u16) -> Option<Panel> {
        if self
            .status_dismiss
            .iter()
            .any(|r| Self::contains_point(Some(*r), x, y))
        {
            return Some(Panel::StatusDismiss);
        }
        if Self::contains_point(self.metrics_prev, x, y) {
            return Some(Panel::MetricsPrev);
        }
        if Self::contains_point(self.metrics_next, x, y) {
            return Some(Panel::MetricsNext);
        }
        if let Some(i) = self
            .quick_action_rows
            .iter()
            .position(|r| Self::contains_point(Some(*r), x, y))
        {
            return Some(Panel::QuickAction(i));
        }
        if Self::contains_point(self.quick_actions_header, x, y) {
            return Some(Panel::QuickActionsHeader);
        }
        if Self::contains_point(self.metrics, x, y) {
            return Some(Panel::Metrics);
        }
        if Self::contains_point(self.weekly, x, y) {
            return Some(Panel::Weekly);
        }
        if Self::contains_point(self.prodrome, x, y) {
            return Some(Panel::Prodrome);
        }
        None
    }

    #[inline(always)]
    pub fn contains_point(rect: Option<Rect>, x: u16, y: u16) -> bool {
        rect.is_some_and(|r| x >= r.x && x < r.x + r.width && y >= r.y && y < r.y + r.height)
    }
}

/// Truncate to a display width, adding an ellipsis when cut.
/// Measures terminal columns, so wide emoji count as two.
pub fn truncate_with_ellipsis(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let budget = max_width - 1;
    let mut used = 0;
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        result.push(c);
    }
    result.push('…');
    result
}

/// Rect of `width` x `height` centered in `area`, shrunk to fit
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// "1 headache" / "3 headaches"
pub fn plural(count: u32, singular: &str, plural: &str) -> String {
    format!("{} {}", count, if count == 1 { singular } else { plural })
}

/// Trim trailing zeros: 7.0 -> "7", 7.25 -> "7.3"
pub fn format_decimal(value: f64) -> String {
    let rounded = (value * 10.0).round() / 10.0;
    if rounded.fract() == 0.0 {
        format!("{}", rounded as i64)
    } else {
        format!("{:.1}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_wide_chars() {
        assert_eq!(truncate_with_ellipsis("Log Sleep", 20), "Log Sleep");
        assert_eq!(truncate_with_ellipsis("Log Headache", 6), "Log H…");
        // each emoji is two columns wide
        assert_eq!(truncate_with_ellipsis("🤕🤕🤕", 4), "🤕…");
    }

    #[test]
    fn test_hit_test_prefers_buttons() {
        let rects = PanelRects {
            metrics: Some(Rect::new(0, 0, 40, 10)),
            metrics_prev: Some(Rect::new(1, 1, 3, 1)),
            ..Default::default()
        };
        assert_eq!(rects.find_panel(2, 1), Some(Panel::MetricsPrev));
        assert_eq!(rects.find_panel(10, 5), Some(Panel::Metrics));
        assert_eq!(rects.find_panel(50, 5), None);
    }

    #[test]
    fn test_format_decimal() {
        assert_eq!(format_decimal(7.0), "7");
        assert_eq!(format_decimal(7.25), "7.3");
        assert_eq!(format_decimal(0.0), "0");
        assert_eq!(plural(1, "headache", "headaches"), "1 headache");
        assert_eq!(plural(0, "headache", "headaches"), "0 headaches");
    }
}
