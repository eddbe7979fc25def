//! Circular progress gauge and the titled card that hosts it

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Points},
        Block, BorderType, Paragraph, Widget,
    },
};
use std::f64::consts::{FRAC_PI_2, TAU};

/// What the centre of the ring shows
#[derive(Debug, Clone, PartialEq)]
pub enum GaugeText {
    /// The rounded percentage itself
    Percentage,
    /// A literal value with its unit, e.g. "7.5" + "h"
    Value { value: String, unit: String },
}

/// Ring geometry for a percentage, in canvas units.
///
/// Percentages are not clamped: values past 100 overrun the circumference
/// and negative values produce a negative fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    pub radius: f64,
    pub circumference: f64,
    pub filled_length: f64,
    pub dash_offset: f64,
}

impl GaugeGeometry {
    pub fn new(size: f64, stroke_width: f64, percentage: f64) -> Self {
        let radius = (size - stroke_width) / 2.0;
        let circumference = 2.0 * std::f64::consts::PI * radius;
        let filled_length = circumference * percentage / 100.0;
        Self {
            radius,
            circumference,
            filled_length,
            dash_offset: circumference - filled_length,
        }
    }

    /// Share of the ring that is filled, 1.0 for a full ring
    pub fn sweep(&self) -> f64 {
        if self.circumference == 0.0 {
            0.0
        } else {
            1.0 - self.dash_offset / self.circumference
        }
    }

    /// Points along a ring from 12 o'clock clockwise, covering `sweep` turns (at most one)
    pub fn arc_points(radius: f64, sweep: f64, samples: usize) -> Vec<(f64, f64)> {
        let sweep = sweep.min(1.0);
        if sweep <= 0.0 || radius <= 0.0 {
            return Vec::new();
        }
        let steps = ((samples as f64) * sweep).ceil().max(1.0) as usize;
        (0..=steps)
            .map(|i| {
                let theta = FRAC_PI_2 - TAU * sweep * (i as f64 / steps as f64);
                (radius * theta.cos(), radius * theta.sin())
            })
            .collect()
    }
}

/// Circular progress indicator with centred text and a sub-label
pub struct RingGauge<'a> {
    pub percentage: f64,
    pub size: f64,
    pub stroke_width: f64,
    pub color: Color,
    pub track_color: Color,
    pub label: &'a str,
    pub text: GaugeText,
}

impl<'a> RingGauge<'a> {
    pub fn new(percentage: f64, color: Color, label: &'a str) -> Self {
        Self {
            percentage,
            size: 100.0,
            stroke_width: 10.0,
            color,
            track_color: Color::DarkGray,
            label,
            text: GaugeText::Percentage,
        }
    }

    pub fn text(mut self, text: GaugeText) -> Self {
        self.text = text;
        self
    }

    pub fn track_color(mut self, color: Color) -> Self {
        self.track_color = color;
        self
    }

    pub fn center_text(&self) -> String {
        match &self.text {
            GaugeText::Percentage => format!("{}%", self.percentage.round() as i64),
            GaugeText::Value { value, unit } => format!("{}{}", value, unit),
        }
    }

    pub fn geometry(&self) -> GaugeGeometry {
        GaugeGeometry::new(self.size, self.stroke_width, self.percentage)
    }

    /// Concentric rings covering the stroke width
    fn stroke_radii(&self, radius: f64) -> Vec<f64> {
        let half = self.stroke_width / 2.0;
        let step = (self.stroke_width / 4.0).max(1.0);
        let mut radii = Vec::new();
        let mut r = radius - half;
        while r <= radius + half {
            if r > 0.0 {
                radii.push(r);
            }
            r += step;
        }
        radii
    }
}

impl Widget for RingGauge<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height < 3 || area.width < 4 {
            Line::from(Span::styled(
                self.center_text(),
                Style::default().fg(self.color).add_modifier(Modifier::BOLD),
            ))
            .alignment(Alignment::Center)
            .render(area, buf);
            return;
        }

        let ring_h = area.height - 1;
        // Braille dots are roughly square when a cell region is twice as wide as tall
        let ring_w = (ring_h * 2).min(area.width);
        let ring_area = Rect::new(area.x + (area.width - ring_w) / 2, area.y, ring_w, ring_h);
        let label_area = Rect::new(area.x, area.y + ring_h, area.width, 1);

        let geometry = self.geometry();
        let half = self.size / 2.0;
        let samples = (ring_w as usize * 8).max(64);
        let radii = self.stroke_radii(geometry.radius);

        let track: Vec<(f64, f64)> = radii
            .iter()
            .flat_map(|&r| GaugeGeometry::arc_points(r, 1.0, samples))
            .collect();
        let filled: Vec<(f64, f64)> = radii
            .iter()
            .flat_map(|&r| GaugeGeometry::arc_points(r, geometry.sweep(), samples))
            .collect();

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([-half, half])
            .y_bounds([-half, half])
            .paint(|ctx| {
                ctx.draw(&Points {
                    coords: &track,
                    color: self.track_color,
                });
                ctx.layer();
                ctx.draw(&Points {
                    coords: &filled,
                    color: self.color,
                });
            })
            .render(ring_area, buf);

        let center = Rect::new(ring_area.x, ring_area.y + ring_area.height / 2, ring_area.width, 1);
        Paragraph::new(Line::from(Span::styled(
            self.center_text(),
            Style::default().fg(self.color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(center, buf);

        Paragraph::new(Line::from(Span::styled(
            self.label.to_string(),
            Style::default().fg(Color::Rgb(180, 180, 180)),
        )))
        .alignment(Alignment::Center)
        .render(label_area, buf);
    }
}

/// Body of a metric card
pub enum CardBody<'a> {
    Gauge(RingGauge<'a>),
    Lines(Vec<Line<'a>>),
}

/// Titled, rounded card wrapping a gauge or custom content
pub struct MetricCard<'a> {
    pub title: &'a str,
    pub body: CardBody<'a>,
    pub border_color: Color,
}

impl<'a> MetricCard<'a> {
    pub fn gauge(title: &'a str, gauge: RingGauge<'a>) -> Self {
        Self {
            title,
            body: CardBody::Gauge(gauge),
            border_color: Color::Rgb(90, 95, 115),
        }
    }

    pub fn lines(title: &'a str, lines: Vec<Line<'a>>) -> Self {
        Self {
            title,
            body: CardBody::Lines(lines),
            border_color: Color::Rgb(90, 95, 115),
        }
    }
}

impl Widget for MetricCard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.border_color))
            .title(
                Line::from(Span::styled(
                    format!(" {} ", self.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            );
        let inner = block.inner(area);
        block.render(area, buf);

        match self.body {
            CardBody::Gauge(gauge) => gauge.render(inner, buf),
            CardBody::Lines(lines) => {
                let top_pad = inner.height.saturating_sub(lines.len() as u16) / 2;
                let body = Rect::new(
                    inner.x,
                    inner.y + top_pad,
                    inner.width,
                    inner.height - top_pad,
                );
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(body, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_geometry_offsets() {
        let g = GaugeGeometry::new(120.0, 10.0, 25.0);
        assert!(approx(g.radius, 55.0));
        assert!(approx(g.circumference, 2.0 * std::f64::consts::PI * 55.0));
        assert!(approx(g.dash_offset, g.circumference * 0.75));
        assert!(approx(g.sweep(), 0.25));
    }

    #[test]
    fn test_out_of_range_percentages_do_not_panic() {
        let over = GaugeGeometry::new(100.0, 10.0, 125.0);
        assert!(over.dash_offset < 0.0);
        assert_eq!(
            GaugeGeometry::arc_points(over.radius, over.sweep(), 32).len(),
            GaugeGeometry::arc_points(over.radius, 1.0, 32).len()
        );

        let under = GaugeGeometry::new(100.0, 10.0, -20.0);
        assert!(under.dash_offset > under.circumference);
        assert!(GaugeGeometry::arc_points(under.radius, under.sweep(), 32).is_empty());
    }

    #[test]
    fn test_arc_starts_at_twelve_oclock_and_runs_clockwise() {
        let pts = GaugeGeometry::arc_points(10.0, 0.25, 40);
        let first = pts[0];
        let last = pts[pts.len() - 1];
        assert!(approx(first.0, 0.0) && approx(first.1, 10.0));
        assert!(approx(last.0, 10.0) && last.1.abs() < 1e-9);
    }

    #[test]
    fn test_center_text() {
        let g = RingGauge::new(66.6, Color::Blue, "Quality");
        assert_eq!(g.center_text(), "67%");
        let g = RingGauge::new(93.75, Color::Blue, "Hours").text(GaugeText::Value {
            value: "7.5".into(),
            unit: "h".into(),
        });
        assert_eq!(g.center_text(), "7.5h");
    }

    #[test]
    fn test_render_shows_text_and_label() {
        let area = Rect::new(0, 0, 20, 9);
        let mut buf = Buffer::empty(area);
        RingGauge::new(40.0, Color::Yellow, "Stress").render(area, &mut buf);
        let text: String = (0..area.height)
            .map(|y| {
                (0..area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n");
        assert!(text.contains("40%"));
        assert!(text.contains("Stress"));
    }
}
