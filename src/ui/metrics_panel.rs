//! DAILY METRICS panel: day navigation and the gauge cards for the selected day

use super::gauge::{GaugeText, MetricCard, RingGauge};
use super::helpers::{format_decimal, plural};
use crate::metrics::{metric_for, DailyMetric, DayPercentages, MetricDay, METRIC_DAYS};
use crate::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Screen regions of the panel, shared by render and mouse hit-testing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsLayout {
    pub header: Rect,
    pub prev: Rect,
    pub next: Rect,
    pub cards: [Rect; 4],
}

impl MetricsLayout {
    pub fn new(area: Rect) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let [header, _dots, cards_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(inner);
        let cards = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(cards_area);
        Self {
            header,
            prev: Rect::new(header.x, header.y, 3.min(header.width), header.height),
            next: Rect::new(
                header.x + header.width.saturating_sub(3),
                header.y,
                3.min(header.width),
                header.height,
            ),
            cards,
        }
    }

    fn dots(&self) -> Rect {
        Rect::new(self.header.x, self.header.y + 1, self.header.width, 1)
    }
}

pub struct DailyMetricsPanel<'a> {
    pub metrics: &'a [DailyMetric],
    pub current: MetricDay,
    pub focused: bool,
    pub colors: ThemeColors,
}

impl DailyMetricsPanel<'_> {
    fn header_line(&self, metric: &DailyMetric) -> Line<'static> {
        let mut spans = vec![Span::styled(
            self.current.relative_name(),
            Style::default()
                .fg(self.colors.text_primary)
                .add_modifier(Modifier::BOLD),
        )];
        if !metric.day_label.is_empty() {
            spans.push(Span::styled(" · ", Style::default().fg(self.colors.text_muted)));
            spans.push(Span::styled(
                metric.day_label.clone(),
                Style::default().fg(self.colors.text_secondary),
            ));
        }
        Line::from(spans)
    }

    fn arrow(&self, symbol: &'static str, enabled: bool) -> Span<'static> {
        let style = if enabled {
            Style::default()
                .fg(self.colors.border_focus)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.colors.border_muted)
        };
        Span::styled(symbol, style)
    }

    fn headache_lines(&self, metric: &DailyMetric) -> Vec<Line<'static>> {
        vec![
            Line::from(Span::styled(
                plural(metric.headache_count, "headache", "headaches"),
                Style::default()
                    .fg(self.colors.headache_count(metric.headache_count))
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("Avg pain ", Style::default().fg(self.colors.text_muted)),
                Span::styled(
                    format!("{}/10", format_decimal(metric.avg_pain_level)),
                    Style::default()
                        .fg(self.colors.pain_level(metric.avg_pain_level))
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
        ]
    }
}

impl Widget for DailyMetricsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = self.colors;
        let title_color = if self.focused {
            colors.border_focus
        } else {
            colors.border_default
        };
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(title_color))
            .title(
                Line::from(Span::styled(
                    " DAILY METRICS ",
                    Style::default()
                        .fg(title_color)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            )
            .title_bottom(
                Line::from(Span::styled(
                    " ←→/Swipe: change day ",
                    Style::default().fg(colors.text_muted),
                ))
                .alignment(Alignment::Center),
            )
            .render(area, buf);

        let layout = MetricsLayout::new(area);
        let metric = metric_for(self.metrics, self.current);
        let pct = DayPercentages::from_metric(&metric);

        Paragraph::new(self.header_line(&metric))
            .alignment(Alignment::Center)
            .render(layout.header, buf);
        Paragraph::new(self.arrow(" ‹ ", self.current.has_prev())).render(layout.prev, buf);
        Paragraph::new(self.arrow(" › ", self.current.has_next())).render(layout.next, buf);

        let dots: Vec<Span> = (0..METRIC_DAYS)
            .map(|i| {
                if i == self.current.index() {
                    Span::styled("● ", Style::default().fg(colors.border_focus))
                } else {
                    Span::styled("○ ", Style::default().fg(colors.border_muted))
                }
            })
            .collect();
        Paragraph::new(Line::from(dots))
            .alignment(Alignment::Center)
            .render(layout.dots(), buf);

        let hours = format_decimal(metric.sleep_hours);
        MetricCard::gauge(
            "Sleep Quality",
            RingGauge::new(pct.sleep_quality, colors.sleep_quality, "quality")
                .track_color(colors.gauge_track),
        )
        .render(layout.cards[0], buf);
        MetricCard::gauge(
            "Sleep Hours",
            RingGauge::new(pct.sleep_hours, colors.sleep_hours, "of 8h goal")
                .track_color(colors.gauge_track)
                .text(GaugeText::Value {
                    value: hours,
                    unit: "h".to_string(),
                }),
        )
        .render(layout.cards[1], buf);
        MetricCard::gauge(
            "Stress",
            RingGauge::new(pct.stress, colors.stress, "stress level")
                .track_color(colors.gauge_track),
        )
        .render(layout.cards[2], buf);
        MetricCard::lines("Headaches", self.headache_lines(&metric)).render(layout.cards[3], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn screen(buf: &Buffer) -> String {
        (0..buf.area.height)
            .map(|y| {
                (0..buf.area.width)
                    .map(|x| buf[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn render(metrics: &[DailyMetric], current: MetricDay) -> String {
        let area = Rect::new(0, 0, 100, 16);
        let mut buf = Buffer::empty(area);
        DailyMetricsPanel {
            metrics,
            current,
            focused: true,
            colors: Theme.colors(),
        }
        .render(area, &mut buf);
        screen(&buf)
    }

    fn sample() -> Vec<DailyMetric> {
        vec![
            DailyMetric {
                day_label: "Thu Mar 12".into(),
                sleep_hours: 10.0,
                sleep_quality: 8.0,
                stress_level: 3.0,
                headache_count: 2,
                avg_pain_level: 6.5,
            },
            DailyMetric {
                day_label: "Wed Mar 11".into(),
                sleep_hours: 4.0,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn test_renders_selected_day() {
        let text = render(&sample(), MetricDay::TODAY);
        assert!(text.contains("Today · Thu Mar 12"));
        assert!(text.contains("80%"));
        assert!(text.contains("10h"));
        assert!(text.contains("30%"));
        assert!(text.contains("2 headaches"));
        assert!(text.contains("6.5/10"));
    }

    #[test]
    fn test_missing_day_renders_zero_record() {
        let text = render(&sample(), MetricDay::LAST);
        assert!(text.contains("2 days ago"));
        assert!(text.contains("0h"));
        assert!(text.contains("0 headaches"));
    }

    #[test]
    fn test_layout_buttons_sit_on_header_edges() {
        let layout = MetricsLayout::new(Rect::new(0, 0, 80, 16));
        assert_eq!(layout.prev, Rect::new(1, 1, 3, 1));
        assert_eq!(layout.next, Rect::new(76, 1, 3, 1));
        assert_eq!(layout.cards[0].y, 3);
    }
}
