//! WEEKLY OVERVIEW chart: composed sleep/stress/pain lines over headache bars

use super::helpers::centered_rect;
use crate::theme::ThemeColors;
use crate::week::{has_any_data, tooltip_lines, WeekDay};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Clear, Dataset, GraphType, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

pub const EMPTY_MESSAGE: &str =
    "No health data logged this week yet. Start tracking to see your trends.";

/// Columns taken by the y axis labels and line
const Y_AXIS_WIDTH: u16 = 5;

/// Each headache adds this much to its bar on the 0-100 axis
const HEADACHE_BAR_SCALE: f64 = 10.0;

pub struct WeeklyChart<'a> {
    pub week: &'a [WeekDay],
    pub hovered: Option<usize>,
    pub focused: bool,
    pub colors: ThemeColors,
}

impl WeeklyChart<'_> {
    /// Day under a pointer column, if the pointer is over the plot
    pub fn day_at(area: Rect, days: usize, x: u16) -> Option<usize> {
        if days == 0 {
            return None;
        }
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let plot_x = inner.x + Y_AXIS_WIDTH;
        let plot_w = inner.width.saturating_sub(Y_AXIS_WIDTH);
        if plot_w == 0 || x < plot_x || x >= plot_x + plot_w {
            return None;
        }
        let rel = (x - plot_x) as f64 / plot_w as f64;
        Some(((rel * days as f64) as usize).min(days - 1))
    }

    fn series(&self, f: impl Fn(&WeekDay) -> Option<f64>) -> Vec<(f64, f64)> {
        self.week
            .iter()
            .enumerate()
            .filter_map(|(i, d)| f(d).map(|v| (i as f64, v)))
            .collect()
    }

    fn render_tooltip(&self, plot: Rect, buf: &mut Buffer) {
        let Some(day) = self.hovered.and_then(|i| self.week.get(i).map(|d| (i, d))) else {
            return;
        };
        let (index, day) = day;
        let lines = tooltip_lines(day);
        let width = lines
            .iter()
            .map(|l| l.width())
            .chain(std::iter::once(day.day.width()))
            .max()
            .unwrap_or(0) as u16
            + 4;
        let height = lines.len() as u16 + 2;

        // Keep the box on the opposite half from the hovered point
        let half = self.week.len() / 2;
        let x = if index < half {
            plot.x + plot.width.saturating_sub(width)
        } else {
            plot.x
        };
        let tip = Rect::new(x, plot.y, width.min(plot.width), height.min(plot.height));

        Clear.render(tip, buf);
        Paragraph::new(
            lines
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(self.colors.text_primary))))
                .collect::<Vec<_>>(),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(self.colors.border_focus))
                .title(Span::styled(
                    format!(" {} ", day.day),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
        .style(Style::default().bg(self.colors.bg_primary))
        .render(tip, buf);
    }
}

impl Widget for WeeklyChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = self.colors;
        let title_color = if self.focused {
            colors.border_focus
        } else {
            colors.border_default
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(title_color))
            .title(
                Line::from(Span::styled(
                    " WEEKLY OVERVIEW ",
                    Style::default()
                        .fg(title_color)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            );

        if !has_any_data(self.week) {
            let inner = block.inner(area);
            block.render(area, buf);
            let msg_area = centered_rect(inner, inner.width.saturating_sub(4), 2);
            Paragraph::new(Span::styled(EMPTY_MESSAGE, Style::default().fg(colors.text_muted)))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(msg_area, buf);
            return;
        }

        let block = block.title_bottom(
            Line::from(vec![
                Span::styled(" ▬ Sleep ", Style::default().fg(colors.sleep_quality)),
                Span::styled(" ▬ Stress ", Style::default().fg(colors.stress)),
                Span::styled(" ▬ Pain ", Style::default().fg(colors.pain)),
                Span::styled(" █ Headaches ", Style::default().fg(colors.headache)),
            ])
            .alignment(Alignment::Center),
        );

        let sleep = self.series(|d| d.sleep_quality_percent);
        let stress = self.series(|d| d.stress_percent);
        let pain = self.series(|d| d.avg_pain_level_percent);
        let headaches = self.series(|d| {
            (d.headaches > 0).then(|| (d.headaches as f64 * HEADACHE_BAR_SCALE).min(100.0))
        });

        let datasets = vec![
            Dataset::default()
                .name("Headaches")
                .marker(Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(colors.headache))
                .data(&headaches),
            Dataset::default()
                .name("Sleep Quality %")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(colors.sleep_quality))
                .data(&sleep),
            Dataset::default()
                .name("Stress %")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(colors.stress))
                .data(&stress),
            Dataset::default()
                .name("Avg Pain %")
                .marker(Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(colors.pain))
                .data(&pain),
        ];

        let x_labels: Vec<Line> = self
            .week
            .iter()
            .enumerate()
            .map(|(i, d)| {
                let style = if self.hovered == Some(i) {
                    Style::default()
                        .fg(colors.border_focus)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.text_muted)
                };
                Line::from(Span::styled(d.day.clone(), style))
            })
            .collect();

        let inner = block.inner(area);
        Chart::new(datasets)
            .block(block)
            .hidden_legend_constraints((Constraint::Length(0), Constraint::Length(0)))
            .x_axis(
                Axis::default()
                    .bounds([0.0, (self.week.len().max(2) - 1) as f64])
                    .labels(x_labels)
                    .style(Style::default().fg(colors.border_muted)),
            )
            .y_axis(
                Axis::default()
                    .bounds([0.0, 100.0])
                    .labels(vec![Line::from("0"), Line::from("50"), Line::from("100")])
                    .style(Style::default().fg(colors.border_muted)),
            )
            .render(area, buf);

        let plot = Rect::new(
            inner.x + Y_AXIS_WIDTH,
            inner.y,
            inner.width.saturating_sub(Y_AXIS_WIDTH),
            inner.height,
        );
        self.render_tooltip(plot, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;
    use crate::week::WEEK_DAYS;
    use std::collections::BTreeMap;

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

    fn week() -> Vec<WeekDay> {
        ["Fri", "Sat", "Sun", "Mon", "Tue", "Wed", "Thu"]
            .iter()
            .map(|d| WeekDay {
                day: d.to_string(),
                ..Default::default()
            })
            .collect()
    }

    fn render(week: &[WeekDay], hovered: Option<usize>) -> String {
        let area = Rect::new(0, 0, 90, 18);
        let mut buf = Buffer::empty(area);
        WeeklyChart {
            week,
            hovered,
            focused: false,
            colors: Theme.colors(),
        }
        .render(area, &mut buf);
        screen(&buf)
    }

    #[test]
    fn test_empty_week_shows_empty_state() {
        let text = render(&week(), None);
        assert!(text.contains("No health data logged this week yet."));
        assert!(!text.contains("Headaches"));
    }

    #[test]
    fn test_week_with_data_renders_chart_and_tooltip() {
        let mut week = week();
        week[5] = WeekDay {
            day: "Wed".into(),
            has_data: true,
            sleep_quality_percent: Some(60.0),
            headaches: 2,
            headaches_by_intensity: Some(BTreeMap::from([(6, 2)])),
            ..Default::default()
        };
        assert_eq!(week.len(), WEEK_DAYS);

        let text = render(&week, None);
        assert!(!text.contains("No health data logged"));
        assert!(text.contains("Mon"));
        assert!(text.contains("Headaches"));

        let text = render(&week, Some(5));
        assert!(text.contains("Sleep Quality: 60%"));
        assert!(text.contains("Intensity 6: 2 headaches"));
    }

    #[test]
    fn test_day_at_maps_columns_to_days() {
        let area = Rect::new(0, 0, 75, 10);
        // plot spans columns 6..74
        assert_eq!(WeeklyChart::day_at(area, 7, 2), None);
        assert_eq!(WeeklyChart::day_at(area, 7, 6), Some(0));
        assert_eq!(WeeklyChart::day_at(area, 7, 73), Some(6));
        assert_eq!(WeeklyChart::day_at(area, 0, 30), None);
    }
}
