//! Error and success banners

use crate::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use unicode_width::UnicodeWidthStr;

const DISMISS: &str = " ✕ ";

pub struct StatusMessages<'a> {
    pub error: Option<&'a str>,
    pub status_message: Option<&'a str>,
    /// Show a dismiss button on each banner
    pub dismissible: bool,
    pub colors: ThemeColors,
}

impl<'a> StatusMessages<'a> {
    pub fn new(error: Option<&'a str>, status_message: Option<&'a str>, colors: ThemeColors) -> Self {
        Self {
            error: error.filter(|e| !e.is_empty()),
            status_message: status_message.filter(|s| !s.is_empty()),
            dismissible: true,
            colors,
        }
    }

    pub fn dismissible(mut self, dismissible: bool) -> Self {
        self.dismissible = dismissible;
        self
    }

    /// Number of banners that will be drawn
    pub fn banner_count(&self) -> u16 {
        self.error.is_some() as u16 + self.status_message.is_some() as u16
    }

    /// Rows needed; zero when there is nothing to show
    #[inline]
    pub fn height(&self) -> u16 {
        self.banner_count()
    }

    /// Click targets of the dismiss buttons, one per banner
    pub fn dismiss_rects(&self, area: Rect) -> Vec<Rect> {
        let w = DISMISS.width() as u16;
        if !self.dismissible || area.width < w {
            return Vec::new();
        }
        (0..self.banner_count().min(area.height))
            .map(|i| Rect::new(area.x + area.width - w, area.y + i, w, 1))
            .collect()
    }

    fn banner(&self, icon: &str, text: &str, fg: ratatui::style::Color) -> Line<'static> {
        let mut spans = vec![
            Span::styled(
                format!(" {} ", icon),
                Style::default().fg(fg).add_modifier(Modifier::BOLD),
            ),
            Span::styled(text.to_string(), Style::default().fg(self.colors.text_primary)),
        ];
        if self.dismissible {
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

impl Widget for StatusMessages<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if self.banner_count() == 0 || area.height == 0 {
            return;
        }

        let mut banners: Vec<(Line<'static>, ratatui::style::Color)> = Vec::with_capacity(2);
        if let Some(error) = self.error {
            banners.push((self.banner("⚠", error, self.colors.error), self.colors.error));
        }
        if let Some(status) = self.status_message {
            banners.push((self.banner("✔", status, self.colors.success), self.colors.success));
        }

        let dismiss = self.dismiss_rects(area);
        for (i, (line, accent)) in banners.into_iter().enumerate() {
            if i as u16 >= area.height {
                break;
            }
            let row = Rect::new(area.x, area.y + i as u16, area.width, 1);
            Paragraph::new(line)
                .style(Style::default().bg(self.colors.bg_highlight))
                .render(row, buf);
            if let Some(button) = dismiss.get(i) {
                Paragraph::new(Span::styled(
                    DISMISS,
                    Style::default().fg(accent).add_modifier(Modifier::BOLD),
                ))
                .render(*button, buf);
            }
        }
    }
}
