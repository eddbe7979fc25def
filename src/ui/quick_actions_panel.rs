//! QUICK ACTIONS panel: collapsible list of navigation shortcuts

use super::helpers::truncate_with_ellipsis;
use crate::quick_actions::QUICK_ACTIONS;
use crate::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

pub struct QuickActionsPanel {
    pub expanded: bool,
    pub cursor: usize,
    pub focused: bool,
    pub colors: ThemeColors,
}

impl QuickActionsPanel {
    /// Rows needed: borders plus one line per action when expanded
    pub fn height(expanded: bool) -> u16 {
        if expanded {
            QUICK_ACTIONS.len() as u16 + 2
        } else {
            3
        }
    }

    /// Click target that toggles the panel
    pub fn header_rect(area: Rect) -> Rect {
        Rect::new(area.x, area.y, area.width, 1.min(area.height))
    }

    /// One click target per visible action row
    pub fn row_rects(area: Rect, expanded: bool) -> Vec<Rect> {
        if !expanded {
            return Vec::new();
        }
        let inner = Block::default().borders(Borders::ALL).inner(area);
        (0..QUICK_ACTIONS.len() as u16)
            .take_while(|i| *i < inner.height)
            .map(|i| Rect::new(inner.x, inner.y + i, inner.width, 1))
            .collect()
    }
}

impl Widget for QuickActionsPanel {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = self.colors;
        let title_color = if self.focused {
            colors.border_focus
        } else {
            colors.border_default
        };
        let marker = if self.expanded { "▾" } else { "▸" };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(title_color))
            .title(
                Line::from(Span::styled(
                    format!(" {} QUICK ACTIONS ", marker),
                    Style::default()
                        .fg(title_color)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            );
        let inner = block.inner(area);
        block.render(area, buf);

        if !self.expanded {
            Paragraph::new(Span::styled(
                "a/Click title: show shortcuts",
                Style::default().fg(colors.text_muted),
            ))
            .alignment(Alignment::Center)
            .render(inner, buf);
            return;
        }

        for (row, (i, action)) in Self::row_rects(area, true)
            .into_iter()
            .zip(QUICK_ACTIONS.iter().enumerate())
        {
            let selected = self.focused && i == self.cursor;
            let label = truncate_with_ellipsis(action.label, row.width.saturating_sub(6) as usize);
            let style = if selected {
                Style::default()
                    .fg(colors.text_primary)
                    .bg(colors.bg_highlight)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.text_secondary)
            };
            Paragraph::new(Line::from(vec![
                Span::styled(if selected { "● " } else { "  " }, style),
                Span::styled(format!("{} ", action.icon), style),
                Span::styled(label, style),
            ]))
            .style(style)
            .render(row, buf);
        }
    }
}
