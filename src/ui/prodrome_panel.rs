//! PRODROME form: catalog grouped by category with multi-select

use super::helpers::truncate_with_ellipsis;
use crate::prodrome::{catalog_len, is_selected, tips_text, CATALOG};
use crate::theme::ThemeColors;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// One rendered row of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormRow {
    Category(usize),
    /// Index into the flattened symptom list
    Symptom(usize),
}

/// Rows in display order: each category header followed by its symptoms
pub fn form_rows() -> Vec<FormRow> {
    let mut rows = Vec::with_capacity(CATALOG.len() + catalog_len());
    let mut flat = 0;
    for (ci, category) in CATALOG.iter().enumerate() {
        rows.push(FormRow::Category(ci));
        for _ in category.symptoms {
            rows.push(FormRow::Symptom(flat));
            flat += 1;
        }
    }
    rows
}

/// Row index of a flattened symptom index
pub fn row_of_symptom(symptom: usize) -> usize {
    form_rows()
        .iter()
        .position(|r| *r == FormRow::Symptom(symptom))
        .unwrap_or(0)
}

/// Scroll offset that keeps `row` visible in a window of `height` rows
pub fn scroll_to(row: usize, height: usize, offset: usize) -> usize {
    if height == 0 {
        return offset;
    }
    if row < offset {
        // Show the category header above the first symptom when scrolling up
        row.saturating_sub(1)
    } else if row >= offset + height {
        row + 1 - height
    } else {
        offset
    }
}

/// Screen regions of the form
#[derive(Debug, Clone, Copy)]
pub struct ProdromeLayout {
    pub list: Rect,
    pub footer: Rect,
}

impl ProdromeLayout {
    pub fn new(area: Rect, has_tips: bool) -> Self {
        let inner = Block::default().borders(Borders::ALL).inner(area);
        let footer_h = if has_tips { 4 } else { 1 };
        let [list, footer] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(footer_h)]).areas(inner);
        Self { list, footer }
    }

    /// Symptom under a pointer row, given the current scroll offset
    pub fn symptom_at(&self, y: u16, offset: usize) -> Option<usize> {
        if y < self.list.y || y >= self.list.y + self.list.height {
            return None;
        }
        match form_rows().get(offset + (y - self.list.y) as usize) {
            Some(FormRow::Symptom(i)) => Some(*i),
            _ => None,
        }
    }
}

pub struct ProdromeSelector<'a> {
    pub selection: &'a [String],
    pub cursor: usize,
    pub offset: usize,
    pub colors: ThemeColors,
}

impl Widget for ProdromeSelector<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = self.colors;
        let count = self.selection.len();
        let tips = tips_text(count);
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(colors.border_focus))
            .title(
                Line::from(Span::styled(
                    " PRODROME SYMPTOMS ",
                    Style::default()
                        .fg(colors.border_focus)
                        .add_modifier(Modifier::BOLD),
                ))
                .alignment(Alignment::Center),
            )
            .title_bottom(
                Line::from(Span::styled(
                    " ↑↓: move │ Space: toggle │ Esc: done ",
                    Style::default().fg(colors.text_muted),
                ))
                .alignment(Alignment::Center),
            )
            .render(area, buf);

        let layout = ProdromeLayout::new(area, tips.is_some());
        let symptoms: Vec<_> = CATALOG.iter().flat_map(|c| c.symptoms.iter()).collect();

        let lines: Vec<Line> = form_rows()
            .into_iter()
            .skip(self.offset)
            .take(layout.list.height as usize)
            .map(|row| match row {
                FormRow::Category(ci) => Line::from(Span::styled(
                    CATALOG[ci].name.to_uppercase(),
                    Style::default()
                        .fg(colors.text_muted)
                        .add_modifier(Modifier::BOLD),
                )),
                FormRow::Symptom(si) => {
                    let symptom = symptoms[si];
                    let checked = is_selected(self.selection, symptom.id);
                    let under_cursor = si == self.cursor;
                    let style = if under_cursor {
                        Style::default()
                            .fg(colors.text_primary)
                            .bg(colors.bg_highlight)
                            .add_modifier(Modifier::BOLD)
                    } else if checked {
                        Style::default().fg(colors.success)
                    } else {
                        Style::default().fg(colors.text_secondary)
                    };
                    let desc_width = (layout.list.width as usize).saturating_sub(34);
                    Line::from(vec![
                        Span::styled(if checked { " [✓] " } else { " [ ] " }, style),
                        Span::styled(format!("{} ", symptom.icon), style),
                        Span::styled(format!("{:<24}", symptom.name), style),
                        Span::styled(
                            truncate_with_ellipsis(symptom.description, desc_width),
                            Style::default().fg(colors.text_muted),
                        ),
                    ])
                }
            })
            .collect();
        Paragraph::new(lines).render(layout.list, buf);

        let mut footer = vec![Line::from(vec![
            Span::styled("Selected: ", Style::default().fg(colors.text_muted)),
            Span::styled(
                count.to_string(),
                Style::default()
                    .fg(if count > 0 { colors.success } else { colors.text_secondary })
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" of {}", catalog_len()),
                Style::default().fg(colors.text_muted),
            ),
        ])];
        if let Some(tip) = tips {
            footer.push(Line::from(Span::styled(
                format!("💡 {}", tip),
                Style::default().fg(colors.warning),
            )));
        }
        Paragraph::new(footer)
            .wrap(Wrap { trim: true })
            .render(layout.footer, buf);
    }
}
