use crate::config::Config;
use crate::live_watcher::LiveWatcher;
use crate::metrics::{MetricDay, SwipeTracker};
use crate::prodrome::{self, catalog_len};
use crate::quick_actions::{Route, QUICK_ACTIONS};
use crate::store::{self, HealthSnapshot};
use crate::theme::Theme;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use parking_lot::Mutex;
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::io;
use std::sync::{mpsc, Arc};

mod gauge;
mod helpers;
mod metrics_panel;
mod prodrome_panel;
mod quick_actions_panel;
mod status_panel;
mod weekly_chart;

use helpers::{Panel, PanelRects};
use metrics_panel::{DailyMetricsPanel, MetricsLayout};
use prodrome_panel::{row_of_symptom, scroll_to, ProdromeLayout, ProdromeSelector};
use quick_actions_panel::QuickActionsPanel;
use status_panel::StatusMessages;
use weekly_chart::WeeklyChart;

/// Metrics panel height: header, dots, gauge cards and borders
const METRICS_HEIGHT: u16 = 16;

/// Update requests raised by the panels. All state changes go through `App::apply`.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetMetricDay(MetricDay),
    SetShowQuickActions(bool),
    ProdromeChanged(Vec<String>),
    ClearStatus,
    Navigate(Route),
    Logout,
}

/// Resolves quick-action destinations to views
pub trait Navigator {
    fn navigate(&mut self, route: Route);
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum View {
    Dashboard,
    Prodrome,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Focus {
    Metrics,
    QuickActions,
    Weekly,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Metrics => Focus::QuickActions,
            Focus::QuickActions => Focus::Weekly,
            Focus::Weekly => Focus::Metrics,
        }
    }
}

pub struct App {
    config: Config,
    theme: Theme,
    snapshot: HealthSnapshot,

    // Dashboard state
    current_metric_day: MetricDay,
    swipe: SwipeTracker,
    show_quick_actions: bool,
    quick_action_cursor: usize,
    hovered_week_day: Option<usize>,
    focus: Focus,

    // Prodrome form state
    selected_prodromes: Vec<String>,
    prodrome_cursor: usize,
    prodrome_offset: usize,
    prodrome_layout: Option<ProdromeLayout>,

    error: Option<String>,
    status_message: Option<String>,

    view: View,
    last_route: Option<Route>,
    logged_out: bool,
    exit: bool,

    // Cached panel rectangles for mouse hit-testing
    cached_rects: PanelRects,

    // Live reload
    live_watcher: Option<LiveWatcher>,
    needs_reload: Arc<Mutex<bool>>,
    should_redraw: bool,
    wake_rx: mpsc::Receiver<()>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (snapshot, error) = Self::load_snapshot(&config);
        let (wake_tx, wake_rx) = mpsc::channel();
        let mut app = Self::with_snapshot(config, snapshot, wake_rx);
        app.error = error;
        log::debug!(
            "Swipe threshold {}, prodrome catalog v{}",
            app.swipe.threshold(),
            prodrome::CATALOG_VERSION
        );

        if app.config.live_reload {
            let needs_reload = app.needs_reload.clone();
            let on_event: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
                let _ = wake_tx.send(());
            });
            let on_change: Arc<dyn Fn() + Send + Sync> = Arc::new(move || {
                *needs_reload.lock() = true;
            });
            match LiveWatcher::new(app.config.source.path().clone(), on_event, on_change) {
                Ok(mut watcher) => match watcher.start() {
                    Ok(()) => app.live_watcher = Some(watcher),
                    Err(e) => log::error!("Failed to start live watcher: {}", e),
                },
                Err(e) => log::error!("Failed to create live watcher: {}", e),
            }
        }
        app
    }

    fn with_snapshot(config: Config, snapshot: HealthSnapshot, wake_rx: mpsc::Receiver<()>) -> Self {
        Self {
            swipe: SwipeTracker::new(config.swipe_threshold),
            config,
            theme: Theme,
            snapshot,
            current_metric_day: MetricDay::TODAY,
            show_quick_actions: false,
            quick_action_cursor: 0,
            hovered_week_day: None,
            focus: Focus::Metrics,
            selected_prodromes: Vec::new(),
            prodrome_cursor: 0,
            prodrome_offset: 0,
            prodrome_layout: None,
            error: None,
            status_message: None,
            view: View::Dashboard,
            last_route: None,
            logged_out: false,
            exit: false,
            cached_rects: PanelRects::default(),
            live_watcher: None,
            needs_reload: Arc::new(Mutex::new(false)),
            should_redraw: true,
            wake_rx,
        }
    }

    fn load_snapshot(config: &Config) -> (HealthSnapshot, Option<String>) {
        let today = chrono::Local::now().date_naive();
        match store::load(&config.source, today) {
            Ok(snapshot) => {
                log::info!("Loaded health data from {}", config.source.path().display());
                (snapshot, None)
            }
            Err(e) => {
                log::error!("Failed to load {}: {}", config.source.path().display(), e);
                (HealthSnapshot::default(), Some(e.to_string()))
            }
        }
    }

    pub fn logged_out(&self) -> bool {
        self.logged_out
    }

    /// Reload data, keeping the selected day and form state
    pub fn reload(&mut self) {
        let (snapshot, error) = Self::load_snapshot(&self.config);
        self.snapshot = snapshot;
        self.error = error;
        if self
            .hovered_week_day
            .is_some_and(|i| i >= self.snapshot.week.len())
        {
            self.hovered_week_day = None;
        }
        self.should_redraw = true;
        log::debug!("Health data reloaded");
    }

    /// Apply an update request raised by a panel
    pub fn apply(&mut self, action: Action) {
        match action {
            Action::SetMetricDay(day) => {
                if day != self.current_metric_day {
                    log::debug!("Metric day {} -> {}", self.current_metric_day.index(), day.index());
                }
                self.current_metric_day = day;
            }
            Action::SetShowQuickActions(show) => {
                self.show_quick_actions = show;
                if show {
                    self.quick_action_cursor = self.quick_action_cursor.min(QUICK_ACTIONS.len() - 1);
                }
            }
            Action::ProdromeChanged(selection) => {
                log::debug!("Prodrome selection: {:?}", selection);
                self.selected_prodromes = selection;
            }
            Action::ClearStatus => {
                self.error = None;
                self.status_message = None;
            }
            Action::Navigate(route) => self.navigate(route),
            Action::Logout => {
                log::info!("Logout requested");
                self.logged_out = true;
                self.exit = true;
            }
        }
        self.should_redraw = true;
    }

    fn go_prev(&self) -> Action {
        Action::SetMetricDay(self.current_metric_day.prev())
    }

    fn go_next(&self) -> Action {
        Action::SetMetricDay(self.current_metric_day.next())
    }

    fn toggle_prodrome(&self, symptom: usize) -> Option<Action> {
        let (category, s) = prodrome::iter_symptoms().nth(symptom)?;
        log::debug!("Toggling prodrome {}/{}", category.id, s.id);
        Some(Action::ProdromeChanged(prodrome::toggle(
            &self.selected_prodromes,
            s.id,
        )))
    }

    fn close_prodrome_form(&mut self) {
        self.view = View::Dashboard;
        let count = self.selected_prodromes.len();
        if count > 0 {
            let names: Vec<&str> = self
                .selected_prodromes
                .iter()
                .filter_map(|id| prodrome::find_symptom(id).map(|s| s.name))
                .collect();
            self.status_message = Some(format!(
                "Noted {} prodrome symptom{}: {}",
                count,
                if count == 1 { "" } else { "s" },
                names.join(", ")
            ));
        } else {
            self.status_message = None;
        }
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> io::Result<()> {
        self.should_redraw = true;

        while !self.exit {
            // Short poll: 30ms keeps UI responsive while saving CPU.
            // The wake channel from the file watcher will also wake us.
            if event::poll(std::time::Duration::from_millis(30))? {
                while event::poll(std::time::Duration::from_millis(0))? {
                    match event::read()? {
                        Event::Key(key) => {
                            if key.kind == KeyEventKind::Press {
                                self.handle_key_event(key);
                                self.should_redraw = true;
                                if self.exit {
                                    return Ok(());
                                }
                            }
                        }
                        Event::Resize(_, _) => {
                            self.should_redraw = true;
                        }
                        Event::Mouse(mouse) => {
                            if self.handle_mouse_event(mouse) {
                                self.should_redraw = true;
                            }
                            if self.exit {
                                return Ok(());
                            }
                        }
                        Event::FocusLost => self.swipe.cancel(),
                        Event::FocusGained | Event::Paste(_) => {}
                    }
                }
            }

            // Drain wake signals from file watcher (non-blocking)
            while self.wake_rx.try_recv().is_ok() {}

            if let Some(watcher) = &self.live_watcher {
                watcher.process_changes();
            }

            let reload = std::mem::take(&mut *self.needs_reload.lock());
            if reload {
                self.reload();
            }

            if self.should_redraw {
                terminal.draw(|frame| self.render(frame))?;
                self.should_redraw = false;
            }
        }

        Ok(())
    }

    fn handle_key_event(&mut self, key: crossterm::event::KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.exit = true;
            return;
        }

        if self.view == View::Prodrome {
            self.handle_prodrome_key(key.code);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                if self.hovered_week_day.is_some() {
                    self.hovered_week_day = None;
                } else {
                    self.exit = true;
                }
            }
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::Char(c @ '1'..='3') => {
                let index = c as i64 - '1' as i64;
                self.apply(Action::SetMetricDay(MetricDay::clamped(index)));
            }
            KeyCode::Left | KeyCode::Char('h') => {
                if self.focus == Focus::Weekly {
                    self.move_week_hover(-1);
                } else {
                    self.apply(self.go_prev());
                }
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.focus == Focus::Weekly {
                    self.move_week_hover(1);
                } else {
                    self.apply(self.go_next());
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.focus == Focus::QuickActions && self.show_quick_actions {
                    self.quick_action_cursor = self.quick_action_cursor.saturating_sub(1);
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.focus == Focus::QuickActions && self.show_quick_actions {
                    self.quick_action_cursor =
                        (self.quick_action_cursor + 1).min(QUICK_ACTIONS.len() - 1);
                }
            }
            KeyCode::Enter => {
                if self.focus == Focus::QuickActions {
                    if self.show_quick_actions {
                        let route = QUICK_ACTIONS[self.quick_action_cursor].route;
                        self.apply(Action::Navigate(route));
                    } else {
                        self.apply(Action::SetShowQuickActions(true));
                    }
                }
            }
            KeyCode::Char('a') => {
                self.focus = Focus::QuickActions;
                self.apply(Action::SetShowQuickActions(!self.show_quick_actions));
            }
            KeyCode::Char('p') => self.apply(Action::Navigate(Route::Prodrome)),
            KeyCode::Char('x') => self.apply(Action::ClearStatus),
            KeyCode::Char('r') => self.reload(),
            KeyCode::Char('L') => self.apply(Action::Logout),
            _ => {}
        }
    }

    fn handle_prodrome_key(&mut self, code: KeyCode) {
        let visible = self
            .prodrome_layout
            .map(|l| l.list.height as usize)
            .unwrap_or(0);
        match code {
            KeyCode::Esc | KeyCode::Char('q') => self.close_prodrome_form(),
            KeyCode::Up | KeyCode::Char('k') => {
                self.prodrome_cursor = self.prodrome_cursor.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.prodrome_cursor = (self.prodrome_cursor + 1).min(catalog_len() - 1);
            }
            KeyCode::Char(' ') | KeyCode::Enter => {
                if let Some(action) = self.toggle_prodrome(self.prodrome_cursor) {
                    self.apply(action);
                }
            }
            KeyCode::Char('x') => self.apply(Action::ClearStatus),
            _ => {}
        }
        self.prodrome_offset = scroll_to(
            row_of_symptom(self.prodrome_cursor),
            visible,
            self.prodrome_offset,
        );
    }

    fn move_week_hover(&mut self, delta: isize) {
        let len = self.snapshot.week.len();
        if len == 0 {
            return;
        }
        let next = match self.hovered_week_day {
            Some(i) => (i as isize + delta).clamp(0, len as isize - 1) as usize,
            None if delta < 0 => len - 1,
            None => 0,
        };
        self.hovered_week_day = Some(next);
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> bool {
        let (x, y) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if self.view == View::Prodrome {
                    return self.handle_prodrome_click(y);
                }
                self.handle_dashboard_click(x, y)
            }
            MouseEventKind::Up(MouseButton::Left) => {
                if !self.swipe.is_tracking() {
                    return false;
                }
                match self.swipe.end(x as i32) {
                    Some(swipe) => {
                        log::debug!("Swipe {:?}", swipe);
                        self.apply(Action::SetMetricDay(swipe.apply(self.current_metric_day)));
                        true
                    }
                    None => false,
                }
            }
            MouseEventKind::Moved => {
                if self.view != View::Dashboard {
                    return false;
                }
                let hovered = match self.cached_rects.weekly {
                    Some(rect) if PanelRects::contains_point(Some(rect), x, y) => {
                        WeeklyChart::day_at(rect, self.snapshot.week.len(), x)
                    }
                    _ => None,
                };
                let changed = hovered != self.hovered_week_day;
                self.hovered_week_day = hovered;
                changed
            }
            MouseEventKind::ScrollUp | MouseEventKind::ScrollDown if self.view == View::Prodrome => {
                let up = mouse.kind == MouseEventKind::ScrollUp;
                self.handle_prodrome_key(if up { KeyCode::Up } else { KeyCode::Down });
                true
            }
            MouseEventKind::Down(MouseButton::Right) => {
                if self.view == View::Prodrome {
                    self.close_prodrome_form();
                } else {
                    self.exit = true;
                }
                true
            }
            _ => false,
        }
    }

    fn handle_dashboard_click(&mut self, x: u16, y: u16) -> bool {
        let Some(panel) = self.cached_rects.find_panel(x, y) else {
            return false;
        };
        match panel {
            Panel::StatusDismiss => self.apply(Action::ClearStatus),
            Panel::MetricsPrev => {
                self.focus = Focus::Metrics;
                self.apply(self.go_prev());
            }
            Panel::MetricsNext => {
                self.focus = Focus::Metrics;
                self.apply(self.go_next());
            }
            Panel::Metrics => {
                self.focus = Focus::Metrics;
                self.swipe.start(x as i32);
            }
            Panel::QuickActionsHeader => {
                self.focus = Focus::QuickActions;
                self.apply(Action::SetShowQuickActions(!self.show_quick_actions));
            }
            Panel::QuickAction(i) => {
                self.focus = Focus::QuickActions;
                self.quick_action_cursor = i;
                self.apply(Action::Navigate(QUICK_ACTIONS[i].route));
            }
            Panel::Weekly => {
                self.focus = Focus::Weekly;
                if let Some(rect) = self.cached_rects.weekly {
                    self.hovered_week_day =
                        WeeklyChart::day_at(rect, self.snapshot.week.len(), x);
                }
            }
            Panel::Prodrome => {}
        }
        true
    }

    fn handle_prodrome_click(&mut self, y: u16) -> bool {
        let Some(layout) = self.prodrome_layout else {
            return false;
        };
        match layout.symptom_at(y, self.prodrome_offset) {
            Some(symptom) => {
                self.prodrome_cursor = symptom;
                if let Some(action) = self.toggle_prodrome(symptom) {
                    self.apply(action);
                }
                true
            }
            None => false,
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        self.cached_rects = PanelRects::default();
        let [main, status_bar] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(frame.area());

        let colors = self.theme.colors();
        let status = StatusMessages::new(
            self.error.as_deref(),
            self.status_message.as_deref(),
            colors,
        )
        .dismissible(self.view == View::Dashboard);
        let [status_area, body] =
            Layout::vertical([Constraint::Length(status.height()), Constraint::Min(0)])
                .areas(main);
        self.cached_rects.status_dismiss = status.dismiss_rects(status_area);
        frame.render_widget(status, status_area);

        match self.view {
            View::Dashboard => self.render_dashboard(frame, body),
            View::Prodrome => self.render_prodrome(frame, body),
        }
        self.render_status_bar(frame, status_bar);
    }

    fn render_dashboard(&mut self, frame: &mut Frame, area: Rect) {
        let colors = self.theme.colors();
        let [metrics_area, actions_area, weekly_area] = Layout::vertical([
            Constraint::Length(METRICS_HEIGHT),
            Constraint::Length(QuickActionsPanel::height(self.show_quick_actions)),
            Constraint::Min(8),
        ])
        .areas(area);

        let layout = MetricsLayout::new(metrics_area);
        self.cached_rects.metrics = Some(metrics_area);
        self.cached_rects.metrics_prev = Some(layout.prev);
        self.cached_rects.metrics_next = Some(layout.next);
        frame.render_widget(
            DailyMetricsPanel {
                metrics: &self.snapshot.daily_metrics,
                current: self.current_metric_day,
                focused: self.focus == Focus::Metrics,
                colors,
            },
            metrics_area,
        );

        self.cached_rects.quick_actions_header = Some(QuickActionsPanel::header_rect(actions_area));
        self.cached_rects.quick_action_rows =
            QuickActionsPanel::row_rects(actions_area, self.show_quick_actions);
        frame.render_widget(
            QuickActionsPanel {
                expanded: self.show_quick_actions,
                cursor: self.quick_action_cursor,
                focused: self.focus == Focus::QuickActions,
                colors,
            },
            actions_area,
        );

        self.cached_rects.weekly = Some(weekly_area);
        frame.render_widget(
            WeeklyChart {
                week: &self.snapshot.week,
                hovered: self.hovered_week_day,
                focused: self.focus == Focus::Weekly,
                colors,
            },
            weekly_area,
        );
    }

    fn render_prodrome(&mut self, frame: &mut Frame, area: Rect) {
        let layout = ProdromeLayout::new(
            area,
            prodrome::tips_text(self.selected_prodromes.len()).is_some(),
        );
        self.prodrome_offset = scroll_to(
            row_of_symptom(self.prodrome_cursor),
            layout.list.height as usize,
            self.prodrome_offset,
        );
        self.prodrome_layout = Some(layout);
        self.cached_rects.prodrome = Some(area);
        frame.render_widget(
            ProdromeSelector {
                selection: &self.selected_prodromes,
                cursor: self.prodrome_cursor,
                offset: self.prodrome_offset,
                colors: self.theme.colors(),
            },
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let colors = self.theme.colors();
        let k = Style::default()
            .fg(colors.text_muted)
            .add_modifier(Modifier::BOLD);
        let t = Style::default().fg(colors.border_muted);
        let sep = Span::styled(" │ ", Style::default().fg(colors.bg_highlight));

        let mut spans: Vec<Span> = Vec::with_capacity(16);
        if self.view == View::Prodrome {
            spans.extend_from_slice(&[
                Span::styled("↑↓/Scroll", k),
                Span::styled(" move", t),
                sep.clone(),
                Span::styled("Space/Click", k),
                Span::styled(" toggle", t),
                sep.clone(),
                Span::styled("Esc/Right-click", k),
                Span::styled(" done", t),
            ]);
        } else {
            spans.extend_from_slice(&[
                Span::styled("←→/Swipe", k),
                Span::styled(" day", t),
                sep.clone(),
                Span::styled("Tab", k),
                Span::styled(" focus", t),
                sep.clone(),
                Span::styled("a", k),
                Span::styled(" actions", t),
                sep.clone(),
                Span::styled("p", k),
                Span::styled(" prodrome", t),
            ]);
            if self.error.is_some() || self.status_message.is_some() {
                spans.extend_from_slice(&[
                    sep.clone(),
                    Span::styled("x", k),
                    Span::styled(" dismiss", t),
                ]);
            }
            spans.extend_from_slice(&[
                sep.clone(),
                Span::styled("L", k),
                Span::styled(" logout", t),
                sep.clone(),
                Span::styled("q", k),
                Span::styled(" quit", t),
            ]);
        }

        let status_bar = Paragraph::new(Line::from(spans))
            .style(Style::default().bg(colors.bg_status_bar))
            .alignment(Alignment::Center);
        frame.render_widget(status_bar, area);
    }
}

impl Navigator for App {
    fn navigate(&mut self, route: Route) {
        log::info!("Navigate to {}", route.title());
        self.last_route = Some(route);
        match route {
            Route::Prodrome => {
                self.view = View::Prodrome;
                self.prodrome_cursor = 0;
                self.prodrome_offset = 0;
            }
            Route::History => {
                self.view = View::Dashboard;
                self.focus = Focus::Weekly;
                self.hovered_week_day = self
                    .snapshot
                    .week
                    .iter()
                    .rposition(|d| d.has_data)
                    .or_else(|| self.snapshot.week.len().checked_sub(1));
            }
            other => {
                self.status_message = Some(format!("Opening {}", other.title()));
            }
        }
    }
}
