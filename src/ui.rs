use crate::calendar::{self, month_grid, EventEntry, MonthCursor};
use crate::filter::{filter_projects, FilterCriteria};
use crate::format::{
    days_until, days_until_label, format_count, format_date, parse_hex_color, phase_color,
    status_color,
};
use crate::model::{Dataset, Phase, Project};
use crate::route::{NavSection, Route};
use anyhow::Result;
use chrono::{Datelike, Local, NaiveDate, NaiveDateTime};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Alignment, Color, Modifier, Rect, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Bar, BarChart, BarGroup, Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
};
use ratatui::Terminal;
use std::collections::HashSet;
use std::io::{stdout, Stdout};
use std::path::PathBuf;
use std::time::Duration;

pub fn run(dataset: Dataset, source: PathBuf, initial: Route) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let mut app = App::new(dataset, source, initial);
    let result = app.event_loop(&mut terminal);
    teardown_terminal(&mut terminal)?;
    result
}

/// Full-screen terminal state for a failed dataset load. No routing happens;
/// the only accepted input is leaving.
pub fn run_load_error(message: &str) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = load_error_loop(&mut terminal, message);
    teardown_terminal(&mut terminal)?;
    result
}

struct App {
    dataset: Dataset,
    source: PathBuf,
    route: Route,
    criteria: FilterCriteria,
    filtered: Vec<usize>,
    selected_project: usize,
    project_offset: usize,
    search_focused: bool,
    detail: DetailState,
    calendar: CalendarState,
    overlay: Option<EventOverlay>,
    status: String,
}

struct DetailState {
    area_idx: usize,
    expanded: HashSet<String>,
}

struct CalendarState {
    cursor: MonthCursor,
    selected_day: u32,
}

struct EventOverlay {
    date: NaiveDate,
    events: Vec<EventEntry>,
    idx: usize,
}

impl DetailState {
    fn new() -> Self {
        DetailState {
            area_idx: 0,
            expanded: HashSet::new(),
        }
    }
}

impl App {
    fn new(dataset: Dataset, source: PathBuf, initial: Route) -> Self {
        let today = Local::now().naive_local().date();
        let filtered = (0..dataset.projects.len()).collect();
        let mut app = App {
            dataset,
            source,
            route: Route::Dashboard,
            criteria: FilterCriteria::default(),
            filtered,
            selected_project: 0,
            project_offset: 0,
            search_focused: false,
            detail: DetailState::new(),
            calendar: CalendarState {
                cursor: MonthCursor::from_date(today),
                selected_day: today.day(),
            },
            overlay: None,
            status: String::new(),
        };
        app.navigate(initial);
        app.status = format!(
            "Loaded {} projects from {}",
            app.dataset.projects.len(),
            app.source.display()
        );
        app
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;
            if event::poll(Duration::from_millis(200))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key)? {
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if self.overlay.is_some() {
            if key.code == KeyCode::Char('q') {
                return Ok(true);
            }
            self.handle_overlay_key(key);
            return Ok(false);
        }
        if self.search_focused {
            self.handle_search_key(key);
            return Ok(false);
        }
        match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('1') => {
                self.navigate(Route::Dashboard);
                return Ok(false);
            }
            KeyCode::Char('2') => {
                self.navigate(Route::Projects);
                return Ok(false);
            }
            KeyCode::Char('3') => {
                self.navigate(Route::Calendar);
                return Ok(false);
            }
            KeyCode::Char('4') => {
                self.navigate(Route::About);
                return Ok(false);
            }
            _ => {}
        }

        match self.route.clone() {
            Route::Dashboard => {}
            Route::Projects => self.handle_projects_key(key),
            Route::ProjectDetail(id) => self.handle_detail_key(&id, key),
            Route::Calendar => self.handle_calendar_key(key),
            Route::About => {}
            Route::NotFound(_) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.navigate(Route::Dashboard);
                }
            }
        }
        Ok(false)
    }

    /// Single entry point for route changes, whether they come from the
    /// initial `--route` fragment or from a key press.
    fn navigate(&mut self, route: Route) {
        if route == Route::Projects {
            self.criteria = FilterCriteria::default();
            self.selected_project = 0;
            self.project_offset = 0;
            self.search_focused = false;
            self.refresh_filter();
        }
        if let Route::ProjectDetail(_) = route {
            self.detail = DetailState::new();
        }
        if route == Route::Calendar {
            self.clamp_calendar_day();
        }
        self.overlay = None;
        self.status = match &route {
            Route::NotFound(_) => format!("Unknown route {}", route.fragment()),
            _ => format!("Viewing {}", route.fragment()),
        };
        self.route = route;
    }

    fn refresh_filter(&mut self) {
        self.filtered = filter_projects(&self.dataset.projects, &self.criteria);
        if self.filtered.is_empty() {
            self.selected_project = 0;
            self.project_offset = 0;
        } else {
            self.selected_project = self.selected_project.min(self.filtered.len() - 1);
        }
    }

    fn handle_projects_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('f') | KeyCode::Char('F') => {
                self.search_focused = true;
                self.status = "Search: type to filter, Enter/Esc to leave".into();
            }
            KeyCode::Char('o') => self.cycle_osc(),
            KeyCode::Char('c') => self.cycle_category(),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.selected_project > 0 {
                    self.selected_project -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_project + 1 < self.filtered.len() {
                    self.selected_project += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(&idx) = self.filtered.get(self.selected_project) {
                    let id = self.dataset.projects[idx].id.clone();
                    self.navigate(Route::ProjectDetail(id));
                }
            }
            _ => {}
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.search_focused = false;
                self.status = format!("{} projects match", self.filtered.len());
            }
            KeyCode::Backspace => {
                self.criteria.search.pop();
                self.refresh_filter();
            }
            KeyCode::Char(c) => {
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                {
                    self.criteria.search.push(c);
                    self.refresh_filter();
                }
            }
            _ => {}
        }
    }

    fn handle_detail_key(&mut self, id: &str, key: KeyEvent) {
        if self.dataset.project_by_id(id).is_none() {
            match key.code {
                KeyCode::Enter | KeyCode::Esc => self.navigate(Route::Dashboard),
                KeyCode::Backspace => self.navigate(Route::Projects),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Backspace => self.navigate(Route::Projects),
            KeyCode::Up | KeyCode::Char('k') => {
                if self.detail.area_idx > 0 {
                    self.detail.area_idx -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let areas = self
                    .dataset
                    .project_by_id(id)
                    .map(|p| p.responsibles.len())
                    .unwrap_or(0);
                if self.detail.area_idx + 1 < areas {
                    self.detail.area_idx += 1;
                }
            }
            KeyCode::Enter => {
                let area = self
                    .dataset
                    .project_by_id(id)
                    .and_then(|p| p.responsibles.keys().nth(self.detail.area_idx))
                    .cloned();
                if let Some(area) = area {
                    if !self.detail.expanded.remove(&area) {
                        self.detail.expanded.insert(area);
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_calendar_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('p') => self.change_month(-1),
            KeyCode::Char('n') => self.change_month(1),
            KeyCode::Left | KeyCode::Char('h') => self.move_calendar_day(-1),
            KeyCode::Right | KeyCode::Char('l') => self.move_calendar_day(1),
            KeyCode::Up | KeyCode::Char('k') => self.move_calendar_day(-7),
            KeyCode::Down | KeyCode::Char('j') => self.move_calendar_day(7),
            KeyCode::Enter => self.open_day_overlay(),
            _ => {}
        }
    }

    fn handle_overlay_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.overlay = None,
            KeyCode::Tab => {
                if let Some(overlay) = &mut self.overlay {
                    if !overlay.events.is_empty() {
                        overlay.idx = (overlay.idx + 1) % overlay.events.len();
                    }
                }
            }
            KeyCode::Enter => {
                let target = self
                    .overlay
                    .as_ref()
                    .and_then(|overlay| overlay.events.get(overlay.idx))
                    .map(|entry| entry.project);
                if let Some(idx) = target {
                    if let Some(project) = self.dataset.projects.get(idx) {
                        let id = project.id.clone();
                        self.navigate(Route::ProjectDetail(id));
                    }
                }
            }
            _ => {}
        }
    }

    fn cycle_osc(&mut self) {
        let keys: Vec<String> = self
            .dataset
            .organization_keys()
            .iter()
            .map(|key| key.to_string())
            .collect();
        self.criteria.osc = cycle_option(self.criteria.osc.take(), &keys);
        self.refresh_filter();
        self.status = match &self.criteria.osc {
            Some(key) => format!("Organization: {}", self.dataset.organization_name(key)),
            None => "Organization: all".into(),
        };
    }

    fn cycle_category(&mut self) {
        let categories: Vec<String> = self
            .dataset
            .categories()
            .iter()
            .map(|category| category.to_string())
            .collect();
        self.criteria.category = cycle_option(self.criteria.category.take(), &categories);
        self.refresh_filter();
        self.status = match &self.criteria.category {
            Some(category) => format!("Category: {}", category),
            None => "Category: all".into(),
        };
    }

    fn change_month(&mut self, delta: i32) {
        self.calendar.cursor = self.calendar.cursor.advance(delta);
        self.clamp_calendar_day();
        self.status = format!("Calendar: {}", self.calendar.cursor.title());
    }

    fn move_calendar_day(&mut self, delta: i64) {
        let days = calendar::days_in_month(self.calendar.cursor.year, self.calendar.cursor.month);
        if days == 0 {
            return;
        }
        let day = (self.calendar.selected_day as i64 + delta).clamp(1, days as i64);
        self.calendar.selected_day = day as u32;
    }

    fn clamp_calendar_day(&mut self) {
        let days = calendar::days_in_month(self.calendar.cursor.year, self.calendar.cursor.month);
        self.calendar.selected_day = self.calendar.selected_day.clamp(1, days.max(1));
    }

    fn open_day_overlay(&mut self) {
        let date = match NaiveDate::from_ymd_opt(
            self.calendar.cursor.year,
            self.calendar.cursor.month,
            self.calendar.selected_day,
        ) {
            Some(date) => date,
            None => return,
        };
        let events = calendar::events_on(&self.dataset.projects, date);
        if events.is_empty() {
            self.status = format!("No events on {}", format_date(date));
            return;
        }
        self.overlay = Some(EventOverlay {
            date,
            events,
            idx: 0,
        });
    }

    fn draw(&mut self, f: &mut ratatui::Frame<'_>) {
        let now = Local::now().naive_local();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(f.size());

        self.draw_header(f, layout[0]);
        match self.route.clone() {
            Route::Dashboard => self.draw_dashboard(f, layout[1], now),
            Route::Projects => self.draw_projects(f, layout[1], now),
            Route::ProjectDetail(id) => self.draw_detail(f, layout[1], &id, now),
            Route::Calendar => self.draw_calendar(f, layout[1]),
            Route::About => self.draw_about(f, layout[1]),
            Route::NotFound(_) => self.draw_not_found(f, layout[1]),
        }
        self.draw_footer(f, layout[2]);

        if self.overlay.is_some() {
            self.draw_overlay(f, now);
        }
    }

    fn draw_header(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let active = self.route.section();
        let mut spans = vec![Span::styled(
            "groove ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];
        for section in NavSection::ALL {
            spans.push(Span::raw(" "));
            let style = if active == Some(section) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {} ", section.title()), style));
        }
        spans.push(Span::raw("  •  "));
        spans.push(Span::styled(
            self.route.fragment(),
            Style::default().fg(Color::Magenta),
        ));
        spans.push(Span::raw("  •  "));
        spans.push(Span::styled(
            self.source.display().to_string(),
            Style::default().fg(Color::DarkGray),
        ));

        let block = Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_dashboard(&self, f: &mut ratatui::Frame<'_>, area: Rect, now: NaiveDateTime) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(6)])
            .split(area);
        self.draw_kpis(f, rows[0]);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(rows[1]);
        self.draw_competitor_chart(f, columns[0]);
        self.draw_upcoming(f, columns[1], now);
    }

    fn draw_kpis(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let cards = kpi_cards(&self.dataset);
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Percentage(25); 4])
            .split(area);
        for (idx, (label, value)) in cards.iter().enumerate() {
            let block = Block::default()
                .title(Span::styled(*label, Style::default().fg(Color::Gray)))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color_for_index(idx)));
            let paragraph = Paragraph::new(Line::from(Span::styled(
                value.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(block);
            if let Some(chunk) = chunks.get(idx) {
                f.render_widget(paragraph, *chunk);
            }
        }
    }

    fn draw_competitor_chart(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let bars: Vec<Bar> = self
            .dataset
            .competitors
            .values()
            .enumerate()
            .map(|(idx, competitor)| {
                Bar::default()
                    .value(competitor.followers)
                    .text_value(format_count(competitor.followers))
                    .label(Line::from(truncate_text(&competitor.name, 14)))
                    .style(Style::default().fg(chart_color(idx)))
            })
            .collect();
        let chart = BarChart::default()
            .block(
                Block::default()
                    .title(Span::styled(
                        "Competitor followers",
                        Style::default()
                            .fg(Color::Gray)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray)),
            )
            .data(BarGroup::default().bars(&bars))
            .bar_width(16)
            .bar_gap(2);
        f.render_widget(chart, area);
    }

    fn draw_upcoming(&self, f: &mut ratatui::Frame<'_>, area: Rect, now: NaiveDateTime) {
        let upcoming = upcoming_projects(&self.dataset.projects, 5);
        let items: Vec<ListItem> = if upcoming.is_empty() {
            vec![ListItem::new("No scheduled events")]
        } else {
            upcoming
                .iter()
                .map(|&idx| upcoming_item(&self.dataset.projects[idx], now))
                .collect()
        };
        let list = List::new(items).block(
            Block::default()
                .title(Span::styled(
                    "Next events",
                    Style::default()
                        .fg(Color::Gray)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(list, area);
    }

    fn draw_projects(&mut self, f: &mut ratatui::Frame<'_>, area: Rect, now: NaiveDateTime) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(4)])
            .split(area);
        self.draw_filter_bar(f, rows[0]);
        self.draw_project_list(f, rows[1], now);
    }

    fn draw_filter_bar(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let search_style = if self.search_focused {
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let search_text = if self.search_focused {
            format!("{}▌", self.criteria.search)
        } else if self.criteria.search.is_empty() {
            "(press f to search)".to_string()
        } else {
            self.criteria.search.clone()
        };
        let osc_text = match &self.criteria.osc {
            Some(key) => self.dataset.organization_name(key).to_string(),
            None => "all".to_string(),
        };
        let category_text = self
            .criteria
            .category
            .clone()
            .unwrap_or_else(|| "all".to_string());
        let line = Line::from(vec![
            Span::styled("Search ", Style::default().fg(Color::Gray)),
            Span::styled(search_text, search_style),
            Span::raw("  •  "),
            Span::styled("OSC ", Style::default().fg(Color::Gray)),
            Span::styled(osc_text, Style::default().fg(Color::LightGreen)),
            Span::raw("  •  "),
            Span::styled("Category ", Style::default().fg(Color::Gray)),
            Span::styled(category_text, Style::default().fg(Color::LightMagenta)),
        ]);
        let block = Block::default()
            .title(Span::styled(
                format!("Filters ({} match)", self.filtered.len()),
                Style::default().fg(Color::Gray),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(if self.search_focused {
                Color::Cyan
            } else {
                Color::DarkGray
            }));
        f.render_widget(Paragraph::new(line).block(block), area);
    }

    fn draw_project_list(&mut self, f: &mut ratatui::Frame<'_>, area: Rect, now: NaiveDateTime) {
        let width = area.width.saturating_sub(2);
        let items: Vec<ListItem> = if self.filtered.is_empty() {
            vec![ListItem::new("No projects match the current filters")]
        } else {
            self.filtered
                .iter()
                .enumerate()
                .map(|(pos, &idx)| {
                    project_card(
                        &self.dataset,
                        &self.dataset.projects[idx],
                        width,
                        pos == self.selected_project,
                        now,
                    )
                })
                .collect()
        };
        let mut state = ListState::default();
        let viewport = (area.height.saturating_sub(2) as usize / 3).max(1);
        let offset = adjust_offset(
            self.selected_project,
            self.project_offset,
            viewport,
            1,
            self.filtered.len(),
        );
        self.project_offset = offset;
        if !self.filtered.is_empty() {
            state.select(Some(self.selected_project));
        }
        *state.offset_mut() = offset;

        let block = Block::default()
            .title(Span::styled(
                "Projects",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let list = List::new(items).block(block);
        f.render_stateful_widget(list, area, &mut state);
    }

    fn draw_detail(&self, f: &mut ratatui::Frame<'_>, area: Rect, id: &str, now: NaiveDateTime) {
        let project = match self.dataset.project_by_id(id) {
            Some(project) => project,
            None => {
                self.draw_not_found(f, area);
                return;
            }
        };
        let lines = detail_lines(&self.dataset, project, &self.detail, now);
        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(Span::styled(
                    project.name.clone(),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(paragraph, area);
    }

    fn draw_calendar(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let grid = month_grid(
            self.calendar.cursor.year,
            self.calendar.cursor.month,
            &self.dataset.projects,
        );
        let mut lines = Vec::new();

        let mut legend = Vec::new();
        for phase in Phase::ALL {
            legend.push(Span::styled(
                format!("■ {}  ", phase.label()),
                Style::default().fg(phase_color(phase)),
            ));
        }
        lines.push(Line::from(legend));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("p ◀  {}  ▶ n", self.calendar.cursor.title()),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )));

        let headings = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
        let header_spans: Vec<Span<'static>> = headings
            .iter()
            .map(|h| Span::styled(format!("{:^8}", h), Style::default().fg(Color::Gray)))
            .collect();
        lines.push(Line::from(header_spans));

        let mut day: i32 = 1 - grid.leading_blanks as i32;
        while day <= grid.days.len() as i32 {
            let mut spans = Vec::new();
            for _ in 0..7 {
                if day < 1 || day > grid.days.len() as i32 {
                    spans.push(Span::raw("        "));
                } else {
                    let cell = &grid.days[(day - 1) as usize];
                    let selected = cell.date.day() == self.calendar.selected_day;
                    let mut day_style = Style::default().fg(if cell.events.is_empty() {
                        Color::Gray
                    } else {
                        Color::White
                    });
                    if selected {
                        day_style = day_style
                            .bg(Color::Cyan)
                            .fg(Color::Black)
                            .add_modifier(Modifier::BOLD);
                    }
                    spans.push(Span::styled(format!("{:>2}", cell.date.day()), day_style));
                    spans.push(Span::raw(" "));
                    let mut used = 0;
                    for event in cell.events.iter().take(4) {
                        spans.push(Span::styled(
                            "●",
                            Style::default().fg(phase_color(event.phase)),
                        ));
                        used += 1;
                    }
                    if cell.events.len() > 4 {
                        spans.push(Span::styled("+", Style::default().fg(Color::White)));
                        used += 1;
                    }
                    spans.push(Span::raw(" ".repeat(5 - used)));
                }
                day += 1;
            }
            lines.push(Line::from(spans));
        }

        lines.push(Line::from(""));
        if let Some(cell) = grid
            .days
            .get(self.calendar.selected_day.saturating_sub(1) as usize)
        {
            if cell.events.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("{}: no events", format_date(cell.date)),
                    Style::default().fg(Color::DarkGray),
                )));
            } else {
                lines.push(Line::from(Span::styled(
                    format!(
                        "{}: {} event(s), Enter to open",
                        format_date(cell.date),
                        cell.events.len()
                    ),
                    Style::default().fg(Color::Gray),
                )));
                for event in &cell.events {
                    if let Some(project) = self.dataset.projects.get(event.project) {
                        lines.push(Line::from(vec![
                            Span::styled(
                                format!("{} ", event.phase.label()),
                                Style::default().fg(phase_color(event.phase)),
                            ),
                            Span::styled(
                                truncate_text(&project.name, 40),
                                Style::default().fg(Color::White),
                            ),
                        ]));
                    }
                }
            }
        }

        let block = Block::default()
            .title(Span::styled(
                "Calendar",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray));
        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(paragraph, area);
    }

    fn draw_about(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let paragraph = Paragraph::new(about_lines()).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(Span::styled(
                    "Usage guide",
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
        f.render_widget(paragraph, area);
    }

    fn draw_not_found(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "404",
                Style::default()
                    .fg(Color::LightRed)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from("This route does not exist."),
            Line::from(Span::styled(
                self.route.fragment(),
                Style::default().fg(Color::Magenta),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to return to the dashboard",
                Style::default().fg(Color::Gray),
            )),
        ];
        let paragraph = Paragraph::new(lines).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
        f.render_widget(paragraph, area);
    }

    fn draw_footer(&self, f: &mut ratatui::Frame<'_>, area: Rect) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Length(2)])
            .split(area);

        let help_bar = Paragraph::new(self.footer_help_line())
            .alignment(Alignment::Center)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(help_bar, rows[0]);

        let bottom = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(rows[1]);

        let status = Paragraph::new(self.status.clone())
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(Color::DarkGray)),
            );
        f.render_widget(status, bottom[0]);

        let summary = Paragraph::new(self.summary_line()).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(Color::DarkGray))
                .title("Dataset"),
        );
        f.render_widget(summary, bottom[1]);
    }

    fn footer_help_line(&self) -> Line<'static> {
        let mut spans = vec![
            Span::styled("1", Style::default().fg(Color::LightCyan)),
            Span::raw(" dashboard  "),
            Span::styled("2", Style::default().fg(Color::LightCyan)),
            Span::raw(" projects  "),
            Span::styled("3", Style::default().fg(Color::LightCyan)),
            Span::raw(" calendar  "),
            Span::styled("4", Style::default().fg(Color::LightCyan)),
            Span::raw(" guide  "),
        ];
        if self.overlay.is_some() {
            spans.extend([
                Span::styled("Tab", Style::default().fg(Color::LightYellow)),
                Span::raw(" next event  "),
                Span::styled("Enter", Style::default().fg(Color::LightYellow)),
                Span::raw(" open project  "),
                Span::styled("Esc", Style::default().fg(Color::LightRed)),
                Span::raw(" close  "),
            ]);
        } else {
            match self.route {
                Route::Projects => spans.extend([
                    Span::styled("f", Style::default().fg(Color::LightMagenta)),
                    Span::raw(" search  "),
                    Span::styled("o", Style::default().fg(Color::LightGreen)),
                    Span::raw(" osc  "),
                    Span::styled("c", Style::default().fg(Color::LightGreen)),
                    Span::raw(" category  "),
                    Span::styled("↑↓", Style::default().fg(Color::LightCyan)),
                    Span::raw(" browse  "),
                    Span::styled("Enter", Style::default().fg(Color::LightYellow)),
                    Span::raw(" open  "),
                ]),
                Route::ProjectDetail(_) => spans.extend([
                    Span::styled("↑↓", Style::default().fg(Color::LightCyan)),
                    Span::raw(" area  "),
                    Span::styled("Enter", Style::default().fg(Color::LightYellow)),
                    Span::raw(" expand  "),
                    Span::styled("Backspace", Style::default().fg(Color::LightGreen)),
                    Span::raw(" back  "),
                ]),
                Route::Calendar => spans.extend([
                    Span::styled("p/n", Style::default().fg(Color::LightGreen)),
                    Span::raw(" month  "),
                    Span::styled("←↑↓→", Style::default().fg(Color::LightCyan)),
                    Span::raw(" day  "),
                    Span::styled("Enter", Style::default().fg(Color::LightYellow)),
                    Span::raw(" events  "),
                ]),
                _ => {}
            }
        }
        spans.extend([
            Span::styled("q", Style::default().fg(Color::LightRed)),
            Span::raw(" quit"),
        ]);
        Line::from(spans)
    }

    fn summary_line(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                format!("{} projects", self.dataset.projects.len()),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{} organizations", self.dataset.organizations.len()),
                Style::default().fg(Color::Gray),
            ),
            Span::raw("  •  "),
            Span::styled(
                format!("{} seals", self.dataset.seals.len()),
                Style::default().fg(Color::Gray),
            ),
        ])
    }

    fn draw_overlay(&self, f: &mut ratatui::Frame<'_>, now: NaiveDateTime) {
        let overlay = match &self.overlay {
            Some(overlay) => overlay,
            None => return,
        };
        let area = centered_rect(60, 50, f.size());
        let dialog = Paragraph::new(overlay_lines(&self.dataset, overlay, now))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .title(Span::styled(
                        format!("Events on {}", format_date(overlay.date)),
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            );
        f.render_widget(Clear, area);
        f.render_widget(dialog, area);
    }
}

fn load_error_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    message: &str,
) -> Result<()> {
    loop {
        terminal.draw(|f| draw_load_error(f, message))?;
        if event::poll(Duration::from_millis(200))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if matches!(
                    key.code,
                    KeyCode::Char('q') | KeyCode::Esc | KeyCode::Enter
                ) {
                    return Ok(());
                }
            }
        }
    }
}

fn draw_load_error(f: &mut ratatui::Frame<'_>, message: &str) {
    let area = centered_rect(70, 40, f.size());
    let lines = vec![
        Line::from(Span::styled(
            "Could not load the dataset",
            Style::default()
                .fg(Color::LightRed)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press q to exit",
            Style::default().fg(Color::Gray),
        )),
    ];
    let dialog = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    "groove",
                    Style::default()
                        .fg(Color::LightRed)
                        .add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::LightRed)),
        );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn teardown_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}

fn adjust_offset(
    selected: usize,
    current_offset: usize,
    viewport: usize,
    scrolloff: usize,
    len: usize,
) -> usize {
    if viewport == 0 || len == 0 {
        return 0;
    }
    let max_offset = len.saturating_sub(viewport);
    let margin = scrolloff.min(viewport.saturating_sub(1));
    let mut offset = current_offset.min(max_offset);
    if selected < offset.saturating_add(margin) {
        offset = selected.saturating_sub(margin);
    } else {
        let upper = offset
            .saturating_add(viewport.saturating_sub(1))
            .saturating_sub(margin);
        if selected > upper {
            offset = selected.saturating_add(margin + 1).saturating_sub(viewport);
        }
    }
    offset.min(max_offset)
}

fn truncate_text(text: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

fn color_for_index(idx: usize) -> Color {
    let palette = [
        Color::Cyan,
        Color::LightGreen,
        Color::LightMagenta,
        Color::LightBlue,
        Color::LightYellow,
        Color::LightRed,
    ];
    palette[idx % palette.len()]
}

fn chart_color(idx: usize) -> Color {
    const PALETTE: [Color; 4] = [
        Color::Rgb(31, 184, 205),
        Color::Rgb(255, 193, 133),
        Color::Rgb(180, 65, 60),
        Color::Rgb(155, 89, 182),
    ];
    PALETTE[idx % PALETTE.len()]
}

fn cycle_option(current: Option<String>, values: &[String]) -> Option<String> {
    if values.is_empty() {
        return None;
    }
    match current {
        None => values.first().cloned(),
        Some(value) => match values.iter().position(|v| *v == value) {
            Some(i) if i + 1 < values.len() => Some(values[i + 1].clone()),
            _ => None,
        },
    }
}

fn kpi_cards(dataset: &Dataset) -> [(&'static str, String); 4] {
    let kpis = &dataset.metrics.kpis;
    [
        ("Monthly reach", format_count(kpis.brand.monthly_reach)),
        (
            "Monthly impressions",
            format_count(kpis.brand.monthly_impressions),
        ),
        ("Engagement rate", kpis.engagement.rate.clone()),
        ("Unique visitors", format_count(kpis.website.unique_visitors)),
    ]
}

/// The `limit` projects with the earliest event dates. Stable sort, so ties
/// keep dataset order; past events are not excluded.
fn upcoming_projects(projects: &[Project], limit: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..projects.len()).collect();
    indices.sort_by_key(|&idx| projects[idx].event_date);
    indices.truncate(limit);
    indices
}

fn upcoming_item(project: &Project, now: NaiveDateTime) -> ListItem<'static> {
    let days = days_until(now, project.event_date);
    let day_style = if days <= 7 {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green)
    };
    let line = Line::from(vec![
        Span::styled(
            format_date(project.event_date),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            truncate_text(&project.name, 28),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("{} days", days), day_style),
    ]);
    ListItem::new(line)
}

fn project_card(
    dataset: &Dataset,
    project: &Project,
    width: u16,
    selected: bool,
    now: NaiveDateTime,
) -> ListItem<'static> {
    let max = width.saturating_sub(4).max(10) as usize;
    let days = days_until(now, project.event_date);
    let marker = if selected { "▶ " } else { "  " };
    let name_line = Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
        Span::styled(
            truncate_text(&project.name, max),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(
            dataset.organization_name(&project.osc).to_string(),
            Style::default().fg(Color::LightGreen),
        ),
    ]);
    let info_line = Line::from(vec![
        Span::raw("  "),
        Span::styled(
            format_date(project.event_date),
            Style::default().fg(Color::DarkGray),
        ),
        Span::raw("  "),
        Span::styled(
            truncate_text(&project.location, max.saturating_sub(14)),
            Style::default().fg(Color::Gray),
        ),
        Span::raw("  "),
        Span::styled(
            project.category.clone(),
            Style::default().fg(Color::LightMagenta),
        ),
    ]);
    let status_line = Line::from(vec![
        Span::raw("  "),
        Span::styled(
            project.status.clone(),
            Style::default().fg(status_color(&project.status)),
        ),
        Span::raw("  •  "),
        Span::styled(
            days_until_label(days),
            Style::default().fg(if days <= 7 { Color::Yellow } else { Color::Gray }),
        ),
    ]);
    let mut item = ListItem::new(vec![name_line, info_line, status_line]);
    if selected {
        item = item.style(Style::default().bg(Color::Rgb(30, 34, 42)));
    }
    item
}

fn detail_lines(
    dataset: &Dataset,
    project: &Project,
    state: &DetailState,
    now: NaiveDateTime,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    lines.push(Line::from(vec![
        Span::styled(
            format_date(project.event_date),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  •  "),
        Span::styled(project.location.clone(), Style::default().fg(Color::Gray)),
        Span::raw("  •  "),
        Span::styled(
            dataset.organization_name(&project.osc).to_string(),
            Style::default().fg(Color::LightGreen),
        ),
    ]));
    lines.push(Line::from(vec![
        Span::styled(
            project.category.clone(),
            Style::default().fg(Color::LightMagenta),
        ),
        Span::raw("  •  "),
        Span::styled(
            project.status.clone(),
            Style::default().fg(status_color(&project.status)),
        ),
    ]));
    lines.push(Line::from(""));

    lines.push(section_title("Schedule"));
    for (phase, date) in project.schedule.phases() {
        let days = days_until(now, date);
        lines.push(Line::from(vec![
            Span::styled(
                format!("  {:<16}", phase.label()),
                Style::default()
                    .fg(phase_color(phase))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(format_date(date), Style::default().fg(Color::White)),
            Span::raw("  "),
            Span::styled(
                days_until_label(days),
                Style::default().fg(if days < 0 {
                    Color::DarkGray
                } else {
                    Color::Green
                }),
            ),
        ]));
    }
    lines.push(Line::from(""));

    lines.push(section_title("Responsibles"));
    for (idx, (area, people)) in project.responsibles.iter().enumerate() {
        let cursor = if idx == state.area_idx { "▶ " } else { "  " };
        let expanded = state.expanded.contains(area);
        let arrow = if expanded { "▾" } else { "▸" };
        lines.push(Line::from(vec![
            Span::styled(cursor.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{} {} ({})", arrow, area, people.len()),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        if expanded {
            for person in people {
                lines.push(Line::from(Span::styled(
                    format!("      {}", person),
                    Style::default().fg(Color::Gray),
                )));
            }
        }
    }
    lines.push(Line::from(""));

    lines.push(section_title("Suggested content"));
    let accent = dataset
        .seal(&project.content.seal)
        .and_then(|seal| parse_hex_color(&seal.color))
        .unwrap_or(Color::Cyan);
    if let Some(seal) = dataset.seal(&project.content.seal) {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!(" {} ", seal.name),
                Style::default()
                    .fg(Color::Black)
                    .bg(accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(seal.purpose.clone(), Style::default().fg(Color::Gray)),
        ]));
    }
    if !project.content.hashtags.is_empty() {
        lines.push(Line::from(Span::styled(
            format!("  {}", project.content.hashtags.join(" ")),
            Style::default().fg(Color::LightCyan),
        )));
    }
    lines.push(Line::from(Span::styled(
        format!("  {}", project.content.cta),
        Style::default().fg(accent).add_modifier(Modifier::ITALIC),
    )));
    lines
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
}

fn overlay_lines(
    dataset: &Dataset,
    overlay: &EventOverlay,
    now: NaiveDateTime,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for (idx, event) in overlay.events.iter().enumerate() {
        let project = match dataset.projects.get(event.project) {
            Some(project) => project,
            None => continue,
        };
        let marker = if idx == overlay.idx { "▶ " } else { "  " };
        lines.push(Line::from(vec![
            Span::styled(marker.to_string(), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("{} ", event.phase.label()),
                Style::default()
                    .fg(phase_color(event.phase))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                project.name.clone(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
        if idx == overlay.idx {
            let date = project.schedule.date(event.phase);
            lines.push(Line::from(Span::styled(
                format!(
                    "    {} ({})",
                    format_date(date),
                    days_until_label(days_until(now, date))
                ),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", project.location),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(Span::styled(
                format!("    {}", dataset.organization_name(&project.osc)),
                Style::default().fg(Color::LightGreen),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab next event • Enter open project • Esc close",
        Style::default().fg(Color::Gray),
    )));
    lines
}

fn about_lines() -> Vec<Line<'static>> {
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let body = Style::default().fg(Color::Gray);
    vec![
        Line::from(Span::styled("Navigation", heading)),
        Line::from(Span::styled(
            "  Press 1-4 to switch between Dashboard, Projects, Calendar and this guide.",
            body,
        )),
        Line::from(Span::styled(
            "  The header shows the current route fragment; the same fragments work with --route.",
            body,
        )),
        Line::from(""),
        Line::from(Span::styled("Dashboard", heading)),
        Line::from(Span::styled(
            "  Monthly KPIs, follower counts of comparable organizations and the next five events.",
            body,
        )),
        Line::from(""),
        Line::from(Span::styled("Projects", heading)),
        Line::from(Span::styled(
            "  Press f to search by name or location, o and c to cycle the organization and",
            body,
        )),
        Line::from(Span::styled(
            "  category filters. Enter opens the full plan of the selected project, with its",
            body,
        )),
        Line::from(Span::styled(
            "  schedule, responsible teams, editorial seal, hashtags and call to action.",
            body,
        )),
        Line::from(""),
        Line::from(Span::styled("Calendar", heading)),
        Line::from(Span::styled(
            "  p and n change the month, arrows move the day. Enter lists the phases scheduled",
            body,
        )),
        Line::from(Span::styled(
            "  on the selected day and jumps into their projects.",
            body,
        )),
        Line::from(""),
        Line::from(Span::styled("Suggested workflow", heading)),
        Line::from(Span::styled(
            "  Start the week on the dashboard, filter the project list by organization before",
            body,
        )),
        Line::from(Span::styled(
            "  planning posts, and use each project's suggested content for captions.",
            body,
        )),
    ]
}
