use anyhow::Result;
use chrono::{Datelike, Months, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, Bar, BarChart, BarGroup, Block, Borders, Cell, Chart, Dataset as ChartDataset,
        GraphType, Paragraph, Row, Table, TableState,
    },
    Frame, Terminal,
};
use std::io;
use vehicle_dashboard::{format_thousands, month_end, Dashboard, DashboardView, FilterSelection};

const SERIES_COLORS: [Color; 5] = [Color::Cyan, Color::Yellow, Color::Green, Color::Magenta, Color::Red];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    YoyGrowth,
    MarketShare,
    MonthlyTrend,
    Filters,
    RawData,
}

impl Page {
    pub const ALL: [Page; 5] = [
        Page::YoyGrowth,
        Page::MarketShare,
        Page::MonthlyTrend,
        Page::Filters,
        Page::RawData,
    ];

    pub fn next(&self) -> Self {
        match self {
            Page::YoyGrowth => Page::MarketShare,
            Page::MarketShare => Page::MonthlyTrend,
            Page::MonthlyTrend => Page::Filters,
            Page::Filters => Page::RawData,
            Page::RawData => Page::YoyGrowth,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::YoyGrowth => Page::RawData,
            Page::MarketShare => Page::YoyGrowth,
            Page::MonthlyTrend => Page::MarketShare,
            Page::Filters => Page::MonthlyTrend,
            Page::RawData => Page::Filters,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::YoyGrowth => "YoY Growth",
            Page::MarketShare => "Market Share",
            Page::MonthlyTrend => "Monthly Trend",
            Page::Filters => "Filters",
            Page::RawData => "Raw Data",
        }
    }
}

/// One toggleable line on the Filters page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterItem {
    Category(String),
    Manufacturer(String),
}

pub struct App {
    pub dashboard: Dashboard,
    pub selection: FilterSelection,
    pub view: DashboardView,
    pub current_page: Page,
    pub filter_items: Vec<FilterItem>,
    pub filter_state: TableState,
    pub raw_state: TableState,
}

impl App {
    pub fn new(dashboard: Dashboard) -> Self {
        let selection = dashboard.default_selection();
        let view = dashboard.view(&selection);

        let options = dashboard.options();
        let filter_items: Vec<FilterItem> = options
            .categories
            .into_iter()
            .map(FilterItem::Category)
            .chain(options.manufacturers.into_iter().map(FilterItem::Manufacturer))
            .collect();

        let mut filter_state = TableState::default();
        if !filter_items.is_empty() {
            filter_state.select(Some(0));
        }

        Self {
            dashboard,
            selection,
            view,
            current_page: Page::YoyGrowth,
            filter_items,
            filter_state,
            raw_state: TableState::default(),
        }
    }

    /// Recompute every derived table for the current selection
    fn refresh(&mut self) {
        self.view = self.dashboard.view(&self.selection);

        let rows = self.view.raw_rows.as_ref().map(|r| r.len()).unwrap_or(0);
        if rows == 0 {
            self.raw_state.select(None);
        } else if self.raw_state.selected().map_or(true, |i| i >= rows) {
            self.raw_state.select(Some(0));
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    pub fn is_selected(&self, item: &FilterItem) -> bool {
        match item {
            FilterItem::Category(c) => self.selection.categories.contains(c),
            FilterItem::Manufacturer(m) => self.selection.manufacturers.contains(m),
        }
    }

    /// Toggle the filter item under the cursor
    pub fn toggle_selected_item(&mut self) {
        let item = match self.filter_state.selected().and_then(|i| self.filter_items.get(i)) {
            Some(item) => item.clone(),
            None => return,
        };

        match item {
            FilterItem::Category(c) => self.selection.toggle_category(&c),
            FilterItem::Manufacturer(m) => self.selection.toggle_manufacturer(&m),
        }
        self.refresh();
    }

    pub fn toggle_raw(&mut self) {
        self.selection.show_raw = !self.selection.show_raw;
        self.refresh();
    }

    /// Back to the initial "everything selected" state
    pub fn reset_selection(&mut self) {
        let show_raw = self.selection.show_raw;
        self.selection = self.dashboard.default_selection().with_raw(show_raw);
        self.refresh();
    }

    pub fn shift_start(&mut self, forward: bool) {
        let start = shift_month(self.selection.date_range.start, forward);
        if start <= self.selection.date_range.end {
            self.selection.date_range.start = start;
            self.refresh();
        }
    }

    pub fn shift_end(&mut self, forward: bool) {
        let end = shift_month(self.selection.date_range.end, forward);
        if end >= self.selection.date_range.start {
            self.selection.date_range.end = end;
            self.refresh();
        }
    }

    fn list_len(&self) -> usize {
        match self.current_page {
            Page::Filters => self.filter_items.len(),
            Page::RawData => self.view.raw_rows.as_ref().map(|r| r.len()).unwrap_or(0),
            _ => 0,
        }
    }

    fn list_state(&mut self) -> &mut TableState {
        match self.current_page {
            Page::RawData => &mut self.raw_state,
            _ => &mut self.filter_state,
        }
    }

    pub fn next(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let state = self.list_state();
        let i = match state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let state = self.list_state();
        let i = match state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_down(&mut self) {
        let len = self.list_len();
        if len == 0 {
            return;
        }
        let state = self.list_state();
        let i = match state.selected() {
            Some(i) => (i + 20).min(len - 1),
            None => 0,
        };
        state.select(Some(i));
    }

    pub fn page_up(&mut self) {
        if self.list_len() == 0 {
            return;
        }
        let state = self.list_state();
        let i = state.selected().map(|i| i.saturating_sub(20)).unwrap_or(0);
        state.select(Some(i));
    }
}

/// One month earlier/later, snapped to the month-end the data is keyed on
fn shift_month(date: NaiveDate, forward: bool) -> NaiveDate {
    let shifted = if forward {
        date.checked_add_months(Months::new(1))
    } else {
        date.checked_sub_months(Months::new(1))
    };

    shifted
        .and_then(|d| month_end(d.year(), d.month()))
        .unwrap_or(date)
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char(' ') | KeyCode::Enter if app.current_page == Page::Filters => {
                    app.toggle_selected_item()
                }
                KeyCode::Char('r') => app.toggle_raw(),
                KeyCode::Char('c') => app.reset_selection(),
                KeyCode::Char('[') => app.shift_start(false),
                KeyCode::Char(']') => app.shift_start(true),
                KeyCode::Char('{') => app.shift_end(false),
                KeyCode::Char('}') => app.shift_end(true),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::PageDown => app.page_down(),
                KeyCode::PageUp => app.page_up(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Length(5), // Key metrics
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_metrics(f, chunks[1], app);

    match app.current_page {
        Page::YoyGrowth => render_yoy(f, chunks[2], app),
        Page::MarketShare => render_market_share(f, chunks[2], app),
        Page::MonthlyTrend => render_trend(f, chunks[2], app),
        Page::Filters => render_filters(f, chunks[2], app),
        Page::RawData => render_raw(f, chunks[2], app),
    }

    render_status_bar(f, chunks[3], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut tab_spans = vec![];
    for (i, page) in Page::ALL.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title().to_string(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Rows: {}", app.view.row_count),
        Style::default().fg(Color::White),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" 🚗 Vehicle Registration Dashboard "),
    );

    f.render_widget(header, area);
}

fn render_metrics(f: &mut Frame, area: Rect, app: &App) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(area);

    let metrics = &app.view.metrics;
    let (yoy_label, yoy_value) = metrics.yoy_display();
    let yoy_color = match metrics.yoy_growth.value() {
        Some(yoy) if yoy.growth_pct < 0.0 => Color::Red,
        Some(_) => Color::Green,
        None => Color::DarkGray,
    };

    let cards = [
        ("Total Registrations".to_string(), metrics.total_display(), Color::White),
        (yoy_label, yoy_value, yoy_color),
        ("Latest Data".to_string(), metrics.latest_display(), Color::White),
    ];

    for (area, (label, value, color)) in columns.iter().zip(cards) {
        let card = Paragraph::new(vec![
            Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().borders(Borders::ALL));
        f.render_widget(card, *area);
    }
}

fn header_row(titles: &[&'static str]) -> Row<'static> {
    let cells = titles.iter().map(|h| {
        Cell::from(*h).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    });

    Row::new(cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1)
}

fn render_yoy(f: &mut Frame, area: Rect, app: &App) {
    let max_growth = app
        .view
        .yoy_growth
        .iter()
        .filter_map(|r| r.growth_pct)
        .fold(0.0_f64, |acc, g| acc.max(g.abs()));

    let rows = app.view.yoy_growth.iter().map(|row| {
        let (growth, bar, color) = match row.growth_pct {
            Some(g) => {
                let width = if max_growth > 0.0 {
                    ((g.abs() / max_growth) * 30.0).round() as usize
                } else {
                    0
                };
                let color = if g < 0.0 { Color::Red } else { Color::Green };
                (format!("{:+.1}%", g), "█".repeat(width), color)
            }
            None => ("—".to_string(), String::new(), Color::DarkGray),
        };

        Row::new(vec![
            Cell::from(row.year.to_string()),
            Cell::from(format_thousands(row.total_registrations)),
            Cell::from(growth).style(Style::default().fg(color)),
            Cell::from(bar).style(Style::default().fg(color)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(16),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header_row(&["Year", "Registrations", "Growth", ""]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Year-over-Year Growth "),
    );

    f.render_widget(table, area);
}

fn render_market_share(f: &mut Frame, area: Rect, app: &App) {
    let bars: Vec<Bar> = app
        .view
        .market_share
        .iter()
        .enumerate()
        .map(|(i, share)| {
            Bar::default()
                .value(share.total_registrations)
                .label(Line::from(truncate(&share.manufacturer, 14)))
                .text_value(format!(
                    "{} ({:.1}%)",
                    format_thousands(share.total_registrations),
                    share.share_pct
                ))
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Manufacturer Market Share "),
        )
        .direction(Direction::Horizontal)
        .bar_width(1)
        .bar_gap(0)
        .value_style(Style::default().fg(Color::Black).add_modifier(Modifier::BOLD))
        .data(BarGroup::default().bars(&bars));

    f.render_widget(chart, area);
}

fn render_trend(f: &mut Frame, area: Rect, app: &App) {
    let trend = &app.view.monthly_trend;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Monthly Registration Trends by Vehicle Type ");

    let (first, last) = match (trend.first(), trend.last()) {
        (Some(a), Some(b)) => (a.date, b.date),
        _ => {
            f.render_widget(Paragraph::new("  No data for the current selection").block(block), area);
            return;
        }
    };

    // One series per category, x = days since the first month
    let mut categories: Vec<&str> = trend.iter().map(|p| p.category.as_str()).collect();
    categories.sort_unstable();
    categories.dedup();

    let series: Vec<(&str, Vec<(f64, f64)>)> = categories
        .iter()
        .map(|category| {
            let points = trend
                .iter()
                .filter(|p| p.category == *category)
                .map(|p| ((p.date - first).num_days() as f64, p.total_registrations as f64))
                .collect();
            (*category, points)
        })
        .collect();

    let max_y = trend
        .iter()
        .map(|p| p.total_registrations)
        .max()
        .unwrap_or(0) as f64
        * 1.1;
    let max_x = ((last - first).num_days() as f64).max(1.0);

    let datasets: Vec<ChartDataset> = series
        .iter()
        .enumerate()
        .map(|(i, (category, points))| {
            ChartDataset::default()
                .name(category.to_string())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(SERIES_COLORS[i % SERIES_COLORS.len()]))
                .data(points)
        })
        .collect();

    let mid = first + chrono::Duration::days((max_x / 2.0) as i64);
    let chart = Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("Month")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, max_x])
                .labels(vec![
                    Span::raw(first.format("%b %Y").to_string()),
                    Span::raw(mid.format("%b %Y").to_string()),
                    Span::raw(last.format("%b %Y").to_string()),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("Registrations")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, max_y.max(1.0)])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format_thousands((max_y / 2.0) as u64)),
                    Span::raw(format_thousands(max_y as u64)),
                ]),
        );

    f.render_widget(chart, area);
}

fn render_filters(f: &mut Frame, area: Rect, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    let rows: Vec<Row> = app
        .filter_items
        .iter()
        .map(|item| {
            let (kind, name) = match item {
                FilterItem::Category(c) => ("Category", c.as_str()),
                FilterItem::Manufacturer(m) => ("Manufacturer", m.as_str()),
            };
            let (mark, color) = if app.is_selected(item) {
                ("[x]", Color::Green)
            } else {
                ("[ ]", Color::DarkGray)
            };

            Row::new(vec![
                Cell::from(mark).style(Style::default().fg(color)),
                Cell::from(kind),
                Cell::from(name.to_string()),
            ])
            .height(1)
        })
        .collect();

    let table = Table::new(
        rows,
        [Constraint::Length(4), Constraint::Length(14), Constraint::Min(10)],
    )
    .header(header_row(&["", "Filter", "Value"]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Categories & Manufacturers "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, chunks[0], &mut app.filter_state);

    let range = app.selection.date_range;
    let key = |k: &'static str| Span::styled(k, Style::default().fg(Color::Yellow));
    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("  Start: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(range.start.to_string()),
            Span::raw("   ("),
            key("["),
            Span::raw(" / "),
            key("]"),
            Span::raw(")"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  End:   ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(range.end.to_string()),
            Span::raw("   ("),
            key("{"),
            Span::raw(" / "),
            key("}"),
            Span::raw(")"),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("  Raw data: ", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
            Span::raw(if app.selection.show_raw { "shown" } else { "hidden" }),
            Span::raw("   ("),
            key("r"),
            Span::raw(")"),
        ]),
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "  Space toggles the highlighted filter, c resets everything",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]),
    ];

    let panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Date Range "),
    );

    f.render_widget(panel, chunks[1]);
}

fn render_raw(f: &mut Frame, area: Rect, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::White))
        .title(" Raw Data ");

    let records = match &app.view.raw_rows {
        Some(rows) => rows,
        None => {
            let hint = Paragraph::new("  Raw data hidden. Press r to show it.").block(block);
            f.render_widget(hint, area);
            return;
        }
    };

    let rows = records.iter().map(|r| {
        Row::new(vec![
            Cell::from(r.date.to_string()),
            Cell::from(r.year.to_string()),
            Cell::from(r.quarter.label().to_string()),
            Cell::from(r.month.to_string()),
            Cell::from(r.category.clone()),
            Cell::from(truncate(&r.manufacturer, 18)),
            Cell::from(format_thousands(r.registrations)),
        ])
        .height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(6),
            Constraint::Length(9),
            Constraint::Length(20),
            Constraint::Length(14),
        ],
    )
    .header(header_row(&[
        "Date", "Year", "Quarter", "Month", "Category", "Manufacturer", "Registrations",
    ]))
    .block(block)
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.raw_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let range = app.selection.date_range;
    let mut status_spans = vec![Span::styled(
        format!(" {} → {} ", range.start, range.end),
        Style::default().fg(Color::Cyan),
    )];

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled(
        format!(
            "{} categories, {} manufacturers",
            app.selection.categories.len(),
            app.selection.manufacturers.len()
        ),
        Style::default().fg(Color::Green),
    ));

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Raw | "));
    status_spans.push(Span::styled("c", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Reset | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use vehicle_dashboard::{Dataset, RegistrationRecord};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn app() -> App {
        let dataset = Dataset::new(vec![
            RegistrationRecord::new(date(2022, 1, 31), "2W", "Hero", 1000),
            RegistrationRecord::new(date(2022, 2, 28), "2W", "Honda", 2000),
            RegistrationRecord::new(date(2022, 3, 31), "4W", "Tata", 3000),
        ]);
        App::new(Dashboard::new(Arc::new(dataset)))
    }

    #[test]
    fn test_page_cycle() {
        let mut page = Page::YoyGrowth;
        for _ in 0..Page::ALL.len() {
            page = page.next();
        }
        assert_eq!(page, Page::YoyGrowth);
        assert_eq!(Page::YoyGrowth.previous(), Page::RawData);
    }

    #[test]
    fn test_page_titles() {
        let titles: Vec<&str> = Page::ALL.iter().map(|p| p.title()).collect();

        assert_eq!(
            titles,
            ["YoY Growth", "Market Share", "Monthly Trend", "Filters", "Raw Data"]
        );
    }

    #[test]
    fn test_filter_items_list_categories_then_manufacturers() {
        let app = app();

        assert_eq!(app.filter_items.len(), 5);
        assert_eq!(app.filter_items[0], FilterItem::Category("2W".into()));
        assert_eq!(app.filter_items[2], FilterItem::Manufacturer("Hero".into()));
        assert!(app.filter_items.iter().all(|i| app.is_selected(i)));
    }

    #[test]
    fn test_toggle_recomputes_view() {
        let mut app = app();
        app.current_page = Page::Filters;

        // Cursor on "2W"
        app.toggle_selected_item();
        assert_eq!(app.view.metrics.total_registrations, 3000);

        app.reset_selection();
        assert_eq!(app.view.metrics.total_registrations, 6000);
    }

    #[test]
    fn test_shift_dates_snap_to_month_end() {
        let mut app = app();

        app.shift_end(false);
        assert_eq!(app.selection.date_range.end, date(2022, 2, 28));
        assert_eq!(app.view.row_count, 2);

        app.shift_end(true);
        assert_eq!(app.selection.date_range.end, date(2022, 3, 31));

        // Start cannot pass the end
        app.shift_start(true);
        app.shift_start(true);
        app.shift_start(true);
        assert_eq!(app.selection.date_range.start, date(2022, 3, 31));
    }

    #[test]
    fn test_toggle_raw() {
        let mut app = app();
        assert!(app.view.raw_rows.is_none());

        app.toggle_raw();
        assert_eq!(app.view.raw_rows.as_ref().map(|r| r.len()), Some(3));
        assert_eq!(app.raw_state.selected(), Some(0));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Hero", 10), "Hero");
        assert_eq!(truncate("Royal Enfield", 8), "Royal...");
    }
}
