use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        Axis, BarChart, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, List, ListItem,
        Paragraph, Row, Table, Tabs, Wrap,
    },
    Frame,
};
use rust_decimal::prelude::*;
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::error::MetricsError;
use crate::model::*;
use crate::ui::{format_currency, group_thousands, InputMode, Tab, View};

const DEMO_NOTICE: &str = "This is a demo dashboard. Replace mock data with real client data \
                           and integrate with backend systems for production use.";

fn heading() -> Style {
    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
}

fn growth_color(growth: f64) -> Color {
    if growth > 0.0 {
        Color::Green
    } else if growth < 0.0 {
        Color::Red
    } else {
        Color::White
    }
}

pub fn draw(f: &mut Frame, app: &App, snapshot: &Result<DashboardSnapshot, MetricsError>) {
    match app.ui.view {
        View::Landing => draw_landing(f, app),
        View::Dashboard => draw_dashboard(f, app, snapshot),
    }

    if app.ui.show_help {
        draw_help(f);
    }

    if let Some(error) = &app.ui.error {
        draw_error_popup(f, error);
    }
}

fn draw_landing(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Length(14),
            Constraint::Min(0),
        ])
        .split(f.area());

    let title = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "HNI Client Portfolio Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Asset allocation | Performance | Analytics",
            Style::default().fg(Color::White),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));

    let details = Paragraph::new(vec![
        Line::from(vec![
            Span::raw("Data source: "),
            Span::styled(app.source.to_string(), Style::default().fg(Color::Cyan)),
        ]),
        Line::from(vec![
            Span::raw("Clients: "),
            Span::styled(app.book.len().to_string(), Style::default().fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw("AUM: "),
            Span::styled(
                format!("{} ({})", format_currency(app.book.aum()), app.config.currency_label),
                Style::default().fg(Color::Green),
            ),
        ]),
        Line::from(vec![
            Span::raw("Simulation seed: "),
            Span::styled(app.seed.to_string(), Style::default().fg(Color::Magenta)),
        ]),
        Line::from(""),
        Line::from(Span::styled("Press Enter to open the dashboard", heading())),
        Line::from("H for help | Q to quit"),
        Line::from(""),
        Line::from(Span::styled(DEMO_NOTICE, Style::default().fg(Color::DarkGray))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Welcome").borders(Borders::ALL));

    f.render_widget(title, chunks[0]);
    f.render_widget(details, chunks[1]);
}

fn draw_dashboard(f: &mut Frame, app: &App, snapshot: &Result<DashboardSnapshot, MetricsError>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    draw_tabs(f, chunks[0], app);

    match snapshot {
        Ok(snapshot) => match app.ui.current_tab {
            Tab::Overview => draw_overview(f, chunks[1], app, snapshot),
            Tab::Allocation => draw_allocation(f, chunks[1], snapshot),
            Tab::Performance => draw_performance(f, chunks[1], app, snapshot),
            Tab::Notes => draw_notes(f, chunks[1], app, &snapshot.client),
            Tab::Log => draw_log(f, chunks[1], app),
        },
        Err(e) => {
            let message = Paragraph::new(format!("Unable to compute portfolio metrics: {}", e))
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(Block::default().title("Portfolio").borders(Borders::ALL));
            f.render_widget(message, chunks[1]);
        }
    }

    draw_status_bar(f, chunks[2], app);
}

fn draw_tabs(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Tab::all()
        .iter()
        .enumerate()
        .map(|(i, t)| Line::from(format!("{} {}", i + 1, t.title())))
        .collect();

    let client = app.selected_client().unwrap_or("-");
    let title = format!(
        " HNI Portfolio Dashboard | {} ({}/{}) | AUM {} ",
        client,
        app.ui.selected_client + 1,
        app.book.len(),
        format_currency(app.book.aum()),
    );

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL).title(title))
        .style(Style::default().fg(Color::White))
        .highlight_style(heading())
        .select(app.ui.current_tab.index());

    f.render_widget(tabs, area);
}

fn draw_overview(f: &mut Frame, area: Rect, app: &App, snapshot: &DashboardSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(area);

    draw_profile_card(f, chunks[0], snapshot);
    draw_holdings_table(f, chunks[1], app, snapshot);

    let metric = Paragraph::new(Line::from(vec![
        Span::raw(format!("Total Portfolio Value ({}): ", app.config.currency_label)),
        Span::styled(
            format_currency(snapshot.total_value),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(metric, chunks[2]);
}

fn draw_profile_card(f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Client Profile: {}", snapshot.client));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(inner);

    let fields = [
        ("Risk Profile: ", snapshot.profile.risk_profile.to_string()),
        ("Investment Horizon: ", snapshot.profile.investment_horizon.clone()),
        ("Email: ", snapshot.profile.email.clone()),
    ];

    for (column, (label, value)) in columns.iter().zip(fields) {
        let line = Line::from(vec![
            Span::styled(label, Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(value, Style::default().fg(Color::Cyan)),
        ]);
        f.render_widget(Paragraph::new(line), *column);
    }
}

fn draw_holdings_table(f: &mut Frame, area: Rect, app: &App, snapshot: &DashboardSnapshot) {
    let value_header = format!("Value ({})", app.config.currency_label);
    let header_cells = ["Asset Class", value_header.as_str(), "% Allocation", "Growth (YoY %)"]
        .into_iter()
        .map(|h| Cell::from(h.to_string()).style(heading()));
    let header = Row::new(header_cells).height(1).bottom_margin(1);

    let rows = snapshot.rows.iter().map(|row| {
        Row::new(vec![
            Cell::from(row.asset_class.clone()),
            Cell::from(group_thousands(row.value)),
            Cell::from(format!("{:.2}", row.allocation_pct)),
            Cell::from(format!("{:.2}", row.growth_pct))
                .style(Style::default().fg(growth_color(row.growth_pct))),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(30),
            Constraint::Percentage(25),
            Constraint::Percentage(20),
            Constraint::Percentage(25),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Portfolio Overview - {}", snapshot.client)),
    )
    .style(Style::default().fg(Color::White));

    f.render_widget(table, area);
}

fn draw_allocation(f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let data: Vec<(&str, u64)> = snapshot
        .rows
        .iter()
        .map(|row| {
            let pct = row.allocation_pct.round().to_u64().unwrap_or(0);
            (row.asset_class.as_str(), pct)
        })
        .collect();

    let barchart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title("Asset Allocation (%)"))
        .data(data.as_slice())
        .max(100)
        .bar_width(11)
        .bar_gap(2)
        .bar_style(Style::default().fg(Color::Yellow))
        .value_style(Style::default().fg(Color::Black).bg(Color::Yellow));
    f.render_widget(barchart, chunks[0]);

    let legend: Vec<ListItem> = snapshot
        .rows
        .iter()
        .map(|row| {
            let pct = row.allocation_pct.to_f64().unwrap_or(0.0);
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<15}", row.asset_class), Style::default().fg(Color::Cyan)),
                Span::styled(format!("{:>7.1}%", pct), Style::default().fg(Color::Yellow)),
            ]))
        })
        .collect();

    let list = List::new(legend)
        .block(Block::default().borders(Borders::ALL).title("Detailed Allocation"))
        .style(Style::default().fg(Color::White));
    f.render_widget(list, chunks[1]);
}

fn draw_performance(f: &mut Frame, area: Rect, app: &App, snapshot: &DashboardSnapshot) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(10),
            Constraint::Length(7),
        ])
        .split(area);

    let perf = &app.config.performance;
    let download = if app.ui.show_download { "[x]" } else { "[ ]" };
    let controls = Paragraph::new(Line::from(vec![
        Span::raw("Months to view: "),
        Span::styled(snapshot.months.to_string(), heading()),
        Span::raw(format!(" ({}-{}, +/- to adjust)    ", perf.min_months, perf.max_months)),
        Span::raw(format!("{} Download portfolio report (d toggles, w writes)", download)),
    ]))
    .block(Block::default().borders(Borders::ALL).title("Portfolio Performance"));
    f.render_widget(controls, chunks[0]);

    draw_performance_chart(f, chunks[1], snapshot);
    draw_stats(f, chunks[2], snapshot);
}

fn draw_performance_chart(f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    let points: Vec<(f64, f64)> = snapshot
        .performance
        .points
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.value))
        .collect();

    let (low, high) = snapshot.performance.bounds();
    let (low, high) = (low.floor() - 1.0, high.ceil() + 1.0);
    let last_x = points.len().saturating_sub(1).max(1) as f64;

    let month_label = |idx: usize| {
        snapshot
            .performance
            .points
            .get(idx)
            .map(|p| p.month.format("%b %y").to_string())
            .unwrap_or_default()
    };
    let x_labels = vec![
        Span::raw(month_label(0)),
        Span::raw(month_label(points.len() / 2)),
        Span::raw(month_label(points.len().saturating_sub(1))),
    ];
    let y_labels = vec![
        Span::raw(format!("{:.0}", low)),
        Span::raw(format!("{:.0}", (low + high) / 2.0)),
        Span::raw(format!("{:.0}", high)),
    ];

    let dataset = Dataset::default()
        .name("Portfolio Value")
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Cyan))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(Block::default().borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .title("Month")
                .style(Style::default().fg(Color::Gray))
                .bounds([0.0, last_x])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("Value")
                .style(Style::default().fg(Color::Gray))
                .bounds([low, high])
                .labels(y_labels),
        );

    f.render_widget(chart, area);
}

fn draw_stats(f: &mut Frame, area: Rect, snapshot: &DashboardSnapshot) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let stats = &snapshot.stats;
    let pct_line = |label: &str, value: f64| {
        Line::from(vec![
            Span::raw(format!("{:<14}", label)),
            Span::styled(
                format!("{:.2}%", value * 100.0),
                Style::default().fg(growth_color(value)).add_modifier(Modifier::BOLD),
            ),
        ])
    };

    let analytics = Paragraph::new(vec![
        pct_line("CAGR", stats.cagr),
        pct_line("Volatility", stats.volatility),
        Line::from(vec![
            Span::raw(format!("{:<14}", "Sharpe Ratio")),
            Span::styled(format!("{:.2}", stats.sharpe_ratio), heading()),
        ]),
        Line::from(vec![
            Span::raw(format!("{:<14}", "3M Rolling Avg")),
            Span::styled(
                stats
                    .rolling_average
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "-".to_string()),
                Style::default().fg(Color::Cyan),
            ),
        ]),
    ])
    .block(Block::default().borders(Borders::ALL).title("Analytics"));

    let mover_line = |label: &str, mover: &Option<AssetMover>| match mover {
        Some(m) => Line::from(vec![
            Span::raw(format!("{:<12}", label)),
            Span::styled(format!("{} ", m.asset_class), Style::default().fg(Color::Cyan)),
            Span::styled(
                format!("({:+.2}%)", m.growth_pct),
                Style::default().fg(growth_color(m.growth_pct)),
            ),
        ]),
        None => Line::from(format!("{:<12}-", label)),
    };

    let movers = Paragraph::new(vec![
        mover_line("Best Asset", &snapshot.best_asset),
        mover_line("Worst Asset", &snapshot.worst_asset),
        Line::from(""),
        Line::from(Span::styled(
            format!("Simulated data, seed {}", snapshot.seed),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(Block::default().borders(Borders::ALL).title("Movers"));

    f.render_widget(analytics, columns[0]);
    f.render_widget(movers, columns[1]);
}

fn draw_notes(f: &mut Frame, area: Rect, app: &App, client: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    let items: Vec<ListItem> = app
        .notes
        .for_client(client)
        .skip(app.ui.scroll_offset as usize)
        .map(|note| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{} ", note.created_at.format("%Y-%m-%d %H:%M")),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(note.text.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Advisor/Client Notes"));
    f.render_widget(list, chunks[0]);

    let editing = app.ui.input_mode == InputMode::EditingNote;
    let (text, style) = if editing {
        (format!("{}▏", app.ui.note_draft), Style::default().fg(Color::Yellow))
    } else {
        ("Press e to add a note".to_string(), Style::default().fg(Color::DarkGray))
    };
    let input = Paragraph::new(text)
        .style(style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Add notes for {} (Enter saves, Esc cancels)", client)),
        );
    f.render_widget(input, chunks[1]);

    let caption = Paragraph::new("(Notes are not saved in this demo. Integrate with a backend for persistence.)")
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(caption, chunks[2]);
}

fn draw_log(f: &mut Frame, area: Rect, app: &App) {
    if app.log_to_tui && app.config.ui_settings.show_log_panel {
        let logger = TuiLoggerWidget::default()
            .block(Block::default().borders(Borders::ALL).title("Log"))
            .style_error(Style::default().fg(Color::Red))
            .style_warn(Style::default().fg(Color::Yellow))
            .style_info(Style::default().fg(Color::Cyan))
            .style_debug(Style::default().fg(Color::DarkGray));
        f.render_widget(logger, area);
    } else {
        let hint = Paragraph::new("Log output is written to stderr (run without --debug to view it here).")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Log"));
        f.render_widget(hint, area);
    }
}

fn draw_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let message = app.ui.status.clone().unwrap_or_else(|| {
        "Tab: sections | ←/→: client | +/-: months | d/w: report | i: import | n: reseed | e: note | h: help | q: quit"
            .to_string()
    });

    let status = Paragraph::new(Line::from(vec![
        Span::styled(format!("[{}] ", app.source), Style::default().fg(Color::Cyan)),
        Span::raw(message),
    ]))
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(status, area);
}

fn draw_help(f: &mut Frame) {
    let area = centered_rect(70, 80, f.area());
    f.render_widget(Clear, area);

    let section = |title: &'static str| Line::from(Span::styled(title, heading()));
    let help = Paragraph::new(vec![
        section("NAVIGATION"),
        Line::from("Enter               - Open dashboard from the landing view"),
        Line::from("Tab / Shift+Tab     - Next / previous section"),
        Line::from("1-5                 - Jump to section"),
        Line::from("←/→                 - Previous / next client"),
        Line::from("↑/↓                 - Scroll notes"),
        Line::from("Esc                 - Back to landing view"),
        Line::from(""),
        section("CONTROLS"),
        Line::from("+ / -               - Change performance window (months)"),
        Line::from("D                   - Toggle report download"),
        Line::from("W                   - Write portfolio report (CSV)"),
        Line::from("I                   - Import spreadsheet"),
        Line::from("N                   - Reseed simulated data"),
        Line::from("E                   - Add a note for the client"),
        Line::from("S                   - Save configuration"),
        Line::from("Q or Ctrl+C         - Quit"),
        Line::from(""),
        section("METRICS"),
        Line::from("CAGR                - Compound annual growth rate over the month-to-month steps"),
        Line::from("Volatility          - Std. dev. of monthly returns × √12"),
        Line::from("Sharpe Ratio        - Annualized mean monthly return / volatility"),
        Line::from(""),
        Line::from("Press any key to close..."),
    ])
    .block(Block::default().title("Help").borders(Borders::ALL))
    .wrap(Wrap { trim: false });

    f.render_widget(help, area);
}

fn draw_error_popup(f: &mut Frame, error: &str) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);

    let popup = Paragraph::new(error)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Error")
                .style(Style::default().fg(Color::Red)),
        )
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(popup, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
    }

    fn render(app: &App) -> String {
        let backend = TestBackend::new(140, 45);
        let mut terminal = Terminal::new(backend).unwrap();
        let snapshot = app.snapshot(today());
        terminal.draw(|f| draw(f, app, &snapshot)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE), today());
    }

    #[test]
    fn landing_shows_title_and_aum() {
        let app = App::new(Config::default(), "config.toml".to_string(), None, 4);
        let screen = render(&app);
        assert!(screen.contains("HNI Client Portfolio Dashboard"));
        assert!(screen.contains("910.00"));
    }

    #[test]
    fn overview_renders_profile_and_holdings() {
        let mut app = App::new(Config::default(), "config.toml".to_string(), None, 4);
        press(&mut app, KeyCode::Enter);
        let screen = render(&app);

        assert!(screen.contains("Client Profile: Client A"));
        assert!(screen.contains("Moderate"));
        assert!(screen.contains("Real Estate"));
        assert!(screen.contains("42.86"));
        assert!(screen.contains("280.00"));
    }

    #[test]
    fn performance_and_allocation_tabs_render() {
        let mut app = App::new(Config::default(), "config.toml".to_string(), None, 4);
        press(&mut app, KeyCode::Enter);

        press(&mut app, KeyCode::Char('2'));
        assert!(render(&app).contains("Detailed Allocation"));

        press(&mut app, KeyCode::Char('3'));
        let screen = render(&app);
        assert!(screen.contains("CAGR"));
        assert!(screen.contains("Best Asset"));
    }

    #[test]
    fn error_popup_is_drawn_over_dashboard() {
        let mut app = App::new(Config::default(), "config.toml".to_string(), None, 4);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('i'));
        assert!(render(&app).contains("No spreadsheet configured"));
    }
}
