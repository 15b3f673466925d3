use std::{
    io,
    time::{Duration, Instant},
};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame, Terminal,
};

use crate::app::App;
use crate::config::Config;
use crate::fetch::Fetcher;
use crate::util::{fmt_axis, padded_bounds};

pub fn run(app: App, fetcher: &Fetcher, cfg: &Config) -> io::Result<()> {
    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app_loop(&mut terminal, app, fetcher, cfg);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn run_app_loop<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    fetcher: &Fetcher,
    cfg: &Config,
) -> io::Result<()> {
    let tick_rate = cfg.tick_rate;
    let mut dirty = true; // draw the empty chart before the first sample

    loop {
        if dirty {
            terminal.draw(|f| draw(f, &app, cfg))?;
            dirty = false;
        }

        // Handle input while waiting out the rest of the tick
        let timeout = tick_rate
            .checked_sub(app.last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) => {
                    if key.code == KeyCode::Char('q') || key.code == KeyCode::Char('c') {
                        return Ok(());
                    }
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }
        if app.last_tick.elapsed() >= tick_rate {
            // A failed tick leaves `dirty` unset: the stale frame persists.
            if app.on_tick(fetcher) {
                dirty = true;
            }
            app.last_tick = Instant::now();
        }
    }
}

fn draw(f: &mut Frame, app: &App, cfg: &Config) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Chart
            Constraint::Length(1), // Bottom Status Bar
        ].as_ref())
        .split(f.size());

    // ============= Wheel Velocity Chart ============
    let snapshot = app.window.snapshot();
    let left: Vec<(f64, f64)> = snapshot.iter().map(|s| (s.timestamp, s.left_rpm)).collect();
    let right: Vec<(f64, f64)> = snapshot.iter().map(|s| (s.timestamp, s.right_rpm)).collect();

    let x_max = snapshot.last().map(|s| s.timestamp).unwrap_or(0.0).max(1.0);
    let rpm_min = snapshot
        .iter()
        .flat_map(|s| [s.left_rpm, s.right_rpm])
        .fold(f64::INFINITY, f64::min);
    let rpm_max = snapshot
        .iter()
        .flat_map(|s| [s.left_rpm, s.right_rpm])
        .fold(f64::NEG_INFINITY, f64::max);
    let y_bounds = padded_bounds(rpm_min, rpm_max);

    let datasets = vec![
        Dataset::default()
            .name("Left Wheel RPM")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&left),
        Dataset::default()
            .name("Right Wheel RPM")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Red))
            .data(&right),
    ];

    let x_labels = vec![
        Span::raw(fmt_axis(0.0)),
        Span::raw(fmt_axis(x_max / 2.0)),
        Span::raw(fmt_axis(x_max)),
    ];
    let y_labels = vec![
        Span::raw(fmt_axis(y_bounds[0])),
        Span::raw(fmt_axis((y_bounds[0] + y_bounds[1]) / 2.0)),
        Span::raw(fmt_axis(y_bounds[1])),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(" Differential Drive Wheel Velocities ")
                .borders(Borders::ALL)
                .border_type(ratatui::widgets::BorderType::Rounded)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().bg(Color::Black).fg(Color::White))
        .x_axis(
            Axis::default()
                .title("Time (s)")
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max])
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title("RPM")
                .style(Style::default().fg(Color::DarkGray))
                .bounds(y_bounds)
                .labels(y_labels),
        );
    f.render_widget(chart, chunks[0]);

    // ============ Bottom Status Bar ============
    let status_content = Line::from(vec![
        Span::styled(
            " WHEEL MONITOR ",
            Style::default().bg(Color::White).fg(Color::Black).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled("Source: ", Style::default().fg(Color::Cyan)),
        Span::raw(cfg.endpoint.as_str()),
        Span::raw(" | "),
        Span::styled("Window: ", Style::default().fg(Color::Cyan)),
        Span::raw(format!(
            "{} samples @ {} ms",
            cfg.window_size,
            cfg.tick_rate.as_millis()
        )),
        Span::raw(" | Press 'q' to quit"),
    ]);
    let status_bar = Paragraph::new(status_content)
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));
    f.render_widget(status_bar, chunks[1]);
}
