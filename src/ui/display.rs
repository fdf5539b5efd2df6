use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event as CrosstermEvent, KeyCode, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, Paragraph},
};

use crate::api::ApiClient;
use crate::models::DiagEvent;
use crate::page::{Page, ToastLevel};
use crate::ui::app::AppState;
use crate::ui::poller::{PollState, start_board_poller};
use crate::ui::signal::start_signal_listener;
use crate::utils::{MAX_EVENT_ROWS, UI_POLL_INTERVAL_MS, format_bytes, format_uptime};

// ============================================================================
// DASHBOARD
// ============================================================================

pub fn show_dashboard(client: ApiClient) -> Result<(), Box<dyn std::error::Error>> {
    let shared = Arc::new(Mutex::new(PollState::default()));
    let refresh_now = Arc::new(AtomicBool::new(false));
    let shutdown = Arc::new(AtomicBool::new(false));

    start_signal_listener(Arc::clone(&shutdown));
    start_board_poller(
        client.clone(),
        Arc::clone(&shared),
        Arc::clone(&refresh_now),
        Arc::clone(&shutdown),
    );

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = AppState::new();
    let board_url = client.base_url().to_string();

    loop {
        let snapshot = shared.lock().unwrap().clone();

        if snapshot.generation != app.seen_generation {
            app.seen_generation = snapshot.generation;
            apply_snapshot(&mut app.page, &snapshot, &board_url);
            if let Some(err) = &snapshot.last_error {
                app.page.show_toast(err, Some(ToastLevel::Error));
            } else if app.refresh_requested {
                app.page.show_toast("Refreshed", None);
            }
            app.refresh_requested = false;
        }
        app.page.tick(Instant::now());

        let events: Vec<DiagEvent> = snapshot
            .diag
            .as_ref()
            .map(|diag| {
                diag.recent_events
                    .iter()
                    .take(MAX_EVENT_ROWS)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        terminal.draw(|f| draw_dashboard(f, &mut app, &snapshot, &events, &board_url))?;

        if event::poll(Duration::from_millis(UI_POLL_INTERVAL_MS))? {
            if let CrosstermEvent::Key(KeyEvent { code, .. }) = event::read()? {
                match code {
                    KeyCode::Char('q') | KeyCode::Esc => app.quit(),
                    KeyCode::Char('r') | KeyCode::Char('R') => {
                        app.refresh_requested = true;
                        refresh_now.store(true, Ordering::Relaxed);
                    }
                    KeyCode::Down | KeyCode::Char('j') => app.next_event(events.len()),
                    KeyCode::Up | KeyCode::Char('k') => app.previous_event(events.len()),
                    _ => {}
                }
            }
        }

        if app.should_quit || shutdown.load(Ordering::Relaxed) {
            break;
        }
    }

    shutdown.store(true, Ordering::Relaxed);
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    Ok(())
}

// ============================================================================
// PAGE UPDATES
// ============================================================================

/// Write the latest snapshot into the page as `.stat` elements; the
/// renderer reads them back by selector.
fn apply_snapshot(page: &mut Page, snapshot: &PollState, board_url: &str) {
    page.upsert("board-url", "stat", &format!("Board        {}", board_url));

    if let Some(status) = &snapshot.status {
        page.upsert(
            "firmware",
            "stat",
            &format!("Firmware     {}", status.firmware_version),
        );
        if let Some(mac) = &status.mac {
            page.upsert("mac", "stat", &format!("MAC          {}", mac));
        }
        page.upsert(
            "free-heap",
            "stat",
            &format!("Free heap    {}", format_bytes(status.free_heap)),
        );
        page.upsert(
            "free-spiram",
            "stat",
            &format!("Free SPIRAM  {}", format_bytes(status.free_spiram)),
        );
        page.upsert(
            "min-heap",
            "stat",
            &format!("Min heap     {}", format_bytes(status.min_free_heap)),
        );
        page.upsert(
            "images",
            "stat",
            &format!("Images       {}", status.images_loaded),
        );
        let temperature = match status.temperature_c {
            Some(t) => format!("{:.1} °C", t),
            None => String::from("n/a"),
        };
        page.upsert("temperature", "stat", &format!("Temperature  {}", temperature));
    }

    if let Some(diag) = &snapshot.diag {
        if let Some(uptime_ms) = diag.uptime_ms() {
            page.upsert(
                "uptime",
                "stat",
                &format!("Uptime       {}", format_uptime(uptime_ms)),
            );
        }
    }

    if let Some(health) = &snapshot.health {
        let wifi = match &health.wifi {
            Some(w) if w.connected => format!("connected, {} reconnects", w.reconnect_attempts),
            Some(w) if w.connection_given_up => String::from("given up"),
            Some(_) => String::from("disconnected"),
            None => String::from("unknown"),
        };
        page.upsert("wifi", "stat", &format!("Wi-Fi        {}", wifi));
        page.upsert(
            "reboot",
            "stat",
            &format!("Last boot    {}", health.reboot_reason),
        );
    }

    if let Some(ts) = snapshot.refreshed_at {
        page.upsert(
            "refreshed",
            "stat",
            &format!("Refreshed    {}", format_clock(ts)),
        );
    }
}

fn format_clock(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| String::from("--:--:--"))
}

// ============================================================================
// RENDERING
// ============================================================================

fn draw_dashboard(
    f: &mut Frame,
    app: &mut AppState,
    snapshot: &PollState,
    events: &[DiagEvent],
    board_url: &str,
) {
    if snapshot.generation == 0 {
        draw_connecting(f, board_url);
        return;
    }

    let stats = app.page.query_all(".stat");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),                      // Header
            Constraint::Length(stats.len() as u16 + 2), // Stats
            Constraint::Min(0),                         // Events
            Constraint::Length(3),                      // Footer
        ])
        .split(f.area());

    // Header
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " ▦ pixdeck ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" | {} ", board_url),
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(header, chunks[0]);

    // Stats, read back from the page
    let stat_items: Vec<ListItem> = stats
        .iter()
        .map(|stat| {
            ListItem::new(Line::from(Span::styled(
                format!(" {}", stat.text),
                Style::default().fg(Color::White),
            )))
        })
        .collect();
    let stat_list = List::new(stat_items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Blue))
            .title(" Board ")
            .title_style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
    );
    f.render_widget(stat_list, chunks[1]);

    // Recent diagnostic events
    let event_items: Vec<ListItem> = events
        .iter()
        .map(|event| {
            let level_color = match event.level.as_str() {
                "error" => Color::Red,
                "warn" => Color::Yellow,
                _ => Color::Gray,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" [{}] ", event.level), Style::default().fg(level_color)),
                Span::styled(
                    format!("{:<12}", event.formatted_uptime()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(event.message.clone(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();
    let event_list = List::new(event_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" Events ({}) ", events.len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▌ ");
    f.render_stateful_widget(event_list, chunks[2], &mut app.event_list);

    // Footer
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(" ↑/↓ ", Style::default().fg(Color::Cyan)),
        Span::raw("Events  "),
        Span::styled(" R ", Style::default().fg(Color::Cyan)),
        Span::raw("Refresh  "),
        Span::styled(" Esc ", Style::default().fg(Color::Yellow)),
        Span::raw("Quit "),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(footer, chunks[3]);

    draw_toast(f, &app.page);
}

fn draw_connecting(f: &mut Frame, board_url: &str) {
    let area = f.area();
    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Connecting…",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            board_url.to_string(),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Press Esc to close",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );

    let centered = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(9),
            Constraint::Percentage(40),
        ])
        .split(area);

    f.render_widget(text, centered[1]);
}

/// Overlay the `#toast` element in the lower-right corner while its
/// "show" class is present.
fn draw_toast(f: &mut Frame, page: &Page) {
    let Some(toast) = page.query("#toast") else {
        return;
    };
    if !toast.has_class("show") {
        return;
    }

    let color = if toast.has_class("error") {
        Color::Red
    } else if toast.has_class("warning") {
        Color::Yellow
    } else {
        Color::Green
    };

    let width = (toast.text.chars().count() as u16 + 4)
        .max(12)
        .min(f.area().width);
    let rect = toast_rect(f.area(), width);

    let body = Paragraph::new(Line::from(Span::styled(
        format!(" {} ", toast.text),
        Style::default().fg(color).add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color)),
    );

    f.render_widget(Clear, rect);
    f.render_widget(body, rect);
}

fn toast_rect(area: Rect, width: u16) -> Rect {
    let x = area.right().saturating_sub(width + 1).max(area.x);
    let y = area.bottom().saturating_sub(4).max(area.y);
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: 3.min(area.height),
    }
}
