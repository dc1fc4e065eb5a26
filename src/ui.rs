use chrono::Utc;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, CurrentScreen};
use crate::countdown;
use crate::feed::Match;
use crate::status::{classify, countdown_target, MatchStatus};

const ACCENT: Color = Color::Cyan;
const LIVE_RED: Color = Color::Red;
const DIM: Color = Color::DarkGray;

pub fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.current_screen {
        CurrentScreen::Schedule => render_schedule(f, app, chunks[1]),
        CurrentScreen::Player => render_player(f, app, chunks[1]),
    }
    render_footer(f, app, chunks[2]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " GOVOET ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ),
        Span::styled("Live Sports Schedule", Style::default().fg(DIM)),
    ];
    if let Some(league) = &app.league_filter {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("[{league}]"),
            Style::default().fg(Color::Yellow),
        ));
    }
    if app.update_available {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            "Schedule updated: 'u' reload / 'x' dismiss",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_schedule(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    render_search_bar(f, app, chunks[0]);

    if app.loading {
        let spinner = Paragraph::new("Loading schedule...")
            .alignment(Alignment::Center)
            .style(Style::default().fg(ACCENT));
        f.render_widget(spinner, chunks[1]);
        return;
    }

    // A fetch error with nothing older to show gets the full panel;
    // with a previous schedule on screen it only occupies the footer.
    if app.schedule.is_empty() {
        if let Some(error) = &app.error {
            let text = vec![
                Line::from(Span::styled(
                    "There was an issue loading the schedule.",
                    Style::default().fg(LIVE_RED),
                )),
                Line::from(""),
                Line::from(Span::styled(error.clone(), Style::default().fg(DIM))),
            ];
            let p = Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            f.render_widget(p, chunks[1]);
            return;
        }
    }

    let filtered = app.filtered_matches();
    let items: Vec<ListItem> = filtered.iter().map(|m| schedule_item(m)).collect();

    let title = format!(" Matches ({}) ", filtered.len());
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .bg(Color::Rgb(30, 40, 50))
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    f.render_stateful_widget(list, chunks[1], &mut app.list_state);
}

fn schedule_item(m: &Match) -> ListItem<'static> {
    let status = classify(m);
    let badge = match status {
        MatchStatus::Live => Span::styled(
            "● LIVE   ",
            Style::default().fg(LIVE_RED).add_modifier(Modifier::BOLD),
        ),
        // Display uses the display-oriented kickoff pair as-is.
        _ => Span::styled(
            format!("{:<9}", m.kickoff_time),
            Style::default().fg(DIM),
        ),
    };
    let line = Line::from(vec![
        badge,
        Span::styled(m.title(), Style::default().fg(Color::White)),
        Span::styled(format!("  {}", m.league), Style::default().fg(ACCENT)),
        Span::styled(format!("  {}", m.kickoff_date), Style::default().fg(DIM)),
    ]);
    ListItem::new(line)
}

fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let style = if app.search_mode {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(DIM)
    };
    let content = if app.search_input.value().is_empty() && !app.search_mode {
        "Press '/' to search for a team or league".to_string()
    } else {
        app.search_input.value().to_string()
    };
    let bar = Paragraph::new(content)
        .style(style)
        .block(Block::default().borders(Borders::ALL).title(" Search "));
    f.render_widget(bar, area);
    if app.search_mode {
        let x = area.x + 1 + app.search_input.visual_cursor() as u16;
        f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

fn render_player(f: &mut Frame, app: &App, area: Rect) {
    let Some(m) = &app.selected else {
        let p = Paragraph::new("No match selected.").alignment(Alignment::Center);
        f.render_widget(p, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(6),
        ])
        .split(area);

    let info = vec![
        Line::from(Span::styled(m.league.clone(), Style::default().fg(ACCENT))),
        Line::from(Span::styled(
            m.title(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
    ];
    let info = Paragraph::new(info).block(Block::default().borders(Borders::ALL));
    f.render_widget(info, chunks[0]);

    render_kickoff_panel(f, m, chunks[1]);
    render_server_list(f, app, m, chunks[2]);
}

fn render_kickoff_panel(f: &mut Frame, m: &Match, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Kick-off ");
    let now = Utc::now();

    let lines: Vec<Line> = if classify(m).is_live() {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                "● LIVE NOW",
                Style::default().fg(LIVE_RED).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press 'o' to open the stream in your browser.",
                Style::default().fg(DIM),
            )),
        ]
    } else {
        match countdown_target(m) {
            Some(target) => match countdown::time_left(target, now) {
                Some(left) => vec![
                    Line::from(Span::styled(
                        "Countdown to Kick-off",
                        Style::default().fg(DIM),
                    )),
                    Line::from(""),
                    Line::from(Span::styled(
                        format!(
                            "{:02} : {:02} : {:02} : {:02}",
                            left.days, left.hours, left.minutes, left.seconds
                        ),
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        "days   hours  mins   secs",
                        Style::default().fg(DIM),
                    )),
                ],
                None => vec![
                    Line::from(""),
                    Line::from(Span::styled(
                        "Match Has Started!",
                        Style::default()
                            .fg(Color::White)
                            .add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(
                        "If the stream isn't up yet, we're checking for updates.",
                        Style::default().fg(DIM),
                    )),
                ],
            },
            None => vec![
                Line::from(""),
                Line::from(Span::styled(
                    "Kick-off time not available",
                    Style::default().fg(DIM),
                )),
            ],
        }
    };

    let panel = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    f.render_widget(panel, area);
}

fn render_server_list(f: &mut Frame, app: &App, m: &Match, area: Rect) {
    let lines: Vec<Line> = if m.servers.is_empty() {
        vec![Line::from(Span::styled(
            "No stream available for this match.",
            Style::default().fg(DIM),
        ))]
    } else {
        let mut spans = Vec::new();
        for (i, server) in m.servers.iter().enumerate() {
            let style = if i == app.selected_server_index {
                Style::default()
                    .fg(Color::Black)
                    .bg(ACCENT)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            spans.push(Span::styled(format!(" {} ", server.label), style));
            spans.push(Span::raw(" "));
        }
        vec![
            Line::from(spans),
            Line::from(""),
            Line::from(Span::styled(
                app.selected_server_url().unwrap_or("").to_string(),
                Style::default().fg(DIM),
            )),
        ]
    };
    let panel = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Servers (←/→ switch, 'o' open, 'f' fix, 'c' share) "),
    );
    f.render_widget(panel, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    // Notice beats retained error; both beat the key hints.
    let line = if let Some((notice, _)) = &app.notice {
        Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        ))
    } else if let Some(error) = &app.error {
        Line::from(Span::styled(error.clone(), Style::default().fg(LIVE_RED)))
    } else {
        match app.current_screen {
            CurrentScreen::Schedule => Line::from(Span::styled(
                " ↑/↓ navigate | Enter open | / search | l league | r refresh | q quit",
                Style::default().fg(DIM),
            )),
            CurrentScreen::Player => Line::from(Span::styled(
                " Esc back | ←/→ server | o open | f fix stream | c copy link | q quit",
                Style::default().fg(DIM),
            )),
        }
    };
    let footer = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(footer, area);
}
