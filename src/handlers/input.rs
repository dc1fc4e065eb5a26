use crossterm::event::{Event, KeyCode, KeyEvent};
use tokio::sync::mpsc;
use tui_input::backend::crossterm::EventHandler;

use crate::app::{App, AsyncAction, CurrentScreen};
use crate::feed::FeedClient;
use crate::handlers::actions::spawn_refresh;
use crate::share;

/// Side effect a key press asks the event loop to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    None,
    /// An update was consumed; restart the poller for the next cycle.
    RearmPoller,
}

pub fn handle_key(
    app: &mut App,
    key: KeyEvent,
    client: &FeedClient,
    tx: &mpsc::Sender<AsyncAction>,
) -> KeyOutcome {
    // Search editing captures everything except its own exit keys.
    if app.search_mode && app.current_screen == CurrentScreen::Schedule {
        match key.code {
            KeyCode::Esc => {
                app.search_mode = false;
                app.search_input.reset();
                app.clamp_list_selection();
            }
            KeyCode::Enter => {
                app.search_mode = false;
            }
            _ => {
                app.search_input.handle_event(&Event::Key(key));
                app.clamp_list_selection();
            }
        }
        return KeyOutcome::None;
    }

    // Update banner keys work on both screens.
    match key.code {
        KeyCode::Char('u') if app.update_available => {
            if app.consume_update() {
                spawn_refresh(app, client, tx);
                return KeyOutcome::RearmPoller;
            }
            return KeyOutcome::None;
        }
        KeyCode::Char('x') if app.update_available => {
            app.dismiss_update();
            return KeyOutcome::None;
        }
        _ => {}
    }

    match app.current_screen {
        CurrentScreen::Schedule => handle_schedule_key(app, key, client, tx),
        CurrentScreen::Player => handle_player_key(app, key),
    }
}

fn handle_schedule_key(
    app: &mut App,
    key: KeyEvent,
    client: &FeedClient,
    tx: &mpsc::Sender<AsyncAction>,
) -> KeyOutcome {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('/') => app.search_mode = true,
        KeyCode::Up | KeyCode::Char('k') => app.move_list_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => app.move_list_selection(1),
        KeyCode::PageUp => app.move_list_selection(-10),
        KeyCode::PageDown => app.move_list_selection(10),
        KeyCode::Enter => app.select_highlighted(),
        KeyCode::Char('l') => app.cycle_league_filter(),
        KeyCode::Char('r') => spawn_refresh(app, client, tx),
        _ => {}
    }
    KeyOutcome::None
}

fn handle_player_key(app: &mut App, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') => app.deselect(),
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Left => app.cycle_server(false),
        KeyCode::Right | KeyCode::Tab => app.cycle_server(true),
        KeyCode::Char('o') => open_stream(app, false),
        KeyCode::Char('f') => open_stream(app, true),
        KeyCode::Char('c') => copy_share_link(app),
        _ => {}
    }
    KeyOutcome::None
}

/// Hand the selected mirror URL to the system browser, optionally with the
/// primary->backup embed-domain substitution applied.
fn open_stream(app: &mut App, use_backup_domain: bool) {
    let Some(url) = app.selected_server_url().map(str::to_string) else {
        app.set_notice("No stream available for this match.");
        return;
    };
    let url = if use_backup_domain {
        share::swap_stream_domain(&url, &app.config.stream_domain, &app.config.stream_backup_domain)
    } else {
        url
    };
    match webbrowser::open(&url) {
        Ok(()) => app.set_notice(format!("Opening {url}")),
        Err(err) => app.set_notice(format!("Could not open browser: {err}")),
    }
}

fn copy_share_link(app: &mut App) {
    let Some(m) = &app.selected else {
        return;
    };
    let url = share::share_url(&app.config.share_origin, m);
    match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(url.clone())) {
        Ok(()) => app.set_notice(format!("Link copied: {url}")),
        Err(err) => app.set_notice(format!("Clipboard unavailable: {err}")),
    }
}
