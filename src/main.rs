use std::io;
use std::time::{Duration, Instant};

use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use govoet_lib::app::{App, AsyncAction};
use govoet_lib::config::AppConfig;
use govoet_lib::feed::FeedClient;
use govoet_lib::handlers::actions::{spawn_refresh, spawn_update_poller};
use govoet_lib::handlers::input::{handle_key, KeyOutcome};
use govoet_lib::ui;

/// How often finished matches are swept out of the schedule.
const PRUNE_INTERVAL: Duration = Duration::from_secs(60);
/// Countdown re-tick cadence.
const COUNTDOWN_TICK: Duration = Duration::from_secs(1);

#[derive(clap::Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Jump straight to a match by its feed id (deep link).
    match_id: Option<String>,

    /// Override the schedule feed URL from the config file.
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    use clap::Parser;
    let args = Args::parse();

    let mut config = AppConfig::load()?;
    if let Some(url) = args.url {
        config.schedule_url = url;
    }

    // Setup Terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // App State
    let client = FeedClient::new(config.schedule_url.clone(), config.update_url.clone());
    let mut app = App::new(config);
    app.pending_deep_link = args.match_id;

    // Async Channel
    let (tx, mut rx) = mpsc::channel::<AsyncAction>(32);

    let res = run_app(&mut terminal, &mut app, &client, tx, &mut rx).await;

    // Restore Terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    client: &FeedClient,
    tx: mpsc::Sender<AsyncAction>,
    rx: &mut mpsc::Receiver<AsyncAction>,
) -> io::Result<()>
where
    io::Error: From<<B as ratatui::backend::Backend>::Error>,
{
    // Initial load plus the first update-poll cycle.
    spawn_refresh(app, client, &tx);
    let mut poller: JoinHandle<()> = spawn_update_poller(client, &tx);

    let mut last_countdown_tick = Instant::now();
    let mut last_prune = Instant::now();

    loop {
        terminal.draw(|f| ui::ui(f, app))?;

        // 1. Apply background results (non-blocking).
        while let Ok(action) = rx.try_recv() {
            app.apply_action(action, Utc::now());
        }

        // 2. Keyboard input, with a 100ms budget so timers stay serviced.
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(app, key, client, &tx) {
                        KeyOutcome::RearmPoller => {
                            poller.abort();
                            poller = spawn_update_poller(client, &tx);
                        }
                        KeyOutcome::None => {}
                    }
                }
            }
        }

        // 3. Countdown tick: a zero-crossing re-checks the schedule so the
        //    selected match can migrate to live.
        if last_countdown_tick.elapsed() >= COUNTDOWN_TICK {
            last_countdown_tick = Instant::now();
            if app.tick_countdown(Utc::now()) {
                spawn_refresh(app, client, &tx);
            }
            app.expire_notice();
        }

        // 4. Prune sweep: drop matches that finished since the last refresh.
        if last_prune.elapsed() >= PRUNE_INTERVAL {
            last_prune = Instant::now();
            app.prune_finished(Utc::now());
        }

        if app.should_quit {
            poller.abort();
            return Ok(());
        }
    }
}
