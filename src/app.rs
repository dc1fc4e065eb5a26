use chrono::{DateTime, Utc};
use ratatui::widgets::ListState;
use tui_input::Input;

use crate::config::AppConfig;
use crate::countdown::{CountdownEngine, CountdownTick};
use crate::feed::Match;
use crate::schedule;
use crate::status::{classify_at, countdown_target, MatchStatus};

/// Results of background tasks, delivered over the mpsc channel and
/// applied on the event-loop thread. Schedule responses carry the
/// sequence token of the refresh that issued them.
#[derive(Debug, Clone)]
pub enum AsyncAction {
    ScheduleLoaded { seq: u64, matches: Vec<Match> },
    ScheduleFailed { seq: u64, error: String },
    UpdateAvailable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrentScreen {
    /// Searchable match list.
    Schedule,
    /// Selected match: servers, countdown, share.
    Player,
}

/// Central application state. Owns the canonical schedule and the current
/// selection; mutated only on the event-loop thread, so background tasks
/// never touch it directly.
pub struct App {
    pub config: AppConfig,
    pub current_screen: CurrentScreen,
    pub should_quit: bool,

    /// Canonical normalized schedule, replaced wholesale on refresh.
    pub schedule: Vec<Match>,
    /// First-load indicator only; background refreshes never blank the UI.
    pub loading: bool,
    /// Retained until the next successful refresh or explicit retry.
    pub error: Option<String>,

    /// Owned snapshot of the selected match, re-resolved by id on every
    /// refresh. The prune sweep leaves it alone so a viewer is never
    /// kicked out mid-stream.
    pub selected: Option<Match>,
    pub selected_server_index: usize,
    pub countdown: Option<CountdownEngine>,

    pub search_input: Input,
    pub search_mode: bool,
    pub league_filter: Option<String>,
    pub list_state: ListState,

    /// Raised by the update detector, cleared by consume/dismiss.
    pub update_available: bool,

    /// Match id from the command line, resolved once against the first
    /// loaded snapshot. Unknown ids are dropped silently.
    pub pending_deep_link: Option<String>,

    /// Transient toast ("Link copied", "Opening stream...").
    pub notice: Option<(String, std::time::Instant)>,

    refresh_seq: u64,
    pub refresh_in_flight: bool,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            current_screen: CurrentScreen::Schedule,
            should_quit: false,
            schedule: Vec::new(),
            loading: false,
            error: None,
            selected: None,
            selected_server_index: 0,
            countdown: None,
            search_input: Input::default(),
            search_mode: false,
            league_filter: None,
            list_state: ListState::default(),
            update_available: false,
            pending_deep_link: None,
            notice: None,
            refresh_seq: 0,
            refresh_in_flight: false,
        }
    }

    /// Issue a new refresh token. Responses carrying older tokens are
    /// dropped on arrival, so overlapping refreshes are last-issued-wins.
    pub fn begin_refresh(&mut self) -> u64 {
        self.refresh_seq += 1;
        self.refresh_in_flight = true;
        self.loading = self.schedule.is_empty();
        self.refresh_seq
    }

    pub fn apply_action(&mut self, action: AsyncAction, now: DateTime<Utc>) {
        match action {
            AsyncAction::ScheduleLoaded { seq, matches } => {
                if seq != self.refresh_seq {
                    return; // superseded by a newer refresh
                }
                self.refresh_in_flight = false;
                self.loading = false;
                self.error = None;
                self.schedule = schedule::normalize(&matches, now);
                self.reconcile_selection();
                self.resolve_deep_link();
                self.clamp_list_selection();
            }
            AsyncAction::ScheduleFailed { seq, error } => {
                if seq != self.refresh_seq {
                    return;
                }
                // Previous schedule stays; only the message changes.
                self.refresh_in_flight = false;
                self.loading = false;
                self.error = Some(error);
            }
            AsyncAction::UpdateAvailable => {
                self.update_available = true;
            }
        }
    }

    /// Re-resolve the selection against the freshly replaced schedule.
    fn reconcile_selection(&mut self) {
        let Some(current) = &self.selected else {
            return;
        };
        match self.schedule.iter().find(|m| m.id == current.id) {
            Some(fresh) => {
                let fresh = fresh.clone();
                self.selected_server_index =
                    self.selected_server_index.min(fresh.servers.len().saturating_sub(1));
                self.rebuild_countdown(&fresh);
                self.selected = Some(fresh);
            }
            None => self.deselect(),
        }
    }

    fn resolve_deep_link(&mut self) {
        if let Some(id) = self.pending_deep_link.take() {
            if let Some(m) = self.schedule.iter().find(|m| m.id == id).cloned() {
                self.select_match(m);
            }
        }
    }

    fn rebuild_countdown(&mut self, m: &Match) {
        match countdown_target(m) {
            Some(target) => match &mut self.countdown {
                // Same target: keep the machine, including a settled one.
                Some(engine) if engine.target() == target => {}
                Some(engine) => engine.reset(target),
                None => self.countdown = Some(CountdownEngine::new(target)),
            },
            None => self.countdown = None,
        }
    }

    pub fn select_match(&mut self, m: Match) {
        self.selected_server_index = 0;
        self.countdown = countdown_target(&m).map(CountdownEngine::new);
        self.selected = Some(m);
        self.current_screen = CurrentScreen::Player;
    }

    pub fn deselect(&mut self) {
        self.selected = None;
        self.countdown = None;
        self.selected_server_index = 0;
        self.current_screen = CurrentScreen::Schedule;
    }

    pub fn selected_server_url(&self) -> Option<&str> {
        self.selected
            .as_ref()
            .and_then(|m| m.servers.get(self.selected_server_index))
            .map(|s| s.url.as_str())
    }

    pub fn cycle_server(&mut self, forward: bool) {
        let Some(m) = &self.selected else { return };
        if m.servers.is_empty() {
            return;
        }
        let len = m.servers.len();
        self.selected_server_index = if forward {
            (self.selected_server_index + 1) % len
        } else {
            (self.selected_server_index + len - 1) % len
        };
    }

    /// Drive the 1 s countdown tick. Returns true exactly once per target
    /// when the countdown crosses zero; the caller reacts by refreshing
    /// the schedule so the match can migrate to live.
    pub fn tick_countdown(&mut self, now: DateTime<Utc>) -> bool {
        match &mut self.countdown {
            Some(engine) => engine.tick(now) == CountdownTick::Finished,
            None => false,
        }
    }

    /// Periodic sweep: drop matches that crossed into past since the last
    /// refresh. The vector is only replaced when something was actually
    /// removed, and the selection is deliberately left untouched.
    pub fn prune_finished(&mut self, now: DateTime<Utc>) {
        let filtered: Vec<Match> = self
            .schedule
            .iter()
            .filter(|m| classify_at(m, now) != MatchStatus::Past)
            .cloned()
            .collect();
        if filtered.len() != self.schedule.len() {
            self.schedule = filtered;
            self.clamp_list_selection();
        }
    }

    /// Current filtered view for the list screen.
    pub fn filtered_matches(&self) -> Vec<&Match> {
        schedule::filter_matches(
            &self.schedule,
            self.search_input.value(),
            self.league_filter.as_deref(),
        )
    }

    /// Cycle the league filter: All -> each league in schedule order -> All.
    pub fn cycle_league_filter(&mut self) {
        let leagues = schedule::leagues(&self.schedule);
        self.league_filter = match &self.league_filter {
            None => leagues.first().cloned(),
            Some(current) => {
                let pos = leagues.iter().position(|l| l.eq_ignore_ascii_case(current));
                match pos {
                    Some(i) if i + 1 < leagues.len() => Some(leagues[i + 1].clone()),
                    _ => None,
                }
            }
        };
        self.clamp_list_selection();
    }

    pub fn move_list_selection(&mut self, delta: i64) {
        let len = self.filtered_matches().len();
        if len == 0 {
            self.list_state.select(None);
            return;
        }
        let current = self.list_state.selected().unwrap_or(0) as i64;
        let next = (current + delta).clamp(0, len as i64 - 1) as usize;
        self.list_state.select(Some(next));
    }

    pub fn clamp_list_selection(&mut self) {
        let len = self.filtered_matches().len();
        if len == 0 {
            self.list_state.select(None);
        } else {
            let current = self.list_state.selected().unwrap_or(0);
            self.list_state.select(Some(current.min(len - 1)));
        }
    }

    /// Open the highlighted list entry.
    pub fn select_highlighted(&mut self) {
        let picked = self
            .list_state
            .selected()
            .and_then(|i| self.filtered_matches().get(i).copied().cloned());
        if let Some(m) = picked {
            self.select_match(m);
        }
    }

    /// True when the caller should run a refresh and re-arm the poller.
    pub fn consume_update(&mut self) -> bool {
        if !self.update_available {
            return false;
        }
        self.update_available = false;
        true
    }

    pub fn dismiss_update(&mut self) {
        self.update_available = false;
    }

    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some((text.into(), std::time::Instant::now()));
    }

    /// Drop the toast once it has been on screen long enough.
    pub fn expire_notice(&mut self) {
        if let Some((_, since)) = &self.notice {
            if since.elapsed() > std::time::Duration::from_secs(3) {
                self.notice = None;
            }
        }
    }
}
