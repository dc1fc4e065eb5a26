//! End-to-end orchestrator flow: feed snapshots in, derived state out,
//! driven entirely through `AsyncAction`s with no network.

use chrono::{DateTime, TimeZone, Utc};
use govoet_lib::app::{App, AsyncAction, CurrentScreen};
use govoet_lib::config::AppConfig;
use govoet_lib::feed::{Match, StreamServer, Team};
use govoet_lib::share;
use govoet_lib::status::{classify_at, MatchStatus};

fn utc(h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 29, h, mi, 0).unwrap()
}

fn record(id: &str, league: &str, home: &str, away: Option<&str>, time: &str) -> Match {
    Match {
        id: id.to_string(),
        league: league.to_string(),
        team1: Team {
            name: home.to_string(),
        },
        team2: away.map(|name| Team {
            name: name.to_string(),
        }),
        kickoff_date: "2026-08-29".to_string(),
        kickoff_time: time.to_string(),
        match_date: "2026-08-29".to_string(),
        match_time: time.to_string(),
        duration: "2".to_string(),
        servers: vec![StreamServer {
            url: format!("https://embedsports.top/e/{id}"),
            label: "HD".to_string(),
        }],
    }
}

fn load(app: &mut App, matches: Vec<Match>, now: DateTime<Utc>) {
    let seq = app.begin_refresh();
    app.apply_action(AsyncAction::ScheduleLoaded { seq, matches }, now);
}

#[test]
fn full_session_flow() {
    let mut app = App::new(AppConfig::default());
    let now = utc(14, 0); // 21:00 at the feed's +07:00 offset

    // Feed: one finished, two live, one upcoming, one solo event with a
    // manual live override buried in the duration field.
    let feed = vec![
        record("done", "EPL", "Leeds", Some("Derby"), "10:00"),
        record("up", "EPL", "Arsenal", Some("Chelsea"), "23:00"),
        record("live-b", "La Liga", "Barcelona", Some("Sevilla"), "20:30"),
        record("live-a", "EPL", "Liverpool", Some("Everton"), "20:00"),
        {
            let mut ufc = record("ufc", "UFC", "UFC 320", None, "junk");
            ufc.match_date = "junk".to_string();
            ufc.duration = "LIVE".to_string();
            ufc
        },
    ];

    load(&mut app, feed, now);

    // Past dropped; live first ordered by kickoff, override-live included.
    let ids: Vec<&str> = app.schedule.iter().map(|m| m.id.as_str()).collect();
    assert_eq!(ids.len(), 4);
    assert!(!ids.contains(&"done"));
    assert_eq!(ids.last(), Some(&"up"), "upcoming sorts after all live");
    for m in &app.schedule[..3] {
        assert_eq!(classify_at(m, now), MatchStatus::Live);
    }

    // Search narrows across team and league names.
    app.search_input = "barce".to_string().into();
    let hits = app.filtered_matches();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, "live-b");
    app.search_input = tui_input::Input::default();

    // League filter intersects.
    app.league_filter = Some("EPL".to_string());
    let epl: Vec<&str> = app.filtered_matches().iter().map(|m| m.id.as_str()).collect();
    assert!(epl.iter().all(|id| *id != "ufc" && *id != "live-b"));
    app.league_filter = None;

    // Open the upcoming match; countdown target resolves.
    let up = app.schedule.iter().find(|m| m.id == "up").cloned().unwrap();
    app.select_match(up);
    assert_eq!(app.current_screen, CurrentScreen::Player);
    assert!(app.countdown.is_some());

    // Kickoff is 23:00+07:00 = 16:00 UTC. Crossing it fires exactly once.
    assert!(!app.tick_countdown(utc(15, 59)));
    assert!(app.tick_countdown(utc(16, 0)));
    assert!(!app.tick_countdown(utc(16, 5)));

    // Background detector reports drift; consume clears it.
    app.apply_action(AsyncAction::UpdateAvailable, utc(16, 5));
    assert!(app.update_available);
    assert!(app.consume_update());

    // The refreshed feed no longer carries the selected match.
    load(
        &mut app,
        vec![record("live-b", "La Liga", "Barcelona", Some("Sevilla"), "20:30")],
        utc(16, 6),
    );
    assert!(app.selected.is_none(), "selection re-resolved and dropped");
    assert_eq!(app.current_screen, CurrentScreen::Schedule);
}

#[test]
fn failed_refresh_keeps_state_and_message_until_success() {
    let mut app = App::new(AppConfig::default());
    load(
        &mut app,
        vec![record("m1", "EPL", "A", Some("B"), "20:00")],
        utc(14, 0),
    );

    let seq = app.begin_refresh();
    app.apply_action(
        AsyncAction::ScheduleFailed {
            seq,
            error: "request failed: connection refused".to_string(),
        },
        utc(14, 1),
    );
    assert_eq!(app.schedule.len(), 1);
    assert!(app.error.is_some());

    // Next successful refresh clears the message.
    load(
        &mut app,
        vec![record("m1", "EPL", "A", Some("B"), "20:00")],
        utc(14, 2),
    );
    assert!(app.error.is_none());
}

#[test]
fn share_link_uses_configured_origin_and_solo_title() {
    let app = App::new(AppConfig::default());
    let m = record("m42", "UFC", "UFC 320", None, "20:00");
    let url = share::share_url(&app.config.share_origin, &m);
    assert!(url.ends_with("/m42"));
    assert_eq!(share::share_text(&m), "Watch UFC 320 live on GOVOET!");
}

#[test]
fn backup_domain_substitution_applies_to_mirrors() {
    let app = App::new(AppConfig::default());
    let m = record("m1", "EPL", "A", Some("B"), "20:00");
    let fixed = share::swap_stream_domain(
        &m.servers[0].url,
        &app.config.stream_domain,
        &app.config.stream_backup_domain,
    );
    assert!(fixed.contains(&app.config.stream_backup_domain));
}
