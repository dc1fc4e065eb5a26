use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::feed::Match;
use crate::status::{classify_at, kickoff_instant, MatchStatus};

/// Build the display schedule from a raw feed snapshot: drop everything
/// already past, then order live matches first and, within a status, by
/// ascending kickoff instant. The sort is stable, so records whose dates
/// cannot be parsed keep their relative feed order.
///
/// A record with completely unparsable dates still survives (classified
/// Upcoming); one bad row never aborts normalization of the rest.
pub fn normalize(records: &[Match], now: DateTime<Utc>) -> Vec<Match> {
    let mut survivors: Vec<Match> = records
        .iter()
        .filter(|m| classify_at(m, now) != MatchStatus::Past)
        .cloned()
        .collect();

    survivors.sort_by(|a, b| {
        let status_a = classify_at(a, now);
        let status_b = classify_at(b, now);

        if status_a != status_b {
            return status_a.priority().cmp(&status_b.priority());
        }

        match (kickoff_instant(a), kickoff_instant(b)) {
            (Some(ka), Some(kb)) => ka.cmp(&kb),
            // Either instant unparsable: leave the pair where it was.
            _ => Ordering::Equal,
        }
    });

    survivors
}

/// Presentation-facing filtered view: optional exact league match
/// intersected with a case-insensitive substring search over both team
/// names and the league. Recomputed on demand; always returns a sequence.
pub fn filter_matches<'a>(
    matches: &'a [Match],
    query: &str,
    league: Option<&str>,
) -> Vec<&'a Match> {
    let query = query.to_lowercase();
    matches
        .iter()
        .filter(|m| match league {
            Some(league) => m.league.eq_ignore_ascii_case(league),
            None => true,
        })
        .filter(|m| {
            if query.is_empty() {
                return true;
            }
            m.team1.name.to_lowercase().contains(&query)
                || m.team2
                    .as_ref()
                    .is_some_and(|t| t.name.to_lowercase().contains(&query))
                || m.league.to_lowercase().contains(&query)
        })
        .collect()
}

/// Distinct leagues in schedule order, for the league filter cycle.
pub fn leagues(matches: &[Match]) -> Vec<String> {
    let mut seen = Vec::new();
    for m in matches {
        if !seen.iter().any(|l: &String| l.eq_ignore_ascii_case(&m.league)) {
            seen.push(m.league.clone());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::Team;
    use chrono::TimeZone;

    fn utc(h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 29, h, mi, 0).unwrap()
    }

    fn match_record(id: &str, date: &str, time: &str, duration: &str) -> Match {
        Match {
            id: id.to_string(),
            league: "Test League".to_string(),
            team1: Team {
                name: format!("{id} Home"),
            },
            team2: Some(Team {
                name: format!("{id} Away"),
            }),
            kickoff_date: date.to_string(),
            kickoff_time: time.to_string(),
            match_date: date.to_string(),
            match_time: time.to_string(),
            duration: duration.to_string(),
            servers: Vec::new(),
        }
    }

    #[test]
    fn test_normalize_drops_past_and_orders_by_status() {
        // Scenario C: 2 past, 2 live, 1 upcoming. Now = 14:00 UTC
        // (21:00 at the feed's +07:00 offset).
        let feed = vec![
            match_record("up1", "2026-08-29", "23:00", "2"), // 16:00 UTC, upcoming
            match_record("past1", "2026-08-29", "10:00", "2"), // ended 05:00 UTC
            match_record("live2", "2026-08-29", "20:30", "2"), // 13:30 UTC, live
            match_record("past2", "2026-08-28", "20:00", "2"),
            match_record("live1", "2026-08-29", "20:00", "2"), // 13:00 UTC, live
        ];

        let normalized = normalize(&feed, utc(14, 0));
        let ids: Vec<&str> = normalized.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["live1", "live2", "up1"]);
    }

    #[test]
    fn test_normalize_never_emits_past() {
        let feed = vec![
            match_record("a", "2026-08-27", "20:00", "2"),
            match_record("b", "2026-08-26", "20:00", "2"),
        ];
        assert!(normalize(&feed, utc(14, 0)).is_empty());
    }

    #[test]
    fn test_unparsable_dates_survive_in_input_order() {
        let feed = vec![
            match_record("tba2", "tba", "tba", "2"),
            match_record("up1", "2026-08-29", "22:00", "2"), // 15:00 UTC
            match_record("tba1", "???", "??", "2"),
        ];
        let normalized = normalize(&feed, utc(14, 0));
        let ids: Vec<&str> = normalized.iter().map(|m| m.id.as_str()).collect();
        // All upcoming; unparsable pairs compare equal, stable sort keeps
        // feed order among them.
        assert_eq!(ids, vec!["tba2", "up1", "tba1"]);
    }

    #[test]
    fn test_live_sorted_by_kickoff_within_status() {
        let feed = vec![
            match_record("late", "2026-08-29", "20:45", "3"),
            match_record("early", "2026-08-29", "19:00", "3"),
        ];
        let normalized = normalize(&feed, utc(14, 0));
        let ids: Vec<&str> = normalized.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late"]);
    }

    #[test]
    fn test_filter_by_query() {
        let mut a = match_record("a", "2026-08-29", "22:00", "2");
        a.team1.name = "Arsenal".to_string();
        a.team2 = Some(Team {
            name: "Chelsea".to_string(),
        });
        a.league = "Premier League".to_string();
        let mut b = match_record("b", "2026-08-29", "22:00", "2");
        b.team1.name = "Barcelona".to_string();
        b.team2 = None;
        b.league = "La Liga".to_string();
        let matches = vec![a, b];

        let hit = |q: &str| -> Vec<&str> {
            filter_matches(&matches, q, None)
                .iter()
                .map(|m| m.id.as_str())
                .collect()
        };

        assert_eq!(hit("chel"), vec!["a"]); // team2 name
        assert_eq!(hit("BARCE"), vec!["b"]); // team1, case-insensitive
        assert_eq!(hit("liga"), vec!["b"]); // league
        assert_eq!(hit(""), vec!["a", "b"]);
        assert!(hit("zzz").is_empty());
    }

    #[test]
    fn test_filter_by_league_intersects_query() {
        let mut a = match_record("a", "2026-08-29", "22:00", "2");
        a.league = "Premier League".to_string();
        a.team1.name = "Arsenal".to_string();
        let mut b = match_record("b", "2026-08-29", "22:00", "2");
        b.league = "La Liga".to_string();
        b.team1.name = "Arsenal B".to_string();
        let matches = vec![a, b];

        let filtered = filter_matches(&matches, "arsenal", Some("la liga"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
    }

    #[test]
    fn test_leagues_are_distinct_in_order() {
        let mut a = match_record("a", "", "", "");
        a.league = "EPL".to_string();
        let mut b = match_record("b", "", "", "");
        b.league = "UFC".to_string();
        let mut c = match_record("c", "", "", "");
        c.league = "epl".to_string();
        assert_eq!(leagues(&[a, b, c]), vec!["EPL", "UFC"]);
    }
}
