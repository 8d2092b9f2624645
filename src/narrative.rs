use tracing::debug;

use crate::models::{
    BlownLeadSide, GameNarrative, GameRecord, NarrativeHistory, TeamNarrativeEntry,
};

/// Clutch window: the final five minutes of the regulation fourth quarter
pub const CLUTCH_SECONDS: u32 = 5 * 60;

/// A lead at or above this that ends in a loss counts as blown
pub const BLOWN_LEAD_THRESHOLD: i32 = 10;

fn parse_clock(clock: &str) -> Option<u32> {
    let (mins, secs) = clock.split_once(':')?;
    let mins: u32 = mins.trim().parse().ok()?;
    let secs: u32 = secs.trim().parse().ok()?;
    Some(mins * 60 + secs)
}

/// Scan one completed game's play-by-play log into narrative metrics.
///
/// Maximum leads are tracked across every period, overtime included. The
/// clutch window covers only quarter 4 events with five minutes or less on
/// the clock; overtime scoring never counts as clutch. Returns `None` for
/// games that are not completed, have no parseable date, or carry no
/// play-by-play periods.
pub fn extract_narrative(record: &GameRecord) -> Option<GameNarrative> {
    if !record.is_completed() {
        return None;
    }
    let game_date = record.game_date()?;
    if record.periods.is_empty() {
        return None;
    }

    let home_name = record.home.display_name();
    let away_name = record.away.display_name();
    let home_points = record.home.final_points().unwrap_or(0);
    let away_points = record.away.final_points().unwrap_or(0);

    let mut max_home_lead = 0;
    let mut max_away_lead = 0;
    let mut clutch_home_points = 0;
    let mut clutch_away_points = 0;

    // running cumulative score, updated on every parseable event
    let mut last_home = 0;
    let mut last_away = 0;

    for period in &record.periods {
        let in_fourth = period.period_type.as_deref() == Some("quarter")
            && period.number == Some(4);

        for event in &period.events {
            let (home_pts, away_pts) = match (event.home_points, event.away_points) {
                (Some(h), Some(a)) => (h, a),
                _ => continue,
            };

            let lead = home_pts - away_pts;
            if lead > max_home_lead {
                max_home_lead = lead;
            }
            if -lead > max_away_lead {
                max_away_lead = -lead;
            }

            if in_fourth {
                let seconds = event.clock.as_deref().and_then(parse_clock);
                if matches!(seconds, Some(s) if s <= CLUTCH_SECONDS) {
                    if home_pts > last_home {
                        clutch_home_points += home_pts - last_home;
                    }
                    if away_pts > last_away {
                        clutch_away_points += away_pts - last_away;
                    }
                }
            }

            last_home = home_pts;
            last_away = away_pts;
        }
    }

    let final_margin = home_points - away_points;
    let winner_is_home = final_margin > 0;
    let winner_is_away = final_margin < 0;

    // only the eventual loser can blow a lead
    let blown_lead_side = if max_home_lead >= BLOWN_LEAD_THRESHOLD && winner_is_away {
        Some(BlownLeadSide::Home)
    } else if max_away_lead >= BLOWN_LEAD_THRESHOLD && winner_is_home {
        Some(BlownLeadSide::Away)
    } else {
        None
    };
    let blown_lead_team = blown_lead_side.map(|side| match side {
        BlownLeadSide::Home => home_name.clone(),
        BlownLeadSide::Away => away_name.clone(),
    });

    Some(GameNarrative {
        game: record.matchup_key(),
        game_date,
        home_team: home_name,
        away_team: away_name,
        home_points,
        away_points,
        max_home_lead,
        max_away_lead,
        blown_lead_team,
        blown_lead_side,
        clutch_home_points,
        clutch_away_points,
        clutch_margin: clutch_home_points - clutch_away_points,
    })
}

/// Rebuild the per-team narrative index from raw records.
///
/// Each narrated game contributes one entry to both teams' logs with the
/// clutch margin signed for that team; logs come back sorted chronologically.
pub fn build_team_narratives(records: &[GameRecord]) -> NarrativeHistory {
    let mut history = NarrativeHistory::new();

    for record in records {
        let narrative = match extract_narrative(record) {
            Some(n) => n,
            None => continue,
        };
        let (home_id, away_id) = match (record.home.id.clone(), record.away.id.clone()) {
            (Some(h), Some(a)) => (h, a),
            _ => {
                debug!("Skipping narrative without team ids: {}", narrative.game);
                continue;
            }
        };

        history.entry(home_id).or_default().push(TeamNarrativeEntry {
            game_date: narrative.game_date,
            clutch_margin: narrative.clutch_margin,
            max_lead: narrative.max_home_lead,
            blew_lead: narrative.blown_lead_side == Some(BlownLeadSide::Home),
        });
        history.entry(away_id).or_default().push(TeamNarrativeEntry {
            game_date: narrative.game_date,
            clutch_margin: -narrative.clutch_margin,
            max_lead: narrative.max_away_lead,
            blew_lead: narrative.blown_lead_side == Some(BlownLeadSide::Away),
        });
    }

    for entries in history.values_mut() {
        entries.sort_by_key(|e| e.game_date);
    }

    history
}

fn last_n(entries: &[TeamNarrativeEntry], n: usize) -> &[TeamNarrativeEntry] {
    let start = entries.len().saturating_sub(n);
    &entries[start..]
}

/// Share of the last `n` games where the team blew a lead
pub fn blown_rate(entries: &[TeamNarrativeEntry], n: usize) -> f64 {
    let recent = last_n(entries, n);
    if recent.is_empty() {
        return 0.0;
    }
    let blew = recent.iter().filter(|e| e.blew_lead).count();
    blew as f64 / recent.len() as f64
}

/// Simple mean clutch margin over the last `n` games
pub fn avg_clutch_margin(entries: &[TeamNarrativeEntry], n: usize) -> f64 {
    let recent = last_n(entries, n);
    if recent.is_empty() {
        return 0.0;
    }
    recent.iter().map(|e| f64::from(e.clutch_margin)).sum::<f64>() / recent.len() as f64
}

/// Simple mean max lead over the last `n` games
pub fn avg_max_lead(entries: &[TeamNarrativeEntry], n: usize) -> f64 {
    let recent = last_n(entries, n);
    if recent.is_empty() {
        return 0.0;
    }
    recent.iter().map(|e| f64::from(e.max_lead)).sum::<f64>() / recent.len() as f64
}
