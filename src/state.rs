use std::collections::VecDeque;

use chrono::NaiveDateTime;

use crate::anim::ScoreCounter;
use crate::snapshot_fetch::{PerformerEntry, PlayerEntry, Snapshot, TeamResult};

const LOG_CAPACITY: usize = 50;

/// Load lifecycle of one page instance. `Rendered` and `Errored` are terminal
/// until the operator requests a reload, which starts a fresh instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Rendered,
    Errored,
}

/// Messages from the provider thread to the UI loop.
#[derive(Debug)]
pub enum Delta {
    Snapshot(Box<Snapshot>),
    LoadFailed(String),
    Log(String),
}

/// Requests from the UI loop to the provider thread.
#[derive(Debug, Clone, Copy)]
pub enum ProviderCommand {
    FetchSnapshot,
}

pub struct AppState {
    pub phase: Phase,
    pub snapshot: Option<Snapshot>,
    pub winner_line: Option<String>,
    pub team1_counter: ScoreCounter,
    pub team2_counter: ScoreCounter,
    /// Seconds since the current snapshot was applied; drives row entrances.
    pub render_elapsed: f64,
    pub error_detail: Option<String>,
    pub help_overlay: bool,
    pub logs: VecDeque<String>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            snapshot: None,
            winner_line: None,
            team1_counter: ScoreCounter::idle(),
            team2_counter: ScoreCounter::idle(),
            render_elapsed: 0.0,
            error_detail: None,
            help_overlay: false,
            logs: VecDeque::new(),
        }
    }

    pub fn begin_loading(&mut self) {
        self.phase = Phase::Loading;
        self.snapshot = None;
        self.winner_line = None;
        self.team1_counter = ScoreCounter::idle();
        self.team2_counter = ScoreCounter::idle();
        self.render_elapsed = 0.0;
        self.error_detail = None;
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.winner_line = Some(winner_line(&snapshot.team1, &snapshot.team2));
        self.team1_counter = ScoreCounter::counting_to(snapshot.team1.total_points);
        self.team2_counter = ScoreCounter::counting_to(snapshot.team2.total_points);
        self.render_elapsed = 0.0;
        self.error_detail = None;
        self.snapshot = Some(snapshot);
        self.phase = Phase::Rendered;
    }

    /// Advances the animations by `dt` seconds of wall time.
    pub fn tick(&mut self, dt: f64) {
        if self.phase != Phase::Rendered {
            return;
        }
        self.team1_counter.advance(dt);
        self.team2_counter.advance(dt);
        self.render_elapsed += dt;
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        if self.logs.len() == LOG_CAPACITY {
            self.logs.pop_front();
        }
        self.logs.push_back(msg.into());
    }

    pub fn last_log(&self) -> Option<&str> {
        self.logs.back().map(String::as_str)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::Snapshot(snapshot) => {
            state.push_log("[INFO] snapshot loaded");
            state.apply_snapshot(*snapshot);
        }
        Delta::LoadFailed(cause) => {
            state.push_log(format!("[ERROR] snapshot load failed: {cause}"));
            state.snapshot = None;
            state.winner_line = None;
            state.error_detail = Some(cause);
            state.phase = Phase::Errored;
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}

pub fn format_points(points: f64) -> String {
    format!("{points:.2}")
}

/// Three-way result line. Exact float comparison on the precomputed totals;
/// equal totals are a tie.
pub fn winner_line(team1: &TeamResult, team2: &TeamResult) -> String {
    if team1.total_points > team2.total_points {
        let margin = team1.total_points - team2.total_points;
        format!("{} WINS by {} points!", team1.name, format_points(margin))
    } else if team2.total_points > team1.total_points {
        let margin = team2.total_points - team1.total_points;
        format!("{} WINS by {} points!", team2.name, format_points(margin))
    } else {
        "TIE GAME!".to_string()
    }
}

/// Cells of one roster row: slot, name, team abbr, stat line, points.
pub fn roster_row_cells(player: &PlayerEntry) -> [String; 5] {
    [
        player.position.clone(),
        player.name.clone(),
        player.team.clone(),
        player.stats.clone(),
        format_points(player.points),
    ]
}

/// Totals cell under a roster table. Passes the generator's figure through
/// untouched rather than summing the rows.
pub fn roster_total_label(team: &TeamResult) -> String {
    format!("{} PTS", format_points(team.total_points))
}

/// Lines of one top-performer card, top to bottom.
pub fn performer_card_lines(performer: &PerformerEntry) -> [String; 5] {
    [
        format!("#{}", performer.rank),
        performer.name.clone(),
        format!("{} • {}", performer.position, performer.team),
        performer.stats.clone(),
        format_points(performer.points),
    ]
}

pub fn format_generated_at(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.is_empty() {
        return "unknown".to_string();
    }
    match parse_generated_at(cleaned) {
        Some(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => cleaned.to_string(),
    }
}

fn parse_generated_at(raw: &str) -> Option<NaiveDateTime> {
    // The generator writes datetime.now().isoformat(); the other variants
    // cover hand-edited files.
    const FORMATS: [&str; 4] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ];

    for fmt in FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    None
}
