use std::fs;
use std::path::PathBuf;

use matchup_terminal::snapshot_fetch::parse_snapshot_json;
use matchup_terminal::state::{apply_delta, AppState, Delta, Phase};

fn fixture_snapshot() -> matchup_terminal::snapshot_fetch::Snapshot {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push("championship_results.json");
    let raw = fs::read_to_string(path).expect("fixture file should be readable");
    parse_snapshot_json(&raw).expect("fixture should parse")
}

#[test]
fn load_starts_idle_then_loading() {
    let mut state = AppState::new();
    assert_eq!(state.phase, Phase::Idle);
    state.begin_loading();
    assert_eq!(state.phase, Phase::Loading);
    assert!(state.snapshot.is_none());
    assert!(state.winner_line.is_none());
}

#[test]
fn successful_load_reaches_rendered_with_banner_and_counters() {
    let mut state = AppState::new();
    state.begin_loading();
    apply_delta(&mut state, Delta::Snapshot(Box::new(fixture_snapshot())));

    assert_eq!(state.phase, Phase::Rendered);
    assert!(state.snapshot.is_some());
    assert_eq!(
        state.winner_line.as_deref(),
        Some("Gridiron Gurus WINS by 17.76 points!")
    );

    // Counters start at zero and land exactly on the precomputed totals.
    assert_eq!(state.team1_counter.value(), 0.0);
    state.tick(2.0);
    assert_eq!(state.team1_counter.value(), 116.7);
    assert_eq!(state.team2_counter.value(), 98.94);
    assert!(state.team1_counter.is_done());
}

#[test]
fn failed_load_reaches_errored_and_renders_nothing() {
    let mut state = AppState::new();
    state.begin_loading();
    apply_delta(
        &mut state,
        Delta::LoadFailed("snapshot request returned 404 Not Found".to_string()),
    );

    assert_eq!(state.phase, Phase::Errored);
    assert!(state.snapshot.is_none());
    assert!(state.winner_line.is_none());
    assert!(state
        .error_detail
        .as_deref()
        .is_some_and(|detail| detail.contains("404")));
    assert!(state
        .last_log()
        .is_some_and(|log| log.starts_with("[ERROR]")));
}

#[test]
fn errored_state_ignores_animation_ticks() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::LoadFailed("boom".to_string()));
    state.tick(5.0);
    assert_eq!(state.render_elapsed, 0.0);
}

#[test]
fn reload_replaces_a_failed_load() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::LoadFailed("boom".to_string()));
    assert_eq!(state.phase, Phase::Errored);

    state.begin_loading();
    assert_eq!(state.phase, Phase::Loading);
    assert!(state.error_detail.is_none());

    apply_delta(&mut state, Delta::Snapshot(Box::new(fixture_snapshot())));
    assert_eq!(state.phase, Phase::Rendered);
}

#[test]
fn log_deltas_append_to_the_console() {
    let mut state = AppState::new();
    apply_delta(&mut state, Delta::Log("[INFO] loading from file".to_string()));
    assert_eq!(state.last_log(), Some("[INFO] loading from file"));
}
