use std::fs;
use std::path::PathBuf;

use matchup_terminal::snapshot_fetch::{cache_busted_url, parse_snapshot_json};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_championship_results_fixture() {
    let raw = read_fixture("championship_results.json");
    let snapshot = parse_snapshot_json(&raw).expect("fixture should parse");

    assert_eq!(snapshot.team1.name, "Gridiron Gurus");
    assert_eq!(snapshot.team2.name, "Pigskin Prophets");
    assert_eq!(snapshot.team1.roster.len(), 7);
    assert_eq!(snapshot.team2.roster.len(), 7);
    assert_eq!(snapshot.team1.total_points, 116.7);
    assert_eq!(snapshot.weekend, "Conference Championships - Jan 25-26, 2026");

    let kicker = &snapshot.team2.roster[6];
    assert_eq!(kicker.position, "K");
    assert!(kicker.points < 0.0);

    assert_eq!(snapshot.top_performers.len(), 5);
    assert_eq!(snapshot.top_performers[0].rank, 1);
    assert_eq!(snapshot.top_performers[0].name, "Saquon Barkley");
    assert_eq!(snapshot.top_performers[4].rank, 5);
}

#[test]
fn missing_optional_fields_default() {
    let raw = r#"{
        "generated_at": "2026-01-26T21:14:08",
        "team1": {"name": "A", "total_points": 1.0, "roster": [
            {"position": "QB", "name": "X", "team": "KC", "points": 1.0}
        ]},
        "team2": {"name": "B", "total_points": 2.0}
    }"#;
    let snapshot = parse_snapshot_json(raw).expect("optional fields should default");
    assert!(snapshot.weekend.is_empty());
    assert!(snapshot.top_performers.is_empty());
    assert!(snapshot.team2.roster.is_empty());
    assert!(snapshot.team1.roster[0].stats.is_empty());
}

#[test]
fn empty_and_null_bodies_fail() {
    assert!(parse_snapshot_json("").is_err());
    assert!(parse_snapshot_json("   ").is_err());
    assert!(parse_snapshot_json("null").is_err());
}

#[test]
fn malformed_body_fails() {
    assert!(parse_snapshot_json("{\"team1\": }").is_err());
    assert!(parse_snapshot_json("{\"generated_at\": \"x\"}").is_err());
}

#[test]
fn cache_buster_appends_query_parameter() {
    assert_eq!(
        cache_busted_url("http://localhost:8000/championship_results.json", 1756_000_000_000),
        "http://localhost:8000/championship_results.json?v=1756000000000"
    );
    assert_eq!(
        cache_busted_url("http://host/data.json?key=1", 7),
        "http://host/data.json?key=1&v=7"
    );
}

#[test]
fn sequential_loads_get_distinct_cache_busters() {
    let first = cache_busted_url("http://host/data.json", 1756_000_000_000);
    let second = cache_busted_url("http://host/data.json", 1756_000_000_001);
    assert_ne!(first, second);
}
