// Integration tests for draftday-core.
//
// These tests drive the public API end to end: shipped defaults are loaded
// through the config layer, fed to the lottery and the schedule builder,
// and the results are exported to CSV/JSON.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use draftday_core::config::{self, Config, CONFIG_FILES};
use draftday_core::export;
use draftday_core::lottery::engine::LotteryEngine;
use draftday_core::lottery::session::LotterySession;
use draftday_core::lottery::LotteryError;
use draftday_core::schedule::builder::{
    build_schedule, validate_schedule, Division, ScheduleOptions, WeekKind,
};
use draftday_core::schedule::pair::Pair;
use draftday_core::schedule::ScheduleError;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// ===========================================================================
// Test helpers
// ===========================================================================

/// Repository root holding `defaults/` (cwd is the crate dir under cargo test).
fn project_root() -> PathBuf {
    let cwd = std::env::current_dir().unwrap();
    for candidate in [cwd.clone(), cwd.join("../.."), cwd.join("..")] {
        if candidate.join("defaults").exists() {
            return candidate;
        }
    }
    panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
}

/// Scratch base dir containing only a copy of the shipped defaults, then
/// loaded through `load_config` so the first-run copy step is exercised.
fn load_shipped_config(name: &str) -> (PathBuf, Config) {
    let tmp = std::env::temp_dir().join(name);
    let _ = fs::remove_dir_all(&tmp);
    fs::create_dir_all(tmp.join("defaults")).unwrap();
    for file in CONFIG_FILES {
        fs::copy(
            project_root().join("defaults").join(file),
            tmp.join("defaults").join(file),
        )
        .unwrap();
    }
    let config = config::load_config(&tmp).expect("shipped defaults should load");
    (tmp, config)
}

fn cleanup(dir: &Path) {
    let _ = fs::remove_dir_all(dir);
}

/// The 12-team, 3-division layout with six symmetric rivalries.
fn t_divisions() -> Vec<Division> {
    ["A", "B", "C"]
        .iter()
        .enumerate()
        .map(|(d, name)| Division {
            name: name.to_string(),
            teams: (1..=4).map(|i| format!("T{}", d * 4 + i)).collect(),
        })
        .collect()
}

fn t_rivals() -> HashMap<String, String> {
    let mut map = HashMap::new();
    for (a, b) in [
        ("T1", "T2"),
        ("T5", "T6"),
        ("T9", "T10"),
        ("T3", "T4"),
        ("T7", "T8"),
        ("T11", "T12"),
    ] {
        map.insert(a.to_string(), b.to_string());
        map.insert(b.to_string(), a.to_string());
    }
    map
}

fn seeded(seed: u64) -> ScheduleOptions {
    ScheduleOptions {
        seed: Some(seed),
        prefer_pods: true,
    }
}

// ===========================================================================
// Lottery
// ===========================================================================

#[test]
fn four_team_lottery_with_zero_chance_seed_is_a_permutation() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let engine = LotteryEngine::new(4, 2, vec![3, 2, 1, 0], &mut rng).unwrap();

    for _ in 0..200 {
        let order = engine.play_lottery(&mut rng);
        let mut sorted = order.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3]);
        assert_eq!(order[3], 3, "zero-chance seed can never be drawn");
    }
}

#[test]
fn shipped_config_draws_full_order_of_owners() {
    let (tmp, config) = load_shipped_config("draftday_it_draw");

    let mut settings = config.lottery.clone();
    settings.seed = Some(2024);
    let names = config.league.standings().lottery_names();
    let mut session = LotterySession::new(names.clone(), &settings).unwrap();

    // Linear 70 -> 7 over 12 seeds.
    assert_eq!(session.chances()[0], 70);
    assert_eq!(session.chances()[11], 7);
    assert!(session.chances().iter().map(|&c| c as usize).sum::<usize>() <= 495);

    let record = session.record_draw();
    assert_eq!(record.seed, 2024);
    assert_eq!(record.order.len(), 12);
    let drawn: BTreeSet<&String> = record.order.iter().collect();
    let expected: BTreeSet<&String> = names.iter().collect();
    assert_eq!(drawn, expected);

    // Same seed, same draw.
    let mut again = LotterySession::new(names, &settings).unwrap();
    assert_eq!(again.run_draw(), record.order);

    cleanup(&tmp);
}

#[test]
fn sampling_worst_team_picks_first_most_often() {
    let (tmp, config) = load_shipped_config("draftday_it_sampling");

    let mut settings = config.lottery.clone();
    settings.seed = Some(5);
    let names = config.league.standings().lottery_names();
    let mut session = LotterySession::new(names, &settings).unwrap();
    let report = session.run_sampling(4000).unwrap();

    assert_eq!(report.iterations, 4000);
    for seed in 0..12 {
        let row_sum: f64 = report.frequencies[seed].iter().sum();
        assert!((row_sum - 1.0).abs() < 0.01, "seed {seed} row sums to {row_sum}");
    }
    let first_pick: Vec<f64> = (0..12).map(|s| report.frequency(s, 0)).collect();
    assert!(first_pick[0] > first_pick[11]);

    let mut buf = Vec::new();
    export::write_sampling_csv(&report, &mut buf).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let header = text.lines().next().unwrap();
    assert!(header.starts_with("seed,chances,Dom,Gus,"));
    assert_eq!(text.lines().count(), 13);

    assert!(matches!(
        session.run_sampling(0),
        Err(LotteryError::NoIterations)
    ));

    cleanup(&tmp);
}

#[test]
fn partial_lottery_only_orders_the_lottery_picks() {
    let names: Vec<String> = ["Dom", "Gus", "Beans", "Logan", "Carson", "Batches"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    let mut session =
        LotterySession::with_chances(names, vec![5, 4, 3, 3, 2, 1], 3, Some(3), 9).unwrap();
    let order = session.run_draw();
    assert_eq!(order.len(), 3);
    let unique: BTreeSet<&String> = order.iter().collect();
    assert_eq!(unique.len(), 3);
}

#[test]
fn overfull_chances_are_rejected() {
    let names: Vec<String> = (1..=4).map(|i| format!("T{i}")).collect();
    let err = LotterySession::with_chances(names, vec![4, 2, 1, 0], 2, None, 1).unwrap_err();
    assert!(matches!(
        err,
        LotteryError::ChancesExceedCapacity {
            total: 7,
            capacity: 6
        }
    ));
}

// ===========================================================================
// Schedule
// ===========================================================================

#[test]
fn t_league_schedule_meets_every_invariant() {
    let schedule = build_schedule(&t_divisions(), &t_rivals(), &seeded(42)).unwrap();

    assert_eq!(schedule.weeks.len(), 14);
    assert_eq!(schedule.seed, 42);
    assert!(schedule.weeks[..11]
        .iter()
        .all(|w| w.kind == WeekKind::RoundRobin));
    assert_eq!(schedule.weeks[11].kind, WeekKind::Rivalry);
    assert_eq!(schedule.weeks[12].kind, WeekKind::Supplemental);

    for week in &schedule.weeks {
        assert_eq!(week.games.len(), 6);
    }
    assert!(schedule.games_per_team().values().all(|&g| g == 14));

    let counts = schedule.pair_counts();
    assert_eq!(
        counts.get(&Pair::new("T1".to_string(), "T2".to_string())),
        Some(&2)
    );
    assert!(counts.values().all(|&c| c <= 2));

    let rivals: BTreeSet<Pair<String>> = t_rivals()
        .into_iter()
        .map(|(a, b)| Pair::new(a, b))
        .collect();
    validate_schedule(&schedule, &rivals).unwrap();
}

#[test]
fn t_league_schedule_is_deterministic_per_seed() {
    let a = build_schedule(&t_divisions(), &t_rivals(), &seeded(7)).unwrap();
    let b = build_schedule(&t_divisions(), &t_rivals(), &seeded(7)).unwrap();
    assert_eq!(a.weeks, b.weeks);
}

#[test]
fn asymmetric_rivals_are_invalid_input() {
    let mut rivals = t_rivals();
    rivals.insert("T1".to_string(), "T3".to_string());
    assert!(matches!(
        build_schedule(&t_divisions(), &rivals, &seeded(1)),
        Err(ScheduleError::InvalidInput { .. })
    ));
}

#[test]
fn shipped_config_schedule_exports_grid() {
    let (tmp, config) = load_shipped_config("draftday_it_schedule");

    let schedule = build_schedule(
        &config.schedule.divisions,
        &config.schedule.rivals,
        &config.schedule.options(),
    )
    .unwrap();
    assert_eq!(schedule.seed, 42);
    assert_eq!(schedule.weeks[11].opponent_of("Austin"), Some("Logan"));
    assert_eq!(schedule.weeks[11].opponent_of("Addi"), Some("Carson"));

    let path = tmp.join("schedule.csv");
    export::save_schedule_csv(&schedule, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 15);
    assert_eq!(
        lines[0],
        "Week,Austin,Sam,Logan,Dom,Owen,Jakeb,Gus,TCoop,Batches,Addi,Beans,Carson"
    );
    assert!(lines[12].starts_with("Week 12,Logan,Dom,Austin,Sam,"));
    assert!(lines[14].starts_with("Week 14,"));

    cleanup(&tmp);
}

#[test]
fn draw_record_round_trips_through_json_file() {
    let (tmp, config) = load_shipped_config("draftday_it_draw_json");

    let mut settings = config.lottery.clone();
    settings.seed = Some(77);
    let mut session =
        LotterySession::new(config.league.standings().lottery_names(), &settings).unwrap();
    let record = session.record_draw();

    let path = tmp.join("draw.json");
    export::save_draw_json(&record, &path).unwrap();
    let text = fs::read_to_string(&path).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["seed"], 77);
    assert_eq!(parsed["order"].as_array().map(Vec::len), Some(12));

    cleanup(&tmp);
}
