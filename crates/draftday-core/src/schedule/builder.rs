// Fourteen-week season for three divisions of four teams.
//
// Weeks 1-11 are a single round robin, week 12 replays every rivalry, and
// weeks 13-14 are perfect matchings over non-rival pairs that still have a
// meeting left, preferring same-rank cross-division ("pod") games.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::matching::find_matching_shuffled;
use super::pair::Pair;
use super::round_robin::round_robin_weeks;
use super::ScheduleError;

pub const DIVISION_COUNT: usize = 3;
pub const TEAMS_PER_DIVISION: usize = 4;
pub const TEAM_COUNT: usize = DIVISION_COUNT * TEAMS_PER_DIVISION;
pub const RIVAL_PAIRS: usize = TEAM_COUNT / 2;
pub const SEASON_WEEKS: usize = 14;
/// No pair meets more often than this.
pub const MAX_MEETINGS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Division {
    pub name: String,
    /// Teams in standings order; index = pod rank.
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleOptions {
    /// RNG seed for ordering candidates in weeks 13-14. `None` picks one.
    pub seed: Option<u64>,
    /// Try same-rank cross-division pairs first in weeks 13-14.
    pub prefer_pods: bool,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        ScheduleOptions {
            seed: None,
            prefer_pods: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WeekKind {
    RoundRobin,
    Rivalry,
    Supplemental,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Week {
    /// 1-based week number.
    pub number: usize,
    pub kind: WeekKind,
    pub games: Vec<Pair<String>>,
}

impl Week {
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        self.games.iter().find_map(|game| {
            if game.first() == team {
                Some(game.second().as_str())
            } else if game.second() == team {
                Some(game.first().as_str())
            } else {
                None
            }
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Schedule {
    /// Teams in division order.
    pub teams: Vec<String>,
    pub weeks: Vec<Week>,
    /// Seed used for weeks 13-14.
    pub seed: u64,
}

impl Schedule {
    /// How many times each pair meets over the season.
    pub fn pair_counts(&self) -> BTreeMap<Pair<String>, usize> {
        let mut counts = BTreeMap::new();
        for game in self.weeks.iter().flat_map(|w| &w.games) {
            *counts.entry(game.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Games played by each team over the season.
    pub fn games_per_team(&self) -> BTreeMap<String, usize> {
        let mut counts: BTreeMap<String, usize> =
            self.teams.iter().map(|t| (t.clone(), 0)).collect();
        for game in self.weeks.iter().flat_map(|w| &w.games) {
            *counts.entry(game.first().clone()).or_insert(0) += 1;
            *counts.entry(game.second().clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Rows = weeks, columns = `self.teams`, cell = opponent ("" if idle).
    pub fn opponent_grid(&self) -> Vec<Vec<String>> {
        self.weeks
            .iter()
            .map(|week| {
                self.teams
                    .iter()
                    .map(|team| week.opponent_of(team).unwrap_or_default().to_string())
                    .collect()
            })
            .collect()
    }
}

/// Build and validate the full season.
pub fn build_schedule(
    divisions: &[Division],
    rivals: &HashMap<String, String>,
    options: &ScheduleOptions,
) -> Result<Schedule, ScheduleError> {
    let teams = flatten_divisions(divisions)?;
    let index: HashMap<&str, usize> = teams
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();
    let ids: Vec<usize> = (0..teams.len()).collect();

    let rival_pairs = rival_pairs(rivals, &index)?;

    // Weeks 1-11
    let base_weeks = round_robin_weeks(&ids)?;

    // Week 12
    let rivalry_week: Vec<Pair<usize>> = rival_pairs.iter().copied().collect();

    let mut meetings: BTreeMap<Pair<usize>, usize> = BTreeMap::new();
    for game in base_weeks.iter().chain(std::iter::once(&rivalry_week)).flatten() {
        *meetings.entry(*game).or_insert(0) += 1;
    }

    let non_rival: BTreeSet<Pair<usize>> = ids
        .iter()
        .flat_map(|&a| ids[a + 1..].iter().map(move |&b| Pair::new(a, b)))
        .filter(|p| !rival_pairs.contains(p))
        .collect();

    let pods = pod_pairs(divisions, &index);
    let seed = options.seed.unwrap_or_else(rand::random);
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    // Weeks 13-14
    let mut extra_weeks = Vec::with_capacity(2);
    for week_number in base_weeks.len() + 2..=SEASON_WEEKS {
        let allowed: BTreeSet<Pair<usize>> = non_rival
            .iter()
            .filter(|p| meetings.get(p).copied().unwrap_or(0) < MAX_MEETINGS)
            .copied()
            .collect();
        let preferred: Option<BTreeSet<Pair<usize>>> = options
            .prefer_pods
            .then(|| pods.intersection(&allowed).copied().collect());

        debug!(
            week = week_number,
            allowed = allowed.len(),
            preferred = preferred.as_ref().map_or(0, BTreeSet::len),
            "searching for week matching"
        );

        let games = find_matching_shuffled(&ids, &allowed, preferred.as_ref(), &mut rng)
            .ok_or(ScheduleError::Infeasible { week: week_number })?;
        for game in &games {
            *meetings.entry(*game).or_insert(0) += 1;
        }
        extra_weeks.push(games);
    }

    let name = |p: &Pair<usize>| p.map(|&i| teams[i].clone());
    let mut weeks: Vec<Week> = Vec::with_capacity(SEASON_WEEKS);
    for games in &base_weeks {
        weeks.push(Week {
            number: weeks.len() + 1,
            kind: WeekKind::RoundRobin,
            games: games.iter().map(name).collect(),
        });
    }
    weeks.push(Week {
        number: weeks.len() + 1,
        kind: WeekKind::Rivalry,
        games: rivalry_week.iter().map(name).collect(),
    });
    for games in &extra_weeks {
        weeks.push(Week {
            number: weeks.len() + 1,
            kind: WeekKind::Supplemental,
            games: games.iter().map(name).collect(),
        });
    }

    let schedule = Schedule {
        teams: teams.clone(),
        weeks,
        seed,
    };

    let named_rivals: BTreeSet<Pair<String>> = rival_pairs.iter().map(name).collect();
    if let Err(e) = validate_schedule(&schedule, &named_rivals) {
        error!("built schedule failed validation: {e}");
        return Err(e);
    }

    info!(weeks = schedule.weeks.len(), seed, "season schedule built");
    Ok(schedule)
}

/// Check every season invariant: week count, one game per team per week,
/// full coverage, games per team, rivals exactly twice, no pair above the cap.
pub fn validate_schedule(
    schedule: &Schedule,
    rivals: &BTreeSet<Pair<String>>,
) -> Result<(), ScheduleError> {
    let fail = |message: String| Err(ScheduleError::ValidationFailed { message });

    if schedule.weeks.len() != SEASON_WEEKS {
        return fail(format!(
            "expected {SEASON_WEEKS} weeks, got {}",
            schedule.weeks.len()
        ));
    }

    for week in &schedule.weeks {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for game in &week.games {
            for team in [game.first(), game.second()] {
                if !seen.insert(team.as_str()) {
                    return fail(format!("{team} double-booked in week {}", week.number));
                }
            }
        }
        if seen.len() != schedule.teams.len() {
            return fail(format!(
                "week {} covers {} of {} teams",
                week.number,
                seen.len(),
                schedule.teams.len()
            ));
        }
    }

    for (team, games) in schedule.games_per_team() {
        if games != SEASON_WEEKS {
            return fail(format!("{team} has {games} games (expected {SEASON_WEEKS})"));
        }
    }

    let counts = schedule.pair_counts();
    for pair in rivals {
        let met = counts.get(pair).copied().unwrap_or(0);
        if met != MAX_MEETINGS {
            return fail(format!("rivals {pair} meet {met} times (expected {MAX_MEETINGS})"));
        }
    }
    if let Some((pair, met)) = counts.iter().find(|&(_, &c)| c > MAX_MEETINGS) {
        return fail(format!("{pair} meet {met} times (max {MAX_MEETINGS})"));
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Input checks and helpers
// ---------------------------------------------------------------------------

fn flatten_divisions(divisions: &[Division]) -> Result<Vec<String>, ScheduleError> {
    if divisions.len() != DIVISION_COUNT {
        return Err(ScheduleError::invalid(format!(
            "expected {DIVISION_COUNT} divisions, got {}",
            divisions.len()
        )));
    }

    let mut teams = Vec::with_capacity(TEAM_COUNT);
    let mut seen = BTreeSet::new();
    for division in divisions {
        if division.teams.len() != TEAMS_PER_DIVISION {
            return Err(ScheduleError::invalid(format!(
                "division {} has {} teams (expected {TEAMS_PER_DIVISION})",
                division.name,
                division.teams.len()
            )));
        }
        for team in &division.teams {
            if !seen.insert(team.as_str()) {
                return Err(ScheduleError::invalid(format!(
                    "team {team} is listed more than once"
                )));
            }
            teams.push(team.clone());
        }
    }
    Ok(teams)
}

fn rival_pairs(
    rivals: &HashMap<String, String>,
    index: &HashMap<&str, usize>,
) -> Result<BTreeSet<Pair<usize>>, ScheduleError> {
    let lookup = |team: &str| {
        index
            .get(team)
            .copied()
            .ok_or_else(|| ScheduleError::invalid(format!("unknown team {team} in rivals")))
    };

    let mut pairs = BTreeSet::new();
    for (team, rival) in rivals {
        let (a, b) = (lookup(team)?, lookup(rival)?);
        if a == b {
            return Err(ScheduleError::invalid(format!("{team} cannot be its own rival")));
        }
        if rivals.get(rival) != Some(team) {
            return Err(ScheduleError::invalid(format!(
                "rivalry {team} -> {rival} is not listed both ways"
            )));
        }
        pairs.insert(Pair::new(a, b));
    }

    if pairs.len() != RIVAL_PAIRS {
        return Err(ScheduleError::invalid(format!(
            "expected {RIVAL_PAIRS} distinct two-way rival pairs, got {}",
            pairs.len()
        )));
    }
    Ok(pairs)
}

/// Every pair of teams that share a rank but sit in different divisions.
fn pod_pairs(divisions: &[Division], index: &HashMap<&str, usize>) -> BTreeSet<Pair<usize>> {
    let mut pairs = BTreeSet::new();
    for rank in 0..TEAMS_PER_DIVISION {
        let pod: Vec<usize> = divisions
            .iter()
            .filter_map(|d| d.teams.get(rank))
            .filter_map(|t| index.get(t.as_str()).copied())
            .collect();
        for (i, &a) in pod.iter().enumerate() {
            for &b in &pod[i + 1..] {
                pairs.insert(Pair::new(a, b));
            }
        }
    }
    pairs
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
