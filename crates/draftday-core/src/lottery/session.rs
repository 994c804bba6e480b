// A lottery bound to team names: statistical sampling and the real draw.

use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::chances::ChancesPolicy;
use super::engine::LotteryEngine;
use super::LotteryError;

/// Everything a session needs besides the team names.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LotterySettings {
    /// Balls drawn per combination.
    pub balls: usize,
    /// Number of lottery picks. `None` means every team.
    #[serde(default)]
    pub picks: Option<usize>,
    /// Default iteration count for sampling runs.
    #[serde(default = "default_iterations")]
    pub iterations: usize,
    /// RNG seed. `None` draws a fresh seed from the OS.
    #[serde(default)]
    pub seed: Option<u64>,
    pub chances: ChancesPolicy,
}

fn default_iterations() -> usize {
    10_000
}

/// Empirical conditional probabilities from repeated lotteries.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingReport {
    /// Team names in seed order.
    pub team_names: Vec<String>,
    pub chances: Vec<u32>,
    pub iterations: usize,
    /// `frequencies[seed][position]`: share of runs in which `seed` landed
    /// on draft `position`, rounded to 3 decimals.
    pub frequencies: Vec<Vec<f64>>,
}

impl SamplingReport {
    /// Frequency of `seed` landing on `position`.
    pub fn frequency(&self, seed: usize, position: usize) -> f64 {
        self.frequencies[seed][position]
    }

    /// Column headers for positions: the team name at the same seed index.
    pub fn position_labels(&self) -> &[String] {
        let positions = self.frequencies.first().map_or(0, Vec::len);
        &self.team_names[..positions]
    }
}

/// The authoritative result of a draw, ready to be shown or stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawRecord {
    pub drawn_at: DateTime<Utc>,
    /// The RNG seed the session was built with.
    pub seed: u64,
    /// Team names in pick order.
    pub order: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct LotterySession {
    team_names: Vec<String>,
    engine: LotteryEngine,
    rng: ChaCha8Rng,
    seed: u64,
}

impl LotterySession {
    /// Build a session for `team_names`, listed worst record first.
    ///
    /// The chances vector is derived from `settings.chances` and the outcome
    /// table is shuffled from the session RNG, so two sessions built with the
    /// same seed and inputs produce identical draws.
    pub fn new(team_names: Vec<String>, settings: &LotterySettings) -> Result<Self, LotteryError> {
        let chances = settings.chances.chances_for(team_names.len())?;
        let seed = settings.seed.unwrap_or_else(rand::random);
        Self::with_chances(team_names, chances, settings.balls, settings.picks, seed)
    }

    /// Build a session from an explicit chances vector.
    pub fn with_chances(
        team_names: Vec<String>,
        chances: Vec<u32>,
        balls: usize,
        picks: Option<usize>,
        seed: u64,
    ) -> Result<Self, LotteryError> {
        if team_names.len() != chances.len() {
            return Err(LotteryError::TeamCountMismatch {
                names: team_names.len(),
                seeds: chances.len(),
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let picks = picks.unwrap_or(team_names.len());
        let engine = LotteryEngine::new(picks, balls, chances, &mut rng)?;

        let never_drawn: Vec<&str> = team_names
            .iter()
            .zip(engine.chances())
            .filter(|&(_, &c)| c == 0)
            .map(|(name, _)| name.as_str())
            .collect();
        if !never_drawn.is_empty() {
            warn!(
                teams = ?never_drawn,
                "teams with zero chances are never drawn and keep their standings slots"
            );
        }

        debug!(teams = team_names.len(), picks, balls, seed, "lottery session ready");

        Ok(LotterySession {
            team_names,
            engine,
            rng,
            seed,
        })
    }

    pub fn team_names(&self) -> &[String] {
        &self.team_names
    }

    pub fn chances(&self) -> &[u32] {
        self.engine.chances()
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Play `iterations` lotteries and tabulate where each seed landed.
    pub fn run_sampling(&mut self, iterations: usize) -> Result<SamplingReport, LotteryError> {
        if iterations == 0 {
            return Err(LotteryError::NoIterations);
        }

        let num_seeds = self.engine.num_seeds();
        let picks = self.engine.picks();
        let mut counts = vec![vec![0usize; picks]; num_seeds];

        for _ in 0..iterations {
            let order = self.engine.play_lottery(&mut self.rng);
            for (position, &seed) in order.iter().enumerate() {
                counts[seed][position] += 1;
            }
        }

        let frequencies = counts
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|c| round3(c as f64 / iterations as f64))
                    .collect()
            })
            .collect();

        info!(iterations, "lottery sampling complete");

        Ok(SamplingReport {
            team_names: self.team_names.clone(),
            chances: self.engine.chances().to_vec(),
            iterations,
            frequencies,
        })
    }

    /// Play a single lottery and return team names in pick order.
    pub fn run_draw(&mut self) -> Vec<String> {
        let order = self.engine.play_lottery(&mut self.rng);
        order
            .into_iter()
            .map(|seed| self.team_names[seed].clone())
            .collect()
    }

    /// Like [`run_draw`](Self::run_draw), stamped with the time and seed.
    pub fn record_draw(&mut self) -> DrawRecord {
        let order = self.run_draw();
        info!(first = ?order.first(), "draft order drawn");
        DrawRecord {
            drawn_at: Utc::now(),
            seed: self.seed,
            order,
        }
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
