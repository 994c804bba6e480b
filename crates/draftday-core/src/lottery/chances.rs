// Standings-rank to ball-count policies.
//
// Seed 0 is the worst team. Every policy is non-increasing in seed order so
// a worse record never receives fewer balls than a better one.

use serde::Deserialize;

use super::LotteryError;

/// How many balls each seed receives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum ChancesPolicy {
    /// Linear interpolation from `max` (worst team) down to `min` (best team).
    Linear { max: u32, min: u32 },
    /// A fixed table, one entry per seed, worst team first.
    Explicit { values: Vec<u32> },
}

impl ChancesPolicy {
    /// Produce the chances vector for `num_seeds` seeds.
    pub fn chances_for(&self, num_seeds: usize) -> Result<Vec<u32>, LotteryError> {
        match self {
            ChancesPolicy::Linear { max, min } => linear_chances(*max, *min, num_seeds),
            ChancesPolicy::Explicit { values } => {
                if values.len() != num_seeds {
                    return Err(LotteryError::ChancesLengthMismatch {
                        chances: values.len(),
                        seeds: num_seeds,
                    });
                }
                if let Some(seed) = values.windows(2).position(|w| w[1] > w[0]) {
                    return Err(LotteryError::NonMonotonicChances { seed: seed + 1 });
                }
                Ok(values.clone())
            }
        }
    }
}

fn linear_chances(max: u32, min: u32, num_seeds: usize) -> Result<Vec<u32>, LotteryError> {
    if num_seeds == 0 {
        return Err(LotteryError::NoSeeds);
    }
    if min > max {
        return Err(LotteryError::InvalidPolicy {
            message: format!("linear policy needs max >= min, got max={max} min={min}"),
        });
    }
    if num_seeds == 1 {
        return Ok(vec![max]);
    }

    let span = f64::from(max - min);
    let steps = (num_seeds - 1) as f64;
    Ok((0..num_seeds)
        .map(|rank| (f64::from(max) - span * rank as f64 / steps).round() as u32)
        .collect())
}
